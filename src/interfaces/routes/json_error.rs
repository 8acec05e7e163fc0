use actix_multipart::{form::MultipartFormConfig, MultipartError};
use actix_web::{
    body::BoxBody,
    dev::ServiceResponse,
    error::{JsonPayloadError, PayloadError},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::{ErrorHandlerResponse, ErrorHandlers},
    web, HttpResponse, ResponseError,
};
use serde_json::json;

const JSON_BODY_LIMIT: usize = 1024 * 1024;
const GENERIC_ERROR: &str = "Something went wrong!";

/// Makes body extraction failures answer in the API's `{"error": ...}` shape.
pub fn config_routes(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(|err, _req| JsonError::from(err).into()),
    );
    cfg.app_data(
        MultipartFormConfig::default()
            .total_limit(max_upload_bytes)
            .memory_limit(max_upload_bytes)
            .error_handler(move |err, _req| JsonError::from_multipart(err, max_upload_bytes).into()),
    );
}

#[derive(Debug)]
pub struct JsonError {
    message: String,
    status: StatusCode,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status).json(json!({ "error": self.message }))
    }
}

impl From<JsonPayloadError> for JsonError {
    fn from(err: JsonPayloadError) -> Self {
        let status = err.status_code();
        let message = match &err {
            JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                "Request body too large".to_string()
            }
            JsonPayloadError::ContentType => {
                "Request must be either application/json or multipart/form-data".to_string()
            }
            other => format!("Invalid JSON body: {other}"),
        };
        JsonError { message, status }
    }
}

impl JsonError {
    /// Form limits surface as a payload overflow, which actix-multipart
    /// itself reports as a 400.
    fn from_multipart(err: MultipartError, max_upload_bytes: usize) -> Self {
        match err {
            MultipartError::Payload(PayloadError::Overflow) => JsonError {
                message: format!("Upload exceeds the {} MB limit", max_upload_bytes / (1024 * 1024)),
                status: StatusCode::PAYLOAD_TOO_LARGE,
            },
            other => JsonError {
                status: other.status_code(),
                message: format!("Invalid multipart form: {other}"),
            },
        }
    }
}

/// Last line of defence: any error response that is not already JSON is
/// replaced by a JSON body with the same status. The original is logged.
pub fn catch_all() -> ErrorHandlers<BoxBody> {
    ErrorHandlers::new().default_handler(render_json_error)
}

fn render_json_error(res: ServiceResponse<BoxBody>) -> actix_web::Result<ErrorHandlerResponse<BoxBody>> {
    let is_json = res
        .response()
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let status = res.status();
    let message = if status.is_server_error() {
        tracing::error!(%status, path = %res.request().path(), "Unhandled server error");
        GENERIC_ERROR
    } else {
        status.canonical_reason().unwrap_or("Request failed")
    };

    let (req, _) = res.into_parts();
    let res = HttpResponse::build(status).json(json!({ "error": message }));
    Ok(ErrorHandlerResponse::Response(ServiceResponse::new(req, res).map_into_right_body()))
}
