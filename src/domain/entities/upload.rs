use actix_multipart::form::tempfile::TempFile;
use infer::Infer;

use crate::errors::AppError;

const FALLBACK_MIME: &str = "application/octet-stream";

/// A file received from a multipart form, fully buffered.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedFile {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads the spooled temp file. The declared content type wins; otherwise the
    /// type is sniffed from the bytes.
    pub async fn from_temp_file(file: TempFile) -> Result<Self, AppError> {
        let bytes = tokio::fs::read(file.file.path())
            .await
            .map_err(|e| AppError::internal("Failed to read uploaded file", e))?;

        let file_name = file
            .file_name
            .as_deref()
            .map(base_name)
            .filter(|name| !name.is_empty())
            .unwrap_or("upload")
            .to_string();

        let content_type = file
            .content_type
            .as_ref()
            .map(|mime| mime.to_string())
            .filter(|mime| mime != FALLBACK_MIME)
            .or_else(|| sniff_mime(&bytes))
            .unwrap_or_else(|| FALLBACK_MIME.to_string());

        Ok(UploadedFile { file_name, content_type, bytes })
    }

    pub async fn from_optional(file: Option<TempFile>) -> Result<Option<Self>, AppError> {
        match file {
            Some(file) if file.size > 0 => Ok(Some(Self::from_temp_file(file).await?)),
            _ => Ok(None),
        }
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<String> {
    Infer::new().get(bytes).map(|kind| kind.mime_type().to_string())
}

/// Browsers on some platforms send the full client path.
fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
