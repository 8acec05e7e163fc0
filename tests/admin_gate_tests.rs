mod test_utils;

use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn missing_or_malformed_authorization_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/api/contact")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized - No token provided");

    let response = app
        .client
        .get(app.url("/api/contact"))
        .header("Authorization", format!("Token {ADMIN_TOKEN}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn unverifiable_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .delete(app.url("/api/projects/abc"))
        .bearer_auth("forged")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized - Invalid token");
}

#[actix_rt::test]
async fn verified_non_admin_is_forbidden() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/projects"))
        .bearer_auth(USER_TOKEN)
        .json(&json!({"title": "Nope"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Forbidden - Admin access required");
}

#[actix_rt::test]
async fn admin_passes_the_gate() {
    let app = TestApp::spawn().await;

    let response = app
        .as_admin(app.client.get(app.url("/api/contact")))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!([]));
}

#[actix_rt::test]
async fn public_routes_need_no_token() {
    let app = TestApp::spawn().await;

    for path in ["/api", "/api/health", "/api/projects", "/api/skills", "/api/about"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[actix_rt::test]
async fn verify_token_reports_the_admin() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/auth/verify-token"))
        .json(&json!({"idToken": ADMIN_TOKEN}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "user": {"uid": "admin-uid", "email": ADMIN_EMAIL}}));
}

#[actix_rt::test]
async fn verify_token_failures_map_to_400_401_403() {
    let app = TestApp::spawn().await;
    let verify = |body: Value| app.client.post(app.url("/api/auth/verify-token")).json(&body).send();

    let response = verify(json!({})).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "ID token is required");

    assert_eq!(verify(json!({"idToken": "forged"})).await.unwrap().status(), StatusCode::UNAUTHORIZED);
    assert_eq!(verify(json!({"idToken": USER_TOKEN})).await.unwrap().status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn auth_check_echoes_the_admin_identity() {
    let app = TestApp::spawn().await;

    let body = app.get_json("/api/auth/check").await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);

    let response = app.client.get(app.url("/api/auth/check")).bearer_auth(USER_TOKEN).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
