mod test_utils;

use reqwest::{multipart::Part, StatusCode};
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn about_defaults_to_the_empty_shape() {
    let app = TestApp::spawn().await;

    let about = app.get_json("/api/about").await;
    assert_eq!(about["bio"], "");
    assert_eq!(about["profileImageUrl"], "");
    assert_eq!(about["resumeUrl"], "");
    assert_eq!(about["social"], json!({"github": "", "linkedin": "", "twitter": "", "email": ""}));
}

#[actix_rt::test]
async fn update_creates_then_merges_the_singleton() {
    let app = TestApp::spawn().await;

    let form = text_form(&[("bio", "Rust developer"), ("github", "https://github.com/me")])
        .part("profileImage", png_part("me.png"));
    let response = app
        .as_admin(app.client.put(app.url("/api/about")))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let resume = Part::bytes(b"%PDF-1.4".to_vec())
        .file_name("cv.pdf")
        .mime_str("application/pdf")
        .unwrap();
    let response = app
        .as_admin(app.client.put(app.url("/api/about")))
        .multipart(text_form(&[("twitter", "@me"), ("bio", "")]).part("resume", resume))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let about: Value = app.client.get(app.url("/api/about")).send().await.unwrap().json().await.unwrap();
    assert_eq!(about["bio"], "Rust developer");
    assert_eq!(about["social"]["github"], "https://github.com/me");
    assert_eq!(about["social"]["twitter"], "@me");
    assert!(about["profileImageUrl"].as_str().unwrap().ends_with("_me.png"));
    assert!(about["resumeUrl"].as_str().unwrap().ends_with("_cv.pdf"));
    assert_eq!(app.blobs.len(), 2);
}

#[actix_rt::test]
async fn about_update_requires_admin() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .put(app.url("/api/about"))
        .multipart(text_form(&[("bio", "hijacked")]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
