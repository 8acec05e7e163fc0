mod test_utils;

use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn contact_round_trip() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/contact"))
        .json(&json!({"name": "A", "email": "a@x.com", "message": "hi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["message"], "Message sent successfully");
    let id = created["id"].as_str().unwrap();

    let messages = app.get_json("/api/contact").await;
    let entry = messages
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == id)
        .expect("message listed");
    assert_eq!(entry["read"], false);
    assert_eq!(entry["subject"], "No subject");
    assert!(entry["createdAt"].is_string());

    let response = app
        .as_admin(app.client.patch(app.url(&format!("/api/contact/{id}/read"))))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let message = app.get_json(&format!("/api/contact/{id}")).await;
    assert_eq!(message["read"], true);
}

#[actix_rt::test]
async fn newest_messages_come_first() {
    let app = TestApp::spawn().await;

    for name in ["first", "second"] {
        app.client
            .post(app.url("/api/contact"))
            .json(&json!({"name": name, "email": "a@x.com", "message": "hi"}))
            .send()
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let messages = app.get_json("/api/contact").await;
    assert_eq!(messages[0]["name"], "second");
    assert_eq!(messages[1]["name"], "first");
}

#[actix_rt::test]
async fn missing_fields_are_a_validation_error() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/contact"))
        .json(&json!({"name": "A", "message": ""}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["email", "message"]);
}

#[actix_rt::test]
async fn malformed_json_gets_a_json_error() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/contact"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[actix_rt::test]
async fn unknown_messages_are_404() {
    let app = TestApp::spawn().await;

    let read = app
        .as_admin(app.client.patch(app.url("/api/contact/missing/read")))
        .send()
        .await
        .unwrap();
    assert_eq!(read.status(), StatusCode::NOT_FOUND);

    let delete = app
        .as_admin(app.client.delete(app.url("/api/contact/missing")))
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
    let body: Value = delete.json().await.unwrap();
    assert_eq!(body["error"], "Message not found");
}
