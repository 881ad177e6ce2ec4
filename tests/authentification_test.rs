use reqwest::Client;
use serde_json::json;

mod common;
use common::utils::{create_test_user_and_login, spawn_app};

#[tokio::test]
async fn login_returns_a_token_for_valid_credentials() {
    let test_app = spawn_app().await;
    let (_username, token) = create_test_user_and_login(&test_app.address).await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let (username, _token) = create_test_user_and_login(&test_app.address).await;

    let response = client
        .post(&format!("{}/login", test_app.address))
        .json(&json!({
            "username": username,
            "password": "wrong-password"
        }))
        .send()
        .await
        .expect("Failed to execute login request.");
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn me_returns_the_authenticated_user() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let (username, token) = create_test_user_and_login(&test_app.address).await;

    let response = client
        .get(&format!("{}/me", test_app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["username"], json!(username));
}

#[tokio::test]
async fn me_without_token_is_rejected() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(&format!("{}/me", test_app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 401);
}
