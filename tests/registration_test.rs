use reqwest::Client;
use serde_json::json;

mod common;
use common::utils::spawn_app;

#[tokio::test]
async fn register_user_working() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let username = format!("newuser{}", uuid::Uuid::new_v4());
    let password = "password123";
    let email = format!("{}@example.com", username);

    let user_request = json!({
        "username": username,
        "password": password,
        "email": email
    });

    let response = client
        .post(&format!("{}/register_user", &test_app.address))
        .json(&user_request)
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());

    let saved = sqlx::query_as::<_, (String, String)>(
        "SELECT username, email FROM users WHERE username = $1",
    )
    .bind(&username)
    .fetch_one(&test_app.db_pool)
    .await
    .expect("Failed to fetch saved user.");

    assert_eq!(saved.0, username);
    assert_eq!(saved.1, email);
}

#[tokio::test]
async fn register_duplicate_username_conflicts() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let username = format!("dupuser{}", uuid::Uuid::new_v4());
    let user_request = json!({
        "username": username,
        "password": "password123",
        "email": format!("{}@example.com", username)
    });

    let response = client
        .post(&format!("{}/register_user", &test_app.address))
        .json(&user_request)
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let response = client
        .post(&format!("{}/register_user", &test_app.address))
        .json(&user_request)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn users_count_reflects_registrations() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(&format!("{}/users/count", &test_app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["count"], 0);

    let username = format!("countuser{}", uuid::Uuid::new_v4());
    let response = client
        .post(&format!("{}/register_user", &test_app.address))
        .json(&json!({
            "username": username,
            "password": "password123",
            "email": format!("{}@example.com", username)
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let response = client
        .get(&format!("{}/users/count", &test_app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["count"], 1);
}
