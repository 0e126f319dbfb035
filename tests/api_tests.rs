use std::sync::Arc;

use reqwest::{header, Client, StatusCode};
use serde_json::{json, Value};

use storefront::connector::api::{create_router, HttpSettings, SearchSettings};
use storefront::domain::{NO_MATCH_SUGGESTIONS, UPSTREAM_ERROR_MESSAGE};
use storefront::{
    CatalogSchema, ChatClient, Container, InMemoryCatalogRepository, InMemoryUserRepository,
    ScriptedChatClient,
};

async fn spawn_app(chat: impl ChatClient + 'static) -> String {
    let container = Container::from_parts(
        Arc::new(InMemoryCatalogRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(chat),
        Arc::new(CatalogSchema::default()),
        SearchSettings::default(),
        HttpSettings {
            session_secret: "test-secret".to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    );

    let app = create_router(Arc::new(container));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client() -> Client {
    Client::new()
}

fn product_body(name: &str, category: &str, price: f64) -> Value {
    json!({
        "name": name,
        "category": category,
        "price": price,
        "stock": 4,
        "modelSrc": format!("{name}.glb"),
        "iOSSrc": format!("{name}.usdz"),
    })
}

async fn create_product(base_url: &str, body: Value) -> Value {
    let resp = client()
        .post(format!("{}/products", base_url))
        .json(&body)
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

async fn create_user(base_url: &str, email: &str, password: &str) -> Value {
    let resp = client()
        .post(format!("{}/users", base_url))
        .json(&json!({ "name": "Ada", "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

// ========== Search ==========

#[tokio::test]
async fn test_welcome() {
    let base_url = spawn_app(ScriptedChatClient::match_all()).await;
    let resp = client().get(&base_url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "Welcome");
}

#[tokio::test]
async fn test_search_success() {
    let base_url = spawn_app(ScriptedChatClient::new(
        "```json\n{\"category\":{\"$regex\":\"lighting\",\"$options\":\"i\"}}\n```",
    ))
    .await;
    create_product(&base_url, product_body("Lamp", "Lighting", 40.0)).await;
    create_product(&base_url, product_body("Desk", "Furniture", 300.0)).await;

    let resp = client()
        .post(format!("{}/search", base_url))
        .json(&json!({ "message": "something to light my desk" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["products"][0]["name"], "Lamp");
    assert_eq!(body["products"][0]["iOSSrc"], "Lamp.usdz");
}

#[tokio::test]
async fn test_search_legacy_route_and_no_match() {
    let base_url = spawn_app(ScriptedChatClient::new(r#"{"brand":"Nonexistent"}"#)).await;
    create_product(&base_url, product_body("Lamp", "Lighting", 40.0)).await;

    let resp = client()
        .post(format!("{}/openAI", base_url))
        .json(&json!({ "message": "nonexistent brand" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["suggestions"],
        json!(NO_MATCH_SUGGESTIONS.map(String::from).to_vec())
    );
}

#[tokio::test]
async fn test_search_missing_message() {
    let base_url = spawn_app(ScriptedChatClient::match_all()).await;

    for body in [json!({}), json!({ "message": "  " }), json!({ "message": 42 })] {
        let resp = client()
            .post(format!("{}/search", base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {}", body);
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("suggestions").is_none());
    }
}

#[tokio::test]
async fn test_search_invalid_filter() {
    let base_url = spawn_app(ScriptedChatClient::new("I'm sorry, I can't help with that.")).await;

    let resp = client()
        .post(format!("{}/search", base_url))
        .json(&json!({ "message": "hmm" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_search_upstream_failure_hides_detail() {
    let base_url = spawn_app(ScriptedChatClient::failing("401 invalid api key sk-123")).await;

    let resp = client()
        .post(format!("{}/search", base_url))
        .json(&json!({ "message": "chairs" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": UPSTREAM_ERROR_MESSAGE }));
}

// ========== Products ==========

#[tokio::test]
async fn test_product_crud() {
    let base_url = spawn_app(ScriptedChatClient::match_all()).await;
    let created = create_product(&base_url, product_body("Desk", "Furniture", 300.0)).await;
    let id = created["_id"].as_str().unwrap().to_string();
    assert_eq!(created["currency"], "USD");

    let list: Value = client()
        .get(format!("{}/products", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["count"], 1);
    assert_eq!(list["data"][0]["_id"], id.as_str());

    let resp = client()
        .put(format!("{}/products/{}", base_url, id))
        .json(&json!({ "name": "Standing Desk", "category": "Furniture", "price": 450, "stock": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["name"], "Standing Desk");
    assert_eq!(updated["modelSrc"], "Desk.glb");

    let resp = client()
        .delete(format!("{}/products/{}", base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client()
        .get(format!("{}/products/{}", base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product not found!");
}

#[tokio::test]
async fn test_product_create_missing_fields() {
    let base_url = spawn_app(ScriptedChatClient::match_all()).await;

    let resp = client()
        .post(format!("{}/products", base_url))
        .json(&json!({ "name": "Desk" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("modelSrc"));
}

// ========== Users ==========

#[tokio::test]
async fn test_user_wishlist_toggle() {
    let base_url = spawn_app(ScriptedChatClient::match_all()).await;
    let product = create_product(&base_url, product_body("Lamp", "Lighting", 40.0)).await;
    let user = create_user(&base_url, "ada@example.com", "pw").await;
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password").is_none());

    let url = format!("{}/users/{}/wishlist", base_url, user["_id"].as_str().unwrap());
    let added: Value = client()
        .put(&url)
        .json(&json!({ "productId": product["_id"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(added["wishlist"][0]["name"], "Lamp");

    let removed: Value = client()
        .put(&url)
        .json(&json!({ "productId": product["_id"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed["wishlist"], json!([]));

    let resp = client().put(&url).json(&json!({})).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product ID is required.");
}

#[tokio::test]
async fn test_duplicate_user_conflicts() {
    let base_url = spawn_app(ScriptedChatClient::match_all()).await;
    create_user(&base_url, "ada@example.com", "pw").await;

    let resp = client()
        .post(format!("{}/users", base_url))
        .json(&json!({ "name": "Ada 2", "email": "ADA@example.com", "password": "pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let list: Value = client()
        .get(format!("{}/users", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["count"], 1);
}

#[tokio::test]
async fn test_missing_user_is_not_found() {
    let base_url = spawn_app(ScriptedChatClient::match_all()).await;
    let resp = client()
        .delete(format!("{}/users/nope", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "User not found");
}

// ========== Auth ==========

fn session_token(resp: &reqwest::Response) -> String {
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap();
    assert!(cookie.contains("HttpOnly"));
    cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("sessionId="))
        .expect("sessionId cookie")
        .to_string()
}

#[tokio::test]
async fn test_login_session_logout() {
    let base_url = spawn_app(ScriptedChatClient::match_all()).await;
    let user = create_user(&base_url, "ada@example.com", "analytical").await;

    let resp = client()
        .post(format!("{}/auth/login", base_url))
        .json(&json!({ "email": "ada@example.com", "password": "analytical" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let token = session_token(&resp);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["sessionId"], user["_id"]);

    let resp = client()
        .get(format!("{}/auth/session", base_url))
        .header(header::COOKIE, format!("sessionId={}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["isAuthenticated"], true);
    assert_eq!(body["sessionId"], user["_id"]);

    let resp = client()
        .get(format!("{}/auth/session", base_url))
        .header(header::COOKIE, "sessionId=forged")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "isAuthenticated": false }));

    let resp = client()
        .post(format!("{}/auth/logout", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let base_url = spawn_app(ScriptedChatClient::match_all()).await;
    create_user(&base_url, "ada@example.com", "analytical").await;

    let mut messages = Vec::new();
    for (email, password) in [("ada@example.com", "wrong"), ("bob@example.com", "analytical")] {
        let resp = client()
            .post(format!("{}/auth/login", base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = resp.json().await.unwrap();
        messages.push(body["message"].clone());
    }
    assert_eq!(messages[0], messages[1]);
}

#[tokio::test]
async fn test_reset_password() {
    let base_url = spawn_app(ScriptedChatClient::match_all()).await;
    create_user(&base_url, "ada@example.com", "analytical").await;

    let resp = client()
        .post(format!("{}/auth/reset-password", base_url))
        .json(&json!({ "email": "ada@example.com", "newPassword": "babbage" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    let body: Value = resp.json().await.unwrap();
    assert!(body["sessionId"].is_string());

    let resp = client()
        .post(format!("{}/auth/login", base_url))
        .json(&json!({ "email": "ada@example.com", "password": "babbage" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client()
        .post(format!("{}/auth/reset-password", base_url))
        .json(&json!({ "email": "nobody@example.com", "newPassword": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let base_url = spawn_app(ScriptedChatClient::match_all()).await;

    let resp = client()
        .get(format!("{}/products", base_url))
        .header(header::ORIGIN, "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );

    let resp = client()
        .get(format!("{}/products", base_url))
        .header(header::ORIGIN, "http://evil.test")
        .send()
        .await
        .unwrap();
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
