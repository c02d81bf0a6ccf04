#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test,
};
use jsonwebtoken::Algorithm;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tasklite::{auth::AuthResponse, db, models::User, AuthSettings};

pub const PASSWORD: &str = "Password123!";

pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        secret_key: "integration-test-secret".into(),
        algorithm: Algorithm::HS256,
        expire_minutes: 30,
        bcrypt_cost: 4,
    }
}

pub async fn test_pool() -> SqlitePool {
    db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database")
}

/// Builds the full application over `$pool` with the test token settings.
macro_rules! test_app {
    ($pool:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($pool.clone()))
                .app_data(actix_web::web::Data::new($crate::common::auth_settings()))
                .configure(tasklite::routes::config),
        )
        .await
    };
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// A registered account: its id and a fresh access token.
pub struct TestUser {
    pub id: i64,
    pub token: String,
}

pub async fn register_user<S, B>(app: &S, pool: &SqlitePool, email: &str) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "registration of {} failed", email);
    let auth: AuthResponse = test::read_body_json(resp).await;

    let user = User::find_by_email(pool, email)
        .await
        .unwrap()
        .expect("registered user should exist");

    TestUser {
        id: user.id,
        token: auth.access_token,
    }
}

/// Sends `req` and returns the status with the parsed JSON body (`Null` when empty).
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!("non-JSON body: {:?}", String::from_utf8_lossy(&body))
        })
    };
    (status, json)
}

pub async fn create_task<S, B>(app: &S, user: &TestUser, title: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/tasks/")
        .insert_header(bearer(&user.token))
        .set_json(json!({ "title": title, "user_id": user.id }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body
}
