#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use waypoint_api::auth::jwt::{generate_access_token, JwtConfig};
use waypoint_api::config::ServerConfig;
use waypoint_api::router::build_app_router;
use waypoint_api::state::AppState;
use waypoint_db::MemoryStore;
use waypoint_events::{MailError, Mailer, OutgoingMail, ReminderBranding, ReminderRenderer};
use waypoint_services::Services;

pub const OWNER: &str = "owner@example.com";
pub const OTHER: &str = "other@example.com";
pub const MANAGER: &str = "manager@example.com";

/// Test config: CORS for the dev frontend origin and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 4 * 1024,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Captures outgoing mail; recipients in `fail_for` are refused.
#[derive(Default)]
pub struct TestMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    fail_for: Mutex<HashSet<String>>,
}

impl TestMailer {
    pub fn fail_for(&self, recipient: &str) {
        self.fail_for.lock().unwrap().insert(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for TestMailer {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if self.fail_for.lock().unwrap().contains(&mail.to) {
            return Err(MailError::Build(format!("mailbox {} unavailable", mail.to)));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

/// The full router over an in-memory store, plus handles on the doubles.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<TestMailer>,
    pub config: ServerConfig,
}

impl TestApp {
    pub fn token(&self, email: &str, role: &str) -> String {
        generate_access_token(email, role, &self.config.jwt).unwrap()
    }

    pub fn owner(&self) -> String {
        self.token(OWNER, "user")
    }

    pub fn other(&self) -> String {
        self.token(OTHER, "user")
    }

    pub fn manager(&self) -> String {
        self.token(MANAGER, "manager")
    }
}

/// Build the same router the binary serves, backed by a fresh store.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(TestMailer::default());
    let renderer = Arc::new(ReminderRenderer::new(ReminderBranding::default()).unwrap());

    let state = AppState {
        config: Arc::new(config.clone()),
        services: Services::new(store.clone(), mailer.clone(), renderer),
        store: store.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        mailer,
        config,
    }
}

pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(
    app: &TestApp,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(
    app: &TestApp,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json(
    app: &TestApp,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a project through the API and return its id.
pub async fn create_project(app: &TestApp, token: &str, name: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/projects",
        token,
        serde_json::json!({"name": name, "major_goal": "Ship it"}),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a milestone through the API and return its id.
pub async fn create_milestone(app: &TestApp, token: &str, project_id: i64, current: bool) -> i64 {
    let response = post_json(
        app,
        "/api/v1/milestones",
        token,
        serde_json::json!({
            "project_id": project_id,
            "title": "Milestone",
            "is_current": current,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
