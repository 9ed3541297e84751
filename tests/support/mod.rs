//! Shared helpers for the HTTP integration tests
#![allow(dead_code)]

use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use storefront::api::{serve, AppState, SharedState};
use storefront::auth::{AccountUpdate, Role};
use storefront::config::Config;
use storefront::store::{AccountStore, MemoryAccountStore};

pub const PASSWORD: &str = "secret123";
pub const ANSWER: &str = "blue";

/// Config with a fixed secret and the cheapest bcrypt cost
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.auth.bcrypt_cost = 4;
    config
}

pub struct TestApp {
    pub base_url: String,
    pub state: SharedState,
    pub client: reqwest::Client,
    handle: JoinHandle<()>,
}

/// Start the API on an ephemeral port backed by a fresh in-memory store
pub async fn spawn_app() -> (TestApp, MemoryAccountStore) {
    spawn_app_with_config(test_config()).await
}

pub async fn spawn_app_with_config(config: Config) -> (TestApp, MemoryAccountStore) {
    let store = MemoryAccountStore::new();
    let app = spawn_app_with_store(config, Arc::new(store.clone())).await;
    (app, store)
}

pub async fn spawn_app_with_store(config: Config, accounts: Arc<dyn AccountStore>) -> TestApp {
    let state = Arc::new(AppState::new(&config, accounts));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    let server_state = state.clone();
    let handle = tokio::spawn(async move {
        let _ = serve(listener, server_state).await;
    });

    TestApp {
        base_url: format!("http://{}", addr),
        state,
        client: reqwest::Client::new(),
        handle,
    }
}

pub fn registration(email: &str) -> Value {
    json!({
        "name": "Test User",
        "email": email,
        "password": PASSWORD,
        "phone": "555-0100",
        "address": "1 Main St",
        "answer": ANSWER,
    })
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn get_with_token(&self, path: &str, token: Option<&str>) -> Response {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.header("authorization", token);
        }
        req.send().await.expect("Request failed")
    }

    pub async fn register(&self, email: &str) -> Response {
        self.post_json("/api/v1/auth/register", &registration(email))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_json(
            "/api/v1/auth/login",
            &json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Register an ordinary account and return its token
    pub async fn signed_in(&self, email: &str) -> String {
        let resp = self.register(email).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = self.login(email, PASSWORD).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("Invalid login body");
        body["token"].as_str().expect("No token").to_string()
    }

    /// Register a privileged account and return its token
    pub async fn signed_in_admin(&self, email: &str) -> String {
        let token = self.signed_in(email).await;
        let account = self
            .state
            .accounts
            .find_by_email(email)
            .await
            .unwrap()
            .expect("Account missing");
        self.state
            .accounts
            .update_by_id(&account.id, AccountUpdate::role(Role::Privileged))
            .await
            .unwrap();
        token
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
