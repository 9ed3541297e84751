//! HTTP API server

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{is_admin, require_sign_in, PasswordHasher, TokenManager};
use crate::config::Config;
use crate::error::Result;
use crate::store::{self, AccountStore};

use super::routes;

/// Application state shared across handlers. Built once at startup.
pub struct AppState {
    pub tokens: TokenManager,
    pub passwords: PasswordHasher,
    pub accounts: Arc<dyn AccountStore>,
}

impl AppState {
    pub fn new(config: &Config, accounts: Arc<dyn AccountStore>) -> Self {
        let tokens = TokenManager::new(
            config.auth.jwt_secret.as_bytes(),
            Duration::from_secs(config.auth.token_ttl_secs),
        );
        let passwords = PasswordHasher::new(config.auth.bcrypt_cost);

        Self {
            tokens,
            passwords,
            accounts,
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    config.validate()?;
    if config.auth.uses_default_secret() {
        tracing::warn!("auth.jwt_secret is the built-in default; set JWT_SECRET before going live");
    }

    let accounts = store::connect(&config).await?;
    let state = Arc::new(AppState::new(&config, accounts));

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, state).await
}

/// Serve the API on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    let app = create_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    // Layers added last run first: sign-in, then the admin check
    let admin: Router<SharedState> = Router::new()
        .route("/admin-auth", get(routes::gate_ok))
        .route("/test", get(routes::protected))
        .route_layer(from_fn_with_state(state.clone(), is_admin))
        .route_layer(from_fn_with_state(state.clone(), require_sign_in));

    let signed_in: Router<SharedState> = Router::new()
        .route("/user-auth", get(routes::gate_ok))
        .route("/profile", put(routes::update_profile))
        .route_layer(from_fn_with_state(state.clone(), require_sign_in));

    let auth = Router::new()
        .route("/register", post(routes::register))
        .route("/login", post(routes::login))
        .route("/forgot-password", post(routes::forgot_password))
        .merge(signed_in)
        .merge(admin);

    Router::new()
        .route("/api/health", get(routes::health))
        .nest("/api/v1/auth", auth)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
