//! Route definitions and router setup
//!
//! Configures all API routes and middleware. Guarded route groups stack the
//! session resolver under the role guard so authentication always runs
//! before authorization.

mod admin;
mod auth;
mod member;
mod vacancies;

use crate::auth::{authenticate, require_admin, require_member};
use crate::config::Settings;
use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    http::{header, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;
use uuid::Uuid;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(&state.settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    // Session-backed auth routes
    let session_routes = Router::new()
        .route("/me", get(auth::me))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(session_routes);

    // Public listings plus the member-only application flow
    let apply_routes = Router::new()
        .route("/{id}/apply", post(vacancies::apply))
        .route_layer(from_fn(require_member))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let vacancy_routes = Router::new()
        .route("/", get(vacancies::list_vacancies))
        .route("/{id}", get(vacancies::vacancy_details))
        .merge(apply_routes);

    let member_routes = Router::new()
        .route("/applications", get(member::list_applications))
        .route("/applications/{id}", get(member::application_details))
        .route_layer(from_fn(require_member))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            get(admin::user_details)
                .put(admin::update_user)
                .delete(admin::delete_user),
        )
        .route(
            "/vacancies",
            get(admin::list_vacancies).post(admin::create_vacancy),
        )
        .route(
            "/vacancies/{id}",
            put(admin::update_vacancy).delete(admin::delete_vacancy),
        )
        .route("/applications", get(admin::list_applications))
        .route("/applications/{id}", put(admin::update_application))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    // Build the router
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/vacancies", vacancy_routes)
        .nest("/api/member", member_routes)
        .nest("/api/admin", admin_routes)
        .layer(middleware)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    }
}

/// Parse a path id. Ids are opaque to clients, so a malformed value reads
/// the same as a missing record.
fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(not_found.to_string()))
}

/// Drop empty strings so they read as absent, like the rest of the API
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared helpers for exercising the router in tests

    use crate::auth::{hash_password, Role};
    use crate::config::Settings;
    use crate::models::User;
    use crate::state::{AppState, SharedState};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use std::sync::Arc;
    use tower::ServiceExt;

    pub(crate) fn test_state() -> SharedState {
        Arc::new(AppState::new(Settings::default()))
    }

    /// Insert a user and mint a token for them
    pub(crate) async fn seed_user(
        state: &SharedState,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> (User, String) {
        let user = state
            .users
            .create(User::new(email, hash_password(password).unwrap(), name, role))
            .await
            .unwrap();
        let token = state.tokens.issue(user.id).unwrap();
        (user, token)
    }

    pub(crate) fn json_request(
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    /// Send one request and decode the JSON response body
    pub(crate) async fn send(
        router: Router,
        request: Request<Body>,
    ) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
