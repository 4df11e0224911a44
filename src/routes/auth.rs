//! Authentication route handlers
//!
//! Provides register, login, logout, and current-user endpoints. Issued
//! tokens travel both in the JSON body and in an HttpOnly `token` cookie.

use crate::auth::{hash_password, resolve_identity, verify_password, Role};
use crate::error::{validation_error, AppError};
use crate::models::{MessageResponse, User, UserSummary};
use crate::routes::non_empty;
use crate::state::SharedState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================
// Request/Response Types
// ============================================

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
}

fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(("token", token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

// ============================================
// Route Handlers
// ============================================

/// POST /api/auth/register
///
/// Create an account. Role defaults to MEMBER; requesting ADMIN requires a
/// valid admin bearer token on the same request.
pub async fn register(
    State(state): State<SharedState>,
    headers: HeaderMap,
    jar: CookieJar,
    body: Option<Json<RegisterRequest>>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let req = body.map(|Json(b)| b).unwrap_or_default();

    // Validate input
    let (email, password, name) = match (
        non_empty(&req.email),
        non_empty(&req.password),
        non_empty(&req.name),
    ) {
        (Some(email), Some(password), Some(name)) => (email, password, name),
        _ => return Err(validation_error("Email, password, and name are required")),
    };

    // Resolve the requested role; ADMIN needs an admin granter
    let role = match non_empty(&req.role) {
        None => Role::default(),
        Some(raw) => {
            let requested = Role::parse(raw)
                .ok_or_else(|| validation_error("Role must be either ADMIN or MEMBER"))?;
            if requested == Role::Admin {
                let granter = resolve_identity(&state, &headers).await?;
                if !granter.role.is_admin() {
                    return Err(AppError::Authorization("Admin access required".to_string()));
                }
            }
            requested
        }
    };

    // Check if email already exists
    if state.users.find_by_email(email).await.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    // Hash password and persist
    let password_hash = hash_password(password)?;
    let user = state
        .users
        .create(User::new(email, password_hash, name, role))
        .await?;

    let token = state.tokens.issue(user.id)?;
    let jar = jar.add(session_cookie(&token, state.settings.auth.cookie_secure));

    info!("New {} account registered: {}", user.role, user.email);

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user: UserSummary::from(&user),
        }),
    ))
}

/// POST /api/auth/login
///
/// Authenticate with email and password, receive a JWT token.
pub async fn login(
    State(state): State<SharedState>,
    jar: CookieJar,
    body: Option<Json<LoginRequest>>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let req = body.map(|Json(b)| b).unwrap_or_default();

    let (email, password) = match (non_empty(&req.email), non_empty(&req.password)) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(validation_error("Email and password are required")),
    };

    // Unknown email and wrong password read identically
    let user = state
        .users
        .find_by_email(email)
        .await
        .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Authentication(
            "Invalid email or password".to_string(),
        ));
    }

    let token = state.tokens.issue(user.id)?;
    let jar = jar.add(session_cookie(&token, state.settings.auth.cookie_secure));

    info!("User logged in: {}", user.email);

    Ok((
        jar,
        Json(AuthResponse {
            message: "Login successful".to_string(),
            token,
            user: UserSummary::from(&user),
        }),
    ))
}

/// POST /api/auth/logout
///
/// Clear the token cookie. Stateless: previously issued tokens stay valid
/// until they expire.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::build(("token", "")).path("/").build());
    (jar, Json(MessageResponse::new("Logged out successfully")))
}

/// GET /api/auth/me
///
/// Return the authenticated user attached by the session resolver.
pub async fn me(Extension(user): Extension<User>) -> Json<MeResponse> {
    Json(MeResponse { user })
}
