//! Authentication middleware
//!
//! The session resolver extracts and verifies the bearer token, re-fetches
//! the user record, and attaches it to the request; the role guards read the
//! attached identity and authorize (never authenticate). Guards are always
//! layered after the resolver.

use crate::auth::{DecodeError, Role};
use crate::error::AppError;
use crate::models::User;
use crate::state::{AppState, SharedState};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Resolve the authenticated identity behind a request's bearer token.
///
/// The user record is re-fetched from the store on every call, so a deleted
/// or role-changed account takes effect immediately instead of trusting
/// stale token claims. A deleted user is reported exactly like a forged
/// token.
pub async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let token = bearer_token(headers)
        .ok_or_else(|| AppError::Authentication("Access token required".to_string()))?;

    let claims = state.tokens.verify(token).map_err(|e| match e {
        DecodeError::Expired => AppError::Authentication("Token expired".to_string()),
        DecodeError::Malformed | DecodeError::InvalidSignature => {
            AppError::Authentication("Invalid token".to_string())
        }
    })?;

    state
        .users
        .find_by_id(claims.sub)
        .await
        .ok_or_else(|| AppError::Authentication("Invalid token".to_string()))
}

/// Session resolver middleware: attach the authenticated user to the request
pub async fn authenticate(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_identity(&state, request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Role guard: continue only for an attached administrator identity
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    require_role(&request, Role::Admin)?;
    Ok(next.run(request).await)
}

/// Role guard: continue only for an attached member identity
pub async fn require_member(request: Request, next: Next) -> Result<Response, AppError> {
    require_role(&request, Role::Member)?;
    Ok(next.run(request).await)
}

fn require_role(request: &Request, required: Role) -> Result<(), AppError> {
    // A missing identity rejects with 403: this guard only authorizes, the
    // resolver in front of it owns authentication.
    match request.extensions().get::<User>() {
        Some(user) if user.role == required => Ok(()),
        _ => Err(AppError::Authorization(
            match required {
                Role::Admin => "Admin access required",
                Role::Member => "Member access required",
            }
            .to_string(),
        )),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
