//! Vacancy Board API - Job Listing and Application Service
//!
//! Small hiring backend with two roles. Admins publish job vacancies and
//! review incoming applications; members browse openings and apply.
//!
//! Sessions are JWT based. The token is returned in the response body and
//! mirrored in an HttpOnly cookie, and API clients send it back as a
//! Bearer header. All data lives in in-memory stores and a bootstrap
//! admin account is seeded at startup.

mod auth;
mod config;
mod error;
mod models;
mod pagination;
mod routes;
mod state;
mod store;

use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting Vacancy Board API...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    if settings.auth.uses_default_secret() {
        warn!("⚠️  JWT_SECRET not set, using default (INSECURE - set in production!)");
    }

    let addr = SocketAddr::from((settings.server.host, settings.server.port));
    let state = Arc::new(AppState::new(settings));

    // Seed the bootstrap admin so a fresh deployment is usable immediately
    state
        .users
        .seed_admin(
            &state.settings.admin.email,
            &state.settings.admin.password,
            &state.settings.admin.name,
        )
        .await?;
    info!("✅ Admin account ready: {}", state.settings.admin.email);

    // Build the router
    let app = create_router(state);

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Authentication ───");
    info!("   POST   /api/auth/register        - Register new account");
    info!("   POST   /api/auth/login           - Login with email/password");
    info!("   POST   /api/auth/logout          - Clear the session cookie");
    info!("   GET    /api/auth/me              - Get current user");
    info!("");
    info!("   ─── Job Vacancies (public) ───");
    info!("   GET    /api/vacancies            - List vacancies");
    info!("   GET    /api/vacancies/:id        - Vacancy details");
    info!("   POST   /api/vacancies/:id/apply  - Apply (Member only)");
    info!("");
    info!("   ─── Member Portal ───");
    info!("   GET    /api/member/applications     - My applications");
    info!("   GET    /api/member/applications/:id - Application details");
    info!("");
    info!("   ─── Administration (Admin only) ───");
    info!("   GET    /api/admin/users              - List users");
    info!("   POST   /api/admin/users              - Create user");
    info!("   GET    /api/admin/users/:id          - User details");
    info!("   PUT    /api/admin/users/:id          - Update user");
    info!("   DELETE /api/admin/users/:id          - Delete user");
    info!("   GET    /api/admin/vacancies          - List all vacancies");
    info!("   POST   /api/admin/vacancies          - Create vacancy");
    info!("   PUT    /api/admin/vacancies/:id      - Update vacancy");
    info!("   DELETE /api/admin/vacancies/:id      - Delete vacancy");
    info!("   GET    /api/admin/applications       - List all applications");
    info!("   PUT    /api/admin/applications/:id   - Update application status");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vacancy_board_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
