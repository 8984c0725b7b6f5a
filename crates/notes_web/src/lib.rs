//! HTTP front end for the notes application.
//!
//! # Responsibility
//! - Map the named routes onto handlers and the session layer.
//! - Translate core results into pages, redirects and status codes.
//!
//! # Invariants
//! - The database lock is never held across an `.await`.
//! - Core invariants (slug uniqueness, ownership) are enforced in
//!   `notes_core`; this crate only renders their outcomes.

pub mod auth;
pub mod error;
pub mod notes;
pub mod pages;
pub mod routes;
pub mod settings;
pub mod state;
pub mod telemetry;

pub use error::AppError;
pub use routes::Route;
pub use settings::Settings;
pub use state::AppState;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use log::info;
use routes::{
    ADD_PATH, DELETE_PATTERN, DETAIL_PATTERN, EDIT_PATTERN, HOME_PATH, LIST_PATH, LOGIN_PATH,
    LOGOUT_PATH, SIGNUP_PATH, SUCCESS_PATH,
};
use settings::SessionSettings;
use tokio::net::TcpListener;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Builds the application router with sessions and request logging.
pub fn build_router(state: AppState, session: &SessionSettings) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(session.secure_cookie)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(
            session.inactivity_days.max(1),
        )));

    Router::new()
        .route(HOME_PATH, get(notes::home))
        .route(LOGIN_PATH, get(auth::login_page).post(auth::login))
        .route(LOGOUT_PATH, get(auth::logout).post(auth::logout))
        .route(SIGNUP_PATH, get(auth::signup_page).post(auth::signup))
        .route(LIST_PATH, get(notes::list))
        .route(ADD_PATH, get(notes::add_page).post(notes::add))
        .route(DETAIL_PATTERN, get(notes::detail))
        .route(EDIT_PATTERN, get(notes::edit_page).post(notes::edit))
        .route(
            DELETE_PATTERN,
            get(notes::delete_page)
                .post(notes::delete)
                .delete(notes::delete),
        )
        .route(SUCCESS_PATH, get(notes::success))
        .fallback(notes::not_found)
        .with_state(state)
        .layer(session_layer)
        .layer(middleware::from_fn(telemetry::log_request))
}

/// Serves the application on `settings.server.bind` until Ctrl-C.
pub async fn serve(settings: &Settings, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(&settings.server.bind).await?;
    info!(
        "event=server_start module=web status=ok bind={}",
        listener.local_addr()?
    );

    axum::serve(listener, build_router(state, &settings.session))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=web status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
