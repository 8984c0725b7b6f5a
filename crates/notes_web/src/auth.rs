//! Session-backed authentication: the `CurrentUser` extractor and the
//! login, logout and signup handlers.
//!
//! # Invariants
//! - The session stores only the user id, under [`SESSION_USER_ID_KEY`].
//! - The session id is cycled on login and the session is flushed on logout.
//! - Anonymous requests to protected pages get `302` to the login page with the
//!   original path and query in `next`.
//! - Argon2 hashing and verification run on the blocking pool, never while the
//!   store lock is held.

use crate::error::AppError;
use crate::pages;
use crate::routes::{login_url, safe_next, Route};
use crate::state::AppState;
use axum::extract::{Form, FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use log::info;
use notes_core::model::form::REQUIRED_MESSAGE;
use notes_core::{
    check_credentials, AccountError, FormErrors, PreparedSignup, SignupInput, User, UserId,
    INVALID_LOGIN_MESSAGE,
};
use serde::Deserialize;
use tower_sessions::Session;

/// Key for storing the user id in the session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// `302 Found` pointing at `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Resolves the logged-in user, if any.
///
/// A stale or malformed session entry counts as anonymous.
pub async fn session_user(session: &Session, state: &AppState) -> Result<Option<User>, AppError> {
    let user_id: Option<String> = session.get(SESSION_USER_ID_KEY).await?;
    let Some(user_id) = user_id.and_then(|raw| UserId::parse_str(&raw).ok()) else {
        return Ok(None);
    };
    let user = state
        .with_accounts(|accounts| accounts.get_user(user_id))
        .await??;
    Ok(user)
}

/// Extracts the logged-in user or short-circuits with a login redirect.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match session_user(&session, state).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => {
                let target = parts
                    .uri
                    .path_and_query()
                    .map(|value| value.as_str())
                    .unwrap_or_else(|| parts.uri.path());
                Err(found(&login_url(target)))
            }
            Err(err) => Err(err.into_response()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

pub async fn login_page(Query(query): Query<NextQuery>) -> Html<String> {
    pages::login("", query.next.as_deref(), &FormErrors::new())
}

pub async fn login(
    session: Session,
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let mut errors = FormErrors::new();
    if form.username.trim().is_empty() {
        errors.add("username", REQUIRED_MESSAGE);
    }
    if form.password.is_empty() {
        errors.add("password", REQUIRED_MESSAGE);
    }
    if !errors.is_empty() {
        return Ok(pages::login(&form.username, form.next.as_deref(), &errors).into_response());
    }

    let credentials = state
        .with_accounts(|accounts| accounts.find_credentials(&form.username))
        .await??;
    let password = form.password.clone();
    let outcome =
        tokio::task::spawn_blocking(move || check_credentials(credentials, &password)).await?;

    let user = match outcome {
        Ok(user) => user,
        Err(AccountError::InvalidCredentials) => {
            let mut errors = FormErrors::new();
            errors.add_non_field(INVALID_LOGIN_MESSAGE);
            return Ok(
                pages::login(&form.username, form.next.as_deref(), &errors).into_response()
            );
        }
        Err(err) => return Err(err.into()),
    };

    session.cycle_id().await?;
    session
        .insert(SESSION_USER_ID_KEY, user.id.to_string())
        .await?;
    info!(
        "event=session_login module=web status=ok user_id={}",
        user.id
    );

    let home = Route::Home.path();
    let target = safe_next(form.next.as_deref()).unwrap_or(home.as_str());
    Ok(found(target))
}

/// Flushes the session. Served for both `GET` and `POST`.
pub async fn logout(session: Session) -> Result<Html<String>, AppError> {
    session.flush().await?;
    info!("event=session_logout module=web status=ok");
    Ok(pages::logged_out())
}

pub async fn signup_page() -> Html<String> {
    pages::signup("", &FormErrors::new())
}

pub async fn signup(
    State(state): State<AppState>,
    Form(input): Form<SignupInput>,
) -> Result<Response, AppError> {
    let blocking_input = input.clone();
    let prepared =
        tokio::task::spawn_blocking(move || PreparedSignup::new(&blocking_input)).await?;
    let outcome = match prepared {
        Ok(prepared) => {
            state
                .with_accounts(|accounts| accounts.register(prepared))
                .await?
        }
        Err(err) => Err(err),
    };

    match outcome {
        Ok(_) => Ok(found(&Route::Home.path())),
        Err(AccountError::Invalid(errors)) => {
            Ok(pages::signup(&input.username, &errors).into_response())
        }
        Err(err) => Err(err.into()),
    }
}
