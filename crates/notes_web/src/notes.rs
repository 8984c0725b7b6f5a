//! Note page handlers.
//!
//! Every handler except `home` requires a logged-in user; notes of other
//! authors answer 404 exactly like missing ones.

use crate::auth::{found, session_user, CurrentUser};
use crate::error::AppError;
use crate::pages;
use crate::routes::Route;
use crate::state::AppState;
use axum::extract::{Form, Path, State};
use axum::response::{Html, IntoResponse, Response};
use notes_core::{FormErrors, NoteInput, NoteServiceError};
use tower_sessions::Session;

pub async fn home(session: Session, State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let user = session_user(&session, &state).await?;
    Ok(pages::home(user.as_ref()))
}

pub async fn list(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let notes = state.with_notes(|notes| notes.list_notes(user.id)).await??;
    Ok(pages::note_list(&user, &notes))
}

pub async fn add_page(CurrentUser(user): CurrentUser) -> Html<String> {
    pages::note_form(&user, None, &NoteInput::default(), &FormErrors::new())
}

pub async fn add(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Form(input): Form<NoteInput>,
) -> Result<Response, AppError> {
    let outcome = state
        .with_notes(|notes| notes.create_note(user.id, &input))
        .await?;
    match outcome {
        Ok(_) => Ok(found(&Route::Success.path())),
        Err(NoteServiceError::Invalid(errors)) => {
            Ok(pages::note_form(&user, None, &input, &errors).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn success(CurrentUser(user): CurrentUser) -> Html<String> {
    pages::success(&user)
}

pub async fn detail(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let note = state.with_notes(|notes| notes.get_note(user.id, &slug)).await??;
    Ok(pages::note_detail(&user, &note))
}

pub async fn edit_page(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let note = state.with_notes(|notes| notes.get_note(user.id, &slug)).await??;
    Ok(pages::note_form(
        &user,
        Some(&note.slug),
        &NoteInput::from_note(&note),
        &FormErrors::new(),
    ))
}

pub async fn edit(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(input): Form<NoteInput>,
) -> Result<Response, AppError> {
    let outcome = state
        .with_notes(|notes| notes.update_note(user.id, &slug, &input))
        .await?;
    match outcome {
        Ok(_) => Ok(found(&Route::Success.path())),
        Err(NoteServiceError::Invalid(errors)) => {
            Ok(pages::note_form(&user, Some(&slug), &input, &errors).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_page(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let note = state.with_notes(|notes| notes.get_note(user.id, &slug)).await??;
    Ok(pages::delete_confirm(&user, &note))
}

/// Hard-deletes the note. Served for both `POST` and `DELETE`.
pub async fn delete(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    state.with_notes(|notes| notes.delete_note(user.id, &slug)).await??;
    Ok(found(&Route::Success.path()))
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
