#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use notes_core::db::open_db_in_memory;
use notes_core::{Note, NoteInput, User};
use notes_web::settings::SessionSettings;
use notes_web::{build_router, AppState};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-42";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(open_db_in_memory().unwrap());
        let router = build_router(state.clone(), &SessionSettings::default());
        Self { router, state }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(request(Method::GET, path, cookie, None)).await
    }

    pub async fn post(&self, path: &str, cookie: Option<&str>, fields: &[(&str, &str)]) -> Response<Body> {
        self.send(request(Method::POST, path, cookie, Some(form(fields))))
            .await
    }

    pub async fn delete(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(request(Method::DELETE, path, cookie, None)).await
    }

    /// Signs `username` up, logs in and returns the session cookie pair.
    pub async fn login_as(&self, username: &str) -> String {
        let signup = self
            .post(
                "/auth/signup/",
                None,
                &[
                    ("username", username),
                    ("password1", PASSWORD),
                    ("password2", PASSWORD),
                ],
            )
            .await;
        assert_eq!(signup.status(), StatusCode::FOUND);

        let login = self
            .post(
                "/auth/login/",
                None,
                &[("username", username), ("password", PASSWORD)],
            )
            .await;
        assert_eq!(login.status(), StatusCode::FOUND);
        session_cookie(&login).expect("login sets a session cookie")
    }

    pub async fn user(&self, username: &str) -> User {
        self.state
            .with_accounts(|accounts| accounts.find_credentials(username))
            .await
            .unwrap()
            .unwrap()
            .expect("user exists")
            .0
    }

    pub async fn create_note(&self, author: &User, input: &NoteInput) -> Note {
        self.state
            .with_notes(|notes| notes.create_note(author.id, input))
            .await
            .unwrap()
            .unwrap()
    }

    /// The `Заголовок`/`Текст` note under slug `note-slug`.
    pub async fn seed_note(&self, author: &User) -> Note {
        self.create_note(author, &NoteInput::new("Заголовок", "Текст").with_slug("note-slug"))
            .await
    }

    pub async fn notes_of(&self, author: &User) -> Vec<Note> {
        self.state
            .with_notes(|notes| notes.list_notes(author.id))
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn count_notes(&self) -> u64 {
        self.state
            .with_notes(|notes| notes.count_notes())
            .await
            .unwrap()
            .unwrap()
    }
}

pub fn request(method: Method, path: &str, cookie: Option<&str>, body: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, NON_ALPHANUMERIC),
                utf8_percent_encode(value, NON_ALPHANUMERIC)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("id="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
