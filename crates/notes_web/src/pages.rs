//! Server-rendered HTML pages.
//!
//! Every interpolated value goes through [`escape`].

use crate::routes::Route;
use axum::response::Html;
use notes_core::{FormErrors, Note, NoteInput, User};
use std::fmt::Write;

/// Escapes text for HTML element content and double-quoted attributes.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(title: &str, user: Option<&User>, body: &str) -> Html<String> {
    let nav = match user {
        Some(user) => format!(
            r#"<a href="{list}">Notes</a> <a href="{add}">Add note</a> <span class="user">{name}</span> <form method="post" action="{logout}" class="inline"><button type="submit">Log out</button></form>"#,
            list = Route::List.path(),
            add = Route::Add.path(),
            name = escape(&user.username),
            logout = Route::Logout.path(),
        ),
        None => format!(
            r#"<a href="{login}">Log in</a> <a href="{signup}">Sign up</a>"#,
            login = Route::Login.path(),
            signup = Route::Signup.path(),
        ),
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<header><a href="{home}">Notes</a> {nav}</header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        home = Route::Home.path(),
    ))
}

fn error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let mut html = String::from(r#"<ul class="errorlist">"#);
    for message in messages {
        let _ = write!(html, "<li>{}</li>", escape(message));
    }
    html.push_str("</ul>");
    html
}

fn text_input(label: &str, name: &str, kind: &str, value: &str, errors: &FormErrors) -> String {
    format!(
        r#"<p>{errors}<label for="id_{name}">{label}</label> <input type="{kind}" name="{name}" id="id_{name}" value="{value}"></p>"#,
        errors = error_list(errors.field(name)),
        value = escape(value),
    )
}

pub fn home(user: Option<&User>) -> Html<String> {
    let body = match user {
        Some(user) => format!(
            r#"<h1>Notes</h1><p>Signed in as {}. <a href="{}">Your notes</a></p>"#,
            escape(&user.username),
            Route::List.path()
        ),
        None => format!(
            r#"<h1>Notes</h1><p>Keep private notes. <a href="{}">Log in</a> or <a href="{}">sign up</a>.</p>"#,
            Route::Login.path(),
            Route::Signup.path()
        ),
    };
    layout("Notes", user, &body)
}

pub fn note_list(user: &User, notes: &[Note]) -> Html<String> {
    let mut body = String::from("<h1>Your notes</h1>");
    if notes.is_empty() {
        body.push_str(r#"<p class="empty">No notes yet.</p>"#);
    } else {
        body.push_str(r#"<ul class="notes">"#);
        for note in notes {
            let _ = write!(
                body,
                r#"<li><a href="{}">{}</a></li>"#,
                escape(&Route::Detail(&note.slug).path()),
                escape(&note.title)
            );
        }
        body.push_str("</ul>");
    }
    layout("Your notes", Some(user), &body)
}

/// Add form when `editing` is `None`, edit form for that slug otherwise.
pub fn note_form(
    user: &User,
    editing: Option<&str>,
    input: &NoteInput,
    errors: &FormErrors,
) -> Html<String> {
    let (heading, action) = match editing {
        Some(slug) => ("Edit note", Route::Edit(slug).path()),
        None => ("Add note", Route::Add.path()),
    };
    let body = format!(
        r#"<h1>{heading}</h1>
<form id="note-form" method="post" action="{action}">
{non_field}
{title}
<p>{text_errors}<label for="id_text">Text</label> <textarea name="text" id="id_text">{text}</textarea></p>
{slug}
<button type="submit">Save</button>
</form>"#,
        action = escape(&action),
        non_field = error_list(errors.non_field()),
        title = text_input("Title", "title", "text", &input.title, errors),
        text_errors = error_list(errors.field("text")),
        text = escape(&input.text),
        slug = text_input(
            "Slug",
            "slug",
            "text",
            input.slug.as_deref().unwrap_or_default(),
            errors
        ),
    );
    layout(heading, Some(user), &body)
}

pub fn note_detail(user: &User, note: &Note) -> Html<String> {
    let body = format!(
        r#"<article><h1>{title}</h1><p class="text">{text}</p><p class="slug">{slug}</p></article>
<p><a href="{edit}">Edit</a> <a href="{delete}">Delete</a></p>"#,
        title = escape(&note.title),
        text = escape(&note.text),
        slug = escape(&note.slug),
        edit = escape(&Route::Edit(&note.slug).path()),
        delete = escape(&Route::Delete(&note.slug).path()),
    );
    layout(&note.title, Some(user), &body)
}

pub fn delete_confirm(user: &User, note: &Note) -> Html<String> {
    let body = format!(
        r#"<h1>Delete note</h1><p>Delete “{title}”?</p>
<form method="post" action="{action}"><button type="submit">Delete</button></form>"#,
        title = escape(&note.title),
        action = escape(&Route::Delete(&note.slug).path()),
    );
    layout("Delete note", Some(user), &body)
}

pub fn success(user: &User) -> Html<String> {
    let body = format!(
        r#"<h1>Done</h1><p>Your change was saved. <a href="{}">Back to your notes</a></p>"#,
        Route::List.path()
    );
    layout("Done", Some(user), &body)
}

pub fn login(username: &str, next: Option<&str>, errors: &FormErrors) -> Html<String> {
    let next_field = next
        .map(|next| format!(r#"<input type="hidden" name="next" value="{}">"#, escape(next)))
        .unwrap_or_default();
    let body = format!(
        r#"<h1>Log in</h1>
<form id="login-form" method="post" action="{action}">
{non_field}
{username}
{password}
{next_field}
<button type="submit">Log in</button>
</form>"#,
        action = Route::Login.path(),
        non_field = error_list(errors.non_field()),
        username = text_input("Username", "username", "text", username, errors),
        password = text_input("Password", "password", "password", "", errors),
    );
    layout("Log in", None, &body)
}

pub fn logged_out() -> Html<String> {
    let body = format!(
        r#"<h1>Logged out</h1><p>You have been logged out. <a href="{}">Log in again</a></p>"#,
        Route::Login.path()
    );
    layout("Logged out", None, &body)
}

pub fn signup(username: &str, errors: &FormErrors) -> Html<String> {
    let body = format!(
        r#"<h1>Sign up</h1>
<form id="signup-form" method="post" action="{action}">
{non_field}
{username}
{password1}
{password2}
<button type="submit">Sign up</button>
</form>"#,
        action = Route::Signup.path(),
        non_field = error_list(errors.non_field()),
        username = text_input("Username", "username", "text", username, errors),
        password1 = text_input("Password", "password1", "password", "", errors),
        password2 = text_input("Password confirmation", "password2", "password", "", errors),
    );
    layout("Sign up", None, &body)
}

pub fn not_found() -> Html<String> {
    layout("Not found", None, "<h1>Not found</h1>")
}

pub fn server_error() -> Html<String> {
    layout("Server error", None, "<h1>Server error</h1>")
}

#[cfg(test)]
mod tests {
    use super::{escape, note_form};
    use notes_core::{FormErrors, NoteInput, User};

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn note_form_renders_values_and_field_errors() {
        let user = User::new("author");
        let input = NoteInput::new("<b>Title</b>", "Body").with_slug("taken");
        let errors = FormErrors::single("slug", "taken - already used");

        let html = note_form(&user, Some("taken"), &input, &errors).0;
        assert!(html.contains(r#"action="/edit/taken/""#));
        assert!(html.contains("&lt;b&gt;Title&lt;/b&gt;"));
        assert!(html.contains("taken - already used"));
        assert!(html.contains(r#"name="slug""#));
    }
}
