//! Named routes and their URL paths.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in a `next` query value; `/` and unreserved marks stay.
const NEXT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/auth/login/";
pub const LOGOUT_PATH: &str = "/auth/logout/";
pub const SIGNUP_PATH: &str = "/auth/signup/";
pub const LIST_PATH: &str = "/notes/";
pub const ADD_PATH: &str = "/add/";
pub const DETAIL_PATTERN: &str = "/note/{slug}/";
pub const EDIT_PATTERN: &str = "/edit/{slug}/";
pub const DELETE_PATTERN: &str = "/delete/{slug}/";
pub const SUCCESS_PATH: &str = "/done/";

/// Every page the application serves, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Home,
    Login,
    Logout,
    Signup,
    List,
    Add,
    Success,
    Detail(&'a str),
    Edit(&'a str),
    Delete(&'a str),
}

impl Route<'_> {
    /// Namespaced route name, e.g. `notes:detail`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "notes:home",
            Self::Login => "users:login",
            Self::Logout => "users:logout",
            Self::Signup => "users:signup",
            Self::List => "notes:list",
            Self::Add => "notes:add",
            Self::Success => "notes:success",
            Self::Detail(_) => "notes:detail",
            Self::Edit(_) => "notes:edit",
            Self::Delete(_) => "notes:delete",
        }
    }

    /// Reverses the route into its URL path.
    pub fn path(&self) -> String {
        match self {
            Self::Home => HOME_PATH.to_string(),
            Self::Login => LOGIN_PATH.to_string(),
            Self::Logout => LOGOUT_PATH.to_string(),
            Self::Signup => SIGNUP_PATH.to_string(),
            Self::List => LIST_PATH.to_string(),
            Self::Add => ADD_PATH.to_string(),
            Self::Success => SUCCESS_PATH.to_string(),
            Self::Detail(slug) => format!("/note/{slug}/"),
            Self::Edit(slug) => format!("/edit/{slug}/"),
            Self::Delete(slug) => format!("/delete/{slug}/"),
        }
    }
}

/// Login URL carrying `target` as the post-login destination.
pub fn login_url(target: &str) -> String {
    format!(
        "{LOGIN_PATH}?next={}",
        utf8_percent_encode(target, NEXT_ENCODE_SET)
    )
}

/// Returns `next` when it is a local absolute path, so a login form cannot
/// bounce users to another origin.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    let next = next?.trim();
    let local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.starts_with("/\\")
        && !next.chars().any(char::is_control);
    local.then_some(next)
}
