//! Server-rendered page shells. The access gate has already run for every
//! route here, so protected pages can rely on a session being present.

use axum::{
    extract::{Path, Query},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    middleware::access_gate::HOME_PATH,
    session::{MaybeSession, Session},
};

#[derive(Debug, Default, Deserialize)]
pub struct SignInQuery {
    pub from: Option<String>,
}

pub async fn landing(MaybeSession(session): MaybeSession) -> Html<String> {
    render_page("Breezy", "landing", session.as_ref(), "")
}

pub async fn sign_in(Query(query): Query<SignInQuery>) -> Html<String> {
    let return_to = safe_return_path(query.from.as_deref());
    let body = format!(
        r#"<form id="sign-in" data-return-to="{}"></form>"#,
        escape_html(return_to)
    );
    render_page("Sign in", "sign-in", None, &body)
}

pub async fn sign_up() -> Html<String> {
    render_page("Create your account", "sign-up", None, "")
}

pub async fn forgot_password() -> Html<String> {
    render_page("Forgot password", "forgot-password", None, "")
}

pub async fn reset_password() -> Html<String> {
    render_page("Reset password", "reset-password", None, "")
}

pub async fn confirm_email() -> Html<String> {
    render_page("Confirm email", "confirm-email", None, "")
}

pub async fn home(MaybeSession(session): MaybeSession) -> Html<String> {
    render_page("Home", "home", session.as_ref(), "")
}

pub async fn profile(
    MaybeSession(session): MaybeSession,
    Path(username): Path<String>,
) -> Html<String> {
    let title = format!("@{}", username);
    render_page(&title, "profile", session.as_ref(), "")
}

pub async fn post(MaybeSession(session): MaybeSession, Path(post_id): Path<String>) -> Html<String> {
    let body = format!(r#"<article data-post-id="{}"></article>"#, escape_html(&post_id));
    render_page("Post", "post", session.as_ref(), &body)
}

pub async fn admin(MaybeSession(session): MaybeSession) -> Response {
    match session {
        Some(session) if session.payload.role.can_moderate() => {
            render_page("Moderation", "admin", Some(&session), "").into_response()
        }
        _ => Redirect::temporary(HOME_PATH).into_response(),
    }
}

/// Post-sign-in destination; only same-site absolute paths are honored.
pub fn safe_return_path(from: Option<&str>) -> &str {
    match from {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => HOME_PATH,
    }
}

fn render_page(title: &str, page: &str, session: Option<&Session>, body: &str) -> Html<String> {
    let viewer = session
        .map(|s| {
            format!(
                r#"<header data-user-id="{}" data-role="{}">@{}</header>"#,
                escape_html(s.user_id()),
                s.payload.role.as_str(),
                escape_html(s.username())
            )
        })
        .unwrap_or_default();
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title></head>\
         <body data-page=\"{}\">{}<main>{}</main></body></html>",
        escape_html(title),
        page,
        viewer,
        body
    ))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
