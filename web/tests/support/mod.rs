#![allow(dead_code)]
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use breezy_web::{
    api::BackendApi,
    app::router,
    config::Config,
    error::AppError,
    models::{
        AdminUserQuery, AuthenticatedUser, BanUpdate, Comment, ConfirmEmailRequest, FeedQuery,
        FollowEdge, ForgotPasswordRequest, MessageResponse, NewComment, NewPost, Post, Profile,
        ResetPasswordRequest, SignInRequest, SignUpRequest, UserSummary,
    },
    session::{Role, SessionCodec, SessionPayload},
    state::AppState,
};
use chrono::Duration;

pub const TEST_SECRET: &str = "integration-secret-that-is-long-enough-123";

pub fn test_config() -> Config {
    Config::from_lookup(|name| match name {
        "SESSION_SECRET" => Some(TEST_SECRET.to_string()),
        _ => None,
    })
    .expect("test config")
}

/// Backend double: accepts `sky` / `hunter22`, serves an empty feed, and
/// reports everything else as unavailable.
pub struct StubBackend;

fn unavailable<T>() -> Result<T, AppError> {
    Err(AppError::BadGateway("stub backend".to_string()))
}

#[async_trait]
impl BackendApi for StubBackend {
    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthenticatedUser, AppError> {
        if request.identifier == "sky" && request.password == "hunter22" {
            Ok(AuthenticatedUser {
                id: "u1".to_string(),
                username: "sky".to_string(),
                role: Role::User,
            })
        } else {
            Err(AppError::Unauthorized("Invalid credentials".to_string()))
        }
    }

    async fn sign_up(&self, _request: &SignUpRequest) -> Result<MessageResponse, AppError> {
        unavailable()
    }

    async fn forgot_password(
        &self,
        _request: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        unavailable()
    }

    async fn reset_password(
        &self,
        _request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        unavailable()
    }

    async fn confirm_email(
        &self,
        _request: &ConfirmEmailRequest,
    ) -> Result<MessageResponse, AppError> {
        unavailable()
    }

    async fn feed(&self, _user_id: &str, _query: &FeedQuery) -> Result<Vec<Post>, AppError> {
        Ok(Vec::new())
    }

    async fn create_post(&self, _post: &NewPost) -> Result<Post, AppError> {
        unavailable()
    }

    async fn get_post(&self, _post_id: &str) -> Result<Post, AppError> {
        unavailable()
    }

    async fn list_comments(&self, _post_id: &str) -> Result<Vec<Comment>, AppError> {
        unavailable()
    }

    async fn create_comment(&self, _comment: &NewComment) -> Result<Comment, AppError> {
        unavailable()
    }

    async fn get_profile(&self, _username: &str, _viewer_id: &str) -> Result<Profile, AppError> {
        unavailable()
    }

    async fn follow(&self, _edge: &FollowEdge) -> Result<(), AppError> {
        unavailable()
    }

    async fn unfollow(&self, _edge: &FollowEdge) -> Result<(), AppError> {
        unavailable()
    }

    async fn list_users(&self, _query: &AdminUserQuery) -> Result<Vec<UserSummary>, AppError> {
        unavailable()
    }

    async fn set_user_banned(&self, _user_id: &str, _update: &BanUpdate) -> Result<(), AppError> {
        unavailable()
    }

    async fn delete_post(&self, _post_id: &str, _moderator_id: &str) -> Result<(), AppError> {
        unavailable()
    }
}

pub fn test_app() -> Router {
    router(AppState::new(test_config(), Arc::new(StubBackend)))
}

pub fn session_cookie_with_ttl(user_id: &str, role: Role, ttl: Duration) -> String {
    let codec = SessionCodec::new(&test_config().session_secret);
    let payload = SessionPayload::new(user_id.to_string(), "sky".to_string(), role, ttl);
    let token = codec.encrypt(&payload).expect("encrypt session");
    format!("breezy_session={}", token)
}

pub fn session_cookie(user_id: &str, role: Role) -> String {
    session_cookie_with_ttl(user_id, role, Duration::days(7))
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}
