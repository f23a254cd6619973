//! Client side of the Breezy backend REST API.

pub mod http;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        AdminUserQuery, AuthenticatedUser, BanUpdate, Comment, ConfirmEmailRequest, FeedQuery,
        FollowEdge, ForgotPasswordRequest, MessageResponse, NewComment, NewPost, Post, Profile,
        ResetPasswordRequest, SignInRequest, SignUpRequest, UserSummary,
    },
};

pub use http::HttpBackendApi;

/// Every call this server makes to the backend.
///
/// Acting user ids are passed explicitly and always come from the caller's
/// session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthenticatedUser, AppError>;

    async fn sign_up(&self, request: &SignUpRequest) -> Result<MessageResponse, AppError>;

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, AppError>;

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, AppError>;

    async fn confirm_email(
        &self,
        request: &ConfirmEmailRequest,
    ) -> Result<MessageResponse, AppError>;

    /// Home feed of `user_id`, newest first.
    async fn feed(&self, user_id: &str, query: &FeedQuery) -> Result<Vec<Post>, AppError>;

    async fn create_post(&self, post: &NewPost) -> Result<Post, AppError>;

    async fn get_post(&self, post_id: &str) -> Result<Post, AppError>;

    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, AppError>;

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, AppError>;

    async fn get_profile(&self, username: &str, viewer_id: &str) -> Result<Profile, AppError>;

    async fn follow(&self, edge: &FollowEdge) -> Result<(), AppError>;

    async fn unfollow(&self, edge: &FollowEdge) -> Result<(), AppError>;

    async fn list_users(&self, query: &AdminUserQuery) -> Result<Vec<UserSummary>, AppError>;

    async fn set_user_banned(&self, user_id: &str, update: &BanUpdate) -> Result<(), AppError>;

    async fn delete_post(&self, post_id: &str, moderator_id: &str) -> Result<(), AppError>;
}
