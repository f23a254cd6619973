use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use crate::{
    api::BackendApi,
    error::AppError,
    models::{
        AdminUserQuery, AuthenticatedUser, BanUpdate, Comment, ConfirmEmailRequest, FeedQuery,
        FollowEdge, ForgotPasswordRequest, MessageResponse, NewComment, NewPost, Post, Profile,
        ResetPasswordRequest, SignInRequest, SignUpRequest, UserSummary,
    },
};

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// [`BackendApi`] over HTTP/JSON.
#[derive(Clone)]
pub struct HttpBackendApi {
    client: Client,
    base_url: Url,
}

impl HttpBackendApi {
    pub fn new(base_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("backend URL cannot be a base: {}", base_url));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build backend HTTP client")?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = self.dispatch(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::BadGateway(format!("Malformed backend response: {}", err)))
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), AppError> {
        self.dispatch(request).await.map(|_| ())
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let response = request
            .send()
            .await
            .map_err(|err| AppError::BadGateway(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<UpstreamErrorBody>().await.ok();
        let message = body
            .and_then(|body| body.error.or(body.message))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Backend request failed")
                    .to_string()
            });
        tracing::debug!(status = status.as_u16(), error = %message, "Backend returned error");

        if status.is_server_error() {
            return Err(AppError::BadGateway(format!("{}: {}", status, message)));
        }
        Err(AppError::Upstream {
            status: client_status(status),
            message,
        })
    }
}

fn client_status(status: StatusCode) -> StatusCode {
    if status.is_client_error() {
        status
    } else {
        StatusCode::BAD_GATEWAY
    }
}

#[async_trait]
impl BackendApi for HttpBackendApi {
    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthenticatedUser, AppError> {
        let url = self.endpoint(&["auth", "sign-in"]);
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<MessageResponse, AppError> {
        let url = self.endpoint(&["auth", "sign-up"]);
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        let url = self.endpoint(&["auth", "forgot-password"]);
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        let url = self.endpoint(&["auth", "reset-password"]);
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn confirm_email(
        &self,
        request: &ConfirmEmailRequest,
    ) -> Result<MessageResponse, AppError> {
        let url = self.endpoint(&["auth", "confirm-email"]);
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn feed(&self, user_id: &str, query: &FeedQuery) -> Result<Vec<Post>, AppError> {
        let mut url = self.endpoint(&["users", user_id, "feed"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &query.effective_limit().to_string());
            if let Some(before) = &query.before {
                pairs.append_pair("before", before);
            }
        }
        self.send_json(self.client.get(url)).await
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, AppError> {
        let url = self.endpoint(&["posts"]);
        self.send_json(self.client.post(url).json(post)).await
    }

    async fn get_post(&self, post_id: &str) -> Result<Post, AppError> {
        let url = self.endpoint(&["posts", post_id]);
        self.send_json(self.client.get(url)).await
    }

    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, AppError> {
        let url = self.endpoint(&["posts", post_id, "comments"]);
        self.send_json(self.client.get(url)).await
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, AppError> {
        let url = self.endpoint(&["posts", &comment.post_id, "comments"]);
        self.send_json(self.client.post(url).json(comment)).await
    }

    async fn get_profile(&self, username: &str, viewer_id: &str) -> Result<Profile, AppError> {
        let mut url = self.endpoint(&["users", "by-username", username]);
        url.query_pairs_mut().append_pair("viewerId", viewer_id);
        self.send_json(self.client.get(url)).await
    }

    async fn follow(&self, edge: &FollowEdge) -> Result<(), AppError> {
        let url = self.endpoint(&["follows"]);
        self.send_empty(self.client.post(url).json(edge)).await
    }

    async fn unfollow(&self, edge: &FollowEdge) -> Result<(), AppError> {
        let url = self.endpoint(&["follows"]);
        self.send_empty(self.client.delete(url).json(edge)).await
    }

    async fn list_users(&self, query: &AdminUserQuery) -> Result<Vec<UserSummary>, AppError> {
        let mut url = self.endpoint(&["admin", "users"]);
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(search) = &query.search {
                pairs.append_pair("search", search);
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        self.send_json(self.client.get(url)).await
    }

    async fn set_user_banned(&self, user_id: &str, update: &BanUpdate) -> Result<(), AppError> {
        let url = self.endpoint(&["admin", "users", user_id, "ban"]);
        self.send_empty(self.client.put(url).json(update)).await
    }

    async fn delete_post(&self, post_id: &str, moderator_id: &str) -> Result<(), AppError> {
        let mut url = self.endpoint(&["admin", "posts", post_id]);
        url.query_pairs_mut().append_pair("moderatorId", moderator_id);
        self.send_empty(self.client.delete(url)).await
    }
}
