use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        Comment, CreateCommentRequest, CreatePostRequest, FeedQuery, NewComment, NewPost, Post,
    },
    session::CurrentSession,
    state::AppState,
};

pub async fn feed(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<Post>>, AppError> {
    query.validate()?;
    let posts = state.api.feed(session.user_id(), &query).await?;
    Ok(Json(posts))
}

pub async fn create_post(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    payload.validate()?;
    let post = state
        .api
        .create_post(&NewPost {
            author_id: session.user_id().to_string(),
            content: payload.content,
        })
        .await?;
    tracing::debug!(post_id = %post.id, author_id = %post.author_id, "Post created");
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<AppState>,
    CurrentSession(_session): CurrentSession,
    Path(post_id): Path<String>,
) -> Result<Json<Post>, AppError> {
    Ok(Json(state.api.get_post(&post_id).await?))
}

pub async fn list_comments(
    State(state): State<AppState>,
    CurrentSession(_session): CurrentSession,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    Ok(Json(state.api.list_comments(&post_id).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(post_id): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    payload.validate()?;
    let comment = state
        .api
        .create_comment(&NewComment {
            post_id,
            author_id: session.user_id().to_string(),
            content: payload.content,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
