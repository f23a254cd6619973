use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{FollowEdge, Profile},
    session::{CurrentSession, Session},
    state::AppState,
};

pub async fn get_profile(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(username): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let profile = state.api.get_profile(&username, session.user_id()).await?;
    Ok(Json(profile))
}

pub async fn follow(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let edge = follow_edge(&session, user_id)?;
    state.api.follow(&edge).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unfollow(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let edge = follow_edge(&session, user_id)?;
    state.api.unfollow(&edge).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn follow_edge(session: &Session, followee_id: String) -> Result<FollowEdge, AppError> {
    if followee_id == session.user_id() {
        return Err(AppError::BadRequest("You cannot follow yourself".to_string()));
    }
    Ok(FollowEdge {
        follower_id: session.user_id().to_string(),
        followee_id,
    })
}
