use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{AdminUserQuery, BanUpdate, UserSummary},
    session::ModeratorSession,
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
    ModeratorSession(_moderator): ModeratorSession,
    Query(query): Query<AdminUserQuery>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    query.validate()?;
    Ok(Json(state.api.list_users(&query).await?))
}

pub async fn ban_user(
    State(state): State<AppState>,
    ModeratorSession(moderator): ModeratorSession,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if user_id == moderator.user_id() {
        return Err(AppError::BadRequest("You cannot ban yourself".to_string()));
    }
    set_banned(&state, moderator.user_id(), &user_id, true).await
}

pub async fn unban_user(
    State(state): State<AppState>,
    ModeratorSession(moderator): ModeratorSession,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    set_banned(&state, moderator.user_id(), &user_id, false).await
}

pub async fn delete_post(
    State(state): State<AppState>,
    ModeratorSession(moderator): ModeratorSession,
    Path(post_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.api.delete_post(&post_id, moderator.user_id()).await?;
    tracing::info!(
        moderator_id = %moderator.user_id(),
        post_id = %post_id,
        "Post removed by moderator"
    );
    Ok(StatusCode::NO_CONTENT)
}

async fn set_banned(
    state: &AppState,
    moderator_id: &str,
    user_id: &str,
    banned: bool,
) -> Result<StatusCode, AppError> {
    let update = BanUpdate {
        banned,
        moderator_id: moderator_id.to_string(),
    };
    state.api.set_user_banned(user_id, &update).await?;
    tracing::info!(moderator_id, user_id, banned, "User ban status changed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::{
        api::MockBackendApi,
        session::Role,
        test_support::{request, session_cookie, test_app},
    };
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn regular_users_are_forbidden() {
        let mut api = MockBackendApi::new();
        api.expect_list_users().never();
        let (app, store) = test_app(api);
        let cookie = session_cookie(&store, "u1", "sky", Role::User);

        let response = app
            .oneshot(request("GET", "/api/admin/users", Some(&cookie), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn moderators_can_list_users() {
        let mut api = MockBackendApi::new();
        api.expect_list_users()
            .withf(|query| query.search.as_deref() == Some("sky"))
            .returning(|_| Ok(vec![]));
        let (app, store) = test_app(api);
        let cookie = session_cookie(&store, "m1", "mod", Role::Moderator);

        let response = app
            .oneshot(request(
                "GET",
                "/api/admin/users?search=sky",
                Some(&cookie),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ban_records_acting_moderator() {
        let mut api = MockBackendApi::new();
        api.expect_set_user_banned()
            .withf(|user_id, update| {
                user_id == "u9" && update.banned && update.moderator_id == "a1"
            })
            .returning(|_, _| Ok(()));
        let (app, store) = test_app(api);
        let cookie = session_cookie(&store, "a1", "root", Role::Admin);

        let response = app
            .oneshot(request("POST", "/api/admin/users/u9/ban", Some(&cookie), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn self_ban_is_rejected() {
        let mut api = MockBackendApi::new();
        api.expect_set_user_banned().never();
        let (app, store) = test_app(api);
        let cookie = session_cookie(&store, "a1", "root", Role::Admin);

        let response = app
            .oneshot(request("POST", "/api/admin/users/a1/ban", Some(&cookie), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn moderator_can_remove_post() {
        let mut api = MockBackendApi::new();
        api.expect_delete_post()
            .withf(|post_id, moderator_id| post_id == "p1" && moderator_id == "m1")
            .returning(|_, _| Ok(()));
        let (app, store) = test_app(api);
        let cookie = session_cookie(&store, "m1", "mod", Role::Moderator);

        let response = app
            .oneshot(request("DELETE", "/api/admin/posts/p1", Some(&cookie), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
