use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use chrono::Duration;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        ConfirmEmailRequest, ForgotPasswordRequest, MessageResponse, ResetPasswordRequest,
        SignInRequest, SignUpRequest,
    },
    session::{CurrentSession, SessionPayload, SESSION_TTL_DAYS},
    state::AppState,
};

/// Checks credentials with the backend and mints the local session cookie.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user = state.api.sign_in(&payload).await?;

    let session = SessionPayload::new(
        user.id.clone(),
        user.username.clone(),
        user.role,
        Duration::days(SESSION_TTL_DAYS),
    );
    let cookie = state.sessions.create_session(&session)?;
    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User signed in");

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(user)))
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let response = state.api.sign_up(&payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn sign_out(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, state.sessions.delete_session())]),
        Json(MessageResponse::new("Signed out")),
    )
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;
    Ok(Json(state.api.forgot_password(&payload).await?))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;
    Ok(Json(state.api.reset_password(&payload).await?))
}

pub async fn confirm_email(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;
    Ok(Json(state.api.confirm_email(&payload).await?))
}

pub async fn current_session(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    Json(session)
}

#[cfg(test)]
mod tests {
    use crate::{
        api::MockBackendApi,
        models::AuthenticatedUser,
        session::Role,
        test_support::{json_body, request, session_cookie, test_app},
    };
    use axum::http::{header, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn sign_in_sets_session_cookie_and_returns_user() {
        let mut api = MockBackendApi::new();
        api.expect_sign_in()
            .withf(|req| req.identifier == "sky" && req.password == "hunter22")
            .returning(|_| {
                Ok(AuthenticatedUser {
                    id: "u1".into(),
                    username: "sky".into(),
                    role: Role::User,
                })
            });
        let (app, _) = test_app(api);

        let response = app
            .oneshot(request(
                "POST",
                "/api/auth/sign-in",
                None,
                Some(json!({"identifier": "sky", "password": "hunter22"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("breezy_session="));
        assert!(cookie.contains("Max-Age=604800"));
        let body = json_body(response).await;
        assert_eq!(body["username"], "sky");
    }

    #[tokio::test]
    async fn sign_in_validation_failure_skips_backend() {
        let mut api = MockBackendApi::new();
        api.expect_sign_in().never();
        let (app, _) = test_app(api);

        let response = app
            .oneshot(request(
                "POST",
                "/api/auth/sign-in",
                None,
                Some(json!({"identifier": "", "password": ""})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn sign_out_clears_cookie() {
        let (app, _) = test_app(MockBackendApi::new());
        let response = app
            .oneshot(request("POST", "/api/auth/sign-out", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn session_endpoint_requires_a_session() {
        let (app, _) = test_app(MockBackendApi::new());
        let response = app
            .oneshot(request("GET", "/api/auth/session", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn session_endpoint_returns_resolved_session() {
        let (app, store) = test_app(MockBackendApi::new());
        let cookie = session_cookie(&store, "u7", "gale", Role::Admin);
        let response = app
            .oneshot(request("GET", "/api/auth/session", Some(&cookie), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["userId"], "u7");
        assert_eq!(body["role"], "admin");
        assert_eq!(body["isLoggedIn"], true);
    }
}
