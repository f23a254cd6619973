use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    error::AppError,
    session::store::{Session, SessionStore},
};

/// Session resolved by the access gate for this request. Stored in the
/// request extensions so page handlers do not verify the token twice.
#[derive(Debug, Clone)]
pub struct ResolvedSession(pub Option<Session>);

/// The current session if there is one.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

/// The current session; rejects with `401` when absent.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

/// The current session of an admin or moderator; `401` when absent,
/// `403` for other roles.
#[derive(Debug, Clone)]
pub struct ModeratorSession(pub Session);

fn resolve(parts: &Parts, store: &SessionStore) -> Option<Session> {
    match parts.extensions.get::<ResolvedSession>() {
        Some(ResolvedSession(session)) => session.clone(),
        None => store.get_session_from_headers(&parts.headers),
    }
}

impl<S> FromRequestParts<S> for MaybeSession
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = SessionStore::from_ref(state);
        Ok(MaybeSession(resolve(parts, &store)))
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = SessionStore::from_ref(state);
        resolve(parts, &store)
            .map(CurrentSession)
            .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))
    }
}

impl<S> FromRequestParts<S> for ModeratorSession
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        if !session.payload.role.can_moderate() {
            return Err(AppError::Forbidden(
                "Moderator or admin role required".to_string(),
            ));
        }
        Ok(ModeratorSession(session))
    }
}
