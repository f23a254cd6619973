use std::time::Duration;

use axum::http::{header, HeaderMap, Request};
use serde::Serialize;

use crate::{
    config::Config,
    session::codec::{SessionCodec, SessionError, SessionPayload, SESSION_TTL_DAYS},
    utils::cookies::{
        build_clear_cookie, build_http_only_cookie, extract_cookie_value, CookieOptions,
        SESSION_COOKIE_NAME, SESSION_COOKIE_PATH,
    },
};

const SESSION_COOKIE_MAX_AGE: Duration =
    Duration::from_secs(SESSION_TTL_DAYS as u64 * 24 * 60 * 60);

/// A decoded, unexpired session for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(flatten)]
    pub payload: SessionPayload,
    pub is_logged_in: bool,
}

impl Session {
    fn logged_in(payload: SessionPayload) -> Self {
        Self {
            payload,
            is_logged_in: true,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.payload.user_id
    }

    pub fn username(&self) -> &str {
        &self.payload.username
    }
}

/// Binds the codec to the session cookie.
#[derive(Clone)]
pub struct SessionStore {
    codec: SessionCodec,
    cookie_options: CookieOptions,
}

impl SessionStore {
    pub fn new(codec: SessionCodec, cookie_options: CookieOptions) -> Self {
        Self {
            codec,
            cookie_options,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            SessionCodec::new(&config.session_secret),
            config.cookie_options(),
        )
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// Signs `payload` and returns the `Set-Cookie` value that stores it.
    pub fn create_session(&self, payload: &SessionPayload) -> Result<String, SessionError> {
        let token = self.codec.encrypt(payload)?;
        Ok(build_http_only_cookie(
            SESSION_COOKIE_NAME,
            &token,
            SESSION_COOKIE_MAX_AGE,
            SESSION_COOKIE_PATH,
            self.cookie_options,
        ))
    }

    /// `Set-Cookie` value that removes the session cookie.
    pub fn delete_session(&self) -> String {
        build_clear_cookie(SESSION_COOKIE_NAME, SESSION_COOKIE_PATH, self.cookie_options)
    }

    pub fn get_session_from_headers(&self, headers: &HeaderMap) -> Option<Session> {
        let token = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|raw| extract_cookie_value(raw, SESSION_COOKIE_NAME))?;
        self.codec.decrypt(token).map(Session::logged_in)
    }

    pub fn get_session_from_request<B>(&self, request: &Request<B>) -> Option<Session> {
        self.get_session_from_headers(request.headers())
    }
}
