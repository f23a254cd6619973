use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::SessionSecret;

/// Lifetime of a freshly minted session token and of its cookie.
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to sign session token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Authorization tier carried in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
    Moderator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Moderator => "moderator",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_moderate(&self) -> bool {
        matches!(self, Role::Admin | Role::Moderator)
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            _ => Err(serde::de::Error::unknown_variant(
                &s,
                &["user", "admin", "moderator"],
            )),
        }
    }
}

/// Identity data signed into the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub user_id: String,
    pub role: Role,
    pub username: String,
    /// UNIX timestamp (seconds) after which the session is invalid.
    pub expires_at: i64,
}

impl SessionPayload {
    pub fn new(user_id: String, username: String, role: Role, ttl: Duration) -> Self {
        Self {
            user_id,
            role,
            username,
            expires_at: (Utc::now() + ttl).timestamp(),
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: String,
    role: Role,
    username: String,
    expires_at: i64,
    exp: i64,
    iat: i64,
}

impl From<Claims> for SessionPayload {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
            username: claims.username,
            expires_at: claims.expires_at,
        }
    }
}

/// Signs and verifies session tokens (HS256 JWTs).
#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionCodec {
    pub fn new(secret: &SessionSecret) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn encrypt(&self, payload: &SessionPayload) -> Result<String, SessionError> {
        let claims = Claims {
            user_id: payload.user_id.clone(),
            role: payload.role,
            username: payload.username.clone(),
            expires_at: payload.expires_at,
            exp: payload.expires_at,
            iat: Utc::now().timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Returns the payload of a valid, unexpired token. Every failure
    /// collapses to `None`.
    pub fn decrypt(&self, token: &str) -> Option<SessionPayload> {
        self.decrypt_at(token, Utc::now().timestamp())
    }

    /// Like [`SessionCodec::decrypt`], with `now` used for the explicit
    /// `expiresAt` check. The envelope's `exp` is still validated by
    /// jsonwebtoken against the wall clock.
    pub fn decrypt_at(&self, token: &str, now: i64) -> Option<SessionPayload> {
        let claims = match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => data.claims,
            Err(err) => {
                match err.kind() {
                    ErrorKind::InvalidSignature => {
                        tracing::warn!("Rejected session token with invalid signature")
                    }
                    kind => tracing::debug!(error = ?kind, "Rejected session token"),
                }
                return None;
            }
        };

        let payload = SessionPayload::from(claims);
        if payload.is_expired_at(now) {
            tracing::debug!(
                user_id = %payload.user_id,
                expires_at = payload.expires_at,
                "Session token past expiresAt"
            );
            return None;
        }
        Some(payload)
    }
}
