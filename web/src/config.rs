use std::{env, fmt, net::SocketAddr, time::Duration};

use thiserror::Error;
use url::Url;

use crate::utils::cookies::{CookieOptions, SameSite};

pub const MIN_SESSION_SECRET_BYTES: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SESSION_SECRET is not set")]
    MissingSessionSecret,
    #[error("SESSION_SECRET must be at least {min} bytes (got {actual})")]
    ShortSessionSecret { min: usize, actual: usize },
    #[error("Invalid {name} value: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// HMAC key used to sign session tokens. Only constructible with a key long
/// enough to be accepted.
#[derive(Clone)]
pub struct SessionSecret(String);

impl SessionSecret {
    pub fn new(raw: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ConfigError::MissingSessionSecret);
        }
        if raw.len() < MIN_SESSION_SECRET_BYTES {
            return Err(ConfigError::ShortSessionSecret {
                min: MIN_SESSION_SECRET_BYTES,
                actual: raw.len(),
            });
        }
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn masked(&self) -> String {
        let prefix = self.0.chars().take(4).collect::<String>();
        format!("{}*** (len={})", prefix, self.0.len())
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionSecret").field(&self.masked()).finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub api_base_url: Url,
    pub session_secret: SessionSecret,
    pub production_mode: bool,
    pub cors_allow_origins: Vec<String>,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_secret = lookup("SESSION_SECRET")
            .ok_or(ConfigError::MissingSessionSecret)
            .and_then(SessionSecret::new)?;

        let bind_addr_raw = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: "BIND_ADDR",
                value: bind_addr_raw.clone(),
            })?;

        let api_base_raw =
            lookup("BREEZY_API_URL").unwrap_or_else(|| "http://localhost:8080".to_string());
        let api_base_url = Url::parse(&api_base_raw).map_err(|_| ConfigError::InvalidValue {
            name: "BREEZY_API_URL",
            value: api_base_raw.clone(),
        })?;

        let production_mode = lookup("APP_ENV")
            .map(|value| value.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let cors_allow_origins = lookup("CORS_ALLOW_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let timeout_raw = lookup("UPSTREAM_TIMEOUT_SECONDS").unwrap_or_else(|| "10".to_string());
        let timeout_secs: u64 = timeout_raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: "UPSTREAM_TIMEOUT_SECONDS",
                value: timeout_raw.clone(),
            })?;

        Ok(Config {
            bind_addr,
            api_base_url,
            session_secret,
            production_mode,
            cors_allow_origins,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn cookie_options(&self) -> CookieOptions {
        CookieOptions {
            secure: self.production_mode,
            same_site: SameSite::Lax,
        }
    }
}
