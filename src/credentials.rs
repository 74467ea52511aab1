use std::fmt;

use crate::{CloudflareError, Result};

const AUTH_KEY_HEADER: &str = "X-Auth-Key";
const AUTH_EMAIL_HEADER: &str = "X-Auth-Email";
const AUTH_SERVICE_KEY_HEADER: &str = "X-Auth-User-Service-Key";

/// Authentication mode for the Cloudflare v4 API.
///
/// Exactly one mode is active per client, decided at construction and
/// never mixed afterwards.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// API token, sent as `Authorization: Bearer <token>`.
    Token(String),
    /// Legacy API key plus account email.
    KeyEmail { key: String, email: String },
}

impl Credentials {
    /// Builds token-mode credentials.
    ///
    /// If the token is missing the `Bearer ` prefix, it is added when the
    /// header is materialized.
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    /// Builds key/email-mode credentials.
    pub fn key_email(key: impl Into<String>, email: impl Into<String>) -> Self {
        Self::KeyEmail {
            key: key.into(),
            email: email.into(),
        }
    }

    /// Header name/value pairs for this mode.
    ///
    /// Key mode also sends the legacy `X-Auth-User-Service-Key` duplicate
    /// that some endpoints still expect.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Token(token) => {
                vec![("Authorization", normalize_bearer_authorization(token))]
            }
            Self::KeyEmail { key, email } => vec![
                (AUTH_KEY_HEADER, key.clone()),
                (AUTH_EMAIL_HEADER, email.clone()),
                (AUTH_SERVICE_KEY_HEADER, key.clone()),
            ],
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Self::Token(token) if token.trim().is_empty() => Err(
                CloudflareError::MissingConfiguration("api token is empty".to_owned()),
            ),
            Self::KeyEmail { key, .. } if key.trim().is_empty() => Err(
                CloudflareError::MissingConfiguration("api key is empty".to_owned()),
            ),
            Self::KeyEmail { email, .. } if email.trim().is_empty() => Err(
                CloudflareError::MissingConfiguration("email is empty".to_owned()),
            ),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
            Self::KeyEmail { email, .. } => f
                .debug_struct("KeyEmail")
                .field("key", &"<redacted>")
                .field("email", email)
                .finish(),
        }
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
