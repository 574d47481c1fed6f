pub mod auth;
pub mod dashboard;
pub mod health;
pub mod pages;
pub mod root;

// common functions for the handlers
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{InvalidHeaderValue, AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap, HeaderValue, StatusCode,
    },
};
use regex::Regex;

use crate::peerlearn::state::AppConfig;
use crate::platform::{Session, SessionStatus};

pub const SESSION_COOKIE_NAME: &str = "peerlearn_session";

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

pub fn valid_phone(phone: &str) -> bool {
    Regex::new(r"^\+?[0-9]{7,15}$").is_ok_and(|re| re.is_match(phone))
}

/// Pull the session token from the request, cookie first, bearer as fallback.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(header) = headers.get(COOKIE) {
        if let Ok(value) = header.to_str() {
            for pair in value.split(';') {
                let mut parts = pair.trim().splitn(2, '=');
                if let (Some(key), Some(val)) = (parts.next(), parts.next()) {
                    if key.trim() == SESSION_COOKIE_NAME && !val.trim().is_empty() {
                        return Some(val.trim().to_string());
                    }
                }
            }
        }
    }

    extract_bearer_token(headers)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Cookie that drops the session on the client.
/// Sent even when the platform-side logout fails.
pub fn clear_session_cookie(config: &AppConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie =
        format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// The signed-in user, resolved by the access gate.
///
/// Handlers behind the gate extract this instead of querying the session
/// provider a second time.
pub struct CurrentUser(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<SessionStatus>() {
            Some(SessionStatus::Authenticated(session)) => Ok(Self(session.clone())),
            _ => Err((StatusCode::UNAUTHORIZED, "Not signed in")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_simple() {
        assert!(valid_email("user@example.com"));
    }

    #[test]
    fn valid_email_rejects_missing_at() {
        assert!(!valid_email("user.example.com"));
    }

    #[test]
    fn valid_email_rejects_missing_domain() {
        assert!(!valid_email("user@"));
    }

    #[test]
    fn valid_phone_accepts_e164() {
        assert!(valid_phone("+12025550123"));
        assert!(valid_phone("2025550123"));
    }

    #[test]
    fn valid_phone_rejects_letters_and_short_numbers() {
        assert!(!valid_phone("phone"));
        assert!(!valid_phone("+1-202-555"));
        assert!(!valid_phone("12345"));
    }

    #[test]
    fn extract_session_token_reads_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; peerlearn_session=tok-123"),
        );
        assert_eq!(extract_session_token(&headers), Some("tok-123".to_string()));
    }

    #[test]
    fn extract_session_token_falls_back_to_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok-456"));
        assert_eq!(extract_session_token(&headers), Some("tok-456".to_string()));
    }

    #[test]
    fn extract_session_token_none_when_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn clear_session_cookie_expires_immediately() {
        let config = AppConfig::new("http://localhost:3000".to_string());
        let cookie = clear_session_cookie(&config).expect("cookie builds");
        let value = cookie.to_str().expect("cookie is ascii");
        assert!(value.starts_with("peerlearn_session=;"));
        assert!(value.contains("Max-Age=0"));
        assert!(!value.contains("Secure"));

        let config = AppConfig::new("https://peerlearn.dev".to_string());
        let cookie = clear_session_cookie(&config).expect("cookie builds");
        assert!(cookie.to_str().expect("cookie is ascii").contains("Secure"));
    }
}
