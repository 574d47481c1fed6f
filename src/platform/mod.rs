//! Clients for the hosted auth/data platform.
//!
//! The platform owns every durable record: accounts and sessions live in its
//! auth service, profile/room/note rows in its data API. This module only
//! talks to it over HTTP; nothing is cached locally.

pub mod profiles;
pub mod schema;
pub mod session;

pub use profiles::{HttpProfileStore, ProfileStore};
pub use schema::{NewProfile, Note, Profile, RoomStatus, RoomType, StudyRoom};
pub use session::{
    CreatedAccount, HttpSessionProvider, NewAccount, Session, SessionProvider, SessionStatus,
};

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform answered with an error; the message is shown to the user.
    #[error("{0}")]
    Service(String),
    /// The platform could not be reached at all.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl PlatformError {
    /// Human-readable message, surfaced verbatim in responses.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

pub(crate) fn http_client() -> Result<Client, PlatformError> {
    Ok(Client::builder().user_agent(crate::APP_USER_AGENT).build()?)
}

/// Join the platform base URL with an endpoint path.
pub(crate) fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), endpoint)
}

/// Pull a human-readable message out of a platform error body.
///
/// The auth and data APIs disagree on the field name, so try the usual
/// suspects before falling back to the HTTP status.
pub(crate) async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let fallback = format!("Request failed with status {status}");

    let Ok(body) = response.json::<Value>().await else {
        return fallback;
    };

    for field in ["msg", "message", "error_description", "error"] {
        if let Some(message) = body.get(field).and_then(Value::as_str) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }

    fallback
}
