use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::peerlearn::state::AppState;
use crate::GIT_COMMIT_HASH;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DependencyStatus {
    Ok,
    Error,
}

impl DependencyStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }

    const fn is_healthy(self) -> bool {
        matches!(self, Self::Ok)
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    session_provider: String,
    profile_store: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Session provider and profile store are reachable", body = [Health]),
        (status = 503, description = "Session provider or profile store is unreachable", body = [Health])
    ),
    tag = "health"
)]
// axum handler for health
pub async fn health(method: Method, state: Extension<Arc<AppState>>) -> impl IntoResponse {
    let sessions = match state.sessions().ping().await {
        Ok(()) => DependencyStatus::Ok,
        Err(err) => {
            error!("Session provider is unreachable: {err}");
            DependencyStatus::Error
        }
    };

    let profiles = match state.profiles().ping().await {
        Ok(()) => DependencyStatus::Ok,
        Err(err) => {
            error!("Profile store is unreachable: {err}");
            DependencyStatus::Error
        }
    };

    let is_healthy = sessions.is_healthy() && profiles.is_healthy();

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        session_provider: sessions.as_str().to_string(),
        profile_store: profiles.as_str().to_string(),
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();

            headers.insert("X-App", x_app_header_value);

            headers
        })
        .map_err(|err| {
            error!("Failed to parse X-App header: {}", err);
        });

    let headers = headers.unwrap_or_else(|()| HeaderMap::new());

    if is_healthy {
        (StatusCode::OK, headers, body)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, headers, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_status_strings() {
        assert_eq!(DependencyStatus::Ok.as_str(), "ok");
        assert_eq!(DependencyStatus::Error.as_str(), "error");
        assert!(DependencyStatus::Ok.is_healthy());
        assert!(!DependencyStatus::Error.is_healthy());
    }
}
