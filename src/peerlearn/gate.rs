//! Access gate: the per-request allow/redirect decision.
//!
//! Runs ahead of routing for every request. Protected pages require a
//! session, auth pages bounce signed-in users back to the dashboard, and
//! everything else passes through untouched.

use axum::{
    extract::{Extension, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::peerlearn::handlers::extract_session_token;
use crate::peerlearn::state::AppState;
use crate::platform::SessionStatus;

/// Prefixes that require a session.
pub const PROTECTED_PREFIXES: [&str; 5] = [
    "/dashboard",
    "/profile",
    "/study-rooms",
    "/notes",
    "/quizzes",
];

/// Prefixes that signed-in users are bounced away from.
pub const AUTH_PAGE_PREFIXES: [&str; 2] = ["/auth/login", "/auth/signup"];

pub const LOGIN_PATH: &str = "/auth/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Forward the request unchanged.
    Proceed,
    /// Protected page without a session.
    RedirectToLogin,
    /// Auth page with an active session.
    RedirectToDashboard,
    /// Session resolution failed on a protected page. Surfaced as 503
    /// rather than conflated with "signed out".
    Unavailable,
}

fn matches_any(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix))
}

/// Whether the gate inspects this path at all. Paths outside both prefix
/// sets never trigger a session lookup.
#[must_use]
pub fn is_gated(path: &str) -> bool {
    matches_any(path, &PROTECTED_PREFIXES) || matches_any(path, &AUTH_PAGE_PREFIXES)
}

/// The decision function. Pure and stateless: identical input always yields
/// the identical decision, and session state is never mutated.
#[must_use]
pub fn decide(path: &str, session: &SessionStatus) -> GateDecision {
    // Rule 1 before rule 2; the configured prefixes cannot match both sets.
    if matches_any(path, &PROTECTED_PREFIXES) {
        return match session {
            SessionStatus::Authenticated(_) => GateDecision::Proceed,
            SessionStatus::Unauthenticated => GateDecision::RedirectToLogin,
            SessionStatus::ProviderError(_) => GateDecision::Unavailable,
        };
    }

    if matches_any(path, &AUTH_PAGE_PREFIXES) && session.is_authenticated() {
        return GateDecision::RedirectToDashboard;
    }

    GateDecision::Proceed
}

/// Axum middleware wrapping [`decide`].
///
/// Resolves the session once and stores the outcome in request extensions so
/// downstream handlers can reuse it.
pub async fn intercept(
    Extension(state): Extension<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if !is_gated(&path) {
        return next.run(request).await;
    }

    let status = match extract_session_token(request.headers()) {
        None => SessionStatus::Unauthenticated,
        Some(token) => state.sessions().current_session(&token).await,
    };

    let decision = decide(&path, &status);

    if let SessionStatus::ProviderError(reason) = &status {
        error!(path = %path, "session resolution failed: {reason}");
    }

    request.extensions_mut().insert(status);

    match decision {
        GateDecision::Proceed => next.run(request).await,
        GateDecision::RedirectToLogin => Redirect::temporary(LOGIN_PATH).into_response(),
        GateDecision::RedirectToDashboard => Redirect::temporary(DASHBOARD_PATH).into_response(),
        GateDecision::Unavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Session service is unavailable".to_string(),
        )
            .into_response(),
    }
}
