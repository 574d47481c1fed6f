//! Dashboard view context.
//!
//! The context is built per request from the session and the profile row and
//! handed to the view whole; nothing dashboard-related lives in ambient
//! state.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use super::CurrentUser;
use crate::peerlearn::state::AppState;
use crate::platform::Profile;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub study_streak: u32,
    pub total_study_hours: u32,
    pub completed_quizzes: u32,
    pub connections: u64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct DashboardContext {
    pub user: UserSummary,
    pub profile: Profile,
    pub stats: DashboardStats,
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard context for the signed-in user", body = DashboardContext),
        (status = 307, description = "No session; redirected to login"),
        (status = 404, description = "The account has no profile row"),
        (status = 502, description = "The profile store rejected the lookup"),
    ),
    tag = "pages"
)]
#[instrument(skip(state, user), fields(user_id = %user.0.user_id))]
pub async fn dashboard(
    user: CurrentUser,
    state: Extension<Arc<AppState>>,
) -> impl IntoResponse {
    let CurrentUser(session) = user;

    let profile = match state.profiles().profile_by_id(session.user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, "Profile not found".to_string()).into_response();
        }
        Err(err) => {
            error!("Failed to fetch profile: {err}");
            return (StatusCode::BAD_GATEWAY, err.message()).into_response();
        }
    };

    // A failed connections count degrades to zero instead of failing the page.
    let connections = match state
        .profiles()
        .accepted_connection_count(session.user_id)
        .await
    {
        Ok(count) => count,
        Err(err) => {
            warn!("Failed to count connections: {err}");
            0
        }
    };

    let stats = DashboardStats {
        study_streak: profile.study_streak,
        connections,
        ..DashboardStats::default()
    };

    let context = DashboardContext {
        user: UserSummary {
            id: session.user_id,
            email: session.email,
        },
        profile,
        stats,
    };

    Json(context).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_default_to_zero() {
        let stats = DashboardStats::default();
        assert_eq!(
            stats,
            DashboardStats {
                study_streak: 0,
                total_study_hours: 0,
                completed_quizzes: 0,
                connections: 0,
            }
        );
    }
}
