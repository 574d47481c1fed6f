//! Auth endpoints: page contexts, the two-step signup commit, OAuth redirect
//! and logout.

use axum::{
    extract::{Extension, Query},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

use super::{clear_session_cookie, extract_session_token};
use crate::peerlearn::signup::{FieldEvent, SignupError, SignupFlow, SignupMethod};
use crate::peerlearn::state::AppState;

/// Identity methods offered on the signup page.
const SIGNUP_METHODS: [&str; 2] = ["email", "phone"];

/// Year options as rendered in the signup form's select control.
const YEAR_OPTIONS: [&str; 5] = ["1", "2", "3", "4", "5"];

#[derive(ToSchema, Serialize, Debug)]
pub struct LoginPage {
    title: &'static str,
    oauth_providers: Vec<String>,
    signup_path: &'static str,
}

#[utoipa::path(
    get,
    path = "/auth/login",
    responses(
        (status = 200, description = "Login page context", body = LoginPage),
        (status = 307, description = "Already signed in; redirected to the dashboard")
    ),
    tag = "auth"
)]
pub async fn login_page(state: Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(LoginPage {
        title: "Welcome back",
        oauth_providers: vec![state.config().oauth_provider().to_string()],
        signup_path: "/auth/signup",
    })
}

#[derive(ToSchema, Serialize, Debug)]
pub struct SignupPage {
    title: &'static str,
    methods: Vec<&'static str>,
    year_options: Vec<&'static str>,
    login_path: &'static str,
}

#[utoipa::path(
    get,
    path = "/auth/signup",
    responses(
        (status = 200, description = "Signup page context", body = SignupPage),
        (status = 307, description = "Already signed in; redirected to the dashboard")
    ),
    tag = "auth"
)]
pub async fn signup_page() -> impl IntoResponse {
    Json(SignupPage {
        title: "Create Your Account",
        methods: SIGNUP_METHODS.to_vec(),
        year_options: YEAR_OPTIONS.to_vec(),
        login_path: "/auth/login",
    })
}

/// Both signup steps in one submission; the flow re-validates each step.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub college: String,
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub year_of_study: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub message: String,
    pub redirect: Option<String>,
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created; email verification pending", body = SignupResponse),
        (status = 400, description = "A required field is missing or invalid", body = SignupResponse),
        (status = 502, description = "The platform rejected the signup", body = SignupResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn signup(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let request: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(SignupResponse {
                    message: "Missing payload".to_string(),
                    redirect: None,
                }),
            );
        }
    };

    debug!("signup request for {}", request.full_name);

    let method = match request.method.as_deref() {
        None | Some("email") => SignupMethod::Email,
        Some("phone") => SignupMethod::Phone,
        Some(other) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(SignupResponse {
                    message: format!("Unknown signup method: {other}"),
                    redirect: None,
                }),
            );
        }
    };

    let mut flow = SignupFlow::new();
    for event in [
        FieldEvent::Method(method),
        FieldEvent::FullName(request.full_name),
        FieldEvent::Email(request.email),
        FieldEvent::Phone(request.phone),
        FieldEvent::Password(request.password),
        FieldEvent::College(request.college),
        FieldEvent::University(request.university),
        FieldEvent::Course(request.course),
        FieldEvent::YearOfStudy(request.year_of_study),
    ] {
        flow.update(event);
    }

    // Step one gates step two exactly like the interactive flow does.
    if let Err(err) = flow.advance() {
        return (
            StatusCode::BAD_REQUEST,
            Json(SignupResponse {
                message: err.to_string(),
                redirect: None,
            }),
        );
    }

    match flow.submit(state.sessions(), state.profiles()).await {
        Ok(receipt) => (
            StatusCode::CREATED,
            Json(SignupResponse {
                message: receipt.message.to_string(),
                redirect: Some(receipt.redirect.to_string()),
            }),
        ),
        Err(SignupError::Validation(err)) => (
            StatusCode::BAD_REQUEST,
            Json(SignupResponse {
                message: err.to_string(),
                redirect: None,
            }),
        ),
        Err(err @ (SignupError::InFlight | SignupError::WrongStage)) => (
            StatusCode::CONFLICT,
            Json(SignupResponse {
                message: err.to_string(),
                redirect: None,
            }),
        ),
        Err(err) => {
            error!("Signup failed: {err}");
            (
                StatusCode::BAD_GATEWAY,
                Json(SignupResponse {
                    message: err.to_string(),
                    redirect: None,
                }),
            )
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct OauthQuery {
    pub provider: Option<String>,
}

#[utoipa::path(
    get,
    path = "/auth/oauth",
    params(
        ("provider" = Option<String>, Query, description = "OAuth provider name; defaults to the configured provider")
    ),
    responses(
        (status = 307, description = "Redirect to the provider's consent screen"),
        (status = 502, description = "The platform could not build the redirect"),
    ),
    tag = "auth"
)]
#[instrument(skip(state))]
pub async fn oauth(
    state: Extension<Arc<AppState>>,
    query: Query<OauthQuery>,
) -> impl IntoResponse {
    let config = state.config();
    let provider = query
        .0
        .provider
        .unwrap_or_else(|| config.oauth_provider().to_string());

    match state
        .sessions()
        .authorize_url(&provider, &config.oauth_callback_url())
        .await
    {
        Ok(url) => Redirect::temporary(&url).into_response(),
        Err(err) => {
            error!("OAuth signup failed: {err}");
            (StatusCode::BAD_GATEWAY, err.message()).into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 303, description = "Session destroyed and cookie cleared"),
    ),
    tag = "auth"
)]
#[instrument(skip(state, headers))]
pub async fn logout(state: Extension<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = extract_session_token(&headers) {
        if let Err(err) = state.sessions().sign_out(&token).await {
            error!("Failed to destroy session: {err}");
        }
    }

    // Always clear the cookie, even if the platform call failed.
    let mut response = Redirect::to("/").into_response();
    if let Ok(cookie) = clear_session_cookie(state.config()) {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    response
}
