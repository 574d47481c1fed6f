//! End-to-end tests for the access gate and the signup route, driven through
//! the full router with in-memory platform fakes.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use peerlearn::peerlearn::{
    router,
    state::{AppConfig, AppState},
};
use peerlearn::platform::{
    CreatedAccount, NewAccount, NewProfile, Note, PlatformError, Profile, ProfileStore, Session,
    SessionProvider, SessionStatus, StudyRoom,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

const VALID_TOKEN: &str = "valid-token";
const BROKEN_TOKEN: &str = "broken-token";

fn user_id() -> Uuid {
    Uuid::from_u128(7)
}

#[derive(Default)]
struct FakeSessions {
    accounts: Mutex<Vec<NewAccount>>,
    fail_create: bool,
    fail_sign_out: bool,
    fail_ping: bool,
}

#[async_trait]
impl SessionProvider for FakeSessions {
    async fn current_session(&self, token: &str) -> SessionStatus {
        match token {
            VALID_TOKEN => SessionStatus::Authenticated(Session {
                user_id: user_id(),
                email: Some("jane@example.com".to_string()),
                email_verified: true,
            }),
            BROKEN_TOKEN => SessionStatus::ProviderError("connection refused".to_string()),
            _ => SessionStatus::Unauthenticated,
        }
    }

    async fn create_account(
        &self,
        new_account: NewAccount,
    ) -> Result<CreatedAccount, PlatformError> {
        self.accounts
            .lock()
            .expect("accounts lock")
            .push(new_account.clone());
        if self.fail_create {
            return Err(PlatformError::Service(
                "User already registered".to_string(),
            ));
        }
        Ok(CreatedAccount {
            id: user_id(),
            email: Some(new_account.email),
        })
    }

    async fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
    ) -> Result<String, PlatformError> {
        Ok(format!(
            "https://auth.test/authorize?provider={provider}&redirect_to={redirect_to}"
        ))
    }

    async fn sign_out(&self, _token: &str) -> Result<(), PlatformError> {
        if self.fail_sign_out {
            return Err(PlatformError::Service("session not found".to_string()));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), PlatformError> {
        if self.fail_ping {
            return Err(PlatformError::Service("auth service is down".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakeProfiles {
    inserts: Mutex<Vec<NewProfile>>,
}

fn sample_profile() -> Profile {
    serde_json::from_value(json!({
        "id": user_id(),
        "email": "jane@example.com",
        "phone": null,
        "full_name": "Jane Doe",
        "avatar_url": null,
        "bio": null,
        "college": "MIT",
        "university": "MIT",
        "course": "CS",
        "year_of_study": 2,
        "subjects": [],
        "interests": null,
        "is_verified": true,
        "rating": 4.5,
        "total_reviews": 3,
        "study_streak": 6,
        "last_active": "2024-05-01T10:00:00Z",
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z",
    }))
    .expect("profile fixture parses")
}

#[async_trait]
impl ProfileStore for FakeProfiles {
    async fn insert_profile(&self, row: NewProfile) -> Result<(), PlatformError> {
        self.inserts.lock().expect("inserts lock").push(row);
        Ok(())
    }

    async fn profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, PlatformError> {
        if id == user_id() {
            Ok(Some(sample_profile()))
        } else {
            Ok(None)
        }
    }

    async fn list_rooms(&self) -> Result<Vec<StudyRoom>, PlatformError> {
        Ok(Vec::new())
    }

    async fn notes_by_owner(&self, _user_id: Uuid) -> Result<Vec<Note>, PlatformError> {
        Ok(Vec::new())
    }

    async fn accepted_connection_count(&self, _user_id: Uuid) -> Result<u64, PlatformError> {
        Ok(2)
    }

    async fn ping(&self) -> Result<(), PlatformError> {
        Ok(())
    }
}

struct TestApp {
    sessions: Arc<FakeSessions>,
    profiles: Arc<FakeProfiles>,
    router: axum::Router,
}

fn test_app(sessions: FakeSessions) -> TestApp {
    let sessions = Arc::new(sessions);
    let profiles = Arc::new(FakeProfiles::default());
    let state = Arc::new(AppState::new(
        sessions.clone(),
        profiles.clone(),
        AppConfig::new("http://localhost:3000".to_string()),
    ));
    TestApp {
        sessions,
        profiles,
        router: router(state),
    }
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request builds")
}

fn get_with_session(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, format!("peerlearn_session={token}"))
        .body(Body::empty())
        .expect("request builds")
}

fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

#[tokio::test]
async fn protected_routes_redirect_without_session() {
    for path in ["/dashboard", "/profile", "/study-rooms", "/notes", "/quizzes"] {
        let app = test_app(FakeSessions::default());
        let response = app.router.oneshot(get(path)).await.expect("router runs");
        assert_eq!(
            response.status(),
            StatusCode::TEMPORARY_REDIRECT,
            "path {path}"
        );
        assert_eq!(location(&response), "/auth/login", "path {path}");
    }
}

#[tokio::test]
async fn auth_pages_redirect_with_session() {
    for path in ["/auth/login", "/auth/signup"] {
        let app = test_app(FakeSessions::default());
        let response = app
            .router
            .oneshot(get_with_session(path, VALID_TOKEN))
            .await
            .expect("router runs");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/dashboard");
    }
}

#[tokio::test]
async fn auth_pages_render_without_session() {
    let app = test_app(FakeSessions::default());
    let response = app
        .router
        .oneshot(get("/auth/signup"))
        .await
        .expect("router runs");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["year_options"], json!(["1", "2", "3", "4", "5"]));
}

#[tokio::test]
async fn landing_page_ignores_session_state() {
    let app = test_app(FakeSessions::default());
    let response = app.router.oneshot(get("/")).await.expect("router runs");
    assert_eq!(response.status(), StatusCode::OK);

    let app = test_app(FakeSessions::default());
    let response = app
        .router
        .oneshot(get_with_session("/", VALID_TOKEN))
        .await
        .expect("router runs");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn provider_failure_yields_service_unavailable() {
    let app = test_app(FakeSessions::default());
    let response = app
        .router
        .oneshot(get_with_session("/dashboard", BROKEN_TOKEN))
        .await
        .expect("router runs");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn dashboard_builds_context_for_signed_in_user() {
    let app = test_app(FakeSessions::default());
    let response = app
        .router
        .oneshot(get_with_session("/dashboard", VALID_TOKEN))
        .await
        .expect("router runs");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["profile"]["full_name"], json!("Jane Doe"));
    assert_eq!(body["stats"]["study_streak"], json!(6));
    assert_eq!(body["stats"]["connections"], json!(2));
    assert_eq!(body["stats"]["total_study_hours"], json!(0));
}

#[tokio::test]
async fn signup_commits_account_then_profile() {
    let app = test_app(FakeSessions::default());
    let payload = json!({
        "full_name": "Jane Doe",
        "email": "jane@example.com",
        "password": "secret1",
        "college": "MIT",
        "university": "MIT",
        "course": "CS",
        "year_of_study": "2",
    });

    let response = app
        .router
        .clone()
        .oneshot(post_json("/auth/signup", &payload))
        .await
        .expect("router runs");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["redirect"], json!("/auth/login"));

    let accounts = app.sessions.accounts.lock().expect("accounts lock");
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].email, "jane@example.com");
    assert_eq!(accounts[0].full_name, "Jane Doe");

    let inserts = app.profiles.inserts.lock().expect("inserts lock");
    assert_eq!(inserts.len(), 1);
    assert_eq!(inserts[0].year_of_study, Some(2));
    assert_eq!(inserts[0].subjects, Vec::<String>::new());
}

#[tokio::test]
async fn signup_rejects_short_password_locally() {
    let app = test_app(FakeSessions::default());
    let payload = json!({
        "full_name": "Jane Doe",
        "email": "jane@example.com",
        "password": "abc",
        "college": "MIT",
        "university": "MIT",
        "course": "CS",
        "year_of_study": "2",
    });

    let response = app
        .router
        .clone()
        .oneshot(post_json("/auth/signup", &payload))
        .await
        .expect("router runs");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.sessions.accounts.lock().expect("accounts lock").is_empty());
    assert!(app.profiles.inserts.lock().expect("inserts lock").is_empty());
}

#[tokio::test]
async fn signup_surfaces_provider_error() {
    let app = test_app(FakeSessions {
        fail_create: true,
        ..FakeSessions::default()
    });
    let payload = json!({
        "full_name": "Jane Doe",
        "email": "jane@example.com",
        "password": "secret1",
        "college": "MIT",
        "university": "MIT",
        "course": "CS",
        "year_of_study": "2",
    });

    let response = app
        .router
        .clone()
        .oneshot(post_json("/auth/signup", &payload))
        .await
        .expect("router runs");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = body_json(response).await;
    assert_eq!(body["message"], json!("User already registered"));
    assert!(app.profiles.inserts.lock().expect("inserts lock").is_empty());
}

#[tokio::test]
async fn oauth_redirects_to_provider() {
    let app = test_app(FakeSessions::default());
    let response = app
        .router
        .oneshot(get("/auth/oauth?provider=google"))
        .await
        .expect("router runs");
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let target = location(&response).to_string();
    assert!(target.starts_with("https://auth.test/authorize?provider=google"));
    assert!(target.contains("/auth/callback"));
}

#[tokio::test]
async fn logout_clears_cookie_even_when_provider_fails() {
    let app = test_app(FakeSessions {
        fail_sign_out: true,
        ..FakeSessions::default()
    });
    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(
            header::COOKIE,
            format!("peerlearn_session={VALID_TOKEN}"),
        )
        .body(Body::empty())
        .expect("request builds");

    let response = app.router.oneshot(request).await.expect("router runs");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.starts_with("peerlearn_session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn health_reports_dependencies() {
    let app = test_app(FakeSessions::default());
    let response = app
        .router
        .oneshot(get("/health"))
        .await
        .expect("router runs");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("X-App").is_some());

    let body = body_json(response).await;
    assert_eq!(body["session_provider"], json!("ok"));
    assert_eq!(body["profile_store"], json!("ok"));
}

#[tokio::test]
async fn health_degrades_when_a_dependency_is_down() {
    let app = test_app(FakeSessions {
        fail_ping: true,
        ..FakeSessions::default()
    });
    let response = app
        .router
        .oneshot(get("/health"))
        .await
        .expect("router runs");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["session_provider"], json!("error"));
    assert_eq!(body["profile_store"], json!("ok"));
}

#[tokio::test]
async fn study_rooms_require_and_use_session() {
    let app = test_app(FakeSessions::default());
    let response = app
        .router
        .oneshot(get_with_session("/study-rooms", VALID_TOKEN))
        .await
        .expect("router runs");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["rooms"], json!([]));
}
