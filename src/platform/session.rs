//! Session provider client: account creation, session lookup, OAuth redirect
//! and logout against the hosted auth service.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, instrument};
use url::Url;
use uuid::Uuid;

use super::{endpoint_url, error_message, http_client, PlatformError};
use crate::cli::globals::GlobalArgs;

/// An active login session as reported by the auth service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub email_verified: bool,
}

/// Outcome of resolving a session token.
///
/// Provider failures are a separate branch on purpose: a platform outage must
/// not be mistaken for a signed-out visitor.
#[derive(Clone, Debug)]
pub enum SessionStatus {
    Authenticated(Session),
    Unauthenticated,
    ProviderError(String),
}

impl SessionStatus {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Credentials and metadata for a new account.
#[derive(Clone, Debug, Serialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// The account issued by the auth service on signup.
#[derive(Clone, Debug, Deserialize)]
pub struct CreatedAccount {
    pub id: Uuid,
    pub email: Option<String>,
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolves a session token into the current session, if any.
    async fn current_session(&self, token: &str) -> SessionStatus;

    /// Creates a new account with credentials and full-name metadata.
    async fn create_account(&self, new_account: NewAccount)
        -> Result<CreatedAccount, PlatformError>;

    /// Builds the provider-redirect URL for an OAuth signup.
    async fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
    ) -> Result<String, PlatformError>;

    /// Destroys the session behind the token, if it exists.
    async fn sign_out(&self, token: &str) -> Result<(), PlatformError>;

    /// Reachability probe used by the health endpoint.
    async fn ping(&self) -> Result<(), PlatformError>;
}

/// [`SessionProvider`] backed by the platform's auth HTTP API.
pub struct HttpSessionProvider {
    client: Client,
    base_url: String,
    anon_key: SecretString,
}

impl HttpSessionProvider {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(globals: &GlobalArgs) -> Result<Self, PlatformError> {
        Ok(Self {
            client: http_client()?,
            base_url: globals.platform_url.clone(),
            anon_key: globals.anon_key.clone(),
        })
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }
}

/// Shape of the auth service's "current user" payload.
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
    email_confirmed_at: Option<String>,
}

impl AuthUser {
    fn into_session(self) -> Session {
        Session {
            user_id: self.id,
            email: self.email,
            email_verified: self.email_confirmed_at.is_some(),
        }
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    #[instrument(skip(self, token))]
    async fn current_session(&self, token: &str) -> SessionStatus {
        let url = endpoint_url(&self.base_url, "/auth/v1/user");

        let response = match self
            .client
            .get(&url)
            .header("apikey", self.anon_key.expose_secret())
            .header(AUTHORIZATION, Self::bearer(token))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!("Session lookup failed: {err}");
                return SessionStatus::ProviderError(err.to_string());
            }
        };

        match response.status() {
            status if status.is_success() => match response.json::<AuthUser>().await {
                Ok(user) => SessionStatus::Authenticated(user.into_session()),
                Err(err) => {
                    error!("Session payload could not be parsed: {err}");
                    SessionStatus::ProviderError(err.to_string())
                }
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SessionStatus::Unauthenticated,
            _ => {
                let message = error_message(response).await;
                error!("Session lookup rejected: {message}");
                SessionStatus::ProviderError(message)
            }
        }
    }

    #[instrument(skip(self, new_account))]
    async fn create_account(
        &self,
        new_account: NewAccount,
    ) -> Result<CreatedAccount, PlatformError> {
        let url = endpoint_url(&self.base_url, "/auth/v1/signup");

        let payload = json!({
            "email": new_account.email,
            "password": new_account.password,
            "data": {
                "full_name": new_account.full_name,
            },
        });

        let response = self
            .client
            .post(&url)
            .header("apikey", self.anon_key.expose_secret())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlatformError::Service(error_message(response).await));
        }

        let body: Value = response.json().await?;
        parse_created_account(&body)
    }

    #[instrument(skip(self))]
    async fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
    ) -> Result<String, PlatformError> {
        if provider.is_empty() {
            return Err(PlatformError::Service(
                "Missing OAuth provider".to_string(),
            ));
        }

        let base = endpoint_url(&self.base_url, "/auth/v1/authorize");
        let url = Url::parse_with_params(
            &base,
            &[("provider", provider), ("redirect_to", redirect_to)],
        )
        .map_err(|err| PlatformError::Service(err.to_string()))?;

        debug!("authorize URL: {url}");

        Ok(url.to_string())
    }

    #[instrument(skip(self, token))]
    async fn sign_out(&self, token: &str) -> Result<(), PlatformError> {
        let url = endpoint_url(&self.base_url, "/auth/v1/logout");

        let response = self
            .client
            .post(&url)
            .header("apikey", self.anon_key.expose_secret())
            .header(AUTHORIZATION, Self::bearer(token))
            .send()
            .await?;

        // An already-dead session is fine; logout is idempotent.
        if response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }

        Err(PlatformError::Service(error_message(response).await))
    }

    async fn ping(&self) -> Result<(), PlatformError> {
        let url = endpoint_url(&self.base_url, "/auth/v1/health");

        let response = self
            .client
            .get(&url)
            .header("apikey", self.anon_key.expose_secret())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PlatformError::Service(error_message(response).await))
        }
    }
}

/// The signup payload carries the user at the top level or under `user`,
/// depending on whether a session was issued alongside the account.
fn parse_created_account(body: &Value) -> Result<CreatedAccount, PlatformError> {
    let user = if body.get("id").is_some() {
        body
    } else {
        body.get("user")
            .ok_or_else(|| PlatformError::Service("Signup response had no user".to_string()))?
    };

    let id = user
        .get("id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| PlatformError::Service("Signup response had no account id".to_string()))?;

    let email = user
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(CreatedAccount { id, email })
}
