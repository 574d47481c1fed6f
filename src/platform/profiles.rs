//! Profile store client: row reads and inserts against the platform's data
//! API and its column-filter conventions.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use super::{
    endpoint_url, error_message, http_client, schema::{NewProfile, Note, Profile, StudyRoom},
    PlatformError,
};
use crate::cli::globals::GlobalArgs;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Inserts one profile row keyed by the account id.
    ///
    /// Callers must not invoke this before account creation has succeeded;
    /// the row id is the id the auth service issued.
    async fn insert_profile(&self, row: NewProfile) -> Result<(), PlatformError>;

    /// Fetches the profile row for an account, if one exists.
    async fn profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, PlatformError>;

    /// Lists public rooms that are still scheduled, soonest first.
    async fn list_rooms(&self) -> Result<Vec<StudyRoom>, PlatformError>;

    /// Lists the notes owned by an account, most recently updated first.
    async fn notes_by_owner(&self, user_id: Uuid) -> Result<Vec<Note>, PlatformError>;

    /// Counts accepted connections where the account is either side.
    async fn accepted_connection_count(&self, user_id: Uuid) -> Result<u64, PlatformError>;

    /// Reachability probe used by the health endpoint.
    async fn ping(&self) -> Result<(), PlatformError>;
}

/// [`ProfileStore`] backed by the platform's data HTTP API.
pub struct HttpProfileStore {
    client: Client,
    base_url: String,
    service_key: SecretString,
}

impl HttpProfileStore {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(globals: &GlobalArgs) -> Result<Self, PlatformError> {
        Ok(Self {
            client: http_client()?,
            base_url: globals.platform_url.clone(),
            service_key: globals.service_key.clone(),
        })
    }

    fn table_url(&self, table: &str, params: &[(&str, &str)]) -> Result<Url, PlatformError> {
        let base = endpoint_url(&self.base_url, &format!("/rest/v1/{table}"));
        Url::parse_with_params(&base, params).map_err(|err| PlatformError::Service(err.to_string()))
    }

    async fn fetch_rows<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Vec<T>, PlatformError> {
        let response = self
            .client
            .get(url)
            .header("apikey", self.service_key.expose_secret())
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.service_key.expose_secret()),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlatformError::Service(error_message(response).await));
        }

        Ok(response.json::<Vec<T>>().await?)
    }
}

#[async_trait]
impl ProfileStore for HttpProfileStore {
    #[instrument(skip(self, row), fields(account_id = %row.id))]
    async fn insert_profile(&self, row: NewProfile) -> Result<(), PlatformError> {
        let url = self.table_url("profiles", &[])?;

        let response = self
            .client
            .post(url)
            .header("apikey", self.service_key.expose_secret())
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.service_key.expose_secret()),
            )
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlatformError::Service(error_message(response).await));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, PlatformError> {
        let id_filter = format!("eq.{id}");
        let url = self.table_url("profiles", &[("id", id_filter.as_str()), ("limit", "1")])?;

        let rows: Vec<Profile> = self.fetch_rows(url).await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<StudyRoom>, PlatformError> {
        let url = self.table_url(
            "study_rooms",
            &[
                ("is_public", "eq.true"),
                ("status", "eq.scheduled"),
                ("order", "scheduled_at.asc"),
            ],
        )?;

        self.fetch_rows(url).await
    }

    #[instrument(skip(self))]
    async fn notes_by_owner(&self, user_id: Uuid) -> Result<Vec<Note>, PlatformError> {
        let owner_filter = format!("eq.{user_id}");
        let url = self.table_url(
            "notes",
            &[
                ("user_id", owner_filter.as_str()),
                ("order", "updated_at.desc"),
            ],
        )?;

        self.fetch_rows(url).await
    }

    #[instrument(skip(self))]
    async fn accepted_connection_count(&self, user_id: Uuid) -> Result<u64, PlatformError> {
        let either_side = format!("(requester_id.eq.{user_id},receiver_id.eq.{user_id})");
        let url = self.table_url(
            "connections",
            &[
                ("select", "id"),
                ("status", "eq.accepted"),
                ("or", either_side.as_str()),
            ],
        )?;

        let rows: Vec<Value> = self.fetch_rows(url).await?;
        Ok(rows.len() as u64)
    }

    async fn ping(&self) -> Result<(), PlatformError> {
        let url = endpoint_url(&self.base_url, "/rest/v1/");

        let response = self
            .client
            .get(&url)
            .header("apikey", self.service_key.expose_secret())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PlatformError::Service(error_message(response).await))
        }
    }
}
