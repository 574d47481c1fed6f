use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::peerlearn::{
    self,
    state::{AppConfig, AppState},
};
use crate::platform::{HttpProfileStore, HttpSessionProvider};
use anyhow::{Context, Result};
use std::sync::Arc;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            platform_url,
            anon_key,
            service_key,
            site_url,
        } => {
            // Reject malformed platform URLs before any client is built
            Url::parse(&platform_url).context("Invalid platform URL")?;

            let globals = GlobalArgs::new(platform_url, anon_key, service_key, site_url.clone());

            let sessions = HttpSessionProvider::new(&globals).context("Session provider client")?;
            let profiles = HttpProfileStore::new(&globals).context("Profile store client")?;

            let state = Arc::new(AppState::new(
                Arc::new(sessions),
                Arc::new(profiles),
                AppConfig::new(site_url),
            ));

            peerlearn::new(port, state).await?;
        }
    }

    Ok(())
}
