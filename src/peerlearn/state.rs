//! Application state and configuration shared across handlers.

use std::sync::Arc;

use crate::platform::{ProfileStore, SessionProvider};

const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const OAUTH_CALLBACK_PATH: &str = "/auth/callback";
const DEFAULT_OAUTH_PROVIDER: &str = "google";

#[derive(Clone, Debug)]
pub struct AppConfig {
    site_url: String,
    oauth_provider: String,
}

impl AppConfig {
    #[must_use]
    pub fn new(site_url: String) -> Self {
        let site_url = if site_url.trim().is_empty() {
            DEFAULT_SITE_URL.to_string()
        } else {
            site_url
        };

        Self {
            site_url,
            oauth_provider: DEFAULT_OAUTH_PROVIDER.to_string(),
        }
    }

    #[must_use]
    pub fn with_oauth_provider(mut self, provider: String) -> Self {
        self.oauth_provider = provider;
        self
    }

    #[must_use]
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    #[must_use]
    pub fn oauth_provider(&self) -> &str {
        &self.oauth_provider
    }

    /// Where the OAuth provider sends the browser back to.
    #[must_use]
    pub fn oauth_callback_url(&self) -> String {
        format!(
            "{}{}",
            self.site_url.trim_end_matches('/'),
            OAUTH_CALLBACK_PATH
        )
    }

    /// Only mark cookies secure when the frontend is served over HTTPS.
    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.site_url.starts_with("https://")
    }
}

/// Everything a handler needs: the platform clients and the app config.
pub struct AppState {
    sessions: Arc<dyn SessionProvider>,
    profiles: Arc<dyn ProfileStore>,
    config: AppConfig,
}

impl AppState {
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        profiles: Arc<dyn ProfileStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            sessions,
            profiles,
            config,
        }
    }

    #[must_use]
    pub fn sessions(&self) -> &dyn SessionProvider {
        self.sessions.as_ref()
    }

    #[must_use]
    pub fn profiles(&self) -> &dyn ProfileStore {
        self.profiles.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_defaults_and_overrides() {
        let config = AppConfig::new("http://localhost:3000".to_string());
        assert_eq!(config.site_url(), "http://localhost:3000");
        assert_eq!(config.oauth_provider(), "google");
        assert_eq!(
            config.oauth_callback_url(),
            "http://localhost:3000/auth/callback"
        );
        assert!(!config.session_cookie_secure());

        let config = config.with_oauth_provider("github".to_string());
        assert_eq!(config.oauth_provider(), "github");
    }

    #[test]
    fn app_config_falls_back_on_empty_site_url() {
        let config = AppConfig::new(String::new());
        assert_eq!(config.site_url(), "http://localhost:3000");
    }

    #[test]
    fn secure_cookies_require_https() {
        let config = AppConfig::new("https://peerlearn.dev/".to_string());
        assert!(config.session_cookie_secure());
        assert_eq!(
            config.oauth_callback_url(),
            "https://peerlearn.dev/auth/callback"
        );
    }
}
