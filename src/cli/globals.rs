use secrecy::SecretString;

/// Connection details for the hosted auth/data platform, shared by the
/// session and profile clients.
#[derive(Clone)]
pub struct GlobalArgs {
    pub platform_url: String,
    pub anon_key: SecretString,
    pub service_key: SecretString,
    pub site_url: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(
        platform_url: String,
        anon_key: SecretString,
        service_key: SecretString,
        site_url: String,
    ) -> Self {
        Self {
            platform_url,
            anon_key,
            service_key,
            site_url,
        }
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("platform_url", &self.platform_url)
            .field("anon_key", &"***")
            .field("service_key", &"***")
            .field("site_url", &self.site_url)
            .finish()
    }
}
