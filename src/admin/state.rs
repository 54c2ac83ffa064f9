//! Shared configuration and application state.

use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::platform::PlatformApi;
use crate::session::SessionStore;
use crate::webauthn::CeremonyEngine;

const DEFAULT_SESSION_TTL_SECONDS: u64 = 8 * 60 * 60;
const DEFAULT_RP_NAME: &str = "Notify";

#[derive(Clone, Debug)]
pub struct AdminConfig {
    api_base_url: String,
    admin_base_url: String,
    rp_id: String,
    rp_origin: String,
    rp_name: String,
    session_ttl_seconds: u64,
}

impl AdminConfig {
    #[must_use]
    pub fn new(api_base_url: String, admin_base_url: String) -> Self {
        let rp_id = Url::parse(&admin_base_url)
            .ok()
            .and_then(|u: Url| u.host_str().map(ToString::to_string))
            .unwrap_or_else(|| "localhost".to_string());

        // Ensure origin does not have a trailing slash
        let rp_origin = admin_base_url.trim_end_matches('/').to_string();

        Self {
            api_base_url,
            admin_base_url,
            rp_id,
            rp_origin,
            rp_name: DEFAULT_RP_NAME.to_string(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_rp_id(mut self, rp_id: String) -> Self {
        self.rp_id = rp_id;
        self
    }

    #[must_use]
    pub fn with_rp_origin(mut self, rp_origin: String) -> Self {
        self.rp_origin = rp_origin;
        self
    }

    #[must_use]
    pub fn with_rp_name(mut self, rp_name: String) -> Self {
        self.rp_name = rp_name;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    #[must_use]
    pub fn rp_id(&self) -> &str {
        &self.rp_id
    }

    #[must_use]
    pub fn rp_origin(&self) -> &str {
        &self.rp_origin
    }

    #[must_use]
    pub fn rp_name(&self) -> &str {
        &self.rp_name
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds)
    }

    pub(crate) fn session_cookie_secure(&self) -> bool {
        self.admin_base_url.starts_with("https://")
    }
}

pub struct AppState {
    config: AdminConfig,
    sessions: SessionStore,
    platform: Arc<dyn PlatformApi>,
    ceremony: Arc<dyn CeremonyEngine>,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: AdminConfig,
        platform: Arc<dyn PlatformApi>,
        ceremony: Arc<dyn CeremonyEngine>,
    ) -> Self {
        let sessions = SessionStore::new(config.session_ttl());
        Self {
            config,
            sessions,
            platform,
            ceremony,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub(crate) fn platform(&self) -> &dyn PlatformApi {
        self.platform.as_ref()
    }

    pub(crate) fn ceremony(&self) -> &dyn CeremonyEngine {
        self.ceremony.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::AdminConfig;

    #[test]
    fn admin_config_derives_relying_party_from_base_url() {
        let config = AdminConfig::new(
            "https://api.notify.test".to_string(),
            "https://admin.notify.test/".to_string(),
        );

        assert_eq!(config.api_base_url(), "https://api.notify.test");
        assert_eq!(config.rp_id(), "admin.notify.test");
        assert_eq!(config.rp_origin(), "https://admin.notify.test");
        assert_eq!(config.rp_name(), "Notify");
        assert_eq!(
            config.session_ttl_seconds(),
            super::DEFAULT_SESSION_TTL_SECONDS
        );
        assert!(config.session_cookie_secure());
    }

    #[test]
    fn admin_config_overrides() {
        let config = AdminConfig::new(
            "https://api.notify.test".to_string(),
            "http://localhost:6012".to_string(),
        )
        .with_rp_id("notify.test".to_string())
        .with_rp_origin("https://notify.test".to_string())
        .with_rp_name("Notify Dev".to_string())
        .with_session_ttl_seconds(120);

        assert_eq!(config.rp_id(), "notify.test");
        assert_eq!(config.rp_origin(), "https://notify.test");
        assert_eq!(config.rp_name(), "Notify Dev");
        assert_eq!(config.session_ttl_seconds(), 120);
        assert!(!config.session_cookie_secure());
    }

    #[test]
    fn admin_config_falls_back_to_localhost_rp() {
        let config = AdminConfig::new(
            "https://api.notify.test".to_string(),
            "not a url".to_string(),
        );
        assert_eq!(config.rp_id(), "localhost");
    }
}
