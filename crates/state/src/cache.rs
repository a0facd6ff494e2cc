use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use frontdesk_core::domain::business_config::BusinessConfig;
use frontdesk_core::errors::ApplicationError;

/// What the mirror holds: enough for a public page or an already-onboarded
/// session to render without querying the canonical store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedState {
    pub setup_complete: bool,
    pub config: Option<BusinessConfig>,
    #[serde(default)]
    pub provider_api_key: String,
    #[serde(default)]
    pub generator_api_key: String,
}

/// File-backed key-value mirror of the last known configuration.
///
/// Strictly a projection: reads tolerate a missing or corrupt file by
/// degrading to the empty state, and nothing ever flows from here back into
/// the canonical store. Mutating code paths call `sync` explicitly after a
/// successful store write.
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> CachedState {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return CachedState::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(error) => {
                warn!(path = %self.path.display(), error = %error, "local cache unreadable, starting empty");
                CachedState::default()
            }
        }
    }

    pub fn sync(
        &self,
        config: &BusinessConfig,
        provider_api_key: &str,
        generator_api_key: &str,
    ) -> Result<(), ApplicationError> {
        let state = CachedState {
            setup_complete: true,
            config: Some(config.clone()),
            provider_api_key: provider_api_key.to_string(),
            generator_api_key: generator_api_key.to_string(),
        };
        let raw = serde_json::to_string_pretty(&state)
            .map_err(|e| ApplicationError::Persistence(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| ApplicationError::Persistence(e.to_string()))
    }

    /// Drops the mirror, e.g. when the mirrored business was deleted.
    pub fn clear(&self) -> Result<(), ApplicationError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(ApplicationError::Persistence(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use frontdesk_core::domain::business::{Business, Industry, UserId};
    use frontdesk_core::domain::business_config::BusinessConfig;

    use super::{CachedState, LocalCache};

    fn config() -> BusinessConfig {
        let business = Business::new(UserId("u-1".to_string()), "Acme Dental", Industry::Dental);
        BusinessConfig::derive(&business, None)
    }

    #[test]
    fn missing_file_loads_as_empty_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = LocalCache::new(dir.path().join("cache.json"));
        assert_eq!(cache.load(), CachedState::default());
    }

    #[test]
    fn sync_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = LocalCache::new(dir.path().join("cache.json"));
        let config = config();

        cache.sync(&config, "pk-1", "gk-1").expect("sync");
        let loaded = cache.load();
        assert!(loaded.setup_complete);
        assert_eq!(loaded.config.as_ref().map(|c| c.name.as_str()), Some("Acme Dental"));
        assert_eq!(loaded.provider_api_key, "pk-1");
    }

    #[test]
    fn corrupt_file_degrades_to_empty_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").expect("write junk");
        let cache = LocalCache::new(path);
        assert_eq!(cache.load(), CachedState::default());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = LocalCache::new(dir.path().join("cache.json"));
        cache.sync(&config(), "", "").expect("sync");
        cache.clear().expect("first clear");
        cache.clear().expect("second clear");
        assert_eq!(cache.load(), CachedState::default());
    }
}
