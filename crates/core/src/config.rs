use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    pub generator: GeneratorConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

/// Remote conversational-agent service endpoint and credential.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub api_key: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://frontdesk.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            provider: ProviderConfig {
                base_url: "https://api.agent-provider.example".to_string(),
                api_key: None,
            },
            generator: GeneratorConfig { api_key: None },
            cache: CacheConfig { path: PathBuf::from("frontdesk-cache.json") },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    provider: Option<ProviderPatch>,
    generator: Option<GeneratorPatch>,
    cache: Option<CachePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderPatch {
    base_url: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GeneratorPatch {
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CachePatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    /// Defaults, then the optional TOML file, then env overrides, then
    /// validation. Later layers win.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("frontdesk.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }
        if let Some(provider) = patch.provider {
            if let Some(base_url) = provider.base_url {
                self.provider.base_url = base_url;
            }
            if let Some(key) = provider.api_key {
                self.provider.api_key = Some(key.into());
            }
        }
        if let Some(generator) = patch.generator {
            if let Some(key) = generator.api_key {
                self.generator.api_key = Some(key.into());
            }
        }
        if let Some(cache) = patch.cache {
            if let Some(path) = cache.path {
                self.cache.path = path;
            }
        }
        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("FRONTDESK_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(base_url) = env::var("FRONTDESK_PROVIDER_BASE_URL") {
            self.provider.base_url = base_url;
        }
        if let Ok(key) = env::var("FRONTDESK_PROVIDER_API_KEY") {
            self.provider.api_key = Some(key.into());
        }
        if let Ok(key) = env::var("FRONTDESK_GENERATOR_API_KEY") {
            self.generator.api_key = Some(key.into());
        }
        if let Ok(path) = env::var("FRONTDESK_CACHE_PATH") {
            self.cache.path = PathBuf::from(path);
        }
        if let Ok(level) = env::var("FRONTDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("FRONTDESK_LOG_FORMAT") {
            if let Ok(parsed) = format.parse() {
                self.logging.format = parsed;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation("database.url must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if !self.provider.base_url.starts_with("http") {
            return Err(ConfigError::Validation(format!(
                "provider.base_url must be an http(s) URL, got `{}`",
                self.provider.base_url
            )));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }
    let default = PathBuf::from("frontdesk.toml");
    default.exists().then_some(default)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, LoadOptions, LogFormat};

    #[test]
    fn defaults_validate() {
        let config = AppConfig::load(LoadOptions::default()).expect("defaults load");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let options = LoadOptions {
            config_path: Some("does-not-exist.toml".into()),
            require_file: true,
        };
        let error = AppConfig::load(options).expect_err("must fail");
        assert!(matches!(error, ConfigError::MissingConfigFile(_)));
    }

    #[test]
    fn bad_base_url_fails_validation() {
        let mut config = AppConfig::default();
        config.provider.base_url = "ftp://nope".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().expect("parse"), LogFormat::Json);
        assert!("yaml".parse::<LogFormat>().is_err());
    }
}
