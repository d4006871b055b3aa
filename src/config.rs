use std::{env, net::IpAddr, path::PathBuf, str::FromStr};

use dotenvy::dotenv;
use log::{debug, info, warn};
use serde::Deserialize;
use url::Url;

use crate::errors::ConfigError;
use crate::utils::short_code::ShortCodePolicy;

// Server-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub workers: usize,
    pub cors_allowed_origin: Option<String>,
}

// Application-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: Environment,
    pub log_level: String,
}

// Environment enum for different deployment environments
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!(
                "Invalid environment: {}. Must be one of: development, testing, production",
                s
            )),
        }
    }
}

/// Which link repository implementation to construct at startup
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON blob on local disk
    Local,
    /// In-process only, lost on restart
    Memory,
    /// External record-management service
    Remote,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "file" => Ok(StorageBackend::Local),
            "memory" | "mock" => Ok(StorageBackend::Memory),
            "remote" => Ok(StorageBackend::Remote),
            _ => Err(format!(
                "Invalid storage backend: {}. Must be one of: local, memory, remote",
                s
            )),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub collection: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub local_path: PathBuf,
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    /// Host part of every share URL, e.g. `snip.link`
    pub domain: String,
    pub code_length: usize,
    pub max_attempts: usize,
}

impl LinkConfig {
    pub fn policy(&self) -> ShortCodePolicy {
        ShortCodePolicy {
            length: self.code_length,
            max_attempts: self.max_attempts,
        }
    }
}

// Result type for configuration functions
type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub links: LinkConfig,
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> ConfigResult<Self> {
        // Load .env file if it exists
        match dotenv() {
            Ok(_) => debug!(".env file loaded successfully"),
            Err(e) => warn!("Could not load .env file: {}", e),
        }

        let config = Self::from_lookup(|key| env::var(key))?;
        info!("Configuration loaded successfully");
        debug!("Loaded config: {:?}", config);

        Ok(config)
    }

    /// Build the configuration from any key lookup shaped like `env::var`
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let server = ServerConfig {
            host: get_or_default(&lookup, "SERVER_HOST", "127.0.0.1")?,
            port: get_or_default(&lookup, "SERVER_PORT", "8000")?,
            workers: get_or_default(&lookup, "SERVER_WORKERS", "4")?,
            cors_allowed_origin: get_optional(&lookup, "CORS_ALLOWED_ORIGIN")?
                .map(|origin| parse_origin(&origin))
                .transpose()?,
        };

        let version = env!("CARGO_PKG_VERSION");

        let app = AppConfig {
            name: get_or_default(&lookup, "APP_NAME", "sniplink")?,
            version: get_or_default(&lookup, "APP_VERSION", version)?,
            environment: get_or_default(&lookup, "APP_ENVIRONMENT", "development")?,
            log_level: get_or_default(&lookup, "RUST_LOG", "info")?,
        };

        let backend: StorageBackend = get_or_default(&lookup, "STORAGE_BACKEND", "local")?;
        let remote = match get_optional(&lookup, "REMOTE_BASE_URL")? {
            Some(base_url) => Some(RemoteConfig {
                base_url,
                api_key: get_optional(&lookup, "REMOTE_API_KEY")?,
                collection: get_or_default(&lookup, "REMOTE_COLLECTION", "short_links")?,
                timeout_seconds: get_or_default(&lookup, "REMOTE_TIMEOUT_SECONDS", "10")?,
            }),
            None if backend == StorageBackend::Remote => {
                return Err(ConfigError::MissingValue(
                    "REMOTE_BASE_URL is required when STORAGE_BACKEND=remote".to_string(),
                ))
            }
            None => None,
        };

        let storage = StorageConfig {
            backend,
            local_path: get_or_default(&lookup, "LOCAL_STORE_PATH", "data/sniplink-data.json")?,
            remote,
        };

        let links = LinkConfig {
            domain: get_or_default(&lookup, "SHORT_LINK_DOMAIN", "snip.link")?,
            code_length: get_or_default(&lookup, "SHORT_CODE_LENGTH", "6")?,
            max_attempts: get_or_default(&lookup, "SHORT_CODE_MAX_ATTEMPTS", "100")?,
        };
        if links.code_length == 0 || links.max_attempts == 0 {
            return Err(ConfigError::ParseError(
                "SHORT_CODE_LENGTH and SHORT_CODE_MAX_ATTEMPTS must be positive".to_string(),
            ));
        }

        Ok(Config {
            server,
            app,
            storage,
            links,
        })
    }
}

/// Helper function to get a variable with a default value
fn get_or_default<F, T>(lookup: &F, key: &str, default: &str) -> ConfigResult<T>
where
    F: Fn(&str) -> Result<String, env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(format!("Could not parse {}: {}", key, e))),
        Err(env::VarError::NotPresent) => {
            debug!("{} not set, using default: {}", key, default);
            default.parse::<T>().map_err(|e| {
                ConfigError::ParseError(format!("Could not parse default for {}: {}", key, e))
            })
        }
        Err(e) => Err(ConfigError::EnvVarError(e)),
    }
}

/// Normalizes a CORS origin to `scheme://host[:port]`. Paths, queries,
/// credentials and wildcards are rejected.
fn parse_origin(raw: &str) -> ConfigResult<String> {
    let invalid = |reason: &str| {
        ConfigError::ParseError(format!(
            "CORS_ALLOWED_ORIGIN '{}' is not a valid origin: {}",
            raw, reason
        ))
    };

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a path, query or fragment"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("must not carry credentials"));
    }

    Ok(url.origin().ascii_serialization())
}

/// Unset and blank values both count as absent
fn get_optional<F>(lookup: &F, key: &str) -> ConfigResult<Option<String>>
where
    F: Fn(&str) -> Result<String, env::VarError>,
{
    match lookup(key) {
        Ok(val) if val.trim().is_empty() => Ok(None),
        Ok(val) => Ok(Some(val.trim().to_string())),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVarError(e)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(
        pairs: &[(&str, &str)],
    ) -> impl Fn(&str) -> Result<String, env::VarError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned().ok_or(env::VarError::NotPresent)
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.app.name, "sniplink");
        assert_eq!(config.app.environment, Environment::Development);
        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert_eq!(
            config.storage.local_path,
            PathBuf::from("data/sniplink-data.json")
        );
        assert!(config.storage.remote.is_none());
        assert_eq!(config.links.domain, "snip.link");
        assert_eq!(config.links.policy(), ShortCodePolicy::default());
    }

    #[test]
    fn test_remote_backend_requires_base_url() {
        let err = Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "remote")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue(_)));
    }

    #[test]
    fn test_remote_backend_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "Remote"),
            ("REMOTE_BASE_URL", "https://records.example.com/api"),
            ("REMOTE_API_KEY", "secret"),
            ("REMOTE_TIMEOUT_SECONDS", "3"),
        ]))
        .unwrap();

        let remote = config.storage.remote.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Remote);
        assert_eq!(remote.base_url, "https://records.example.com/api");
        assert_eq!(remote.api_key.as_deref(), Some("secret"));
        assert_eq!(remote.collection, "short_links");
        assert_eq!(remote.timeout_seconds, 3);
    }

    #[test]
    fn test_invalid_values_are_parse_errors() {
        let err = Config::from_lookup(lookup_from(&[("SERVER_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(msg) if msg.contains("SERVER_PORT")));

        let err = Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "s3")])).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));

        let err = Config::from_lookup(lookup_from(&[("SHORT_CODE_LENGTH", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_cors_origin_is_validated() {
        let config = Config::from_lookup(lookup_from(&[(
            "CORS_ALLOWED_ORIGIN",
            "https://app.example.com:8443/",
        )]))
        .unwrap();
        assert_eq!(
            config.server.cors_allowed_origin.as_deref(),
            Some("https://app.example.com:8443")
        );

        for bad in ["*", "app.example.com", "ftp://example.com", "https://example.com/app"] {
            let err = Config::from_lookup(lookup_from(&[("CORS_ALLOWED_ORIGIN", bad)]))
                .unwrap_err();
            let ConfigError::ParseError(msg) = err else {
                panic!("{bad} gave an unexpected error");
            };
            assert!(msg.contains("CORS_ALLOWED_ORIGIN"), "{msg}");
        }
    }

    #[test]
    fn test_environment_aliases() {
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("TEST".parse::<Environment>(), Ok(Environment::Testing));
        assert!("staging".parse::<Environment>().is_err());
    }
}
