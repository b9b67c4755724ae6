use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub provider: ProviderSettings,
    #[serde(default)] // Use default values if the [cache] section is missing
    pub cache: CacheSettings,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Connection settings for the remote company info service.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    /// Base URL of the service, e.g. "https://companyinfo.example.com".
    pub base_url: String,
    /// API key passed as the `code` query parameter on every request.
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How many times a transient failure is retried before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First backoff delay; each retry doubles it.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

/// Settings for the read-through cache in front of the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Upper bound on entries per operation kind.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Parameters for the compensation engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// The exchange queried by the HTTP endpoint.
    #[serde(default = "default_exchange")]
    pub exchange: String,
    /// Upper bound on simultaneous outgoing provider calls.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    /// An executive is reported when their compensation is at least this multiple
    /// of their industry's average. 1.1 means "10% above average".
    #[serde(default = "default_compensation_multiple")]
    pub compensation_multiple: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ConfigError::ValidationError(format!("server.host '{}' is not an IP address", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Config {
    /// Rejects settings that would make the service unusable at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.base_url must be set".to_string(),
            ));
        }
        if self.provider.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.api_key must be set".to_string(),
            ));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "cache.ttl_secs must be greater than zero".to_string(),
            ));
        }
        if self.cache.max_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "cache.max_capacity must be greater than zero".to_string(),
            ));
        }
        if self.engine.exchange.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "engine.exchange must be set".to_string(),
            ));
        }
        if self.engine.max_concurrent_requests == 0 {
            return Err(ConfigError::ValidationError(
                "engine.max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        let multiple = self.engine.compensation_multiple;
        if !multiple.is_finite() || multiple <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "engine.compensation_multiple must be a positive number, got {}",
                multiple
            )));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

// --- Default Implementations ---
// This allows a user to omit whole sections from their toml
// and still have it work with sensible defaults.

fn default_timeout_secs() -> u64 { 30 }
fn default_max_retries() -> u32 { 6 }
fn default_retry_base_delay_ms() -> u64 { 2000 }
fn default_ttl_secs() -> u64 { 3600 }
fn default_max_capacity() -> u64 { 10_000 }
fn default_exchange() -> String { "ASX".to_string() }
fn default_max_concurrent_requests() -> usize { 20 }
fn default_compensation_multiple() -> f64 { 1.1 }
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            exchange: default_exchange(),
            max_concurrent_requests: default_max_concurrent_requests(),
            compensation_multiple: default_compensation_multiple(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ConfigError;
    use crate::load_config_from_str;

    const MINIMAL: &str = r#"
        [provider]
        base_url = "https://companyinfo.example.com"
        api_key = "secret"
    "#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = load_config_from_str(MINIMAL).unwrap();
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.provider.max_retries, 6);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.cache.max_capacity, 10_000);
        assert_eq!(config.engine.exchange, "ASX");
        assert_eq!(config.engine.max_concurrent_requests, 20);
        assert_eq!(config.engine.compensation_multiple, 1.1);
        assert_eq!(config.server.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn sections_override_defaults() {
        let toml = format!(
            "{}\n[engine]\nexchange = \"NYSE\"\nmax_concurrent_requests = 4\n[cache]\nttl_secs = 60\n",
            MINIMAL
        );
        let config = load_config_from_str(&toml).unwrap();
        assert_eq!(config.engine.exchange, "NYSE");
        assert_eq!(config.engine.max_concurrent_requests, 4);
        assert_eq!(config.engine.compensation_multiple, 1.1);
        assert_eq!(config.cache.ttl().as_secs(), 60);
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let toml = r#"
            [provider]
            base_url = "https://companyinfo.example.com"
            api_key = ""
        "#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("api_key")));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let toml = format!("{}\n[engine]\nmax_concurrent_requests = 0\n", MINIMAL);
        assert!(matches!(
            load_config_from_str(&toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn zero_cache_capacity_is_rejected() {
        let toml = format!("{}\n[cache]\nmax_capacity = 0\n", MINIMAL);
        let err = load_config_from_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("max_capacity")));
    }

    #[test]
    fn missing_provider_section_fails_to_load() {
        assert!(matches!(
            load_config_from_str("[engine]\nexchange = \"ASX\"\n"),
            Err(ConfigError::LoadError(_))
        ));
    }
}
