//! Configuration types.

use std::net::SocketAddr;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default port the service listens on.
pub const DEFAULT_PORT: u16 = 5000;

/// Default frontend origin allowed by CORS.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Service configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to bind, e.g. `0.0.0.0`.
    pub bind_addr: String,
    pub port: u16,
    /// LLM API key. `None` leaves the LLM-backed routes failing with a
    /// configuration error instead of refusing to start.
    pub llm_api_key: Option<SecretString>,
    pub llm_model: String,
    pub llm_base_url: String,
    /// Automation service that answers CRM queries.
    pub automation_url: Option<String>,
    /// Base URL the dispatcher posts subtasks to.
    pub dispatch_base_url: String,
    /// Upper bound on in-flight subtask calls (`None` = unbounded).
    pub dispatch_max_concurrency: Option<usize>,
    pub cors_origin: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            llm_api_key: None,
            llm_model: crate::llm::DEFAULT_MODEL.to_string(),
            llm_base_url: crate::llm::DEFAULT_BASE_URL.to_string(),
            automation_url: None,
            dispatch_base_url: format!("http://localhost:{DEFAULT_PORT}"),
            dispatch_max_concurrency: None,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let dispatch_max_concurrency = match get("DISPATCH_MAX_CONCURRENCY") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::InvalidValue {
                        key: "DISPATCH_MAX_CONCURRENCY".to_string(),
                        message: "must be at least 1".to_string(),
                    });
                }
                Ok(n) => Some(n),
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        key: "DISPATCH_MAX_CONCURRENCY".to_string(),
                        message: e.to_string(),
                    });
                }
            },
            None => None,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            llm_api_key: get("OPENAI_API_KEY").map(SecretString::from),
            llm_model: get("OPENAI_MODEL").unwrap_or(defaults.llm_model),
            llm_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.llm_base_url),
            automation_url: get("POWER_AUTOMATE_URL"),
            dispatch_base_url: get("DISPATCH_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}")),
            dispatch_max_concurrency,
            cors_origin: get("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
        })
    }

    /// Socket address to listen on.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                key: "BIND_ADDR".to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert!(config.llm_api_key.is_none());
        assert!(config.automation_url.is_none());
        assert_eq!(config.dispatch_base_url, "http://localhost:5000");
        assert_eq!(config.dispatch_max_concurrency, None);
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert_eq!(config.llm_model, "gpt-4");
    }

    #[test]
    fn dispatch_base_follows_port() {
        let config = ServiceConfig::from_lookup(lookup(&[("PORT", "8081")])).unwrap();
        assert_eq!(config.dispatch_base_url, "http://localhost:8081");
        assert_eq!(config.listen_addr().unwrap().port(), 8081);
    }

    #[test]
    fn reads_secrets_and_urls() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("POWER_AUTOMATE_URL", "https://flow.example/run"),
            ("DISPATCH_MAX_CONCURRENCY", "4"),
        ]))
        .unwrap();
        assert_eq!(config.llm_api_key.unwrap().expose_secret(), "sk-test");
        assert_eq!(config.automation_url.as_deref(), Some("https://flow.example/run"));
        assert_eq!(config.dispatch_max_concurrency, Some(4));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = ServiceConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.llm_api_key.is_none());
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = ServiceConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));

        let err =
            ServiceConfig::from_lookup(lookup(&[("DISPATCH_MAX_CONCURRENCY", "0")])).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }
}
