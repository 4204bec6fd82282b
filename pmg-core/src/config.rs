use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default location of the config file, relative to the working directory
const DEFAULT_CONFIG_PATH: &str = "config/pmg.toml";

/// Centralized configuration for the API server, web frontend and CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PmgConfig {
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub web: WebConfig,
    pub analytics: AnalyticsConfig,
    pub tasks: TasksConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/pmg".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    /// Externally visible base URL, used to build `next` links
    pub public_url: String,
    pub results_per_page: u32,
    pub cors_permissive: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5001)),
            public_url: "http://api.pmg.test:5001".to_string(),
            results_per_page: 50,
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: SocketAddr,
    /// Base URL of the backend API, with a trailing slash
    pub api_host: String,
    pub static_host: String,
    pub results_per_page: u32,
    /// Debug mode serves externalised URLs over plain http
    pub debug: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            api_host: "http://api.pmg.test:5001/".to_string(),
            static_host: "https://static.pmg.org.za/".to_string(),
            results_per_page: 50,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub google_analytics_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    pub run_periodic_tasks: bool,
    pub max_workers: usize,
    pub saved_search_interval_secs: u64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            run_periodic_tasks: false,
            max_workers: 2,
            saved_search_interval_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// File with one sitting day (YYYY-MM-DD) per line
    pub sitting_days_path: Option<PathBuf>,
}

impl PmgConfig {
    /// Load config from `$PMG_CONFIG` or `config/pmg.toml`.
    ///
    /// A missing file is not an error: defaults are used, then environment
    /// overrides are applied.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            Self::from_toml_str(&content)?
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML document and expand `${VAR}` references.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(content).context("Failed to parse config file (invalid TOML)")?;
        config.expand_variables();
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        env::var("PMG_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(ga_id) = env::var("GOOGLE_ANALYTICS_ID") {
            if !ga_id.is_empty() {
                self.analytics.google_analytics_id = Some(ga_id);
            }
        }
    }

    fn expand_variables(&mut self) {
        self.database.url = expand_string(&self.database.url);
        self.api.public_url = expand_string(&self.api.public_url);
        self.web.api_host = expand_string(&self.web.api_host);
        self.web.static_host = expand_string(&self.web.static_host);
        if let Some(ref id) = self.analytics.google_analytics_id {
            self.analytics.google_analytics_id = Some(expand_string(id));
        }
        if let Some(ref path) = self.calendar.sitting_days_path {
            let expanded = expand_string(&path.display().to_string());
            self.calendar.sitting_days_path = Some(PathBuf::from(expanded));
        }
    }
}

/// Expand `${VAR}` references from the environment. Unknown variables
/// expand to the empty string.
fn expand_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        match rest[start + 2..].find('}') {
            Some(end) => {
                let name = &rest[start + 2..start + 2 + end];
                result.push_str(&env::var(name).unwrap_or_default());
                rest = &rest[start + 2 + end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_sections() {
        let config = PmgConfig::from_toml_str("").unwrap();
        assert_eq!(config.api.bind.port(), 5001);
        assert_eq!(config.web.bind.port(), 5000);
        assert_eq!(config.api.results_per_page, 50);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.tasks.max_workers, 2);
        assert!(!config.tasks.run_periodic_tasks);
        assert!(config.calendar.sitting_days_path.is_none());
    }

    #[test]
    fn parses_partial_sections() {
        let config = PmgConfig::from_toml_str(
            r#"
            [web]
            api_host = "http://localhost:5001/"
            results_per_page = 20

            [tasks]
            run_periodic_tasks = true
            "#,
        )
        .unwrap();

        assert_eq!(config.web.api_host, "http://localhost:5001/");
        assert_eq!(config.web.results_per_page, 20);
        assert_eq!(config.web.bind.port(), 5000);
        assert!(config.tasks.run_periodic_tasks);
        assert_eq!(config.tasks.max_workers, 2);
    }

    #[test]
    fn rejects_invalid_toml() {
        assert!(PmgConfig::from_toml_str("[web\nbind = ").is_err());
    }

    #[test]
    fn expands_env_variables() {
        env::set_var("PMG_TEST_DB_HOST", "db.internal");
        let out = expand_string("postgres://${PMG_TEST_DB_HOST}/pmg");
        assert_eq!(out, "postgres://db.internal/pmg");
    }

    #[test]
    fn unknown_variables_expand_to_empty() {
        let out = expand_string("a${PMG_TEST_SURELY_UNSET_VAR}b");
        assert_eq!(out, "ab");
    }

    #[test]
    fn unterminated_reference_is_kept() {
        assert_eq!(expand_string("abc${oops"), "abc${oops");
    }
}
