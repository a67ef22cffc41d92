use serde::Deserialize;

use domain::models::{DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE, EXTERNAL_SOURCE_VINCERE};

use crate::vincere::{DEFAULT_API_BASE_URL, DEFAULT_AUTH_URL};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub vincere: VincereConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between insert batches.
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Export read by `import` and `audit` when `--file` is not given.
    #[serde(default = "default_export_file")]
    pub export_file: String,

    /// Where failed rows are written.
    #[serde(default = "default_error_log")]
    pub error_log: String,

    #[serde(default = "default_external_source")]
    pub external_source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VincereConfig {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub refresh_token: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Position search page size. Vincere caps it at 100.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between per-position detail requests.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

// Default value functions
fn default_max_connections() -> u32 {
    5
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    300
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_batch_delay_ms() -> u64 {
    DEFAULT_BATCH_DELAY_MS
}
fn default_export_file() -> String {
    "output/vincere-jobs-raw.json".to_string()
}
fn default_error_log() -> String {
    "output/import-errors.json".to_string()
}
fn default_external_source() -> String {
    EXTERNAL_SOURCE_VINCERE.to_string()
}
fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
fn default_page_size() -> usize {
    25
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_request_delay_ms() -> u64 {
    100
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
            export_file: default_export_file(),
            error_log: default_error_log(),
            external_source: default_external_source(),
        }
    }
}

impl Default for VincereConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            api_key: String::new(),
            refresh_token: String::new(),
            auth_url: default_auth_url(),
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Pool settings for the persistence layer.
    pub fn to_pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml (optional)
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with LH__ prefix, e.g. `LH__DATABASE__URL`
    ///
    /// Credentials are not checked here; each command asks for what it needs
    /// through [`Config::require_database`] and [`Config::require_vincere`].
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("LH").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [database]
            url = ""
            max_connections = 5
            min_connections = 1

            [logging]
            level = "info"
            format = "json"

            [import]
            batch_size = 50
            batch_delay_ms = 200
            export_file = "output/vincere-jobs-raw.json"

            [vincere]
            page_size = 25
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(ConfigValidationError::InvalidValue(format!(
                "logging.format must be json or pretty, got {}",
                self.logging.format
            )));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        shared::validation::validate_batch_size(self.import.batch_size).map_err(|_| {
            ConfigValidationError::InvalidValue(format!(
                "import.batch_size must be 1-{}",
                shared::validation::MAX_BATCH_SIZE
            ))
        })?;

        shared::validation::validate_batch_delay(self.import.batch_delay_ms).map_err(|_| {
            ConfigValidationError::InvalidValue(format!(
                "import.batch_delay_ms cannot exceed {}",
                shared::validation::MAX_BATCH_DELAY_MS
            ))
        })?;

        shared::validation::validate_source_tag(&self.import.external_source).map_err(|_| {
            ConfigValidationError::InvalidValue(
                "import.external_source must be lowercase letters, digits or underscores"
                    .to_string(),
            )
        })?;

        if self.vincere.page_size == 0 || self.vincere.page_size > 100 {
            return Err(ConfigValidationError::InvalidValue(
                "vincere.page_size must be 1-100".to_string(),
            ));
        }

        Ok(())
    }

    /// Fails unless a database URL is configured.
    pub fn require_database(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "LH__DATABASE__URL environment variable must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Fails unless every Vincere credential is configured.
    pub fn require_vincere(&self) -> Result<(), ConfigValidationError> {
        let missing: Vec<&str> = [
            ("LH__VINCERE__CLIENT_ID", &self.vincere.client_id),
            ("LH__VINCERE__API_KEY", &self.vincere.api_key),
            ("LH__VINCERE__REFRESH_TOKEN", &self.vincere.refresh_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(ConfigValidationError::MissingRequired(format!(
                "{} must be set",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}
