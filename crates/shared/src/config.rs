//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Bookkeeping settings.
    #[serde(default)]
    pub accounting: AccountingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Run pending migrations on startup.
    #[serde(default)]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Bookkeeping settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountingConfig {
    /// Prefix of generated entry numbers (`AST-2025-000001`).
    #[serde(default = "default_entry_number_prefix")]
    pub entry_number_prefix: String,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            entry_number_prefix: default_entry_number_prefix(),
        }
    }
}

fn default_entry_number_prefix() -> String {
    "AST".to_string()
}

impl AccountingConfig {
    /// Checks that the entry number prefix is ASCII letters, digits and dashes.
    ///
    /// Stored numbers are searched by prefix, so characters with a meaning in
    /// SQL patterns (`%`, `_`, `\`) are refused.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` describing the offending prefix.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let prefix = &self.entry_number_prefix;
        let valid = !prefix.is_empty()
            && !prefix.starts_with('-')
            && prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

        if valid {
            Ok(())
        } else {
            Err(config::ConfigError::Message(format!(
                "accounting.entry_number_prefix {prefix:?} must be ASCII letters, digits or dashes"
            )))
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `OBRADOR__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or a setting is
    /// out of range.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("OBRADOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.accounting.validate()?;
        Ok(config)
    }

    /// Access token lifetime in whole minutes.
    #[must_use]
    pub fn access_token_expires_minutes(&self) -> i64 {
        i64::try_from(self.jwt.access_token_expiry_secs / 60).unwrap_or(i64::MAX)
    }
}
