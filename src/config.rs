use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{MatchingRules, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub redis: RedisSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3001 }

/// Which record store backs profiles and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Postgres,
    Redis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String { "data".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_redis_url() -> String { "redis://127.0.0.1:6379".to_string() }
fn default_key_prefix() -> String { "choice".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub from_address: Option<String>,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_app_url")]
    pub app_url: String,
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            from_address: None,
            from_name: default_from_name(),
            app_url: default_app_url(),
            timeout_secs: default_notify_timeout(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl NotificationSettings {
    /// Relay endpoint and sender address, when delivery is fully configured
    pub fn relay(&self) -> Option<(&str, &str)> {
        if !self.enabled {
            return None;
        }
        match (self.endpoint.as_deref(), self.from_address.as_deref()) {
            (Some(endpoint), Some(from)) if !endpoint.is_empty() && !from.is_empty() => {
                Some((endpoint, from))
            }
            _ => None,
        }
    }
}

fn default_from_name() -> String { "Choice Love".to_string() }
fn default_app_url() -> String { "http://localhost:3001".to_string() }
fn default_notify_timeout() -> u64 { 30 }
fn default_queue_capacity() -> usize { 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_compatibility")]
    pub min_compatibility: u32,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_max_shared_interests")]
    pub max_shared_interests: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_compatibility: default_min_compatibility(),
            max_results: default_max_results(),
            max_shared_interests: default_max_shared_interests(),
        }
    }
}

impl From<&MatchingSettings> for MatchingRules {
    fn from(settings: &MatchingSettings) -> Self {
        MatchingRules {
            min_compatibility: settings.min_compatibility,
            max_results: settings.max_results,
            max_shared_interests: settings.max_shared_interests,
        }
    }
}

fn default_min_compatibility() -> u32 { 40 }
fn default_max_results() -> usize { 10 }
fn default_max_shared_interests() -> usize { 5 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_cultural_values_weight")]
    pub cultural_values: f64,
    #[serde(default = "default_core_weight")]
    pub family: f64,
    #[serde(default = "default_core_weight")]
    pub culture: f64,
    #[serde(default = "default_core_weight")]
    pub relationship_goals: f64,
    #[serde(default = "default_lifestyle_weight")]
    pub lifestyle: f64,
    #[serde(default = "default_lifestyle_weight")]
    pub communication: f64,
    #[serde(default = "default_lifestyle_weight")]
    pub life_goal: f64,
    #[serde(default = "default_preference_weight")]
    pub art: f64,
    #[serde(default = "default_preference_weight")]
    pub music: f64,
    #[serde(default = "default_preference_weight")]
    pub travel: f64,
    #[serde(default = "default_thoughts_weight")]
    pub thoughts: f64,
    #[serde(default = "default_age_weight")]
    pub age: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            cultural_values: default_cultural_values_weight(),
            family: default_core_weight(),
            culture: default_core_weight(),
            relationship_goals: default_core_weight(),
            lifestyle: default_lifestyle_weight(),
            communication: default_lifestyle_weight(),
            life_goal: default_lifestyle_weight(),
            art: default_preference_weight(),
            music: default_preference_weight(),
            travel: default_preference_weight(),
            thoughts: default_thoughts_weight(),
            age: default_age_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        ScoringWeights {
            cultural_values: config.cultural_values,
            family: config.family,
            culture: config.culture,
            relationship_goals: config.relationship_goals,
            lifestyle: config.lifestyle,
            communication: config.communication,
            life_goal: config.life_goal,
            art: config.art,
            music: config.music,
            travel: config.travel,
            thoughts: config.thoughts,
            age: config.age,
        }
    }
}

// Core values weigh most, then lifestyle, then taste
fn default_cultural_values_weight() -> f64 { 3.0 }
fn default_core_weight() -> f64 { 2.5 }
fn default_lifestyle_weight() -> f64 { 2.0 }
fn default_preference_weight() -> f64 { 1.5 }
fn default_thoughts_weight() -> f64 { 1.5 }
fn default_age_weight() -> f64 { 1.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CHOICE)
    /// 5. Conventional variables such as PORT and DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with CHOICE)
            // e.g., CHOICE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CHOICE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CHOICE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    pub fn matching_rules(&self) -> MatchingRules {
        MatchingRules::from(&self.matching)
    }
}

/// Apply the conventional, unprefixed environment variables on top of the
/// layered configuration
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(port) = env::var("PORT") {
        builder = builder.set_override("server.port", port)?;
    }
    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(url) = env::var("REDIS_URL") {
        builder = builder.set_override("redis.url", url)?;
    }
    if let Ok(url) = env::var("APP_URL") {
        builder = builder.set_override("notifications.app_url", url)?;
    }
    if let Ok(user) = env::var("EMAIL_USER") {
        builder = builder.set_override("notifications.from_address", user)?;
    }
    if let Ok(key) = env::var("EMAIL_API_KEY") {
        builder = builder.set_override("notifications.api_key", key)?;
    }
    if let Ok(endpoint) = env::var("EMAIL_ENDPOINT") {
        builder = builder
            .set_override("notifications.endpoint", endpoint)?
            .set_override("notifications.enabled", true)?;
    }

    builder.build()
}
