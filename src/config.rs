use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub paging: PagingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    pub base_url: String,
    /// Base for relative photo paths; defaults to `base_url`
    pub asset_base_url: Option<String>,
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_true")]
    pub demo_fallback: bool,
}

impl UpstreamSettings {
    pub fn asset_base(&self) -> &str {
        self.asset_base_url.as_deref().unwrap_or(&self.base_url)
    }
}

fn default_endpoints() -> Vec<String> {
    vec![
        "/reco/pets".to_string(),
        "/animals".to_string(),
        "/pets".to_string(),
    ]
}

fn default_true() -> bool { true }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagingSettings {
    #[serde(default = "default_page_size")]
    pub default_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_size: u32,
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self {
            default_size: default_page_size(),
            max_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u32 { 12 }
fn default_max_page_size() -> u32 { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

/// Scoring rule table as configured; see [`ScoringWeights`]
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_base_available")]
    pub base_available: f64,
    #[serde(default = "default_base_unavailable")]
    pub base_unavailable: f64,
    #[serde(default = "default_block_penalty")]
    pub block_penalty: f64,
    #[serde(default = "default_hold_medical_penalty")]
    pub hold_medical_penalty: f64,
    #[serde(default = "default_limit_behavior_penalty")]
    pub limit_behavior_penalty: f64,
    #[serde(default = "default_beginner_bonus")]
    pub beginner_bonus: f64,
    #[serde(default = "default_activity_mismatch_penalty")]
    pub activity_mismatch_penalty: f64,
    #[serde(default = "default_neuter_bonus")]
    pub neuter_bonus: f64,
    #[serde(default = "default_proximity_weight")]
    pub proximity: f64,
    #[serde(default = "default_small_size_bonus")]
    pub small_size_bonus: f64,
    #[serde(default = "default_young_age_penalty")]
    pub young_age_penalty: f64,
    #[serde(default = "default_senior_age_bonus")]
    pub senior_age_bonus: f64,
    #[serde(default = "default_photo_bonus")]
    pub photo_bonus: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            base_available: default_base_available(),
            base_unavailable: default_base_unavailable(),
            block_penalty: default_block_penalty(),
            hold_medical_penalty: default_hold_medical_penalty(),
            limit_behavior_penalty: default_limit_behavior_penalty(),
            beginner_bonus: default_beginner_bonus(),
            activity_mismatch_penalty: default_activity_mismatch_penalty(),
            neuter_bonus: default_neuter_bonus(),
            proximity: default_proximity_weight(),
            small_size_bonus: default_small_size_bonus(),
            young_age_penalty: default_young_age_penalty(),
            senior_age_bonus: default_senior_age_bonus(),
            photo_bonus: default_photo_bonus(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(w: &WeightsConfig) -> Self {
        Self {
            base_available: w.base_available,
            base_unavailable: w.base_unavailable,
            block_penalty: w.block_penalty,
            hold_medical_penalty: w.hold_medical_penalty,
            limit_behavior_penalty: w.limit_behavior_penalty,
            beginner_bonus: w.beginner_bonus,
            activity_mismatch_penalty: w.activity_mismatch_penalty,
            neuter_bonus: w.neuter_bonus,
            proximity: w.proximity,
            small_size_bonus: w.small_size_bonus,
            young_age_penalty: w.young_age_penalty,
            senior_age_bonus: w.senior_age_bonus,
            photo_bonus: w.photo_bonus,
        }
    }
}

fn default_base_available() -> f64 { 40.0 }
fn default_base_unavailable() -> f64 { 10.0 }
fn default_block_penalty() -> f64 { 60.0 }
fn default_hold_medical_penalty() -> f64 { 30.0 }
fn default_limit_behavior_penalty() -> f64 { 15.0 }
fn default_beginner_bonus() -> f64 { 10.0 }
fn default_activity_mismatch_penalty() -> f64 { 10.0 }
fn default_neuter_bonus() -> f64 { 6.0 }
fn default_proximity_weight() -> f64 { 20.0 }
fn default_small_size_bonus() -> f64 { 5.0 }
fn default_young_age_penalty() -> f64 { 6.0 }
fn default_senior_age_bonus() -> f64 { 4.0 }
fn default_photo_bonus() -> f64 { 3.0 }

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
    /// Layered load, later sources win: struct defaults, `config/default.toml`,
    /// `config/local.toml`, `MATCHPET__*` variables, then `API_BASE_URL`,
    /// `ASSET_BASE_URL`, `LOG_LEVEL` and `LOG_FORMAT`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env_source())
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load one explicit file plus `MATCHPET__*` variables
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

/// `MATCHPET__UPSTREAM__BASE_URL` -> `upstream.base_url`
fn env_source() -> Environment {
    Environment::with_prefix("MATCHPET")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the conventional unprefixed variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(base_url) = env::var("API_BASE_URL") {
        builder = builder.set_override("upstream.base_url", base_url)?;
    }
    if let Ok(asset_base_url) = env::var("ASSET_BASE_URL") {
        builder = builder.set_override("upstream.asset_base_url", asset_base_url)?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}
