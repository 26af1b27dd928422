use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use weekplate_shopping::{GroceryOptions, MixedUnitPolicy};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub planning: PlanningConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Recipe catalog; the bundled catalog is used when unset
    #[serde(default)]
    pub recipes_path: Option<String>,
    /// Department keyword table; the bundled table is used when unset
    #[serde(default)]
    pub departments_path: Option<String>,
    pub history_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlanningConfig {
    #[serde(default = "default_required_recipes")]
    pub required_recipes: usize,
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: usize,
    #[serde(default = "default_max_per_protein")]
    pub max_per_protein: usize,
    #[serde(default = "default_max_per_cuisine")]
    pub max_per_cuisine: usize,
    #[serde(default)]
    pub mixed_units: MixedUnitPolicy,
    #[serde(default)]
    pub optimize_quantities: bool,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            required_recipes: default_required_recipes(),
            suggestion_count: default_suggestion_count(),
            max_per_protein: default_max_per_protein(),
            max_per_cuisine: default_max_per_cuisine(),
            mixed_units: MixedUnitPolicy::default(),
            optimize_quantities: false,
        }
    }
}

impl PlanningConfig {
    pub fn grocery_options(&self) -> GroceryOptions {
        GroceryOptions {
            required_recipes: self.required_recipes,
            mixed_units: self.mixed_units,
            optimize_quantities: self.optimize_quantities,
        }
    }
}

fn default_required_recipes() -> usize {
    4
}

fn default_suggestion_count() -> usize {
    20
}

fn default_max_per_protein() -> usize {
    3
}

fn default_max_per_cuisine() -> usize {
    4
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (WEEKPLATE__SERVER__PORT, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("data.history_path", "data/history.json")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("WEEKPLATE")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.planning.required_recipes == 0 {
            return Err("planning.required_recipes must be at least 1".to_string());
        }
        if self.planning.suggestion_count == 0 {
            return Err("planning.suggestion_count must be at least 1".to_string());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            ));
        }
        Ok(())
    }
}
