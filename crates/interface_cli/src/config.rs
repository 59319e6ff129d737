//! CLI configuration

use serde::Deserialize;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level
    pub log_level: String,
    /// Value of the `source` attribute on the exported XML
    pub xml_source: String,
    /// Whether to print the run summary to stderr
    pub summary: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            xml_source: "recurring-invoicing".to_string(),
            summary: true,
        }
    }
}

impl CliConfig {
    /// Loads configuration from `INVOICING_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("INVOICING").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
