use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Pipeline configuration.
///
/// Base URLs are overridable so tests can point the FDC and LLM clients at
/// local mock servers.
#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// FoodData Central API key; nutrition lookup is skipped when absent
    pub fdc_api_key: Option<String>,
    /// FoodData Central endpoint
    #[serde(default = "default_fdc_base_url")]
    pub fdc_base_url: String,
    /// OpenAI API key; the LLM fallback strategy is skipped when absent
    pub openai_api_key: Option<String>,
    /// Model used by the LLM fallback strategy
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// OpenAI-compatible endpoint
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    /// Page fetch timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fdc_api_key: None,
            fdc_base_url: default_fdc_base_url(),
            openai_api_key: None,
            openai_model: default_openai_model(),
            openai_base_url: default_openai_base_url(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_fdc_base_url() -> String {
    "https://api.nal.usda.gov".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_fetch_timeout() -> u64 {
    15
}

impl PipelineConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables with RECIPE_EXTRACT prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_EXTRACT__FDC_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("RECIPE_EXTRACT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
