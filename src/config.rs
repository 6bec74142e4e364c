use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;

pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
pub const API_KEY_ENV: &str = "FMP_API_KEY";

#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioConfig {
    pub tickers: Vec<String>,
    pub weights: Vec<f64>,
    pub days: usize,
    pub chart_output: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DcfConfig {
    pub ticker: String,
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    pub correlation_file: String,
    pub dot_output: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub portfolio: Option<PortfolioConfig>,
    pub dcf: Option<DcfConfig>,
    pub network: Option<NetworkConfig>,
}

impl AppConfig {
    /// API key from the config file, falling back to `FMP_API_KEY`.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        resolve_api_key(self.api.api_key.as_deref(), std::env::var(API_KEY_ENV).ok())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn resolve_api_key(configured: Option<&str>, env: Option<String>) -> Result<String, ConfigError> {
    configured
        .filter(|k| !k.trim().is_empty())
        .map(str::to_string)
        .or(env.filter(|k| !k.trim().is_empty()))
        .ok_or(ConfigError::MissingApiKey)
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
