use anyhow::Result;
use std::fmt;

use crate::time::parse_tz;

#[derive(Clone)]
pub struct Config {
    // Ledger
    pub etherscan_base_url: String,
    /// Default credential; `--api-key` overrides it.
    pub etherscan_api_key: Option<String>,

    // Generative model
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,

    // Runtime
    pub tz: chrono_tz::Tz,
    pub log_json: bool,
}

fn redact(v: &Option<String>) -> &'static str {
    if v.is_some() { "<set>" } else { "<unset>" }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("etherscan_base_url", &self.etherscan_base_url)
            .field("etherscan_api_key", &redact(&self.etherscan_api_key))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("tz", &self.tz)
            .field("log_json", &self.log_json)
            .finish()
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|s| s.trim().to_lowercase()) {
        None => default,
        Some(v) if v.is_empty() => default,
        Some(v) if v == "1" || v == "true" || v == "yes" || v == "y" || v == "on" => true,
        Some(v) if v == "0" || v == "false" || v == "no" || v == "n" || v == "off" => false,
        Some(_) => default,
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let etherscan_base_url = env_non_empty("ETHERSCAN_BASE_URL")
            .unwrap_or_else(|| "https://api.etherscan.io/api".to_string());
        let etherscan_api_key = env_non_empty("ETHERSCAN_API_KEY");

        let gemini_base_url = env_non_empty("GEMINI_BASE_URL")
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string());
        let gemini_model = env_non_empty("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string());
        let gemini_api_key = env_non_empty("GEMINI_API_KEY").or_else(|| env_non_empty("API_KEY"));

        let tz = parse_tz(&env_non_empty("ETHERSIGHT_TZ").unwrap_or_else(|| "UTC".to_string()))?;
        let log_json = env_bool("ETHERSIGHT_LOG_JSON", false);

        Ok(Self {
            etherscan_base_url,
            etherscan_api_key,
            gemini_base_url,
            gemini_model,
            gemini_api_key,
            tz,
            log_json,
        })
    }
}
