use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,
    pub prompt_char_budget: usize,
    pub pdftotext_bin: String,
    pub max_upload_mb: usize,
    pub ai_timeout_secs: u64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:8080".to_string(),
            openai_api_key: None,
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            openai_model: "gpt-4o".to_string(),
            prompt_char_budget: 4000,
            pdftotext_bin: "pdftotext".to_string(),
            max_upload_mb: 20,
            ai_timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", defaults.server_address),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            openai_api_url: get_env_or("OPENAI_API_URL", defaults.openai_api_url),
            openai_model: get_env_or("OPENAI_MODEL", defaults.openai_model),
            prompt_char_budget: get_env_parse_or("PROMPT_CHAR_BUDGET", defaults.prompt_char_budget)?,
            pdftotext_bin: get_env_or("PDFTOTEXT_BIN", defaults.pdftotext_bin),
            max_upload_mb: get_env_parse_or("MAX_UPLOAD_MB", defaults.max_upload_mb)?,
            ai_timeout_secs: get_env_parse_or("AI_TIMEOUT_SECS", defaults.ai_timeout_secs)?,
        })
    }
}

fn get_env_or(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
