pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    ai_service::AIService, extraction_service::ExtractionService, session_store::SessionStore,
};
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub ai_service: AIService,
    pub extraction_service: ExtractionService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.ai_timeout_secs);
        let http_client = Client::builder().timeout(timeout).build()?;

        let ai_service = AIService::new(
            http_client,
            config.openai_api_url.clone(),
            config.openai_model.clone(),
            config.openai_api_key.clone(),
            config.prompt_char_budget,
            timeout,
        );
        let extraction_service = ExtractionService::new(config.pdftotext_bin.clone());

        Ok(Self {
            sessions: SessionStore::new(),
            ai_service,
            extraction_service,
        })
    }
}
