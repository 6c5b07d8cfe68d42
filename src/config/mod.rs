//! Configuration module for the E-Gurukul backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to Tantivy search index directory
    pub index_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL of the AI completion service; fallbacks are used when unset
    pub ai_base_url: Option<String>,
    /// API key for the AI completion service
    pub ai_api_key: Option<String>,
    /// Model name sent to the AI completion service
    pub ai_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("EGURUKUL_API_PSK").ok();

        let db_path = env::var("EGURUKUL_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let index_path = env::var("EGURUKUL_INDEX_PATH")
            .unwrap_or_else(|_| "./data/index".to_string())
            .into();

        let bind_addr = env::var("EGURUKUL_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid EGURUKUL_BIND_ADDR format");

        let log_level = env::var("EGURUKUL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let ai_base_url = env::var("EGURUKUL_AI_BASE_URL").ok();
        let ai_api_key = env::var("EGURUKUL_AI_API_KEY").ok();
        let ai_model =
            env::var("EGURUKUL_AI_MODEL").unwrap_or_else(|_| "llama-3.1-70b".to_string());

        Self {
            api_psk,
            db_path,
            index_path,
            bind_addr,
            log_level,
            ai_base_url,
            ai_api_key,
            ai_model,
        }
    }
}
