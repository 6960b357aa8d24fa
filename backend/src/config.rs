//! Deployment settings loaded from the environment

use crate::ingestion::utils::PORTAL_BASE_URL;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub output_dir: PathBuf,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Read `.env` (if present) and the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            bind_addr: lookup("BIND_ADDR")
                .unwrap_or_else(|| "127.0.0.1:8000".to_string())
                .parse()
                .context("BIND_ADDR must be a socket address like 127.0.0.1:8000")?,

            output_dir: lookup("OUTPUT_DIR").unwrap_or_else(|| ".".to_string()).into(),

            base_url: lookup("WRIS_BASE_URL").unwrap_or_else(|| PORTAL_BASE_URL.to_string()),

            request_timeout: Duration::from_secs(
                lookup("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|| "25".to_string())
                    .parse()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}
