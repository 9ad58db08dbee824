//! Configuration module for the shift swap backend.
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
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("SHIFTSWAP_API_PSK").ok().filter(|s| !s.is_empty());

        let db_path = env::var("SHIFTSWAP_DB_PATH")
            .unwrap_or_else(|_| "./data/shiftswap.sqlite".to_string())
            .into();

        let raw_bind_addr =
            env::var("SHIFTSWAP_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = raw_bind_addr
            .parse()
            .map_err(|e| format!("Invalid SHIFTSWAP_BIND_ADDR '{}': {}", raw_bind_addr, e))?;

        let log_level = env::var("SHIFTSWAP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("SHIFTSWAP_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            log_json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share one test so they never race on the process environment.
    #[test]
    fn test_env_config() {
        env::remove_var("SHIFTSWAP_API_PSK");
        env::remove_var("SHIFTSWAP_DB_PATH");
        env::remove_var("SHIFTSWAP_BIND_ADDR");
        env::remove_var("SHIFTSWAP_LOG_LEVEL");
        env::remove_var("SHIFTSWAP_LOG_FORMAT");

        let config = Config::from_env().unwrap();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/shiftswap.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);

        env::set_var("SHIFTSWAP_BIND_ADDR", "not-an-address");
        assert!(Config::from_env().is_err());
        env::remove_var("SHIFTSWAP_BIND_ADDR");
    }
}
