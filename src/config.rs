//! Application configuration loaded from environment variables.

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    // === Store Configuration ===
    /// MongoDB connection string.
    #[serde(default = "default_mongodb_uri")]
    pub mongodb_uri: String,

    /// Database holding the schedule collection.
    #[serde(default = "default_mongodb_database")]
    pub mongodb_database: String,

    /// Schedule collection name.
    #[serde(default = "default_mongodb_collection")]
    pub mongodb_collection: String,
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_mongodb_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_mongodb_database() -> String {
    "gym".to_string()
}

fn default_mongodb_collection() -> String {
    "schedule".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            rust_log: default_log_level(),
            mongodb_uri: default_mongodb_uri(),
            mongodb_database: default_mongodb_database(),
            mongodb_collection: default_mongodb_collection(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> std::result::Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Pass the configuration through [`Config::validate`].
    pub fn checked(self) -> Result<Self> {
        self.validate().map_err(AppError::InvalidConfig)?;
        Ok(self)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if self.mongodb_uri.is_empty() {
            return Err("MONGODB_URI is required".to_string());
        }

        if !self.mongodb_uri.starts_with("mongodb://")
            && !self.mongodb_uri.starts_with("mongodb+srv://")
        {
            return Err("MONGODB_URI must start with mongodb:// or mongodb+srv://".to_string());
        }

        if self.mongodb_database.is_empty() {
            return Err("MONGODB_DATABASE must not be empty".to_string());
        }

        if self.mongodb_collection.is_empty() {
            return Err("MONGODB_COLLECTION must not be empty".to_string());
        }

        Ok(())
    }
}
