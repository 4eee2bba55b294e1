use std::collections::HashMap;
use thiserror::Error;

use crate::domain::AccountId;

/// Default number of journal rows fetched per page; matches the upstream
/// importer's full-journal read size.
const DEFAULT_JOURNAL_PAGE_SIZE: &str = "10000";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub sync_accounts: Vec<AccountId>,
    pub export_dir: Option<String>,
    pub journal_page_size: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let sync_accounts = parse_sync_accounts_from_map(&env_map)?;

        let export_dir = env_map.get("EXPORT_DIR").cloned();

        let journal_page_size = env_map
            .get("JOURNAL_PAGE_SIZE")
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_JOURNAL_PAGE_SIZE)
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "JOURNAL_PAGE_SIZE".to_string(),
                    "must be a valid u32".to_string(),
                )
            })?;
        if journal_page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "JOURNAL_PAGE_SIZE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            database_path,
            sync_accounts,
            export_dir,
            journal_page_size,
        })
    }
}

fn parse_sync_accounts_from_map(
    env_map: &HashMap<String, String>,
) -> Result<Vec<AccountId>, ConfigError> {
    let raw: Vec<String> = if let Some(accounts_str) = env_map.get("SYNC_ACCOUNTS") {
        accounts_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else if let Some(file_path) = env_map.get("SYNC_ACCOUNTS_FILE") {
        let content = std::fs::read_to_string(file_path).map_err(|_| {
            ConfigError::InvalidValue(
                "SYNC_ACCOUNTS_FILE".to_string(),
                "file not found or unreadable".to_string(),
            )
        })?;
        content
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        Vec::new()
    };

    raw.into_iter()
        .map(|s| {
            s.parse::<i64>().map(AccountId::new).map_err(|_| {
                ConfigError::InvalidValue(
                    "SYNC_ACCOUNTS".to_string(),
                    format!("not a valid account id: {}", s),
                )
            })
        })
        .collect()
}
