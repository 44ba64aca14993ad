use crate::error::AppError;
use crate::market::binance::{SourceEndpoints, BINANCE_REST_BASE_URL, BINANCE_STREAM_BASE_URL};
use crate::market::types::{CandleInterval, DetailSessionArgs, DetailSessionConfig};
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DB_FILENAME: &str = "market-desk.db";

pub const ENV_DATA_DIR: &str = "APP_DATA_DIR";
pub const ENV_DB_FILENAME: &str = "APP_DB_FILENAME";
pub const ENV_REST_BASE_URL: &str = "MARKET_REST_BASE_URL";
pub const ENV_STREAM_BASE_URL: &str = "MARKET_STREAM_BASE_URL";
pub const ENV_DETAIL_SYMBOL: &str = "MARKET_DETAIL_SYMBOL";
pub const ENV_DETAIL_INTERVAL: &str = "MARKET_DETAIL_INTERVAL";

/// Raw host settings; every field is optional until normalized.
#[derive(Debug, Clone, Default)]
pub struct AppArgs {
    pub data_dir: Option<String>,
    pub db_filename: Option<String>,
    pub rest_base_url: Option<String>,
    pub stream_base_url: Option<String>,
    pub detail_symbol: Option<String>,
    pub detail_interval: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_filename: String,
    pub endpoints: SourceEndpoints,
    pub detail: Option<DetailSessionConfig>,
}

impl AppConfig {
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_filename)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_base_url(
    name: &str,
    value: Option<String>,
    default: &str,
    schemes: &[&str],
) -> Result<String, AppError> {
    let value = value.unwrap_or_else(|| default.to_string());
    let has_scheme = schemes.iter().any(|scheme| {
        value
            .strip_prefix(scheme)
            .and_then(|rest| rest.strip_prefix("://"))
            .is_some_and(|host| !host.is_empty())
    });
    if !has_scheme {
        return Err(AppError::InvalidArgument(format!(
            "{name} must start with {}",
            schemes
                .iter()
                .map(|scheme| format!("{scheme}://"))
                .collect::<Vec<_>>()
                .join(" or ")
        )));
    }
    Ok(value)
}

impl AppArgs {
    pub fn from_env() -> Self {
        Self {
            data_dir: env_value(ENV_DATA_DIR),
            db_filename: env_value(ENV_DB_FILENAME),
            rest_base_url: env_value(ENV_REST_BASE_URL),
            stream_base_url: env_value(ENV_STREAM_BASE_URL),
            detail_symbol: env_value(ENV_DETAIL_SYMBOL),
            detail_interval: env_value(ENV_DETAIL_INTERVAL),
        }
    }

    pub fn normalize(self) -> Result<AppConfig, AppError> {
        let db_filename = self
            .db_filename
            .unwrap_or_else(|| DEFAULT_DB_FILENAME.to_string());
        if db_filename.contains(['/', '\\']) {
            return Err(AppError::InvalidArgument(format!(
                "{ENV_DB_FILENAME} must be a bare file name"
            )));
        }

        let endpoints = SourceEndpoints {
            rest_base_url: validate_base_url(
                ENV_REST_BASE_URL,
                self.rest_base_url,
                BINANCE_REST_BASE_URL,
                &["http", "https"],
            )?,
            stream_base_url: validate_base_url(
                ENV_STREAM_BASE_URL,
                self.stream_base_url,
                BINANCE_STREAM_BASE_URL,
                &["ws", "wss"],
            )?,
        };

        let detail = match self.detail_symbol {
            Some(symbol) => {
                let interval = self
                    .detail_interval
                    .as_deref()
                    .map(CandleInterval::parse_str)
                    .transpose()?;
                Some(
                    DetailSessionArgs {
                        symbol,
                        interval,
                        limit: None,
                        poll_interval_ms: None,
                    }
                    .normalize()?,
                )
            }
            None => None,
        };

        Ok(AppConfig {
            data_dir: PathBuf::from(
                self.data_dir
                    .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            ),
            db_filename,
            endpoints,
            detail,
        })
    }
}
