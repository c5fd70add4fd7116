use std::time::Duration;

use reqwest::Url;

use crate::errors::AppError;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client settings read from the environment (`.env` is loaded by the
/// binary before this runs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub request_timeout: Duration,
    pub restore_draft_on_failure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            restore_draft_on_failure: false,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let base_url = lookup("CHAT_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let parsed = Url::parse(&base_url)
            .map_err(|e| AppError::invalid_config("CHAT_API_BASE_URL", e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::invalid_config(
                "CHAT_API_BASE_URL",
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let api_token = lookup("CHAT_API_TOKEN").filter(|t| !t.trim().is_empty());

        let request_timeout = match lookup("CHAT_REQUEST_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(AppError::invalid_config(
                        "CHAT_REQUEST_TIMEOUT_SECS",
                        format!("expected a positive number of seconds, got '{raw}'"),
                    ))
                }
            },
        };

        let restore_draft_on_failure = match lookup("CHAT_RESTORE_DRAFT_ON_FAILURE") {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::invalid_config(
                    "CHAT_RESTORE_DRAFT_ON_FAILURE",
                    format!("expected true/false, got '{raw}'"),
                )
            })?,
        };

        Ok(Self { base_url, api_token, request_timeout, restore_draft_on_failure })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
