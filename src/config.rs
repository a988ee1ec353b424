use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub mod campaign;

pub use campaign::CampaignSettings;

pub const DEFAULT_PAYMENT_API_URL: &str = "https://flounderx-backend-production.up.railway.app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub payment_api_url: String,
    pub request_timeout: Duration,
    pub log_request_body: bool,
    pub log_format: LogFormat,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub campaign: CampaignSettings,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        let mut campaign = CampaignSettings::default();
        if let Ok(raw) = env::var("PREORDER_MINIMUM_AMOUNT") {
            campaign.minimum_amount = raw
                .trim()
                .parse()
                .context("PREORDER_MINIMUM_AMOUNT must be a decimal number")?;
        }
        if let Ok(raw) = env::var("SUCCESS_DISPLAY_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .context("SUCCESS_DISPLAY_MS must be a whole number of milliseconds")?;
            campaign.success_display = Duration::from_millis(millis);
        }

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a port number")?,
            payment_api_url: env::var("PAYMENT_API_URL")
                .unwrap_or_else(|_| DEFAULT_PAYMENT_API_URL.to_string()),
            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            log_request_body: parse_flag(env::var("LOG_REQUEST_BODY").ok().as_deref()),
            log_format: parse_log_format(env::var("LOG_FORMAT").ok().as_deref()),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .and_then(|raw| parse_origins(&raw)),
            campaign,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_port: 3000,
            payment_api_url: DEFAULT_PAYMENT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            log_request_body: false,
            log_format: LogFormat::Text,
            cors_allowed_origins: None,
            campaign: CampaignSettings::default(),
        }
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    raw.map(|value| value.trim().eq_ignore_ascii_case("true") || value.trim() == "1")
        .unwrap_or(false)
}

fn parse_log_format(raw: Option<&str>) -> LogFormat {
    match raw.map(|value| value.trim().to_ascii_lowercase()) {
        Some(value) if value == "json" => LogFormat::Json,
        _ => LogFormat::Text,
    }
}

fn parse_origins(raw: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        None
    } else {
        Some(origins)
    }
}
