use crate::config::Config;
use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use bigdecimal::BigDecimal;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub struct ValidationReport {
    pub environment: bool,
    pub payment_api: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// An unreachable payment API is reported but does not fail validation.
    pub fn is_valid(&self) -> bool {
        self.environment
    }

    pub fn print(&self) {
        println!("\n=== Startup Validation Report ===");
        println!("Environment Variables: {}", status(self.environment));
        println!("Payment API:           {}", status(self.payment_api));

        if !self.errors.is_empty() {
            println!("\nErrors:");
            for error in &self.errors {
                println!("  ❌ {}", error);
            }
        }

        println!("\nOverall Status: {}", if self.is_valid() { "✅ PASS" } else { "❌ FAIL" });
        println!("=================================\n");
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✅ OK" } else { "❌ FAIL" }
}

pub async fn validate_environment(config: &Config) -> ValidationReport {
    let mut report = ValidationReport {
        environment: true,
        payment_api: true,
        errors: Vec::new(),
    };

    if let Err(e) = validate_env_vars(config) {
        report.environment = false;
        report.errors.push(format!("Environment: {:#}", e));
    }

    if report.environment {
        if let Err(e) = validate_payment_api(&config.payment_api_url).await {
            report.payment_api = false;
            report.errors.push(format!("Payment API: {:#}", e));
        }
    } else {
        report.payment_api = false;
    }

    report
}

fn validate_env_vars(config: &Config) -> Result<()> {
    if config.payment_api_url.is_empty() {
        anyhow::bail!("PAYMENT_API_URL is empty");
    }
    if config.server_port == 0 {
        anyhow::bail!("SERVER_PORT must be greater than 0");
    }
    if config.request_timeout.is_zero() {
        anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
    }
    if config.campaign.minimum_amount <= BigDecimal::from(0) {
        anyhow::bail!("PREORDER_MINIMUM_AMOUNT must be greater than 0");
    }

    let url = url::Url::parse(&config.payment_api_url)
        .context("PAYMENT_API_URL is not a valid URL")?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("PAYMENT_API_URL must use http or https");
    }

    Ok(())
}

async fn validate_payment_api(payment_api_url: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    client
        .get(payment_api_url)
        .send()
        .await
        .context("Failed to connect to the payment API")?;

    Ok(())
}

/// CORS for the pre-order API. Without configured origins any origin may call it.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE]);

    match &config.cors_allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(origins))
        }
        None => layer.allow_origin(AllowOrigin::any()),
    }
}
