use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::domain::order::to_cents;
use crate::domain::DraftPatch;
use crate::gateway::PaymentApiClient;
use crate::services::PreorderController;
use crate::startup::{cors_layer, validate_environment};
use crate::{create_app, AppState};

#[derive(Parser)]
#[command(name = "flounderx-preorder")]
#[command(about = "FloundeRx pre-order campaign service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Place a single pre-order against the payment API
    Submit(SubmitArgs),

    /// Configuration validation
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    #[arg(long)]
    pub email: String,

    /// Amount in USD
    #[arg(long)]
    pub amount: String,

    /// Name on the card
    #[arg(long)]
    pub card_name: String,

    #[arg(long)]
    pub card_number: String,

    /// Expiry as MM/YY
    #[arg(long)]
    pub expiry: String,

    #[arg(long)]
    pub cvc: String,
}

impl From<SubmitArgs> for DraftPatch {
    fn from(args: SubmitArgs) -> Self {
        DraftPatch {
            email: Some(args.email),
            amount: Some(args.amount),
            card_name: Some(args.card_name),
            card_number: Some(args.card_number),
            expiry: Some(args.expiry),
            cvc: Some(args.cvc),
        }
    }
}

pub async fn handle_serve(config: &Config) -> anyhow::Result<()> {
    let report = validate_environment(config).await;
    if !report.is_valid() {
        report.print();
        anyhow::bail!("Configuration is invalid");
    }
    if !report.payment_api {
        tracing::warn!(
            url = %config.payment_api_url,
            "Payment API is not reachable yet; submissions will fail until it is"
        );
    }

    let state = AppState::from_config(config);
    tracing::info!(
        "Payment API client initialized with URL: {}",
        config.payment_api_url
    );

    let app = create_app(state).layer(cors_layer(config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub async fn handle_submit(config: &Config, args: SubmitArgs) -> anyhow::Result<()> {
    let client =
        PaymentApiClient::with_timeout(config.payment_api_url.clone(), config.request_timeout);
    let controller = PreorderController::new(Arc::new(client), config.campaign.clone());

    controller.apply_patch(&DraftPatch::from(args)).await;

    match controller.submit().await {
        Ok(order) => {
            println!("✓ Pre-order confirmed");
            println!("  Order ID:   {}", order.id());
            println!("  Email:      {}", order.email());
            println!("  Amount:     ${}", to_cents(order.amount()));
            println!("  Bonus:      +${}", order.bonus());
            println!("  Card:       ending in {}", order.card_last4());
            println!("  Date:       {}", order.display_date());
            println!(
                "  Raised:     ${}",
                to_cents(&controller.total_raised().await)
            );
            Ok(())
        }
        Err(e) => anyhow::bail!("Pre-order failed: {}", e),
    }
}

pub async fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port:        {}", config.server_port);
    println!("  Payment API URL:    {}", config.payment_api_url);
    println!("  Request Timeout:    {}s", config.request_timeout.as_secs());
    println!("  Minimum Amount:     ${}", config.campaign.minimum_amount);
    println!(
        "  Success Display:    {}ms",
        config.campaign.success_display.as_millis()
    );

    let report = validate_environment(config).await;
    report.print();

    if !report.is_valid() {
        anyhow::bail!("Configuration is invalid");
    }

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}
