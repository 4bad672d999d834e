//! hubspot-link CLI - HubSpot authorization through the integration backend
//!
//! This binary can:
//! - Start the HubSpot OAuth flow by opening the backend's authorization URL
//! - Show the credentials the backend stored after authorization
//! - Report whether HubSpot is connected
//! - List CRM items (contacts, companies, deals) with the stored access token

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hubspot_link_core::{config, HubSpotIntegration, IntegrationConfig, ItemsClient};

#[derive(Parser)]
#[command(name = "hubspot-link")]
#[command(version)]
#[command(about = "Connect HubSpot through an integration backend")]
#[command(long_about = "
hubspot-link talks to an integration backend that runs the HubSpot OAuth
flow and keeps the resulting tokens. It never sees your HubSpot password.

Quick start:
  1. Authorize:        hubspot-link authorize
  2. Check the result: hubspot-link status
  3. Browse data:      hubspot-link items

Set HUBSPOT_LINK_API_URL to point at a backend other than http://localhost:5000.
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the HubSpot authorization page
    #[command(alias = "login")]
    Authorize {
        /// Print the authorization URL instead of opening a browser
        #[arg(long)]
        no_browser: bool,
    },

    /// Print the credentials held by the backend
    Credentials,

    /// Show whether HubSpot is connected
    Status,

    /// List HubSpot contacts, companies and deals
    Items,

    /// Show configuration paths and settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("hubspot_link={},hubspot_link_core={}", log_level, log_level).into()
            }),
        )
        .with_target(false)
        .init();

    let endpoint = config::load_integration_config();
    tracing::debug!("Using backend {} (from {})", endpoint.api_url, endpoint.source);
    let hubspot = HubSpotIntegration::new(&endpoint);

    match cli.command {
        Commands::Authorize { no_browser } => cmd_authorize(&cli, &hubspot, no_browser).await,
        Commands::Credentials => cmd_credentials(&cli, &hubspot).await,
        Commands::Status => cmd_status(&cli, &hubspot).await,
        Commands::Items => cmd_items(&cli, &hubspot).await,
        Commands::Config => cmd_config(&cli, &endpoint),
    }
}

async fn cmd_authorize(cli: &Cli, hubspot: &HubSpotIntegration, no_browser: bool) -> Result<()> {
    let url = if no_browser {
        hubspot
            .authorization_url()
            .await
            .context("Failed to get HubSpot authorization URL")?
    } else {
        hubspot
            .authorize()
            .await
            .context("Failed to start HubSpot authorization (try --no-browser)")?
    };

    match cli.format {
        OutputFormat::Text => {
            if no_browser {
                println!("Visit the following URL to authorize HubSpot:\n\n{}\n", url);
            } else {
                println!("Opened HubSpot authorization in your browser.");
                println!("If nothing happened, visit:\n\n{}\n", url);
            }
            println!("Then check the result with: hubspot-link status");
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "status": "awaiting_authorization",
                    "authorization_url": url,
                    "browser_opened": !no_browser,
                })
            );
        }
    }

    Ok(())
}

async fn cmd_credentials(cli: &Cli, hubspot: &HubSpotIntegration) -> Result<()> {
    let creds = hubspot
        .get_credentials()
        .await
        .context("Failed to get HubSpot credentials")?;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(creds.as_value())?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(creds.as_value())?);
        }
    }

    Ok(())
}

async fn cmd_status(cli: &Cli, hubspot: &HubSpotIntegration) -> Result<()> {
    let authenticated = hubspot.is_authenticated().await;

    match cli.format {
        OutputFormat::Text => {
            if authenticated {
                println!("Status: Connected");
            } else {
                println!("Status: Not connected");
                println!();
                println!("Run 'hubspot-link authorize' to connect HubSpot.");
            }
            println!("Backend: {}", hubspot.base_url());
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "authenticated": authenticated,
                    "backend": hubspot.base_url(),
                })
            );
        }
    }

    Ok(())
}

async fn cmd_items(cli: &Cli, hubspot: &HubSpotIntegration) -> Result<()> {
    let creds = hubspot
        .get_credentials()
        .await
        .context("Failed to get HubSpot credentials")?;

    let items = ItemsClient::new()
        .list_items_with_credentials(&creds)
        .await
        .context("Failed to list HubSpot items")?;

    match cli.format {
        OutputFormat::Text => {
            println!("Found {} items:", items.len());
            println!();
            for item in &items {
                println!("  {:8} {:30} {}", item.item_type, item.name, item.id);
                println!(
                    "           created {}, updated {}",
                    item.creation_time.as_deref().unwrap_or("-"),
                    item.last_modified_time.as_deref().unwrap_or("-")
                );
                println!("           {}", item.url);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "items": items }));
        }
    }

    Ok(())
}

fn cmd_config(cli: &Cli, endpoint: &IntegrationConfig) -> Result<()> {
    let config_path = config::get_config_file_path_string();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration");
            println!("=============");
            println!();
            println!("Config file:  {}", config_path);
            println!("Backend URL:  {} (from {})", endpoint.api_url, endpoint.source);
            println!();
            println!("Environment variables:");
            println!("  {} - Override backend URL", config::ENV_API_URL);
            println!();
            println!("Example config.toml:");
            println!();
            println!("{}", config::generate_example_config());
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": config_path,
                    "api_url": endpoint.api_url,
                    "api_source": endpoint.source.to_string(),
                })
            );
        }
    }

    Ok(())
}
