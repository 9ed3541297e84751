//! CLI command implementations

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::fs;
use std::sync::Arc;

use crate::auth::models::{AccountUpdate, AccountView, Role};
use crate::cli::{error, format_role, info, print_account_table, success, warn, OutputFormat};
use crate::config::{self, Config};
use crate::store::{self, AccountStore};

/// Initialize a new storefront.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new(config::loader::CONFIG_FILENAME);

    if config_path.exists() {
        warn("storefront.toml already exists");
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success("Created storefront.toml");
    info("Set JWT_SECRET (and optionally DATABASE_URL) and run 'storefront serve'");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));

    if let Err(e) = crate::api::run_server(config, &host, port).await {
        error(&format!("Server stopped: {}", e));
        return Err(e.into());
    }
    Ok(())
}

/// List registered accounts
pub async fn users(format: OutputFormat) -> Result<()> {
    let config = load_config()?;
    let accounts = open_database(&config).await?;

    let views: Vec<AccountView> = accounts
        .list()
        .await?
        .into_iter()
        .map(AccountView::from)
        .collect();

    match format {
        OutputFormat::Table => print_account_table(&views),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&views)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&views)?),
    }

    Ok(())
}

/// Grant or revoke the admin role
pub async fn promote(email: &str, revoke: bool, yes: bool) -> Result<()> {
    let config = load_config()?;
    let accounts = open_database(&config).await?;

    let Some(account) = accounts.find_by_email(email).await? else {
        bail!("No account registered with email '{}'", email);
    };

    let role = if revoke { Role::Ordinary } else { Role::Privileged };
    if account.role == role {
        info(&format!("{} already has role '{}'", email, role));
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Change role of {} to '{}'?", email, role))
            .default(false)
            .interact()?;
        if !confirmed {
            warn("Aborted");
            return Ok(());
        }
    }

    accounts
        .update_by_id(&account.id, AccountUpdate::role(role))
        .await?;

    tracing::info!(account_id = %account.id, role = %role, "role changed");
    success(&format!("{} now has role '{}'", email, format_role(role)));

    Ok(())
}

fn load_config() -> Result<Config> {
    config::load_config().map_err(|e| anyhow::anyhow!("{}", e))
}

/// Account administration only makes sense against a persistent store
async fn open_database(config: &Config) -> Result<Arc<dyn AccountStore>> {
    if config.database.url.is_none() {
        bail!("This command needs [database] url in storefront.toml");
    }
    Ok(store::connect(config).await?)
}
