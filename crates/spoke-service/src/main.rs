use anyhow::{Context, Result};
use clap::Parser;
use spoke_config::ConfigLoader;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::{Cli, Command};
use commands::Session;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level)?;

	info!("Loading configuration from: {:?}", cli.config);
	let config = ConfigLoader::from_file(&cli.config).context("Failed to load configuration")?;

	if let Command::Validate = cli.command {
		info!("Configuration is valid");
		info!("Hub chain: {} ({})", config.hub.chain_id, config.hub.rpc_url);
		for (name, spoke) in &config.spokes {
			info!("  Spoke: {} ({}, chain id {})", name, spoke.family, spoke.chain_id);
		}
		return Ok(());
	}

	let cancel = CancellationToken::new();
	watch_shutdown(cancel.clone());

	let session = Session::new(config, cancel).context("Failed to start session")?;
	match cli.command {
		Command::Validate => Ok(()),
		Command::Deposit { deposit, raw } => session.deposit(&deposit, raw).await,
		Command::GetDeposit { chain, token } => session.get_deposit(&chain, &token).await,
		Command::CallWallet {
			chain,
			payload,
			from,
			raw,
		} => {
			session
				.call_wallet(&chain, &payload, from.as_deref(), raw)
				.await
		}
		Command::EstimateDeposit { deposit } => session.estimate_deposit(&deposit).await,
		Command::HubWallet { chain, address } => session.hub_wallet(&chain, &address).await,
	}
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	Ok(())
}

/// Cancels in-flight work on Ctrl+C.
fn watch_shutdown(cancel: CancellationToken) {
	tokio::spawn(async move {
		match tokio::signal::ctrl_c().await {
			Ok(()) => {
				warn!("Interrupted, cancelling");
				cancel.cancel();
			}
			Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
		}
	});
}
