//! Command-line interface definitions.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spoke-cli")]
#[command(about = "Deposit into and call through spoke chains of the hub", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
	/// Path to configuration file
	#[arg(short, long, value_name = "FILE", env = "SPOKE_CONFIG", default_value = "config/spoke.toml")]
	pub config: PathBuf,

	/// Log level (trace, debug, info, warn, error), overridden by RUST_LOG
	#[arg(long, env = "SPOKE_LOG_LEVEL", default_value = "info")]
	pub log_level: String,

	#[command(subcommand)]
	pub command: Command,
}

/// A deposit as given on the command line.
#[derive(ClapArgs, Debug, Clone)]
pub struct DepositArgs {
	/// Spoke chain name from the configuration
	#[arg(long)]
	pub chain: String,

	/// Token address (zero address for the native asset)
	#[arg(long)]
	pub token: String,

	/// Amount in base units, decimal or 0x-hex
	#[arg(long)]
	pub amount: String,

	/// Hub-side recipient, hex encoded
	#[arg(long)]
	pub to: String,

	/// Auxiliary data forwarded to the hub, hex encoded
	#[arg(long, default_value = "")]
	pub data: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Validate the configuration file
	Validate,

	/// Deposit into a spoke chain's asset manager
	Deposit {
		#[command(flatten)]
		deposit: DepositArgs,

		/// Print the prepared transaction instead of submitting it
		#[arg(long)]
		raw: bool,
	},

	/// Show the escrowed balance of a token
	GetDeposit {
		#[arg(long)]
		chain: String,

		#[arg(long)]
		token: String,
	},

	/// Send a payload to the caller's hub wallet
	CallWallet {
		#[arg(long)]
		chain: String,

		/// Payload executed by the hub wallet, hex encoded
		#[arg(long)]
		payload: String,

		/// Hub origin address; defaults to the signer's abstracted wallet
		#[arg(long)]
		from: Option<String>,

		/// Print the prepared transaction instead of submitting it
		#[arg(long)]
		raw: bool,
	},

	/// Prepare a deposit and estimate its cost
	EstimateDeposit {
		#[command(flatten)]
		deposit: DepositArgs,
	},

	/// Derive the hub wallet of a spoke account
	HubWallet {
		#[arg(long)]
		chain: String,

		/// Spoke account address, hex encoded
		#[arg(long)]
		address: String,
	},
}
