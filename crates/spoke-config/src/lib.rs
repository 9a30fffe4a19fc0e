//! Configuration for the spoke dispatch layer.
//!
//! A configuration file names the hub chain and any number of spoke chains:
//!
//! ```toml
//! [hub]
//! chain_id = 146
//! rpc_url = "https://rpc.soniclabs.com"
//! wallet_factory = "0x..."
//! asset_manager = "0x..."
//!
//! [spokes.arbitrum]
//! family = "evm"
//! chain_id = 42161
//! rpc_url = "https://arb1.arbitrum.io/rpc"
//! asset_manager = "0x..."
//! connection = "0x..."
//! ```
//!
//! Every spoke table is validated against its family's schema before it is
//! deserialized, so a malformed address never reaches an adapter.

use serde::{Deserialize, Serialize};
use spoke_types::{HubChainConfig, SpokeChainConfig, SpokeError};
use std::collections::BTreeMap;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("Invalid [{section}]: {message}")]
	Validation { section: String, message: String },

	#[error("Unknown chain: {0}")]
	UnknownChain(String),

	/// Family-level failure, e.g. an unknown `family` value.
	#[error(transparent)]
	Spoke(#[from] SpokeError),
}

impl From<ConfigError> for SpokeError {
	fn from(err: ConfigError) -> Self {
		match err {
			ConfigError::Spoke(err) => err,
			other => SpokeError::Config(other.to_string()),
		}
	}
}

/// Loaded configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
	pub hub: HubChainConfig,
	/// Spoke chains keyed by name.
	pub spokes: BTreeMap<String, SpokeChainConfig>,
	/// Key of the local EVM wallet, usually injected through the environment.
	#[serde(default, skip_serializing)]
	pub private_key: Option<String>,
}

impl Config {
	pub fn spoke(&self, name: &str) -> Result<&SpokeChainConfig, ConfigError> {
		self.spokes
			.get(name)
			.ok_or_else(|| ConfigError::UnknownChain(name.to_string()))
	}

	/// Spoke chain with the given relay chain id.
	pub fn spoke_by_chain_id(&self, chain_id: u64) -> Option<&SpokeChainConfig> {
		self.spokes.values().find(|spoke| spoke.chain_id == chain_id)
	}
}
