//! Chain families and chain configuration.

use crate::errors::SpokeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of spoke-chain families.
///
/// Every family has exactly one adapter. Adding a variant here is a compile
/// error in the dispatcher until every operation handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainFamily {
	/// EVM spoke chains (Arbitrum, Base, Optimism, Polygon, ...).
	Evm,
	/// The hub chain acting as its own spoke.
	Sonic,
	Solana,
	Sui,
	Stellar,
	Icon,
	Injective,
}

impl ChainFamily {
	pub const ALL: [ChainFamily; 7] = [
		ChainFamily::Evm,
		ChainFamily::Sonic,
		ChainFamily::Solana,
		ChainFamily::Sui,
		ChainFamily::Stellar,
		ChainFamily::Icon,
		ChainFamily::Injective,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			ChainFamily::Evm => "evm",
			ChainFamily::Sonic => "sonic",
			ChainFamily::Solana => "solana",
			ChainFamily::Sui => "sui",
			ChainFamily::Stellar => "stellar",
			ChainFamily::Icon => "icon",
			ChainFamily::Injective => "injective",
		}
	}

	/// Whether transactions of this family are EVM transactions.
	pub fn is_evm(&self) -> bool {
		matches!(self, ChainFamily::Evm | ChainFamily::Sonic)
	}
}

impl fmt::Display for ChainFamily {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ChainFamily {
	type Err = SpokeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_lowercase();
		ChainFamily::ALL
			.into_iter()
			.find(|family| family.as_str() == normalized)
			.ok_or_else(|| SpokeError::UnsupportedProvider {
				family: s.to_string(),
			})
	}
}

/// Configuration of a single spoke chain.
///
/// Addresses are kept in their chain-native textual form (hex for EVM and
/// ICON, base58 for Solana, strkey for Stellar, bech32 for Injective) and
/// parsed by the adapter that owns the family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokeChainConfig {
	/// Human-readable name, also the key in the configuration file.
	pub name: String,
	/// Relay-level chain identifier.
	pub chain_id: u64,
	pub family: ChainFamily,
	pub rpc_url: String,
	/// Asset-manager contract, program or package.
	pub asset_manager: String,
	/// Messaging contract used to reach the hub.
	pub connection: String,
	/// Wallet factory deriving hub wallets, for spokes living on the hub.
	#[serde(default)]
	pub wallet_abstraction: Option<String>,
	/// Chain-native network identifier where one is needed (ICON nid,
	/// Cosmos chain id, Stellar passphrase).
	#[serde(default)]
	pub network_id: Option<String>,
	/// Confirmations awaited after submission.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
}

fn default_confirmations() -> u64 {
	1
}

/// Configuration of the hub chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubChainConfig {
	pub chain_id: u64,
	pub rpc_url: String,
	/// Factory deriving one abstracted wallet per spoke account.
	pub wallet_factory: String,
	/// Hub asset manager crediting relayed deposits.
	pub asset_manager: String,
}
