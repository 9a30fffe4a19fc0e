use serde::{Deserialize, Serialize};

/// Soroban contract argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StellarArg {
	/// Account (`G...`) or contract (`C...`) strkey.
	Address(String),
	/// Serialized as a decimal string to survive JSON round trips.
	I128(String),
	U128(String),
	Bytes(Vec<u8>),
}

/// Soroban contract invocation prepared for a Stellar wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StellarTransaction {
	pub source: String,
	pub contract_id: String,
	pub function: String,
	pub args: Vec<StellarArg>,
	/// Network passphrase the wallet signs for.
	pub network_passphrase: String,
}

/// Fee in stroops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StellarFee {
	pub resource_fee: u64,
	pub inclusion_fee: u64,
}
