use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// SCORE method call carried in a `call` data transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconCall {
	pub method: String,
	/// Parameters in ICON JSON-RPC form: `0x`-prefixed hex for numbers
	/// and bytes, plain strings for addresses.
	pub params: BTreeMap<String, String>,
}

/// ICON transaction (v3) prepared for an ICON wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconTransaction {
	pub from: String,
	pub to: String,
	/// Value in loop.
	pub value: U256,
	/// Network id, e.g. `0x1` on mainnet.
	pub nid: String,
	pub data: IconCall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconStepCost {
	pub step_limit: u64,
}
