use serde::{Deserialize, Serialize};

/// Argument of a Move call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SuiArgument {
	/// Shared or owned object id.
	Object(String),
	/// Coin of `coin_type` split from the sender's balance.
	SplitCoin { coin_type: String, amount: u64 },
	Address(String),
	U64(u64),
	U256(String),
	Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiMoveCall {
	pub package: String,
	pub module: String,
	pub function: String,
	pub type_arguments: Vec<String>,
	pub arguments: Vec<SuiArgument>,
}

/// Programmable transaction block prepared for a Sui wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiTransaction {
	pub sender: String,
	pub calls: Vec<SuiMoveCall>,
	/// Left empty for the wallet to fill from a dry run.
	pub gas_budget: Option<u64>,
}

/// Gas cost summary in MIST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiGasCost {
	pub computation_cost: u64,
	pub storage_cost: u64,
	pub storage_rebate: u64,
}

impl SuiGasCost {
	/// Net budget the sender must cover.
	pub fn net(&self) -> u64 {
		(self.computation_cost + self.storage_cost).saturating_sub(self.storage_rebate)
	}
}
