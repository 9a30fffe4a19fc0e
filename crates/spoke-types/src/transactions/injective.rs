use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmosCoin {
	pub denom: String,
	pub amount: String,
}

/// CosmWasm `MsgExecuteContract` prepared for an Injective wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectiveTransaction {
	pub sender: String,
	pub contract: String,
	pub msg: serde_json::Value,
	pub funds: Vec<CosmosCoin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmosGas {
	pub gas_used: u64,
	pub gas_wanted: u64,
}
