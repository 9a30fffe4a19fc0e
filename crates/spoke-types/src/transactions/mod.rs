//! Chain-native transaction shapes.
//!
//! Each family prepares its own transaction type. `PreparedTransaction` lifts
//! them into one closed enum at the dispatcher boundary, and `GasEstimate`
//! does the same for fee estimates.

mod evm;
mod icon;
mod injective;
mod solana;
mod stellar;
mod sui;

pub use evm::*;
pub use icon::*;
pub use injective::*;
pub use solana::*;
pub use stellar::*;
pub use sui::*;

use crate::chains::ChainFamily;
use serde::{Deserialize, Serialize};

/// A prepared, unsigned and unsubmitted transaction of any family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", content = "transaction", rename_all = "lowercase")]
pub enum PreparedTransaction {
	Evm(EvmTransaction),
	Sonic(EvmTransaction),
	Solana(SolanaTransaction),
	Sui(SuiTransaction),
	Stellar(StellarTransaction),
	Icon(IconTransaction),
	Injective(InjectiveTransaction),
}

impl PreparedTransaction {
	pub fn family(&self) -> ChainFamily {
		match self {
			PreparedTransaction::Evm(_) => ChainFamily::Evm,
			PreparedTransaction::Sonic(_) => ChainFamily::Sonic,
			PreparedTransaction::Solana(_) => ChainFamily::Solana,
			PreparedTransaction::Sui(_) => ChainFamily::Sui,
			PreparedTransaction::Stellar(_) => ChainFamily::Stellar,
			PreparedTransaction::Icon(_) => ChainFamily::Icon,
			PreparedTransaction::Injective(_) => ChainFamily::Injective,
		}
	}
}

/// Family-specific cost estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum GasEstimate {
	/// Gas units, for EVM spokes and the hub.
	Evm { gas: u64 },
	Solana(SolanaFee),
	Sui(SuiGasCost),
	Stellar(StellarFee),
	Icon(IconStepCost),
	Injective(CosmosGas),
}

impl From<u64> for GasEstimate {
	fn from(gas: u64) -> Self {
		GasEstimate::Evm { gas }
	}
}

impl From<SolanaFee> for GasEstimate {
	fn from(fee: SolanaFee) -> Self {
		GasEstimate::Solana(fee)
	}
}

impl From<SuiGasCost> for GasEstimate {
	fn from(cost: SuiGasCost) -> Self {
		GasEstimate::Sui(cost)
	}
}

impl From<StellarFee> for GasEstimate {
	fn from(fee: StellarFee) -> Self {
		GasEstimate::Stellar(fee)
	}
}

impl From<IconStepCost> for GasEstimate {
	fn from(cost: IconStepCost) -> Self {
		GasEstimate::Icon(cost)
	}
}

impl From<CosmosGas> for GasEstimate {
	fn from(gas: CosmosGas) -> Self {
		GasEstimate::Injective(gas)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{Address, Bytes, U256};

	#[test]
	fn test_prepared_family() {
		let tx = EvmTransaction {
			from: Address::ZERO,
			to: Address::repeat_byte(1),
			value: U256::ZERO,
			data: Bytes::new(),
			chain_id: 42161,
		};
		assert_eq!(PreparedTransaction::Evm(tx.clone()).family(), ChainFamily::Evm);
		assert_eq!(PreparedTransaction::Sonic(tx).family(), ChainFamily::Sonic);
	}

	#[test]
	fn test_prepared_serializes_with_family_tag() {
		let tx = PreparedTransaction::Injective(InjectiveTransaction {
			sender: "inj1sender".to_string(),
			contract: "inj1contract".to_string(),
			msg: serde_json::json!({ "transfer": {} }),
			funds: vec![],
		});
		let json = serde_json::to_value(&tx).unwrap();
		assert_eq!(json["family"], "injective");
		assert_eq!(json["transaction"]["contract"], "inj1contract");
	}

	#[test]
	fn test_gas_estimate_lifting() {
		assert_eq!(GasEstimate::from(21_000u64), GasEstimate::Evm { gas: 21_000 });
		let fee = SolanaFee {
			compute_units: 200_000,
			fee_lamports: 5_000,
		};
		assert_eq!(GasEstimate::from(fee), GasEstimate::Solana(fee));
	}
}
