use alloy::{
	network::TransactionBuilder,
	primitives::{Address, Bytes, U256},
	rpc::types::TransactionRequest,
};
use serde::{Deserialize, Serialize};

/// EVM transaction as prepared by the EVM and Sonic adapters.
///
/// Nonce and fee fields are left to the wallet's fillers at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmTransaction {
	pub from: Address,
	pub to: Address,
	/// Value to transfer in native currency.
	pub value: U256,
	pub data: Bytes,
	/// Chain ID for replay protection.
	pub chain_id: u64,
}

/// Conversion from our transaction type to Alloy's TransactionRequest.
impl From<&EvmTransaction> for TransactionRequest {
	fn from(tx: &EvmTransaction) -> Self {
		TransactionRequest::default()
			.with_from(tx.from)
			.with_to(tx.to)
			.with_value(tx.value)
			.with_input(tx.data.clone())
			.with_chain_id(tx.chain_id)
	}
}

impl From<EvmTransaction> for TransactionRequest {
	fn from(tx: EvmTransaction) -> Self {
		(&tx).into()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::TxKind;

	#[test]
	fn test_conversion_to_request() {
		let tx = EvmTransaction {
			from: Address::repeat_byte(0x11),
			to: Address::repeat_byte(0x22),
			value: U256::from(1000u64),
			data: Bytes::from(vec![1u8, 2, 3]),
			chain_id: 10,
		};

		let request: TransactionRequest = tx.clone().into();

		assert_eq!(request.from, Some(tx.from));
		assert_eq!(request.to, Some(TxKind::Call(tx.to)));
		assert_eq!(request.value, Some(U256::from(1000u64)));
		assert_eq!(request.chain_id, Some(10));
		assert_eq!(request.input.input().cloned(), Some(tx.data));
		assert!(request.nonce.is_none());
	}
}
