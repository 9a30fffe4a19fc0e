//! Transaction delivery types.
//!
//! Hashes and receipts returned once a chain-native transaction has been
//! submitted and observed on chain.

use alloy::primitives::B256;
use std::fmt;

/// Transaction hash or signature.
///
/// Stored as raw bytes to support different chain formats: 32-byte hashes on
/// EVM, ICON and Cosmos chains, 64-byte signatures on Solana, 32-byte digests
/// on Sui and Stellar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TransactionHash(pub Vec<u8>);

impl TransactionHash {
	/// Short form for log lines.
	pub fn truncated(&self) -> String {
		let hash_str = hex::encode(&self.0);
		if hash_str.len() <= 8 {
			hash_str
		} else {
			format!("{}..", &hash_str[..8])
		}
	}
}

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

impl From<B256> for TransactionHash {
	fn from(hash: B256) -> Self {
		TransactionHash(hash.0.to_vec())
	}
}

/// Transaction receipt containing execution details.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransactionReceipt {
	pub hash: TransactionHash,
	/// Block, slot, checkpoint or ledger the transaction landed in.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
}
