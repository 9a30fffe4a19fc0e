use serde::{Deserialize, Serialize};

/// Account referenced by a Solana instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaAccountMeta {
	/// Base58 public key.
	pub pubkey: String,
	pub is_signer: bool,
	pub is_writable: bool,
}

impl SolanaAccountMeta {
	pub fn signer(pubkey: impl Into<String>) -> Self {
		Self {
			pubkey: pubkey.into(),
			is_signer: true,
			is_writable: true,
		}
	}

	pub fn writable(pubkey: impl Into<String>) -> Self {
		Self {
			pubkey: pubkey.into(),
			is_signer: false,
			is_writable: true,
		}
	}

	pub fn readonly(pubkey: impl Into<String>) -> Self {
		Self {
			pubkey: pubkey.into(),
			is_signer: false,
			is_writable: false,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaInstruction {
	pub program_id: String,
	pub accounts: Vec<SolanaAccountMeta>,
	pub data: Vec<u8>,
}

/// Unsigned Solana transaction. The recent blockhash is attached by the
/// wallet when it signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaTransaction {
	pub fee_payer: String,
	pub instructions: Vec<SolanaInstruction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaFee {
	pub compute_units: u64,
	pub fee_lamports: u64,
}
