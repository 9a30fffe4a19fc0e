//! Operation parameters shared by every chain family.
//!
//! These are the exact shapes the relay depends on to finalize state on the
//! hub chain: asset identity, amount in base units, hub-side destination and
//! opaque auxiliary data.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Parameters of a deposit into a spoke chain's asset manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositParams {
	/// Chain-native token address, mint, coin type or denom.
	pub token: String,
	/// Amount in the asset's native base units.
	pub amount: U256,
	/// Hub-side recipient encoding.
	pub to: Bytes,
	/// Opaque auxiliary data forwarded to the hub.
	#[serde(default)]
	pub data: Bytes,
}

impl DepositParams {
	pub fn new(token: impl Into<String>, amount: U256, to: impl Into<Bytes>) -> Self {
		Self {
			token: token.into(),
			amount,
			to: to.into(),
			data: Bytes::new(),
		}
	}

	pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
		self.data = data.into();
		self
	}

	/// Rejects shapes no family accepts.
	pub fn ensure_well_formed(&self) -> crate::Result<()> {
		if self.token.trim().is_empty() {
			return Err(crate::SpokeError::invalid("deposit token must not be empty"));
		}
		if self.amount.is_zero() {
			return Err(crate::SpokeError::invalid("deposit amount must be non-zero"));
		}
		Ok(())
	}
}

/// Opaque instruction executed against the caller's hub-chain abstracted
/// wallet once relayed. Adapters transport it byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallPayload(pub Bytes);

impl CallPayload {
	pub fn as_bytes(&self) -> &Bytes {
		&self.0
	}
}

impl From<Vec<u8>> for CallPayload {
	fn from(bytes: Vec<u8>) -> Self {
		CallPayload(bytes.into())
	}
}

impl From<Bytes> for CallPayload {
	fn from(bytes: Bytes) -> Self {
		CallPayload(bytes)
	}
}

/// The caller's originating address on the hub chain.
pub type HubAddress = Address;
