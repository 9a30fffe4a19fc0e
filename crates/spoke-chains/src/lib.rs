//! Chain RPC clients used by the spoke adapters.
//!
//! A `ChainClient` covers the read side of one chain family: fee estimation,
//! balance reads and confirmation tracking. Submission goes through the
//! signing capability instead. Concrete clients for non-EVM families are
//! supplied by the caller; the EVM client is built on Alloy.

use async_trait::async_trait;
use spoke_types::{EvmTransaction, SpokeError, TransactionHash, TransactionReceipt};
use thiserror::Error;

pub mod bindings;
pub mod hub;
pub mod utils;

pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

pub use alloy::primitives::{Address, Bytes, U256};
pub use hub::{decode_wallet, wallet_lookup, HubProvider};
pub use implementations::evm::alloy::AlloyClient;
pub use utils::{cancellable, retry_read, RetryPolicy};

#[derive(Debug, Error)]
pub enum ClientError {
	#[error("Transport error: {0}")]
	Transport(String),
	#[error("Insufficient funds: {0}")]
	InsufficientFunds(String),
	#[error("Insufficient gas: {0}")]
	InsufficientGas(String),
	/// Execution or simulation failed on chain.
	#[error("Reverted: {0}")]
	Reverted(String),
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	#[error("Invalid request: {0}")]
	InvalidRequest(String),
}

impl From<ClientError> for SpokeError {
	fn from(err: ClientError) -> Self {
		match err {
			ClientError::Transport(msg) | ClientError::InvalidResponse(msg) => {
				SpokeError::TransportFailure(msg)
			}
			ClientError::InsufficientFunds(msg) => SpokeError::InsufficientFunds(msg),
			ClientError::InsufficientGas(msg) => SpokeError::InsufficientGas(msg),
			ClientError::Reverted(msg) => SpokeError::ChainRejected(msg),
			ClientError::InvalidRequest(msg) => SpokeError::InvalidParams(msg),
		}
	}
}

/// Read-side RPC contract of one chain family.
#[async_trait]
pub trait ChainClient: Send + Sync {
	type Transaction: Send + Sync;
	type GasEstimate: Send;

	/// Estimates the cost of a prepared transaction without submitting it.
	async fn estimate_fee(&self, tx: &Self::Transaction) -> Result<Self::GasEstimate, ClientError>;

	/// Balance of `token` held by `holder`. Native assets use the family's
	/// native sentinel (zero address, system program, `0x2::sui::SUI`,
	/// native asset contract, `cx000...`, base denom).
	async fn balance_of(&self, holder: &str, token: &str) -> Result<U256, ClientError>;

	/// Waits until the transaction is final enough for the relay to observe.
	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, ClientError>;
}

/// EVM client, with contract calls on top of the common read side.
#[async_trait]
pub trait EvmClient: ChainClient<Transaction = EvmTransaction, GasEstimate = u64> {
	/// Executes a read-only call against the latest block.
	async fn call(&self, tx: &EvmTransaction) -> Result<Bytes, ClientError>;
}

/// Maps an RPC error message onto the client error taxonomy.
pub fn classify_rpc_error(message: String) -> ClientError {
	let lower = message.to_ascii_lowercase();
	if lower.contains("insufficient funds") {
		ClientError::InsufficientFunds(message)
	} else if lower.contains("intrinsic gas too low")
		|| lower.contains("out of gas")
		|| lower.contains("gas required exceeds")
	{
		ClientError::InsufficientGas(message)
	} else if lower.contains("execution reverted") || lower.contains("revert") {
		ClientError::Reverted(message)
	} else {
		ClientError::Transport(message)
	}
}
