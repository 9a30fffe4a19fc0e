//! Signing capabilities bound to spoke providers.
//!
//! A `WalletProvider` signs and submits transactions of exactly one chain
//! family. Concrete wallets for non-EVM families are supplied by the caller;
//! this crate ships a local private-key wallet for EVM chains.

use async_trait::async_trait;
use spoke_types::{SpokeError, TransactionHash};
use std::sync::Arc;
use thiserror::Error;

pub mod implementations {
	pub mod local;
}

pub use implementations::local::LocalWallet;

#[derive(Debug, Error)]
pub enum AccountError {
	/// The user or the signing backend declined to sign.
	#[error("Signing rejected: {0}")]
	Rejected(String),
	/// No signing backend is reachable (locked wallet, missing extension).
	#[error("Signer unavailable: {0}")]
	Unavailable(String),
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// The node refused the signed transaction for lack of funds.
	#[error("Insufficient funds: {0}")]
	InsufficientFunds(String),
	#[error("Insufficient gas: {0}")]
	InsufficientGas(String),
	/// The submission endpoint could not be reached.
	#[error("Provider error: {0}")]
	Provider(String),
}

impl From<AccountError> for SpokeError {
	fn from(err: AccountError) -> Self {
		match err {
			AccountError::Rejected(msg) | AccountError::Unavailable(msg) => {
				SpokeError::SigningRejected(msg)
			}
			AccountError::InvalidKey(msg) => SpokeError::Config(msg),
			AccountError::InsufficientFunds(msg) => SpokeError::InsufficientFunds(msg),
			AccountError::InsufficientGas(msg) => SpokeError::InsufficientGas(msg),
			AccountError::Provider(msg) => SpokeError::TransportFailure(msg),
		}
	}
}

/// Sign-and-submit capability for one chain family.
#[async_trait]
pub trait WalletProvider: Send + Sync {
	/// Chain-native transaction shape this wallet signs.
	type Transaction: Send + Sync;

	/// Address of the signing account in the chain's textual form.
	async fn address(&self) -> Result<String, AccountError>;

	/// Signs and submits a transaction, returning its hash or signature.
	async fn send_transaction(&self, tx: &Self::Transaction)
		-> Result<TransactionHash, AccountError>;
}

/// Shared handle to a wallet of transaction type `T`.
pub type DynWallet<T> = Arc<dyn WalletProvider<Transaction = T>>;

/// Maps a node error message onto the account error taxonomy.
pub fn classify_submission_error(message: String) -> AccountError {
	let lower = message.to_ascii_lowercase();
	if lower.contains("insufficient funds") || lower.contains("insufficient balance") {
		AccountError::InsufficientFunds(message)
	} else if lower.contains("intrinsic gas too low")
		|| lower.contains("out of gas")
		|| lower.contains("gas required exceeds")
	{
		AccountError::InsufficientGas(message)
	} else if lower.contains("denied") || lower.contains("rejected") {
		AccountError::Rejected(message)
	} else {
		AccountError::Provider(message)
	}
}
