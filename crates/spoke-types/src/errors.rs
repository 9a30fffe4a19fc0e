//! Error types for the spoke dispatch layer.

use crate::delivery::TransactionHash;
use crate::validation::ValidationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpokeError>;

/// Errors surfaced by adapters and the dispatcher.
///
/// Adapters produce these; the dispatcher passes them through unmodified and
/// only raises `UnsupportedProvider` itself.
#[derive(Error, Debug)]
pub enum SpokeError {
	/// No adapter matches the provider identity.
	#[error("Unsupported provider: {family}")]
	UnsupportedProvider { family: String },

	/// RPC endpoint unreachable or timed out.
	#[error("Transport failure: {0}")]
	TransportFailure(String),

	/// The signing capability declined or is unavailable.
	#[error("Signing rejected: {0}")]
	SigningRejected(String),

	#[error("Insufficient funds: {0}")]
	InsufficientFunds(String),

	#[error("Insufficient gas: {0}")]
	InsufficientGas(String),

	/// Parameters or a prepared transaction shaped for the wrong family.
	#[error("Invalid params: {0}")]
	InvalidParams(String),

	/// The transaction was included but failed on chain.
	#[error("Transaction rejected by chain: {0}")]
	ChainRejected(String),

	/// Broadcast succeeded but confirmation was never observed. The
	/// transaction may still land; resubmitting can duplicate it.
	#[error("Confirmation unknown for {hash}: {reason}")]
	ConfirmationUnknown { hash: TransactionHash, reason: String },

	#[error("Operation cancelled")]
	Cancelled,

	#[error("Configuration error: {0}")]
	Config(String),
}

impl SpokeError {
	/// Only transport failures may be retried, and only for reads.
	pub fn is_retryable(&self) -> bool {
		matches!(self, SpokeError::TransportFailure(_))
	}

	pub fn unsupported(family: impl Into<String>) -> Self {
		SpokeError::UnsupportedProvider {
			family: family.into(),
		}
	}

	pub fn invalid(message: impl Into<String>) -> Self {
		SpokeError::InvalidParams(message.into())
	}
}

impl From<ValidationError> for SpokeError {
	fn from(err: ValidationError) -> Self {
		SpokeError::Config(err.to_string())
	}
}
