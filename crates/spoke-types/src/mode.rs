//! Prepare/submit mode markers.
//!
//! Whether an operation returns a prepared transaction or a confirmed hash is
//! chosen by the caller through the `M: TxMode` type parameter. Adapters build
//! the chain-native transaction and hand it to `M::complete`; only `Submit`
//! ever reaches a signing capability.

use crate::{delivery::TransactionHash, errors::SpokeError, transactions::PreparedTransaction};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Anything able to sign, submit and confirm one chain-native transaction.
#[async_trait]
pub trait Submitter: Send + Sync {
	type Transaction: Send + Sync + 'static;

	/// Signs, submits and waits for confirmation. Never retried.
	async fn submit(
		&self,
		tx: Self::Transaction,
		cancel: &CancellationToken,
	) -> Result<TransactionHash, SpokeError>;
}

/// Caller-selected operation mode.
#[async_trait]
pub trait TxMode: Send + Sync + 'static {
	/// True when the operation only prepares a transaction.
	const RAW: bool;

	/// Result of an operation producing a transaction of type `T`.
	type Output<T: Send + 'static>: Send + 'static;

	/// Finishes an operation whose transaction has been built.
	async fn complete<S: Submitter>(
		submitter: &S,
		tx: S::Transaction,
		cancel: &CancellationToken,
	) -> Result<Self::Output<S::Transaction>, SpokeError>;

	/// Maps the prepared transaction, leaving submitted hashes untouched.
	fn map<T: Send + 'static, U: Send + 'static>(
		output: Self::Output<T>,
		f: impl FnOnce(T) -> U,
	) -> Self::Output<U>;

	/// Erases the mode into a runtime `TxResult`.
	fn into_result(output: Self::Output<PreparedTransaction>) -> TxResult;
}

/// Prepare only: the transaction is returned unsigned and unsubmitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw;

/// Sign, submit and wait for confirmation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Submit;

#[async_trait]
impl TxMode for Raw {
	const RAW: bool = true;

	type Output<T: Send + 'static> = T;

	async fn complete<S: Submitter>(
		_submitter: &S,
		tx: S::Transaction,
		_cancel: &CancellationToken,
	) -> Result<Self::Output<S::Transaction>, SpokeError> {
		Ok(tx)
	}

	fn map<T: Send + 'static, U: Send + 'static>(
		output: Self::Output<T>,
		f: impl FnOnce(T) -> U,
	) -> Self::Output<U> {
		f(output)
	}

	fn into_result(output: Self::Output<PreparedTransaction>) -> TxResult {
		TxResult::Prepared(output)
	}
}

#[async_trait]
impl TxMode for Submit {
	const RAW: bool = false;

	type Output<T: Send + 'static> = TransactionHash;

	async fn complete<S: Submitter>(
		submitter: &S,
		tx: S::Transaction,
		cancel: &CancellationToken,
	) -> Result<Self::Output<S::Transaction>, SpokeError> {
		submitter.submit(tx, cancel).await
	}

	fn map<T: Send + 'static, U: Send + 'static>(
		output: Self::Output<T>,
		_f: impl FnOnce(T) -> U,
	) -> Self::Output<U> {
		output
	}

	fn into_result(output: Self::Output<PreparedTransaction>) -> TxResult {
		TxResult::Submitted(output)
	}
}

/// Mode-erased result for callers choosing the mode at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum TxResult {
	Prepared(PreparedTransaction),
	Submitted(TransactionHash),
}

impl TxResult {
	pub fn is_prepared(&self) -> bool {
		matches!(self, TxResult::Prepared(_))
	}

	pub fn prepared(self) -> Option<PreparedTransaction> {
		match self {
			TxResult::Prepared(tx) => Some(tx),
			TxResult::Submitted(_) => None,
		}
	}
}
