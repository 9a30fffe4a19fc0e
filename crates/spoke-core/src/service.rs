//! The spoke dispatcher.
//!
//! `SpokeService` owns no chain logic. It matches the provider's family,
//! builds the adapter for it and lifts the adapter's chain-native result into
//! the family-erased `PreparedTransaction` / `GasEstimate` shapes.

use crate::provider::SpokeProvider;
use spoke_adapters::{
	EvmAdapter, IconAdapter, InjectiveAdapter, SolanaAdapter, SonicAdapter, SpokeAdapter,
	StellarAdapter, SuiAdapter,
};
use spoke_chains::{HubProvider, RetryPolicy, U256};
use spoke_types::{
	CallPayload, DepositParams, GasEstimate, HubAddress, PreparedTransaction, Raw, SpokeError,
	Submit, Submitter, TransactionHash, TxMode, TxResult,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Builds the adapter matching `$provider` and evaluates `$body` with it.
///
/// Inside `$body`, `$lift` wraps the adapter's transaction into
/// `PreparedTransaction` and `$unlift` recovers it, handing back any
/// transaction of another family unchanged. The match is exhaustive, so a new
/// family does not compile until it has an adapter here.
macro_rules! dispatch {
	($provider:expr, $retry:expr, |$adapter:ident, $lift:ident, $unlift:ident| $body:expr) => {
		dispatch!(@arms $provider, $retry, $adapter, $lift, $unlift, $body;
			Evm => EvmAdapter,
			Sonic => SonicAdapter,
			Solana => SolanaAdapter,
			Sui => SuiAdapter,
			Stellar => StellarAdapter,
			Icon => IconAdapter,
			Injective => InjectiveAdapter
		)
	};
	(@arms $provider:expr, $retry:expr, $adapter:ident, $lift:ident, $unlift:ident, $body:expr;
		$($family:ident => $adapter_ty:ident),+
	) => {
		match $provider {
			$(
				SpokeProvider::$family(bound) => {
					let $adapter =
						$adapter_ty::new(bound.config(), bound.wallet(), bound.client(), $retry)?;
					#[allow(unused_variables)]
					let $lift = PreparedTransaction::$family;
					#[allow(unused_variables)]
					let $unlift = |tx: PreparedTransaction| match tx {
						PreparedTransaction::$family(inner) => Ok(inner),
						other => Err(other),
					};
					$body
				}
			)+
		}
	};
}

fn family_mismatch(tx: &PreparedTransaction, provider: &SpokeProvider) -> SpokeError {
	SpokeError::invalid(format!(
		"{} transaction cannot be used with {} provider {}",
		tx.family(),
		provider.family(),
		provider.name()
	))
}

/// Dispatches the four spoke operations to the adapter of each provider.
#[derive(Debug, Clone, Default)]
pub struct SpokeService {
	retry: RetryPolicy,
}

impl SpokeService {
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the retry policy applied to idempotent reads.
	pub fn with_retry(retry: RetryPolicy) -> Self {
		Self { retry }
	}

	/// Estimates the cost of `tx` on the provider's chain.
	///
	/// `tx` must be shaped for the provider's family; anything else is
	/// `InvalidParams` and never reaches the network.
	#[instrument(skip_all, fields(family = %provider.family(), chain = %provider.name()))]
	pub async fn estimate_gas(
		&self,
		tx: &PreparedTransaction,
		provider: &SpokeProvider,
		cancel: &CancellationToken,
	) -> Result<GasEstimate, SpokeError> {
		if tx.family() != provider.family() {
			return Err(family_mismatch(tx, provider));
		}
		debug!("Dispatching estimate_gas");

		dispatch!(provider, &self.retry, |adapter, lift, unlift| {
			let native = unlift(tx.clone()).map_err(|other| family_mismatch(&other, provider))?;
			let estimate = adapter.estimate_gas(&native, cancel).await?;
			Ok(estimate.into())
		})
	}

	/// Deposits into the provider's asset manager in mode `M`.
	#[instrument(skip_all, fields(family = %provider.family(), chain = %provider.name(), raw = M::RAW))]
	pub async fn deposit<M: TxMode>(
		&self,
		params: &DepositParams,
		provider: &SpokeProvider,
		hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<PreparedTransaction>, SpokeError> {
		debug!(token = %params.token, amount = %params.amount, "Dispatching deposit");

		dispatch!(provider, &self.retry, |adapter, lift, unlift| {
			let output = adapter.deposit::<M>(params, hub, cancel).await?;
			Ok(M::map(output, lift))
		})
	}

	/// `deposit` with the mode chosen at runtime.
	pub async fn deposit_with_mode(
		&self,
		params: &DepositParams,
		provider: &SpokeProvider,
		hub: &HubProvider,
		raw: bool,
		cancel: &CancellationToken,
	) -> Result<TxResult, SpokeError> {
		if raw {
			let prepared = self.deposit::<Raw>(params, provider, hub, cancel).await?;
			Ok(Raw::into_result(prepared))
		} else {
			let hash = self.deposit::<Submit>(params, provider, hub, cancel).await?;
			Ok(Submit::into_result(hash))
		}
	}

	/// Escrowed balance of `token`. Never signs.
	#[instrument(skip_all, fields(family = %provider.family(), chain = %provider.name()))]
	pub async fn get_deposit(
		&self,
		token: &str,
		provider: &SpokeProvider,
		cancel: &CancellationToken,
	) -> Result<U256, SpokeError> {
		debug!(token, "Dispatching get_deposit");

		dispatch!(provider, &self.retry, |adapter, lift, unlift| {
			adapter.get_deposit(token, cancel).await
		})
	}

	/// Relays `payload` to the hub wallet of `from` in mode `M`.
	#[instrument(skip_all, fields(family = %provider.family(), chain = %provider.name(), raw = M::RAW))]
	pub async fn call_wallet<M: TxMode>(
		&self,
		from: HubAddress,
		payload: &CallPayload,
		provider: &SpokeProvider,
		hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<PreparedTransaction>, SpokeError> {
		debug!(from = %from, payload_len = payload.as_bytes().len(), "Dispatching call_wallet");

		dispatch!(provider, &self.retry, |adapter, lift, unlift| {
			let output = adapter.call_wallet::<M>(from, payload, hub, cancel).await?;
			Ok(M::map(output, lift))
		})
	}

	/// `call_wallet` with the mode chosen at runtime.
	pub async fn call_wallet_with_mode(
		&self,
		from: HubAddress,
		payload: &CallPayload,
		provider: &SpokeProvider,
		hub: &HubProvider,
		raw: bool,
		cancel: &CancellationToken,
	) -> Result<TxResult, SpokeError> {
		if raw {
			let prepared = self
				.call_wallet::<Raw>(from, payload, provider, hub, cancel)
				.await?;
			Ok(Raw::into_result(prepared))
		} else {
			let hash = self
				.call_wallet::<Submit>(from, payload, provider, hub, cancel)
				.await?;
			Ok(Submit::into_result(hash))
		}
	}

	/// Submits a transaction previously prepared in `Raw` mode.
	#[instrument(skip_all, fields(family = %provider.family(), chain = %provider.name()))]
	pub async fn submit(
		&self,
		tx: PreparedTransaction,
		provider: &SpokeProvider,
		cancel: &CancellationToken,
	) -> Result<TransactionHash, SpokeError> {
		if tx.family() != provider.family() {
			return Err(family_mismatch(&tx, provider));
		}
		debug!("Dispatching submit");

		dispatch!(provider, &self.retry, |adapter, lift, unlift| {
			let native = unlift(tx).map_err(|other| family_mismatch(&other, provider))?;
			adapter.submit(native, cancel).await
		})
	}
}
