//! Per-family spoke adapters.
//!
//! Each chain family implements the same four operations against its own
//! chain-native transaction model. Adapters borrow the collaborators bound to
//! a provider (chain config, signing capability, RPC client) for the duration
//! of one operation and hold no state of their own.

use async_trait::async_trait;
use spoke_account::WalletProvider;
use spoke_chains::{cancellable, ChainClient, HubProvider, U256};
use spoke_types::{
	CallPayload, ChainFamily, ConfigSchema, DepositParams, GasEstimate, HubAddress,
	SpokeChainConfig, SpokeError, Submitter, TransactionHash, TxMode,
};
use tokio_util::sync::CancellationToken;

pub mod implementations {
	pub mod evm;
	pub mod icon;
	pub mod injective;
	pub mod solana;
	pub mod sonic;
	pub mod stellar;
	pub mod sui;
}

#[cfg(test)]
pub(crate) mod testing;

pub use implementations::{
	evm::EvmAdapter, icon::IconAdapter, injective::InjectiveAdapter, solana::SolanaAdapter,
	sonic::SonicAdapter, stellar::StellarAdapter, sui::SuiAdapter,
};

/// The four operations every chain family supplies.
///
/// `deposit` and `call_wallet` are generic over the caller's mode: with `Raw`
/// they return the prepared transaction and never touch the wallet, with
/// `Submit` they go through [`Submitter::submit`] exactly once.
#[async_trait]
pub trait SpokeAdapter: Submitter {
	type GasEstimate: Into<GasEstimate> + Send;

	fn family(&self) -> ChainFamily;

	fn config(&self) -> &SpokeChainConfig;

	/// Estimates the cost of a transaction prepared for this family.
	async fn estimate_gas(
		&self,
		tx: &Self::Transaction,
		cancel: &CancellationToken,
	) -> Result<Self::GasEstimate, SpokeError>;

	/// Escrows `params.amount` of `params.token` into the asset manager.
	async fn deposit<M: TxMode>(
		&self,
		params: &DepositParams,
		hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<Self::Transaction>, SpokeError>;

	/// Currently escrowed balance of `token`. Never signs.
	async fn get_deposit(&self, token: &str, cancel: &CancellationToken) -> Result<U256, SpokeError>;

	/// Transports `payload` to the hub wallet of `from`, byte for byte.
	async fn call_wallet<M: TxMode>(
		&self,
		from: HubAddress,
		payload: &CallPayload,
		hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<Self::Transaction>, SpokeError>;
}

/// Signs and submits `tx`, then waits for the configured confirmations.
///
/// Not retried: a submission that fails after reaching the wallet may still
/// land on chain. Once the wallet returns a hash, a confirmation timeout,
/// transport error or cancellation yields `ConfirmationUnknown` with that hash.
pub(crate) async fn submit_and_confirm<T, W, C>(
	config: &SpokeChainConfig,
	wallet: &W,
	client: &C,
	tx: &T,
	cancel: &CancellationToken,
) -> Result<TransactionHash, SpokeError>
where
	T: Send + Sync,
	W: WalletProvider<Transaction = T> + ?Sized,
	C: ChainClient<Transaction = T> + ?Sized,
{
	let hash = cancellable(cancel, wallet.send_transaction(tx)).await?;

	// Past this point the transaction is broadcast; failures must keep the hash.
	let receipt =
		match cancellable(cancel, client.wait_for_confirmation(&hash, config.confirmations)).await {
			Ok(receipt) => receipt,
			Err(err) => {
				tracing::warn!(
					tx_hash = %hash.truncated(),
					chain = %config.name,
					"Confirmation not observed: {}",
					err
				);
				return Err(SpokeError::ConfirmationUnknown {
					hash,
					reason: err.to_string(),
				});
			}
		};
	if !receipt.success {
		return Err(SpokeError::ChainRejected(format!(
			"transaction {} failed on {}",
			hash, config.name
		)));
	}

	tracing::info!(
		tx_hash = %hash.truncated(),
		chain = %config.name,
		block = receipt.block_number,
		"Transaction confirmed"
	);

	Ok(hash)
}

/// The bound wallet's chain-native account address.
pub(crate) async fn wallet_address<W>(wallet: &W, cancel: &CancellationToken) -> Result<String, SpokeError>
where
	W: WalletProvider + ?Sized,
{
	cancellable(cancel, wallet.address()).await
}

/// The hub origin of a wallet call must name an account.
pub(crate) fn ensure_hub_origin(from: &HubAddress) -> Result<(), SpokeError> {
	if from.is_zero() {
		Err(SpokeError::invalid("hub origin address must be non-zero"))
	} else {
		Ok(())
	}
}

/// Rejects a config handed to the adapter of another family.
pub(crate) fn ensure_family(config: &SpokeChainConfig, family: ChainFamily) -> Result<(), SpokeError> {
	if config.family == family {
		Ok(())
	} else {
		Err(SpokeError::unsupported(config.family.as_str()))
	}
}

pub(crate) fn amount_to_u64(amount: U256, family: ChainFamily) -> Result<u64, SpokeError> {
	u64::try_from(amount)
		.map_err(|_| SpokeError::invalid(format!("amount {} does not fit a {} u64", amount, family)))
}

pub(crate) fn amount_to_u128(amount: U256, family: ChainFamily) -> Result<u128, SpokeError> {
	u128::try_from(amount)
		.map_err(|_| SpokeError::invalid(format!("amount {} does not fit a {} u128", amount, family)))
}

/// Configuration schema of the given family's spoke table.
pub fn schema_for(family: ChainFamily) -> Box<dyn ConfigSchema> {
	match family {
		ChainFamily::Evm => Box::new(implementations::evm::EvmSchema),
		ChainFamily::Sonic => Box::new(implementations::sonic::SonicSchema),
		ChainFamily::Solana => Box::new(implementations::solana::SolanaSchema),
		ChainFamily::Sui => Box::new(implementations::sui::SuiSchema),
		ChainFamily::Stellar => Box::new(implementations::stellar::StellarSchema),
		ChainFamily::Icon => Box::new(implementations::icon::IconSchema),
		ChainFamily::Injective => Box::new(implementations::injective::InjectiveSchema),
	}
}
