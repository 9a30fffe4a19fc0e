//! Hub chain access.
//!
//! Every spoke account owns one abstracted wallet on the hub, deployed
//! deterministically by the wallet factory from the spoke chain id and the
//! account's address bytes.

use crate::{
	bindings::IWalletFactory,
	utils::{retry_read, RetryPolicy},
	ClientError, EvmClient,
};
use alloy::{
	primitives::{Address, Bytes, U256},
	sol_types::SolCall,
};
use spoke_types::{EvmTransaction, HubChainConfig, SpokeError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct HubProvider {
	config: HubChainConfig,
	client: Arc<dyn EvmClient>,
}

impl HubProvider {
	pub fn new(config: HubChainConfig, client: Arc<dyn EvmClient>) -> Self {
		Self { config, client }
	}

	pub fn config(&self) -> &HubChainConfig {
		&self.config
	}

	pub fn chain_id(&self) -> u64 {
		self.config.chain_id
	}

	pub fn client(&self) -> &Arc<dyn EvmClient> {
		&self.client
	}

	/// Hub wallet owned by `spoke_address` on chain `spoke_chain_id`.
	pub async fn abstracted_wallet(
		&self,
		spoke_chain_id: u64,
		spoke_address: &[u8],
		retry: &RetryPolicy,
		cancel: &CancellationToken,
	) -> Result<Address, SpokeError> {
		if spoke_address.is_empty() {
			return Err(SpokeError::invalid("spoke address must not be empty"));
		}

		let factory: Address = self.config.wallet_factory.parse().map_err(|e| {
			SpokeError::Config(format!(
				"Invalid wallet factory address {}: {}",
				self.config.wallet_factory, e
			))
		})?;

		let tx = wallet_lookup(factory, self.config.chain_id, spoke_chain_id, spoke_address);
		let output = retry_read("wallet derivation", retry, cancel, || self.client.call(&tx)).await?;
		let wallet = decode_wallet(&output)?;

		tracing::debug!(
			spoke_chain_id,
			wallet = %wallet,
			"Resolved abstracted wallet"
		);

		Ok(wallet)
	}
}

/// Read-only factory call resolving the hub wallet of a spoke account.
pub fn wallet_lookup(
	factory: Address,
	hub_chain_id: u64,
	spoke_chain_id: u64,
	spoke_address: &[u8],
) -> EvmTransaction {
	let call = IWalletFactory::getDeployedAddressCall {
		chainId: U256::from(spoke_chain_id),
		user: Bytes::copy_from_slice(spoke_address),
	};
	EvmTransaction {
		from: Address::ZERO,
		to: factory,
		value: U256::ZERO,
		data: call.abi_encode().into(),
		chain_id: hub_chain_id,
	}
}

pub fn decode_wallet(output: &[u8]) -> Result<Address, ClientError> {
	IWalletFactory::getDeployedAddressCall::abi_decode_returns(output)
		.map_err(|e| ClientError::InvalidResponse(format!("Malformed wallet address: {}", e)))
}
