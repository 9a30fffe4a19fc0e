//! Alloy-based EVM chain client.
//!
//! Serves the read side of the EVM and Sonic families: gas estimation, native
//! and ERC20 balances, read-only calls and confirmation polling.

use crate::{bindings::IERC20, classify_rpc_error, ChainClient, ClientError, EvmClient};
use alloy::{
	network::TransactionBuilder,
	primitives::{Address, Bytes, FixedBytes, U256},
	providers::{DynProvider, Provider, ProviderBuilder},
	rpc::types::TransactionRequest,
	sol_types::SolCall,
	transports::http::reqwest::Url,
};
use async_trait::async_trait;
use spoke_types::{EvmTransaction, TransactionHash, TransactionReceipt};
use std::time::Duration;

/// Seconds allowed per requested confirmation before giving up.
const SECONDS_PER_CONFIRMATION: u64 = 20;
const MAX_CONFIRMATION_WAIT: u64 = 3600;

pub struct AlloyClient {
	provider: DynProvider,
	poll_interval: Duration,
}

impl AlloyClient {
	/// Creates a read-only client against an HTTP RPC endpoint.
	pub fn new(rpc_url: &str) -> Result<Self, ClientError> {
		let url: Url = rpc_url
			.parse()
			.map_err(|e| ClientError::InvalidRequest(format!("Invalid RPC URL: {}", e)))?;

		let provider = ProviderBuilder::new().connect_http(url).erased();

		Ok(Self {
			provider,
			poll_interval: Duration::from_secs(2),
		})
	}

	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = poll_interval;
		self
	}
}

fn parse_address(value: &str, what: &str) -> Result<Address, ClientError> {
	value
		.parse()
		.map_err(|e| ClientError::InvalidRequest(format!("Invalid {} address {}: {}", what, value, e)))
}

fn confirmation_timeout(confirmations: u64) -> Duration {
	let seconds = confirmations
		.saturating_mul(SECONDS_PER_CONFIRMATION)
		.max(SECONDS_PER_CONFIRMATION)
		.min(MAX_CONFIRMATION_WAIT);
	Duration::from_secs(seconds)
}

#[async_trait]
impl ChainClient for AlloyClient {
	type Transaction = EvmTransaction;
	type GasEstimate = u64;

	async fn estimate_fee(&self, tx: &EvmTransaction) -> Result<u64, ClientError> {
		let request: TransactionRequest = tx.into();
		self.provider
			.estimate_gas(request)
			.await
			.map_err(|e| classify_rpc_error(format!("Gas estimation failed: {}", e)))
	}

	async fn balance_of(&self, holder: &str, token: &str) -> Result<U256, ClientError> {
		let holder = parse_address(holder, "holder")?;
		let token = parse_address(token, "token")?;

		if token == Address::ZERO {
			return self
				.provider
				.get_balance(holder)
				.await
				.map_err(|e| classify_rpc_error(format!("Failed to get balance: {}", e)));
		}

		let request = TransactionRequest::default()
			.with_to(token)
			.with_input(IERC20::balanceOfCall { account: holder }.abi_encode());
		let output = self
			.provider
			.call(request)
			.await
			.map_err(|e| classify_rpc_error(format!("balanceOf call failed: {}", e)))?;

		IERC20::balanceOfCall::abi_decode_returns(&output)
			.map_err(|e| ClientError::InvalidResponse(format!("Malformed balanceOf result: {}", e)))
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, ClientError> {
		if hash.0.len() != 32 {
			return Err(ClientError::InvalidRequest(format!(
				"EVM transaction hash must be 32 bytes, got {}",
				hash.0.len()
			)));
		}
		let tx_hash = FixedBytes::<32>::from_slice(&hash.0);

		let max_wait = confirmation_timeout(confirmations);
		let start = tokio::time::Instant::now();

		tracing::info!(
			tx_hash = %hash.truncated(),
			"Waiting for {} confirmations (timeout: {}s)",
			confirmations,
			max_wait.as_secs()
		);

		loop {
			if start.elapsed() > max_wait {
				return Err(ClientError::Transport(format!(
					"Timeout waiting for {} confirmations after {} seconds",
					confirmations,
					max_wait.as_secs()
				)));
			}

			let receipt = match self.provider.get_transaction_receipt(tx_hash).await {
				Ok(Some(receipt)) => receipt,
				Ok(None) => {
					tokio::time::sleep(self.poll_interval).await;
					continue;
				}
				Err(e) => {
					return Err(ClientError::Transport(format!("Failed to get receipt: {}", e)));
				}
			};

			let tx_block = receipt.block_number.unwrap_or(0);

			if !receipt.status() {
				return Err(ClientError::Reverted(format!(
					"Transaction {} reverted in block {}",
					hash, tx_block
				)));
			}

			let current_block = self
				.provider
				.get_block_number()
				.await
				.map_err(|e| ClientError::Transport(format!("Failed to get block number: {}", e)))?;

			// The inclusion block counts as the first confirmation.
			let current_confirmations = current_block.saturating_sub(tx_block) + 1;
			if current_confirmations >= confirmations {
				return Ok(TransactionReceipt {
					hash: TransactionHash::from(receipt.transaction_hash),
					block_number: tx_block,
					success: true,
				});
			}

			tracing::debug!(
				"Waiting for {} more confirmations...",
				confirmations.saturating_sub(current_confirmations)
			);

			tokio::time::sleep(self.poll_interval).await;
		}
	}
}

#[async_trait]
impl EvmClient for AlloyClient {
	async fn call(&self, tx: &EvmTransaction) -> Result<Bytes, ClientError> {
		let request: TransactionRequest = tx.into();
		self.provider
			.call(request)
			.await
			.map_err(|e| classify_rpc_error(format!("Call failed: {}", e)))
	}
}
