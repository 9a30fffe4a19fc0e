//! Local private-key wallet for EVM-family chains.
//!
//! Signs with Alloy's `PrivateKeySigner` and submits through an HTTP provider
//! whose fillers assign nonce, gas limit and fees.

use crate::{classify_submission_error, AccountError, WalletProvider};
use alloy::{
	network::EthereumWallet,
	providers::{DynProvider, Provider, ProviderBuilder},
	rpc::types::TransactionRequest,
	signers::{local::PrivateKeySigner, Signer},
	transports::http::reqwest::Url,
};
use async_trait::async_trait;
use spoke_types::{EvmTransaction, TransactionHash};

/// Local wallet implementation using Alloy's signer.
///
/// Suitable for development, scripts and the CLI. Production deployments
/// usually bind a remote signer through their own `WalletProvider`.
pub struct LocalWallet {
	signer: PrivateKeySigner,
	provider: DynProvider,
}

impl LocalWallet {
	/// Creates a wallet from a hex-encoded private key (with or without 0x
	/// prefix) bound to one chain's RPC endpoint.
	pub fn new(private_key_hex: &str, rpc_url: &str, chain_id: u64) -> Result<Self, AccountError> {
		let signer = private_key_hex
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?
			.with_chain_id(Some(chain_id));

		let url: Url = rpc_url
			.parse()
			.map_err(|e| AccountError::Provider(format!("Invalid RPC URL: {}", e)))?;

		let provider = ProviderBuilder::new()
			.wallet(EthereumWallet::from(signer.clone()))
			.connect_http(url)
			.erased();

		Ok(Self { signer, provider })
	}

	pub fn signer_address(&self) -> alloy::primitives::Address {
		self.signer.address()
	}
}

#[async_trait]
impl WalletProvider for LocalWallet {
	type Transaction = EvmTransaction;

	async fn address(&self) -> Result<String, AccountError> {
		Ok(self.signer.address().to_checksum(None))
	}

	async fn send_transaction(&self, tx: &EvmTransaction) -> Result<TransactionHash, AccountError> {
		if tx.from != self.signer.address() {
			return Err(AccountError::Rejected(format!(
				"transaction sender {} is not the wallet account {}",
				tx.from,
				self.signer.address()
			)));
		}

		let request: TransactionRequest = tx.into();
		let pending = self
			.provider
			.send_transaction(request)
			.await
			.map_err(|e| classify_submission_error(format!("Failed to send transaction: {}", e)))?;

		let hash = TransactionHash::from(*pending.tx_hash());
		tracing::info!(tx_hash = %hash.truncated(), chain_id = tx.chain_id, "Submitted transaction");

		Ok(hash)
	}
}
