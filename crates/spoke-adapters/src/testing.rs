//! In-memory collaborators for adapter unit tests.

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use spoke_account::{AccountError, WalletProvider};
use spoke_chains::{ChainClient, ClientError, EvmClient, HubProvider};
use spoke_types::{
	ChainFamily, EvmTransaction, HubChainConfig, SpokeChainConfig, TransactionHash,
	TransactionReceipt,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

pub const HUB_CHAIN_ID: u64 = 146;

pub struct MockWallet<T> {
	address: String,
	submitted: AtomicUsize,
	sent: Mutex<Vec<T>>,
	reject: bool,
}

impl<T> MockWallet<T> {
	pub fn new(address: &str) -> Self {
		Self {
			address: address.to_string(),
			submitted: AtomicUsize::new(0),
			sent: Mutex::new(Vec::new()),
			reject: false,
		}
	}

	pub fn rejecting(mut self) -> Self {
		self.reject = true;
		self
	}

	pub fn submitted(&self) -> usize {
		self.submitted.load(Ordering::SeqCst)
	}

	pub fn sent(&self) -> Vec<T>
	where
		T: Clone,
	{
		self.sent.lock().unwrap().clone()
	}
}

#[async_trait]
impl<T: Clone + Send + Sync> WalletProvider for MockWallet<T> {
	type Transaction = T;

	async fn address(&self) -> Result<String, AccountError> {
		Ok(self.address.clone())
	}

	async fn send_transaction(&self, tx: &T) -> Result<TransactionHash, AccountError> {
		if self.reject {
			return Err(AccountError::Rejected("user declined".into()));
		}
		let n = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
		self.sent.lock().unwrap().push(tx.clone());
		Ok(TransactionHash(vec![n as u8; 32]))
	}
}

pub struct MockClient<T, G> {
	estimate: G,
	balances: Mutex<HashMap<(String, String), U256>>,
	call_output: Mutex<Bytes>,
	fail_receipts: AtomicBool,
	wait_timeout: AtomicBool,
	cancel_on_wait: Option<CancellationToken>,
	reads: AtomicUsize,
	_tx: std::marker::PhantomData<fn(T)>,
}

impl<T, G> MockClient<T, G> {
	pub fn new(estimate: G) -> Self {
		Self {
			estimate,
			balances: Mutex::new(HashMap::new()),
			call_output: Mutex::new(Bytes::new()),
			fail_receipts: AtomicBool::new(false),
			wait_timeout: AtomicBool::new(false),
			cancel_on_wait: None,
			reads: AtomicUsize::new(0),
			_tx: std::marker::PhantomData,
		}
	}

	pub fn failing_receipts(self) -> Self {
		self.fail_receipts.store(true, Ordering::SeqCst);
		self
	}

	/// Receipt polling gives up with a transport error.
	pub fn timing_out(self) -> Self {
		self.wait_timeout.store(true, Ordering::SeqCst);
		self
	}

	/// Cancels `cancel` while the receipt is being awaited, then never resolves.
	pub fn cancelling_on_wait(mut self, cancel: CancellationToken) -> Self {
		self.cancel_on_wait = Some(cancel);
		self
	}

	pub fn with_balance(self, holder: &str, token: &str, amount: U256) -> Self {
		self.balances
			.lock()
			.unwrap()
			.insert((holder.to_string(), token.to_string()), amount);
		self
	}

	/// Output returned by every EVM `call`, e.g. an ABI-encoded wallet.
	pub fn with_call_output(self, output: impl Into<Bytes>) -> Self {
		*self.call_output.lock().unwrap() = output.into();
		self
	}

	pub fn reads(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl<T, G> ChainClient for MockClient<T, G>
where
	T: Send + Sync,
	G: Clone + Send + Sync,
{
	type Transaction = T;
	type GasEstimate = G;

	async fn estimate_fee(&self, _tx: &T) -> Result<G, ClientError> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		Ok(self.estimate.clone())
	}

	async fn balance_of(&self, holder: &str, token: &str) -> Result<U256, ClientError> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		Ok(self
			.balances
			.lock()
			.unwrap()
			.get(&(holder.to_string(), token.to_string()))
			.copied()
			.unwrap_or_default())
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, ClientError> {
		if let Some(cancel) = &self.cancel_on_wait {
			cancel.cancel();
			std::future::pending::<()>().await;
		}
		if self.wait_timeout.load(Ordering::SeqCst) {
			return Err(ClientError::Transport(format!(
				"Timeout waiting for {} confirmations after 20 seconds",
				confirmations
			)));
		}
		Ok(TransactionReceipt {
			hash: hash.clone(),
			block_number: 100,
			success: !self.fail_receipts.load(Ordering::SeqCst),
		})
	}
}

#[async_trait]
impl EvmClient for MockClient<EvmTransaction, u64> {
	async fn call(&self, _tx: &EvmTransaction) -> Result<Bytes, ClientError> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		Ok(self.call_output.lock().unwrap().clone())
	}
}

/// ABI encoding of a single returned address.
pub fn encoded_address(address: Address) -> Bytes {
	address.into_word().to_vec().into()
}

pub fn hub() -> HubProvider {
	hub_with_wallet(Address::repeat_byte(0x77))
}

pub fn hub_with_wallet(wallet: Address) -> HubProvider {
	let client = MockClient::<EvmTransaction, u64>::new(0).with_call_output(encoded_address(wallet));
	HubProvider::new(
		HubChainConfig {
			chain_id: HUB_CHAIN_ID,
			rpc_url: "http://localhost:8545".to_string(),
			wallet_factory: "0x00000000000000000000000000000000000000fa".to_string(),
			asset_manager: "0x00000000000000000000000000000000000000a1".to_string(),
		},
		Arc::new(client),
	)
}

pub fn evm_tx() -> EvmTransaction {
	EvmTransaction {
		from: Address::repeat_byte(0x01),
		to: Address::repeat_byte(0x02),
		value: U256::ZERO,
		data: Bytes::new(),
		chain_id: 42161,
	}
}

pub const SOLANA_ASSET_MANAGER: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
pub const SOLANA_CONNECTION: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const SOLANA_USER: &str = "Vote111111111111111111111111111111111111111";
pub const SOLANA_USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

pub fn spoke_config(family: ChainFamily) -> SpokeChainConfig {
	let (chain_id, asset_manager, connection, network_id, wallet_abstraction) = match family {
		ChainFamily::Evm => (
			42161,
			"0x00000000000000000000000000000000000000a1".to_string(),
			"0x00000000000000000000000000000000000000c1".to_string(),
			None,
			None,
		),
		ChainFamily::Sonic => (
			HUB_CHAIN_ID,
			"0x00000000000000000000000000000000000000a1".to_string(),
			"0x00000000000000000000000000000000000000c1".to_string(),
			None,
			Some("0x00000000000000000000000000000000000000fa".to_string()),
		),
		ChainFamily::Solana => (
			501,
			SOLANA_ASSET_MANAGER.to_string(),
			SOLANA_CONNECTION.to_string(),
			None,
			None,
		),
		ChainFamily::Sui => (
			784,
			format!("0x{}", "a1".repeat(32)),
			format!("0x{}", "c1".repeat(32)),
			None,
			None,
		),
		ChainFamily::Stellar => (
			1500,
			format!("C{}", "A".repeat(55)),
			format!("C{}", "B".repeat(55)),
			Some("Test SDF Network ; September 2015".to_string()),
			None,
		),
		ChainFamily::Icon => (
			1768124275,
			format!("cx{}", "a1".repeat(20)),
			format!("cx{}", "c1".repeat(20)),
			Some("0x1".to_string()),
			None,
		),
		ChainFamily::Injective => (
			1776,
			format!("inj1{}", "q".repeat(38)),
			format!("inj1{}", "z".repeat(38)),
			Some("injective-1".to_string()),
			None,
		),
	};

	SpokeChainConfig {
		name: family.as_str().to_string(),
		chain_id,
		family,
		rpc_url: "http://localhost:8545".to_string(),
		asset_manager,
		connection,
		network_id,
		wallet_abstraction,
		confirmations: 1,
	}
}
