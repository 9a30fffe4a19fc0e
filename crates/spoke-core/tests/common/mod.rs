//! In-memory chains for dispatcher tests.
//!
//! Every family gets a wallet and a client sharing one `ChainState`. The
//! wallet credits the escrow ledger when it submits a deposit, so a
//! subsequent `get_deposit` observes it, and counts every submission.

#![allow(dead_code)]

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use spoke_account::{AccountError, WalletProvider};
use spoke_adapters::implementations::icon::NATIVE_ICX;
use spoke_chains::bindings::{IAssetManager, IERC20};
use spoke_chains::{ChainClient, ClientError, EvmClient, HubProvider};
use spoke_core::SpokeProvider;
use spoke_types::{
	ChainFamily, CosmosGas, EvmTransaction, HubChainConfig, IconStepCost, IconTransaction,
	InjectiveTransaction, PreparedTransaction, SolanaFee, SolanaTransaction, SpokeChainConfig,
	StellarArg, StellarFee, StellarTransaction, SuiArgument, SuiGasCost, SuiTransaction,
	TransactionHash, TransactionReceipt,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const HUB_CHAIN_ID: u64 = 146;
pub const EVM_SENDER: &str = "0x1111111111111111111111111111111111111111";
pub const EVM_TOKEN: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
pub const HUB_WALLET: Address = Address::new([0x77; 20]);

/// Escrow credit carried by a deposit: (holder, token, amount).
type Credit = (String, String, U256);

fn key(holder: &str, token: &str) -> (String, String) {
	(holder.to_ascii_lowercase(), token.to_ascii_lowercase())
}

#[derive(Default)]
pub struct ChainState {
	ledger: Mutex<HashMap<(String, String), U256>>,
	submits: AtomicUsize,
	reads: AtomicUsize,
	sent: Mutex<Vec<PreparedTransaction>>,
}

impl ChainState {
	pub fn submits(&self) -> usize {
		self.submits.load(Ordering::SeqCst)
	}

	pub fn reads(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	pub fn sent(&self) -> Vec<PreparedTransaction> {
		self.sent.lock().unwrap().clone()
	}

	pub fn credit(&self, holder: &str, token: &str, amount: U256) {
		*self
			.ledger
			.lock()
			.unwrap()
			.entry(key(holder, token))
			.or_default() += amount;
	}
}

pub struct TestWallet<T> {
	address: String,
	lift: fn(T) -> PreparedTransaction,
	credit: fn(&T) -> Option<Credit>,
	state: Arc<ChainState>,
}

#[async_trait]
impl<T: Clone + Send + Sync> WalletProvider for TestWallet<T> {
	type Transaction = T;

	async fn address(&self) -> Result<String, AccountError> {
		Ok(self.address.clone())
	}

	async fn send_transaction(&self, tx: &T) -> Result<TransactionHash, AccountError> {
		let n = self.state.submits.fetch_add(1, Ordering::SeqCst) + 1;
		self.state.sent.lock().unwrap().push((self.lift)(tx.clone()));
		if let Some((holder, token, amount)) = (self.credit)(tx) {
			self.state.credit(&holder, &token, amount);
		}
		Ok(TransactionHash(vec![n as u8; 32]))
	}
}

pub struct TestClient<T, G> {
	estimate: G,
	call_output: Bytes,
	state: Arc<ChainState>,
	_tx: std::marker::PhantomData<fn(T)>,
}

impl<T, G> TestClient<T, G> {
	fn new(estimate: G, state: Arc<ChainState>) -> Self {
		Self {
			estimate,
			call_output: HUB_WALLET.into_word().to_vec().into(),
			state,
			_tx: std::marker::PhantomData,
		}
	}
}

#[async_trait]
impl<T, G> ChainClient for TestClient<T, G>
where
	T: Send + Sync,
	G: Clone + Send + Sync,
{
	type Transaction = T;
	type GasEstimate = G;

	async fn estimate_fee(&self, _tx: &T) -> Result<G, ClientError> {
		self.state.reads.fetch_add(1, Ordering::SeqCst);
		Ok(self.estimate.clone())
	}

	async fn balance_of(&self, holder: &str, token: &str) -> Result<U256, ClientError> {
		self.state.reads.fetch_add(1, Ordering::SeqCst);
		Ok(self
			.state
			.ledger
			.lock()
			.unwrap()
			.get(&key(holder, token))
			.copied()
			.unwrap_or_default())
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		_confirmations: u64,
	) -> Result<TransactionReceipt, ClientError> {
		Ok(TransactionReceipt {
			hash: hash.clone(),
			block_number: 1,
			success: true,
		})
	}
}

#[async_trait]
impl EvmClient for TestClient<EvmTransaction, u64> {
	async fn call(&self, _tx: &EvmTransaction) -> Result<Bytes, ClientError> {
		self.state.reads.fetch_add(1, Ordering::SeqCst);
		Ok(self.call_output.clone())
	}
}

fn evm_credit(tx: &EvmTransaction) -> Option<Credit> {
	let call = IAssetManager::transferCall::abi_decode(&tx.data).ok()?;
	Some((tx.to.to_string(), call.token.to_string(), call.amount))
}

fn sonic_credit(tx: &EvmTransaction) -> Option<Credit> {
	if tx.data.is_empty() {
		return Some((tx.to.to_string(), Address::ZERO.to_string(), tx.value));
	}
	let call = IERC20::transferCall::abi_decode(&tx.data).ok()?;
	Some((call.to.to_string(), tx.to.to_string(), call.amount))
}

fn solana_credit(tx: &SolanaTransaction) -> Option<Credit> {
	let ix = tx.instructions.first()?;
	let amount: [u8; 8] = ix.data.get(8..16)?.try_into().ok()?;
	Some((
		ix.program_id.clone(),
		ix.accounts.get(1)?.pubkey.clone(),
		U256::from(u64::from_le_bytes(amount)),
	))
}

fn sui_credit(tx: &SuiTransaction) -> Option<Credit> {
	let call = tx.calls.first()?;
	match call.arguments.first()? {
		SuiArgument::SplitCoin { coin_type, amount } => {
			Some((call.package.clone(), coin_type.clone(), U256::from(*amount)))
		}
		_ => None,
	}
}

fn stellar_credit(tx: &StellarTransaction) -> Option<Credit> {
	if tx.function != "transfer" {
		return None;
	}
	match (tx.args.get(1)?, tx.args.get(2)?) {
		(StellarArg::Address(token), StellarArg::I128(amount)) => {
			Some((tx.contract_id.clone(), token.clone(), amount.parse().ok()?))
		}
		_ => None,
	}
}

fn icon_credit(tx: &IconTransaction) -> Option<Credit> {
	match tx.data.method.as_str() {
		"transferNativeToken" => Some((tx.to.clone(), NATIVE_ICX.to_string(), tx.value)),
		"transfer" => {
			let value = tx.data.params.get("_value")?.trim_start_matches("0x");
			Some((
				tx.data.params.get("_to")?.clone(),
				tx.to.clone(),
				U256::from_str_radix(value, 16).ok()?,
			))
		}
		_ => None,
	}
}

fn injective_credit(tx: &InjectiveTransaction) -> Option<Credit> {
	let transfer = tx.msg.get("transfer")?;
	Some((
		tx.contract.clone(),
		transfer.get("token")?.as_str()?.to_string(),
		transfer.get("amount")?.as_str()?.parse().ok()?,
	))
}

/// A provider of one family over in-memory state.
pub struct Fixture {
	pub provider: SpokeProvider,
	pub config: SpokeChainConfig,
	pub state: Arc<ChainState>,
	/// A token the family accepts for deposits.
	pub token: String,
}

fn bind<T: Clone + Send + Sync + 'static>(
	address: &str,
	lift: fn(T) -> PreparedTransaction,
	credit: fn(&T) -> Option<Credit>,
	state: &Arc<ChainState>,
) -> Arc<dyn WalletProvider<Transaction = T>> {
	Arc::new(TestWallet {
		address: address.to_string(),
		lift,
		credit,
		state: state.clone(),
	})
}

pub fn config(family: ChainFamily) -> SpokeChainConfig {
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
			"ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL".to_string(),
			"TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA".to_string(),
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
		name: format!("{}-test", family),
		chain_id,
		family,
		rpc_url: "http://localhost:8545".to_string(),
		asset_manager,
		connection,
		wallet_abstraction,
		network_id,
		confirmations: 1,
	}
}

pub fn fixture(family: ChainFamily) -> Fixture {
	let config = config(family);
	let state = Arc::new(ChainState::default());

	let (provider, token) = match family {
		ChainFamily::Evm | ChainFamily::Sonic => {
			let client: Arc<dyn EvmClient> =
				Arc::new(TestClient::<EvmTransaction, u64>::new(21_000, state.clone()));
			let provider = if family == ChainFamily::Evm {
				let wallet = bind(EVM_SENDER, PreparedTransaction::Evm, evm_credit, &state);
				SpokeProvider::evm(config.clone(), wallet, client)
			} else {
				let wallet = bind(EVM_SENDER, PreparedTransaction::Sonic, sonic_credit, &state);
				SpokeProvider::sonic(config.clone(), wallet, client)
			};
			(provider, EVM_TOKEN.to_string())
		}
		ChainFamily::Solana => {
			let wallet = bind(
				"Vote111111111111111111111111111111111111111",
				PreparedTransaction::Solana,
				solana_credit,
				&state,
			);
			let fee = SolanaFee {
				compute_units: 40_000,
				fee_lamports: 5_000,
			};
			let client = Arc::new(TestClient::<SolanaTransaction, SolanaFee>::new(fee, state.clone()));
			(
				SpokeProvider::solana(config.clone(), wallet, client),
				"EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
			)
		}
		ChainFamily::Sui => {
			let wallet = bind(
				&format!("0x{}", "5e".repeat(32)),
				PreparedTransaction::Sui,
				sui_credit,
				&state,
			);
			let cost = SuiGasCost {
				computation_cost: 1_000,
				storage_cost: 2_000,
				storage_rebate: 500,
			};
			let client = Arc::new(TestClient::<SuiTransaction, SuiGasCost>::new(cost, state.clone()));
			(
				SpokeProvider::sui(config.clone(), wallet, client),
				"0x2::sui::SUI".to_string(),
			)
		}
		ChainFamily::Stellar => {
			let wallet = bind(
				&format!("G{}", "S".repeat(55)),
				PreparedTransaction::Stellar,
				stellar_credit,
				&state,
			);
			let fee = StellarFee {
				resource_fee: 90_000,
				inclusion_fee: 100,
			};
			let client =
				Arc::new(TestClient::<StellarTransaction, StellarFee>::new(fee, state.clone()));
			(
				SpokeProvider::stellar(config.clone(), wallet, client),
				format!("C{}", "U".repeat(55)),
			)
		}
		ChainFamily::Icon => {
			let wallet = bind(
				&format!("hx{}", "5e".repeat(20)),
				PreparedTransaction::Icon,
				icon_credit,
				&state,
			);
			let cost = IconStepCost {
				step_limit: 2_000_000,
			};
			let client = Arc::new(TestClient::<IconTransaction, IconStepCost>::new(cost, state.clone()));
			(
				SpokeProvider::icon(config.clone(), wallet, client),
				NATIVE_ICX.to_string(),
			)
		}
		ChainFamily::Injective => {
			let wallet = bind(
				&format!("inj1{}", "x".repeat(38)),
				PreparedTransaction::Injective,
				injective_credit,
				&state,
			);
			let gas = CosmosGas {
				gas_used: 150_000,
				gas_wanted: 200_000,
			};
			let client =
				Arc::new(TestClient::<InjectiveTransaction, CosmosGas>::new(gas, state.clone()));
			(
				SpokeProvider::injective(config.clone(), wallet, client),
				"inj".to_string(),
			)
		}
	};

	Fixture {
		provider: provider.expect("fixture provider"),
		config,
		state,
		token,
	}
}

/// Hub whose wallet factory resolves every account to `HUB_WALLET`.
pub fn hub() -> HubProvider {
	let client = TestClient::<EvmTransaction, u64>::new(0, Arc::new(ChainState::default()));
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
