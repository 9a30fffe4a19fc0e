//! Sonic adapter: the hub chain acting as its own spoke.
//!
//! There is no relay hop. Deposits move the asset straight into the caller's
//! abstracted wallet and wallet calls invoke `execute` on it directly.

use super::evm::{configured_address, ensure_chain_id, evm_schema, parse_evm_address};
use crate::{ensure_family, ensure_hub_origin, submit_and_confirm, wallet_address, SpokeAdapter};
use alloy::{
	primitives::{Address, U256},
	sol_types::SolCall,
};
use async_trait::async_trait;
use spoke_account::WalletProvider;
use spoke_chains::{
	bindings::{IHubWallet, IERC20},
	decode_wallet, retry_read, wallet_lookup, EvmClient, HubProvider, RetryPolicy,
};
use spoke_types::{
	validators, CallPayload, ChainFamily, ConfigSchema, DepositParams, EvmTransaction, Field,
	FieldType, HubAddress, SpokeChainConfig, SpokeError, Submitter, TransactionHash, TxMode,
	ValidationError,
};
use tokio_util::sync::CancellationToken;

pub struct SonicAdapter<'a> {
	config: &'a SpokeChainConfig,
	wallet: &'a dyn WalletProvider<Transaction = EvmTransaction>,
	client: &'a dyn EvmClient,
	retry: &'a RetryPolicy,
}

impl<'a> SonicAdapter<'a> {
	pub fn new(
		config: &'a SpokeChainConfig,
		wallet: &'a dyn WalletProvider<Transaction = EvmTransaction>,
		client: &'a dyn EvmClient,
		retry: &'a RetryPolicy,
	) -> Result<Self, SpokeError> {
		ensure_family(config, ChainFamily::Sonic)?;
		Ok(Self {
			config,
			wallet,
			client,
			retry,
		})
	}

	async fn sender(&self, cancel: &CancellationToken) -> Result<Address, SpokeError> {
		let address = wallet_address(self.wallet, cancel).await?;
		parse_evm_address(&address, "wallet")
	}

	/// Abstracted wallet of `owner`, resolved through the wallet factory.
	async fn abstracted_wallet(
		&self,
		owner: Address,
		cancel: &CancellationToken,
	) -> Result<Address, SpokeError> {
		let factory = self
			.config
			.wallet_abstraction
			.as_deref()
			.ok_or_else(|| SpokeError::Config(format!("{} has no wallet_abstraction", self.config.name)))?;
		let factory = configured_address(factory, "wallet_abstraction")?;

		let lookup = wallet_lookup(factory, self.config.chain_id, self.config.chain_id, owner.as_slice());
		let output =
			retry_read("wallet derivation", self.retry, cancel, || self.client.call(&lookup)).await?;
		Ok(decode_wallet(&output)?)
	}

	fn ensure_hub(&self, hub: &HubProvider) -> Result<(), SpokeError> {
		if hub.chain_id() != self.config.chain_id {
			return Err(SpokeError::invalid(format!(
				"sonic provider on chain {} does not match hub chain {}",
				self.config.chain_id,
				hub.chain_id()
			)));
		}
		Ok(())
	}
}

#[async_trait]
impl<'a> Submitter for SonicAdapter<'a> {
	type Transaction = EvmTransaction;

	async fn submit(
		&self,
		tx: EvmTransaction,
		cancel: &CancellationToken,
	) -> Result<TransactionHash, SpokeError> {
		ensure_chain_id(&tx, self.config)?;
		submit_and_confirm(self.config, self.wallet, self.client, &tx, cancel).await
	}
}

#[async_trait]
impl<'a> SpokeAdapter for SonicAdapter<'a> {
	type GasEstimate = u64;

	fn family(&self) -> ChainFamily {
		ChainFamily::Sonic
	}

	fn config(&self) -> &SpokeChainConfig {
		self.config
	}

	async fn estimate_gas(
		&self,
		tx: &EvmTransaction,
		cancel: &CancellationToken,
	) -> Result<u64, SpokeError> {
		ensure_chain_id(tx, self.config)?;
		retry_read("estimate gas", self.retry, cancel, || self.client.estimate_fee(tx)).await
	}

	async fn deposit<M: TxMode>(
		&self,
		params: &DepositParams,
		hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<EvmTransaction>, SpokeError> {
		params.ensure_well_formed()?;
		self.ensure_hub(hub)?;
		let token = parse_evm_address(&params.token, "token")?;
		let from = self.sender(cancel).await?;
		let wallet = self.abstracted_wallet(from, cancel).await?;

		// The wallet is the only destination; an explicit recipient must name it.
		if !params.to.is_empty() && params.to.as_ref() != wallet.as_slice() {
			return Err(SpokeError::invalid(format!(
				"sonic deposits can only credit the caller's wallet {}",
				wallet
			)));
		}

		let tx = if token == Address::ZERO {
			EvmTransaction {
				from,
				to: wallet,
				value: params.amount,
				data: Default::default(),
				chain_id: self.config.chain_id,
			}
		} else {
			let call = IERC20::transferCall {
				to: wallet,
				amount: params.amount,
			};
			EvmTransaction {
				from,
				to: token,
				value: U256::ZERO,
				data: call.abi_encode().into(),
				chain_id: self.config.chain_id,
			}
		};

		M::complete(self, tx, cancel).await
	}

	async fn get_deposit(&self, token: &str, cancel: &CancellationToken) -> Result<U256, SpokeError> {
		parse_evm_address(token, "token")?;
		let owner = self.sender(cancel).await?;
		let wallet = self.abstracted_wallet(owner, cancel).await?.to_string();

		retry_read("get deposit", self.retry, cancel, || {
			self.client.balance_of(&wallet, token)
		})
		.await
	}

	async fn call_wallet<M: TxMode>(
		&self,
		from: HubAddress,
		payload: &CallPayload,
		hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<EvmTransaction>, SpokeError> {
		ensure_hub_origin(&from)?;
		self.ensure_hub(hub)?;
		let sender = self.sender(cancel).await?;
		let wallet = self.abstracted_wallet(sender, cancel).await?;
		if from != wallet {
			return Err(SpokeError::invalid(format!(
				"{} is not the abstracted wallet of {}",
				from, sender
			)));
		}

		let call = IHubWallet::executeCall {
			payload: payload.as_bytes().clone(),
		};
		let tx = EvmTransaction {
			from: sender,
			to: wallet,
			value: U256::ZERO,
			data: call.abi_encode().into(),
			chain_id: self.config.chain_id,
		};

		M::complete(self, tx, cancel).await
	}
}

/// Configuration schema for the hub chain's own spoke table.
pub struct SonicSchema;

impl ConfigSchema for SonicSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let mut schema = evm_schema();
		schema.required.push(
			Field::new("wallet_abstraction", FieldType::String).with_validator(validators::evm_address),
		);
		schema.validate(config)
	}
}
