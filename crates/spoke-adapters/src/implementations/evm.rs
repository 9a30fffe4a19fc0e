//! EVM spoke adapter.
//!
//! Deposits call `transfer` on the spoke asset manager, which escrows the
//! asset and emits the message the relay credits on the hub. Wallet calls go
//! through the connection contract's `sendMessage`.

use crate::{ensure_family, ensure_hub_origin, submit_and_confirm, wallet_address, SpokeAdapter};
use alloy::{
	primitives::{Address, Bytes, U256},
	sol_types::SolCall,
};
use async_trait::async_trait;
use spoke_account::WalletProvider;
use spoke_chains::{
	bindings::{IAssetManager, IConnection},
	retry_read, EvmClient, HubProvider, RetryPolicy,
};
use spoke_types::{
	validators, CallPayload, ChainFamily, ConfigSchema, DepositParams, EvmTransaction, Field,
	FieldType, HubAddress, Schema, SpokeChainConfig, SpokeError, Submitter, TransactionHash,
	TxMode, ValidationError,
};
use tokio_util::sync::CancellationToken;

pub struct EvmAdapter<'a> {
	config: &'a SpokeChainConfig,
	wallet: &'a dyn WalletProvider<Transaction = EvmTransaction>,
	client: &'a dyn EvmClient,
	retry: &'a RetryPolicy,
}

impl<'a> EvmAdapter<'a> {
	pub fn new(
		config: &'a SpokeChainConfig,
		wallet: &'a dyn WalletProvider<Transaction = EvmTransaction>,
		client: &'a dyn EvmClient,
		retry: &'a RetryPolicy,
	) -> Result<Self, SpokeError> {
		ensure_family(config, ChainFamily::Evm)?;
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
}

/// Parses a 20-byte hex address, reporting `what` on failure.
pub(crate) fn parse_evm_address(value: &str, what: &str) -> Result<Address, SpokeError> {
	value
		.parse()
		.map_err(|e| SpokeError::invalid(format!("invalid {} address {}: {}", what, value, e)))
}

/// Contract addresses come from configuration, so a bad one is a config error.
pub(crate) fn configured_address(value: &str, field: &str) -> Result<Address, SpokeError> {
	value
		.parse()
		.map_err(|e| SpokeError::Config(format!("invalid {} address {}: {}", field, value, e)))
}

pub(crate) fn ensure_chain_id(tx: &EvmTransaction, config: &SpokeChainConfig) -> Result<(), SpokeError> {
	if tx.chain_id != config.chain_id {
		return Err(SpokeError::invalid(format!(
			"transaction for chain {} submitted to {} (chain {})",
			tx.chain_id, config.name, config.chain_id
		)));
	}
	Ok(())
}

#[async_trait]
impl<'a> Submitter for EvmAdapter<'a> {
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
impl<'a> SpokeAdapter for EvmAdapter<'a> {
	type GasEstimate = u64;

	fn family(&self) -> ChainFamily {
		ChainFamily::Evm
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
		_hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<EvmTransaction>, SpokeError> {
		params.ensure_well_formed()?;
		let token = parse_evm_address(&params.token, "token")?;
		let asset_manager = configured_address(&self.config.asset_manager, "asset_manager")?;
		let from = self.sender(cancel).await?;

		let call = IAssetManager::transferCall {
			token,
			to: params.to.clone(),
			amount: params.amount,
			data: params.data.clone(),
		};
		let value = if token == Address::ZERO {
			params.amount
		} else {
			U256::ZERO
		};

		let tx = EvmTransaction {
			from,
			to: asset_manager,
			value,
			data: call.abi_encode().into(),
			chain_id: self.config.chain_id,
		};

		tracing::debug!(
			chain = %self.config.name,
			token = %token,
			amount = %params.amount,
			"Prepared deposit"
		);
		M::complete(self, tx, cancel).await
	}

	async fn get_deposit(&self, token: &str, cancel: &CancellationToken) -> Result<U256, SpokeError> {
		parse_evm_address(token, "token")?;
		let holder = self.config.asset_manager.as_str();
		retry_read("get deposit", self.retry, cancel, || {
			self.client.balance_of(holder, token)
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
		let connection = configured_address(&self.config.connection, "connection")?;
		let sender = self.sender(cancel).await?;

		let call = IConnection::sendMessageCall {
			dstChainId: U256::from(hub.chain_id()),
			dstAddress: Bytes::copy_from_slice(from.as_slice()),
			payload: payload.as_bytes().clone(),
		};
		let tx = EvmTransaction {
			from: sender,
			to: connection,
			value: U256::ZERO,
			data: call.abi_encode().into(),
			chain_id: self.config.chain_id,
		};

		M::complete(self, tx, cancel).await
	}
}

/// Configuration schema for EVM spoke chains.
pub struct EvmSchema;

impl ConfigSchema for EvmSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		evm_schema().validate(config)
	}
}

/// Fields shared by the EVM and Sonic tables.
pub(crate) fn evm_schema() -> Schema {
	Schema::new(
		vec![
			Field::new("rpc_url", FieldType::String).with_validator(validators::rpc_url),
			Field::new(
				"chain_id",
				FieldType::Integer {
					min: Some(1),
					max: None,
				},
			),
			Field::new("asset_manager", FieldType::String).with_validator(validators::evm_address),
			Field::new("connection", FieldType::String).with_validator(validators::evm_address),
		],
		vec![Field::new(
			"confirmations",
			FieldType::Integer {
				min: Some(0),
				max: Some(64),
			},
		)],
	)
}
