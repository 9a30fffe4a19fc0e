//! Stellar spoke adapter.
//!
//! Prepares Soroban contract invocations. Footprints, resource fees and the
//! source account sequence are filled in by the wallet after simulation.

use crate::{
	amount_to_u128, ensure_family, ensure_hub_origin, submit_and_confirm, wallet_address,
	SpokeAdapter,
};
use async_trait::async_trait;
use spoke_account::WalletProvider;
use spoke_chains::{retry_read, ChainClient, HubProvider, RetryPolicy, U256};
use spoke_types::{
	validators, CallPayload, ChainFamily, ConfigSchema, DepositParams, Field, FieldType,
	HubAddress, Schema, SpokeChainConfig, SpokeError, StellarArg, StellarFee, StellarTransaction,
	Submitter, TransactionHash, TxMode, ValidationError,
};
use tokio_util::sync::CancellationToken;

pub const PUBLIC_NETWORK_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

pub type StellarClient = dyn ChainClient<Transaction = StellarTransaction, GasEstimate = StellarFee>;

pub struct StellarAdapter<'a> {
	config: &'a SpokeChainConfig,
	wallet: &'a dyn WalletProvider<Transaction = StellarTransaction>,
	client: &'a StellarClient,
	retry: &'a RetryPolicy,
}

impl<'a> StellarAdapter<'a> {
	pub fn new(
		config: &'a SpokeChainConfig,
		wallet: &'a dyn WalletProvider<Transaction = StellarTransaction>,
		client: &'a StellarClient,
		retry: &'a RetryPolicy,
	) -> Result<Self, SpokeError> {
		ensure_family(config, ChainFamily::Stellar)?;
		Ok(Self {
			config,
			wallet,
			client,
			retry,
		})
	}

	fn passphrase(&self) -> String {
		self.config
			.network_id
			.clone()
			.unwrap_or_else(|| PUBLIC_NETWORK_PASSPHRASE.to_string())
	}

	fn invocation(
		&self,
		source: String,
		contract_id: &str,
		function: &str,
		args: Vec<StellarArg>,
	) -> StellarTransaction {
		StellarTransaction {
			source,
			contract_id: contract_id.to_string(),
			function: function.to_string(),
			args,
			network_passphrase: self.passphrase(),
		}
	}
}

/// Soroban amounts are `i128`.
fn amount_to_i128(amount: U256) -> Result<i128, SpokeError> {
	let amount = amount_to_u128(amount, ChainFamily::Stellar)?;
	i128::try_from(amount)
		.map_err(|_| SpokeError::invalid(format!("amount {} does not fit a stellar i128", amount)))
}

fn ensure_contract(token: &str) -> Result<(), SpokeError> {
	validators::stellar_contract(&toml::Value::String(token.to_string()))
		.map_err(|e| SpokeError::invalid(format!("invalid token {}: {}", token, e)))
}

#[async_trait]
impl<'a> Submitter for StellarAdapter<'a> {
	type Transaction = StellarTransaction;

	async fn submit(
		&self,
		tx: StellarTransaction,
		cancel: &CancellationToken,
	) -> Result<TransactionHash, SpokeError> {
		if tx.network_passphrase != self.passphrase() {
			return Err(SpokeError::invalid(format!(
				"transaction signed for network {:?} submitted to {}",
				tx.network_passphrase, self.config.name
			)));
		}
		submit_and_confirm(self.config, self.wallet, self.client, &tx, cancel).await
	}
}

#[async_trait]
impl<'a> SpokeAdapter for StellarAdapter<'a> {
	type GasEstimate = StellarFee;

	fn family(&self) -> ChainFamily {
		ChainFamily::Stellar
	}

	fn config(&self) -> &SpokeChainConfig {
		self.config
	}

	async fn estimate_gas(
		&self,
		tx: &StellarTransaction,
		cancel: &CancellationToken,
	) -> Result<StellarFee, SpokeError> {
		retry_read("simulate", self.retry, cancel, || self.client.estimate_fee(tx)).await
	}

	async fn deposit<M: TxMode>(
		&self,
		params: &DepositParams,
		_hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<StellarTransaction>, SpokeError> {
		params.ensure_well_formed()?;
		ensure_contract(&params.token)?;
		let amount = amount_to_i128(params.amount)?;
		let source = wallet_address(self.wallet, cancel).await?;

		let args = vec![
			StellarArg::Address(source.clone()),
			StellarArg::Address(params.token.clone()),
			StellarArg::I128(amount.to_string()),
			StellarArg::Bytes(params.to.to_vec()),
			StellarArg::Bytes(params.data.to_vec()),
		];
		let tx = self.invocation(source, &self.config.asset_manager, "transfer", args);
		M::complete(self, tx, cancel).await
	}

	async fn get_deposit(&self, token: &str, cancel: &CancellationToken) -> Result<U256, SpokeError> {
		ensure_contract(token)?;
		let vault = self.config.asset_manager.as_str();
		retry_read("get deposit", self.retry, cancel, || {
			self.client.balance_of(vault, token)
		})
		.await
	}

	async fn call_wallet<M: TxMode>(
		&self,
		from: HubAddress,
		payload: &CallPayload,
		hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<StellarTransaction>, SpokeError> {
		ensure_hub_origin(&from)?;
		let source = wallet_address(self.wallet, cancel).await?;

		let args = vec![
			StellarArg::Address(source.clone()),
			StellarArg::U128(hub.chain_id().to_string()),
			StellarArg::Bytes(from.to_vec()),
			StellarArg::Bytes(payload.as_bytes().to_vec()),
		];
		let tx = self.invocation(source, &self.config.connection, "send_message", args);
		M::complete(self, tx, cancel).await
	}
}

pub struct StellarSchema;

impl ConfigSchema for StellarSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
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
				Field::new("asset_manager", FieldType::String)
					.with_validator(validators::stellar_contract),
				Field::new("connection", FieldType::String).with_validator(validators::stellar_contract),
			],
			vec![
				Field::new("network_id", FieldType::String),
				Field::new(
					"confirmations",
					FieldType::Integer {
						min: Some(0),
						max: Some(1),
					},
				),
			],
		)
		.validate(config)
	}
}
