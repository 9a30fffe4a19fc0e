//! Sui spoke adapter.
//!
//! Builds programmable transaction blocks calling the asset manager and
//! connection Move packages. Coin selection and gas budgeting are left to the
//! wallet.

use crate::{
	amount_to_u64, ensure_family, ensure_hub_origin, submit_and_confirm, wallet_address,
	SpokeAdapter,
};
use async_trait::async_trait;
use spoke_account::WalletProvider;
use spoke_chains::{retry_read, ChainClient, HubProvider, RetryPolicy, U256};
use spoke_types::{
	validators, CallPayload, ChainFamily, ConfigSchema, DepositParams, Field, FieldType,
	HubAddress, Schema, SpokeChainConfig, SpokeError, Submitter, SuiArgument, SuiGasCost,
	SuiMoveCall, SuiTransaction, TransactionHash, TxMode, ValidationError,
};
use tokio_util::sync::CancellationToken;

pub type SuiClient = dyn ChainClient<Transaction = SuiTransaction, GasEstimate = SuiGasCost>;

pub struct SuiAdapter<'a> {
	config: &'a SpokeChainConfig,
	wallet: &'a dyn WalletProvider<Transaction = SuiTransaction>,
	client: &'a SuiClient,
	retry: &'a RetryPolicy,
}

impl<'a> SuiAdapter<'a> {
	pub fn new(
		config: &'a SpokeChainConfig,
		wallet: &'a dyn WalletProvider<Transaction = SuiTransaction>,
		client: &'a SuiClient,
		retry: &'a RetryPolicy,
	) -> Result<Self, SpokeError> {
		ensure_family(config, ChainFamily::Sui)?;
		Ok(Self {
			config,
			wallet,
			client,
			retry,
		})
	}
}

/// Coin types look like `0x2::sui::SUI`: package, module and struct name.
fn ensure_coin_type(coin_type: &str) -> Result<(), SpokeError> {
	let parts: Vec<&str> = coin_type.split("::").collect();
	let valid = parts.len() == 3
		&& parts[0].starts_with("0x")
		&& parts[1..].iter().all(|part| !part.is_empty());
	if valid {
		Ok(())
	} else {
		Err(SpokeError::invalid(format!("invalid Sui coin type {}", coin_type)))
	}
}

#[async_trait]
impl<'a> Submitter for SuiAdapter<'a> {
	type Transaction = SuiTransaction;

	async fn submit(
		&self,
		tx: SuiTransaction,
		cancel: &CancellationToken,
	) -> Result<TransactionHash, SpokeError> {
		if tx.calls.is_empty() {
			return Err(SpokeError::invalid("sui transaction has no move calls"));
		}
		submit_and_confirm(self.config, self.wallet, self.client, &tx, cancel).await
	}
}

#[async_trait]
impl<'a> SpokeAdapter for SuiAdapter<'a> {
	type GasEstimate = SuiGasCost;

	fn family(&self) -> ChainFamily {
		ChainFamily::Sui
	}

	fn config(&self) -> &SpokeChainConfig {
		self.config
	}

	async fn estimate_gas(
		&self,
		tx: &SuiTransaction,
		cancel: &CancellationToken,
	) -> Result<SuiGasCost, SpokeError> {
		retry_read("dry run", self.retry, cancel, || self.client.estimate_fee(tx)).await
	}

	async fn deposit<M: TxMode>(
		&self,
		params: &DepositParams,
		_hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<SuiTransaction>, SpokeError> {
		params.ensure_well_formed()?;
		ensure_coin_type(&params.token)?;
		let amount = amount_to_u64(params.amount, ChainFamily::Sui)?;
		let sender = wallet_address(self.wallet, cancel).await?;

		let call = SuiMoveCall {
			package: self.config.asset_manager.clone(),
			module: "asset_manager".to_string(),
			function: "transfer".to_string(),
			type_arguments: vec![params.token.clone()],
			arguments: vec![
				SuiArgument::SplitCoin {
					coin_type: params.token.clone(),
					amount,
				},
				SuiArgument::Bytes(params.to.to_vec()),
				SuiArgument::Bytes(params.data.to_vec()),
			],
		};

		let tx = SuiTransaction {
			sender,
			calls: vec![call],
			gas_budget: None,
		};
		M::complete(self, tx, cancel).await
	}

	async fn get_deposit(&self, token: &str, cancel: &CancellationToken) -> Result<U256, SpokeError> {
		ensure_coin_type(token)?;
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
	) -> Result<M::Output<SuiTransaction>, SpokeError> {
		ensure_hub_origin(&from)?;
		let sender = wallet_address(self.wallet, cancel).await?;

		let call = SuiMoveCall {
			package: self.config.connection.clone(),
			module: "connection".to_string(),
			function: "send_message".to_string(),
			type_arguments: vec![],
			arguments: vec![
				SuiArgument::U64(hub.chain_id()),
				SuiArgument::Bytes(from.to_vec()),
				SuiArgument::Bytes(payload.as_bytes().to_vec()),
			],
		};

		let tx = SuiTransaction {
			sender,
			calls: vec![call],
			gas_budget: None,
		};
		M::complete(self, tx, cancel).await
	}
}

pub struct SuiSchema;

impl ConfigSchema for SuiSchema {
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
				Field::new("asset_manager", FieldType::String).with_validator(validators::sui_object_id),
				Field::new("connection", FieldType::String).with_validator(validators::sui_object_id),
			],
			vec![Field::new(
				"confirmations",
				FieldType::Integer {
					min: Some(0),
					max: Some(1),
				},
			)],
		)
		.validate(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{hub, spoke_config, MockClient, MockWallet};
	use alloy::primitives::Address;
	use spoke_types::{Raw, Submit};

	const SUI: &str = "0x2::sui::SUI";

	fn sender() -> String {
		format!("0x{}", "5e".repeat(32))
	}

	fn fixtures() -> (
		SpokeChainConfig,
		MockWallet<SuiTransaction>,
		MockClient<SuiTransaction, SuiGasCost>,
		RetryPolicy,
	) {
		(
			spoke_config(ChainFamily::Sui),
			MockWallet::new(&sender()),
			MockClient::new(SuiGasCost {
				computation_cost: 1_000,
				storage_cost: 2_000,
				storage_rebate: 500,
			}),
			RetryPolicy::none(),
		)
	}

	#[tokio::test]
	async fn test_deposit_builds_asset_manager_call() {
		let (config, wallet, client, retry) = fixtures();
		let adapter = SuiAdapter::new(&config, &wallet, &client, &retry).unwrap();
		let params = DepositParams::new(SUI, U256::from(1_000_000_000u64), vec![0x11u8; 20]);

		let tx = adapter
			.deposit::<Raw>(&params, &hub(), &CancellationToken::new())
			.await
			.unwrap();

		assert_eq!(tx.sender, sender());
		let call = &tx.calls[0];
		assert_eq!(call.package, config.asset_manager);
		assert_eq!(call.module, "asset_manager");
		assert_eq!(call.type_arguments, vec![SUI.to_string()]);
		assert_eq!(
			call.arguments[0],
			SuiArgument::SplitCoin {
				coin_type: SUI.to_string(),
				amount: 1_000_000_000
			}
		);
		assert_eq!(call.arguments[1], SuiArgument::Bytes(vec![0x11; 20]));
		assert_eq!(wallet.submitted(), 0);
	}

	#[tokio::test]
	async fn test_malformed_coin_type_is_invalid() {
		let (config, wallet, client, retry) = fixtures();
		let adapter = SuiAdapter::new(&config, &wallet, &client, &retry).unwrap();
		let params = DepositParams::new("SUI", U256::from(1u64), vec![1u8]);

		let result = adapter
			.deposit::<Submit>(&params, &hub(), &CancellationToken::new())
			.await;
		assert!(matches!(result, Err(SpokeError::InvalidParams(_))));
	}

	#[tokio::test]
	async fn test_call_wallet_sends_message() {
		let (config, wallet, client, retry) = fixtures();
		let adapter = SuiAdapter::new(&config, &wallet, &client, &retry).unwrap();
		let payload = CallPayload::from(vec![0xca, 0xfe]);

		adapter
			.call_wallet::<Submit>(
				Address::repeat_byte(0x42),
				&payload,
				&hub(),
				&CancellationToken::new(),
			)
			.await
			.unwrap();

		let sent = wallet.sent();
		assert_eq!(sent.len(), 1);
		let call = &sent[0].calls[0];
		assert_eq!(call.package, config.connection);
		assert_eq!(call.function, "send_message");
		assert_eq!(call.arguments[2], SuiArgument::Bytes(vec![0xca, 0xfe]));
	}

	#[tokio::test]
	async fn test_estimate_passes_through_dry_run() {
		let (config, wallet, client, retry) = fixtures();
		let adapter = SuiAdapter::new(&config, &wallet, &client, &retry).unwrap();
		let tx = SuiTransaction {
			sender: sender(),
			calls: vec![],
			gas_budget: None,
		};

		let cost = adapter.estimate_gas(&tx, &CancellationToken::new()).await.unwrap();
		assert_eq!(cost.net(), 2_500);
	}

	#[tokio::test]
	async fn test_empty_transaction_is_not_submitted() {
		let (config, wallet, client, retry) = fixtures();
		let adapter = SuiAdapter::new(&config, &wallet, &client, &retry).unwrap();
		let tx = SuiTransaction {
			sender: sender(),
			calls: vec![],
			gas_budget: None,
		};

		let result = adapter.submit(tx, &CancellationToken::new()).await;
		assert!(matches!(result, Err(SpokeError::InvalidParams(_))));
		assert_eq!(wallet.submitted(), 0);
	}
}
