//! Injective spoke adapter.
//!
//! Prepares CosmWasm `MsgExecuteContract` messages. Bank denoms are attached
//! as funds; CW20 tokens (bech32 contract addresses) are pulled by the asset
//! manager under the sender's allowance.

use crate::{
	amount_to_u128, ensure_family, ensure_hub_origin, submit_and_confirm, wallet_address,
	SpokeAdapter,
};
use async_trait::async_trait;
use serde_json::json;
use spoke_account::WalletProvider;
use spoke_chains::{retry_read, ChainClient, HubProvider, RetryPolicy, U256};
use spoke_types::{
	validators, CallPayload, ChainFamily, ConfigSchema, CosmosCoin, CosmosGas, DepositParams,
	Field, FieldType, HubAddress, InjectiveTransaction, Schema, SpokeChainConfig, SpokeError,
	Submitter, TransactionHash, TxMode, ValidationError,
};
use tokio_util::sync::CancellationToken;

const HRP: &str = "inj";

pub type InjectiveClient = dyn ChainClient<Transaction = InjectiveTransaction, GasEstimate = CosmosGas>;

pub struct InjectiveAdapter<'a> {
	config: &'a SpokeChainConfig,
	wallet: &'a dyn WalletProvider<Transaction = InjectiveTransaction>,
	client: &'a InjectiveClient,
	retry: &'a RetryPolicy,
}

impl<'a> InjectiveAdapter<'a> {
	pub fn new(
		config: &'a SpokeChainConfig,
		wallet: &'a dyn WalletProvider<Transaction = InjectiveTransaction>,
		client: &'a InjectiveClient,
		retry: &'a RetryPolicy,
	) -> Result<Self, SpokeError> {
		ensure_family(config, ChainFamily::Injective)?;
		Ok(Self {
			config,
			wallet,
			client,
			retry,
		})
	}
}

fn is_cw20(token: &str) -> bool {
	validators::bech32_with_prefix(&toml::Value::String(token.to_string()), HRP).is_ok()
}

/// Bank denoms: `inj`, `peggy0x...`, `factory/...`, `ibc/...`.
fn ensure_denom(token: &str) -> Result<(), SpokeError> {
	let valid = !token.is_empty()
		&& token
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));
	if valid {
		Ok(())
	} else {
		Err(SpokeError::invalid(format!("invalid Injective denom {}", token)))
	}
}

#[async_trait]
impl<'a> Submitter for InjectiveAdapter<'a> {
	type Transaction = InjectiveTransaction;

	async fn submit(
		&self,
		tx: InjectiveTransaction,
		cancel: &CancellationToken,
	) -> Result<TransactionHash, SpokeError> {
		if !tx.msg.is_object() {
			return Err(SpokeError::invalid("execute message must be a JSON object"));
		}
		submit_and_confirm(self.config, self.wallet, self.client, &tx, cancel).await
	}
}

#[async_trait]
impl<'a> SpokeAdapter for InjectiveAdapter<'a> {
	type GasEstimate = CosmosGas;

	fn family(&self) -> ChainFamily {
		ChainFamily::Injective
	}

	fn config(&self) -> &SpokeChainConfig {
		self.config
	}

	async fn estimate_gas(
		&self,
		tx: &InjectiveTransaction,
		cancel: &CancellationToken,
	) -> Result<CosmosGas, SpokeError> {
		retry_read("simulate", self.retry, cancel, || self.client.estimate_fee(tx)).await
	}

	async fn deposit<M: TxMode>(
		&self,
		params: &DepositParams,
		_hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<InjectiveTransaction>, SpokeError> {
		params.ensure_well_formed()?;
		ensure_denom(&params.token)?;
		let amount = amount_to_u128(params.amount, ChainFamily::Injective)?.to_string();
		let sender = wallet_address(self.wallet, cancel).await?;

		let funds = if is_cw20(&params.token) {
			vec![]
		} else {
			vec![CosmosCoin {
				denom: params.token.clone(),
				amount: amount.clone(),
			}]
		};

		let tx = InjectiveTransaction {
			sender,
			contract: self.config.asset_manager.clone(),
			msg: json!({
				"transfer": {
					"token": params.token,
					"to": hex::encode(&params.to),
					"amount": amount,
					"data": hex::encode(&params.data),
				}
			}),
			funds,
		};
		M::complete(self, tx, cancel).await
	}

	async fn get_deposit(&self, token: &str, cancel: &CancellationToken) -> Result<U256, SpokeError> {
		ensure_denom(token)?;
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
	) -> Result<M::Output<InjectiveTransaction>, SpokeError> {
		ensure_hub_origin(&from)?;
		let sender = wallet_address(self.wallet, cancel).await?;

		let tx = InjectiveTransaction {
			sender,
			contract: self.config.connection.clone(),
			msg: json!({
				"send_message": {
					"dst_chain_id": hub.chain_id().to_string(),
					"dst_address": hex::encode(from),
					"payload": hex::encode(payload.as_bytes()),
				}
			}),
			funds: vec![],
		};
		M::complete(self, tx, cancel).await
	}
}

pub struct InjectiveSchema;

impl ConfigSchema for InjectiveSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let bech32 = |value: &toml::Value| validators::bech32_with_prefix(value, HRP);
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
				Field::new("asset_manager", FieldType::String).with_validator(bech32),
				Field::new("connection", FieldType::String).with_validator(bech32),
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

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{hub, spoke_config, MockClient, MockWallet};
	use alloy::primitives::Address;
	use spoke_types::{Raw, Submit};

	fn sender() -> String {
		format!("inj1{}", "x".repeat(38))
	}

	fn fixtures() -> (
		SpokeChainConfig,
		MockWallet<InjectiveTransaction>,
		MockClient<InjectiveTransaction, CosmosGas>,
		RetryPolicy,
	) {
		(
			spoke_config(ChainFamily::Injective),
			MockWallet::new(&sender()),
			MockClient::new(CosmosGas {
				gas_used: 150_000,
				gas_wanted: 200_000,
			}),
			RetryPolicy::none(),
		)
	}

	#[tokio::test]
	async fn test_bank_denom_deposit_attaches_funds() {
		let (config, wallet, client, retry) = fixtures();
		let adapter = InjectiveAdapter::new(&config, &wallet, &client, &retry).unwrap();
		let params = DepositParams::new("inj", U256::from(10u64).pow(U256::from(18u64)), vec![0x01u8]);

		let tx = adapter
			.deposit::<Raw>(&params, &hub(), &CancellationToken::new())
			.await
			.unwrap();

		assert_eq!(tx.contract, config.asset_manager);
		assert_eq!(
			tx.funds,
			vec![CosmosCoin {
				denom: "inj".to_string(),
				amount: "1000000000000000000".to_string()
			}]
		);
		assert_eq!(tx.msg["transfer"]["amount"], "1000000000000000000");
		assert_eq!(tx.msg["transfer"]["to"], "01");
		assert_eq!(wallet.submitted(), 0);
	}

	#[tokio::test]
	async fn test_cw20_deposit_attaches_no_funds() {
		let (config, wallet, client, retry) = fixtures();
		let adapter = InjectiveAdapter::new(&config, &wallet, &client, &retry).unwrap();
		let token = format!("inj1{}", "t".repeat(38));
		let params = DepositParams::new(token.clone(), U256::from(5u64), vec![0x01u8]);

		let tx = adapter
			.deposit::<Raw>(&params, &hub(), &CancellationToken::new())
			.await
			.unwrap();

		assert!(tx.funds.is_empty());
		assert_eq!(tx.msg["transfer"]["token"], token);
	}

	#[tokio::test]
	async fn test_call_wallet_execute_message() {
		let (config, wallet, client, retry) = fixtures();
		let adapter = InjectiveAdapter::new(&config, &wallet, &client, &retry).unwrap();

		adapter
			.call_wallet::<Submit>(
				Address::repeat_byte(0x42),
				&CallPayload::from(vec![0x0a, 0x0b]),
				&hub(),
				&CancellationToken::new(),
			)
			.await
			.unwrap();

		let sent = wallet.sent();
		assert_eq!(sent[0].contract, config.connection);
		assert_eq!(sent[0].msg["send_message"]["payload"], "0a0b");
		assert_eq!(sent[0].msg["send_message"]["dst_chain_id"], "146");
	}

	#[tokio::test]
	async fn test_rejected_signature_surfaces() {
		let (config, _, client, retry) = fixtures();
		let wallet = MockWallet::<InjectiveTransaction>::new(&sender()).rejecting();
		let adapter = InjectiveAdapter::new(&config, &wallet, &client, &retry).unwrap();
		let params = DepositParams::new("inj", U256::from(1u64), vec![0x01u8]);

		let result = adapter
			.deposit::<Submit>(&params, &hub(), &CancellationToken::new())
			.await;
		assert!(matches!(result, Err(SpokeError::SigningRejected(_))));
	}

	#[tokio::test]
	async fn test_malformed_denom_is_invalid() {
		let (config, wallet, client, retry) = fixtures();
		let adapter = InjectiveAdapter::new(&config, &wallet, &client, &retry).unwrap();

		let result = adapter.get_deposit("in j", &CancellationToken::new()).await;
		assert!(matches!(result, Err(SpokeError::InvalidParams(_))));
		assert_eq!(client.reads(), 0);
	}
}
