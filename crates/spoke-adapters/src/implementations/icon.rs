//! ICON spoke adapter.
//!
//! Native ICX deposits call the asset manager with `value` attached. IRC-2
//! deposits go through the token's `transfer`, whose token fallback on the
//! asset manager receives the hub recipient and data in `_data`.

use crate::{ensure_family, ensure_hub_origin, submit_and_confirm, wallet_address, SpokeAdapter};
use async_trait::async_trait;
use spoke_account::WalletProvider;
use spoke_chains::{retry_read, ChainClient, HubProvider, RetryPolicy, U256};
use spoke_types::{
	validators, CallPayload, ChainFamily, ConfigSchema, DepositParams, Field, FieldType,
	HubAddress, IconCall, IconStepCost, IconTransaction, Schema, SpokeChainConfig, SpokeError,
	Submitter, TransactionHash, TxMode, ValidationError,
};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// Native ICX sentinel token.
pub const NATIVE_ICX: &str = "cx0000000000000000000000000000000000000000";
const MAINNET_NID: &str = "0x1";

pub type IconClient = dyn ChainClient<Transaction = IconTransaction, GasEstimate = IconStepCost>;

pub struct IconAdapter<'a> {
	config: &'a SpokeChainConfig,
	wallet: &'a dyn WalletProvider<Transaction = IconTransaction>,
	client: &'a IconClient,
	retry: &'a RetryPolicy,
}

impl<'a> IconAdapter<'a> {
	pub fn new(
		config: &'a SpokeChainConfig,
		wallet: &'a dyn WalletProvider<Transaction = IconTransaction>,
		client: &'a IconClient,
		retry: &'a RetryPolicy,
	) -> Result<Self, SpokeError> {
		ensure_family(config, ChainFamily::Icon)?;
		Ok(Self {
			config,
			wallet,
			client,
			retry,
		})
	}

	fn nid(&self) -> &str {
		self.config.network_id.as_deref().unwrap_or(MAINNET_NID)
	}
}

fn hex_bytes(bytes: &[u8]) -> String {
	format!("0x{}", hex::encode(bytes))
}

fn hex_int(value: impl std::fmt::LowerHex) -> String {
	format!("0x{:x}", value)
}

fn call(method: &str, params: impl IntoIterator<Item = (&'static str, String)>) -> IconCall {
	IconCall {
		method: method.to_string(),
		params: params
			.into_iter()
			.map(|(key, value)| (key.to_string(), value))
			.collect::<BTreeMap<_, _>>(),
	}
}

fn ensure_token(token: &str) -> Result<(), SpokeError> {
	validators::icon_contract(&toml::Value::String(token.to_string()))
		.map_err(|e| SpokeError::invalid(format!("invalid token {}: {}", token, e)))
}

#[async_trait]
impl<'a> Submitter for IconAdapter<'a> {
	type Transaction = IconTransaction;

	async fn submit(
		&self,
		tx: IconTransaction,
		cancel: &CancellationToken,
	) -> Result<TransactionHash, SpokeError> {
		if tx.nid != self.nid() {
			return Err(SpokeError::invalid(format!(
				"transaction for nid {} submitted to {} (nid {})",
				tx.nid,
				self.config.name,
				self.nid()
			)));
		}
		submit_and_confirm(self.config, self.wallet, self.client, &tx, cancel).await
	}
}

#[async_trait]
impl<'a> SpokeAdapter for IconAdapter<'a> {
	type GasEstimate = IconStepCost;

	fn family(&self) -> ChainFamily {
		ChainFamily::Icon
	}

	fn config(&self) -> &SpokeChainConfig {
		self.config
	}

	async fn estimate_gas(
		&self,
		tx: &IconTransaction,
		cancel: &CancellationToken,
	) -> Result<IconStepCost, SpokeError> {
		retry_read("estimate step", self.retry, cancel, || self.client.estimate_fee(tx)).await
	}

	async fn deposit<M: TxMode>(
		&self,
		params: &DepositParams,
		_hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<IconTransaction>, SpokeError> {
		params.ensure_well_formed()?;
		ensure_token(&params.token)?;
		let from = wallet_address(self.wallet, cancel).await?;

		let tx = if params.token == NATIVE_ICX {
			IconTransaction {
				from,
				to: self.config.asset_manager.clone(),
				value: params.amount,
				nid: self.nid().to_string(),
				data: call(
					"transferNativeToken",
					[("_to", hex_bytes(&params.to)), ("_data", hex_bytes(&params.data))],
				),
			}
		} else {
			let fallback = serde_json::json!({
				"method": "_deposit",
				"params": { "to": hex_bytes(&params.to), "data": hex_bytes(&params.data) },
			});
			IconTransaction {
				from,
				to: params.token.clone(),
				value: U256::ZERO,
				nid: self.nid().to_string(),
				data: call(
					"transfer",
					[
						("_to", self.config.asset_manager.clone()),
						("_value", hex_int(params.amount)),
						("_data", hex_bytes(fallback.to_string().as_bytes())),
					],
				),
			}
		};

		M::complete(self, tx, cancel).await
	}

	async fn get_deposit(&self, token: &str, cancel: &CancellationToken) -> Result<U256, SpokeError> {
		ensure_token(token)?;
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
	) -> Result<M::Output<IconTransaction>, SpokeError> {
		ensure_hub_origin(&from)?;
		let sender = wallet_address(self.wallet, cancel).await?;

		let tx = IconTransaction {
			from: sender,
			to: self.config.connection.clone(),
			value: U256::ZERO,
			nid: self.nid().to_string(),
			data: call(
				"sendMessage",
				[
					("dstChainId", hex_int(hub.chain_id())),
					("dstAddress", hex_bytes(from.as_slice())),
					("payload", hex_bytes(payload.as_bytes())),
				],
			),
		};
		M::complete(self, tx, cancel).await
	}
}

pub struct IconSchema;

impl ConfigSchema for IconSchema {
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
				Field::new("asset_manager", FieldType::String).with_validator(validators::icon_contract),
				Field::new("connection", FieldType::String).with_validator(validators::icon_contract),
			],
			vec![
				Field::new("network_id", FieldType::String).with_validator(|value| {
					match value.as_str().and_then(|nid| nid.strip_prefix("0x")) {
						Some(digits) if u64::from_str_radix(digits, 16).is_ok() => Ok(()),
						_ => Err("ICON nid must be 0x-prefixed hex".to_string()),
					}
				}),
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
