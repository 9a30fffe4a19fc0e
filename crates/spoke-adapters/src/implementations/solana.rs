//! Solana spoke adapter.
//!
//! Deposits and wallet calls are Anchor instructions on the asset-manager and
//! connection programs. Instruction data is the 8-byte Anchor discriminator
//! followed by Borsh-encoded arguments.

use crate::{
	amount_to_u64, ensure_family, ensure_hub_origin, submit_and_confirm, wallet_address,
	SpokeAdapter,
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use spoke_account::WalletProvider;
use spoke_chains::{retry_read, ChainClient, HubProvider, RetryPolicy, U256};
use spoke_types::{
	validators, CallPayload, ChainFamily, ConfigSchema, DepositParams, Field, FieldType,
	HubAddress, Schema, SolanaAccountMeta, SolanaFee, SolanaInstruction, SolanaTransaction,
	SpokeChainConfig, SpokeError, Submitter, TransactionHash, TxMode, ValidationError,
};
use tokio_util::sync::CancellationToken;

/// System program id, also used as the native SOL token sentinel.
pub const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";

pub type SolanaClient = dyn ChainClient<Transaction = SolanaTransaction, GasEstimate = SolanaFee>;

pub struct SolanaAdapter<'a> {
	config: &'a SpokeChainConfig,
	wallet: &'a dyn WalletProvider<Transaction = SolanaTransaction>,
	client: &'a SolanaClient,
	retry: &'a RetryPolicy,
}

impl<'a> SolanaAdapter<'a> {
	pub fn new(
		config: &'a SpokeChainConfig,
		wallet: &'a dyn WalletProvider<Transaction = SolanaTransaction>,
		client: &'a SolanaClient,
		retry: &'a RetryPolicy,
	) -> Result<Self, SpokeError> {
		ensure_family(config, ChainFamily::Solana)?;
		Ok(Self {
			config,
			wallet,
			client,
			retry,
		})
	}
}

/// First 8 bytes of `sha256("global:<name>")`.
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
	let digest = Sha256::digest(format!("global:{}", name).as_bytes());
	let mut discriminator = [0u8; 8];
	discriminator.copy_from_slice(&digest[..8]);
	discriminator
}

/// Borsh `Vec<u8>`: little-endian u32 length prefix, then the bytes.
fn put_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
	buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
	buf.extend_from_slice(bytes);
}

fn ensure_pubkey(value: &str, what: &str) -> Result<(), SpokeError> {
	match bs58::decode(value).into_vec() {
		Ok(bytes) if bytes.len() == 32 => Ok(()),
		_ => Err(SpokeError::invalid(format!(
			"invalid {} public key {}",
			what, value
		))),
	}
}

fn pubkey_validator(value: &toml::Value) -> Result<(), String> {
	let key = value.as_str().unwrap_or_default();
	match bs58::decode(key).into_vec() {
		Ok(bytes) if bytes.len() == 32 => Ok(()),
		_ => Err("Public key must be 32 bytes of base58".to_string()),
	}
}

#[async_trait]
impl<'a> Submitter for SolanaAdapter<'a> {
	type Transaction = SolanaTransaction;

	async fn submit(
		&self,
		tx: SolanaTransaction,
		cancel: &CancellationToken,
	) -> Result<TransactionHash, SpokeError> {
		if tx.instructions.is_empty() {
			return Err(SpokeError::invalid("solana transaction has no instructions"));
		}
		submit_and_confirm(self.config, self.wallet, self.client, &tx, cancel).await
	}
}

#[async_trait]
impl<'a> SpokeAdapter for SolanaAdapter<'a> {
	type GasEstimate = SolanaFee;

	fn family(&self) -> ChainFamily {
		ChainFamily::Solana
	}

	fn config(&self) -> &SpokeChainConfig {
		self.config
	}

	async fn estimate_gas(
		&self,
		tx: &SolanaTransaction,
		cancel: &CancellationToken,
	) -> Result<SolanaFee, SpokeError> {
		retry_read("estimate fee", self.retry, cancel, || self.client.estimate_fee(tx)).await
	}

	async fn deposit<M: TxMode>(
		&self,
		params: &DepositParams,
		_hub: &HubProvider,
		cancel: &CancellationToken,
	) -> Result<M::Output<SolanaTransaction>, SpokeError> {
		params.ensure_well_formed()?;
		let amount = amount_to_u64(params.amount, ChainFamily::Solana)?;
		ensure_pubkey(&params.token, "token")?;
		let user = wallet_address(self.wallet, cancel).await?;

		let mut data = anchor_discriminator("transfer").to_vec();
		data.extend_from_slice(&amount.to_le_bytes());
		put_bytes(&mut data, &params.to);
		put_bytes(&mut data, &params.data);

		let instruction = SolanaInstruction {
			program_id: self.config.asset_manager.clone(),
			accounts: vec![
				SolanaAccountMeta::signer(user.clone()),
				SolanaAccountMeta::writable(params.token.clone()),
				SolanaAccountMeta::readonly(self.config.connection.clone()),
				SolanaAccountMeta::readonly(SYSTEM_PROGRAM),
			],
			data,
		};

		let tx = SolanaTransaction {
			fee_payer: user,
			instructions: vec![instruction],
		};
		M::complete(self, tx, cancel).await
	}

	async fn get_deposit(&self, token: &str, cancel: &CancellationToken) -> Result<U256, SpokeError> {
		ensure_pubkey(token, "token")?;
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
	) -> Result<M::Output<SolanaTransaction>, SpokeError> {
		ensure_hub_origin(&from)?;
		let user = wallet_address(self.wallet, cancel).await?;

		let mut data = anchor_discriminator("send_message").to_vec();
		data.extend_from_slice(&u128::from(hub.chain_id()).to_le_bytes());
		put_bytes(&mut data, from.as_slice());
		put_bytes(&mut data, payload.as_bytes());

		let tx = SolanaTransaction {
			fee_payer: user.clone(),
			instructions: vec![SolanaInstruction {
				program_id: self.config.connection.clone(),
				accounts: vec![
					SolanaAccountMeta::signer(user),
					SolanaAccountMeta::readonly(SYSTEM_PROGRAM),
				],
				data,
			}],
		};
		M::complete(self, tx, cancel).await
	}
}

pub struct SolanaSchema;

impl ConfigSchema for SolanaSchema {
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
				Field::new("asset_manager", FieldType::String).with_validator(pubkey_validator),
				Field::new("connection", FieldType::String).with_validator(pubkey_validator),
			],
			vec![Field::new(
				"confirmations",
				FieldType::Integer {
					min: Some(0),
					max: Some(32),
				},
			)],
		)
		.validate(config)
	}
}
