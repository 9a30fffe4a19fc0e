//! Command implementations.

use crate::cli::DepositArgs;
use anyhow::{anyhow, Context, Result};
use spoke_chains::{Address, RetryPolicy, U256};
use spoke_config::Config;
use spoke_core::{
	hub_provider, CallPayload, DepositParams, HubProvider, Raw, SpokeProvider,
	SpokeProviderBuilder, SpokeService, TxResult,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Everything a command needs: configuration, hub access and the dispatcher.
pub struct Session {
	config: Config,
	hub: HubProvider,
	builder: SpokeProviderBuilder,
	service: SpokeService,
	cancel: CancellationToken,
}

impl Session {
	pub fn new(config: Config, cancel: CancellationToken) -> Result<Self> {
		let hub = hub_provider(config.hub.clone()).context("Failed to connect to the hub")?;
		let builder = match &config.private_key {
			Some(key) => SpokeProviderBuilder::new().with_private_key(key),
			None => SpokeProviderBuilder::new(),
		};

		Ok(Self {
			config,
			hub,
			builder,
			service: SpokeService::with_retry(RetryPolicy::default()),
			cancel,
		})
	}

	fn provider(&self, chain: &str) -> Result<SpokeProvider> {
		let config = self.config.spoke(chain)?;
		self.builder
			.build(config)
			.with_context(|| format!("Cannot drive {} from the command line", chain))
	}

	pub async fn deposit(&self, args: &DepositArgs, raw: bool) -> Result<()> {
		let provider = self.provider(&args.chain)?;
		let params = deposit_params(args)?;

		let result = self
			.service
			.deposit_with_mode(&params, &provider, &self.hub, raw, &self.cancel)
			.await
			.context("Deposit failed")?;
		print_result(&result)
	}

	pub async fn get_deposit(&self, chain: &str, token: &str) -> Result<()> {
		let provider = self.provider(chain)?;
		let balance = self
			.service
			.get_deposit(token, &provider, &self.cancel)
			.await
			.context("Failed to read deposit")?;

		println!("{}", balance);
		Ok(())
	}

	pub async fn call_wallet(
		&self,
		chain: &str,
		payload: &str,
		from: Option<&str>,
		raw: bool,
	) -> Result<()> {
		let provider = self.provider(chain)?;
		let payload = CallPayload::from(parse_hex(payload, "payload")?);
		let from = match from {
			Some(from) => from
				.parse::<Address>()
				.with_context(|| format!("Invalid hub address {}", from))?,
			None => self.signer_wallet(&provider).await?,
		};

		let result = self
			.service
			.call_wallet_with_mode(from, &payload, &provider, &self.hub, raw, &self.cancel)
			.await
			.context("Wallet call failed")?;
		print_result(&result)
	}

	pub async fn estimate_deposit(&self, args: &DepositArgs) -> Result<()> {
		let provider = self.provider(&args.chain)?;
		let params = deposit_params(args)?;

		let prepared = self
			.service
			.deposit::<Raw>(&params, &provider, &self.hub, &self.cancel)
			.await
			.context("Failed to prepare deposit")?;
		let estimate = self
			.service
			.estimate_gas(&prepared, &provider, &self.cancel)
			.await
			.context("Failed to estimate deposit")?;

		println!("{}", serde_json::to_string_pretty(&estimate)?);
		Ok(())
	}

	pub async fn hub_wallet(&self, chain: &str, address: &str) -> Result<()> {
		let spoke = self.config.spoke(chain)?;
		let account = parse_hex(address, "address")?;
		let wallet = self
			.hub
			.abstracted_wallet(spoke.chain_id, &account, &RetryPolicy::default(), &self.cancel)
			.await
			.context("Failed to derive hub wallet")?;

		println!("{}", wallet);
		Ok(())
	}

	/// Hub wallet of the configured signer on `provider`'s chain.
	async fn signer_wallet(&self, provider: &SpokeProvider) -> Result<Address> {
		let signer = match provider {
			SpokeProvider::Evm(bound) | SpokeProvider::Sonic(bound) => bound
				.wallet()
				.address()
				.await
				.map_err(|e| anyhow!("Signer unavailable: {}", e))?,
			_ => return Err(anyhow!("--from is required for {} chains", provider.family())),
		};
		let signer: Address = signer.parse().context("Signer address is not an EVM address")?;

		let wallet = self
			.hub
			.abstracted_wallet(
				provider.chain_id(),
				signer.as_slice(),
				&RetryPolicy::default(),
				&self.cancel,
			)
			.await?;
		info!(signer = %signer, wallet = %wallet, "Resolved hub wallet");
		Ok(wallet)
	}
}

pub fn deposit_params(args: &DepositArgs) -> Result<DepositParams> {
	let amount: U256 = args
		.amount
		.parse()
		.map_err(|e| anyhow!("Invalid amount {}: {}", args.amount, e))?;
	Ok(
		DepositParams::new(args.token.clone(), amount, parse_hex(&args.to, "recipient")?)
			.with_data(parse_hex(&args.data, "data")?),
	)
}

fn parse_hex(value: &str, what: &str) -> Result<Vec<u8>> {
	hex::decode(value.trim_start_matches("0x")).with_context(|| format!("Invalid {} hex {}", what, value))
}

fn print_result(result: &TxResult) -> Result<()> {
	match result {
		TxResult::Prepared(tx) => println!("{}", serde_json::to_string_pretty(tx)?),
		TxResult::Submitted(hash) => println!("{}", hash),
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn args(amount: &str, to: &str, data: &str) -> DepositArgs {
		DepositArgs {
			chain: "arbitrum".to_string(),
			token: "0x0000000000000000000000000000000000000000".to_string(),
			amount: amount.to_string(),
			to: to.to_string(),
			data: data.to_string(),
		}
	}

	#[test]
	fn test_deposit_params_parsing() {
		let params = deposit_params(&args("1000000000000000000", "0x2222", "")).unwrap();
		assert_eq!(params.amount, U256::from(10u64).pow(U256::from(18u64)));
		assert_eq!(&params.to[..], &[0x22, 0x22]);
		assert!(params.data.is_empty());

		let params = deposit_params(&args("0x10", "2222", "0xbeef")).unwrap();
		assert_eq!(params.amount, U256::from(16u64));
		assert_eq!(&params.data[..], &[0xbe, 0xef]);
	}

	#[test]
	fn test_deposit_params_rejects_garbage() {
		assert!(deposit_params(&args("ten", "0x22", "")).is_err());
		assert!(deposit_params(&args("10", "0xzz", "")).is_err());
	}
}
