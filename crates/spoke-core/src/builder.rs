//! Provider construction from configuration.

use crate::provider::SpokeProvider;
use spoke_account::{LocalWallet, WalletProvider};
use spoke_chains::{AlloyClient, EvmClient, HubProvider};
use spoke_types::{ChainFamily, EvmTransaction, HubChainConfig, SpokeChainConfig, SpokeError};
use std::collections::HashMap;
use std::sync::Arc;

type ProviderFactory =
	Box<dyn Fn(&SpokeChainConfig) -> Result<SpokeProvider, SpokeError> + Send + Sync>;

/// Builds `SpokeProvider`s for configured chains.
///
/// EVM and Sonic spokes get a local key wallet and an Alloy client when a
/// private key is supplied. Other families need a factory registered with
/// [`SpokeProviderBuilder::with_factory`], since their wallets live outside
/// this workspace.
pub struct SpokeProviderBuilder {
	factories: HashMap<ChainFamily, ProviderFactory>,
}

impl Default for SpokeProviderBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl SpokeProviderBuilder {
	pub fn new() -> Self {
		Self {
			factories: HashMap::new(),
		}
	}

	/// Registers local-key factories for the EVM families.
	pub fn with_private_key(mut self, private_key: &str) -> Self {
		for family in [ChainFamily::Evm, ChainFamily::Sonic] {
			self.factories
				.insert(family, local_evm_factory(private_key.to_string(), family));
		}
		self
	}

	/// Registers (or replaces) the factory of one family.
	pub fn with_factory<F>(mut self, family: ChainFamily, factory: F) -> Self
	where
		F: Fn(&SpokeChainConfig) -> Result<SpokeProvider, SpokeError> + Send + Sync + 'static,
	{
		self.factories.insert(family, Box::new(factory));
		self
	}

	pub fn supports(&self, family: ChainFamily) -> bool {
		self.factories.contains_key(&family)
	}

	/// Builds the provider of one configured spoke.
	pub fn build(&self, config: &SpokeChainConfig) -> Result<SpokeProvider, SpokeError> {
		let factory = self.factories.get(&config.family).ok_or_else(|| {
			SpokeError::unsupported(format!(
				"{} (no {} wallet available for {})",
				config.family, config.family, config.name
			))
		})?;
		let provider = factory(config)?;
		if provider.family() != config.family {
			return Err(SpokeError::unsupported(format!(
				"{} (factory produced a {} provider)",
				config.family,
				provider.family()
			)));
		}

		tracing::debug!(chain = %config.name, family = %config.family, "Built spoke provider");
		Ok(provider)
	}
}

fn local_evm_factory(private_key: String, family: ChainFamily) -> ProviderFactory {
	Box::new(move |config: &SpokeChainConfig| {
		let wallet: Arc<dyn WalletProvider<Transaction = EvmTransaction>> =
			Arc::new(LocalWallet::new(&private_key, &config.rpc_url, config.chain_id)?);
		let client: Arc<dyn EvmClient> = Arc::new(AlloyClient::new(&config.rpc_url)?);
		match family {
			ChainFamily::Sonic => SpokeProvider::sonic(config.clone(), wallet, client),
			_ => SpokeProvider::evm(config.clone(), wallet, client),
		}
	})
}

/// Read-only hub access over HTTP.
pub fn hub_provider(config: HubChainConfig) -> Result<HubProvider, SpokeError> {
	let client: Arc<dyn EvmClient> = Arc::new(AlloyClient::new(&config.rpc_url)?);
	Ok(HubProvider::new(config, client))
}
