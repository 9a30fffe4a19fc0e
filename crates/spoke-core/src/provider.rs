//! Provider identity model.
//!
//! A `SpokeProvider` binds one chain's configuration to a signing capability
//! and an RPC client of the same family. The family is fixed by the variant,
//! so a provider can never change identity after construction.

use spoke_account::WalletProvider;
use spoke_adapters::implementations::{
	icon::IconClient, injective::InjectiveClient, solana::SolanaClient, stellar::StellarClient,
	sui::SuiClient,
};
use spoke_chains::EvmClient;
use spoke_types::{
	ChainFamily, EvmTransaction, IconTransaction, InjectiveTransaction, SolanaTransaction,
	SpokeChainConfig, SpokeError, StellarTransaction, SuiTransaction,
};
use std::sync::Arc;

/// Chain configuration with the wallet and client bound to it.
pub struct BoundProvider<T: Send + Sync, C: ?Sized> {
	config: SpokeChainConfig,
	wallet: Arc<dyn WalletProvider<Transaction = T>>,
	client: Arc<C>,
}

impl<T: Send + Sync, C: ?Sized> BoundProvider<T, C> {
	fn new(
		config: SpokeChainConfig,
		wallet: Arc<dyn WalletProvider<Transaction = T>>,
		client: Arc<C>,
	) -> Self {
		Self {
			config,
			wallet,
			client,
		}
	}

	pub fn config(&self) -> &SpokeChainConfig {
		&self.config
	}

	pub fn wallet(&self) -> &dyn WalletProvider<Transaction = T> {
		self.wallet.as_ref()
	}

	pub fn client(&self) -> &C {
		self.client.as_ref()
	}

	pub fn wallet_handle(&self) -> &Arc<dyn WalletProvider<Transaction = T>> {
		&self.wallet
	}

	pub fn client_handle(&self) -> &Arc<C> {
		&self.client
	}
}

impl<T: Send + Sync, C: ?Sized> Clone for BoundProvider<T, C> {
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			wallet: self.wallet.clone(),
			client: self.client.clone(),
		}
	}
}

pub type EvmProvider = BoundProvider<EvmTransaction, dyn EvmClient>;
pub type SonicProvider = BoundProvider<EvmTransaction, dyn EvmClient>;
pub type SolanaProvider = BoundProvider<SolanaTransaction, SolanaClient>;
pub type SuiProvider = BoundProvider<SuiTransaction, SuiClient>;
pub type StellarProvider = BoundProvider<StellarTransaction, StellarClient>;
pub type IconProvider = BoundProvider<IconTransaction, IconClient>;
pub type InjectiveProvider = BoundProvider<InjectiveTransaction, InjectiveClient>;

/// One provider per chain family.
#[derive(Clone)]
pub enum SpokeProvider {
	Evm(EvmProvider),
	Sonic(SonicProvider),
	Solana(SolanaProvider),
	Sui(SuiProvider),
	Stellar(StellarProvider),
	Icon(IconProvider),
	Injective(InjectiveProvider),
}

/// A wallet or client of one family bound to another family's config.
fn expect_family(config: &SpokeChainConfig, family: ChainFamily) -> Result<(), SpokeError> {
	if config.family != family {
		return Err(SpokeError::unsupported(format!(
			"{} (configured as {} but bound as {})",
			config.name, config.family, family
		)));
	}
	Ok(())
}

impl SpokeProvider {
	pub fn evm(
		config: SpokeChainConfig,
		wallet: Arc<dyn WalletProvider<Transaction = EvmTransaction>>,
		client: Arc<dyn EvmClient>,
	) -> Result<Self, SpokeError> {
		expect_family(&config, ChainFamily::Evm)?;
		Ok(Self::Evm(BoundProvider::new(config, wallet, client)))
	}

	pub fn sonic(
		config: SpokeChainConfig,
		wallet: Arc<dyn WalletProvider<Transaction = EvmTransaction>>,
		client: Arc<dyn EvmClient>,
	) -> Result<Self, SpokeError> {
		expect_family(&config, ChainFamily::Sonic)?;
		Ok(Self::Sonic(BoundProvider::new(config, wallet, client)))
	}

	pub fn solana(
		config: SpokeChainConfig,
		wallet: Arc<dyn WalletProvider<Transaction = SolanaTransaction>>,
		client: Arc<SolanaClient>,
	) -> Result<Self, SpokeError> {
		expect_family(&config, ChainFamily::Solana)?;
		Ok(Self::Solana(BoundProvider::new(config, wallet, client)))
	}

	pub fn sui(
		config: SpokeChainConfig,
		wallet: Arc<dyn WalletProvider<Transaction = SuiTransaction>>,
		client: Arc<SuiClient>,
	) -> Result<Self, SpokeError> {
		expect_family(&config, ChainFamily::Sui)?;
		Ok(Self::Sui(BoundProvider::new(config, wallet, client)))
	}

	pub fn stellar(
		config: SpokeChainConfig,
		wallet: Arc<dyn WalletProvider<Transaction = StellarTransaction>>,
		client: Arc<StellarClient>,
	) -> Result<Self, SpokeError> {
		expect_family(&config, ChainFamily::Stellar)?;
		Ok(Self::Stellar(BoundProvider::new(config, wallet, client)))
	}

	pub fn icon(
		config: SpokeChainConfig,
		wallet: Arc<dyn WalletProvider<Transaction = IconTransaction>>,
		client: Arc<IconClient>,
	) -> Result<Self, SpokeError> {
		expect_family(&config, ChainFamily::Icon)?;
		Ok(Self::Icon(BoundProvider::new(config, wallet, client)))
	}

	pub fn injective(
		config: SpokeChainConfig,
		wallet: Arc<dyn WalletProvider<Transaction = InjectiveTransaction>>,
		client: Arc<InjectiveClient>,
	) -> Result<Self, SpokeError> {
		expect_family(&config, ChainFamily::Injective)?;
		Ok(Self::Injective(BoundProvider::new(config, wallet, client)))
	}

	pub fn family(&self) -> ChainFamily {
		match self {
			SpokeProvider::Evm(_) => ChainFamily::Evm,
			SpokeProvider::Sonic(_) => ChainFamily::Sonic,
			SpokeProvider::Solana(_) => ChainFamily::Solana,
			SpokeProvider::Sui(_) => ChainFamily::Sui,
			SpokeProvider::Stellar(_) => ChainFamily::Stellar,
			SpokeProvider::Icon(_) => ChainFamily::Icon,
			SpokeProvider::Injective(_) => ChainFamily::Injective,
		}
	}

	pub fn config(&self) -> &SpokeChainConfig {
		match self {
			SpokeProvider::Evm(p) | SpokeProvider::Sonic(p) => p.config(),
			SpokeProvider::Solana(p) => p.config(),
			SpokeProvider::Sui(p) => p.config(),
			SpokeProvider::Stellar(p) => p.config(),
			SpokeProvider::Icon(p) => p.config(),
			SpokeProvider::Injective(p) => p.config(),
		}
	}

	pub fn chain_id(&self) -> u64 {
		self.config().chain_id
	}

	pub fn name(&self) -> &str {
		&self.config().name
	}

	pub fn is_evm(&self) -> bool {
		self.family().is_evm()
	}
}

impl std::fmt::Debug for SpokeProvider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SpokeProvider")
			.field("family", &self.family())
			.field("name", &self.name())
			.field("chain_id", &self.chain_id())
			.finish()
	}
}
