//! Spoke-chain transaction dispatch.
//!
//! `SpokeService` routes `estimate_gas`, `deposit`, `get_deposit` and
//! `call_wallet` to the adapter matching a `SpokeProvider`'s chain family.
//! Callers pick `Raw` to receive the prepared transaction or `Submit` to have
//! it signed, submitted and confirmed.
//!
//! ```ignore
//! let service = SpokeService::new();
//! let hash = service
//!     .deposit::<Submit>(&params, &provider, &hub, &cancel)
//!     .await?;
//! ```

pub mod builder;
pub mod provider;
pub mod service;

pub use builder::{hub_provider, SpokeProviderBuilder};
pub use provider::{
	BoundProvider, EvmProvider, IconProvider, InjectiveProvider, SolanaProvider, SonicProvider,
	SpokeProvider, StellarProvider, SuiProvider,
};
pub use service::SpokeService;

pub use spoke_chains::{HubProvider, RetryPolicy};
pub use spoke_types::{
	CallPayload, ChainFamily, DepositParams, GasEstimate, HubAddress, PreparedTransaction, Raw,
	SpokeError, Submit, TransactionHash, TxMode, TxResult,
};
