//! Backend contract required by the wallet switcher, and a local
//! implementation over a SQLite session store and a pluggable chain source.

mod local;
mod snapshot;
mod types;

use async_trait::async_trait;

pub use local::LocalBackend;
pub use snapshot::{ChainSnapshot, SnapshotSource};
pub use types::{NftList, NftSummary, ValidatorList, ValidatorSummary, WalletAsset};

use crate::error::BackendError;
use crate::session::Session;
use crate::wallet::WalletId;

/// Max validators returned by `top_validators`.
pub const TOP_VALIDATOR_LIMIT: usize = 10;

/// The wallet service the switcher talks to.
///
/// Every call may suspend; callers must not assume any ordering guarantees
/// beyond awaiting one call before issuing the next.
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Durably record `candidate` as the active session.
    async fn commit_active_session(&self, candidate: Session) -> Result<(), BackendError>;

    /// Forget the active session. Used to undo a first commit that did not
    /// lead to a completed switch.
    async fn clear_active_session(&self) -> Result<(), BackendError>;

    /// Read the active session as committed (possibly enriched by the backend).
    async fn active_session(&self) -> Result<Session, BackendError>;

    async fn default_asset(&self, session: &Session) -> Result<WalletAsset, BackendError>;

    async fn nfts(&self, wallet_id: &WalletId) -> Result<NftList, BackendError>;

    /// Refresh balances and transactions against the network.
    async fn sync_account(&self, session: &Session) -> Result<(), BackendError>;

    async fn top_validators(&self, chain_id: &str) -> Result<ValidatorList, BackendError>;
}

/// Read side of the chain: the network-bound half of `WalletBackend`.
#[async_trait]
pub trait ChainSource: Send + Sync {
    async fn asset(&self, session: &Session) -> Result<WalletAsset, BackendError>;

    async fn nfts(&self, wallet_id: &WalletId) -> Result<NftList, BackendError>;

    async fn sync(&self, session: &Session) -> Result<(), BackendError>;

    /// All known validators of a chain, in any order.
    async fn validators(&self, chain_id: &str) -> Result<Vec<ValidatorSummary>, BackendError>;
}
