use std::sync::Arc;

use async_trait::async_trait;

use super::types::{NftList, ValidatorList, WalletAsset};
use super::{ChainSource, WalletBackend, TOP_VALIDATOR_LIMIT};
use crate::error::BackendError;
use crate::session::Session;
use crate::session_store::SessionStore;
use crate::wallet::WalletId;

/// `WalletBackend` that commits sessions to a local SQLite store and reads
/// chain data from a `ChainSource`.
pub struct LocalBackend {
    store: tokio::sync::Mutex<SessionStore>,
    source: Arc<dyn ChainSource>,
}

impl LocalBackend {
    pub fn new(store: SessionStore, source: Arc<dyn ChainSource>) -> Self {
        Self {
            store: tokio::sync::Mutex::new(store),
            source,
        }
    }

    /// The committed session, or `None` on first run.
    pub async fn stored_session(&self) -> Result<Option<Session>, BackendError> {
        let store = self.store.lock().await;
        store
            .load()
            .map_err(|e| BackendError::Storage(format!("{e:#}")))
    }
}

#[async_trait]
impl WalletBackend for LocalBackend {
    async fn commit_active_session(&self, candidate: Session) -> Result<(), BackendError> {
        let store = self.store.lock().await;
        store
            .commit(candidate)
            .map(|_| ())
            .map_err(|e| BackendError::Storage(format!("{e:#}")))
    }

    async fn clear_active_session(&self) -> Result<(), BackendError> {
        let store = self.store.lock().await;
        store
            .clear()
            .map_err(|e| BackendError::Storage(format!("{e:#}")))
    }

    async fn active_session(&self) -> Result<Session, BackendError> {
        self.stored_session()
            .await?
            .ok_or_else(|| BackendError::NotFound("No active session has been committed.".into()))
    }

    async fn default_asset(&self, session: &Session) -> Result<WalletAsset, BackendError> {
        self.source.asset(session).await
    }

    async fn nfts(&self, wallet_id: &WalletId) -> Result<NftList, BackendError> {
        self.source.nfts(wallet_id).await
    }

    async fn sync_account(&self, session: &Session) -> Result<(), BackendError> {
        self.source.sync(session).await
    }

    /// Validators ranked by voting power, highest first, capped at
    /// `TOP_VALIDATOR_LIMIT`.
    async fn top_validators(&self, chain_id: &str) -> Result<ValidatorList, BackendError> {
        let mut validators = self.source.validators(chain_id).await?;
        validators.sort_by(|a, b| b.voting_power.cmp(&a.voting_power));
        validators.truncate(TOP_VALIDATOR_LIMIT);
        Ok(ValidatorList {
            chain_id: chain_id.to_string(),
            validators,
        })
    }
}
