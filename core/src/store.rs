//! Shared holder of the active session and the caches derived from it.
//!
//! Only the switcher writes here; the setters are crate-private. Readers take
//! cloned snapshots and subscribe to `StoreEvent`s to know when to redraw.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;

use crate::backend::{NftList, ValidatorList, WalletAsset};
use crate::session::Session;
use crate::wallet::WalletId;

pub(crate) const EVENT_CAPACITY: usize = 64;

/// Change notifications, one per slot write.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The active session now belongs to this wallet.
    SessionChanged(WalletId),
    AssetChanged,
    NftsChanged,
    ValidatorsChanged,
    /// A failed switch restored the previous state. Carries the restored
    /// session's wallet, if there was one.
    RolledBack(Option<WalletId>),
}

/// Point-in-time copy of every slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedState {
    pub session: Option<Session>,
    pub asset: Option<WalletAsset>,
    pub nfts: Option<NftList>,
    pub validators: Option<ValidatorList>,
}

impl DerivedState {
    pub fn active_wallet_id(&self) -> Option<&WalletId> {
        self.session.as_ref().map(|s| s.wallet_id())
    }
}

pub struct DerivedStateStore {
    state: RwLock<DerivedState>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for DerivedStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DerivedStateStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(DerivedState::default()),
            events,
        }
    }

    /// Receive every change made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> DerivedState {
        self.read().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.read().session.clone()
    }

    pub fn active_wallet_id(&self) -> Option<WalletId> {
        self.read().active_wallet_id().cloned()
    }

    pub fn asset(&self) -> Option<WalletAsset> {
        self.read().asset.clone()
    }

    pub fn nfts(&self) -> Option<NftList> {
        self.read().nfts.clone()
    }

    pub fn validators(&self) -> Option<ValidatorList> {
        self.read().validators.clone()
    }

    pub(crate) fn set_session(&self, session: Session) {
        let wallet_id = session.wallet_id().clone();
        self.write().session = Some(session);
        self.emit(StoreEvent::SessionChanged(wallet_id));
    }

    pub(crate) fn set_asset(&self, asset: WalletAsset) {
        self.write().asset = Some(asset);
        self.emit(StoreEvent::AssetChanged);
    }

    pub(crate) fn set_nfts(&self, nfts: NftList) {
        self.write().nfts = Some(nfts);
        self.emit(StoreEvent::NftsChanged);
    }

    pub(crate) fn set_validators(&self, validators: ValidatorList) {
        self.write().validators = Some(validators);
        self.emit(StoreEvent::ValidatorsChanged);
    }

    /// Put every slot back to `previous` in one write.
    pub(crate) fn restore(&self, previous: DerivedState) {
        let wallet_id = previous.active_wallet_id().cloned();
        *self.write() = previous;
        self.emit(StoreEvent::RolledBack(wallet_id));
    }

    // Slot writes are single assignments; a poisoned lock still holds a
    // consistent state.
    fn read(&self) -> RwLockReadGuard<'_, DerivedState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, DerivedState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
