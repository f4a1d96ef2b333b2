//! Active wallet switching.
//!
//! A switch is a strict chain of backend calls; each reads durable state the
//! previous one wrote, so nothing here runs concurrently. The switcher is the
//! only writer of the derived state store.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::WalletBackend;
use crate::config::SwitchTimeouts;
use crate::error::{BackendError, Result, SwitchError, SwitchStep};
use crate::session::Session;
use crate::store::{DerivedState, DerivedStateStore};
use crate::wallet::{Wallet, WalletId};

/// Loading state observed by the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SwitchState {
    #[default]
    Idle,
    Switching { target: WalletId },
}

impl SwitchState {
    pub fn is_switching(&self) -> bool {
        matches!(self, Self::Switching { .. })
    }
}

/// Result of a completed switch.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchOutcome {
    /// The session as committed by the backend.
    pub session: Session,
    /// Wallet that was active before the switch.
    pub previous: Option<WalletId>,
}

/// How far a switch got before it stopped.
#[derive(Debug, Default, Clone, Copy)]
struct Progress {
    committed: bool,
    published: bool,
}

/// Held for the duration of one switch. Resets the switcher to `Idle` on
/// every exit path, and rolls the switch back if it is dropped before
/// `finish` (the `select` future was cancelled).
struct SwitchGuard<'a> {
    switcher: &'a ActiveWalletSwitcher,
    previous: DerivedState,
    progress: Progress,
    finished: bool,
}

impl SwitchGuard<'_> {
    /// Put the store back to the pre-switch snapshot if the switch had
    /// already published.
    fn restore_store(&mut self) {
        if self.progress.published {
            debug!("restoring derived state");
            self.switcher.store.restore(self.previous.clone());
            self.progress.published = false;
        }
    }

    fn restore_backend(&self) -> impl Future<Output = ()> + Send + 'static {
        restore_backend(
            self.switcher.backend.clone(),
            self.previous.session.clone(),
            self.switcher.timeouts.for_step(SwitchStep::CommitSession),
        )
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

impl Drop for SwitchGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("wallet switch cancelled, rolling back");
            self.restore_store();
            if self.progress.committed {
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(self.restore_backend());
                    }
                    Err(_) => warn!("no runtime left to restore the backend session"),
                }
            }
        }
        self.switcher.state.send_replace(SwitchState::Idle);
    }
}

/// Point the backend back at `previous`, or clear its session when there was
/// none. Failures are logged, never surfaced.
async fn restore_backend(
    backend: Arc<dyn WalletBackend>,
    previous: Option<Session>,
    after: Duration,
) {
    match previous {
        Some(session) => {
            let wallet_id = session.wallet_id().clone();
            match tokio::time::timeout(after, backend.commit_active_session(session)).await {
                Ok(Ok(())) => debug!(wallet = %wallet_id, "backend session restored"),
                Ok(Err(e)) => {
                    warn!(wallet = %wallet_id, error = %e, "failed to restore backend session")
                }
                Err(_) => warn!(wallet = %wallet_id, "restoring backend session timed out"),
            }
        }
        None => match tokio::time::timeout(after, backend.clear_active_session()).await {
            Ok(Ok(())) => debug!("backend session cleared"),
            Ok(Err(e)) => warn!(error = %e, "failed to clear backend session"),
            Err(_) => warn!("clearing backend session timed out"),
        },
    }
}

pub struct ActiveWalletSwitcher {
    backend: Arc<dyn WalletBackend>,
    store: Arc<DerivedStateStore>,
    timeouts: SwitchTimeouts,
    state: watch::Sender<SwitchState>,
}

impl ActiveWalletSwitcher {
    pub fn new(backend: Arc<dyn WalletBackend>, store: Arc<DerivedStateStore>) -> Self {
        let (state, _) = watch::channel(SwitchState::Idle);
        Self {
            backend,
            store,
            timeouts: SwitchTimeouts::default(),
            state,
        }
    }

    pub fn with_timeouts(mut self, timeouts: SwitchTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn store(&self) -> &Arc<DerivedStateStore> {
        &self.store
    }

    pub fn state(&self) -> SwitchState {
        self.state.borrow().clone()
    }

    pub fn is_switching(&self) -> bool {
        self.state.borrow().is_switching()
    }

    /// Watch the loading state.
    pub fn subscribe_state(&self) -> watch::Receiver<SwitchState> {
        self.state.subscribe()
    }

    /// Make `target` the active wallet and refresh every derived cache.
    ///
    /// Rejected with `SwitchInProgress` while another switch runs. On any
    /// failure the store is put back to its pre-switch state and the backend
    /// session is re-committed to the previous wallet, or cleared if there
    /// was none.
    ///
    /// Dropping the returned future mid-switch rolls back the same way: the
    /// store is restored at once and the backend restore is spawned on the
    /// current runtime.
    pub async fn select(&self, target: &Wallet) -> Result<SwitchOutcome> {
        let mut guard = self.begin(&target.identifier)?;
        let previous_id = guard.previous.active_wallet_id().cloned();
        info!(
            target = %target.identifier,
            previous = ?previous_id,
            "switching active wallet"
        );

        match self.run(target, &mut guard.progress).await {
            Ok(session) => {
                guard.finish();
                info!(wallet = %session.wallet_id(), "active wallet switched");
                Ok(SwitchOutcome {
                    session,
                    previous: previous_id,
                })
            }
            Err(e) => {
                warn!(target = %target.identifier, error = %e, "wallet switch failed");
                guard.restore_store();
                if guard.progress.committed {
                    guard.restore_backend().await;
                }
                guard.finish();
                Err(e)
            }
        }
    }

    fn begin(&self, target: &WalletId) -> Result<SwitchGuard<'_>> {
        let mut acquired = false;
        self.state.send_if_modified(|state| {
            if state.is_switching() {
                return false;
            }
            *state = SwitchState::Switching {
                target: target.clone(),
            };
            acquired = true;
            true
        });
        if !acquired {
            debug!(target = %target, "switch rejected, another switch is running");
            return Err(SwitchError::SwitchInProgress);
        }
        Ok(SwitchGuard {
            switcher: self,
            previous: self.store.snapshot(),
            progress: Progress::default(),
            finished: false,
        })
    }

    async fn run(&self, target: &Wallet, progress: &mut Progress) -> Result<Session> {
        self.call(
            SwitchStep::CommitSession,
            self.backend
                .commit_active_session(Session::new(target.clone())),
        )
        .await?;
        progress.committed = true;

        let session = self
            .call(SwitchStep::ReadSession, self.backend.active_session())
            .await?;
        if session.wallet_id() != &target.identifier {
            return Err(SwitchError::SessionReadFailure(BackendError::Unavailable(
                format!(
                    "Backend reports wallet '{}' as active, expected '{}'.",
                    session.wallet_id(),
                    target.identifier
                ),
            )));
        }

        let asset = self
            .call(SwitchStep::FetchAsset, self.backend.default_asset(&session))
            .await?;
        let nfts = self
            .call(SwitchStep::FetchNfts, self.backend.nfts(session.wallet_id()))
            .await?;

        // The new identity is visible while sync and validators are pending.
        progress.published = true;
        self.store.set_session(session.clone());
        self.store.set_asset(asset);
        self.store.set_nfts(nfts);

        self.call(SwitchStep::SyncAccount, self.backend.sync_account(&session))
            .await?;

        let validators = self
            .call(
                SwitchStep::FetchValidators,
                self.backend.top_validators(session.chain_id()),
            )
            .await?;
        self.store.set_validators(validators);

        Ok(session)
    }

    /// Run one backend call under the step's timeout.
    async fn call<T, F>(&self, step: SwitchStep, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, BackendError>>,
    {
        let after = self.timeouts.for_step(step);
        debug!(%step, "switch step started");
        match tokio::time::timeout(after, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(SwitchError::at(step, e)),
            Err(_) => Err(SwitchError::Timeout { step, after }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{NftList, ValidatorList, WalletAsset};
    use crate::wallet::{NetworkConfig, WalletType};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn wallet(id: &str) -> Wallet {
        Wallet {
            identifier: WalletId::new(id),
            name: id.to_string(),
            address: format!("0x{id}"),
            wallet_type: WalletType::Normal,
            network: NetworkConfig {
                name: "MAINNET".to_string(),
                chain_id: "mainnet-1".to_string(),
            },
        }
    }

    /// Backend whose sync step parks until released.
    struct GatedBackend {
        committed: Mutex<Option<Session>>,
        gate: Notify,
    }

    impl GatedBackend {
        fn new() -> Self {
            Self {
                committed: Mutex::new(None),
                gate: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl WalletBackend for GatedBackend {
        async fn commit_active_session(
            &self,
            candidate: Session,
        ) -> std::result::Result<(), BackendError> {
            *self.committed.lock().unwrap() = Some(candidate);
            Ok(())
        }

        async fn clear_active_session(&self) -> std::result::Result<(), BackendError> {
            *self.committed.lock().unwrap() = None;
            Ok(())
        }

        async fn active_session(&self) -> std::result::Result<Session, BackendError> {
            self.committed
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| BackendError::NotFound("none".into()))
        }

        async fn default_asset(
            &self,
            session: &Session,
        ) -> std::result::Result<WalletAsset, BackendError> {
            Ok(WalletAsset::empty(session.wallet_id().clone(), "CRO", 8))
        }

        async fn nfts(&self, wallet_id: &WalletId) -> std::result::Result<NftList, BackendError> {
            Ok(NftList {
                wallet_id: wallet_id.clone(),
                items: vec![],
            })
        }

        async fn sync_account(&self, _session: &Session) -> std::result::Result<(), BackendError> {
            self.gate.notified().await;
            Ok(())
        }

        async fn top_validators(
            &self,
            chain_id: &str,
        ) -> std::result::Result<ValidatorList, BackendError> {
            Ok(ValidatorList {
                chain_id: chain_id.to_string(),
                validators: vec![],
            })
        }
    }

    #[tokio::test]
    async fn overlapping_select_is_rejected() {
        let backend = Arc::new(GatedBackend::new());
        let store = Arc::new(DerivedStateStore::new());
        let switcher = Arc::new(ActiveWalletSwitcher::new(backend.clone(), store.clone()));

        let first = {
            let switcher = switcher.clone();
            tokio::spawn(async move { switcher.select(&wallet("w1")).await })
        };

        // Wait until the first switch parks in sync.
        let mut state = switcher.subscribe_state();
        state
            .wait_for(|s| s.is_switching())
            .await
            .unwrap();
        while store.active_wallet_id().is_none() {
            tokio::task::yield_now().await;
        }

        let second = switcher.select(&wallet("w2")).await;
        assert!(matches!(second, Err(SwitchError::SwitchInProgress)));
        assert_eq!(
            switcher.state(),
            SwitchState::Switching {
                target: WalletId::new("w1")
            }
        );

        backend.gate.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome.session.wallet_id().as_str(), "w1");
        assert_eq!(switcher.state(), SwitchState::Idle);
        assert_eq!(store.active_wallet_id(), Some(WalletId::new("w1")));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_step_times_out_and_releases() {
        let backend = Arc::new(GatedBackend::new());
        let store = Arc::new(DerivedStateStore::new());
        let switcher = ActiveWalletSwitcher::new(backend, store.clone())
            .with_timeouts(SwitchTimeouts::uniform(Duration::from_secs(2)));

        let err = switcher.select(&wallet("w1")).await.unwrap_err();
        assert!(matches!(
            err,
            SwitchError::Timeout {
                step: SwitchStep::SyncAccount,
                ..
            }
        ));
        assert!(!switcher.is_switching());
        // Published slots were rolled back to the empty start state.
        assert!(store.session().is_none());
        assert!(store.asset().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_select_rolls_back() {
        let backend = Arc::new(GatedBackend::new());
        let store = Arc::new(DerivedStateStore::new());
        let switcher = ActiveWalletSwitcher::new(backend.clone(), store.clone())
            .with_timeouts(SwitchTimeouts::uniform(Duration::from_secs(3600)));

        // Give the gated sync one permit so the first switch completes.
        backend.gate.notify_one();
        switcher.select(&wallet("w1")).await.unwrap();
        let before = store.snapshot();

        // The caller gives up while w2 is parked in sync.
        let cancelled =
            tokio::time::timeout(Duration::from_secs(5), switcher.select(&wallet("w2"))).await;
        assert!(cancelled.is_err());

        assert!(!switcher.is_switching());
        assert_eq!(store.snapshot(), before);

        // The backend restore runs on a spawned task.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let committed = backend.committed.lock().unwrap().clone().unwrap();
        assert_eq!(committed.wallet_id().as_str(), "w1");
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_first_select_clears_backend() {
        let backend = Arc::new(GatedBackend::new());
        let store = Arc::new(DerivedStateStore::new());
        let switcher = ActiveWalletSwitcher::new(backend.clone(), store.clone());

        let cancelled =
            tokio::time::timeout(Duration::from_secs(5), switcher.select(&wallet("w1"))).await;
        assert!(cancelled.is_err());
        assert!(store.session().is_none());

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(backend.committed.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn mismatched_read_back_fails_read_step() {
        struct WrongWallet(GatedBackend);

        #[async_trait]
        impl WalletBackend for WrongWallet {
            async fn commit_active_session(
                &self,
                candidate: Session,
            ) -> std::result::Result<(), BackendError> {
                self.0.commit_active_session(candidate).await
            }
            async fn clear_active_session(&self) -> std::result::Result<(), BackendError> {
                self.0.clear_active_session().await
            }
            async fn active_session(&self) -> std::result::Result<Session, BackendError> {
                Ok(Session::new(wallet("someone-else")))
            }
            async fn default_asset(
                &self,
                session: &Session,
            ) -> std::result::Result<WalletAsset, BackendError> {
                self.0.default_asset(session).await
            }
            async fn nfts(
                &self,
                wallet_id: &WalletId,
            ) -> std::result::Result<NftList, BackendError> {
                self.0.nfts(wallet_id).await
            }
            async fn sync_account(
                &self,
                _session: &Session,
            ) -> std::result::Result<(), BackendError> {
                Ok(())
            }
            async fn top_validators(
                &self,
                chain_id: &str,
            ) -> std::result::Result<ValidatorList, BackendError> {
                self.0.top_validators(chain_id).await
            }
        }

        let store = Arc::new(DerivedStateStore::new());
        let switcher =
            ActiveWalletSwitcher::new(Arc::new(WrongWallet(GatedBackend::new())), store.clone());
        let err = switcher.select(&wallet("w1")).await.unwrap_err();
        assert_eq!(err.step(), Some(SwitchStep::ReadSession));
        assert!(store.session().is_none());
    }
}
