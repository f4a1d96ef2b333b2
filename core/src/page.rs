//! Wallet selection page: search, sorted rows without the active wallet, and
//! selection through the switcher.
//!
//! Rows are recomputed on explicit `SessionChanged`/`RolledBack` events from
//! the store, never inferred from cache updates.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use crate::analytics::AnalyticsSink;
use crate::error::{Result, SwitchError};
use crate::projector::{project, DisplayRow, SortCommand};
use crate::search;
use crate::store::{DerivedStateStore, StoreEvent};
use crate::switcher::{ActiveWalletSwitcher, SwitchOutcome};
use crate::wallet::{Wallet, WalletId};

/// Page identifier reported to analytics.
pub const PAGE_ID: &str = "Wallet";

/// Message for the user about the last selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Switched { wallet: WalletId, name: String },
    SwitchFailed { wallet: WalletId, message: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Switched { name, .. } => write!(f, "Switched to wallet '{name}'."),
            Self::SwitchFailed { wallet, message } => {
                write!(f, "Could not switch to wallet '{wallet}': {message}")
            }
        }
    }
}

pub struct WalletPage {
    switcher: Arc<ActiveWalletSwitcher>,
    store: Arc<DerivedStateStore>,
    events: broadcast::Receiver<StoreEvent>,
    analytics: Arc<dyn AnalyticsSink>,
    wallets: Vec<Wallet>,
    query: String,
    sort: SortCommand,
    rows: Vec<DisplayRow>,
    notice: Option<Notice>,
    page_logged: bool,
}

impl WalletPage {
    pub fn new(
        switcher: Arc<ActiveWalletSwitcher>,
        analytics: Arc<dyn AnalyticsSink>,
        wallets: Vec<Wallet>,
    ) -> Self {
        let store = switcher.store().clone();
        let events = store.subscribe();
        let mut page = Self {
            switcher,
            store,
            events,
            analytics,
            wallets,
            query: String::new(),
            sort: SortCommand::default(),
            rows: Vec::new(),
            notice: None,
            page_logged: false,
        };
        page.refresh();
        page
    }

    /// Show the page. Logs the page view once per page instance.
    pub fn mount(&mut self) {
        self.refresh();
        if !self.page_logged {
            self.page_logged = true;
            self.analytics.log_page(PAGE_ID);
        }
    }

    /// Replace the known wallets (the wallet subsystem changed).
    pub fn set_wallets(&mut self, wallets: Vec<Wallet>) {
        self.wallets = wallets;
        self.refresh();
    }

    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
        self.refresh();
    }

    pub fn sort_by(&mut self, sort: SortCommand) {
        self.sort = sort;
        self.refresh();
    }

    /// Filter, then project against the current active wallet.
    pub fn refresh(&mut self) {
        let active = self.store.active_wallet_id();
        let matching = search::filter(&self.wallets, &self.query);
        self.rows = project(&matching, active.as_ref(), Some(self.sort));
    }

    /// Drain store events and re-project if the active session changed.
    /// Returns how many events were handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        let mut stale = false;
        loop {
            match self.events.try_recv() {
                Ok(StoreEvent::SessionChanged(_)) | Ok(StoreEvent::RolledBack(_)) => {
                    handled += 1;
                    stale = true;
                }
                Ok(_) => handled += 1,
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "store events lagged, refreshing");
                    handled += skipped as usize;
                    stale = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if stale {
            self.refresh();
        }
        handled
    }

    /// Look a wallet up by identifier, falling back to a case-insensitive
    /// unique name match.
    pub fn find_wallet(&self, needle: &str) -> Option<&Wallet> {
        if let Some(w) = self.wallets.iter().find(|w| w.identifier.as_str() == needle) {
            return Some(w);
        }
        let mut by_name = self
            .wallets
            .iter()
            .filter(|w| w.name.eq_ignore_ascii_case(needle));
        match (by_name.next(), by_name.next()) {
            (Some(w), None) => Some(w),
            _ => None,
        }
    }

    /// Switch the active wallet to `wallet_id` and record a notice for the user.
    pub async fn select(&mut self, wallet_id: &WalletId) -> Result<SwitchOutcome> {
        let Some(target) = self
            .wallets
            .iter()
            .find(|w| &w.identifier == wallet_id)
            .cloned()
        else {
            let err = SwitchError::UnknownWallet(wallet_id.clone());
            self.notice = Some(Notice::SwitchFailed {
                wallet: wallet_id.clone(),
                message: err.to_string(),
            });
            return Err(err);
        };

        let result = self.switcher.select(&target).await;
        self.notice = Some(match &result {
            Ok(_) => Notice::Switched {
                wallet: target.identifier.clone(),
                name: target.name.clone(),
            },
            Err(e) => Notice::SwitchFailed {
                wallet: target.identifier.clone(),
                message: e.to_string(),
            },
        });
        self.pump_events();
        result
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    /// The active wallet, shown in the table header.
    pub fn active_wallet(&self) -> Option<Wallet> {
        self.store.session().map(|s| s.wallet)
    }

    pub fn store(&self) -> &Arc<DerivedStateStore> {
        &self.store
    }

    pub fn is_loading(&self) -> bool {
        self.switcher.is_switching()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortCommand {
        self.sort
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
