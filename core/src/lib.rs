use std::path::PathBuf;

use anyhow::Context;

pub mod analytics;
pub mod backend;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod page;
pub mod projector;
pub mod search;
pub mod session;
pub mod session_store;
pub mod store;
pub mod switcher;
pub mod wallet;

pub use analytics::{AnalyticsSink, NoopAnalytics, TracingAnalytics};
pub use backend::{ChainSnapshot, ChainSource, LocalBackend, SnapshotSource, WalletBackend};
pub use commands::Command;
pub use config::SwitchTimeouts;
pub use error::{BackendError, SwitchError, SwitchStep};
pub use page::{Notice, WalletPage};
pub use projector::{project, DisplayRow, SortCommand, SortKey, SortOrder};
pub use session::Session;
pub use session_store::SessionStore;
pub use store::{DerivedState, DerivedStateStore, StoreEvent};
pub use switcher::{ActiveWalletSwitcher, SwitchOutcome, SwitchState};
pub use wallet::{NetworkTag, Wallet, WalletId, WalletType};

/// XDG-compliant data directory for the session database.
/// Linux: `~/.local/share/wallet-switch/`, macOS: `~/Library/Application Support/wallet-switch/`
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Cannot determine data directory")?
        .join("wallet-switch");
    Ok(dir)
}
