//! Domain error types for backend calls and wallet switching.

use std::time::Duration;

use thiserror::Error;

use crate::wallet::WalletId;

/// Failure reported by a `WalletBackend` or `ChainSource` implementation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Remote service or data source could not be reached.
    #[error("{0}")]
    Unavailable(String),

    /// Requested wallet, session or chain data does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Durable session storage failed (SQLite, file I/O).
    #[error("{0}")]
    Storage(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The ordered steps of a wallet switch. Each backend call belongs to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchStep {
    CommitSession,
    ReadSession,
    FetchAsset,
    FetchNfts,
    SyncAccount,
    FetchValidators,
}

impl SwitchStep {
    pub const ALL: [SwitchStep; 6] = [
        SwitchStep::CommitSession,
        SwitchStep::ReadSession,
        SwitchStep::FetchAsset,
        SwitchStep::FetchNfts,
        SwitchStep::SyncAccount,
        SwitchStep::FetchValidators,
    ];
}

impl std::fmt::Display for SwitchStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CommitSession => write!(f, "commit session"),
            Self::ReadSession => write!(f, "read session"),
            Self::FetchAsset => write!(f, "fetch asset"),
            Self::FetchNfts => write!(f, "fetch NFTs"),
            Self::SyncAccount => write!(f, "sync account"),
            Self::FetchValidators => write!(f, "fetch validators"),
        }
    }
}

/// Why a wallet switch did not complete. One variant per switch step, plus
/// the guard and timeout conditions.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("Failed to commit the new session: {0}")]
    SessionCommitFailure(#[source] BackendError),

    #[error("Failed to read back the committed session: {0}")]
    SessionReadFailure(#[source] BackendError),

    #[error("Failed to fetch the wallet asset: {0}")]
    AssetFetchFailure(#[source] BackendError),

    #[error("Failed to fetch NFTs: {0}")]
    NftFetchFailure(#[source] BackendError),

    #[error("Failed to sync the account: {0}")]
    SyncFailure(#[source] BackendError),

    #[error("Failed to fetch validators: {0}")]
    ValidatorFetchFailure(#[source] BackendError),

    /// A backend call did not resolve within its configured timeout.
    #[error("Step '{step}' timed out after {}s", .after.as_secs_f64())]
    Timeout { step: SwitchStep, after: Duration },

    /// Another switch is still running.
    #[error("A wallet switch is already in progress.")]
    SwitchInProgress,

    /// The selected wallet is not in the known wallet list.
    #[error("Unknown wallet '{0}'.")]
    UnknownWallet(WalletId),
}

impl SwitchError {
    /// Wrap a backend failure in the variant for `step`.
    pub fn at(step: SwitchStep, err: BackendError) -> Self {
        match step {
            SwitchStep::CommitSession => Self::SessionCommitFailure(err),
            SwitchStep::ReadSession => Self::SessionReadFailure(err),
            SwitchStep::FetchAsset => Self::AssetFetchFailure(err),
            SwitchStep::FetchNfts => Self::NftFetchFailure(err),
            SwitchStep::SyncAccount => Self::SyncFailure(err),
            SwitchStep::FetchValidators => Self::ValidatorFetchFailure(err),
        }
    }

    /// The step that failed, if the error came from a backend call.
    pub fn step(&self) -> Option<SwitchStep> {
        match self {
            Self::SessionCommitFailure(_) => Some(SwitchStep::CommitSession),
            Self::SessionReadFailure(_) => Some(SwitchStep::ReadSession),
            Self::AssetFetchFailure(_) => Some(SwitchStep::FetchAsset),
            Self::NftFetchFailure(_) => Some(SwitchStep::FetchNfts),
            Self::SyncFailure(_) => Some(SwitchStep::SyncAccount),
            Self::ValidatorFetchFailure(_) => Some(SwitchStep::FetchValidators),
            Self::Timeout { step, .. } => Some(*step),
            Self::SwitchInProgress | Self::UnknownWallet(_) => None,
        }
    }
}

/// Alias for `std::result::Result<T, SwitchError>`.
pub type Result<T> = std::result::Result<T, SwitchError>;
