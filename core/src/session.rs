use serde::{Deserialize, Serialize};

use crate::wallet::{Wallet, WalletId};

/// Fiat currency a fresh session reports prices in.
pub const DEFAULT_CURRENCY: &str = "USD";

/// The active wallet plus the runtime context the backend attaches to it.
///
/// A locally built `Session` is only a candidate: the backend may enrich it
/// on commit, so callers re-read the committed value before trusting it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub wallet: Wallet,
    #[serde(default)]
    pub currency: String,
    /// Unix millis of the durable commit; `None` until committed.
    #[serde(default)]
    pub committed_at: Option<i64>,
}

impl Session {
    pub fn new(wallet: Wallet) -> Self {
        Self {
            wallet,
            currency: DEFAULT_CURRENCY.to_string(),
            committed_at: None,
        }
    }

    pub fn wallet_id(&self) -> &WalletId {
        &self.wallet.identifier
    }

    pub fn chain_id(&self) -> &str {
        &self.wallet.network.chain_id
    }
}
