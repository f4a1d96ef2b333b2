use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{NftList, NftSummary, ValidatorSummary, WalletAsset};
use super::ChainSource;
use crate::error::BackendError;
use crate::session::Session;
use crate::wallet::{Wallet, WalletId};

/// Symbol and decimals reported for a wallet with no recorded asset.
const FALLBACK_SYMBOL: &str = "CRO";
const FALLBACK_DECIMALS: u8 = 8;

/// Offline picture of the wallet subsystem and the chain, as stored in a
/// JSON snapshot file.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ChainSnapshot {
    #[serde(default)]
    pub wallets: Vec<Wallet>,
    #[serde(default)]
    pub assets: HashMap<WalletId, WalletAsset>,
    #[serde(default)]
    pub nfts: HashMap<WalletId, Vec<NftSummary>>,
    /// Validators keyed by chain id.
    #[serde(default)]
    pub validators: HashMap<String, Vec<ValidatorSummary>>,
}

impl ChainSnapshot {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Invalid snapshot JSON")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::from_json(&data)
    }

    fn knows(&self, wallet_id: &WalletId) -> bool {
        self.wallets.iter().any(|w| &w.identifier == wallet_id)
    }
}

/// `ChainSource` served from a `ChainSnapshot`.
pub struct SnapshotSource {
    snapshot: ChainSnapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: ChainSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(ChainSnapshot::load(path)?))
    }

    /// All wallets known to the snapshot, in file order.
    pub fn wallets(&self) -> &[Wallet] {
        &self.snapshot.wallets
    }

    fn require_wallet(&self, wallet_id: &WalletId) -> Result<(), BackendError> {
        if self.snapshot.knows(wallet_id) {
            Ok(())
        } else {
            Err(BackendError::NotFound(format!(
                "Wallet '{wallet_id}' is not in the snapshot."
            )))
        }
    }
}

#[async_trait]
impl ChainSource for SnapshotSource {
    async fn asset(&self, session: &Session) -> Result<WalletAsset, BackendError> {
        let wallet_id = session.wallet_id();
        self.require_wallet(wallet_id)?;
        Ok(self
            .snapshot
            .assets
            .get(wallet_id)
            .cloned()
            .unwrap_or_else(|| {
                WalletAsset::empty(wallet_id.clone(), FALLBACK_SYMBOL, FALLBACK_DECIMALS)
            }))
    }

    async fn nfts(&self, wallet_id: &WalletId) -> Result<NftList, BackendError> {
        self.require_wallet(wallet_id)?;
        let items = self
            .snapshot
            .nfts
            .get(wallet_id)
            .cloned()
            .unwrap_or_default();
        Ok(NftList {
            wallet_id: wallet_id.clone(),
            items,
        })
    }

    async fn sync(&self, session: &Session) -> Result<(), BackendError> {
        self.require_wallet(session.wallet_id())
    }

    async fn validators(&self, chain_id: &str) -> Result<Vec<ValidatorSummary>, BackendError> {
        Ok(self
            .snapshot
            .validators
            .get(chain_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "wallets": [
            { "identifier": "w1", "name": "Alice", "address": "0xAA", "walletType": "normal",
              "config": { "name": "MAINNET", "chainId": "mainnet-1" } },
            { "identifier": "w2", "name": "Bob", "address": "0xBB",
              "config": { "name": "MAINNET", "chainId": "mainnet-1" } }
        ],
        "assets": {
            "w1": { "walletId": "w1", "symbol": "CRO", "balance": 150000000, "decimals": 8 }
        },
        "nfts": {
            "w1": [ { "tokenId": "t1", "name": "Punk" } ]
        },
        "validators": {
            "mainnet-1": [ { "operatorAddress": "val1", "moniker": "One", "votingPower": 5 } ]
        }
    }"#;

    fn source() -> SnapshotSource {
        SnapshotSource::new(ChainSnapshot::from_json(SNAPSHOT).unwrap())
    }

    fn session_for(source: &SnapshotSource, id: &str) -> Session {
        let wallet = source
            .wallets()
            .iter()
            .find(|w| w.identifier.as_str() == id)
            .cloned()
            .unwrap();
        Session::new(wallet)
    }

    #[tokio::test]
    async fn serves_recorded_asset() {
        let source = source();
        let asset = source.asset(&session_for(&source, "w1")).await.unwrap();
        assert_eq!(asset.balance, 150_000_000);
        assert_eq!(asset.wallet_id.as_str(), "w1");
    }

    #[tokio::test]
    async fn missing_asset_is_zero_balance() {
        let source = source();
        let asset = source.asset(&session_for(&source, "w2")).await.unwrap();
        assert_eq!(asset.balance, 0);
        assert_eq!(asset.symbol, FALLBACK_SYMBOL);
        assert_eq!(asset.wallet_id.as_str(), "w2");
    }

    #[tokio::test]
    async fn nfts_are_keyed_to_wallet() {
        let source = source();
        let w1 = source.nfts(&WalletId::new("w1")).await.unwrap();
        assert_eq!(w1.len(), 1);
        let w2 = source.nfts(&WalletId::new("w2")).await.unwrap();
        assert!(w2.is_empty());
        assert_eq!(w2.wallet_id.as_str(), "w2");
    }

    #[tokio::test]
    async fn unknown_wallet_is_not_found() {
        let source = source();
        let err = source.nfts(&WalletId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
    }

    #[tokio::test]
    async fn validators_by_chain() {
        let source = source();
        assert_eq!(source.validators("mainnet-1").await.unwrap().len(), 1);
        assert!(source.validators("other").await.unwrap().is_empty());
    }
}
