use serde::{Deserialize, Serialize};

use crate::wallet::WalletId;

/// Default asset snapshot of one wallet. Balance is in base units.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletAsset {
    pub wallet_id: WalletId,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub balance: u128,
    pub decimals: u8,
    /// Unit price in the session currency, when the backend knows one.
    #[serde(default)]
    pub price: Option<f64>,
}

impl WalletAsset {
    /// Zero balance placeholder for a wallet with no known holdings.
    pub fn empty(wallet_id: WalletId, symbol: &str, decimals: u8) -> Self {
        Self {
            wallet_id,
            symbol: symbol.to_string(),
            name: String::new(),
            balance: 0,
            decimals,
            price: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftSummary {
    pub token_id: String,
    #[serde(default)]
    pub denom_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Ordered NFT holdings of one wallet.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftList {
    pub wallet_id: WalletId,
    pub items: Vec<NftSummary>,
}

impl NftList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSummary {
    pub operator_address: String,
    pub moniker: String,
    /// Commission rate as a fraction (0.05 = 5%).
    #[serde(default)]
    pub commission_rate: f64,
    #[serde(default)]
    pub voting_power: u64,
}

/// Top validators of one chain. Shared by every wallet on that chain.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorList {
    pub chain_id: String,
    pub validators: Vec<ValidatorSummary>,
}
