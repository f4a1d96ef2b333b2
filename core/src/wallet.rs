/// Wallet model: identity, type tag and network of a known wallet.
///
/// Wallets are owned by the wallet management subsystem and only observed
/// here. Nothing in this crate mutates a `Wallet` after it was handed in.
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const NORMAL_WALLET_TYPE: &str = "normal";
pub const LEDGER_WALLET_TYPE: &str = "ledger";

pub const MAINNET_NETWORK: &str = "MAINNET";
pub const TESTNET_NETWORK: &str = "TESTNET";
pub const TESTNET_CROESEID_3_NETWORK: &str = "TESTNET CROESEID 3";

/// Stable, unique wallet identifier.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct WalletId(String);

impl WalletId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Whether the wallet is a software wallet, a Ledger device, or a legacy
/// wallet created before the type tag existed.
///
/// `Legacy` carries the same capabilities as `Normal`; it only exists so an
/// absent or malformed tag never has to be guessed at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum WalletType {
    Normal,
    Ledger,
    #[default]
    Legacy,
}

impl WalletType {
    /// Classify a raw type tag. Absent, too-short and unknown tags map to
    /// `Legacy` instead of failing.
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag.map(str::trim) else {
            return Self::Legacy;
        };
        if tag.len() <= 2 {
            return Self::Legacy;
        }
        match tag.to_lowercase().as_str() {
            NORMAL_WALLET_TYPE => Self::Normal,
            LEDGER_WALLET_TYPE => Self::Ledger,
            _ => Self::Legacy,
        }
    }

    pub fn is_hardware(self) -> bool {
        self == Self::Ledger
    }

    pub fn is_legacy(&self) -> bool {
        *self == Self::Legacy
    }

    /// Label shown in the wallet table. Legacy wallets show the plain
    /// normal-wallet tag.
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Ledger => "Ledger",
            Self::Legacy => NORMAL_WALLET_TYPE,
        }
    }

    fn tag(self) -> Option<&'static str> {
        match self {
            Self::Normal => Some(NORMAL_WALLET_TYPE),
            Self::Ledger => Some(LEDGER_WALLET_TYPE),
            Self::Legacy => None,
        }
    }
}

impl std::fmt::Display for WalletType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for WalletType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.tag() {
            Some(tag) => serializer.serialize_str(tag),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for WalletType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_tag(raw.as_deref()))
    }
}

/// Network a wallet is bound to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: String,
}

/// Display classification of a network name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NetworkTag {
    Mainnet,
    Testnet,
    Other,
}

impl NetworkTag {
    pub fn classify(network_name: &str) -> Self {
        let name = network_name.trim();
        if name.eq_ignore_ascii_case(MAINNET_NETWORK) {
            Self::Mainnet
        } else if name.eq_ignore_ascii_case(TESTNET_NETWORK)
            || name.eq_ignore_ascii_case(TESTNET_CROESEID_3_NETWORK)
        {
            Self::Testnet
        } else {
            Self::Other
        }
    }

    /// Status color used when rendering the tag.
    pub fn color(self) -> &'static str {
        match self {
            Self::Mainnet => "success",
            Self::Testnet => "error",
            Self::Other => "default",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub identifier: WalletId,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "WalletType::is_legacy")]
    pub wallet_type: WalletType,
    #[serde(rename = "config")]
    pub network: NetworkConfig,
}

impl Wallet {
    pub fn network_tag(&self) -> NetworkTag {
        NetworkTag::classify(&self.network.name)
    }

    pub fn is_hardware(&self) -> bool {
        self.wallet_type.is_hardware()
    }

    /// Short address for prompts (first 4 chars after the `0x` prefix).
    pub fn short_address(&self) -> String {
        let full = self.address.strip_prefix("0x").unwrap_or(&self.address);
        full.chars().take(4).collect()
    }
}
