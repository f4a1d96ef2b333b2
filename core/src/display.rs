/// Output formatting for the wallet table, the active wallet header and the
/// derived caches.
///
/// Balances are integers in base units; `decimals` places the point.
use crate::backend::{NftList, ValidatorList, WalletAsset};
use crate::projector::DisplayRow;
use crate::store::DerivedState;
use crate::wallet::{NetworkTag, Wallet};

/// Convert base units to a decimal string.
/// Examples: (150_000_000, 8) -> "1.50000000", (42, 0) -> "42"
#[must_use]
pub fn format_amount(balance: u128, decimals: u8) -> String {
    if decimals == 0 {
        return balance.to_string();
    }
    let width = usize::from(decimals);
    let Some(scale) = 10u128.checked_pow(u32::from(decimals)) else {
        return format!("0.{balance:0>width$}");
    };
    let whole = balance / scale;
    let frac = balance % scale;
    format!("{whole}.{frac:0width$}")
}

/// Format an asset balance with its symbol, and its fiat value when a price
/// is known.
#[must_use]
pub fn format_asset(asset: &WalletAsset, currency: &str) -> String {
    let amount = format_amount(asset.balance, asset.decimals);
    match asset.price {
        Some(price) => {
            let units = asset.balance as f64 / 10f64.powi(i32::from(asset.decimals));
            format!("{amount} {} (~{:.2} {currency})", asset.symbol, units * price)
        }
        None => format!("{amount} {}", asset.symbol),
    }
}

fn network_label(wallet: &Wallet) -> String {
    match wallet.network_tag() {
        NetworkTag::Mainnet | NetworkTag::Testnet => wallet.network.name.to_uppercase(),
        NetworkTag::Other => wallet.network.name.clone(),
    }
}

/// One-line summary of the active wallet.
#[must_use]
pub fn format_header(active: Option<&Wallet>) -> String {
    match active {
        Some(w) => format!(
            "Active: {}  {}  {}  [{}]",
            w.name,
            w.address,
            w.wallet_type.label(),
            network_label(w),
        ),
        None => "Active: none".to_string(),
    }
}

/// Format the selectable wallets under the active wallet header.
#[must_use]
pub fn format_wallet_table(active: Option<&Wallet>, rows: &[DisplayRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_header(active));
    if rows.is_empty() {
        lines.push("No other wallets match.".to_string());
        return lines.join("\n");
    }
    let name_width = rows
        .iter()
        .map(|r| r.wallet.name.chars().count())
        .max()
        .unwrap_or(0);
    for row in rows {
        let w = &row.wallet;
        lines.push(format!(
            "  {:>3}  {:<name_width$}  {}  {:<6}  [{}]",
            row.key,
            w.name,
            w.address,
            w.wallet_type.label(),
            network_label(w),
        ));
    }
    lines.join("\n")
}

/// Format the active wallet and every derived cache.
#[must_use]
pub fn format_status(state: &DerivedState, loading: bool) -> String {
    let Some(session) = &state.session else {
        return "No active wallet. Use 'select <wallet>' to pick one.".to_string();
    };
    let mut lines = vec![format!("  Wallet:     {}", session.wallet.name)];
    lines.push(format!("  Address:    {}", session.wallet.address));
    lines.push(format!("  Type:       {}", session.wallet.wallet_type.label()));
    lines.push(format!(
        "  Network:    {} ({})",
        session.wallet.network.name, session.wallet.network.chain_id
    ));
    let balance = state
        .asset
        .as_ref()
        .map(|a| format_asset(a, &session.currency))
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!("  Balance:    {balance}"));
    let nfts = state
        .nfts
        .as_ref()
        .map(|n| n.len().to_string())
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!("  NFTs:       {nfts}"));
    let validators = state
        .validators
        .as_ref()
        .map(|v| v.validators.len().to_string())
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!("  Validators: {validators}"));
    if loading {
        lines.push("  (switch in progress)".to_string());
    }
    lines.join("\n")
}

#[must_use]
pub fn format_nfts(nfts: &NftList) -> String {
    if nfts.is_empty() {
        return "No NFTs.".to_string();
    }
    nfts.items
        .iter()
        .map(|n| {
            let name = n.name.as_deref().unwrap_or("-");
            match &n.denom_id {
                Some(denom) => format!("  {}  {denom}  {name}", n.token_id),
                None => format!("  {}  {name}", n.token_id),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn format_validators(list: &ValidatorList) -> String {
    if list.validators.is_empty() {
        return format!("No validators on {}.", list.chain_id);
    }
    list.validators
        .iter()
        .enumerate()
        .map(|(i, v)| {
            format!(
                "  {:>2}. {}  {}  commission {:.2}%  power {}",
                i + 1,
                v.moniker,
                v.operator_address,
                v.commission_rate * 100.0,
                v.voting_power,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn wallet_json(w: &Wallet) -> serde_json::Value {
    serde_json::json!({
        "identifier": w.identifier,
        "name": w.name,
        "address": w.address,
        "type": w.wallet_type.label(),
        "network": w.network.name,
        "chain_id": w.network.chain_id,
        "network_color": w.network_tag().color(),
    })
}

/// Format the wallet table as JSON.
#[must_use]
pub fn format_wallet_table_json(active: Option<&Wallet>, rows: &[DisplayRow]) -> String {
    let rows: Vec<_> = rows
        .iter()
        .map(|r| {
            let mut value = wallet_json(&r.wallet);
            value["key"] = serde_json::json!(r.key);
            value
        })
        .collect();
    serde_json::json!({
        "active": active.map(wallet_json),
        "wallets": rows,
    })
    .to_string()
}

/// Format the active wallet and caches as JSON.
#[must_use]
pub fn format_status_json(state: &DerivedState, loading: bool) -> String {
    serde_json::json!({
        "active": state.session.as_ref().map(|s| wallet_json(&s.wallet)),
        "currency": state.session.as_ref().map(|s| s.currency.as_str()),
        "committed_at": state.session.as_ref().and_then(|s| s.committed_at),
        "asset": state.asset.as_ref().map(|a| serde_json::json!({
            "symbol": a.symbol,
            "balance": a.balance.to_string(),
            "balance_display": format_amount(a.balance, a.decimals),
            "price": a.price,
        })),
        "nft_count": state.nfts.as_ref().map(NftList::len),
        "validator_count": state.validators.as_ref().map(|v| v.validators.len()),
        "loading": loading,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{NftSummary, ValidatorSummary};
    use crate::session::Session;
    use crate::wallet::{NetworkConfig, WalletId, WalletType};

    fn wallet(id: &str, name: &str, network: &str) -> Wallet {
        Wallet {
            identifier: WalletId::new(id),
            name: name.to_string(),
            address: format!("0x{id}"),
            wallet_type: WalletType::Legacy,
            network: NetworkConfig {
                name: network.to_string(),
                chain_id: "chain-1".to_string(),
            },
        }
    }

    #[test]
    fn amount_places_decimal_point() {
        assert_eq!(format_amount(150_000_000, 8), "1.50000000");
        assert_eq!(format_amount(0, 8), "0.00000000");
        assert_eq!(format_amount(5, 2), "0.05");
        assert_eq!(format_amount(42, 0), "42");
    }

    #[test]
    fn amount_handles_balances_past_u64() {
        assert_eq!(
            format_amount(u128::from(u64::MAX), 18),
            "18.446744073709551615"
        );
        assert_eq!(
            format_amount(10u128.pow(24) + 5, 18),
            "1000000.000000000000000005"
        );
    }

    #[test]
    fn asset_with_price_shows_fiat() {
        let mut asset = WalletAsset::empty(WalletId::new("w1"), "CRO", 8);
        asset.balance = 200_000_000;
        asset.price = Some(0.1);
        assert_eq!(format_asset(&asset, "USD"), "2.00000000 CRO (~0.20 USD)");
        asset.price = None;
        assert_eq!(format_asset(&asset, "USD"), "2.00000000 CRO");
    }

    #[test]
    fn header_shows_legacy_as_normal() {
        let w = wallet("w1", "Alice", "mainnet");
        let header = format_header(Some(&w));
        assert!(header.contains("Alice"));
        assert!(header.contains("normal"));
        assert!(header.contains("[MAINNET]"));
        assert_eq!(format_header(None), "Active: none");
    }

    #[test]
    fn table_lists_row_keys() {
        let rows = vec![
            DisplayRow {
                key: 1,
                wallet: wallet("w2", "Bob", "TESTNET"),
            },
            DisplayRow {
                key: 2,
                wallet: wallet("w3", "Carol", "devnet-7"),
            },
        ];
        let table = format_wallet_table(None, &rows);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].trim_start().starts_with("1  Bob"));
        assert!(lines[2].contains("[devnet-7]"));
    }

    #[test]
    fn empty_table_says_so() {
        assert!(format_wallet_table(None, &[]).contains("No other wallets"));
    }

    #[test]
    fn status_without_session() {
        assert!(format_status(&DerivedState::default(), false).contains("No active wallet"));
    }

    #[test]
    fn status_with_caches() {
        let state = DerivedState {
            session: Some(Session::new(wallet("w1", "Alice", "MAINNET"))),
            asset: Some(WalletAsset::empty(WalletId::new("w1"), "CRO", 8)),
            nfts: Some(NftList {
                wallet_id: WalletId::new("w1"),
                items: vec![NftSummary {
                    token_id: "t1".into(),
                    denom_id: None,
                    name: None,
                    description: None,
                    image_url: None,
                }],
            }),
            validators: None,
        };
        let text = format_status(&state, true);
        assert!(text.contains("0.00000000 CRO"));
        assert!(text.contains("NFTs:       1"));
        assert!(text.contains("Validators: -"));
        assert!(text.contains("switch in progress"));
    }

    #[test]
    fn validators_numbered() {
        let list = ValidatorList {
            chain_id: "chain-1".into(),
            validators: vec![ValidatorSummary {
                operator_address: "val1".into(),
                moniker: "One".into(),
                commission_rate: 0.05,
                voting_power: 10,
            }],
        };
        let text = format_validators(&list);
        assert!(text.contains(" 1. One"));
        assert!(text.contains("5.00%"));
        let empty = ValidatorList {
            chain_id: "chain-1".into(),
            validators: vec![],
        };
        assert_eq!(format_validators(&empty), "No validators on chain-1.");
    }

    #[test]
    fn table_json_has_keys() {
        let rows = vec![DisplayRow {
            key: 3,
            wallet: wallet("w2", "Bob", "MAINNET"),
        }];
        let json: serde_json::Value =
            serde_json::from_str(&format_wallet_table_json(None, &rows)).unwrap();
        assert!(json["active"].is_null());
        assert_eq!(json["wallets"][0]["key"], 3);
        assert_eq!(json["wallets"][0]["network_color"], "success");
        assert_eq!(json["wallets"][0]["type"], "normal");
    }

    #[test]
    fn status_json_keeps_large_balance_exact() {
        let mut asset = WalletAsset::empty(WalletId::new("w1"), "CRO", 18);
        asset.balance = 10u128.pow(24) + 5;
        let state = DerivedState {
            session: Some(Session::new(wallet("w1", "Alice", "MAINNET"))),
            asset: Some(asset),
            nfts: None,
            validators: None,
        };
        let json: serde_json::Value =
            serde_json::from_str(&format_status_json(&state, false)).unwrap();
        assert_eq!(json["asset"]["balance"], "1000000000000000000000005");
        assert_eq!(
            json["asset"]["balance_display"],
            "1000000.000000000000000005"
        );
    }

    #[test]
    fn status_json_empty() {
        let json: serde_json::Value =
            serde_json::from_str(&format_status_json(&DerivedState::default(), false)).unwrap();
        assert!(json["active"].is_null());
        assert_eq!(json["loading"], false);
    }
}
