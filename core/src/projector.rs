/// Wallet list projection: the rows of the wallet selection table.
///
/// The active wallet is never part of the projection; it is shown in the
/// table header instead.
use std::cmp::Ordering;

use crate::wallet::{Wallet, WalletId};

/// One row of the selection table.
///
/// `key` is the wallet's position in the projector's input and changes
/// whenever the input does. Select by `wallet.identifier`, never by key.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub key: usize,
    pub wallet: Wallet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortCommand {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortCommand {
    pub const fn ascending(key: SortKey) -> Self {
        Self {
            key,
            order: SortOrder::Ascending,
        }
    }

    fn compare(&self, a: &Wallet, b: &Wallet) -> Ordering {
        let ord = match self.key {
            SortKey::Name => cmp_ignore_case(&a.name, &b.name),
            SortKey::Network => cmp_ignore_case(&a.network.name, &b.network.name),
        };
        match self.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

impl Default for SortCommand {
    fn default() -> Self {
        Self::ascending(SortKey::Name)
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Project `wallets` into table rows, dropping the active wallet.
///
/// Rows keep input order unless `sort` is given; sorting is stable, so ties
/// keep input order too.
pub fn project(
    wallets: &[Wallet],
    active: Option<&WalletId>,
    sort: Option<SortCommand>,
) -> Vec<DisplayRow> {
    let mut rows: Vec<DisplayRow> = wallets
        .iter()
        .enumerate()
        .filter(|(_, w)| Some(&w.identifier) != active)
        .map(|(key, w)| DisplayRow {
            key,
            wallet: w.clone(),
        })
        .collect();

    if let Some(sort) = sort {
        rows.sort_by(|a, b| sort.compare(&a.wallet, &b.wallet));
    }
    rows
}
