use crate::wallet::Wallet;

/// Wallets whose name or address contains `query`, case-insensitively.
/// An empty query keeps every wallet. Input order is preserved.
pub fn filter(wallets: &[Wallet], query: &str) -> Vec<Wallet> {
    if query.is_empty() {
        return wallets.to_vec();
    }
    let needle = query.to_lowercase();
    wallets
        .iter()
        .filter(|w| matches(w, &needle))
        .cloned()
        .collect()
}

fn matches(wallet: &Wallet, needle: &str) -> bool {
    wallet.name.to_lowercase().contains(needle) || wallet.address.to_lowercase().contains(needle)
}
