/// Command definitions and parsing for the wallet REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

use crate::projector::SortCommand;

/// Names offered by the REPL completer, aliases included.
pub const COMMAND_NAMES: &[&str] = &[
    "list",
    "ls",
    "search",
    "find",
    "sort",
    "select",
    "use",
    "status",
    "nfts",
    "validators",
    "vals",
    "help",
    "exit",
    "quit",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the active wallet and the selectable wallets
    List,
    /// Filter wallets by name or address: search [query]
    Search { query: String },
    /// Reorder the wallet list: sort <name|network> [asc|desc]
    Sort { sort: SortCommand },
    /// Make a wallet active: select <identifier|name>
    Select { wallet: String },
    /// Show the active wallet with balance, NFT and validator counts
    Status,
    /// Show NFTs of the active wallet
    Nfts,
    /// Show top validators of the active wallet's chain
    Validators,
    /// Print help
    Help { command: Option<String> },
    /// Exit
    Exit,
}

impl Command {
    /// Whether this command may change the active wallet.
    pub fn switches_wallet(&self) -> bool {
        matches!(self, Command::Select { .. })
    }
}
