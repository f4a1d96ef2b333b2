#[must_use]
pub fn help_text(command: Option<&str>) -> String {
    match command {
        Some("list") | Some("ls") => {
            "list\n  Show the active wallet and every other wallet matching the current search.\n  The active wallet is never listed as selectable.\n  Alias: ls".to_string()
        }
        Some("search") | Some("find") => {
            "search [query]\n  Keep only wallets whose name or address contains the query (case-insensitive).\n  Without a query the filter is cleared.\n  Example: search bob\n  Alias: find".to_string()
        }
        Some("sort") => {
            "sort <name|network> [asc|desc]\n  Reorder the wallet list. Default: name ascending.\n  Example: sort network desc".to_string()
        }
        Some("select") | Some("use") => {
            "select <identifier|name>\n  Make a wallet active. Commits the session, then refreshes\n  balance, NFTs, account state and validators.\n  Example: select w2\n  Alias: use".to_string()
        }
        Some("status") => {
            "status\n  Show the active wallet with its balance, NFT count and validator count.".to_string()
        }
        Some("nfts") => "nfts\n  Show NFTs held by the active wallet.".to_string(),
        Some("validators") | Some("vals") => {
            "validators\n  Show the top validators of the active wallet's chain.\n  Alias: vals".to_string()
        }
        Some("exit") | Some("quit") | Some("q") => {
            "exit\n  Exit.\n  Aliases: quit, q".to_string()
        }
        Some(other) => format!("Unknown command: '{other}'. Type 'help' for a list."),
        None => {
            "Available commands:\n\
             \n\
             \x20 list             Show active and selectable wallets\n\
             \x20 search [query]   Filter wallets by name or address\n\
             \x20 sort             Sort by name or network\n\
             \x20 select           Make a wallet active\n\
             \x20 status           Show the active wallet and its data\n\
             \x20 nfts             Show NFTs of the active wallet\n\
             \x20 validators       Show top validators\n\
             \x20 help [cmd]       Show help for a command\n\
             \x20 exit             Exit\n\
             \n\
             Type 'help <command>' for detailed help on a specific command."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_text_general() {
        let text = help_text(None);
        assert!(text.contains("select"));
        assert!(text.contains("search"));
        assert!(text.contains("validators"));
    }

    #[test]
    fn help_text_specific() {
        let text = help_text(Some("sort"));
        assert!(text.contains("<name|network>"));
        assert_eq!(help_text(Some("use")), help_text(Some("select")));
    }

    #[test]
    fn help_text_unknown() {
        let text = help_text(Some("transfer"));
        assert!(text.contains("Unknown command"));
    }
}
