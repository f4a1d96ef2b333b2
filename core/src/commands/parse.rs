use anyhow::{bail, Result};

use super::Command;
use crate::projector::{SortCommand, SortKey, SortOrder};

impl Command {
    /// Parse a command from a raw input string.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (input.to_lowercase(), ""),
        };
        let arg = (!rest.is_empty()).then_some(rest);

        match cmd.as_str() {
            "list" | "ls" => Ok(Command::List),

            "search" | "find" => Ok(Command::Search {
                query: rest.to_string(),
            }),

            "sort" => {
                let Some(arg) = arg else {
                    bail!("Missing sort key. Usage: sort <name|network> [asc|desc]");
                };
                Ok(Command::Sort {
                    sort: parse_sort(arg)?,
                })
            }

            "select" | "use" => {
                let Some(wallet) = arg else {
                    bail!("Missing wallet. Usage: select <identifier|name>");
                };
                Ok(Command::Select {
                    wallet: wallet.to_string(),
                })
            }

            "status" => Ok(Command::Status),

            "nfts" => Ok(Command::Nfts),

            "validators" | "vals" => Ok(Command::Validators),

            "help" | "h" | "?" => Ok(Command::Help {
                command: arg.map(|s| s.to_lowercase()),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        }
    }
}

fn parse_sort(arg: &str) -> Result<SortCommand> {
    let mut words = arg.split_whitespace();
    let key = match words.next().map(str::to_lowercase).as_deref() {
        Some("name") => SortKey::Name,
        Some("network") | Some("net") => SortKey::Network,
        Some(other) => bail!("Unknown sort key '{other}'. Use 'name' or 'network'."),
        None => bail!("Missing sort key. Usage: sort <name|network> [asc|desc]"),
    };
    let order = match words.next().map(str::to_lowercase).as_deref() {
        None | Some("asc") | Some("ascending") => SortOrder::Ascending,
        Some("desc") | Some("descending") => SortOrder::Descending,
        Some(other) => bail!("Unknown sort order '{other}'. Use 'asc' or 'desc'."),
    };
    if words.next().is_some() {
        bail!("Too many arguments. Usage: sort <name|network> [asc|desc]");
    }
    Ok(SortCommand { key, order })
}
