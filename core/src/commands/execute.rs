use anyhow::{bail, Result};

use super::help::help_text;
use super::Command;
use crate::display;
use crate::page::WalletPage;

impl Command {
    /// Execute a command against the page and return the output string.
    pub async fn execute(&self, page: &mut WalletPage, json_output: bool) -> Result<String> {
        page.pump_events();
        match self {
            Command::List => Ok(list(page, json_output)),

            Command::Search { query } => {
                page.search(query);
                Ok(list(page, json_output))
            }

            Command::Sort { sort } => {
                page.sort_by(*sort);
                Ok(list(page, json_output))
            }

            Command::Select { wallet } => {
                let Some(target) = page.find_wallet(wallet).map(|w| w.identifier.clone()) else {
                    bail!("No wallet named '{wallet}'. Use 'list' to see wallet identifiers.");
                };
                if page.store().active_wallet_id().as_ref() == Some(&target) {
                    bail!("Wallet '{wallet}' is already active.");
                }
                match page.select(&target).await {
                    Ok(outcome) => {
                        let notice = page
                            .take_notice()
                            .map(|n| n.to_string())
                            .unwrap_or_default();
                        if json_output {
                            Ok(serde_json::json!({
                                "active": outcome.session.wallet_id(),
                                "previous": outcome.previous,
                                "committed_at": outcome.session.committed_at,
                            })
                            .to_string())
                        } else {
                            Ok(format!(
                                "{notice}\n{}",
                                display::format_wallet_table(
                                    page.active_wallet().as_ref(),
                                    page.rows()
                                )
                            ))
                        }
                    }
                    Err(e) => match page.take_notice() {
                        Some(notice) => bail!("{notice}"),
                        None => Err(e.into()),
                    },
                }
            }

            Command::Status => {
                let state = page.store().snapshot();
                if json_output {
                    Ok(display::format_status_json(&state, page.is_loading()))
                } else {
                    Ok(display::format_status(&state, page.is_loading()))
                }
            }

            Command::Nfts => {
                let Some(nfts) = page.store().nfts() else {
                    bail!("No active wallet. Use 'select <wallet>' first.");
                };
                if json_output {
                    Ok(serde_json::to_string_pretty(&nfts.items)?)
                } else {
                    Ok(display::format_nfts(&nfts))
                }
            }

            Command::Validators => {
                let Some(validators) = page.store().validators() else {
                    bail!("No validators loaded. Use 'select <wallet>' first.");
                };
                if json_output {
                    Ok(serde_json::to_string_pretty(&validators)?)
                } else {
                    Ok(display::format_validators(&validators))
                }
            }

            Command::Help { command } => Ok(help_text(command.as_deref())),

            Command::Exit => Ok(String::new()),
        }
    }
}

fn list(page: &WalletPage, json_output: bool) -> String {
    let active = page.active_wallet();
    if json_output {
        display::format_wallet_table_json(active.as_ref(), page.rows())
    } else {
        display::format_wallet_table(active.as_ref(), page.rows())
    }
}
