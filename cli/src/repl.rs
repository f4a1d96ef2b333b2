use crate::Cli;
/// REPL shell: Reedline-based interactive wallet browser.
use anyhow::Result;
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use wallet_switch_core::commands::{Command, COMMAND_NAMES};
use wallet_switch_core::WalletPage;

fn prompt_for(page: &WalletPage) -> DefaultPrompt {
    let label = match page.active_wallet() {
        Some(w) => format!("[wallet {}]", w.short_address()),
        None => "[wallet -]".to_string(),
    };
    DefaultPrompt::new(
        DefaultPromptSegment::Basic(label),
        DefaultPromptSegment::Empty,
    )
}

pub async fn run_repl(cli: &Cli, page: &mut WalletPage) -> Result<()> {
    println!("Wallet Switch v{}", env!("CARGO_PKG_VERSION"));
    println!("{} wallet(s) loaded.", page.wallets().len());
    println!();
    match Command::List.execute(page, cli.json).await {
        Ok(table) => println!("{table}"),
        Err(e) => eprintln!("Error: {e}"),
    }
    println!();
    println!("Type 'help' for a list of commands.");
    println!();

    let mut prompt = prompt_for(page);

    let commands: Vec<String> = COMMAND_NAMES.iter().map(|c| c.to_string()).collect();
    let completer = Box::new(DefaultCompleter::new(commands));
    let mut line_editor = Reedline::create().with_completer(completer);

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match Command::parse(line) {
                    Ok(Command::Exit) => {
                        println!("Goodbye.");
                        break;
                    }
                    Ok(cmd) => {
                        match cmd.execute(page, cli.json).await {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            Err(e) => eprintln!("Error: {e}"),
                        }
                        if cmd.switches_wallet() {
                            prompt = prompt_for(page);
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        }
    }

    Ok(())
}
