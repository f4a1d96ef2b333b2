mod repl;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wallet_switch_core::commands::Command;
use wallet_switch_core::{
    ActiveWalletSwitcher, DerivedStateStore, LocalBackend, SessionStore, SnapshotSource,
    SwitchTimeouts, TracingAnalytics, WalletPage,
};

#[derive(Parser)]
#[command(
    name = "wallet-switch",
    about = "Browse wallets and switch the active one",
    version
)]
pub(crate) struct Cli {
    /// Wallet snapshot JSON (default: <data dir>/wallets.json)
    #[arg(long, env = "WALLET_SWITCH_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Data directory for the session database (default: platform data dir)
    #[arg(long, env = "WALLET_SWITCH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Run a single command and exit
    #[arg(long)]
    cmd: Option<String>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,

    /// Timeout in seconds for each backend call of a switch
    #[arg(
        long,
        env = "WALLET_SWITCH_STEP_TIMEOUT",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    step_timeout: u64,

    /// Timeout in seconds for the account sync step
    #[arg(
        long,
        env = "WALLET_SWITCH_SYNC_TIMEOUT",
        default_value_t = 120,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    sync_timeout: u64,

    /// Log switch steps to stderr (same as RUST_LOG=debug)
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => wallet_switch_core::data_dir(),
        }
    }

    fn snapshot_path(&self) -> Result<PathBuf> {
        match &self.snapshot {
            Some(path) => Ok(path.clone()),
            None => Ok(self.data_dir()?.join("wallets.json")),
        }
    }

    fn timeouts(&self) -> SwitchTimeouts {
        SwitchTimeouts {
            step: Duration::from_secs(self.step_timeout),
            sync: Duration::from_secs(self.sync_timeout),
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut page = open_page(&cli).await?;

    if let Some(cmd_str) = &cli.cmd {
        // One-shot mode
        run_oneshot(&cli, &mut page, cmd_str).await
    } else {
        // REPL mode
        repl::run_repl(&cli, &mut page).await
    }
}

/// Load the wallet snapshot, open the session store and restore the last
/// committed wallet.
async fn open_page(cli: &Cli) -> Result<WalletPage> {
    let snapshot_path = cli.snapshot_path()?;
    if !snapshot_path.exists() {
        bail!(
            "Wallet snapshot not found: {}. Pass --snapshot or set WALLET_SWITCH_SNAPSHOT.",
            snapshot_path.display()
        );
    }
    let source = SnapshotSource::load(&snapshot_path)?;
    let wallets = source.wallets().to_vec();
    info!(path = %snapshot_path.display(), wallets = wallets.len(), "snapshot loaded");

    let store = match &cli.data_dir {
        Some(dir) => {
            let db_path = dir.join("session.db");
            SessionStore::open_at(&db_path).with_context(|| {
                format!("Failed to open session store at {}", db_path.display())
            })?
        }
        None => SessionStore::open()?,
    };
    let backend = Arc::new(LocalBackend::new(store, Arc::new(source)));

    let switcher = Arc::new(
        ActiveWalletSwitcher::new(backend.clone(), Arc::new(DerivedStateStore::new()))
            .with_timeouts(cli.timeouts()),
    );
    let mut page = WalletPage::new(switcher, Arc::new(TracingAnalytics), wallets);

    if let Some(session) = backend.stored_session().await? {
        let wallet_id = session.wallet_id().clone();
        if page.find_wallet(wallet_id.as_str()).is_some() {
            if let Err(e) = page.select(&wallet_id).await {
                warn!(wallet = %wallet_id, error = %e, "could not restore last active wallet");
            }
            page.take_notice();
        } else {
            warn!(wallet = %wallet_id, "last active wallet is no longer in the snapshot");
        }
    }

    page.mount();
    Ok(page)
}

async fn run_oneshot(cli: &Cli, page: &mut WalletPage, cmd_str: &str) -> Result<()> {
    let command = Command::parse(cmd_str)?;
    if command == Command::Exit {
        return Ok(());
    }

    let output = command.execute(page, cli.json).await?;
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
