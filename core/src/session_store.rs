/// SQLite-backed store for the committed active session.
///
/// Holds at most one row. The session is stored as JSON next to its wallet id
/// and commit timestamp so the id can be inspected without decoding.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::session::{Session, DEFAULT_CURRENCY};

pub struct SessionStore {
    conn: Connection,
}

/// Default DB location: platform data directory + `wallet-switch/session.db`
/// (Linux: `~/.local/share`, macOS: `~/Library/Application Support`)
fn default_db_path() -> Result<PathBuf> {
    Ok(crate::data_dir()?.join("session.db"))
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

impl SessionStore {
    /// Open (or create) the session store in the default data directory.
    pub fn open() -> Result<Self> {
        Self::open_at(&default_db_path()?)
    }

    /// Open (or create) the session store at a specific path.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create session directory")?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
            }
        }
        let conn = Connection::open(path).context("Failed to open session database")?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS active_session (
                slot            INTEGER PRIMARY KEY CHECK (slot = 0),
                wallet_id       TEXT    NOT NULL,
                session         TEXT    NOT NULL,
                committed_at    INTEGER NOT NULL
            );",
            )
            .context("Failed to initialize session schema")?;
        Ok(())
    }

    /// Replace the active session. Fills in the default currency when the
    /// candidate has none and stamps the commit time. Returns what was stored.
    pub fn commit(&self, candidate: Session) -> Result<Session> {
        let mut session = candidate;
        if session.currency.trim().is_empty() {
            session.currency = DEFAULT_CURRENCY.to_string();
        }
        let committed_at = now_millis();
        session.committed_at = Some(committed_at);

        let json = serde_json::to_string(&session).context("Failed to serialize session")?;
        self.conn
            .execute(
                "INSERT INTO active_session (slot, wallet_id, session, committed_at)
             VALUES (0, ?1, ?2, ?3)
             ON CONFLICT (slot) DO UPDATE SET
                 wallet_id = excluded.wallet_id,
                 session = excluded.session,
                 committed_at = excluded.committed_at",
                params![session.wallet_id().as_str(), json, committed_at],
            )
            .context("Failed to write active session")?;
        Ok(session)
    }

    /// The committed session, if any.
    pub fn load(&self) -> Result<Option<Session>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT session FROM active_session WHERE slot = 0",
                [],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query active session")?;

        match json {
            Some(json) => {
                let session = serde_json::from_str(&json)
                    .context("Failed to parse stored session. Database may be corrupt.")?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// Forget the active session.
    pub fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM active_session", [])
            .context("Failed to clear active session")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{NetworkConfig, Wallet, WalletId, WalletType};

    fn wallet(id: &str) -> Wallet {
        Wallet {
            identifier: WalletId::new(id),
            name: format!("wallet {id}"),
            address: format!("0x{id}"),
            wallet_type: WalletType::Normal,
            network: NetworkConfig {
                name: "TESTNET".to_string(),
                chain_id: "testnet-croeseid-4".to_string(),
            },
        }
    }

    #[test]
    fn empty_store_has_no_session() {
        let store = SessionStore::open_in_memory().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn commit_and_load() {
        let store = SessionStore::open_in_memory().unwrap();
        let committed = store.commit(Session::new(wallet("w1"))).unwrap();
        assert!(committed.committed_at.is_some());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, committed);
        assert_eq!(loaded.wallet_id().as_str(), "w1");
    }

    #[test]
    fn commit_replaces_previous_session() {
        let store = SessionStore::open_in_memory().unwrap();
        store.commit(Session::new(wallet("w1"))).unwrap();
        store.commit(Session::new(wallet("w2"))).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.wallet_id().as_str(), "w2");
    }

    #[test]
    fn commit_fills_missing_currency() {
        let store = SessionStore::open_in_memory().unwrap();
        let mut candidate = Session::new(wallet("w1"));
        candidate.currency = String::new();

        let committed = store.commit(candidate).unwrap();
        assert_eq!(committed.currency, DEFAULT_CURRENCY);
    }

    #[test]
    fn clear_forgets_session() {
        let store = SessionStore::open_in_memory().unwrap();
        store.commit(Session::new(wallet("w1"))).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.db");

        {
            let store = SessionStore::open_at(&path).unwrap();
            store.commit(Session::new(wallet("w2"))).unwrap();
        }

        let reopened = SessionStore::open_at(&path).unwrap();
        let loaded = reopened.load().unwrap().unwrap();
        assert_eq!(loaded.wallet_id().as_str(), "w2");
    }
}
