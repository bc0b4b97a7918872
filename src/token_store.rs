use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use log::warn;
use rusqlite::{params, Connection};

const TOKEN_KEY: &str = "auth_token";

/// Credential storage injected into the API client.
///
/// Reads and writes are not coordinated across concurrent operations;
/// overlapping logins/logouts resolve last-write-wins.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// Volatile store for tests and short-lived sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn set(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.lock().unwrap() = None;
    }
}

/// SQLite-backed store; the token survives process restarts. Storage
/// failures are logged and swallowed so a broken disk never turns into a
/// failed API call.
pub struct SqliteTokenStore {
    conn: Mutex<Connection>,
}

impl SqliteTokenStore {
    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS client_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl TokenStore for SqliteTokenStore {
    fn get(&self) -> Option<String> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = match conn.prepare("SELECT value FROM client_settings WHERE key = ?1") {
            Ok(stmt) => stmt,
            Err(e) => {
                warn!("Failed to read {}: {}", TOKEN_KEY, e);
                return None;
            }
        };

        match stmt.query_row(params![TOKEN_KEY], |row| row.get::<_, String>(0)) {
            Ok(value) => Some(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                warn!("Failed to read {}: {}", TOKEN_KEY, e);
                None
            }
        }
    }

    fn set(&self, token: &str) {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        if let Err(e) = conn.execute(
            "INSERT INTO client_settings (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![TOKEN_KEY, token, now],
        ) {
            warn!("Failed to store {}: {}", TOKEN_KEY, e);
        }
    }

    fn clear(&self) {
        let conn = self.conn.lock().unwrap();

        if let Err(e) = conn.execute(
            "DELETE FROM client_settings WHERE key = ?1",
            params![TOKEN_KEY],
        ) {
            warn!("Failed to clear {}: {}", TOKEN_KEY, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(), None);

        store.set("abc123");
        assert_eq!(store.get(), Some("abc123".to_string()));

        store.set("def456");
        assert_eq!(store.get(), Some("def456".to_string()));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn sqlite_store_round_trip() {
        let store = SqliteTokenStore::open_in_memory().unwrap();
        assert_eq!(store.get(), None);

        store.set("abc123");
        assert_eq!(store.get(), Some("abc123".to_string()));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn sqlite_store_persists_across_reopen() {
        let path = std::env::temp_dir().join(format!(
            "token_store_test_{}_{}.db",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));

        {
            let store = SqliteTokenStore::open(&path).unwrap();
            store.set("persisted-token");
        }

        let store = SqliteTokenStore::open(&path).unwrap();
        assert_eq!(store.get(), Some("persisted-token".to_string()));

        drop(store);
        let _ = std::fs::remove_file(&path);
    }
}
