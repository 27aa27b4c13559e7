//! Database Connection and Setup
//!
//! Opens the SQLite database, enables foreign keys and runs migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared connection handed to every repository
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    conn: SharedConnection,
}

impl DbState {
    /// Open (or create) a database file and bring its schema up to date
    pub fn open(path: &Path) -> DomainResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, used by tests
    pub fn open_in_memory() -> DomainResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DomainResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> SharedConnection {
        self.conn.clone()
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Store(e.to_string())
    }
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS checklists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            trip_destination TEXT,
            trip_from_date TEXT,
            trip_to_date TEXT,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_checklists (
            user_id INTEGER NOT NULL,
            checklist_id INTEGER NOT NULL REFERENCES checklists(id) ON DELETE CASCADE,
            role TEXT NOT NULL DEFAULT 'owner',
            PRIMARY KEY (user_id, checklist_id)
        );

        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            checklist_id INTEGER NOT NULL REFERENCES checklists(id) ON DELETE CASCADE,
            parent_item_id INTEGER REFERENCES items(id),
            name TEXT NOT NULL DEFAULT '',
            position INTEGER NOT NULL DEFAULT 0,
            is_checked INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_items_sibling_group
            ON items(checklist_id, parent_item_id, position);
        CREATE INDEX IF NOT EXISTS idx_items_parent ON items(parent_item_id);",
    )?;

    Ok(())
}
