//! SQLite persistence for the access backend.
//!
//! Every entity lives in its own database file and is owned by one [`Store`]:
//! writes are queued and applied by a dedicated worker thread, reads open a
//! short-lived connection of their own.

pub mod access;
pub mod blob;
pub mod credentials;
pub mod db_char;
pub mod perma_limit;
pub mod schema;
pub mod store;
pub mod task;
pub mod timed_limit;

#[cfg(test)]
mod tests;

use std::path::Path;

pub use access::{AccessDb, AccessMap, AccessPatch, AccessRecord};
pub use credentials::{Credential, CredentialLookup, CredentialPatch, CredentialsDb};
pub use db_char::{DbChar, DbCharDb, DbCharPatch, NewDbChar};
pub use perma_limit::{PermaLimit, PermaLimitDb, PermaLimitPatch};
pub use store::{Store, WriteReceipt};
pub use task::WriteTask;
pub use timed_limit::{NewTimedLimit, TimedLimit, TimedLimitDb, TimedLimitPatch, TimedLimitStatus};

/// All entity stores of the service, set up in a fixed order.
#[derive(Clone)]
pub struct Stores {
    pub credentials: CredentialsDb,
    pub perma_limit: PermaLimitDb,
    pub timed_limit: TimedLimitDb,
    pub db_char: DbCharDb,
    pub access: AccessDb,
}

impl Stores {
    /// Create schemas under `dir` and start one write worker per store.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, DbError> {
        let dir = dir.as_ref();
        let stores = Self {
            credentials: CredentialsDb::new(dir),
            perma_limit: PermaLimitDb::new(dir),
            timed_limit: TimedLimitDb::new(dir),
            db_char: DbCharDb::new(dir),
            access: AccessDb::new(dir),
        };
        stores.credentials.set_up()?;
        stores.perma_limit.set_up()?;
        stores.timed_limit.set_up()?;
        stores.db_char.set_up()?;
        stores.access.set_up()?;
        tracing::info!("Stores ready in {}", dir.display());
        Ok(stores)
    }

    /// Block until every write queued so far has been applied or discarded.
    pub fn flush_all(&self) -> Result<(), DbError> {
        self.credentials.store().flush()?;
        self.perma_limit.store().flush()?;
        self.timed_limit.store().flush()?;
        self.db_char.store().flush()?;
        self.access.store().flush()?;
        Ok(())
    }
}

/// Database error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Invalid usage: {0}")]
    Usage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Write worker unavailable: {0}")]
    Worker(String),
}
