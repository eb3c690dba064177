//! In-memory ledger backend used by tests and dry runs

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::{Grid, LedgerRepository, LedgerStoreError, LedgerStoreResult};

#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    tables: RwLock<HashMap<String, Grid>>,
    offline: AtomicBool,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a table, replacing whatever it held
    #[must_use]
    pub fn with_table(self, table: impl Into<String>, grid: Grid) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(table.into(), grid);
        }
        self
    }

    /// While offline every load and persist fails with `Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Current contents of a table, if it was ever persisted or seeded
    pub fn snapshot(&self, table: &str) -> Option<Grid> {
        self.tables.read().ok()?.get(table).cloned()
    }

    fn check_online(&self) -> LedgerStoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(LedgerStoreError::Unavailable {
                reason: "in-memory store is offline".to_string(),
            });
        }
        Ok(())
    }

    fn poisoned() -> LedgerStoreError {
        LedgerStoreError::Unavailable {
            reason: "in-memory store lock poisoned".to_string(),
        }
    }
}

impl LedgerRepository for InMemoryLedgerRepository {
    fn load(&self, table: &str) -> LedgerStoreResult<Grid> {
        self.check_online()?;
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        Ok(tables.get(table).cloned().unwrap_or_default())
    }

    fn persist(&self, table: &str, grid: &Grid) -> LedgerStoreResult<()> {
        self.check_online()?;
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        tables.insert(table.to_string(), grid.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_table_is_empty() {
        let repo = InMemoryLedgerRepository::new();
        assert!(repo.load("amazon_prices").unwrap().is_empty());
        assert!(repo.snapshot("amazon_prices").is_none());
    }

    #[test]
    fn offline_store_fails_both_ways() {
        let repo = InMemoryLedgerRepository::new().with_table("t", vec![vec!["Product".into()]]);
        repo.set_offline(true);
        assert!(matches!(repo.load("t"), Err(LedgerStoreError::Unavailable { .. })));
        assert!(repo.persist("t", &Grid::new()).is_err());

        repo.set_offline(false);
        assert_eq!(repo.load("t").unwrap(), vec![vec!["Product".to_string()]]);
    }
}
