//! CSV file backend for ledger tables
//!
//! One `<table>.csv` file per table inside a data directory. Rows may have
//! differing lengths; spreadsheet exports drop trailing empty cells.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::domain::{Grid, LedgerRepository, LedgerStoreError, LedgerStoreResult};

#[derive(Debug, Clone)]
pub struct CsvLedgerRepository {
    data_dir: PathBuf,
}

impl CsvLedgerRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File backing `table`
    pub fn table_path(&self, table: &str) -> LedgerStoreResult<PathBuf> {
        if table.is_empty() || table.contains(['/', '\\']) || table.starts_with('.') {
            return Err(LedgerStoreError::Unavailable {
                reason: format!("invalid table name '{table}'"),
            });
        }
        Ok(self.data_dir.join(format!("{table}.csv")))
    }

    fn read_grid(table: &str, file: File) -> LedgerStoreResult<Grid> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut grid = Grid::new();
        for (index, record) in reader.byte_records().enumerate() {
            let record = record.map_err(|e| LedgerStoreError::load_failed(table, e))?;
            // Invalid bytes are replaced so the row and its history survive the next rewrite
            if std::str::from_utf8(record.as_slice()).is_err() {
                warn!(
                    "⚠️ Row {} in table '{}' is not valid UTF-8, invalid bytes replaced",
                    index + 1,
                    table
                );
            }
            grid.push(
                record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect(),
            );
        }
        Ok(grid)
    }

    fn write_grid(table: &str, file: &mut NamedTempFile, grid: &Grid) -> LedgerStoreResult<()> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
        for row in grid.iter().filter(|row| !row.is_empty()) {
            writer
                .write_record(row)
                .map_err(|e| LedgerStoreError::persist_failed(table, e))?;
        }
        writer
            .flush()
            .map_err(|e| LedgerStoreError::persist_failed(table, e))
    }
}

impl LedgerRepository for CsvLedgerRepository {
    fn load(&self, table: &str) -> LedgerStoreResult<Grid> {
        let path = self.table_path(table)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Table '{}' has no file yet at {}", table, path.display());
                return Ok(Grid::new());
            }
            Err(e) => return Err(LedgerStoreError::load_failed(table, e)),
        };

        let grid = Self::read_grid(table, file)?;
        debug!("Loaded {} rows from {}", grid.len(), path.display());
        Ok(grid)
    }

    fn persist(&self, table: &str, grid: &Grid) -> LedgerStoreResult<()> {
        let path = self.table_path(table)?;
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| LedgerStoreError::persist_failed(table, e))?;

        // Readers see either the previous table or the new one, never a torn write
        let mut staged = NamedTempFile::new_in(&self.data_dir)
            .map_err(|e| LedgerStoreError::persist_failed(table, e))?;
        Self::write_grid(table, &mut staged, grid)?;
        staged
            .persist(&path)
            .map_err(|e| LedgerStoreError::persist_failed(table, e))?;

        info!("💾 Persisted {} rows to {}", grid.len(), path.display());
        Ok(())
    }
}
