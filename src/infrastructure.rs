//! Infrastructure layer for parsing, ledger storage, configuration and logging
//!
//! This module provides the product text parsers, file-backed and in-memory
//! ledger repositories, and the application's configuration and logging setup.

pub mod parsing_error; // Resolution error types
pub mod parsing; // Product title/variant/URL parsing
pub mod csv_ledger_repository;
pub mod memory_ledger_repository;
pub mod config; // Configuration file and environment overrides
pub mod logging; // Logging infrastructure

// Re-export commonly used items
pub use csv_ledger_repository::CsvLedgerRepository;
pub use memory_ledger_repository::InMemoryLedgerRepository;
pub use parsing::{ResolutionStrategy, resolve, resolve_listing};
pub use parsing_error::{ResolutionError, ResolutionResult};
pub use config::{AppConfig, ConfigError, ConfigManager};
pub use logging::{init_logging_with_config, log_system_info};
