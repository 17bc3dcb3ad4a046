//! Core configuration, parsing, and dump invocation for pgschema.
//!
//! This crate provides everything the export binary needs: configuration
//! resolution from the environment and dotenv files, connection string
//! parsing with secure credential extraction, and the `pg_dump` subprocess
//! invocation that produces the schema-only SQL file.
//!
//! # Security Guarantees
//! - No direct database connections; `pg_dump` owns the wire protocol
//! - Credentials are zeroized in memory and never logged
//! - The password reaches the child process through its environment only,
//!   never through an argument list
//!
//! # Architecture
//! The library follows these patterns:
//! - Explicit configuration struct resolved once and passed down
//! - Structured per-component errors instead of a monolithic pattern match
//! - Comprehensive error handling with credential sanitization

pub mod config;
pub mod dump;
pub mod error;
pub mod logging;
pub mod security;

// Re-export commonly used types
pub use config::{DATABASE_URL_VAR, DEFAULT_OUTPUT_FILE, ExporterConfig};
pub use dump::{DumpOutput, DumpRequest, PASSWORD_ENV_VAR, SCHEMA_DUMP_TOOL, probe_tool};
pub use error::{ExportError, Result, redact_database_url};
pub use logging::init_logging;
pub use security::{ConnectionInfo, Credentials, EXPECTED_URL_FORMAT, parse_connection_string};
