//! Exporter configuration.
//!
//! This module provides the `ExporterConfig` struct which resolves the
//! connection URL from the CLI, the process environment, or a dotenv file,
//! and validates everything at load time. Configuration is constructed once
//! in `main` and passed down; nothing here is global state.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ExportError;

/// Environment variable holding the connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Default output path for the schema dump, overwritten on each run.
pub const DEFAULT_OUTPUT_FILE: &str = "schema_dump.sql";

/// Resolved configuration for one export run.
///
/// # Security
/// The connection URL may carry credentials, so this struct is never
/// printed directly; its `Display` impl shows only the output path.
#[derive(Clone)]
pub struct ExporterConfig {
    /// Raw connection URL, still to be parsed and validated
    pub database_url: String,
    /// Path the schema dump will be written to
    pub output: PathBuf,
}

impl ExporterConfig {
    /// Resolves configuration from the environment and CLI inputs.
    ///
    /// Resolution order for the connection URL:
    /// 1. `url_override` (the CLI argument, which clap also populates from
    ///    the process environment)
    /// 2. `DATABASE_URL` after loading the dotenv file
    ///
    /// When `env_file` is given, that file must exist and parse; otherwise
    /// `./.env` is loaded best-effort, matching the usual dotenv contract.
    ///
    /// # Errors
    /// Returns [`ExportError::Configuration`] when an explicit env file is
    /// unreadable, when no connection URL can be resolved, or when the
    /// output path is empty.
    pub fn load(
        env_file: Option<&Path>,
        url_override: Option<String>,
        output: PathBuf,
    ) -> crate::Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    ExportError::configuration(format!(
                        "could not load env file {}: {e}",
                        path.display()
                    ))
                })?;
            }
            None => {
                // No explicit file: a missing ./.env is not an error.
                let _ = dotenvy::dotenv();
            }
        }

        let database_url = url_override
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                env::var(DATABASE_URL_VAR)
                    .ok()
                    .filter(|url| !url.trim().is_empty())
            })
            .ok_or_else(|| {
                ExportError::configuration(format!(
                    "{DATABASE_URL_VAR} is not set; add it to your environment or .env file"
                ))
            })?;

        let config = Self {
            database_url,
            output,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration values resolved at load time.
    ///
    /// # Errors
    /// Returns error if configuration values are unusable
    pub fn validate(&self) -> crate::Result<()> {
        if self.output.as_os_str().is_empty() {
            return Err(ExportError::configuration("output path cannot be empty"));
        }

        Ok(())
    }
}

impl fmt::Display for ExporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally omit the connection URL; it may carry credentials
        write!(f, "ExporterConfig(output={})", self.output.display())
    }
}

impl fmt::Debug for ExporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact the connection URL; it may carry credentials
        f.debug_struct("ExporterConfig")
            .field("database_url", &"<redacted>")
            .field("output", &self.output)
            .finish()
    }
}
