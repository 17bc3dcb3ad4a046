//! Schema dump invocation.
//!
//! This module builds and runs the external `pg_dump` invocation. The
//! exporter never speaks the PostgreSQL wire protocol itself; `pg_dump`
//! owns the connection and writes the SQL file, while this module owns the
//! argument list and the credential handoff.
//!
//! # Security
//! - The password is injected as `PGPASSWORD` into the child environment
//!   only; it never appears in the argument list or in process listings
//! - The rendered command line is safe to log and display

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::ExportError;
use crate::security::{ConnectionInfo, Credentials};

/// Name of the external schema-dump executable, resolved via PATH.
pub const SCHEMA_DUMP_TOOL: &str = "pg_dump";

/// Environment variable carrying the password to the child process.
pub const PASSWORD_ENV_VAR: &str = "PGPASSWORD";

const SCHEMA_ONLY_FLAG: &str = "--schema-only";

/// Captured output of a completed dump run.
#[derive(Debug, Clone)]
pub struct DumpOutput {
    /// Captured standard output (normally empty; the SQL goes to the file)
    pub stdout: String,
    /// Captured standard error (warnings on success)
    pub stderr: String,
}

/// A fully prepared `pg_dump` invocation.
///
/// Construction is a deterministic mapping from connection info plus the
/// output path to an argument vector. The password is deliberately not part
/// of this struct; it is read from [`Credentials`] only at spawn time.
#[derive(Debug, Clone)]
pub struct DumpRequest {
    program: String,
    args: Vec<String>,
}

impl DumpRequest {
    /// Builds the schema-only dump invocation for one database.
    ///
    /// The username travels as a regular `-U` argument; only the password
    /// is confined to the child environment.
    pub fn new(info: &ConnectionInfo, username: &str, output: &Path) -> Self {
        let args = vec![
            SCHEMA_ONLY_FLAG.to_string(),
            "-h".to_string(),
            info.host.clone(),
            "-p".to_string(),
            info.port.to_string(),
            "-U".to_string(),
            username.to_string(),
            "-d".to_string(),
            info.database.clone(),
            "-f".to_string(),
            output.display().to_string(),
        ];

        Self {
            program: SCHEMA_DUMP_TOOL.to_string(),
            args,
        }
    }

    /// The argument vector passed to the tool, without the program name.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Renders the invocation for status output and logs.
    ///
    /// Contains no credentials: the password is never part of the
    /// argument list.
    pub fn command_line(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }

    /// Runs the dump, waiting until the tool exits and its output is drained.
    ///
    /// The child inherits the parent environment plus `PGPASSWORD`; the
    /// parent's own environment is never modified. Standard output and
    /// standard error are fully captured. On success the SQL file has been
    /// written (or overwritten) by the tool at the requested path.
    ///
    /// # Errors
    /// - [`ExportError::ToolNotFound`] when the executable cannot be
    ///   resolved on PATH
    /// - [`ExportError::DumpFailed`] with the captured stderr when the tool
    ///   exits non-zero
    /// - [`ExportError::Io`] for any other spawn failure
    pub async fn run(&self, credentials: &Credentials) -> crate::Result<DumpOutput> {
        debug!("Spawning {}", self.command_line());

        let output = Command::new(&self.program)
            .args(&self.args)
            .env(PASSWORD_ENV_VAR, credentials.password())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExportError::tool_not_found(&self.program)
                } else {
                    ExportError::io(format!("failed to launch {}", self.program), e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ExportError::DumpFailed {
                status: output.status,
                stderr,
            });
        }

        Ok(DumpOutput { stdout, stderr })
    }
}

/// Checks that the dump tool is present by asking it for its version.
///
/// Returns the trimmed version line, e.g. `pg_dump (PostgreSQL) 16.2`.
///
/// # Errors
/// - [`ExportError::ToolNotFound`] when the executable cannot be resolved
/// - [`ExportError::DumpFailed`] when the tool exists but the version probe
///   exits non-zero
pub async fn probe_tool() -> crate::Result<String> {
    let output = Command::new(SCHEMA_DUMP_TOOL)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExportError::tool_not_found(SCHEMA_DUMP_TOOL)
            } else {
                ExportError::io(format!("failed to launch {SCHEMA_DUMP_TOOL}"), e)
            }
        })?;

    if !output.status.success() {
        return Err(ExportError::DumpFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_info() -> ConnectionInfo {
        ConnectionInfo {
            host: "localhost".to_string(),
            port: 5432,
            database: "appdb".to_string(),
        }
    }

    #[test]
    fn test_dump_request_argument_vector() {
        let request = DumpRequest::new(&sample_info(), "alice", Path::new("schema_dump.sql"));

        assert_eq!(
            request.args(),
            &[
                "--schema-only",
                "-h",
                "localhost",
                "-p",
                "5432",
                "-U",
                "alice",
                "-d",
                "appdb",
                "-f",
                "schema_dump.sql",
            ]
        );
    }

    #[test]
    fn test_command_line_rendering() {
        let request = DumpRequest::new(&sample_info(), "alice", Path::new("schema_dump.sql"));

        assert_eq!(
            request.command_line(),
            "pg_dump --schema-only -h localhost -p 5432 -U alice -d appdb -f schema_dump.sql"
        );
    }

    #[test]
    fn test_command_line_contains_no_password() {
        let credentials = Credentials::new("alice".to_string(), "s3cret".to_string());
        let request = DumpRequest::new(
            &sample_info(),
            credentials.username(),
            Path::new("schema_dump.sql"),
        );

        let rendered = request.command_line();
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("s3cret"));

        let debug = format!("{:?}", request);
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_output_path_is_forwarded() {
        let output = PathBuf::from("/tmp/exports/schema_dump.sql");
        let request = DumpRequest::new(&sample_info(), "alice", &output);

        assert!(
            request
                .args()
                .iter()
                .any(|arg| arg == "/tmp/exports/schema_dump.sql")
        );
    }

    #[tokio::test]
    async fn test_run_maps_missing_tool() {
        let request = DumpRequest {
            program: "/nonexistent/pg_dump".to_string(),
            args: vec![],
        };
        let credentials = Credentials::new("u".to_string(), "p".to_string());

        let err = request.run(&credentials).await.unwrap_err();
        assert!(matches!(err, ExportError::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_failure_stderr() {
        let request = DumpRequest {
            program: "/bin/sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo dump refused >&2; exit 3".to_string(),
            ],
        };
        let credentials = Credentials::new("u".to_string(), "p".to_string());

        let err = request.run(&credentials).await.unwrap_err();
        match err {
            ExportError::DumpFailed { status, stderr } => {
                assert_eq!(status.code(), Some(3));
                assert!(stderr.contains("dump refused"));
            }
            other => panic!("expected DumpFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_exposes_password_to_child_env_only() {
        let request = DumpRequest {
            program: "/bin/sh".to_string(),
            args: vec!["-c".to_string(), "printf '%s' \"$PGPASSWORD\"".to_string()],
        };
        let credentials = Credentials::new("u".to_string(), "s3cret".to_string());

        let output = request
            .run(&credentials)
            .await
            .expect("fake tool should succeed");
        assert_eq!(output.stdout, "s3cret");
    }
}
