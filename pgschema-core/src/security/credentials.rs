//! Secure credential container with automatic memory zeroing.
//!
//! This module provides the `Credentials` struct which stores the database
//! username and password with automatic memory clearing on drop using the
//! `zeroize` crate.
//!
//! # Security
//! - Credentials are stored in `Zeroizing<T>` containers
//! - Memory is automatically cleared when credentials go out of scope
//! - The password is masked in `Debug` output and never logged

use std::fmt;

use zeroize::{Zeroize, Zeroizing};

/// Secure credential container that automatically zeros memory on drop.
///
/// Both the username and password are required: the exporter refuses
/// connection strings without a full credential pair. The password is
/// only ever read back to populate the `PGPASSWORD` variable of the
/// `pg_dump` child process.
///
/// # Example
///
/// ```rust
/// use pgschema_core::security::Credentials;
///
/// let creds = Credentials::new("admin".to_string(), "secret".to_string());
/// assert_eq!(creds.username(), "admin");
/// // Password is automatically zeroed when `creds` is dropped
/// ```
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Credentials {
    username: Zeroizing<String>,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Creates new credentials with automatic memory zeroing.
    ///
    /// # Arguments
    /// * `username` - Database username
    /// * `password` - Database password
    pub fn new(username: String, password: String) -> Self {
        Self {
            username: Zeroizing::new(username),
            password: Zeroizing::new(password),
        }
    }

    /// Gets the username (still protected by Zeroizing).
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Gets the password for injection into a child process environment.
    ///
    /// # Security
    /// This accessor exists solely so the dump runner can set `PGPASSWORD`
    /// on the child process. The value must never be logged, displayed, or
    /// placed in an argument list.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username())
            .field("password", &"****")
            .finish()
    }
}
