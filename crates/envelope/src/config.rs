//! Configuration loading and validation.
//!
//! The subsystem has a single secret configuration value: the base64-encoded
//! 256-bit master key, read from the `ENCRYPTION_KEY` environment variable.
//! Loading fails fast with a clear error if the variable is missing or empty;
//! per-call operations never revisit configuration.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated encryption settings.
#[derive(Clone, Deserialize)]
pub struct Settings {
    /// Base64-encoded 256-bit master key. **Required.**
    pub encryption_key: String,
}

impl Settings {
    /// Load and validate settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_KEY` is absent or empty. Whether the
    /// value decodes to a usable key is checked by
    /// [`MasterKeyProvider::new`](crate::keys::MasterKeyProvider::new).
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let s: Settings = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        s.validate()?;
        Ok(s)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.encryption_key.trim().is_empty() {
            anyhow::bail!("ENCRYPTION_KEY is required and must not be empty");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the master key — not even in debug builds.
        f.debug_struct("Settings")
            .field("encryption_key", &"[REDACTED]")
            .finish()
    }
}
