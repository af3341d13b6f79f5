//! Envelope encryption: a one-time data key protects each message, and the
//! data key itself travels wrapped under a long-lived master key.
//!
//! Both layers share one binary container (see [`envelope`]): the outer
//! envelope carries the payload ciphertext and embeds the wrapped data key —
//! itself a serialized inner envelope — in its key field. The externally
//! facing API operates on base64 text.
//!
//! # Layering
//!
//! - [`crypto`] — AES-256-GCM seal/open as stateless pure functions.
//! - [`envelope`] — the versioned wire format.
//! - [`keys`] — the data-key capability trait and its master-key-backed
//!   implementation.
//! - [`service`] — the `encrypt`/`decrypt` orchestration.
//!
//! # Example
//!
//! ```
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use envelope_enc::{EncryptionService, MasterKeyProvider, Settings};
//!
//! let settings = Settings::from_env()?;
//! let service = EncryptionService::new(MasterKeyProvider::new(&settings)?);
//!
//! let token = service.encrypt("Hello, World!").await?;
//! let plain = service.decrypt(&token).await?;
//! assert_eq!(plain, "Hello, World!");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod keys;
pub mod service;

pub use config::Settings;
pub use envelope::{Envelope, FormatError, ENVELOPE_VERSION};
pub use error::Error;
pub use keys::{DataKeyPair, KeyMaterial, MasterKeyError, MasterKeyProvider, SymmetricKeyProvider};
pub use service::EncryptionService;
