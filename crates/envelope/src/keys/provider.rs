//! The data-key issuance capability.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Error;

use super::KeyMaterial;

/// A freshly issued data key in both of its forms.
///
/// Created once per encrypt call, consumed immediately, and discarded: the
/// raw key must not be retained beyond the call.
#[derive(Debug, Clone)]
pub struct DataKeyPair {
    /// The raw 32-byte data key.
    pub decrypted_data_key: KeyMaterial,
    /// The same key sealed under the master key, as a fully serialized
    /// envelope with empty ciphertext.
    pub encrypted_data_key: Vec<u8>,
}

/// Capability for issuing and unwrapping per-message data keys.
///
/// Exactly two operations, so that the local master-key backend and a remote
/// KMS backend are interchangeable. Implementations must be safe to share
/// across concurrently executing calls.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SymmetricKeyProvider: Send + Sync {
    /// Produce a fresh random data key together with its wrapped form.
    async fn issue_data_key(&self) -> Result<DataKeyPair, Error>;

    /// Recover the raw data key from its wrapped form.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Format`], [`Error::UnsupportedVersion`], and
    /// [`Error::Authentication`] unchanged from the codec and cipher layers.
    async fn unwrap_data_key(&self, wrapped: &[u8]) -> Result<KeyMaterial, Error>;
}
