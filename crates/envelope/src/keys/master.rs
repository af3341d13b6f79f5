//! Master-key-backed implementation of [`SymmetricKeyProvider`].
//!
//! The master key wraps one-time data keys and never touches payload
//! directly. Wrapping is itself an envelope operation: the sealed key bytes
//! and their tag travel in an inner envelope whose ciphertext field is empty,
//! the "payload" being the key material.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use tracing::debug;

use crate::config::Settings;
use crate::crypto::cipher::{self, KEY_LEN, TAG_LEN};
use crate::envelope::{Envelope, ENVELOPE_VERSION};
use crate::error::Error;

use super::{DataKeyPair, KeyMaterial, SymmetricKeyProvider};

/// Errors produced when constructing a [`MasterKeyProvider`].
///
/// These are fatal at construction time; per-call operations never revisit
/// master-key validity.
#[derive(Debug, Error)]
pub enum MasterKeyError {
    /// The configured master key is not valid base64.
    #[error("master key is not valid base64")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded master key is not exactly [`KEY_LEN`] bytes.
    #[error("master key must be {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// Key provider backed by a locally held master key.
///
/// The master key is decoded once at construction and is read-only for the
/// process lifetime; the provider may be shared freely across concurrent
/// calls without synchronization.
pub struct MasterKeyProvider {
    master_key: KeyMaterial,
}

impl MasterKeyProvider {
    /// Decode and validate the base64 master key from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`MasterKeyError`] if the key is not base64 or does not decode
    /// to exactly [`KEY_LEN`] bytes.
    pub fn new(settings: &Settings) -> Result<Self, MasterKeyError> {
        let raw = STANDARD.decode(&settings.encryption_key)?;
        let master_key =
            KeyMaterial::from_slice(&raw).ok_or(MasterKeyError::InvalidLength(raw.len()))?;
        Ok(Self { master_key })
    }
}

#[async_trait]
impl SymmetricKeyProvider for MasterKeyProvider {
    async fn issue_data_key(&self) -> Result<DataKeyPair, Error> {
        let data_key = KeyMaterial::random();
        let nonce = cipher::random_nonce();

        let sealed = cipher::seal(self.master_key.as_array(), &nonce, data_key.as_array())?;
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&sealed[KEY_LEN..]);

        let envelope = Envelope::new(
            ENVELOPE_VERSION,
            sealed[..KEY_LEN].to_vec(),
            nonce,
            tag,
            Vec::new(),
        )?;

        debug!("data key issued");
        Ok(DataKeyPair {
            decrypted_data_key: data_key,
            encrypted_data_key: envelope.to_bytes(),
        })
    }

    async fn unwrap_data_key(&self, wrapped: &[u8]) -> Result<KeyMaterial, Error> {
        let envelope = Envelope::from_bytes(wrapped)?;
        if envelope.version() != ENVELOPE_VERSION {
            return Err(Error::UnsupportedVersion(envelope.version()));
        }

        let mut sealed = Vec::with_capacity(envelope.wrapped_key().len() + TAG_LEN);
        sealed.extend_from_slice(envelope.wrapped_key());
        sealed.extend_from_slice(envelope.tag());

        let raw = cipher::open(self.master_key.as_array(), envelope.nonce(), &sealed)?;
        KeyMaterial::from_slice(&raw).ok_or(Error::InvalidKeyLength(raw.len()))
    }
}
