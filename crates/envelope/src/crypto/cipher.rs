//! AES-256-GCM seal and open.
//!
//! **Nonce discipline:** every seal operation must use a fresh random 96-bit
//! nonce. GCM nonce reuse under the same key is catastrophic — it breaks both
//! confidentiality and authentication. The callers in this crate guarantee
//! this by drawing a new nonce via [`random_nonce`] for every operation and
//! by never reusing a data key across messages.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The AEAD refused the seal input (plaintext beyond the mode's limit).
    #[error("aead seal failed")]
    Aead,

    /// Tag verification failed: wrong key, wrong nonce, or tampered bytes.
    #[error("authentication failed")]
    Authentication,
}

/// Encrypt `plaintext` under `key` and `nonce`.
///
/// Returns the ciphertext with the [`TAG_LEN`]-byte authentication tag
/// appended — the AEAD's native output shape. The output is always exactly
/// `plaintext.len() + TAG_LEN` bytes; an empty plaintext is valid and yields
/// a bare tag.
///
/// # Errors
///
/// Returns [`CipherError::Aead`] on an internal AEAD error (unreachable for
/// any input this crate produces).
pub fn seal(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let cipher = Aes256Gcm::new(key.into());
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CipherError::Aead)
}

/// Decrypt `ciphertext_and_tag` (ciphertext with trailing tag) under `key`
/// and `nonce`.
///
/// Verify-then-decrypt is a single atomic operation: on failure no partial
/// plaintext is ever returned.
///
/// # Errors
///
/// Returns [`CipherError::Authentication`] if the tag does not verify —
/// wrong key, wrong nonce, or tampered bytes. The error carries no
/// information about which byte differed.
pub fn open(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext_and_tag: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let cipher = Aes256Gcm::new(key.into());
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext_and_tag)
        .map_err(|_| CipherError::Authentication)
}

/// Draw a fresh random nonce from the OS CSPRNG.
pub fn random_nonce() -> [u8; NONCE_LEN] {
    use aes_gcm::aead::rand_core::RngCore;
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}
