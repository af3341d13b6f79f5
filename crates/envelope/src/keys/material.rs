//! [`KeyMaterial`]: fixed-size key buffer with zero-on-drop semantics.

use aes_gcm::aead::OsRng;

use crate::crypto::KEY_LEN;

/// Fixed-size buffer holding exactly [`KEY_LEN`] bytes of key material.
///
/// Used for both the long-lived master key and the per-message data keys.
/// When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which plaintext key material lives in RAM.
#[derive(Clone)]
pub struct KeyMaterial(Box<[u8; KEY_LEN]>);

impl KeyMaterial {
    /// Draw a fresh random key from the OS CSPRNG.
    pub fn random() -> Self {
        use aes_gcm::aead::rand_core::RngCore;
        let mut buf = Box::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(buf.as_mut());
        Self(buf)
    }

    /// Copy `bytes` into a fresh buffer.
    ///
    /// Returns `None` unless the slice is exactly [`KEY_LEN`] bytes; callers
    /// surface their own typed length error.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != KEY_LEN {
            return None;
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Some(Self(buf))
    }

    /// Borrow the raw key bytes.
    pub fn as_array(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("KeyMaterial([REDACTED])")
    }
}
