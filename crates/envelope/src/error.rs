//! Crate-level error taxonomy.
//!
//! Failures from the cipher and codec layers propagate unchanged through the
//! key provider and the encryption service; nothing here is retried, because
//! every failure is deterministic. The only place an error is deliberately
//! swallowed is the "is this already an envelope?" probe in
//! [`crate::service::EncryptionService::encrypt`].

use thiserror::Error;

use crate::crypto::cipher::CipherError;
use crate::envelope::FormatError;

/// Errors surfaced by the encryption service and key providers.
#[derive(Debug, Error)]
pub enum Error {
    /// Envelope bytes are structurally invalid.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The envelope declares a format version this build does not understand.
    /// The payload must not be interpreted.
    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(u8),

    /// AEAD tag verification failed: wrong key, wrong nonce, or tampered
    /// bytes. Carries no information about which byte differed.
    #[error("authentication failed")]
    Authentication,

    /// The input to encrypt already parses as a valid envelope.
    #[error("input is already encrypted")]
    AlreadyEncrypted,

    /// Boundary text is not valid base64.
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decrypted payload is not valid UTF-8.
    #[error("decrypted payload is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// An unwrapped data key has the wrong length.
    #[error("data key has invalid length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The AEAD refused a seal operation.
    #[error("encryption failure")]
    EncryptionFailure,
}

impl From<CipherError> for Error {
    fn from(e: CipherError) -> Self {
        match e {
            CipherError::Aead => Error::EncryptionFailure,
            CipherError::Authentication => Error::Authentication,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cipher_errors_map_onto_taxonomy() {
        assert!(matches!(
            Error::from(CipherError::Authentication),
            Error::Authentication
        ));
        assert!(matches!(
            Error::from(CipherError::Aead),
            Error::EncryptionFailure
        ));
    }

    #[test]
    fn format_error_is_transparent() {
        let e = Error::from(FormatError::BadMagic);
        assert_eq!(e.to_string(), "missing or corrupted envelope magic");
    }

    #[test]
    fn display_includes_version() {
        assert_eq!(
            Error::UnsupportedVersion(9).to_string(),
            "unsupported envelope version: 9"
        );
    }
}
