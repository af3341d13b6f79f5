//! Envelope construction, serialization, and parsing.

use thiserror::Error;

use crate::crypto::{NONCE_LEN, TAG_LEN};

/// Three-byte magic that opens every encoded envelope.
pub const MAGIC: [u8; 3] = *b"ENV";

/// Envelope format version emitted by this build.
pub const ENVELOPE_VERSION: u8 = 1;

/// Largest wrapped key the one-byte length prefix can describe.
pub const MAX_WRAPPED_KEY_LEN: usize = u8::MAX as usize;

/// Magic + version byte + key-length byte: the minimum a buffer must hold
/// before field parsing can start.
const HEADER_LEN: usize = MAGIC.len() + 2;

/// Errors produced when an envelope is structurally invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The buffer ends before the declared fields do.
    #[error("envelope truncated")]
    Truncated,

    /// The buffer does not start with the envelope magic.
    #[error("missing or corrupted envelope magic")]
    BadMagic,

    /// The declared wrapped-key length is zero.
    #[error("wrapped-key length missing or zero")]
    ZeroLengthKey,

    /// The wrapped key does not fit the one-byte length prefix.
    #[error("wrapped key exceeds {MAX_WRAPPED_KEY_LEN} bytes: got {0}")]
    OversizedKey(usize),
}

/// The wire-format record: wrapped key, nonce, tag, and ciphertext.
///
/// Immutable once constructed. An envelope is created fresh on every encrypt
/// call and parsed fresh on every decrypt call; none is ever persisted or
/// reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    version: u8,
    wrapped_key: Vec<u8>,
    nonce: [u8; NONCE_LEN],
    tag: [u8; TAG_LEN],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Construct an envelope, enforcing the length-prefix invariant on the
    /// wrapped key.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::ZeroLengthKey`] if `wrapped_key` is empty and
    /// [`FormatError::OversizedKey`] if it exceeds [`MAX_WRAPPED_KEY_LEN`]
    /// bytes.
    pub fn new(
        version: u8,
        wrapped_key: Vec<u8>,
        nonce: [u8; NONCE_LEN],
        tag: [u8; TAG_LEN],
        ciphertext: Vec<u8>,
    ) -> Result<Self, FormatError> {
        if wrapped_key.is_empty() {
            return Err(FormatError::ZeroLengthKey);
        }
        if wrapped_key.len() > MAX_WRAPPED_KEY_LEN {
            return Err(FormatError::OversizedKey(wrapped_key.len()));
        }
        Ok(Self {
            version,
            wrapped_key,
            nonce,
            tag,
            ciphertext,
        })
    }

    /// Format version declared by this envelope.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The wrapped data key (opaque; at the outer layer this is a serialized
    /// inner envelope).
    pub fn wrapped_key(&self) -> &[u8] {
        &self.wrapped_key
    }

    /// AEAD nonce the ciphertext was sealed under.
    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// AEAD authentication tag.
    pub fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    /// Ciphertext body; empty for key-wrapping envelopes.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Serialize to the wire format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            HEADER_LEN + self.wrapped_key.len() + NONCE_LEN + TAG_LEN + self.ciphertext.len(),
        );
        out.extend_from_slice(&MAGIC);
        out.push(self.version);
        out.push(self.wrapped_key.len() as u8);
        out.extend_from_slice(&self.wrapped_key);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse an envelope from the wire format.
    ///
    /// Validation order: overall length, magic, declared key length, then the
    /// remaining field lengths. Everything after the tag is the ciphertext,
    /// including nothing at all.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Truncated`], [`FormatError::BadMagic`], or
    /// [`FormatError::ZeroLengthKey`] as described above. Parsing never
    /// panics and never yields partial data.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < HEADER_LEN {
            return Err(FormatError::Truncated);
        }
        if data[..MAGIC.len()] != MAGIC {
            return Err(FormatError::BadMagic);
        }
        let version = data[MAGIC.len()];
        let key_len = data[MAGIC.len() + 1] as usize;
        if key_len == 0 {
            return Err(FormatError::ZeroLengthKey);
        }

        let mut offset = HEADER_LEN;
        if data.len() - offset < key_len + NONCE_LEN + TAG_LEN {
            return Err(FormatError::Truncated);
        }

        let wrapped_key = data[offset..offset + key_len].to_vec();
        offset += key_len;

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&data[offset..offset + NONCE_LEN]);
        offset += NONCE_LEN;

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&data[offset..offset + TAG_LEN]);
        offset += TAG_LEN;

        let ciphertext = data[offset..].to_vec();

        Ok(Self {
            version,
            wrapped_key,
            nonce,
            tag,
            ciphertext,
        })
    }
}
