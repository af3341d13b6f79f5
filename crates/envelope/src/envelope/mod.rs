//! The binary envelope container.
//!
//! An envelope carries a wrapped data key, the AEAD nonce and tag, and the
//! ciphertext as one opaque, self-describing blob. The same container is used
//! at both layers: the outer envelope holds the payload ciphertext and embeds
//! a serialized inner envelope (the wrapped data key) in its key field; the
//! inner envelope holds the sealed key bytes and an empty ciphertext.
//!
//! # Wire format
//!
//! ```text
//! | magic `ENV` | version | key len | wrapped key | nonce    | tag      | ciphertext |
//! | 3 bytes     | 1 byte  | 1 byte  | 1..255 B    | 12 bytes | 16 bytes | remainder  |
//! ```
//!
//! All offsets are sequential with no alignment padding; the ciphertext is
//! everything after the tag and may be empty.

pub mod codec;

pub use codec::{Envelope, FormatError, ENVELOPE_VERSION, MAGIC};
