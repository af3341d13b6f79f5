//! AES-256-GCM authenticated-encryption primitives.
//!
//! This module is intentionally free of key-management and wire-format
//! dependencies. It provides the low-level seal/open operations used by both
//! the key-wrapping layer and the payload path, as stateless pure functions
//! over explicit key, nonce, and buffer arguments.

pub mod cipher;

pub use cipher::{KEY_LEN, NONCE_LEN, TAG_LEN};
