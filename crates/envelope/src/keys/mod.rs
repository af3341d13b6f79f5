//! Data-key issuance and unwrapping.
//!
//! The capability surface is exactly two operations — issue a fresh wrapped
//! data key, unwrap a previously wrapped one — so that alternate backends
//! (the local master key here, a remote KMS elsewhere) are interchangeable
//! implementations of the same contract.
//!
//! # Security invariants
//!
//! - The master key is read-only after construction and is **never** exposed,
//!   serialized, logged, or included in traces.
//! - A raw data key lives only for the duration of one encrypt/decrypt call;
//!   its buffer is zeroed on drop.

pub mod master;
pub mod material;
pub mod provider;

pub use master::{MasterKeyError, MasterKeyProvider};
pub use material::KeyMaterial;
pub use provider::{DataKeyPair, SymmetricKeyProvider};

#[cfg(test)]
pub use provider::MockSymmetricKeyProvider;
