//! Envelope-encryption orchestration over base64 text.
//!
//! `encrypt` issues a one-time data key, seals the payload under it, and
//! packs the wrapped key, nonce, tag, and ciphertext into an outer envelope;
//! `decrypt` reverses the process. No state persists between calls: each call
//! allocates its own nonce, data key, and buffers, so concurrent calls share
//! nothing but the provider handle.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::crypto::cipher::{self, TAG_LEN};
use crate::envelope::{Envelope, ENVELOPE_VERSION};
use crate::error::Error;
use crate::keys::SymmetricKeyProvider;

/// Encrypts and decrypts text using envelope encryption.
///
/// Holds only a handle to its key provider; any [`SymmetricKeyProvider`]
/// backend slots in unchanged.
pub struct EncryptionService<K> {
    keys: K,
}

impl<K: SymmetricKeyProvider> EncryptionService<K> {
    /// Create a service over the given key provider.
    pub fn new(keys: K) -> Self {
        Self { keys }
    }

    /// Returns `true` if `input` base64-decodes to a parseable envelope.
    ///
    /// Best-effort probe: any decode failure means "not encrypted" and is
    /// never propagated. A plaintext that happens to start with the envelope
    /// magic and a plausible length byte can be misclassified.
    fn is_encrypted(input: &str) -> bool {
        STANDARD
            .decode(input)
            .map(|bytes| Envelope::from_bytes(&bytes).is_ok())
            .unwrap_or(false)
    }

    /// Encrypt `plaintext`, returning the base64-encoded envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyEncrypted`] if `plaintext` already parses as
    /// an envelope, and propagates key-provider and cipher failures
    /// unchanged.
    pub async fn encrypt(&self, plaintext: &str) -> Result<String, Error> {
        if Self::is_encrypted(plaintext) {
            return Err(Error::AlreadyEncrypted);
        }

        let pair = self.keys.issue_data_key().await?;

        // The payload nonce is distinct from the key-wrapping nonce drawn by
        // the provider.
        let nonce = cipher::random_nonce();
        let sealed = cipher::seal(
            pair.decrypted_data_key.as_array(),
            &nonce,
            plaintext.as_bytes(),
        )?;

        let (ciphertext, tag_bytes) = sealed.split_at(sealed.len() - TAG_LEN);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(tag_bytes);

        let envelope = Envelope::new(
            ENVELOPE_VERSION,
            pair.encrypted_data_key,
            nonce,
            tag,
            ciphertext.to_vec(),
        )?;

        debug!(ciphertext_len = envelope.ciphertext().len(), "payload sealed");
        Ok(STANDARD.encode(envelope.to_bytes()))
    }

    /// Decrypt a base64-encoded envelope back to its plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Base64`] or [`Error::Format`] if the input is not a
    /// well-formed envelope, [`Error::UnsupportedVersion`] if either envelope
    /// layer declares an unknown version, [`Error::Authentication`] if tag
    /// verification fails at either layer, and [`Error::Utf8`] if the
    /// recovered payload is not valid UTF-8.
    pub async fn decrypt(&self, ciphertext: &str) -> Result<String, Error> {
        let bytes = STANDARD.decode(ciphertext)?;
        let envelope = Envelope::from_bytes(&bytes)?;

        // The outer version byte is not covered by either AEAD tag, so it is
        // gated here; the provider gates the inner envelope's version.
        if envelope.version() != ENVELOPE_VERSION {
            return Err(Error::UnsupportedVersion(envelope.version()));
        }

        let data_key = self.keys.unwrap_data_key(envelope.wrapped_key()).await?;

        let mut sealed = Vec::with_capacity(envelope.ciphertext().len() + TAG_LEN);
        sealed.extend_from_slice(envelope.ciphertext());
        sealed.extend_from_slice(envelope.tag());

        let plaintext = cipher::open(data_key.as_array(), envelope.nonce(), &sealed)?;

        debug!(plaintext_len = plaintext.len(), "envelope opened");
        Ok(String::from_utf8(plaintext)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::crypto::{KEY_LEN, NONCE_LEN};
    use crate::envelope::{FormatError, MAGIC};
    use crate::keys::{DataKeyPair, KeyMaterial, MasterKeyProvider, MockSymmetricKeyProvider};

    fn service() -> EncryptionService<MasterKeyProvider> {
        let settings = Settings {
            encryption_key: STANDARD.encode([0x2A; KEY_LEN]),
        };
        EncryptionService::new(MasterKeyProvider::new(&settings).unwrap())
    }

    #[tokio::test]
    async fn round_trip_hello_world() {
        let service = service();
        let token = service.encrypt("Hello, World!").await.unwrap();

        let bytes = STANDARD.decode(&token).unwrap();
        assert_eq!(&bytes[..3], &MAGIC);

        assert_eq!(service.decrypt(&token).await.unwrap(), "Hello, World!");
    }

    #[tokio::test]
    async fn round_trip_empty_string() {
        let service = service();
        let token = service.encrypt("").await.unwrap();
        assert_eq!(service.decrypt(&token).await.unwrap(), "");
    }

    #[tokio::test]
    async fn round_trip_multibyte_utf8() {
        let service = service();
        let plaintext = "héllo wörld — 世界 🌍";
        let token = service.encrypt(plaintext).await.unwrap();
        assert_eq!(service.decrypt(&token).await.unwrap(), plaintext);
    }

    #[tokio::test]
    async fn double_encryption_is_rejected() {
        let service = service();
        let token = service.encrypt("hello").await.unwrap();
        assert!(matches!(
            service.encrypt(&token).await,
            Err(Error::AlreadyEncrypted)
        ));
    }

    #[tokio::test]
    async fn repeated_encryption_yields_distinct_envelopes() {
        let service = service();
        let a = service.encrypt("same plaintext").await.unwrap();
        let b = service.encrypt("same plaintext").await.unwrap();
        assert_ne!(a, b);

        // Fresh data key per call: the wrapped-key bytes differ too.
        let env_a = Envelope::from_bytes(&STANDARD.decode(&a).unwrap()).unwrap();
        let env_b = Envelope::from_bytes(&STANDARD.decode(&b).unwrap()).unwrap();
        assert_ne!(env_a.wrapped_key(), env_b.wrapped_key());
    }

    #[tokio::test]
    async fn invalid_base64_is_rejected() {
        let service = service();
        assert!(matches!(
            service.decrypt("!!!not base64!!!").await,
            Err(Error::Base64(_))
        ));
    }

    #[tokio::test]
    async fn garbage_bytes_are_a_format_error() {
        let service = service();
        let token = STANDARD.encode(b"definitely not an envelope");
        assert!(matches!(
            service.decrypt(&token).await,
            Err(Error::Format(_))
        ));
    }

    #[tokio::test]
    async fn outer_version_is_gated() {
        let service = service();
        let mut bytes = STANDARD
            .decode(service.encrypt("hello").await.unwrap())
            .unwrap();
        // The outer version byte is not covered by either tag; it must still
        // be rejected rather than ignored.
        bytes[3] = 7;
        assert!(matches!(
            service.decrypt(&STANDARD.encode(&bytes)).await,
            Err(Error::UnsupportedVersion(7))
        ));
    }

    #[tokio::test]
    async fn inner_version_is_gated() {
        let service = service();
        let mut bytes = STANDARD
            .decode(service.encrypt("hello").await.unwrap())
            .unwrap();
        // The inner envelope starts after the outer magic/version/length
        // bytes; its own version byte sits 3 bytes further in.
        bytes[5 + 3] = 9;
        assert!(matches!(
            service.decrypt(&STANDARD.encode(&bytes)).await,
            Err(Error::UnsupportedVersion(9))
        ));
    }

    /// Flip one byte at `index` in the decoded envelope and decrypt.
    async fn decrypt_flipped(
        service: &EncryptionService<MasterKeyProvider>,
        token: &str,
        index: usize,
    ) -> Result<String, Error> {
        let mut bytes = STANDARD.decode(token).unwrap();
        bytes[index] ^= 0x01;
        service.decrypt(&STANDARD.encode(&bytes)).await
    }

    #[tokio::test]
    async fn single_byte_flips_never_yield_plaintext() {
        let service = service();
        let token = service.encrypt("Hello, World!").await.unwrap();
        let len = STANDARD.decode(&token).unwrap().len();
        for index in 0..len {
            let result = decrypt_flipped(&service, &token, index).await;
            assert!(result.is_err(), "byte {index} flip was accepted");
        }
    }

    #[tokio::test]
    async fn flips_in_authenticated_regions_fail_authentication() {
        let service = service();
        let token = service.encrypt("Hello, World!").await.unwrap();
        let bytes = STANDARD.decode(&token).unwrap();
        let envelope = Envelope::from_bytes(&bytes).unwrap();

        let inner_len = envelope.wrapped_key().len();
        let nonce_at = 5 + inner_len;
        let tag_at = nonce_at + NONCE_LEN;
        let ciphertext_at = tag_at + TAG_LEN;
        for index in [
            5 + 5,             // sealed key bytes inside the inner envelope
            5 + 5 + KEY_LEN,   // inner envelope nonce
            nonce_at,          // outer payload nonce
            tag_at,            // outer tag
            ciphertext_at,     // payload ciphertext
            bytes.len() - 1,   // last ciphertext byte
        ] {
            let result = decrypt_flipped(&service, &token, index).await;
            assert!(
                matches!(result, Err(Error::Authentication)),
                "byte {index} flip did not fail authentication"
            );
        }
    }

    #[tokio::test]
    async fn truncated_token_never_yields_partial_plaintext() {
        let service = service();
        let bytes = STANDARD
            .decode(service.encrypt("Hello, World!").await.unwrap())
            .unwrap();
        // Cutting into the ciphertext still parses (the ciphertext is the
        // remainder) but must then fail tag verification.
        let cut = STANDARD.encode(&bytes[..bytes.len() - 1]);
        assert!(matches!(
            service.decrypt(&cut).await,
            Err(Error::Authentication)
        ));
    }

    #[tokio::test]
    async fn mocked_provider_round_trips() {
        let mut keys = MockSymmetricKeyProvider::new();
        keys.expect_issue_data_key().times(1).returning(|| {
            Ok(DataKeyPair {
                decrypted_data_key: KeyMaterial::from_slice(&[9u8; KEY_LEN]).unwrap(),
                encrypted_data_key: b"opaque kms token".to_vec(),
            })
        });
        keys.expect_unwrap_data_key()
            .withf(|wrapped: &[u8]| wrapped == b"opaque kms token".as_slice())
            .times(1)
            .returning(|_| Ok(KeyMaterial::from_slice(&[9u8; KEY_LEN]).unwrap()));

        let service = EncryptionService::new(keys);
        let token = service.encrypt("via mock").await.unwrap();
        assert_eq!(service.decrypt(&token).await.unwrap(), "via mock");
    }

    #[tokio::test]
    async fn provider_errors_propagate_unchanged() {
        let mut keys = MockSymmetricKeyProvider::new();
        keys.expect_issue_data_key()
            .times(1)
            .returning(|| Err(Error::Format(FormatError::Truncated)));

        let service = EncryptionService::new(keys);
        assert!(matches!(
            service.encrypt("hello").await,
            Err(Error::Format(FormatError::Truncated))
        ));
    }
}
