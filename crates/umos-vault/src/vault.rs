// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! String-level encrypt/decrypt of channel credentials.
//!
//! The vault holds one process-wide AES-256-GCM key taken from
//! configuration. Ciphertext is transported as `base64(nonce || sealed)`,
//! so a single TEXT column stores everything needed to decrypt.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use umos_core::UmosError;

use crate::crypto;

/// GCM nonce length prepended to every sealed payload.
const NONCE_LEN: usize = 12;
/// GCM authentication tag length appended by seal.
const TAG_LEN: usize = 16;

/// The credential vault, holding the master key in memory.
///
/// Debug output intentionally omits the key.
pub struct Vault {
    /// The decoded master key -- only in memory, never on disk.
    key: Zeroizing<[u8; 32]>,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl Vault {
    /// Builds a vault from the configured master key.
    ///
    /// The key must be the base64 encoding of exactly 32 bytes. A malformed
    /// key is a fatal startup error -- callers construct the vault before
    /// serving any request, never lazily on first use.
    pub fn new(master_key: &SecretString) -> Result<Self, UmosError> {
        let decoded = Zeroizing::new(
            BASE64
                .decode(master_key.expose_secret().trim())
                .map_err(|_| {
                    UmosError::Config("vault.master_key is not valid base64".to_string())
                })?,
        );
        if decoded.len() != 32 {
            return Err(UmosError::Config(format!(
                "vault.master_key must decode to exactly 32 bytes, got {}",
                decoded.len()
            )));
        }
        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&decoded);
        Ok(Self { key })
    }

    /// Encrypts a credential string, returning `base64(nonce || sealed)`.
    ///
    /// Empty input is rejected: an empty credential is always a caller
    /// mistake, and encrypting it would mask that until dispatch time.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, UmosError> {
        if plaintext.is_empty() {
            return Err(UmosError::InvalidInput(
                "cannot encrypt empty plaintext".to_string(),
            ));
        }
        let (sealed, nonce) = crypto::seal(&self.key, plaintext.as_bytes())?;
        let mut envelope = Vec::with_capacity(NONCE_LEN + sealed.len());
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&sealed);
        Ok(BASE64.encode(envelope))
    }

    /// Decrypts a credential string produced by [`Vault::encrypt`].
    ///
    /// Fails with [`UmosError::DecryptionFailed`] on malformed base64,
    /// truncated payloads, tag mismatch, or a wrong key. The error carries
    /// no key or ciphertext material.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, UmosError> {
        let envelope = BASE64
            .decode(ciphertext)
            .map_err(|_| UmosError::DecryptionFailed)?;
        if envelope.len() < NONCE_LEN + TAG_LEN {
            return Err(UmosError::DecryptionFailed);
        }
        let (nonce_bytes, sealed) = envelope.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);

        let plaintext = crypto::open(&self.key, &nonce, sealed)?;
        String::from_utf8(plaintext).map_err(|_| UmosError::DecryptionFailed)
    }

    /// Generates a fresh base64-encoded master key for deployment config.
    pub fn generate_master_key() -> Result<String, UmosError> {
        let key = Zeroizing::new(crypto::generate_random_key()?);
        Ok(BASE64.encode(key.as_slice()))
    }
}

/// Masks a secret for display: first two characters plus asterisks.
///
/// Used when printing effective configuration; never applied to plaintext
/// credentials, which are not displayed at all.
pub fn mask_secret(secret: &str) -> String {
    if secret.len() <= 4 {
        return "****".to_string();
    }
    let visible: String = secret.chars().take(2).collect();
    format!("{visible}{}", "*".repeat(secret.len() - 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_vault() -> Vault {
        let key = Vault::generate_master_key().unwrap();
        Vault::new(&SecretString::from(key)).unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let vault = test_vault();
        for plaintext in ["k", "coupang-access-key", "비밀-secret-값 with spaces"] {
            let ciphertext = vault.encrypt(plaintext).unwrap();
            assert_ne!(ciphertext, plaintext);
            assert_eq!(vault.decrypt(&ciphertext).unwrap(), plaintext);
        }
    }

    #[test]
    fn encrypt_rejects_empty_plaintext() {
        let vault = test_vault();
        assert!(matches!(
            vault.encrypt(""),
            Err(UmosError::InvalidInput(_))
        ));
    }

    #[test]
    fn decrypt_under_different_key_fails() {
        let vault_a = test_vault();
        let vault_b = test_vault();
        let ciphertext = vault_a.encrypt("api-secret").unwrap();
        assert!(matches!(
            vault_b.decrypt(&ciphertext),
            Err(UmosError::DecryptionFailed)
        ));
    }

    #[test]
    fn decrypt_rejects_garbage_and_truncated_input() {
        let vault = test_vault();
        for bad in ["not base64 at all!!", "AAAA", ""] {
            assert!(matches!(
                vault.decrypt(bad),
                Err(UmosError::DecryptionFailed)
            ));
        }
        // Valid base64 but shorter than nonce + tag.
        let short = BASE64.encode([0u8; 20]);
        assert!(matches!(
            vault.decrypt(&short),
            Err(UmosError::DecryptionFailed)
        ));
    }

    #[test]
    fn decrypt_rejects_tampered_envelope() {
        let vault = test_vault();
        let ciphertext = vault.encrypt("tamper-me").unwrap();
        let mut envelope = BASE64.decode(&ciphertext).unwrap();
        let last = envelope.len() - 1;
        envelope[last] ^= 0x01;
        let tampered = BASE64.encode(envelope);
        assert!(matches!(
            vault.decrypt(&tampered),
            Err(UmosError::DecryptionFailed)
        ));
    }

    #[test]
    fn malformed_master_key_is_a_config_error() {
        for bad in ["not base64!!", "c2hvcnQ="] {
            let result = Vault::new(&SecretString::from(bad.to_string()));
            assert!(matches!(result, Err(UmosError::Config(_))));
        }
    }

    #[test]
    fn mask_secret_hides_all_but_prefix() {
        assert_eq!(mask_secret("abcdefgh"), "ab******");
        assert_eq!(mask_secret("ab"), "****");
    }
}
