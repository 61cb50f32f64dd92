// ABOUTME: Symmetric key context used to decrypt encrypted READ payloads
// ABOUTME: AES-256-GCM with a random nonce prepended, transported as base64
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payload encryption context
//!
//! Wire format of an encrypted payload: `base64(nonce[12] || ciphertext || tag)`.
//! The plaintext is the JSON serialization of the payload value.

use crate::constants::{crypto, env_config};
use crate::errors::{AppError, AppResult};
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use base64::{engine::general_purpose, Engine};
use rand::RngCore;
use serde::Serialize;
use std::env;
use std::fmt;
use tracing::info;
use zeroize::Zeroize;

/// Symmetric key used for payload encryption and decryption
#[derive(Clone)]
pub struct CryptoContext {
    key: [u8; crypto::KEY_LEN],
}

impl CryptoContext {
    /// Create a context from raw key bytes
    #[must_use]
    pub const fn from_bytes(key: [u8; crypto::KEY_LEN]) -> Self {
        Self { key }
    }

    /// Create a context from a base64-encoded 32-byte key
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the value is not base64 or not exactly 32 bytes
    pub fn from_base64(encoded_key: &str) -> AppResult<Self> {
        let mut key_bytes = general_purpose::STANDARD
            .decode(encoded_key.trim())
            .map_err(|e| AppError::config_invalid(format!("Invalid base64 payload key: {e}")))?;

        if key_bytes.len() != crypto::KEY_LEN {
            let len = key_bytes.len();
            key_bytes.zeroize();
            return Err(AppError::config_invalid(format!(
                "Payload key must be exactly {} bytes, got {len} bytes",
                crypto::KEY_LEN
            )));
        }

        let mut key = [0u8; crypto::KEY_LEN];
        key.copy_from_slice(&key_bytes);
        key_bytes.zeroize();
        Ok(Self { key })
    }

    /// Load the key from `RECRUIT_PAYLOAD_KEY`
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` if the variable is unset, or `ConfigInvalid` if malformed
    pub fn from_env() -> AppResult<Self> {
        let encoded = env::var(env_config::PAYLOAD_KEY)
            .map_err(|_| AppError::config_missing(env_config::PAYLOAD_KEY))?;
        info!("Loading payload key from environment variable");
        Self::from_base64(&encoded)
    }

    /// Generate a random key (tests and local development)
    #[must_use]
    pub fn generate() -> Self {
        let mut key = [0u8; crypto::KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        Self { key }
    }

    /// Base64 form of the key, suitable for `RECRUIT_PAYLOAD_KEY`
    #[must_use]
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.key)
    }

    /// Encrypt bytes into the base64 wire format
    ///
    /// # Errors
    ///
    /// Returns `DecryptionFailed` if the cipher rejects the input
    pub fn encrypt(&self, plaintext: &[u8]) -> AppResult<String> {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));

        let mut nonce_bytes = [0u8; crypto::NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = GenericArray::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| AppError::decryption(format!("Encryption failed: {e}")))?;

        let mut sealed = Vec::with_capacity(crypto::NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(general_purpose::STANDARD.encode(sealed))
    }

    /// Decrypt a base64 wire-format payload into bytes
    ///
    /// # Errors
    ///
    /// Returns `DecryptionFailed` if the input is not base64, is too short to hold
    /// a nonce, or fails authentication under this key
    pub fn decrypt(&self, encoded: &str) -> AppResult<Vec<u8>> {
        let sealed = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| AppError::decryption(format!("Ciphertext is not valid base64: {e}")))?;

        if sealed.len() <= crypto::NONCE_LEN {
            return Err(AppError::decryption("Encrypted payload too short"));
        }

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));
        let (nonce_bytes, ciphertext) = sealed.split_at(crypto::NONCE_LEN);

        cipher
            .decrypt(GenericArray::from_slice(nonce_bytes), ciphertext)
            .map_err(|e| AppError::decryption(format!("Decryption failed: {e}")))
    }

    /// Serialize a value to JSON and encrypt it
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or encryption fails
    pub fn encrypt_json<T: Serialize>(&self, value: &T) -> AppResult<String> {
        let plaintext = serde_json::to_vec(value)?;
        self.encrypt(&plaintext)
    }

    /// Decrypt a payload and parse the plaintext as JSON
    ///
    /// # Errors
    ///
    /// Returns `DecryptionFailed` for bad ciphertext, `SerializationError` if the
    /// plaintext is not JSON
    pub fn decrypt_json(&self, encoded: &str) -> AppResult<serde_json::Value> {
        let mut plaintext = self.decrypt(encoded)?;
        let parsed = serde_json::from_slice(&plaintext).map_err(|e| {
            AppError::serialization(format!("Decrypted payload is not valid JSON: {e}"))
        });
        plaintext.zeroize();
        parsed
    }
}

impl fmt::Debug for CryptoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoContext")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl Drop for CryptoContext {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_json_round_trip() {
        let ctx = CryptoContext::generate();
        let value = json!({"athletes": [{"id": 7, "name": "Sam"}]});
        let sealed = ctx.encrypt_json(&value).unwrap();
        assert_eq!(ctx.decrypt_json(&sealed).unwrap(), value);
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let sealed = CryptoContext::generate().encrypt(b"secret").unwrap();
        let err = CryptoContext::generate().decrypt(&sealed).unwrap_err();
        assert_eq!(err.code, ErrorCode::DecryptionFailed);
    }

    #[test]
    fn test_non_base64_and_short_input_rejected() {
        let ctx = CryptoContext::generate();
        assert_eq!(
            ctx.decrypt("not base64!!").unwrap_err().code,
            ErrorCode::DecryptionFailed
        );
        let short = general_purpose::STANDARD.encode([0u8; 8]);
        assert_eq!(
            ctx.decrypt(&short).unwrap_err().code,
            ErrorCode::DecryptionFailed
        );
    }

    #[test]
    fn test_decrypted_non_json_is_serialization_error() {
        let ctx = CryptoContext::generate();
        let sealed = ctx.encrypt(b"plain words").unwrap();
        assert_eq!(
            ctx.decrypt_json(&sealed).unwrap_err().code,
            ErrorCode::SerializationError
        );
    }

    #[test]
    fn test_base64_key_round_trip() {
        let ctx = CryptoContext::generate();
        let restored = CryptoContext::from_base64(&ctx.to_base64()).unwrap();
        let sealed = ctx.encrypt(b"x").unwrap();
        assert_eq!(restored.decrypt(&sealed).unwrap(), b"x");
    }

    #[test]
    fn test_key_length_validated() {
        let short = general_purpose::STANDARD.encode([1u8; 16]);
        let err = CryptoContext::from_base64(&short).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", CryptoContext::from_bytes([9u8; 32]));
        assert!(rendered.contains("REDACTED"));
    }
}
