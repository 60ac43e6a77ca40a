//! At-rest encryption for personal transcript-provider credentials.
//!
//! Credentials are encrypted with AES-256-CBC (PKCS#7 padding) under a key derived
//! by SHA-256 from a service-wide secret. Each encryption draws a fresh random IV.
//! The stored form is `base64(iv) + ":" + base64(ciphertext)`.

use std::fmt;

use aes::Aes256;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const IV_LEN: usize = 16;
const SEPARATOR: char = ':';

/// Errors from [`CredentialCipher::decrypt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CipherError {
    /// The input is not two `:`-separated parts.
    #[error("invalid encrypted credential format")]
    InvalidFormat,

    /// Base64 decoding, the block cipher, padding or UTF-8 decoding failed.
    #[error("failed to decrypt credential")]
    Decryption,
}

/// Symmetric cipher for stored credentials.
#[derive(Clone)]
pub struct CredentialCipher {
    key: [u8; 32],
}

impl fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCipher")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl CredentialCipher {
    /// Derive the cipher key from `secret`.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            key: Sha256::digest(secret.as_bytes()).into(),
        }
    }

    /// Encrypt a credential under a fresh random IV.
    #[must_use]
    pub fn encrypt(&self, plaintext: &str) -> String {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        format!(
            "{}{SEPARATOR}{}",
            BASE64.encode(iv),
            BASE64.encode(ciphertext)
        )
    }

    /// Decrypt a credential produced by [`CredentialCipher::encrypt`].
    ///
    /// # Errors
    ///
    /// - `CipherError::InvalidFormat` if `encoded` does not split into exactly two parts.
    /// - `CipherError::Decryption` for bad base64, a wrong key or corrupted data.
    pub fn decrypt(&self, encoded: &str) -> Result<String, CipherError> {
        let mut parts = encoded.split(SEPARATOR);
        let (Some(iv_b64), Some(ciphertext_b64), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CipherError::InvalidFormat);
        };

        let iv = BASE64
            .decode(iv_b64)
            .map_err(|_| CipherError::Decryption)?;
        let ciphertext = BASE64
            .decode(ciphertext_b64)
            .map_err(|_| CipherError::Decryption)?;

        let plaintext = Aes256CbcDec::new_from_slices(&self.key, &iv)
            .map_err(|_| CipherError::Decryption)?
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CipherError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::Decryption)
    }
}
