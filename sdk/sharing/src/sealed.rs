//! Payload sealing with the split key.
//!
//! The sharing engine never touches the payload itself; callers inject
//! a [`PayloadCipher`] capability. The shipped implementation seals
//! with ChaCha20-Poly1305 and a random 12-byte nonce prepended to the
//! ciphertext. Because the mode is an AEAD, unsealing under a wrong
//! reconstructed key fails outright instead of returning garbage
//! plaintext; the engine's fragment consistency checks remain the
//! primary defense.

use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit},
};
use rand::RngCore;

use crate::error::ShareError;

/// ChaCha20-Poly1305 nonce length
pub const NONCE_LEN: usize = 12;

/// Symmetric encryption capability injected into callers of the
/// sharing engine
pub trait PayloadCipher {
    /// Encrypt `plaintext` under a 32-byte key
    fn encrypt(&self, key: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, ShareError>;

    /// Decrypt `ciphertext` under a 32-byte key, failing with
    /// `DecryptionFailed` when the ciphertext is malformed or the key
    /// is wrong
    fn decrypt(&self, key: &[u8; 32], ciphertext: &[u8]) -> Result<Vec<u8>, ShareError>;
}

/// ChaCha20-Poly1305 payload cipher, nonce prepended to the ciphertext
#[derive(Debug, Clone, Default)]
pub struct ChaChaPayloadCipher;

impl PayloadCipher for ChaChaPayloadCipher {
    fn encrypt(&self, key: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, ShareError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let cipher =
            ChaCha20Poly1305::new_from_slice(key).map_err(|_| ShareError::DecryptionFailed)?;
        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| ShareError::DecryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn decrypt(&self, key: &[u8; 32], ciphertext: &[u8]) -> Result<Vec<u8>, ShareError> {
        if ciphertext.len() < NONCE_LEN {
            return Err(ShareError::DecryptionFailed);
        }
        let (nonce_bytes, body) = ciphertext.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let cipher =
            ChaCha20Poly1305::new_from_slice(key).map_err(|_| ShareError::DecryptionFailed)?;
        cipher
            .decrypt(nonce, body)
            .map_err(|_| ShareError::DecryptionFailed)
    }
}
