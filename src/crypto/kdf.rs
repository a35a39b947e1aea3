//! Login key material.
//!
//! The gateway login used here sends a digest of the lowercased email (`uh`)
//! and keeps a digest of the password as the session's derived key. Which
//! digest is used is configurable: the plain hashes match what simple web
//! clients send, while [`KeyDerivation::Pbkdf2Sha512`] is a salted, iterated
//! derivation for deployments that need one.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

use crate::error::{ClientError, Result};

/// Digest algorithm used by [`KeyDeriver`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum KeyDerivation {
    /// Single SHA-256 pass.
    #[default]
    Sha256,
    /// Single SHA-512 pass.
    Sha512,
    /// PBKDF2-HMAC-SHA512 with a fixed salt, 32-byte output.
    Pbkdf2Sha512 { salt: String, iterations: u32 },
}

/// Derives login material from a password and an email address.
#[derive(Debug, Clone, Default)]
pub struct KeyDeriver {
    derivation: KeyDerivation,
}

impl KeyDeriver {
    pub fn new(derivation: KeyDerivation) -> Self {
        Self { derivation }
    }

    pub fn derivation(&self) -> &KeyDerivation {
        &self.derivation
    }

    /// Derive the password key.
    ///
    /// # Errors
    /// Returns [`ClientError::ConfigError`] for a PBKDF2 setup with zero iterations.
    pub fn derive_password_key(&self, password: &str) -> Result<Vec<u8>> {
        self.digest(password.as_bytes())
    }

    /// Hex digest of the lowercased email, sent as `uh` on login.
    pub fn email_hash(&self, email: &str) -> Result<String> {
        let normalized = email.to_lowercase();
        Ok(hex::encode(self.digest(normalized.as_bytes())?))
    }

    fn digest(&self, input: &[u8]) -> Result<Vec<u8>> {
        match &self.derivation {
            KeyDerivation::Sha256 => Ok(Sha256::digest(input).to_vec()),
            KeyDerivation::Sha512 => Ok(Sha512::digest(input).to_vec()),
            KeyDerivation::Pbkdf2Sha512 { salt, iterations } => {
                if *iterations == 0 {
                    return Err(ClientError::ConfigError(
                        "PBKDF2 iterations must be greater than 0".to_string(),
                    ));
                }
                let mut key = [0u8; 32];
                pbkdf2::<Hmac<Sha512>>(input, salt.as_bytes(), *iterations, &mut key)
                    .map_err(|_| ClientError::ConfigError("PBKDF2 failed".to_string()))?;
                Ok(key.to_vec())
            }
        }
    }
}
