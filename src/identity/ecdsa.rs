//! ECDSA (NIST P-256) identities
//!
//! Signatures are fixed-size 64-byte `r || s` over SHA-256.

use std::fs;
use std::path::Path;

use p256::ecdsa::signature::{SignatureEncoding, Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rand::rngs::OsRng;

use super::{write_key_files, write_signature, Identity};
use crate::error::{Error, Result};

/// An ECDSA P-256 keypair.
///
/// Created empty by the registry; populate with
/// [`Identity::generate_random`] or [`Identity::import`]. The private
/// scalar is zeroized when the identity is dropped.
#[derive(Clone, Default)]
pub struct EcdsaIdentity {
    private_key: Option<SigningKey>,
    public_key: Option<VerifyingKey>,
}

impl EcdsaIdentity {
    /// Create an empty ECDSA identity.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Identity for EcdsaIdentity {
    fn scheme(&self) -> &'static str {
        "SHA-256"
    }

    fn generate_random(&mut self) -> Result<()> {
        let private = SigningKey::random(&mut OsRng);
        self.public_key = Some(VerifyingKey::from(&private));
        self.private_key = Some(private);
        Ok(())
    }

    fn import(&mut self, path: &Path, passphrase: &str) -> Result<()> {
        let bytes = fs::read(path)?;

        if let Ok(text) = std::str::from_utf8(&bytes) {
            if let Ok(public) = VerifyingKey::from_public_key_pem(text) {
                self.private_key = None;
                self.public_key = Some(public);
                return Ok(());
            }
        }

        match SigningKey::from_pkcs8_encrypted_der(&bytes, passphrase.as_bytes()) {
            Ok(private) => {
                self.public_key = Some(VerifyingKey::from(&private));
                self.private_key = Some(private);
                Ok(())
            }
            Err(e) => Err(Error::Import(e.to_string())),
        }
    }

    fn export(&self, path: &Path, passphrase: &str) -> Result<()> {
        let private = self.private_key.as_ref().ok_or(Error::NoPrivateKey)?;
        let public = self.public_key.as_ref().ok_or(Error::NoPublicKey)?;

        let der = private
            .to_pkcs8_encrypted_der(&mut OsRng, passphrase.as_bytes())
            .map_err(|e| Error::KeyEncoding(e.to_string()))?;
        let pem = public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| Error::KeyEncoding(e.to_string()))?;

        write_key_files(path, der.as_bytes(), &pem)
    }

    fn sign(&self, message: &[u8], sig_path: &Path) -> Result<String> {
        let private = self.private_key.as_ref().ok_or(Error::NoPrivateKey)?;
        let signature: Signature = private.sign(message);
        write_signature(sig_path, &signature.to_vec())
    }

    fn verify(&self, signature: &[u8], message: &[u8]) -> Result<bool> {
        let public = self.public_key.as_ref().ok_or(Error::NoPublicKey)?;
        let Ok(signature) = Signature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(public.verify(message, &signature).is_ok())
    }
}
