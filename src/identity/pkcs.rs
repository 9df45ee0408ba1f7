//! PKCS (RSA) identities
//!
//! 2048-bit RSA with the PKCS#1 v1.5 signature scheme over SHA-256.

use std::fs;
use std::path::Path;

use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rand::rngs::OsRng;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use signature::{SignatureEncoding, Signer, Verifier};

use super::{write_key_files, write_signature, Identity};
use crate::error::{Error, Result};

const KEY_BITS: usize = 2048;

/// An RSA keypair using the PKCS#1 v1.5 signature scheme.
///
/// The private key is zeroized when the identity is dropped.
#[derive(Clone, Default)]
pub struct PkcsIdentity {
    private_key: Option<RsaPrivateKey>,
    public_key: Option<RsaPublicKey>,
}

impl PkcsIdentity {
    /// Create an empty PKCS identity.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Identity for PkcsIdentity {
    fn scheme(&self) -> &'static str {
        "PKCS1v15(SHA-256)"
    }

    fn generate_random(&mut self) -> Result<()> {
        let private =
            RsaPrivateKey::new(&mut OsRng, KEY_BITS).map_err(|e| Error::Crypto(e.to_string()))?;
        self.public_key = Some(RsaPublicKey::from(&private));
        self.private_key = Some(private);
        Ok(())
    }

    fn import(&mut self, path: &Path, passphrase: &str) -> Result<()> {
        let bytes = fs::read(path)?;

        if let Ok(text) = std::str::from_utf8(&bytes) {
            if let Ok(public) = RsaPublicKey::from_public_key_pem(text) {
                self.private_key = None;
                self.public_key = Some(public);
                return Ok(());
            }
        }

        match RsaPrivateKey::from_pkcs8_encrypted_der(&bytes, passphrase.as_bytes()) {
            Ok(private) => {
                self.public_key = Some(RsaPublicKey::from(&private));
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
        let signing_key = SigningKey::<Sha256>::new(private.clone());
        let signature = signing_key
            .try_sign(message)
            .map_err(|e| Error::Crypto(e.to_string()))?;
        write_signature(sig_path, &signature.to_vec())
    }

    fn verify(&self, signature: &[u8], message: &[u8]) -> Result<bool> {
        let public = self.public_key.as_ref().ok_or(Error::NoPublicKey)?;
        let verifying_key = VerifyingKey::<Sha256>::new(public.clone());
        let Ok(signature) = Signature::try_from(signature) else {
            return Ok(false);
        };
        Ok(verifying_key.verify(message, &signature).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut identity = PkcsIdentity::new();
        identity.generate_random().unwrap();

        let sig_path = dir.path().join("doc.sig");
        let hex = identity.sign(b"rsa payload", &sig_path).unwrap();
        let raw = fs::read(&sig_path).unwrap();

        assert_eq!(hex::encode(&raw), hex);
        assert!(identity.verify(&raw, b"rsa payload").unwrap());
        assert!(!identity.verify(&raw, b"tampered payload").unwrap());
        assert!(!identity.verify(b"junk", b"rsa payload").unwrap());

        // persist, reload with the private key and with the public half only
        let key_path = dir.path().join("id_rsa");
        identity.export(&key_path, "secret").unwrap();

        let mut reloaded = PkcsIdentity::new();
        reloaded.import(&key_path, "secret").unwrap();
        assert!(reloaded.verify(&raw, b"rsa payload").unwrap());

        let mut public_only = PkcsIdentity::new();
        public_only
            .import(&super::super::public_path(&key_path), "")
            .unwrap();
        assert!(public_only.verify(&raw, b"rsa payload").unwrap());
        assert!(matches!(
            public_only.sign(b"rsa payload", &sig_path).unwrap_err(),
            Error::NoPrivateKey
        ));
    }

    #[test]
    fn test_export_refuses_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("id_rsa");
        fs::write(&key_path, b"keep me").unwrap();

        let mut identity = PkcsIdentity::new();
        identity.generate_random().unwrap();

        let err = identity.export(&key_path, "secret").unwrap_err();
        assert!(matches!(err, Error::Overwrite(_)));
        assert_eq!(fs::read(&key_path).unwrap(), b"keep me");
    }
}
