//! OpenPGP-family identities
//!
//! Four signature schemes selectable as `openpgp[:rsa]`, `openpgp:dsa`,
//! `openpgp:ecdsa` and `openpgp:eddsa`. Key files use the same
//! containers as the other families (encrypted PKCS#8 private keys, PEM
//! public keys); OpenPGP armoring and packet framing are out of scope.
//!
//! Each variant is a leaf implementation of [`Identity`] with its scheme
//! parameters fixed at construction: RSA signs PKCS#1 v1.5 over SHA-256,
//! DSA and ECDSA sign over SHA-256, EdDSA is pure Ed25519 (SHA-512
//! internally, never the prehashed variant).

use std::fs;
use std::path::Path;

use dsa::{Components, KeySize, Signature as DsaSignature};
use ed25519_dalek::Signature as Ed25519Signature;
use p256::ecdsa::Signature as EcdsaSignature;
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rand::rngs::OsRng;
use rsa::pkcs1v15::{
    Signature as RsaSignature, SigningKey as RsaSigningKey, VerifyingKey as RsaVerifyingKey,
};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use signature::{DigestSigner, DigestVerifier, SignatureEncoding, Signer, Verifier};

use super::{write_key_files, write_signature, Identity};
use crate::error::{Error, Result};

const RSA_KEY_BITS: usize = 2048;

/// OpenPGP RSA keypair, PKCS#1 v1.5 over SHA-256.
#[derive(Clone, Default)]
pub struct RsaIdentity {
    private_key: Option<RsaPrivateKey>,
    public_key: Option<RsaPublicKey>,
}

impl RsaIdentity {
    /// Create an empty OpenPGP RSA identity.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Identity for RsaIdentity {
    fn scheme(&self) -> &'static str {
        "PKCS1v15(SHA-256)"
    }

    fn generate_random(&mut self) -> Result<()> {
        let private = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
            .map_err(|e| Error::Crypto(e.to_string()))?;
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
        let signing_key = RsaSigningKey::<Sha256>::new(private.clone());
        let signature = signing_key
            .try_sign(message)
            .map_err(|e| Error::Crypto(e.to_string()))?;
        write_signature(sig_path, &signature.to_vec())
    }

    fn verify(&self, signature: &[u8], message: &[u8]) -> Result<bool> {
        let public = self.public_key.as_ref().ok_or(Error::NoPublicKey)?;
        let verifying_key = RsaVerifyingKey::<Sha256>::new(public.clone());
        let Ok(signature) = RsaSignature::try_from(signature) else {
            return Ok(false);
        };
        Ok(verifying_key.verify(message, &signature).is_ok())
    }
}

/// OpenPGP DSA keypair, 2048/256-bit parameters over SHA-256.
///
/// Signatures are DER-encoded `(r, s)` sequences with deterministic
/// RFC 6979 nonces.
#[derive(Clone, Default)]
pub struct DsaIdentity {
    private_key: Option<dsa::SigningKey>,
    public_key: Option<dsa::VerifyingKey>,
}

impl DsaIdentity {
    /// Create an empty OpenPGP DSA identity.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Identity for DsaIdentity {
    fn scheme(&self) -> &'static str {
        "SHA-256"
    }

    fn generate_random(&mut self) -> Result<()> {
        let components = Components::generate(&mut OsRng, KeySize::DSA_2048_256);
        let private = dsa::SigningKey::generate(&mut OsRng, components);
        self.public_key = Some(private.verifying_key().clone());
        self.private_key = Some(private);
        Ok(())
    }

    fn import(&mut self, path: &Path, passphrase: &str) -> Result<()> {
        let bytes = fs::read(path)?;

        if let Ok(text) = std::str::from_utf8(&bytes) {
            if let Ok(public) = dsa::VerifyingKey::from_public_key_pem(text) {
                self.private_key = None;
                self.public_key = Some(public);
                return Ok(());
            }
        }

        match dsa::SigningKey::from_pkcs8_encrypted_der(&bytes, passphrase.as_bytes()) {
            Ok(private) => {
                self.public_key = Some(private.verifying_key().clone());
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
        let signature: DsaSignature = private
            .try_sign_digest(Sha256::new_with_prefix(message))
            .map_err(|e| Error::Crypto(e.to_string()))?;
        write_signature(sig_path, &signature.to_vec())
    }

    fn verify(&self, signature: &[u8], message: &[u8]) -> Result<bool> {
        let public = self.public_key.as_ref().ok_or(Error::NoPublicKey)?;
        let Ok(signature) = DsaSignature::try_from(signature) else {
            return Ok(false);
        };
        Ok(public
            .verify_digest(Sha256::new_with_prefix(message), &signature)
            .is_ok())
    }
}

/// OpenPGP ECDSA keypair, NIST P-256 over SHA-256.
#[derive(Clone, Default)]
pub struct EcdsaIdentity {
    private_key: Option<p256::ecdsa::SigningKey>,
    public_key: Option<p256::ecdsa::VerifyingKey>,
}

impl EcdsaIdentity {
    /// Create an empty OpenPGP ECDSA identity.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Identity for EcdsaIdentity {
    fn scheme(&self) -> &'static str {
        "SHA-256"
    }

    fn generate_random(&mut self) -> Result<()> {
        let private = p256::ecdsa::SigningKey::random(&mut OsRng);
        self.public_key = Some(p256::ecdsa::VerifyingKey::from(&private));
        self.private_key = Some(private);
        Ok(())
    }

    fn import(&mut self, path: &Path, passphrase: &str) -> Result<()> {
        let bytes = fs::read(path)?;

        if let Ok(text) = std::str::from_utf8(&bytes) {
            if let Ok(public) = p256::ecdsa::VerifyingKey::from_public_key_pem(text) {
                self.private_key = None;
                self.public_key = Some(public);
                return Ok(());
            }
        }

        match p256::ecdsa::SigningKey::from_pkcs8_encrypted_der(&bytes, passphrase.as_bytes()) {
            Ok(private) => {
                self.public_key = Some(p256::ecdsa::VerifyingKey::from(&private));
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
        let signature: EcdsaSignature = private.sign(message);
        write_signature(sig_path, &signature.to_vec())
    }

    fn verify(&self, signature: &[u8], message: &[u8]) -> Result<bool> {
        let public = self.public_key.as_ref().ok_or(Error::NoPublicKey)?;
        let Ok(signature) = EcdsaSignature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(public.verify(message, &signature).is_ok())
    }
}

/// OpenPGP EdDSA keypair, pure Ed25519.
///
/// Uses the non-prehashed variant exclusively; the message itself is fed
/// to the SHA-512-based Ed25519 construction.
#[derive(Clone, Default)]
pub struct EddsaIdentity {
    private_key: Option<ed25519_dalek::SigningKey>,
    public_key: Option<ed25519_dalek::VerifyingKey>,
}

impl EddsaIdentity {
    /// Create an empty OpenPGP EdDSA identity.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Identity for EddsaIdentity {
    fn scheme(&self) -> &'static str {
        "SHA-512"
    }

    fn generate_random(&mut self) -> Result<()> {
        let private = ed25519_dalek::SigningKey::generate(&mut OsRng);
        self.public_key = Some(private.verifying_key());
        self.private_key = Some(private);
        Ok(())
    }

    fn import(&mut self, path: &Path, passphrase: &str) -> Result<()> {
        let bytes = fs::read(path)?;

        if let Ok(text) = std::str::from_utf8(&bytes) {
            if let Ok(public) = ed25519_dalek::VerifyingKey::from_public_key_pem(text) {
                self.private_key = None;
                self.public_key = Some(public);
                return Ok(());
            }
        }

        match ed25519_dalek::SigningKey::from_pkcs8_encrypted_der(&bytes, passphrase.as_bytes()) {
            Ok(private) => {
                self.public_key = Some(private.verifying_key());
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
        let signature = private.sign(message);
        write_signature(sig_path, &signature.to_bytes())
    }

    fn verify(&self, signature: &[u8], message: &[u8]) -> Result<bool> {
        let public = self.public_key.as_ref().ok_or(Error::NoPublicKey)?;
        let Ok(signature) = Ed25519Signature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(public.verify(message, &signature).is_ok())
    }
}
