//! Identity variants: one private/public keypair per signature algorithm
//!
//! Every supported algorithm family implements the [`Identity`] trait as
//! a direct leaf type. An identity starts empty and is populated exactly
//! once per run, either by [`Identity::generate_random`] or by
//! [`Identity::import`]. Private-key handles zeroize their key material
//! on drop.
//!
//! Key files use two containers: private keys are passphrase-encrypted
//! PKCS#8 DER (binary), public keys are SPKI PEM (text) stored next to
//! the private key with a `.pub` suffix.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub mod ecdsa;
pub mod openpgp;
pub mod pkcs;

pub use ecdsa::EcdsaIdentity;
pub use pkcs::PkcsIdentity;

/// Suffix appended to a private key path for the public half
pub const PUB_SUFFIX: &str = ".pub";

/// A signing/verification identity bound to one algorithm family.
///
/// The hash (and, for RSA, padding) parameters are fixed at construction
/// and immutable afterwards; [`Identity::scheme`] names them.
pub trait Identity {
    /// Human-readable signature scheme, e.g. `"PKCS1v15(SHA-256)"`.
    fn scheme(&self) -> &'static str;

    /// Replace any existing key material with a fresh random keypair.
    fn generate_random(&mut self) -> Result<()>;

    /// Load key material from `path`.
    ///
    /// Tries, in order: an unencrypted public-key PEM (populates only
    /// the public key), then a passphrase-encrypted PKCS#8 private key
    /// (populates the private key and derives the public key). When both
    /// fail the error carries the private-key decode diagnostic.
    fn import(&mut self, path: &Path, passphrase: &str) -> Result<()>;

    /// Persist the private key (encrypted with `passphrase`) to `path`
    /// and the public key to `path + ".pub"`.
    ///
    /// Fails with [`Error::Overwrite`] when `path` already exists; the
    /// existing file is left untouched.
    fn export(&self, path: &Path, passphrase: &str) -> Result<()>;

    /// Sign `message`, write the raw signature bytes to `sig_path` and
    /// return their hexadecimal rendering.
    ///
    /// Requires a private key.
    fn sign(&self, message: &[u8], sig_path: &Path) -> Result<String>;

    /// Check `signature` against `message` with the public key.
    ///
    /// A mismatching or undecodable signature is a normal `false`.
    fn verify(&self, signature: &[u8], message: &[u8]) -> Result<bool>;
}

/// Path of the public-key file colocated with a private key path.
pub(crate) fn public_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(PUB_SUFFIX);
    PathBuf::from(name)
}

/// Write the private (encrypted DER) and public (PEM) key files.
///
/// The overwrite check and the write are not atomic; concurrent
/// first-run provisioning of the same path is unsynchronized.
pub(crate) fn write_key_files(path: &Path, private_der: &[u8], public_pem: &str) -> Result<()> {
    if path.exists() {
        return Err(Error::Overwrite(path.to_path_buf()));
    }
    fs::write(path, private_der)?;
    fs::write(public_path(path), public_pem)?;
    Ok(())
}

/// Write raw signature bytes to `sig_path` and return their hex form.
pub(crate) fn write_signature(sig_path: &Path, signature: &[u8]) -> Result<String> {
    fs::write(sig_path, signature)?;
    Ok(hex::encode(signature))
}
