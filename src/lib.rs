//! # dsig
//!
//! Sign and verify documents with a choice of digital-signature
//! algorithms, persisting keys to predictable per-user locations.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use dsig::identity::{EcdsaIdentity, Identity};
//! use std::path::Path;
//!
//! let mut identity = EcdsaIdentity::new();
//! identity.generate_random()?;
//!
//! // sign a document, keep the raw signature next to it
//! let hex = identity.sign(b"hello, world", Path::new("hello.sig"))?;
//! println!("Signature: {hex}");
//!
//! // anyone with the public key can verify
//! let raw = std::fs::read("hello.sig")?;
//! assert!(identity.verify(&raw, b"hello, world")?);
//! # Ok::<(), dsig::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`registry`]: maps algorithm ids to identity constructors
//! - [`identity`]: the `Identity` contract and its variants (ECDSA,
//!   PKCS/RSA, and the OpenPGP RSA/DSA/ECDSA/EdDSA family)
//! - [`store`]: per-user key-file locations for lazy provisioning
//! - [`resolver`]: document/signature pairing over file and stdin inputs
//! - [`run`]: the orchestrator driving one sign/verify invocation

pub mod algo;
pub mod error;
pub mod identity;
pub mod registry;
pub mod resolver;
pub mod run;
pub mod store;

pub use error::{Error, Result};
pub use identity::Identity;
pub use registry::{default_registry, Registry};
pub use resolver::Inputs;
pub use run::{Mode, Options};
