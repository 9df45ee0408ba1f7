//! Crate-wide error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while signing or verifying documents
#[derive(Error, Debug)]
pub enum Error {
    /// No document was provided, neither as a file argument nor on stdin
    #[error("No input document: pass a file argument or pipe data on stdin")]
    Usage,

    /// The identity file parsed neither as a public key nor as an
    /// encrypted private key
    #[error("Loading identity file failed ({0})")]
    Import(String),

    /// Export refused to overwrite an existing identity file
    #[error("Refusing to overwrite existing identity file: {}", .0.display())]
    Overwrite(PathBuf),

    /// An explicitly provided input file is missing or unreadable
    #[error("Provided document does not exist: {path}")]
    Input {
        /// Name of the file argument as passed on the command line
        path: String,
        source: std::io::Error,
    },

    /// Verification found a `.sig` entry with no resolvable original
    #[error("Missing document to verify signature: {0}")]
    MissingDocument(String),

    /// Sign was called on an identity without a private key
    #[error("Identity has no private key; generate or import one first")]
    NoPrivateKey,

    /// Verify was called on an identity without a public key
    #[error("Identity has no public key; generate or import one first")]
    NoPublicKey,

    /// The algorithm id has no registered constructor
    #[error("Unsupported algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Key generation or signing failed inside a provider crate
    #[error("Signature operation failed: {0}")]
    Crypto(String),

    /// Key material could not be encoded for storage
    #[error("Key encoding failed: {0}")]
    KeyEncoding(String),

    /// Filesystem or terminal I/O outside of explicit input files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for all dsig operations
pub type Result<T> = std::result::Result<T, Error>;
