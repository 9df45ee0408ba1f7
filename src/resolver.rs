//! Input resolution and document/signature pairing
//!
//! Builds an ordered name→content mapping from the file arguments plus
//! optionally captured stdin, and (in verification mode) pairs each
//! `.sig` entry with its original document: a sibling entry named
//! without the suffix, or the stdin entry as fallback.

use std::fs;

use crate::error::{Error, Result};

/// Suffix marking a signature file
pub const SIG_SUFFIX: &str = ".sig";

/// Logical name reserved for piped input
pub const STDIN_NAME: &str = "stdin";

/// A named input document with its full byte content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Input path as given on the command line, or `"stdin"`
    pub name: String,
    /// Full content
    pub content: Vec<u8>,
}

/// Ordered collection of input documents.
///
/// Iteration follows insertion order of the file arguments; the stdin
/// entry, when captured, comes last.
#[derive(Debug, Default)]
pub struct Inputs {
    entries: Vec<Document>,
}

/// Whether stdin should be captured for this set of file arguments.
///
/// True when no file was given (the document arrives on stdin), or when
/// exactly one file was given and it is a `.sig` file (the signed
/// content arrives on stdin).
pub fn wants_stdin(files: &[String]) -> bool {
    files.is_empty() || (files.len() == 1 && files[0].ends_with(SIG_SUFFIX))
}

impl Inputs {
    /// Read every file argument in full and append captured stdin.
    ///
    /// A missing or unreadable file argument is fatal and names the
    /// offending path. An empty `stdin` capture is treated as absent.
    pub fn collect(files: &[String], stdin: Option<Vec<u8>>) -> Result<Self> {
        let mut entries = Vec::with_capacity(files.len() + 1);

        for name in files {
            let content = fs::read(name).map_err(|source| Error::Input {
                path: name.clone(),
                source,
            })?;
            entries.push(Document {
                name: name.clone(),
                content,
            });
        }

        if let Some(content) = stdin.filter(|content| !content.is_empty()) {
            entries.push(Document {
                name: STDIN_NAME.to_owned(),
                content,
            });
        }

        Ok(Self { entries })
    }

    /// True when no document was collected at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.entries.iter()
    }

    /// Look up a document by its exact name.
    pub fn get(&self, name: &str) -> Option<&Document> {
        self.entries.iter().find(|document| document.name == name)
    }

    /// Resolve the original document for the signature entry `sig_name`.
    ///
    /// Looks up the name with the `.sig` suffix stripped, then falls
    /// back to the stdin entry. Failing both is a
    /// [`Error::MissingDocument`] naming the signature entry.
    pub fn original_for(&self, sig_name: &str) -> Result<&Document> {
        let document_name = sig_name.strip_suffix(SIG_SUFFIX).unwrap_or(sig_name);

        self.get(document_name)
            .or_else(|| self.get(STDIN_NAME))
            .ok_or_else(|| Error::MissingDocument(sig_name.to_owned()))
    }
}
