//! Orchestrator: identity provisioning plus per-entry dispatch
//!
//! Ties the registry, key store and resolver together for one
//! invocation: select the algorithm, load or lazily provision the
//! identity file, collect the inputs and sign or verify every entry in
//! order, reporting one line per entry.

use std::io::Write;
use std::path::PathBuf;

use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::registry::default_registry;
use crate::resolver::{Inputs, SIG_SUFFIX};
use crate::{algo, store};

/// Operating mode for one invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Produce a `.sig` file per input document
    Sign,
    /// Check `.sig` entries against their original documents
    Verify,
}

/// Resolved options for one invocation.
///
/// Built once by the CLI front end and passed through unchanged; there
/// is no global state.
pub struct Options {
    /// Requested algorithm id, canonicalized on use
    pub algorithm: String,
    pub mode: Mode,
    /// Explicit private identity path (`-i`), overrides the default
    pub identity_file: Option<PathBuf>,
    /// Explicit public key path (`-P`), overrides the default
    pub public_key_file: Option<PathBuf>,
    pub passphrase: Zeroizing<String>,
    /// File arguments in command-line order
    pub files: Vec<String>,
}

/// Execute one signing or verification run.
///
/// `stdin` is the captured piped input, if any; an empty capture counts
/// as absent. Reports go to `out`, one line per processed entry. The
/// first failure aborts the remaining work.
pub fn run(options: &Options, stdin: Option<Vec<u8>>, out: &mut dyn Write) -> Result<()> {
    let stdin = stdin.filter(|content| !content.is_empty());

    // at least one file or piped input is required, before any key work
    if options.files.is_empty() && stdin.is_none() {
        return Err(Error::Usage);
    }

    let algorithm = algo::canonicalize(&options.algorithm);
    debug!(
        "Algorithm: {algorithm}, Mode: {}",
        match options.mode {
            Mode::Sign => "Signature",
            Mode::Verify => "Verification",
        }
    );

    let mut identity = default_registry()
        .create(algorithm)
        .ok_or_else(|| Error::UnknownAlgorithm(algorithm.to_owned()))?;

    // signing reads the private identity file, verification the public
    // one; an explicit operator path always wins over the default
    let id_file = match options.mode {
        Mode::Sign => match &options.identity_file {
            Some(path) => path.clone(),
            None => store::identity_file(algorithm)?,
        },
        Mode::Verify => match &options.public_key_file {
            Some(path) => path.clone(),
            None => store::public_identity_file(algorithm)?,
        },
    };

    debug!(
        "Using identity file: {} ({})",
        id_file.display(),
        if id_file.exists() { "load" } else { "new" }
    );

    // lazy provisioning: first use of an algorithm creates its keypair
    if id_file.exists() {
        identity.import(&id_file, &options.passphrase)?;
    } else {
        identity.generate_random()?;
        identity.export(&id_file, &options.passphrase)?;
    }

    let inputs = Inputs::collect(&options.files, stdin)?;

    match options.mode {
        Mode::Sign => sign_all(identity.as_ref(), &inputs, out),
        Mode::Verify => verify_all(identity.as_ref(), &inputs, out),
    }
}

/// Sign every entry independently, in input order.
///
/// The signature lands next to the document as `{name}.sig`; for piped
/// input that is `stdin.sig` in the working directory. Documents whose
/// own name ends in `.sig` are signed like any other.
fn sign_all(identity: &dyn Identity, inputs: &Inputs, out: &mut dyn Write) -> Result<()> {
    for document in inputs.iter() {
        let sig_path = PathBuf::from(format!("{}{SIG_SUFFIX}", document.name));
        let signature = identity.sign(&document.content, &sig_path)?;
        writeln!(out, "Signature: {signature}")?;
    }
    Ok(())
}

/// Verify every `.sig` entry against its resolved original document.
///
/// Non-`.sig` entries only supply original content and are skipped. A
/// negative result is reported as `NOT OK` and does not abort the
/// batch; an unresolvable original aborts it, after the preceding
/// entries have been reported.
fn verify_all(identity: &dyn Identity, inputs: &Inputs, out: &mut dyn Write) -> Result<()> {
    for entry in inputs.iter() {
        if !entry.name.ends_with(SIG_SUFFIX) {
            continue;
        }

        let original = inputs.original_for(&entry.name)?;
        let verified = identity.verify(&entry.content, &original.content)?;
        writeln!(
            out,
            "Verified {}: {}",
            entry.name,
            if verified { "OK" } else { "NOT OK" }
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn options(mode: Mode, key: &Path, files: Vec<String>) -> Options {
        let key_path = Some(key.to_path_buf());
        Options {
            algorithm: "ecdsa".to_owned(),
            mode,
            identity_file: if mode == Mode::Sign {
                key_path.clone()
            } else {
                None
            },
            public_key_file: if mode == Mode::Verify { key_path } else { None },
            passphrase: Zeroizing::new("test-pass".to_owned()),
            files,
        }
    }

    fn write_doc(dir: &Path, name: &str, content: &[u8]) -> String {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_owned()
    }

    #[test]
    fn test_first_use_provisions_key_and_signs() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("id_ecdsa");
        let doc = write_doc(dir.path(), "report.txt", b"quarterly numbers");

        let mut out = Vec::new();
        run(
            &options(Mode::Sign, &key, vec![doc.clone()]),
            None,
            &mut out,
        )
        .unwrap();

        // keypair exported on first use
        assert!(key.exists());
        assert!(key.with_file_name("id_ecdsa.pub").exists());

        // signature file produced, hex reported
        let sig = format!("{doc}.sig");
        let raw = fs::read(&sig).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert_eq!(report, format!("Signature: {}\n", hex::encode(&raw)));

        // and it verifies against the public key
        let mut out = Vec::new();
        run(
            &options(
                Mode::Verify,
                &key.with_file_name("id_ecdsa.pub"),
                vec![doc, sig.clone()],
            ),
            None,
            &mut out,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Verified {sig}: OK\n")
        );
    }

    #[test]
    fn test_verify_falls_back_to_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("id_ecdsa");
        let doc = write_doc(dir.path(), "a", b"piped content");

        let mut out = Vec::new();
        run(&options(Mode::Sign, &key, vec![doc.clone()]), None, &mut out).unwrap();

        // keep only the signature; the original arrives on stdin
        let sig = format!("{doc}.sig");
        fs::remove_file(&doc).unwrap();

        let mut out = Vec::new();
        run(
            &options(
                Mode::Verify,
                &key.with_file_name("id_ecdsa.pub"),
                vec![sig.clone()],
            ),
            Some(b"piped content".to_vec()),
            &mut out,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Verified {sig}: OK\n")
        );
    }

    #[test]
    fn test_tampered_document_reports_not_ok_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("id_ecdsa");
        let good = write_doc(dir.path(), "good.txt", b"good");
        let bad = write_doc(dir.path(), "bad.txt", b"bad");

        let mut out = Vec::new();
        run(
            &options(Mode::Sign, &key, vec![good.clone(), bad.clone()]),
            None,
            &mut out,
        )
        .unwrap();

        // tamper with one document after signing
        fs::write(&bad, b"tampered").unwrap();

        let mut out = Vec::new();
        run(
            &options(
                Mode::Verify,
                &key.with_file_name("id_ecdsa.pub"),
                vec![
                    good.clone(),
                    bad.clone(),
                    format!("{good}.sig"),
                    format!("{bad}.sig"),
                ],
            ),
            None,
            &mut out,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Verified {good}.sig: OK\nVerified {bad}.sig: NOT OK\n")
        );
    }

    #[test]
    fn test_missing_original_aborts_after_preceding_reports() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("id_ecdsa");
        let doc = write_doc(dir.path(), "good.txt", b"good");

        let mut out = Vec::new();
        run(&options(Mode::Sign, &key, vec![doc.clone()]), None, &mut out).unwrap();

        // an orphan signature entry with no original and no stdin
        let orphan = write_doc(dir.path(), "b.sig", b"\x01\x02");

        let mut out = Vec::new();
        let err = run(
            &options(
                Mode::Verify,
                &key.with_file_name("id_ecdsa.pub"),
                vec![doc.clone(), format!("{doc}.sig"), orphan.clone()],
            ),
            None,
            &mut out,
        )
        .unwrap_err();

        match err {
            Error::MissingDocument(name) => assert_eq!(name, orphan),
            other => panic!("unexpected error: {other}"),
        }
        // the entry before the failure was still reported
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Verified {doc}.sig: OK\n")
        );
    }

    #[test]
    fn test_no_input_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("id_ecdsa");

        let mut out = Vec::new();
        let err = run(&options(Mode::Sign, &key, Vec::new()), None, &mut out).unwrap_err();
        assert!(matches!(err, Error::Usage));

        // empty stdin counts as absent, and no key was provisioned
        let err = run(
            &options(Mode::Sign, &key, Vec::new()),
            Some(Vec::new()),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Usage));
        assert!(!key.exists());
    }

    #[test]
    fn test_wrong_passphrase_fails_import() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("id_ecdsa");
        let doc = write_doc(dir.path(), "doc.txt", b"content");

        let mut out = Vec::new();
        run(&options(Mode::Sign, &key, vec![doc.clone()]), None, &mut out).unwrap();

        let mut opts = options(Mode::Sign, &key, vec![doc]);
        opts.passphrase = Zeroizing::new("not-the-passphrase".to_owned());

        let mut out = Vec::new();
        let err = run(&opts, None, &mut out).unwrap_err();
        assert!(matches!(err, Error::Import(_)));
        assert!(out.is_empty());
    }
}
