//! dsig command-line front end
//!
//! Parses the flag set, captures piped input when the operand is
//! expected on stdin, acquires the passphrase and hands an immutable
//! option set to the orchestrator. Exit code 0 on success, 1 on usage
//! or runtime errors.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use dsig::resolver::wants_stdin;
use dsig::run::{run, Mode, Options};

/// Sign or verify documents using digital-signature algorithms
#[derive(Parser)]
#[command(
    name = "dsig",
    disable_version_flag = true,
    after_help = "EXAMPLES:\n  \
        dsig path/to/document\n  \
        echo 'Hello, World!' | dsig\n  \
        cat path/to/document | dsig -c path/to/signature.sig"
)]
struct Cli {
    /// Print version information
    #[arg(short = 'v')]
    version: bool,

    /// Enable verification mode for digital signatures
    #[arg(short = 'c')]
    check: bool,

    /// Enable debug diagnostics
    #[arg(short = 'D')]
    debug: bool,

    /// Suppress diagnostics even when -D is set
    #[arg(short = 'q')]
    quiet: bool,

    /// Identity file to use in signing mode (e.g. ~/.dsig/id_rsa)
    #[arg(short = 'i', value_name = "id_file")]
    identity: Option<PathBuf>,

    /// Public key file to use in verification mode (e.g. ~/.dsig/id_rsa.pub)
    #[arg(short = 'P', value_name = "pub_key")]
    public_key: Option<PathBuf>,

    /// Signature algorithm: ecdsa, pkcs or openpgp[:rsa|dsa|ecdsa|eddsa]
    #[arg(short = 'a', value_name = "algo")]
    algorithm: Option<String>,

    /// Passphrase for the identity file; absent or "-" prompts for one
    #[arg(short = 'p', value_name = "passphrase")]
    passphrase: Option<String>,

    /// Documents to sign, or signatures and documents to verify
    #[arg(value_name = "file")]
    files: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!("dsig v{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let level = if cli.debug && !cli.quiet {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .without_time()
        .init();

    // the operand arrives on stdin when no file was given, or when the
    // only file is a signature to verify
    let stdin = if wants_stdin(&cli.files) {
        let mut buffer = Vec::new();
        if let Err(e) = io::stdin().read_to_end(&mut buffer) {
            eprintln!("An error occurred: {e}");
            process::exit(1);
        }
        Some(buffer)
    } else {
        None
    };

    // at least one file or piped input is required
    if cli.files.is_empty() && stdin.as_deref().map_or(true, |b| b.is_empty()) {
        let _ = Cli::command().print_help();
        process::exit(1);
    }

    let passphrase = match cli.passphrase.as_deref() {
        Some(pass) if !pass.is_empty() && pass != "-" => Zeroizing::new(pass.to_owned()),
        _ => match rpassword::prompt_password("Enter your password: ") {
            Ok(pass) => Zeroizing::new(pass),
            Err(e) => {
                eprintln!("An error occurred: {e}");
                process::exit(1);
            }
        },
    };

    let options = Options {
        algorithm: cli.algorithm.unwrap_or_default(),
        mode: if cli.check { Mode::Verify } else { Mode::Sign },
        identity_file: cli.identity,
        public_key_file: cli.public_key,
        passphrase,
        files: cli.files,
    };

    let stdout = io::stdout();
    if let Err(e) = run(&options, stdin, &mut stdout.lock()) {
        eprintln!("An error occurred: {e}");
        process::exit(1);
    }
}
