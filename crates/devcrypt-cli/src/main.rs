use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use devcrypt::{Devcrypt, DevcryptConfig, FsStore, KeyPathConfig, PublicKey};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "devcrypt")]
#[command(about = "Devcrypt encrypts your development secrets")]
#[command(version)]
struct Cli {
    /// Config dir [default: platform config dir]/devcrypt
    #[arg(short = 'C', long, global = true, env = "DEVCRYPT_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Label for a new key [default: user@host]
    #[arg(short, long, global = true)]
    label: Option<String>,

    /// Path to private key [default: <config-dir>/devcrypt_key]
    #[arg(short, long, global = true, env = "DEVCRYPT_KEY")]
    key: Option<PathBuf>,

    /// Path to public key [default: <key>.pub]
    #[arg(short = 'K', long, global = true, env = "DEVCRYPT_PUBKEY")]
    pubkey: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key
    Keygen {
        /// Overwrite an existing key
        #[arg(short, long)]
        force: bool,
    },
    /// Encrypt a file
    Encrypt {
        input: PathBuf,
        /// Encrypted file output path [default: <input>.devcrypt]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decrypt a file
    Decrypt {
        input: PathBuf,
        /// Decrypted file output path [default: <input> without .devcrypt]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add public keys to an encrypted file
    Add {
        input: PathBuf,
        /// Public key files
        #[arg(required = true)]
        pubkeys: Vec<PathBuf>,
    },
    /// Remove public keys from an encrypted file
    Remove {
        input: PathBuf,
        /// Base64 keys or labels
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Rotate an encrypted file's file key
    Rotate { input: PathBuf },
    /// Show information about an encrypted file
    Info {
        input: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let key_paths = KeyPathConfig {
        config_dir: cli.config_dir,
        key: cli.key,
        pubkey: cli.pubkey,
    }
    .resolve()?;
    tracing::debug!(?key_paths, "resolved key paths");
    let devcrypt = Devcrypt::new(FsStore::new(), DevcryptConfig::new(key_paths));

    match cli.command {
        Commands::Keygen { force } => {
            let label = cli.label.unwrap_or_else(default_label);
            keygen(&devcrypt, &label, force)
        }
        Commands::Encrypt { input, output } => {
            let report = devcrypt
                .encrypt(&input, output.as_deref())
                .context("encrypting file")?;
            if report.changed {
                println!("Encrypted to {:?}", report.output);
            } else {
                println!("No change to {:?}", report.output);
            }
            Ok(())
        }
        Commands::Decrypt { input, output } => {
            let output = devcrypt
                .decrypt(&input, output.as_deref())
                .context("decrypting file")?;
            println!("Wrote to {output:?}");
            Ok(())
        }
        Commands::Add { input, pubkeys } => add(&devcrypt, &input, &pubkeys),
        Commands::Remove { input, keys } => {
            for public_key in devcrypt.remove(&input, keys.as_slice())? {
                println!("Removed public key:\n{public_key}\n");
            }
            println!("Updated {input:?}");
            Ok(())
        }
        Commands::Rotate { input } => {
            devcrypt.rotate(&input).context("rotating file key")?;
            println!("Updated {input:?}");
            Ok(())
        }
        Commands::Info { input, json } => info(&devcrypt, &input, json),
    }
}

fn keygen(devcrypt: &Devcrypt<FsStore>, label: &str, force: bool) -> Result<()> {
    println!("Generating key with label {label:?}...");
    let public_key = devcrypt.keygen(label, force)?;

    let paths = &devcrypt.config().key_paths;
    println!("Wrote private key to {:?}", paths.private_key);
    println!("Wrote public key to {:?}", paths.public_key);
    println!("Public key:\n{public_key}");
    Ok(())
}

fn add(devcrypt: &Devcrypt<FsStore>, input: &Path, pubkey_files: &[PathBuf]) -> Result<()> {
    let public_keys = pubkey_files
        .iter()
        .map(|path| {
            devcrypt
                .read_public_key(path)
                .with_context(|| format!("reading public key from {path:?}"))
        })
        .collect::<Result<Vec<PublicKey>>>()?;

    for public_key in &public_keys {
        println!("Adding public key labeled {:?}", public_key.label());
    }
    devcrypt.add(input, &public_keys)?;
    println!("Updated {input:?}");
    Ok(())
}

fn info(devcrypt: &Devcrypt<FsStore>, input: &Path, json: bool) -> Result<()> {
    let info = devcrypt.info(input)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let name = input.file_name().unwrap_or(input.as_os_str());
    println!("File {name:?}:");
    println!("  Original filename: {:?}", info.filename);
    match info.plaintext_size {
        Some(size) => println!("  Plaintext size: {size}"),
        None => println!("  Plaintext size: unknown (malformed ciphertext)"),
    }
    println!();
    println!("Public Keys:");
    for public_key in &info.recipients {
        println!("{public_key}");
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("devcrypt=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("devcrypt=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `user@host`, with the user from the environment.
fn default_label() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok();
    let host = hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().into_owned());
    label_from(user, host)
}

fn label_from(user: Option<String>, host: Option<String>) -> String {
    match (user, host) {
        (Some(user), Some(host)) if !user.is_empty() && !host.is_empty() => {
            format!("{user}@{host}")
        }
        (Some(user), _) => user,
        (None, _) => String::new(),
    }
}
