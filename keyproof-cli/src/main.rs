//! keyproof CLI
//!
//! Command-line interface for verifying hardware wallet signed messages and
//! converting private keys between chains.

mod output;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Password;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use keyproof_attest::{parse_file, run_selftest, verify_attestation};
use keyproof_core::constants::SECRET_KEY_SIZE;
use keyproof_core::types::PrivateKeyRecord;
use keyproof_core::{Network, BITCOIN};
use keyproof_crypto::{
    decode_wif, derive_addresses, derive_from_material, public_key_from_secret, verify_message,
    WifExt,
};

use output::{write_address_table, write_selftest, KeyConversion, SignatureReport};

/// keyproof - signed-message verification and key conversion for hardware wallets
#[derive(Parser)]
#[command(name = "keyproof")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging and output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true, env = "KEYPROOF_JSON")]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recover the signer of a message and list all of its addresses
    Sigtoaddr {
        /// Path to a device verify.txt, instead of address/signature/message
        #[arg(long, env = "KEYPROOF_VERIFY_TXT", conflicts_with_all = ["signature", "message"])]
        verify_txt: Option<PathBuf>,

        /// Bitcoin or Litecoin address
        #[arg(short, long, required_unless_present = "verify_txt")]
        address: Option<String>,

        /// Base64 compact signature
        #[arg(short, long, required_unless_present = "verify_txt")]
        signature: Option<String>,

        /// Message that was signed
        #[arg(short, long, required_unless_present = "verify_txt")]
        message: Option<String>,
    },

    /// Re-encode a private key for every supported chain
    Keyconv {
        /// WIF key or 64-character hex secret (prompted for if omitted)
        key: Option<String>,

        /// Also derive the key's addresses
        #[arg(short, long)]
        addresses: bool,
    },

    /// Run the built-in known-answer checks
    Selftest,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "keyproof=debug,info"
    } else {
        "keyproof=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Sigtoaddr {
            verify_txt,
            address,
            signature,
            message,
        } => cmd_sigtoaddr(verify_txt, address, signature, message, cli.verbose, cli.json),
        Commands::Keyconv { key, addresses } => cmd_keyconv(key, addresses, cli.verbose, cli.json),
        Commands::Selftest => cmd_selftest(cli.json),
    }
}

/// Verify a signed message and print the signer's addresses
fn cmd_sigtoaddr(
    verify_txt: Option<PathBuf>,
    address: Option<String>,
    signature: Option<String>,
    message: Option<String>,
    verbose: bool,
    json: bool,
) -> Result<()> {
    // Refuse to vouch for anything if the known answers are wrong
    let report = run_selftest();
    if !report.all_passed() {
        bail!("self-test failed ({} checks); refusing to verify", report.failure_count());
    }

    let verified = if let Some(path) = verify_txt {
        let record = parse_file(&path)
            .with_context(|| format!("Unable to parse {}", path.display()))?;
        if let Some(claimed) = address.as_deref() {
            if claimed != record.address {
                bail!(
                    "address {} does not match {} in {}",
                    claimed,
                    record.address,
                    path.display()
                );
            }
        }
        verify_attestation(&record).context("Unable to verify signature")?
    } else {
        let address = address.context("--address is required without --verify-txt")?;
        let signature = signature.context("--signature is required without --verify-txt")?;
        let message = message.context("--message is required without --verify-txt")?;
        verify_message(&address, &signature, &message).context("Unable to verify signature")?
    };
    debug!(public_key = %verified.public_key_hex, "Verified signed message");

    let addresses = derive_addresses(&verified.public_key_hex)
        .context("Failed to make addresses")?;
    if !addresses.contains(&verified.address) {
        bail!("derived addresses do not include {}", verified.address);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        let report = SignatureReport {
            verified: &verified,
            addresses: &addresses,
        };
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{} {}", "✅ Signature valid for".green().bold(), verified.address)?;
    if verbose {
        writeln!(out, "{} {}", "Public key hex:".dimmed(), verified.public_key_hex)?;
        writeln!(out, "{} {:?}", "Message:".dimmed(), verified.message_text())?;
    }
    writeln!(out)?;
    write_address_table(&mut out, &verified.address, &addresses)?;

    Ok(())
}

/// Re-encode a private key for every supported chain
fn cmd_keyconv(key: Option<String>, make_addresses: bool, verbose: bool, json: bool) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => Password::new()
            .with_prompt("Private Key WIF")
            .interact()
            .context("Failed to read private key")?,
    };
    let key = key.trim();

    let (original, record) = if is_hex_secret(key) {
        // raw secrets are treated as uncompressed Bitcoin keys
        let record = PrivateKeyRecord::from_secret_hex(Network::Bitcoin, key, false)
            .context("Invalid hex secret")?;
        (record.to_wif(&BITCOIN, false), record)
    } else {
        let record = decode_wif(key).context("Invalid WIF key")?;
        (key.to_string(), record)
    };

    let mut conversion = KeyConversion::new(&original, &record, verbose);
    if make_addresses {
        let public_key = public_key_from_secret(record.secret()).context("Failed to make private key")?;
        let addresses = derive_from_material(&public_key).context("Failed to make addresses")?;
        conversion = conversion.with_addresses(addresses);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &conversion)?;
        writeln!(out)?;
    } else {
        conversion.write_text(&mut out)?;
        writeln!(out)?;
        writeln!(out, "{}", "⚠️  Keep these keys private. Anyone holding them can spend.".red().bold())?;
    }

    Ok(())
}

/// Run the built-in known-answer checks
fn cmd_selftest(json: bool) -> Result<()> {
    let report = run_selftest();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        write_selftest(&mut out, &report)?;
    }

    if !report.all_passed() {
        bail!("{} self-test checks failed", report.failure_count());
    }
    if !json {
        writeln!(out, "{}", "✅ All checks passed".green().bold())?;
    }
    Ok(())
}

fn is_hex_secret(key: &str) -> bool {
    key.len() == SECRET_KEY_SIZE * 2 && key.chars().all(|c| c.is_ascii_hexdigit())
}
