//! Text and JSON rendering for CLI results.
//!
//! Every table is built from explicit (label, value) rows so the text and
//! JSON outputs always agree.

use std::io::{self, Write};

use serde::Serialize;

use keyproof_attest::SelfTestReport;
use keyproof_core::types::{AddressSet, PrivateKeyRecord, VerifiedMessage};
use keyproof_core::{ChainParams, BITCOIN, DOGECOIN, LITECOIN};
use keyproof_crypto::WifExt;

const LABEL_WIDTH: usize = 28;

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESSES
// ═══════════════════════════════════════════════════════════════════════════════

/// Writes the address table headed by the address the user supplied.
pub fn write_address_table<W: Write>(
    out: &mut W,
    original: &str,
    addresses: &AddressSet,
) -> io::Result<()> {
    writeln!(out, "Addresses for {}", original)?;
    for (label, address) in addresses.labeled() {
        writeln!(out, "- {:<width$} {}", label, address, width = LABEL_WIDTH)?;
    }
    Ok(())
}

/// JSON shape of a `sigtoaddr` run.
#[derive(Debug, Serialize)]
pub struct SignatureReport<'a> {
    /// Verification result
    pub verified: &'a VerifiedMessage,
    /// Every address of the recovered key
    pub addresses: &'a AddressSet,
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY CONVERSION
// ═══════════════════════════════════════════════════════════════════════════════

/// One private key re-encoded for every supported chain.
#[derive(Debug, Serialize)]
pub struct KeyConversion {
    /// The key as the user gave it, or its WIF form if it was raw hex
    pub original: String,
    /// Network named by the original WIF prefix
    pub network: String,
    /// Compression flag of the original WIF
    pub compressed: bool,
    /// Raw secret exponent, only when asked for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_exponent: Option<String>,
    /// Re-encoded keys in display order
    pub encodings: Vec<(String, String)>,
    /// Addresses of the key, only when asked for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<AddressSet>,
}

impl KeyConversion {
    /// Re-encodes `record` for Bitcoin, Litecoin, Dogecoin and Ethereum.
    pub fn new(original: &str, record: &PrivateKeyRecord, show_secret: bool) -> Self {
        let (btc, ltc, doge): (&dyn ChainParams, &dyn ChainParams, &dyn ChainParams) =
            (&BITCOIN, &LITECOIN, &DOGECOIN);
        let wif = |params: &dyn ChainParams, compress: bool| record.to_wif(params, compress);

        let encodings = vec![
            ("Bitcoin P2PKH".to_string(), wif(btc, false)),
            ("Bitcoin P2PKH (Compressed)".to_string(), wif(btc, true)),
            ("Bitcoin P2WPKH".to_string(), format!("p2wpkh:{}", wif(btc, true))),
            ("Litecoin P2PKH".to_string(), wif(ltc, false)),
            ("Litecoin P2PKH (Compressed)".to_string(), wif(ltc, true)),
            ("Litecoin P2WPKH".to_string(), format!("p2wpkh:{}", wif(ltc, true))),
            ("Dogecoin P2PKH".to_string(), wif(doge, false)),
            ("Ethereum".to_string(), format!("0x{}", record.secret_hex())),
        ];

        Self {
            original: original.to_string(),
            network: record.network().to_string(),
            compressed: record.is_compressed(),
            secret_exponent: show_secret.then(|| record.secret_hex()),
            encodings,
            addresses: None,
        }
    }

    /// Attaches the derived address table.
    pub fn with_addresses(mut self, addresses: AddressSet) -> Self {
        self.addresses = Some(addresses);
        self
    }

    /// Looks up an encoding by its label.
    pub fn encoding(&self, label: &str) -> Option<&str> {
        self.encodings
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Writes the conversion as text.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "Original WIF: {} {} compressed={}",
            self.network, self.original, self.compressed
        )?;
        if let Some(secret) = &self.secret_exponent {
            writeln!(out, " - Secret exponent: {}", secret)?;
        }
        writeln!(out)?;

        for (label, value) in &self.encodings {
            writeln!(out, "{:<width$} {}", format!("{}:", label), value, width = LABEL_WIDTH + 1)?;
        }

        if let Some(addresses) = &self.addresses {
            writeln!(out)?;
            write_address_table(out, &self.original, addresses)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SELF-TEST
// ═══════════════════════════════════════════════════════════════════════════════

/// Writes one line per self-test check.
pub fn write_selftest<W: Write>(out: &mut W, report: &SelfTestReport) -> io::Result<()> {
    for check in &report.checks {
        if check.passed {
            writeln!(out, "ok   {}", check.name)?;
        } else {
            writeln!(out, "FAIL {} ({})", check.name, check.detail)?;
        }
    }
    writeln!(
        out,
        "{} checks, {} failed",
        report.checks.len(),
        report.failure_count()
    )
}
