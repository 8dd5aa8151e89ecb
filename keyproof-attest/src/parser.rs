//! Attestation record parser.
//!
//! Hardware devices write a fixed 512-byte text record proving control of
//! their deposit address:
//!
//! ```text
//! -----BEGIN BITCOIN SIGNED MESSAGE-----
//! <message lines>
//! -----BEGIN SIGNATURE-----
//! <address>
//! <base64 compact signature>
//! -----END BITCOIN SIGNED MESSAGE-----
//! <whitespace padding up to 512 bytes>
//! ```
//!
//! The file may use either line ending. The returned message always uses
//! `\r\n`, which is what the device hashed.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, instrument};

use keyproof_core::chain::Network;
use keyproof_core::constants::{
    ATTESTATION_FOOTER_PREFIX, ATTESTATION_HEADER_BITCOIN, ATTESTATION_HEADER_LITECOIN,
    ATTESTATION_RECORD_SIZE, ATTESTATION_SIGNATURE_MARKER,
};
use keyproof_core::error::{KeyproofError, Result};
use keyproof_core::types::AttestationRecord;

/// Reads exactly one record from `reader` and parses it.
///
/// Bytes past the first 512 are left unread.
///
/// # Errors
///
/// - `ShortRead` if the source ends before 512 bytes
/// - `Io` if the read itself fails
/// - `UnrecognizedHeader` / `MalformedSignatureBlock` for bad layout
pub fn parse<R: Read>(reader: R) -> Result<AttestationRecord> {
    let mut buf = Vec::with_capacity(ATTESTATION_RECORD_SIZE);
    reader
        .take(ATTESTATION_RECORD_SIZE as u64)
        .read_to_end(&mut buf)?;

    if buf.len() < ATTESTATION_RECORD_SIZE {
        return Err(KeyproofError::ShortRead {
            expected: ATTESTATION_RECORD_SIZE,
            actual: buf.len(),
        });
    }

    parse_record(&buf)
}

/// Parses a record held in memory.
pub fn parse_bytes(bytes: &[u8]) -> Result<AttestationRecord> {
    parse(bytes)
}

/// Opens `path` and parses the record at its start.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn parse_file(path: impl AsRef<Path>) -> Result<AttestationRecord> {
    let file = File::open(path.as_ref())?;
    let record = parse(file)?;
    debug!(address = %record.address, network = %record.network, "Parsed attestation file");
    Ok(record)
}

fn parse_record(raw: &[u8]) -> Result<AttestationRecord> {
    match std::str::from_utf8(raw) {
        Ok(text) => parse_text(text),
        // padding after the footer is never hashed, so only the prefix must decode
        Err(e) => {
            let at = e.valid_up_to();
            let valid = std::str::from_utf8(&raw[..at]).unwrap_or_default();
            parse_text(valid).map_err(|err| match err {
                KeyproofError::MalformedSignatureBlock(_) => {
                    KeyproofError::MalformedSignatureBlock(format!("invalid UTF-8 at byte {}", at))
                }
                other => other,
            })
        }
    }
}

fn parse_text(text: &str) -> Result<AttestationRecord> {
    let text = text.replace("\r\n", "\n");

    let (network, rest) = if let Some(rest) = text.strip_prefix(ATTESTATION_HEADER_BITCOIN) {
        (Network::Bitcoin, rest)
    } else if let Some(rest) = text.strip_prefix(ATTESTATION_HEADER_LITECOIN) {
        (Network::Litecoin, rest)
    } else {
        return Err(KeyproofError::UnrecognizedHeader);
    };

    let (body, after_marker) = rest.split_once(ATTESTATION_SIGNATURE_MARKER).ok_or_else(|| {
        KeyproofError::MalformedSignatureBlock("missing signature marker".into())
    })?;
    let (block, _footer) = after_marker
        .split_once(ATTESTATION_FOOTER_PREFIX)
        .ok_or_else(|| KeyproofError::MalformedSignatureBlock("missing footer".into()))?;

    let mut lines = block.split('\n').map(str::trim);
    let (address, signature) = match (lines.next(), lines.next()) {
        (Some(address), Some(signature)) if !address.is_empty() && !signature.is_empty() => {
            (address, signature)
        }
        _ => {
            return Err(KeyproofError::MalformedSignatureBlock(
                "expected address and signature lines".into(),
            ))
        }
    };

    Ok(AttestationRecord {
        network,
        address: address.to_string(),
        signature: signature.to_string(),
        message: body.replace('\n', "\r\n"),
    })
}
