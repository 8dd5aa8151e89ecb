//! Error types for keyproof.
//!
//! Every failure here comes from malformed input or a cryptographic
//! mismatch, so nothing is retried. Variants are grouped by the component
//! that raises them.

use thiserror::Error;

/// Result type alias using `KeyproofError`.
pub type Result<T> = std::result::Result<T, KeyproofError>;

/// Main error type for all keyproof operations.
#[derive(Debug, Error)]
pub enum KeyproofError {
    // ═══════════════════════════════════════════════════════════════════════════
    // WIF ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Decoded WIF is neither 37 nor 38 bytes.
    #[error("WIF malformed: wrong length {actual} (expected 37 or 38 bytes)")]
    MalformedLength {
        /// Decoded payload length
        actual: usize,
    },

    /// Compressed WIF whose marker byte is not `0x01`.
    #[error("WIF malformed: compression byte {0:#04x} is not 0x01")]
    MalformedCompressionByte(u8),

    /// WIF version byte does not belong to a known network.
    #[error("WIF malformed: unknown prefix byte {0:#04x}")]
    UnknownPrefix(u8),

    /// Trailing checksum does not match the payload.
    #[error("WIF checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Checksum computed over the payload, hex
        expected: String,
        /// Checksum carried by the WIF, hex
        actual: String,
    },

    /// Input contains symbols outside the base58 alphabet.
    #[error("Invalid base58: {0}")]
    InvalidBase58(String),

    /// Secret exponent is not 32 bytes.
    #[error("Invalid secret exponent: expected {expected} bytes, got {actual}")]
    InvalidSecretLength {
        /// Required length in bytes
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// Secret exponent is zero or not below the curve order.
    #[error("Invalid secret exponent: {0}")]
    InvalidSecretKey(String),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    Hex(#[from] hex::FromHexError),

    // ═══════════════════════════════════════════════════════════════════════════
    // ADDRESS ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Public key hex is not a valid secp256k1 point.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Address encoder rejected its input.
    #[error("Address encoding failed: {0}")]
    AddressEncoding(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // VERIFIER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Public key could not be recovered from the compact signature.
    #[error("Public key recovery failed: {0}")]
    RecoveryFailed(String),

    /// Recovered key does not own the claimed address.
    #[error("Invalid signature: address {address} does not match recovered key")]
    AddressMismatch {
        /// Address the signer claimed
        address: String,
    },

    /// Signature does not decode to 65 bytes.
    #[error("Signature bytes wrong length: expected 65, got {actual}")]
    WrongSignatureLength {
        /// Decoded length in bytes
        actual: usize,
    },

    /// Signature is not valid base64.
    #[error("Invalid base64 signature: {0}")]
    InvalidBase64(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // ATTESTATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Attestation source held fewer bytes than a full record.
    #[error("Attestation record too short: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Full record size
        expected: usize,
        /// Bytes actually read
        actual: usize,
    },

    /// Attestation record does not start with a known header.
    #[error("Attestation record does not start with a BITCOIN or LITECOIN signed message header")]
    UnrecognizedHeader,

    /// Signature block is missing or lacks the address and signature lines.
    #[error("Malformed signature block: {0}")]
    MalformedSignatureBlock(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KeyproofError {
    /// Returns true if this error came from the WIF codec.
    pub fn is_wif_error(&self) -> bool {
        matches!(
            self,
            KeyproofError::MalformedLength { .. }
                | KeyproofError::MalformedCompressionByte(_)
                | KeyproofError::UnknownPrefix(_)
                | KeyproofError::ChecksumMismatch { .. }
                | KeyproofError::InvalidBase58(_)
                | KeyproofError::InvalidSecretLength { .. }
                | KeyproofError::InvalidSecretKey(_)
        )
    }

    /// Returns true if this error means a signature did not verify.
    pub fn is_verification_error(&self) -> bool {
        matches!(
            self,
            KeyproofError::RecoveryFailed(_)
                | KeyproofError::AddressMismatch { .. }
                | KeyproofError::WrongSignatureLength { .. }
                | KeyproofError::InvalidBase64(_)
        )
    }

    /// Returns true if this error came from parsing an attestation record.
    pub fn is_attestation_error(&self) -> bool {
        matches!(
            self,
            KeyproofError::ShortRead { .. }
                | KeyproofError::UnrecognizedHeader
                | KeyproofError::MalformedSignatureBlock(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KeyproofError::MalformedCompressionByte(0xcc);
        assert_eq!(
            err.to_string(),
            "WIF malformed: compression byte 0xcc is not 0x01"
        );

        let err = KeyproofError::ShortRead {
            expected: 512,
            actual: 500,
        };
        assert!(err.to_string().contains("512"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_error_classification() {
        assert!(KeyproofError::UnknownPrefix(0x69).is_wif_error());
        assert!(KeyproofError::MalformedLength { actual: 9 }.is_wif_error());
        assert!(!KeyproofError::UnrecognizedHeader.is_wif_error());

        assert!(KeyproofError::RecoveryFailed("test".into()).is_verification_error());
        assert!(KeyproofError::AddressMismatch { address: "1abc".into() }.is_verification_error());
        assert!(!KeyproofError::InvalidPublicKey("test".into()).is_verification_error());

        assert!(KeyproofError::UnrecognizedHeader.is_attestation_error());
        assert!(KeyproofError::MalformedSignatureBlock("test".into()).is_attestation_error());
        assert!(!KeyproofError::UnknownPrefix(0).is_attestation_error());
    }

    #[test]
    fn test_hex_error_conversion() {
        let result: Result<Vec<u8>> = hex::decode("zz").map_err(KeyproofError::from);
        assert!(matches!(result, Err(KeyproofError::Hex(_))));
    }
}
