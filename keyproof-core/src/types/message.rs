//! Signed-message types for keyproof.
//!
//! - [`VerifiedMessage`]: Outcome of a successful signature verification
//! - [`AttestationRecord`]: Address, signature and message lifted from a device record

use serde::{Deserialize, Serialize};

use crate::chain::Network;

/// A signed message whose signature recovered a key owning the claimed address.
///
/// Only ever built on success; a failed verification returns an error instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedMessage {
    /// The address the signer claimed
    pub address: String,
    /// Raw 65-byte compact signature
    #[serde(with = "hex")]
    pub signature: Vec<u8>,
    /// Raw message bytes as hashed
    #[serde(with = "hex")]
    pub message: Vec<u8>,
    /// Always true for a constructed value
    pub is_valid: bool,
    /// Recovered public key, uncompressed SEC1 hex
    pub public_key_hex: String,
}

impl VerifiedMessage {
    /// Returns the message as text, replacing invalid UTF-8.
    pub fn message_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.message)
    }
}

/// Address, base64 signature and message extracted from an attestation record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRecord {
    /// Network named by the record header
    pub network: Network,
    /// Signing address
    pub address: String,
    /// Base64 compact signature
    pub signature: String,
    /// Message body with `\r\n` line endings
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verified_message_serializes_bytes_as_hex() {
        let verified = VerifiedMessage {
            address: "133r6sCjLq6NbmSLjxuypDuSeocwenu1Qg".into(),
            signature: vec![0x1f; 65],
            message: b"Hello World".to_vec(),
            is_valid: true,
            public_key_hex: "04aa".into(),
        };

        let json = serde_json::to_value(&verified).unwrap();
        assert_eq!(json["message"], "48656c6c6f20576f726c64");
        assert_eq!(json["signature"].as_str().unwrap().len(), 130);

        let back: VerifiedMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, verified);
        assert_eq!(back.message_text(), "Hello World");
    }
}
