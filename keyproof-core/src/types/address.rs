//! Address types for keyproof.
//!
//! [`AddressSet`] is every address a single secp256k1 key controls across
//! the supported chains. It is a plain value, rebuilt on every derivation.

use serde::{Deserialize, Serialize};

/// Addresses derived from one public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSet {
    /// Bitcoin P2PKH of the uncompressed key
    pub bitcoin_p2pkh: String,
    /// Bitcoin P2PKH of the compressed key
    pub bitcoin_p2pkh_compressed: String,
    /// Bitcoin P2WPKH (bech32, witness v0)
    pub bitcoin_p2wpkh: String,
    /// Ethereum address, lowercase hex with `0x`
    pub ethereum: String,
    /// Litecoin P2PKH of the uncompressed key
    pub litecoin_p2pkh: String,
    /// Litecoin P2PKH of the compressed key
    pub litecoin_p2pkh_compressed: String,
    /// Litecoin P2WPKH (bech32, witness v0)
    pub litecoin_p2wpkh: String,
    /// Dogecoin P2PKH of the uncompressed key
    pub dogecoin_p2pkh: String,
    /// Uncompressed SEC1 public key, hex
    pub uncompressed_hex: String,
    /// Compressed SEC1 public key, hex
    pub compressed_hex: String,
}

impl AddressSet {
    /// Returns the chain addresses as ordered (label, address) pairs for display.
    pub fn labeled(&self) -> [(&'static str, &str); 8] {
        [
            ("Bitcoin P2PKH", self.bitcoin_p2pkh.as_str()),
            ("Bitcoin P2PKH (Compressed)", self.bitcoin_p2pkh_compressed.as_str()),
            ("Bitcoin P2WPKH", self.bitcoin_p2wpkh.as_str()),
            ("Ethereum", self.ethereum.as_str()),
            ("Litecoin P2PKH", self.litecoin_p2pkh.as_str()),
            ("Litecoin P2PKH (Compressed)", self.litecoin_p2pkh_compressed.as_str()),
            ("Litecoin P2WPKH", self.litecoin_p2wpkh.as_str()),
            ("Dogecoin P2PKH", self.dogecoin_p2pkh.as_str()),
        ]
    }

    /// Returns the legacy P2PKH addresses a signed message may be checked against.
    pub fn legacy_p2pkh(&self) -> [&str; 4] {
        [
            self.bitcoin_p2pkh.as_str(),
            self.bitcoin_p2pkh_compressed.as_str(),
            self.litecoin_p2pkh.as_str(),
            self.litecoin_p2pkh_compressed.as_str(),
        ]
    }

    /// Returns true if `address` is one of the Bitcoin or Litecoin P2PKH forms.
    pub fn matches_legacy(&self, address: &str) -> bool {
        self.legacy_p2pkh().contains(&address)
    }

    /// Returns true if `address` appears anywhere in the set.
    pub fn contains(&self, address: &str) -> bool {
        self.labeled().iter().any(|(_, a)| *a == address)
    }
}
