//! Chain parameter tables.
//!
//! Each supported network is a unit struct implementing [`ChainParams`].
//! The set is closed: Bitcoin and Litecoin are fully supported, Dogecoin is
//! used for legacy addressing and WIF re-encoding only.
//!
//! [`Network`] is the tag carried by a decoded WIF key; only networks whose
//! WIF prefix is recognised on decode appear in it.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// CHAIN PARAMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Static constants describing one network's encodings.
pub trait ChainParams: Send + Sync + std::fmt::Debug {
    /// Human-readable network name.
    fn name(&self) -> &'static str;

    /// Version byte of pay-to-pubkey-hash addresses.
    fn p2pkh_version(&self) -> u8;

    /// Version byte of pay-to-script-hash addresses.
    fn p2sh_version(&self) -> u8;

    /// Bech32 human-readable prefix for segwit addresses, if the chain has one.
    fn bech32_hrp(&self) -> Option<&'static str>;

    /// Version byte of WIF-encoded private keys.
    fn wif_version(&self) -> u8;

    /// Magic string prepended to messages before signing.
    fn message_magic(&self) -> &'static str;
}

/// Bitcoin mainnet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitcoinMainnet;

/// Litecoin mainnet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LitecoinMainnet;

/// Dogecoin mainnet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DogecoinMainnet;

/// Bitcoin mainnet parameters.
pub static BITCOIN: BitcoinMainnet = BitcoinMainnet;

/// Litecoin mainnet parameters.
pub static LITECOIN: LitecoinMainnet = LitecoinMainnet;

/// Dogecoin mainnet parameters.
pub static DOGECOIN: DogecoinMainnet = DogecoinMainnet;

impl ChainParams for BitcoinMainnet {
    fn name(&self) -> &'static str {
        "Bitcoin"
    }

    fn p2pkh_version(&self) -> u8 {
        0x00 // 1...
    }

    fn p2sh_version(&self) -> u8 {
        0x05 // 3...
    }

    fn bech32_hrp(&self) -> Option<&'static str> {
        Some("bc")
    }

    fn wif_version(&self) -> u8 {
        0x80 // 5... uncompressed, K/L... compressed
    }

    fn message_magic(&self) -> &'static str {
        "Bitcoin Signed Message:\n"
    }
}

impl ChainParams for LitecoinMainnet {
    fn name(&self) -> &'static str {
        "Litecoin"
    }

    fn p2pkh_version(&self) -> u8 {
        0x30 // L...
    }

    fn p2sh_version(&self) -> u8 {
        0x50 // M...
    }

    fn bech32_hrp(&self) -> Option<&'static str> {
        Some("ltc")
    }

    fn wif_version(&self) -> u8 {
        0xb0 // 6... uncompressed, T... compressed
    }

    fn message_magic(&self) -> &'static str {
        "Litecoin Signed Message:\n"
    }
}

impl ChainParams for DogecoinMainnet {
    fn name(&self) -> &'static str {
        "Dogecoin"
    }

    fn p2pkh_version(&self) -> u8 {
        0x1e // D...
    }

    fn p2sh_version(&self) -> u8 {
        0x16 // 9... or A...
    }

    fn bech32_hrp(&self) -> Option<&'static str> {
        None
    }

    fn wif_version(&self) -> u8 {
        0x9e
    }

    fn message_magic(&self) -> &'static str {
        "Dogecoin Signed Message:\n"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NETWORK TAG
// ═══════════════════════════════════════════════════════════════════════════════

/// Network recognised from a WIF version byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// Bitcoin mainnet (`0x80`).
    Bitcoin,
    /// Litecoin mainnet (`0xb0`).
    Litecoin,
}

impl Network {
    /// Maps a WIF version byte to its network.
    pub fn from_wif_version(version: u8) -> Option<Self> {
        if version == BITCOIN.wif_version() {
            Some(Network::Bitcoin)
        } else if version == LITECOIN.wif_version() {
            Some(Network::Litecoin)
        } else {
            None
        }
    }

    /// Returns the parameter table for this network.
    pub fn params(&self) -> &'static dyn ChainParams {
        match self {
            Network::Bitcoin => &BITCOIN,
            Network::Litecoin => &LITECOIN,
        }
    }

    /// Returns the network name ("Bitcoin" or "Litecoin").
    pub fn name(&self) -> &'static str {
        self.params().name()
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
