//! Built-in known-answer checks.
//!
//! Exercises the whole pipeline against fixed vectors: WIF decode and
//! re-encode, signed-message recovery, and both attestation record layouts.
//! A failing check means the build is broken, not the input.

use serde::Serialize;
use tracing::{debug, info, warn};

use keyproof_core::chain::Network;
use keyproof_core::constants::ATTESTATION_RECORD_SIZE;
use keyproof_core::error::Result;
use keyproof_crypto::{decode_wif, verify_message, WifExt};

use crate::parser::parse_bytes;
use crate::verify_attestation;

// ═══════════════════════════════════════════════════════════════════════════════
// VECTORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Attestation record from a Bitcoin device, without its padding.
pub const BITCOIN_ATTESTATION: &str = "-----BEGIN BITCOIN SIGNED MESSAGE-----\n\
Nonce: 1675bf38ec241a2308585ad0  Serial: DDRRNOCZJRIFCIBAEBJDOJQY74\n\
Version: 2.4.0 time=20190207.130255 git=master@e233940e coin=BTC\n\
-----BEGIN SIGNATURE-----\n\
1Mmg2eycKHomhjAikEAVehHpCSHTREhLfR\n\
G1pnvdb0RfKfv3Jhg4x0XBQqv1KQx3WFRaxTiUVN84fpIzxOBgapJb/Dpy6auJ28xcHaBxl3XHBbJejfokjgtmg=\n\
-----END BITCOIN SIGNED MESSAGE-----\n";

/// Attestation record from a Litecoin device, without its padding.
pub const LITECOIN_ATTESTATION: &str = "-----BEGIN LITECOIN SIGNED MESSAGE-----\n\
UNSEALED -- UNSEALED -- UNSEALED\n\
Nonce: 961f7ecaa917101d4241a43a  Serial: PZZUNUKLGRIFCICKJIYDEEIC74\n\
Version: 2.3.0 time=20171018.143523 git=master@8fb7cfd coin=LTC\n\
-----BEGIN SIGNATURE-----\n\
LhNxvyyxBGv1Z9CKUaYPE5azvFCMnDMbRN\n\
HAVOlsYZ4/sj1lVHlqeYd4jbxRRkD5zqp6MG6mNKPmfEdE8rwByiQ+aFTuEpXswhV4y5S5dxREq3pkdq4CjU3/A=\n\
-----END LITECOIN SIGNED MESSAGE-----\n";

/// Pads `text` with spaces to a full record, as devices do.
pub fn padded(text: &str) -> Vec<u8> {
    format!("{:<width$}", text, width = ATTESTATION_RECORD_SIZE).into_bytes()
}

struct SignedVector {
    address: &'static str,
    signature: &'static str,
    message: &'static str,
    public_key: &'static str,
}

const SIGNED_VECTORS: [SignedVector; 3] = [
    SignedVector {
        address: "133r6sCjLq6NbmSLjxuypDuSeocwenu1Qg",
        signature: "Hz0pDxS09fEdjKrSJenLYsz05gakT6eW9GdzKDopnlwUL3bf3mQeJcS+takCIMuavK/NLOorXWXZCqV0KBMlwgU=",
        message: "Hello World",
        public_key: "046afa3afc399f7f332866e37f475938589de0a3298a3aa062c8f4c74450e3d3b287224ee09db6d217912f4706147bb96762d1e11e7ce2e928fd61ecdbd2e37a99",
    },
    SignedVector {
        address: "LLsXEU59RyoMmjgCkUAghxTLr6FXoRCgQT",
        signature: "H021r+HxbXZo2Vkuyq0D/pfz8kllqDzmOzczJXBanIytdsbZKPlg3q1NhytyLXp03DQa//0zoOjoJfVUjZORql8=",
        message: "Hello World",
        public_key: "04a2e8f5aa9c46242cdc6463adac2ef8e6bb8b17202c06d17c647066ed143535ac1f93e66cc499170185ec79b2ef5c04119282544fea4c8072ff87711e13597bcf",
    },
    SignedVector {
        address: "1Nu1QpfegiGmqHS6YZxkaiGpnqAUXvZz2f",
        signature: "HwPlEOxTxs62ruMHZvamv0wmUlbbaY/2ZSqw9Hpdw+FWfgXuSxQ9x55ceSiFyvnlpiZjt+KIhSYnhGnCv8iDe5o=",
        message: "Hello World!",
        public_key: "0471bb3ef523055565dd5f9864047b9fe93efa10151ff4bb3640f7de6dfdd76cea9d5cb2da17d725a835f25971818e54acc1db69e4866ea23c9dc33f57cb286315",
    },
];

struct WifVector {
    wif: &'static str,
    network: Network,
    secret_hex: &'static str,
    compressed: bool,
}

const WIF_VECTORS: [WifVector; 4] = [
    WifVector {
        wif: "L5g3omnu8BYUS5zUA74AW1eSbZ1xx72HzSVgJcejsvMTn3P579qd",
        network: Network::Bitcoin,
        secret_hex: "fc3fa47324ceb77e1160833eddd30ea15efa22a6e59c204921e12fbbab1becb8",
        compressed: true,
    },
    WifVector {
        wif: "5KjNw6cmtUK1KpoYytfnCZKTC11DgDhAjvMYZYBpKncuHd6YzkX",
        network: Network::Bitcoin,
        secret_hex: "fc3fa47324ceb77e1160833eddd30ea15efa22a6e59c204921e12fbbab1becb8",
        compressed: false,
    },
    WifVector {
        wif: "T3JxxXhbbVjvd5ZEKBgs5NxGstyepyUJYY2XdY19VTtJSEep3SM3",
        network: Network::Litecoin,
        secret_hex: "07b5eb6760c9b0cef7009acc4b2f01d847a5da1e7aa97373f7db996db295ed26",
        compressed: true,
    },
    WifVector {
        wif: "6uBR1M6aDM76oh141wz4eF36s3iPAWZU5syzEiTmX1euSDQkoLG",
        network: Network::Litecoin,
        secret_hex: "07b5eb6760c9b0cef7009acc4b2f01d847a5da1e7aa97373f7db996db295ed26",
        compressed: false,
    },
];

// ═══════════════════════════════════════════════════════════════════════════════
// REPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of one check.
#[derive(Clone, Debug, Serialize)]
pub struct CheckResult {
    /// What was checked
    pub name: String,
    /// Whether it produced the expected answer
    pub passed: bool,
    /// Failure reason, empty on success
    pub detail: String,
}

/// Outcome of a full self-test run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SelfTestReport {
    /// Individual checks in run order
    pub checks: Vec<CheckResult>,
}

impl SelfTestReport {
    /// Returns true if every check passed.
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Returns the number of failed checks.
    pub fn failure_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    fn record(&mut self, name: String, outcome: Result<bool>, expectation: &str) {
        let (passed, detail) = match outcome {
            Ok(true) => (true, String::new()),
            Ok(false) => (false, expectation.to_string()),
            Err(e) => (false, e.to_string()),
        };
        if passed {
            debug!(check = %name, "Self-test check passed");
        } else {
            warn!(check = %name, detail = %detail, "Self-test check failed");
        }
        self.checks.push(CheckResult {
            name,
            passed,
            detail,
        });
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RUN
// ═══════════════════════════════════════════════════════════════════════════════

/// Runs every built-in check and collects the results.
pub fn run_selftest() -> SelfTestReport {
    let mut report = SelfTestReport::default();

    for v in &WIF_VECTORS {
        let outcome = decode_wif(v.wif).map(|key| {
            key.network() == v.network
                && key.secret_hex() == v.secret_hex
                && key.is_compressed() == v.compressed
                && key.to_wif(v.network.params(), v.compressed) == v.wif
        });
        report.record(
            format!("wif {}", v.wif),
            outcome,
            "decoded key does not match",
        );
    }

    for v in &SIGNED_VECTORS {
        let outcome = verify_message(v.address, v.signature, v.message)
            .map(|verified| verified.public_key_hex == v.public_key);
        report.record(
            format!("signed message {} {:?}", v.address, v.message),
            outcome,
            "recovered a different public key",
        );

        let tampered = format!("{}.", v.message);
        let rejected = verify_message(v.address, v.signature, &tampered).is_err();
        report.record(
            format!("tampered message {}", v.address),
            Ok(rejected),
            "tampered message verified",
        );
    }

    for (label, blob) in [
        ("bitcoin", BITCOIN_ATTESTATION),
        ("litecoin", LITECOIN_ATTESTATION),
    ] {
        let outcome = parse_bytes(&padded(blob))
            .and_then(|record| verify_attestation(&record))
            .map(|verified| verified.is_valid);
        report.record(
            format!("{} attestation record", label),
            outcome,
            "attestation did not verify",
        );
    }

    info!(
        checks = report.checks.len(),
        failed = report.failure_count(),
        "Self-test finished"
    );
    report
}
