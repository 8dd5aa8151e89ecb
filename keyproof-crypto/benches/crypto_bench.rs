//! Criterion benchmarks for keyproof crypto: WIF codec, address derivation, message verification.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use k256::ecdsa::SigningKey;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

use keyproof_core::{ChainParams, BITCOIN};
use keyproof_crypto::{
    decode_wif, derive_addresses, encode_wif, message_digest, p2pkh_address,
    public_key_from_secret, verify_signature,
};

const WIF: &str = "L5g3omnu8BYUS5zUA74AW1eSbZ1xx72HzSVgJcejsvMTn3P579qd";
const SECRET: &str = "fc3fa47324ceb77e1160833eddd30ea15efa22a6e59c204921e12fbbab1becb8";
const PUBLIC_KEY: &str = "036afa3afc399f7f332866e37f475938589de0a3298a3aa062c8f4c74450e3d3b2";

fn bench_wif(c: &mut Criterion) {
    let mut g = c.benchmark_group("wif");
    g.throughput(Throughput::Elements(1));
    g.bench_function("decode", |b| {
        b.iter(|| black_box(decode_wif(black_box(WIF))).unwrap());
    });
    g.bench_function("encode", |b| {
        b.iter(|| black_box(encode_wif(0x80, black_box(SECRET), true)).unwrap());
    });
    g.finish();
}

fn bench_derive(c: &mut Criterion) {
    let mut g = c.benchmark_group("derive");
    g.throughput(Throughput::Elements(1));
    g.bench_function("derive_addresses", |b| {
        b.iter(|| black_box(derive_addresses(black_box(PUBLIC_KEY))).unwrap());
    });
    g.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let key = SigningKey::random(&mut rng);
    let secret: [u8; 32] = key.to_bytes().into();
    let material = public_key_from_secret(&secret).unwrap();
    let address = p2pkh_address(&BITCOIN, material.compressed());

    let mut g = c.benchmark_group("verify_signature");
    g.throughput(Throughput::Elements(1));
    for len in [16usize, 256, 4096] {
        let message = vec![0x61u8; len];
        let digest = message_digest(BITCOIN.message_magic(), &message);
        let (sig, recovery_id) = key.sign_prehash_recoverable(&digest).unwrap();
        let mut signature = vec![31 + recovery_id.to_byte()];
        signature.extend_from_slice(&sig.to_bytes());

        g.bench_with_input(BenchmarkId::from_parameter(len), &message, |b, message| {
            b.iter(|| black_box(verify_signature(&address, &signature, message)).unwrap());
        });
    }
    g.finish();
}

criterion_group!(benches, bench_wif, bench_derive, bench_verify);
criterion_main!(benches);
