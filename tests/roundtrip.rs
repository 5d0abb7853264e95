//! Randomized round-trip tests over generated transactions, exercising the
//! codec, the size oracle and the weight identities together.

use elements_tx::hashes::Hash;
use elements_tx::{
    confidential, encode, AssetIssuance, OutPoint, Script, Transaction, TxIn, TxInWitness, TxOut,
    TxOutWitness, Txid, DEFAULT_SEQUENCE, WITNESS_SCALE_FACTOR,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_bytes(rng: &mut StdRng, max_len: usize) -> Vec<u8> {
    let len = rng.gen_range(0..=max_len);
    (0..len).map(|_| rng.gen()).collect()
}

fn random_asset(rng: &mut StdRng) -> confidential::Asset {
    if rng.gen() {
        confidential::Asset::Explicit(confidential::AssetId::from_byte_array(rng.gen()))
    } else {
        confidential::Asset::Confidential(if rng.gen() { 0x0a } else { 0x0b }, rng.gen())
    }
}

fn random_value(rng: &mut StdRng) -> confidential::Value {
    match rng.gen_range(0..3) {
        0 => confidential::Value::Null,
        1 => confidential::Value::Explicit(rng.gen()),
        _ => confidential::Value::Confidential(if rng.gen() { 0x08 } else { 0x09 }, rng.gen()),
    }
}

fn random_nonce(rng: &mut StdRng) -> confidential::Nonce {
    match rng.gen_range(0..3) {
        0 => confidential::Nonce::Null,
        1 => confidential::Nonce::Explicit(rng.gen()),
        _ => confidential::Nonce::Confidential(if rng.gen() { 0x02 } else { 0x03 }, rng.gen()),
    }
}

fn random_txin(rng: &mut StdRng, with_witness: bool) -> TxIn {
    let asset_issuance = if rng.gen_range(0..4) == 0 {
        Some(AssetIssuance {
            asset_blinding_nonce: rng.gen(),
            asset_entropy: rng.gen(),
            amount: random_value(rng),
            inflation_keys: random_value(rng),
        })
    } else {
        None
    };
    let witness = if with_witness {
        TxInWitness {
            amount_rangeproof: random_bytes(rng, 40),
            inflation_keys_rangeproof: random_bytes(rng, 40),
            script_witness: (0..rng.gen_range(0..4)).map(|_| random_bytes(rng, 72)).collect(),
            pegin_witness: (0..rng.gen_range(0..3)).map(|_| random_bytes(rng, 40)).collect(),
        }
    } else {
        TxInWitness::default()
    };
    TxIn {
        previous_output: OutPoint::new(
            Txid::hash(&random_bytes(rng, 8)),
            rng.gen_range(0..0x4000_0000),
        ),
        is_pegin: rng.gen_range(0..4) == 0,
        script_sig: Script::from(random_bytes(rng, 60)),
        sequence: if rng.gen() { DEFAULT_SEQUENCE } else { rng.gen() },
        asset_issuance,
        witness,
    }
}

fn random_txout(rng: &mut StdRng, with_witness: bool) -> TxOut {
    let witness = if with_witness {
        TxOutWitness {
            surjection_proof: random_bytes(rng, 80),
            rangeproof: random_bytes(rng, 120),
        }
    } else {
        TxOutWitness::default()
    };
    TxOut {
        asset: random_asset(rng),
        value: random_value(rng),
        nonce: random_nonce(rng),
        script_pubkey: Script::from(random_bytes(rng, 50)),
        witness,
    }
}

fn random_tx(rng: &mut StdRng) -> Transaction {
    // when any witness data is generated the flag must be set, otherwise the
    // suffix (with possibly half-populated proofs) would not be serialized
    let with_witness = rng.gen();
    Transaction {
        version: rng.gen_range(1..3),
        flag: with_witness as u8,
        input: (0..rng.gen_range(1..5)).map(|_| random_txin(rng, with_witness)).collect(),
        output: (0..rng.gen_range(1..5)).map(|_| random_txout(rng, with_witness)).collect(),
        lock_time: rng.gen(),
    }
}

#[test]
fn random_transactions_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x656c656d656e7473);
    for _ in 0..256 {
        let tx = random_tx(&mut rng);
        let bytes = encode::serialize(&tx);

        let decoded: Transaction = encode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(encode::serialize(&decoded), bytes);

        // size oracle vs actual serializations
        assert_eq!(bytes.len(), tx.total_size());
        assert_eq!(tx.serialize(), bytes);
        assert_eq!(tx.serialize_base().len(), tx.base_size());

        // weight identities
        assert_eq!(tx.weight(), (WITNESS_SCALE_FACTOR - 1) * tx.base_size() + tx.total_size());
        assert_eq!(tx.vsize(), (tx.weight() + WITNESS_SCALE_FACTOR - 1) / WITNESS_SCALE_FACTOR);

        // clones serialize identically
        let clone = tx.clone();
        assert_eq!(encode::serialize(&clone), bytes);
        assert_eq!(clone.txid(), tx.txid());
        assert_eq!(clone.wtxid(), tx.wtxid());

        // txid never commits to the witness; wtxid matches it only when the
        // transaction carries none
        if !tx.has_witnesses() {
            assert_eq!(tx.txid().as_byte_array(), tx.wtxid().as_byte_array());
        }
    }
}

#[cfg(feature = "serde")]
#[test]
fn random_transactions_serde_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x7365726465);
    for _ in 0..16 {
        let tx = random_tx(&mut rng);
        let json = serde_json::to_string(&tx).unwrap();
        let decoded: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, tx);
    }
}
