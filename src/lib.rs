// Rust Elements Tx Library
// Written by
//   The Elements Tx Developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication
// along with this software.
// If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.
//

//! # Rust Elements Tx Library
//!
//! Support for the Elements confidential transaction format: byte-exact
//! deserialization and serialization, transaction identifiers, and the
//! message digests signed by spending witnesses in all three sighash
//! dialects (legacy, segwit v0, taproot v1).
//!
//! Elliptic curve operations, signing and transaction validation are out of
//! scope; the digests produced by [`SighashCache`] are exactly the 32-byte
//! messages an ECDSA or Schnorr signer consumes.

// Coding conventions
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(missing_docs)]

/// Re-export of the hashes crate.
pub extern crate hashes;

#[cfg(feature = "serde")]
#[macro_use]
extern crate actual_serde as serde;

#[macro_use]
mod internal_macros;
pub mod confidential;
pub mod encode;
pub mod hash_types;
pub mod script;
pub mod sighash;
mod transaction;

pub use crate::confidential::AssetId;
pub use crate::hash_types::{
    BlockHash, LegacySighash, SegwitV0Sighash, TapLeafHash, TapSighash, Txid, Wtxid,
};
pub use crate::script::Script;
pub use crate::sighash::{
    EcdsaSighashType, Prevouts, SchnorrSighashType, SighashCache, ONE_32, SIGHASH_ALL,
    SIGHASH_ANYONECANPAY, SIGHASH_DEFAULT, SIGHASH_INPUT_MASK, SIGHASH_NONE, SIGHASH_OUTPUT_MASK,
    SIGHASH_SINGLE, VALUE_MAX_U64, ZERO_32,
};
pub use crate::transaction::{
    AssetIssuance, OutPoint, ParseOutPointError, PeginData, Transaction, TxIn, TxInWitness, TxOut,
    TxOutWitness, ADVANCED_TRANSACTION_FLAG, DEFAULT_SEQUENCE, OUTPOINT_INDEX_MASK,
    OUTPOINT_ISSUANCE_FLAG, OUTPOINT_PEGIN_FLAG, WITNESS_SCALE_FACTOR,
};
