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

//! Hash types used at the transaction boundary.

use crate::hashes::{hash_newtype, sha256, sha256d, sha256t_hash_newtype};

hash_newtype! {
    /// A transaction identifier: the double SHA-256 of the transaction
    /// serialized with a zeroed witness flag, displayed backwards.
    pub struct Txid(sha256d::Hash);

    /// A witness transaction identifier: the double SHA-256 of the full
    /// extended serialization, or all zeroes for a coinbase transaction.
    pub struct Wtxid(sha256d::Hash);

    /// An Elements block hash.
    pub struct BlockHash(sha256d::Hash);

    /// Digest of a transaction according to the legacy signature algorithm.
    #[hash_newtype(forward)]
    pub struct LegacySighash(sha256d::Hash);

    /// Digest of a transaction according to the segwit v0 signature algorithm.
    #[hash_newtype(forward)]
    pub struct SegwitV0Sighash(sha256d::Hash);

    /// Taproot leaf hash, consumed verbatim by the v1 signature algorithm.
    pub struct TapLeafHash(sha256::Hash);
}

impl_hashencode!(Txid);
impl_hashencode!(Wtxid);
impl_hashencode!(BlockHash);
impl_hashencode!(TapLeafHash);

/// The SHA-256 midstate value for the [`TapSighash`] tagged hash, i.e. the
/// state after absorbing `sha256("TapSighash/elements")` twice.
pub(crate) const MIDSTATE_TAPSIGHASH: [u8; 32] = [
    166, 230, 6, 120, 41, 228, 53, 167, 211, 20, 34, 171, 34, 191, 116, 23, 134, 105, 138, 238,
    229, 146, 92, 206, 255, 57, 14, 164, 52, 159, 126, 13,
];
// a6e6067829e435a7d31422ab22bf741786698aeee5925cceff390ea4349f7e0d

sha256t_hash_newtype!(
    TapSighash,
    TapSighashTag,
    MIDSTATE_TAPSIGHASH,
    64,
    doc = "Taproot-tagged hash with tag \"TapSighash/elements\".

This hash type is used for computing Elements taproot signature hashes.",
    forward
);
