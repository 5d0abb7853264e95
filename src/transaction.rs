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

//! Elements transactions.
//!
//! An Elements transaction extends the Bitcoin format with confidential
//! assets, values and nonces on every output, optional per-input asset
//! issuances carried inline, pegin inputs spending mainchain deposits, and an
//! extended serialization that appends per-input and per-output witness data
//! after the transaction body:
//!
//! ```text
//! - int32_t      version
//! - unsigned char flags (bit 0: witness data follows the body)
//! - vector<TxIn>  inputs
//! - vector<TxOut> outputs
//! - uint32_t     lock_time
//! - if (flags & 1): per-input then per-output witness data
//! ```
//!
//! Two flag bits are packed into the top of each input's outpoint index on
//! the wire; in memory the index is always the logical one.

use std::{fmt, io, str};

use crate::confidential::{self, AssetId};
use crate::encode::{self, Decodable, Encodable, VarInt};
use crate::hash_types::{BlockHash, Txid, Wtxid};
use crate::hashes::{sha256d, Hash};
use crate::script::Script;

/// The flag-byte bit requesting the extended serialization with witness data.
pub const ADVANCED_TRANSACTION_FLAG: u8 = 0x01;

/// The default input sequence number.
pub const DEFAULT_SEQUENCE: u32 = 0xFFFF_FFFF;

/// Outpoint-index bit indicating an inline asset issuance on the input.
pub const OUTPOINT_ISSUANCE_FLAG: u32 = 0x8000_0000;

/// Outpoint-index bit indicating a pegin input.
pub const OUTPOINT_PEGIN_FLAG: u32 = 0x4000_0000;

/// Mask extracting the logical output index from a wire outpoint index.
pub const OUTPOINT_INDEX_MASK: u32 = 0x3FFF_FFFF;

/// The factor by which non-witness data counts towards transaction weight.
pub const WITNESS_SCALE_FACTOR: usize = 4;

/// A reference to a transaction output.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct OutPoint {
    /// The referenced transaction's txid.
    pub txid: Txid,
    /// The logical index of the referenced output in its transaction's vout.
    ///
    /// Never has bits 30 or 31 set, except for the coinbase sentinel
    /// `0xFFFFFFFF` which passes through the codec unmasked.
    pub vout: u32,
}

impl OutPoint {
    /// Creates a new [`OutPoint`].
    #[inline]
    pub fn new(txid: Txid, vout: u32) -> OutPoint {
        OutPoint { txid, vout }
    }

    /// Creates the "null" `OutPoint` used by coinbase transactions.
    #[inline]
    pub fn null() -> OutPoint {
        OutPoint { txid: Txid::all_zeros(), vout: u32::max_value() }
    }

    /// Checks if an `OutPoint` is "null".
    #[inline]
    pub fn is_null(&self) -> bool {
        *self == OutPoint::null()
    }
}

impl Default for OutPoint {
    fn default() -> Self {
        OutPoint::null()
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

/// An error in parsing an [`OutPoint`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ParseOutPointError {
    /// Error in the txid part.
    Txid(crate::hashes::hex::Error),
    /// Error in the vout part.
    Vout(std::num::ParseIntError),
    /// Error in the general format.
    Format,
}

impl fmt::Display for ParseOutPointError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseOutPointError::Txid(ref e) => write!(f, "error parsing txid: {}", e),
            ParseOutPointError::Vout(ref e) => write!(f, "error parsing vout: {}", e),
            ParseOutPointError::Format => write!(f, "outpoint not in <txid>:<vout> format"),
        }
    }
}

impl std::error::Error for ParseOutPointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            ParseOutPointError::Txid(ref e) => Some(e),
            ParseOutPointError::Vout(ref e) => Some(e),
            ParseOutPointError::Format => None,
        }
    }
}

impl str::FromStr for OutPoint {
    type Err = ParseOutPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let find = s.find(':');
        if find.is_none() || find != s.rfind(':') {
            return Err(ParseOutPointError::Format);
        }
        let colon = find.unwrap();
        if colon == 0 || colon == s.len() - 1 {
            return Err(ParseOutPointError::Format);
        }
        Ok(OutPoint {
            txid: s[..colon].parse().map_err(ParseOutPointError::Txid)?,
            vout: s[colon + 1..].parse().map_err(ParseOutPointError::Vout)?,
        })
    }
}

impl_consensus_encoding!(OutPoint, txid, vout);

/// An asset issuance, minting new units of an asset (and optionally
/// reissuance tokens) inline on a transaction input.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct AssetIssuance {
    /// Zero for a new issuance; otherwise the blinding factor of the spent
    /// reissuance token output.
    pub asset_blinding_nonce: [u8; 32],
    /// Freeform entropy committed to by the issuance.
    pub asset_entropy: [u8; 32],
    /// The amount of asset being issued; [`confidential::Value::Null`] when
    /// the slot is absent (a single `0x00` byte on the wire).
    pub amount: confidential::Value,
    /// The number of reissuance tokens being issued.
    pub inflation_keys: confidential::Value,
}

impl Default for AssetIssuance {
    fn default() -> AssetIssuance {
        AssetIssuance {
            asset_blinding_nonce: [0; 32],
            asset_entropy: [0; 32],
            amount: confidential::Value::Null,
            inflation_keys: confidential::Value::Null,
        }
    }
}

impl AssetIssuance {
    /// The length, in bytes, of the wire encoding of the issuance record.
    pub fn encoded_length(&self) -> usize {
        64 + self.amount.encoded_length() + self.inflation_keys.encoded_length()
    }
}

impl_consensus_encoding!(AssetIssuance, asset_blinding_nonce, asset_entropy, amount, inflation_keys);

/// The witness data of a transaction input, carried after the body in the
/// extended serialization.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct TxInWitness {
    /// Range proof for the issuance amount.
    pub amount_rangeproof: Vec<u8>,
    /// Range proof for the inflation keys.
    pub inflation_keys_rangeproof: Vec<u8>,
    /// The script witness stack.
    pub script_witness: Vec<Vec<u8>>,
    /// The pegin witness stack; six elements for a well-formed pegin.
    pub pegin_witness: Vec<Vec<u8>>,
}

impl TxInWitness {
    /// Whether every component of the witness is empty.
    pub fn is_empty(&self) -> bool {
        self.amount_rangeproof.is_empty()
            && self.inflation_keys_rangeproof.is_empty()
            && self.script_witness.is_empty()
            && self.pegin_witness.is_empty()
    }
}

impl_consensus_encoding!(
    TxInWitness,
    amount_rangeproof,
    inflation_keys_rangeproof,
    script_witness,
    pegin_witness
);

/// The witness data of a transaction output: the proofs backing its
/// confidential commitments.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct TxOutWitness {
    /// Proof that the asset commitment maps to one of the input assets.
    pub surjection_proof: Vec<u8>,
    /// Proof that the value commitment is in range.
    pub rangeproof: Vec<u8>,
}

impl TxOutWitness {
    /// Whether both proofs are empty.
    pub fn is_empty(&self) -> bool {
        self.surjection_proof.is_empty() && self.rangeproof.is_empty()
    }
}

impl_consensus_encoding!(TxOutWitness, surjection_proof, rangeproof);

/// Data carried by the pegin witness of a pegin input.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PeginData<'a> {
    /// The mainchain outpoint being claimed.
    pub outpoint: OutPoint,
    /// The value, in satoshis, of the mainchain output.
    pub value: u64,
    /// The asset the deposit pegs into.
    pub asset: confidential::Asset,
    /// Hash of the genesis block of the originating chain.
    pub genesis_hash: BlockHash,
    /// The claim script committed to by the deposit.
    pub claim_script: &'a [u8],
    /// The serialized mainchain transaction creating the deposit.
    pub tx: &'a [u8],
    /// A merkle proof of the mainchain transaction's inclusion.
    pub merkle_proof: &'a [u8],
}

/// An Elements transaction input.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct TxIn {
    /// The reference to the previous output being spent, with the logical
    /// output index (flag bits already split out).
    pub previous_output: OutPoint,
    /// Whether this input spends a mainchain deposit. Set from (and re-packed
    /// into) the pegin bit of the wire outpoint index.
    pub is_pegin: bool,
    /// The script satisfying the spending conditions of the previous output.
    pub script_sig: Script,
    /// The sequence number.
    pub sequence: u32,
    /// The asset issuance carried by this input, if any. The issuance bit of
    /// the wire outpoint index is derived from this field on serialization;
    /// there is deliberately no separate flag to get out of sync.
    pub asset_issuance: Option<AssetIssuance>,
    /// The input witness, serialized separately in the extended format.
    pub witness: TxInWitness,
}

impl Default for TxIn {
    fn default() -> TxIn {
        TxIn {
            previous_output: OutPoint::default(),
            is_pegin: false,
            script_sig: Script::new(),
            sequence: DEFAULT_SEQUENCE,
            asset_issuance: None,
            witness: TxInWitness::default(),
        }
    }
}

impl TxIn {
    /// Whether the input carries an asset issuance.
    pub fn has_issuance(&self) -> bool {
        self.asset_issuance.is_some()
    }

    /// The outpoint index as it appears on the wire, with the issuance and
    /// pegin bits packed into the top of the logical index.
    pub fn wire_index(&self) -> u32 {
        let mut vout = self.previous_output.vout;
        if self.has_issuance() {
            vout |= OUTPOINT_ISSUANCE_FLAG;
        }
        if self.is_pegin {
            vout |= OUTPOINT_PEGIN_FLAG;
        }
        vout
    }

    /// Parses the six mandatory pegin-witness elements. Returns `None` when
    /// the input is not a pegin or the witness is not well-formed.
    pub fn pegin_data(&self) -> Option<PeginData> {
        if !self.is_pegin {
            return None;
        }
        let wit = &self.witness.pegin_witness;
        if wit.len() != 6 || wit[0].len() != 8 || wit[1].len() != 32 || wit[2].len() != 32 {
            return None;
        }
        let mut value = [0u8; 8];
        value.copy_from_slice(&wit[0]);
        Some(PeginData {
            outpoint: self.previous_output,
            value: u64::from_le_bytes(value),
            asset: confidential::Asset::Explicit(AssetId::from_slice(&wit[1]).ok()?),
            genesis_hash: BlockHash::from_slice(&wit[2]).ok()?,
            claim_script: &wit[3],
            tx: &wit[4],
            merkle_proof: &wit[5],
        })
    }

    /// The length, in bytes, of the input in the transaction body.
    fn encoded_length(&self) -> usize {
        32 + 4
            + VarInt(self.script_sig.len() as u64).size()
            + self.script_sig.len()
            + 4
            + self.asset_issuance.as_ref().map_or(0, AssetIssuance::encoded_length)
    }
}

impl Encodable for TxIn {
    fn consensus_encode<S: io::Write>(&self, mut s: S) -> Result<usize, encode::Error> {
        let mut len = self.previous_output.txid.consensus_encode(&mut s)?;
        len += self.wire_index().consensus_encode(&mut s)?;
        len += self.script_sig.consensus_encode(&mut s)?;
        len += self.sequence.consensus_encode(&mut s)?;
        if let Some(ref issuance) = self.asset_issuance {
            len += issuance.consensus_encode(&mut s)?;
        }
        Ok(len)
    }
}

impl Decodable for TxIn {
    fn consensus_decode<D: io::Read>(mut d: D) -> Result<TxIn, encode::Error> {
        let txid = Txid::consensus_decode(&mut d)?;
        let mut vout = u32::consensus_decode(&mut d)?;
        let mut is_pegin = false;
        let mut has_issuance = false;
        // the coinbase sentinel passes through unmasked
        if vout != u32::max_value() {
            has_issuance = vout & OUTPOINT_ISSUANCE_FLAG != 0;
            is_pegin = vout & OUTPOINT_PEGIN_FLAG != 0;
            vout &= OUTPOINT_INDEX_MASK;
        }
        let script_sig = Script::consensus_decode(&mut d)?;
        let sequence = u32::consensus_decode(&mut d)?;
        let asset_issuance =
            if has_issuance { Some(AssetIssuance::consensus_decode(&mut d)?) } else { None };

        Ok(TxIn {
            previous_output: OutPoint { txid, vout },
            is_pegin,
            script_sig,
            sequence,
            asset_issuance,
            witness: TxInWitness::default(),
        })
    }
}

/// An Elements transaction output.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct TxOut {
    /// The asset of the output, explicit or committed.
    pub asset: confidential::Asset,
    /// The value of the output, explicit or committed.
    pub value: confidential::Value,
    /// The ECDH nonce used to rewind the output's blinding.
    pub nonce: confidential::Nonce,
    /// The script which must be satisfied for the output to be spent.
    pub script_pubkey: Script,
    /// The output witness, serialized separately in the extended format.
    pub witness: TxOutWitness,
}

impl TxOut {
    /// Whether this output is a fee output: an empty script with explicit
    /// asset and value.
    pub fn is_fee(&self) -> bool {
        self.script_pubkey.is_empty() && self.asset.is_explicit() && self.value.is_explicit()
    }

    /// Writes the body of the output; `substitute_value` replaces the
    /// confidential value with an explicit zero (`0x00` plus eight zero
    /// bytes), which is how the legacy signature serialization aligns
    /// confidential outputs with the Bitcoin layout.
    pub(crate) fn encode_body<S: io::Write>(
        &self,
        mut s: S,
        substitute_value: bool,
    ) -> Result<usize, encode::Error> {
        let mut len = self.asset.consensus_encode(&mut s)?;
        if substitute_value {
            len += 0u8.consensus_encode(&mut s)?;
            len += 0u64.consensus_encode(&mut s)?;
        } else {
            len += self.value.consensus_encode(&mut s)?;
        }
        len += self.nonce.consensus_encode(&mut s)?;
        len += self.script_pubkey.consensus_encode(&mut s)?;
        Ok(len)
    }

    /// The length, in bytes, of the output in the transaction body.
    fn encoded_length(&self, substitute_value: bool) -> usize {
        self.asset.encoded_length()
            + if substitute_value { 9 } else { self.value.encoded_length() }
            + self.nonce.encoded_length()
            + VarInt(self.script_pubkey.len() as u64).size()
            + self.script_pubkey.len()
    }
}

impl Encodable for TxOut {
    fn consensus_encode<S: io::Write>(&self, s: S) -> Result<usize, encode::Error> {
        self.encode_body(s, false)
    }
}

impl Decodable for TxOut {
    fn consensus_decode<D: io::Read>(mut d: D) -> Result<TxOut, encode::Error> {
        Ok(TxOut {
            asset: Decodable::consensus_decode(&mut d)?,
            value: Decodable::consensus_decode(&mut d)?,
            nonce: Decodable::consensus_decode(&mut d)?,
            script_pubkey: Decodable::consensus_decode(&mut d)?,
            witness: TxOutWitness::default(),
        })
    }
}

/// An Elements transaction.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct Transaction {
    /// The protocol version.
    pub version: i32,
    /// The flag byte as read from the wire. Kept on the structure so that a
    /// transaction whose flag is set but whose witness groups are all empty
    /// re-serializes byte-exactly.
    pub flag: u8,
    /// List of transaction inputs.
    pub input: Vec<TxIn>,
    /// List of transaction outputs.
    pub output: Vec<TxOut>,
    /// Block height or timestamp before which the transaction is invalid.
    pub lock_time: u32,
}

impl Transaction {
    /// Whether this is a coinbase transaction: a single input whose previous
    /// transaction hash is all zeroes.
    pub fn is_coinbase(&self) -> bool {
        self.input.len() == 1 && self.input[0].previous_output.txid == Txid::all_zeros()
    }

    /// Whether serialization of this transaction carries the witness suffix.
    ///
    /// An output counts as witnessed only when *both* its rangeproof and its
    /// surjection proof are non-empty; a half-populated output (which should
    /// not occur in practice) does not trip the flag.
    pub fn has_witnesses(&self) -> bool {
        self.flag == ADVANCED_TRANSACTION_FLAG
            || self.input.iter().any(|i| !i.witness.script_witness.is_empty())
            || self
                .output
                .iter()
                .any(|o| !o.witness.rangeproof.is_empty() && !o.witness.surjection_proof.is_empty())
    }

    /// The single encoding path behind every serialization of a transaction.
    ///
    /// `allow_witness = false` emits the bare body with a zero flag byte;
    /// `force_zero_flag` does the same while pretending witnesses were
    /// allowed (the txid form); `for_signature` omits the flag byte entirely
    /// and substitutes output values, matching the legacy signature layout.
    pub(crate) fn encode_inner<S: io::Write>(
        &self,
        mut s: S,
        allow_witness: bool,
        force_zero_flag: bool,
        for_signature: bool,
    ) -> Result<usize, encode::Error> {
        let wit = allow_witness && !force_zero_flag && !for_signature && self.has_witnesses();
        let substitute_value = for_signature && self.has_witnesses();

        let mut len = self.version.consensus_encode(&mut s)?;
        if !for_signature {
            len += (wit as u8).consensus_encode(&mut s)?;
        }
        len += self.input.consensus_encode(&mut s)?;
        len += VarInt(self.output.len() as u64).consensus_encode(&mut s)?;
        for output in &self.output {
            len += output.encode_body(&mut s, substitute_value)?;
        }
        len += self.lock_time.consensus_encode(&mut s)?;
        if wit {
            for input in &self.input {
                len += input.witness.consensus_encode(&mut s)?;
            }
            for output in &self.output {
                len += output.witness.consensus_encode(&mut s)?;
            }
        }
        Ok(len)
    }

    /// The byte length of any serialization of this transaction, computed
    /// without serializing.
    fn encoded_length(&self, allow_witness: bool, for_signature: bool) -> usize {
        let wit = allow_witness && !for_signature && self.has_witnesses();
        let substitute_value = for_signature && self.has_witnesses();

        let mut len = 4 + if for_signature { 0 } else { 1 } + 4; // version, flag, lock_time
        len += VarInt(self.input.len() as u64).size();
        for input in &self.input {
            len += input.encoded_length();
        }
        len += VarInt(self.output.len() as u64).size();
        for output in &self.output {
            len += output.encoded_length(substitute_value);
        }
        if wit {
            for input in &self.input {
                len += varslice_length(&input.witness.amount_rangeproof)
                    + varslice_length(&input.witness.inflation_keys_rangeproof)
                    + vector_length(&input.witness.script_witness)
                    + vector_length(&input.witness.pegin_witness);
            }
            for output in &self.output {
                len += varslice_length(&output.witness.surjection_proof)
                    + varslice_length(&output.witness.rangeproof);
            }
        }
        len
    }

    /// Serializes the transaction in the full extended format.
    pub fn serialize(&self) -> Vec<u8> {
        let mut ret = Vec::with_capacity(self.total_size());
        self.consensus_encode(&mut ret).expect("in-memory writers don't error");
        debug_assert_eq!(ret.len(), self.total_size());
        ret
    }

    /// Serializes the transaction without the witness suffix, flag forced to
    /// zero.
    pub fn serialize_base(&self) -> Vec<u8> {
        let mut ret = Vec::with_capacity(self.base_size());
        self.encode_inner(&mut ret, false, false, false).expect("in-memory writers don't error");
        debug_assert_eq!(ret.len(), self.base_size());
        ret
    }

    /// The size of the transaction serialized without the witness suffix.
    pub fn base_size(&self) -> usize {
        self.encoded_length(false, false)
    }

    /// The size of the transaction in the full extended serialization.
    pub fn total_size(&self) -> usize {
        self.encoded_length(true, false)
    }

    /// The weight of the transaction: three times the base size plus the
    /// total size.
    pub fn weight(&self) -> usize {
        self.base_size() * (WITNESS_SCALE_FACTOR - 1) + self.total_size()
    }

    /// The virtual size of the transaction, `ceil(weight / 4)`.
    pub fn vsize(&self) -> usize {
        (self.weight() + WITNESS_SCALE_FACTOR - 1) / WITNESS_SCALE_FACTOR
    }

    /// Computes the [`Txid`]: the double SHA-256 of the transaction
    /// serialized with a zeroed flag byte and no witness suffix.
    pub fn txid(&self) -> Txid {
        let mut enc = Txid::engine();
        self.encode_inner(&mut enc, true, true, false).expect("engines don't error");
        Txid::from_engine(enc)
    }

    /// Computes the [`Wtxid`], which commits to the witness data. The wtxid
    /// of a coinbase transaction is defined to be all zeroes.
    pub fn wtxid(&self) -> Wtxid {
        if self.is_coinbase() {
            return Wtxid::all_zeros();
        }
        let mut enc = Wtxid::engine();
        self.consensus_encode(&mut enc).expect("engines don't error");
        Wtxid::from_engine(enc)
    }

    /// Computes a "normalized txid" which does not include any signatures.
    ///
    /// This gives a way to identify a transaction that is "the same" as
    /// another in the sense of having the same inputs and outputs.
    pub fn ntxid(&self) -> sha256d::Hash {
        let cloned_tx = Transaction {
            version: self.version,
            flag: self.flag,
            input: self
                .input
                .iter()
                .map(|txin| TxIn {
                    script_sig: Script::new(),
                    witness: TxInWitness::default(),
                    ..txin.clone()
                })
                .collect(),
            output: self.output.clone(),
            lock_time: self.lock_time,
        };
        cloned_tx.txid().into()
    }

    /// The total fee paid in the given asset: the sum of the values of the
    /// fee outputs denominated in it.
    pub fn fee_in(&self, asset: AssetId) -> u64 {
        self.output
            .iter()
            .filter(|out| out.is_fee() && out.asset == confidential::Asset::Explicit(asset))
            .filter_map(|out| out.value.explicit())
            .sum()
    }
}

fn varslice_length(data: &[u8]) -> usize {
    VarInt(data.len() as u64).size() + data.len()
}

fn vector_length(witness: &[Vec<u8>]) -> usize {
    VarInt(witness.len() as u64).size() + witness.iter().map(|w| varslice_length(w)).sum::<usize>()
}

impl Encodable for Transaction {
    fn consensus_encode<S: io::Write>(&self, s: S) -> Result<usize, encode::Error> {
        self.encode_inner(s, true, false, false)
    }
}

impl Decodable for Transaction {
    fn consensus_decode<D: io::Read>(mut d: D) -> Result<Transaction, encode::Error> {
        let version = i32::consensus_decode(&mut d)?;
        let flag = u8::consensus_decode(&mut d)?;
        let mut input = Vec::<TxIn>::consensus_decode(&mut d)?;
        let mut output = Vec::<TxOut>::consensus_decode(&mut d)?;
        let lock_time = u32::consensus_decode(&mut d)?;

        if flag & ADVANCED_TRANSACTION_FLAG != 0 {
            for txin in &mut input {
                txin.witness = TxInWitness::consensus_decode(&mut d)?;
            }
            for txout in &mut output {
                txout.witness = TxOutWitness::consensus_decode(&mut d)?;
            }
        }

        Ok(Transaction { version, flag, input, output, lock_time })
    }
}
