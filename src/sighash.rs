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

//! Signature hash implementation (used in transaction signing).
//!
//! Computes the message digests signed by spending witnesses across the three
//! dialects of the Elements transaction format: the legacy pre-segwit
//! algorithm, the segwit v0 algorithm extended with issuance data, and the
//! taproot v1 algorithm extended with the confidential fields. Creating a
//! [`SighashCache`] and calling its methods is all there is to it; the
//! subcomponent hashes shared between inputs are computed once and reused.

use std::borrow::Borrow;
use std::{fmt, io, str};

use crate::confidential;
use crate::encode::{self, Encodable, VarInt};
use crate::hash_types::{BlockHash, LegacySighash, SegwitV0Sighash, TapLeafHash, TapSighash};
use crate::hashes::{sha256, sha256d, Hash};
use crate::script::Script;
use crate::transaction::{Transaction, TxIn, TxInWitness, TxOut};

/// Sighash mode signing all outputs; also the numeric value of the taproot
/// default mode's effective output selector.
pub const SIGHASH_ALL: u32 = 0x01;
/// Sighash mode signing no outputs.
pub const SIGHASH_NONE: u32 = 0x02;
/// Sighash mode signing the single output paired with the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;
/// Sighash modifier committing to the signed input only.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;
/// The taproot "default" sighash type, behaving as `SIGHASH_ALL`.
pub const SIGHASH_DEFAULT: u32 = 0x00;
/// Mask selecting the output mode bits of a sighash type.
pub const SIGHASH_OUTPUT_MASK: u32 = 0x03;
/// Mask selecting the input mode bit of a sighash type.
pub const SIGHASH_INPUT_MASK: u32 = 0x80;

/// Thirty-two zero bytes, the stand-in for elided subcomponent hashes.
pub const ZERO_32: [u8; 32] = [0; 32];

/// The digest the legacy signature hash is defined to return when the input
/// index is out of range, or under the `SIGHASH_SINGLE` bug. Returned
/// verbatim, never hashed.
#[rustfmt::skip]
pub const ONE_32: [u8; 32] = [
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 1,
];

/// The all-ones explicit value emitted for blanked `SIGHASH_SINGLE` outputs.
pub const VALUE_MAX_U64: [u8; 8] = [0xFF; 8];

/// Possible errors in computing the signature message.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Error {
    /// Could happen only by using `*_encode_signing_*` methods with custom
    /// writers; the engine writers used by the `*_signature_hash` methods do
    /// not error.
    Io(io::ErrorKind),

    /// Requested index is greater or equal than the number of inputs in the
    /// transaction.
    IndexOutOfInputsBounds {
        /// Requested index.
        index: usize,
        /// Number of transaction inputs.
        inputs_size: usize,
    },

    /// The number of supplied prevouts differs from the number of inputs in
    /// the transaction.
    PrevoutsSize,

    /// Requested a prevout index which is greater than the number of prevouts
    /// provided, or a [`Prevouts::One`] with a different index.
    PrevoutIndex,

    /// A single prevout has been provided but all prevouts are needed unless
    /// using `SIGHASH_ANYONECANPAY`.
    PrevoutKind,

    /// Invalid sighash type.
    InvalidSighashType(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(error_kind) => write!(f, "writer errored: {:?}", error_kind),
            Error::IndexOutOfInputsBounds { index, inputs_size } => write!(
                f,
                "requested index ({}) is greater or equal than the number of transaction inputs ({})",
                index, inputs_size
            ),
            Error::PrevoutsSize => write!(
                f,
                "number of supplied prevouts differs from the number of inputs in transaction"
            ),
            Error::PrevoutIndex => write!(
                f,
                "the index requested is greater than available prevouts or different from the provided [Prevouts::One] index"
            ),
            Error::PrevoutKind => write!(
                f,
                "a single prevout has been provided but all prevouts are needed without `ANYONECANPAY`"
            ),
            Error::InvalidSighashType(hash_ty) => {
                write!(f, "invalid taproot signature hash type: {}", hash_ty)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e.kind())
    }
}

impl From<encode::Error> for Error {
    fn from(e: encode::Error) -> Self {
        match e {
            encode::Error::Io(e) => Error::Io(e.kind()),
            // non-I/O encoding errors only arise when decoding
            _ => Error::Io(io::ErrorKind::InvalidData),
        }
    }
}

/// Hashtype of an input's signature, encoded in the last byte of the
/// signature. Fixed values so they can be cast as integer types for encoding.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub enum EcdsaSighashType {
    /// 0x1: Sign all outputs.
    All = 0x01,
    /// 0x2: Sign no outputs --- anyone can choose the destination.
    None = 0x02,
    /// 0x3: Sign the output whose index matches this input's index. If none
    /// exists, sign the hash
    /// `0000000000000000000000000000000000000000000000000000000000000001`.
    /// (This rule is probably an unintentional C++ism, but it's consensus so
    /// we have to follow it.)
    Single = 0x03,
    /// 0x81: Sign all outputs but only this input.
    AllPlusAnyoneCanPay = 0x81,
    /// 0x82: Sign no outputs and only this input.
    NonePlusAnyoneCanPay = 0x82,
    /// 0x83: Sign one output and only this input (see `Single` for what "one
    /// output" means).
    SinglePlusAnyoneCanPay = 0x83,
}

impl fmt::Display for EcdsaSighashType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match *self {
            EcdsaSighashType::All => "SIGHASH_ALL",
            EcdsaSighashType::None => "SIGHASH_NONE",
            EcdsaSighashType::Single => "SIGHASH_SINGLE",
            EcdsaSighashType::AllPlusAnyoneCanPay => "SIGHASH_ALL|SIGHASH_ANYONECANPAY",
            EcdsaSighashType::NonePlusAnyoneCanPay => "SIGHASH_NONE|SIGHASH_ANYONECANPAY",
            EcdsaSighashType::SinglePlusAnyoneCanPay => "SIGHASH_SINGLE|SIGHASH_ANYONECANPAY",
        };
        f.write_str(s)
    }
}

impl str::FromStr for EcdsaSighashType {
    type Err = SighashTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SIGHASH_ALL" => Ok(EcdsaSighashType::All),
            "SIGHASH_NONE" => Ok(EcdsaSighashType::None),
            "SIGHASH_SINGLE" => Ok(EcdsaSighashType::Single),
            "SIGHASH_ALL|SIGHASH_ANYONECANPAY" => Ok(EcdsaSighashType::AllPlusAnyoneCanPay),
            "SIGHASH_NONE|SIGHASH_ANYONECANPAY" => Ok(EcdsaSighashType::NonePlusAnyoneCanPay),
            "SIGHASH_SINGLE|SIGHASH_ANYONECANPAY" => Ok(EcdsaSighashType::SinglePlusAnyoneCanPay),
            _ => Err(SighashTypeParseError { unrecognized: s.to_owned() }),
        }
    }
}

impl EcdsaSighashType {
    /// Splits the sighash flag into the "real" sighash flag and the
    /// `ANYONECANPAY` boolean.
    pub(crate) fn split_anyonecanpay_flag(self) -> (EcdsaSighashType, bool) {
        use EcdsaSighashType::*;

        match self {
            All => (All, false),
            None => (None, false),
            Single => (Single, false),
            AllPlusAnyoneCanPay => (All, true),
            NonePlusAnyoneCanPay => (None, true),
            SinglePlusAnyoneCanPay => (Single, true),
        }
    }

    /// Creates an [`EcdsaSighashType`] from a raw `u32`.
    ///
    /// **Note**: this replicates consensus behaviour. The unmasked bits of
    /// `n` are not representable and do not round-trip; while verifying
    /// signatures, retain `n` itself to compute the signature hash message.
    pub fn from_consensus(n: u32) -> EcdsaSighashType {
        use EcdsaSighashType::*;

        // Elements Core masks with 0x1f when checking for SINGLE and NONE;
        // we additionally match the ACP-modified values.
        let mask = 0x1f | SIGHASH_ANYONECANPAY;
        match n & mask {
            0x01 => All,
            0x02 => None,
            0x03 => Single,
            0x81 => AllPlusAnyoneCanPay,
            0x82 => NonePlusAnyoneCanPay,
            0x83 => SinglePlusAnyoneCanPay,
            x if x & SIGHASH_ANYONECANPAY == SIGHASH_ANYONECANPAY => AllPlusAnyoneCanPay,
            _ => All,
        }
    }

    /// Converts an [`EcdsaSighashType`] to a `u32` sighash flag.
    pub fn to_u32(self) -> u32 {
        self as u32
    }
}

/// Hashtype of a taproot input's signature, as defined by the Elements
/// dialect of the v1 signature algorithm.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum SchnorrSighashType {
    /// 0x0: Used when not explicitly specified, acts as
    /// [`SchnorrSighashType::All`].
    Default = 0x00,
    /// 0x1: Sign all outputs.
    All = 0x01,
    /// 0x2: Sign no outputs --- anyone can choose the destination.
    None = 0x02,
    /// 0x3: Sign the output whose index matches this input's index.
    Single = 0x03,
    /// 0x81: Sign all outputs but only this input.
    AllPlusAnyoneCanPay = 0x81,
    /// 0x82: Sign no outputs and only this input.
    NonePlusAnyoneCanPay = 0x82,
    /// 0x83: Sign one output and only this input.
    SinglePlusAnyoneCanPay = 0x83,
}

impl SchnorrSighashType {
    /// Breaks the sighash flag into the "real" sighash flag and the
    /// `SIGHASH_ANYONECANPAY` boolean.
    pub(crate) fn split_anyonecanpay_flag(self) -> (SchnorrSighashType, bool) {
        use SchnorrSighashType::*;

        match self {
            Default => (Default, false),
            All => (All, false),
            None => (None, false),
            Single => (Single, false),
            AllPlusAnyoneCanPay => (All, true),
            NonePlusAnyoneCanPay => (None, true),
            SinglePlusAnyoneCanPay => (Single, true),
        }
    }

    /// Constructs a [`SchnorrSighashType`] from a raw `u8`.
    pub fn from_consensus_u8(hash_ty: u8) -> Result<Self, Error> {
        use SchnorrSighashType::*;

        Ok(match hash_ty {
            0x00 => Default,
            0x01 => All,
            0x02 => None,
            0x03 => Single,
            0x81 => AllPlusAnyoneCanPay,
            0x82 => NonePlusAnyoneCanPay,
            0x83 => SinglePlusAnyoneCanPay,
            x => return Err(Error::InvalidSighashType(x as u32)),
        })
    }
}

/// Error returned when parsing a sighash type from an unrecognized string.
#[derive(Debug, Clone)]
pub struct SighashTypeParseError {
    /// The unrecognized string we attempted to parse.
    pub unrecognized: String,
}

impl fmt::Display for SighashTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unrecognized SIGHASH string '{}'", self.unrecognized)
    }
}

impl std::error::Error for SighashTypeParseError {}

/// Contains outputs of previous transactions. In the case where the
/// `SIGHASH_ANYONECANPAY` modifier is provided, [`Prevouts::One`] may be
/// used.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Prevouts<'u, T>
where
    T: 'u + Borrow<TxOut>,
{
    /// `One` variant allows provision of the single prevout needed. It's
    /// useful, for example, when the `SIGHASH_ANYONECANPAY` modifier is
    /// provided, when only the prevout of the current input is needed. The
    /// first `usize` argument is the input index this [`TxOut`] is referring
    /// to.
    One(usize, T),
    /// When `SIGHASH_ANYONECANPAY` is not provided, or when the caller is
    /// giving all prevouts so the same variable can be used for multiple
    /// inputs.
    All(&'u [T]),
}

impl<'u, T> Prevouts<'u, T>
where
    T: Borrow<TxOut>,
{
    fn check_all(&self, tx: &Transaction) -> Result<(), Error> {
        if let Prevouts::All(prevouts) = self {
            if prevouts.len() != tx.input.len() {
                return Err(Error::PrevoutsSize);
            }
        }
        Ok(())
    }

    fn get_all(&self) -> Result<&[T], Error> {
        match self {
            Prevouts::All(prevouts) => Ok(*prevouts),
            _ => Err(Error::PrevoutKind),
        }
    }

    fn get(&self, input_index: usize) -> Result<&TxOut, Error> {
        match self {
            Prevouts::One(index, prevout) => {
                if input_index == *index {
                    Ok(prevout.borrow())
                } else {
                    Err(Error::PrevoutIndex)
                }
            }
            Prevouts::All(prevouts) => {
                prevouts.get(input_index).map(|x| x.borrow()).ok_or(Error::PrevoutIndex)
            }
        }
    }
}

/// Result of a `legacy_encode_signing_data_to` call.
///
/// The legacy signature hash has historical corner cases (an out-of-range
/// input index, and `SIGHASH_SINGLE` without a corresponding output) under
/// which the digest is *defined* to be the constant [`ONE_32`] rather than
/// the hash of any serialization. This type forces the caller to handle
/// them: nothing has been written to the writer when the sentinel applies.
#[must_use]
pub enum EncodeSigningDataResult<E> {
    /// The digest is defined to be [`ONE_32`]; nothing was written.
    SighashSingleBug,
    /// Operation performed normally.
    WriteResult(Result<(), E>),
}

impl<E> EncodeSigningDataResult<E> {
    /// Checks for the sentinel case, returning the error if the writer
    /// failed.
    #[allow(clippy::wrong_self_convention)] // E is not Copy so we consume self.
    pub fn is_sighash_single_bug(self) -> Result<bool, E> {
        match self {
            EncodeSigningDataResult::SighashSingleBug => Ok(true),
            EncodeSigningDataResult::WriteResult(Ok(())) => Ok(false),
            EncodeSigningDataResult::WriteResult(Err(e)) => Err(e),
        }
    }

    /// Maps a `Result<T, E>` to `Result<T, F>` by applying a function to a
    /// contained [`Err`] value, leaving an [`Ok`] value untouched.
    pub fn map_err<E2, F>(self, f: F) -> EncodeSigningDataResult<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            EncodeSigningDataResult::SighashSingleBug => EncodeSigningDataResult::SighashSingleBug,
            EncodeSigningDataResult::WriteResult(Err(e)) => {
                EncodeSigningDataResult::WriteResult(Err(f(e)))
            }
            EncodeSigningDataResult::WriteResult(Ok(o)) => {
                EncodeSigningDataResult::WriteResult(Ok(o))
            }
        }
    }
}

/// Efficiently calculates signature hash messages for legacy, segwit v0 and
/// taproot inputs.
#[derive(Debug)]
pub struct SighashCache<T: Borrow<Transaction>> {
    /// Access to transaction required for transaction introspection.
    tx: T,

    /// Single-SHA256 subcomponent hashes shared between the segwit v0 and
    /// taproot algorithms, `None` for legacy inputs.
    common_cache: Option<CommonCache>,

    /// Cache for segwit v0 inputs (the result of another round of sha256 on
    /// `common_cache`).
    segwit_cache: Option<SegwitCache>,

    /// Cache of the Elements-specific v1 hashes that depend only on the
    /// transaction.
    elements_cache: Option<ElementsCache>,

    /// Cache of the v1 hashes over the spent outputs.
    taproot_cache: Option<TaprootCache>,
}

/// Values cached between the segwit v0 and taproot algorithms, which hash
/// the same byte streams (v0 simply runs sha256 once more).
#[derive(Debug)]
struct CommonCache {
    prevouts: sha256::Hash,
    sequences: sha256::Hash,
    issuances: sha256::Hash,

    /// In theory `outputs` could be an `Option` since `SIGHASH_NONE` and
    /// `SIGHASH_SINGLE` do not need it, but since `SIGHASH_ALL` is by far
    /// the most used variant we don't bother.
    outputs: sha256::Hash,
}

/// Values cached for segwit v0 inputs, equivalent to [`CommonCache`] plus
/// another round of `sha256`.
#[derive(Debug)]
struct SegwitCache {
    prevouts: sha256d::Hash,
    sequences: sha256d::Hash,
    issuances: sha256d::Hash,
    outputs: sha256d::Hash,
}

/// Taproot-only hashes over transaction data.
#[derive(Debug)]
struct ElementsCache {
    outpoint_flags: sha256::Hash,
    issuance_proofs: sha256::Hash,
    output_witnesses: sha256::Hash,
}

/// Taproot-only hashes over the spent outputs.
#[derive(Debug)]
struct TaprootCache {
    spent_asset_values: sha256::Hash,
    script_pubkeys: sha256::Hash,
}

/// The outpoint flag byte of an input in the v1 preimage: the issuance bit
/// and the pegin bit of the wire index, moved into a byte of their own.
fn outpoint_flag(txin: &TxIn) -> u8 {
    ((txin.has_issuance() as u8) << 7) | ((txin.is_pegin as u8) << 6)
}

impl<R: Borrow<Transaction>> SighashCache<R> {
    /// Constructs a new `SighashCache` from an unsigned transaction.
    ///
    /// The sighash components are computed in a lazy manner when required.
    /// For the generated sighashes to be valid, no fields in the transaction
    /// may change except for script_sig and witness.
    pub fn new(tx: R) -> Self {
        SighashCache {
            tx,
            common_cache: None,
            segwit_cache: None,
            elements_cache: None,
            taproot_cache: None,
        }
    }

    /// Returns the reference to the cached transaction.
    pub fn transaction(&self) -> &Transaction {
        self.tx.borrow()
    }

    /// Destroys the cache and recovers the stored transaction.
    pub fn into_transaction(self) -> R {
        self.tx
    }

    /// Encodes the legacy signing data from which a signature hash for a
    /// given input index with a given sighash flag can be computed.
    ///
    /// The `sighash_type` supports an arbitrary `u32` value because all four
    /// bytes are hashed, even though only the lowest byte is appended to the
    /// signature in a transaction.
    ///
    /// `script_pubkey` is the script of the output being spent, from which
    /// every `OP_CODESEPARATOR` is removed before it is committed to.
    pub fn legacy_encode_signing_data_to<W: io::Write, U: Into<u32>>(
        &self,
        mut writer: W,
        input_index: usize,
        script_pubkey: &Script,
        sighash_type: U,
    ) -> EncodeSigningDataResult<Error> {
        let tx = self.tx.borrow();
        let sighash_type: u32 = sighash_type.into();
        let (sighash, anyone_can_pay) =
            EcdsaSighashType::from_consensus(sighash_type).split_anyonecanpay_flag();

        if input_index >= tx.input.len() {
            return EncodeSigningDataResult::SighashSingleBug;
        }
        if sighash == EcdsaSighashType::Single && input_index >= tx.output.len() {
            return EncodeSigningDataResult::SighashSingleBug;
        }

        let script = script_pubkey.without_code_separators();
        let has_witnesses = tx.has_witnesses();

        fn encode_inner<W: io::Write>(
            tx: &Transaction,
            mut writer: W,
            input_index: usize,
            script: &Script,
            sighash: EcdsaSighashType,
            anyone_can_pay: bool,
            has_witnesses: bool,
            sighash_type: u32,
        ) -> Result<(), encode::Error> {
            // the flag byte is omitted entirely in the signing serialization
            tx.version.consensus_encode(&mut writer)?;

            // inputs, projected down to one under ANYONECANPAY
            if anyone_can_pay {
                VarInt(1).consensus_encode(&mut writer)?;
                let txin = TxIn {
                    script_sig: script.clone(),
                    witness: TxInWitness::default(),
                    ..tx.input[input_index].clone()
                };
                txin.consensus_encode(&mut writer)?;
            } else {
                VarInt(tx.input.len() as u64).consensus_encode(&mut writer)?;
                for (n, input) in tx.input.iter().enumerate() {
                    let txin = TxIn {
                        script_sig: if n == input_index { script.clone() } else { Script::new() },
                        sequence: if n != input_index
                            && (sighash == EcdsaSighashType::Single
                                || sighash == EcdsaSighashType::None)
                        {
                            0
                        } else {
                            input.sequence
                        },
                        witness: TxInWitness::default(),
                        ..input.clone()
                    };
                    txin.consensus_encode(&mut writer)?;
                }
            }

            // outputs, selected by the output mode
            match sighash {
                EcdsaSighashType::None => {
                    VarInt(0).consensus_encode(&mut writer)?;
                }
                EcdsaSighashType::Single => {
                    // sign all outputs up to and including this one, but
                    // blank all of them except for this one
                    VarInt(input_index as u64 + 1).consensus_encode(&mut writer)?;
                    for _ in 0..input_index {
                        writer.write_all(&ZERO_32)?;
                        if has_witnesses {
                            0u8.consensus_encode(&mut writer)?;
                            0u64.consensus_encode(&mut writer)?;
                        } else {
                            writer.write_all(&VALUE_MAX_U64)?;
                        }
                        writer.write_all(&ZERO_32)?;
                        VarInt(0).consensus_encode(&mut writer)?;
                    }
                    tx.output[input_index].encode_body(&mut writer, has_witnesses)?;
                }
                _ => {
                    VarInt(tx.output.len() as u64).consensus_encode(&mut writer)?;
                    for output in &tx.output {
                        output.encode_body(&mut writer, has_witnesses)?;
                    }
                }
            }

            tx.lock_time.consensus_encode(&mut writer)?;
            sighash_type.consensus_encode(&mut writer)?;
            Ok(())
        }

        EncodeSigningDataResult::WriteResult(
            encode_inner(
                tx,
                &mut writer,
                input_index,
                &script,
                sighash,
                anyone_can_pay,
                has_witnesses,
                sighash_type,
            )
            .map_err(Error::from),
        )
    }

    /// Computes a legacy signature hash for a given input index with a given
    /// sighash flag.
    ///
    /// This correctly handles the two historical corner cases by returning
    /// the "one array": an input index past the end of the inputs, and
    /// `SIGHASH_SINGLE` without a corresponding output.
    pub fn legacy_signature_hash(
        &self,
        input_index: usize,
        script_pubkey: &Script,
        sighash_type: u32,
    ) -> LegacySighash {
        let mut engine = LegacySighash::engine();
        match self
            .legacy_encode_signing_data_to(&mut engine, input_index, script_pubkey, sighash_type)
            .is_sighash_single_bug()
        {
            Ok(true) => LegacySighash::from_byte_array(ONE_32),
            Ok(false) => LegacySighash::from_engine(engine),
            Err(_) => unreachable!("engines don't error"),
        }
    }

    /// Encodes the segwit v0 signing data for any flag type into a given
    /// object implementing the [`io::Write`] trait.
    ///
    /// `value` is the serialized confidential value of the output being
    /// spent, committed to verbatim (explicit or commitment).
    pub fn segwit_encode_signing_data_to<W: io::Write>(
        &mut self,
        mut writer: W,
        input_index: usize,
        script_code: &Script,
        value: confidential::Value,
        sighash_type: EcdsaSighashType,
    ) -> Result<(), Error> {
        let zero_hash = sha256d::Hash::all_zeros();
        let (sighash, anyone_can_pay) = sighash_type.split_anyonecanpay_flag();

        if input_index >= self.tx.borrow().input.len() {
            return Err(Error::IndexOutOfInputsBounds {
                index: input_index,
                inputs_size: self.tx.borrow().input.len(),
            });
        }

        self.tx.borrow().version.consensus_encode(&mut writer)?;

        if !anyone_can_pay {
            self.segwit_cache().prevouts.consensus_encode(&mut writer)?;
        } else {
            zero_hash.consensus_encode(&mut writer)?;
        }

        if !anyone_can_pay
            && sighash != EcdsaSighashType::Single
            && sighash != EcdsaSighashType::None
        {
            self.segwit_cache().sequences.consensus_encode(&mut writer)?;
        } else {
            zero_hash.consensus_encode(&mut writer)?;
        }

        if !anyone_can_pay {
            self.segwit_cache().issuances.consensus_encode(&mut writer)?;
        } else {
            zero_hash.consensus_encode(&mut writer)?;
        }

        {
            let txin = &self.tx.borrow().input[input_index];

            txin.previous_output.consensus_encode(&mut writer)?;
            script_code.consensus_encode(&mut writer)?;
            value.consensus_encode(&mut writer)?;
            txin.sequence.consensus_encode(&mut writer)?;
            if let Some(ref issuance) = txin.asset_issuance {
                issuance.consensus_encode(&mut writer)?;
            }
        }

        if sighash != EcdsaSighashType::Single && sighash != EcdsaSighashType::None {
            self.segwit_cache().outputs.consensus_encode(&mut writer)?;
        } else if sighash == EcdsaSighashType::Single
            && input_index < self.tx.borrow().output.len()
        {
            let mut single_enc = sha256d::Hash::engine();
            self.tx.borrow().output[input_index].consensus_encode(&mut single_enc)?;
            sha256d::Hash::from_engine(single_enc).consensus_encode(&mut writer)?;
        } else {
            zero_hash.consensus_encode(&mut writer)?;
        }

        self.tx.borrow().lock_time.consensus_encode(&mut writer)?;
        sighash_type.to_u32().consensus_encode(&mut writer)?;
        Ok(())
    }

    /// Computes the segwit v0 sighash for any flag type.
    pub fn segwit_signature_hash(
        &mut self,
        input_index: usize,
        script_code: &Script,
        value: confidential::Value,
        sighash_type: EcdsaSighashType,
    ) -> Result<SegwitV0Sighash, Error> {
        let mut enc = SegwitV0Sighash::engine();
        self.segwit_encode_signing_data_to(&mut enc, input_index, script_code, value, sighash_type)?;
        Ok(SegwitV0Sighash::from_engine(enc))
    }

    /// Encodes the taproot v1 signing data for any flag type into a given
    /// object implementing the [`io::Write`] trait.
    ///
    /// The digest signed by the witness is the `TapSighash/elements` tagged
    /// hash of this data; `genesis_hash` binds signatures to one chain.
    pub fn taproot_encode_signing_data_to<W: io::Write, T: Borrow<TxOut>>(
        &mut self,
        mut writer: W,
        input_index: usize,
        prevouts: &Prevouts<T>,
        annex: Option<&[u8]>,
        leaf_hash: Option<TapLeafHash>,
        sighash_type: SchnorrSighashType,
        genesis_hash: BlockHash,
    ) -> Result<(), Error> {
        prevouts.check_all(self.tx.borrow())?;

        let (sighash, anyone_can_pay) = sighash_type.split_anyonecanpay_flag();

        if input_index >= self.tx.borrow().input.len() {
            return Err(Error::IndexOutOfInputsBounds {
                index: input_index,
                inputs_size: self.tx.borrow().input.len(),
            });
        }

        // the genesis hash is committed to twice
        genesis_hash.consensus_encode(&mut writer)?;
        genesis_hash.consensus_encode(&mut writer)?;

        (sighash_type as u8).consensus_encode(&mut writer)?;
        self.tx.borrow().version.consensus_encode(&mut writer)?;
        self.tx.borrow().lock_time.consensus_encode(&mut writer)?;

        if !anyone_can_pay {
            self.elements_cache().outpoint_flags.consensus_encode(&mut writer)?;
            self.common_cache().prevouts.consensus_encode(&mut writer)?;
            self.taproot_cache(prevouts.get_all()?).spent_asset_values.consensus_encode(&mut writer)?;
            self.taproot_cache(prevouts.get_all()?).script_pubkeys.consensus_encode(&mut writer)?;
            self.common_cache().sequences.consensus_encode(&mut writer)?;
            self.common_cache().issuances.consensus_encode(&mut writer)?;
            self.elements_cache().issuance_proofs.consensus_encode(&mut writer)?;
        }

        if sighash != SchnorrSighashType::None && sighash != SchnorrSighashType::Single {
            self.common_cache().outputs.consensus_encode(&mut writer)?;
            self.elements_cache().output_witnesses.consensus_encode(&mut writer)?;
        }

        // spend_type: (2 if a leaf hash is present) + (1 if an annex is present)
        let mut spend_type = 0u8;
        if annex.is_some() {
            spend_type |= 1;
        }
        if leaf_hash.is_some() {
            spend_type |= 2;
        }
        spend_type.consensus_encode(&mut writer)?;

        if anyone_can_pay {
            let tx = self.tx.borrow();
            let txin = &tx.input[input_index];
            let previous_output = prevouts.get(input_index)?;

            outpoint_flag(txin).consensus_encode(&mut writer)?;
            txin.previous_output.consensus_encode(&mut writer)?;
            previous_output.asset.consensus_encode(&mut writer)?;
            previous_output.value.consensus_encode(&mut writer)?;
            previous_output.script_pubkey.consensus_encode(&mut writer)?;
            txin.sequence.consensus_encode(&mut writer)?;
            if let Some(ref issuance) = txin.asset_issuance {
                issuance.consensus_encode(&mut writer)?;
                let mut enc = sha256::Hash::engine();
                txin.witness.amount_rangeproof.consensus_encode(&mut enc).unwrap();
                txin.witness.inflation_keys_rangeproof.consensus_encode(&mut enc).unwrap();
                sha256::Hash::from_engine(enc).consensus_encode(&mut writer)?;
            } else {
                0u8.consensus_encode(&mut writer)?;
            }
        } else {
            (input_index as u32).consensus_encode(&mut writer)?;
        }

        if let Some(annex) = annex {
            // committed to as a varslice
            let mut enc = sha256::Hash::engine();
            annex.to_vec().consensus_encode(&mut enc).unwrap();
            sha256::Hash::from_engine(enc).consensus_encode(&mut writer)?;
        }

        if sighash == SchnorrSighashType::Single {
            // an out-of-range SIGHASH_SINGLE commits to two zero hashes
            if input_index < self.tx.borrow().output.len() {
                let tx = self.tx.borrow();
                let output = &tx.output[input_index];

                let mut enc = sha256::Hash::engine();
                output.consensus_encode(&mut enc).unwrap();
                sha256::Hash::from_engine(enc).consensus_encode(&mut writer)?;

                let mut enc = sha256::Hash::engine();
                output.witness.consensus_encode(&mut enc).unwrap();
                sha256::Hash::from_engine(enc).consensus_encode(&mut writer)?;
            } else {
                writer.write_all(&ZERO_32)?;
                writer.write_all(&ZERO_32)?;
            }
        }

        if let Some(hash) = leaf_hash {
            hash.consensus_encode(&mut writer)?;
            0u8.consensus_encode(&mut writer)?;
            // the code-separator position; only the sentinel is supported
            0xFFFF_FFFFu32.consensus_encode(&mut writer)?;
        }

        Ok(())
    }

    /// Computes the taproot v1 sighash for any flag type.
    pub fn taproot_signature_hash<T: Borrow<TxOut>>(
        &mut self,
        input_index: usize,
        prevouts: &Prevouts<T>,
        annex: Option<&[u8]>,
        leaf_hash: Option<TapLeafHash>,
        sighash_type: SchnorrSighashType,
        genesis_hash: BlockHash,
    ) -> Result<TapSighash, Error> {
        let mut enc = TapSighash::engine();
        self.taproot_encode_signing_data_to(
            &mut enc,
            input_index,
            prevouts,
            annex,
            leaf_hash,
            sighash_type,
            genesis_hash,
        )?;
        Ok(TapSighash::from_engine(enc))
    }

    /// Computes the taproot v1 sighash for a key path spend.
    pub fn taproot_key_spend_signature_hash<T: Borrow<TxOut>>(
        &mut self,
        input_index: usize,
        prevouts: &Prevouts<T>,
        sighash_type: SchnorrSighashType,
        genesis_hash: BlockHash,
    ) -> Result<TapSighash, Error> {
        self.taproot_signature_hash(input_index, prevouts, None, None, sighash_type, genesis_hash)
    }

    /// Computes the taproot v1 sighash for a script path spend.
    pub fn taproot_script_spend_signature_hash<T: Borrow<TxOut>>(
        &mut self,
        input_index: usize,
        prevouts: &Prevouts<T>,
        leaf_hash: TapLeafHash,
        sighash_type: SchnorrSighashType,
        genesis_hash: BlockHash,
    ) -> Result<TapSighash, Error> {
        self.taproot_signature_hash(
            input_index,
            prevouts,
            None,
            Some(leaf_hash),
            sighash_type,
            genesis_hash,
        )
    }

    #[inline]
    fn common_cache(&mut self) -> &CommonCache {
        let common_cache = &mut self.common_cache;
        let tx = self.tx.borrow();
        Self::common_cache_minimal_borrow(common_cache, tx)
    }

    fn common_cache_minimal_borrow<'a>(
        common_cache: &'a mut Option<CommonCache>,
        tx: &Transaction,
    ) -> &'a CommonCache {
        common_cache.get_or_insert_with(|| {
            let mut enc_prevouts = sha256::Hash::engine();
            let mut enc_sequences = sha256::Hash::engine();
            let mut enc_issuances = sha256::Hash::engine();
            for txin in tx.input.iter() {
                txin.previous_output.consensus_encode(&mut enc_prevouts).unwrap();
                txin.sequence.consensus_encode(&mut enc_sequences).unwrap();
                if let Some(ref issuance) = txin.asset_issuance {
                    issuance.consensus_encode(&mut enc_issuances).unwrap();
                } else {
                    0u8.consensus_encode(&mut enc_issuances).unwrap();
                }
            }
            CommonCache {
                prevouts: sha256::Hash::from_engine(enc_prevouts),
                sequences: sha256::Hash::from_engine(enc_sequences),
                issuances: sha256::Hash::from_engine(enc_issuances),
                outputs: {
                    let mut enc = sha256::Hash::engine();
                    for txout in tx.output.iter() {
                        txout.consensus_encode(&mut enc).unwrap();
                    }
                    sha256::Hash::from_engine(enc)
                },
            }
        })
    }

    fn segwit_cache(&mut self) -> &SegwitCache {
        let common_cache = &mut self.common_cache;
        let tx = self.tx.borrow();
        self.segwit_cache.get_or_insert_with(|| {
            let common_cache = Self::common_cache_minimal_borrow(common_cache, tx);
            SegwitCache {
                prevouts: common_cache.prevouts.hash_again(),
                sequences: common_cache.sequences.hash_again(),
                issuances: common_cache.issuances.hash_again(),
                outputs: common_cache.outputs.hash_again(),
            }
        })
    }

    fn elements_cache(&mut self) -> &ElementsCache {
        let tx = self.tx.borrow();
        self.elements_cache.get_or_insert_with(|| {
            let mut enc_flags = sha256::Hash::engine();
            let mut enc_proofs = sha256::Hash::engine();
            for txin in tx.input.iter() {
                outpoint_flag(txin).consensus_encode(&mut enc_flags).unwrap();
                txin.witness.amount_rangeproof.consensus_encode(&mut enc_proofs).unwrap();
                txin.witness.inflation_keys_rangeproof.consensus_encode(&mut enc_proofs).unwrap();
            }
            let mut enc_out_witnesses = sha256::Hash::engine();
            for txout in tx.output.iter() {
                txout.witness.consensus_encode(&mut enc_out_witnesses).unwrap();
            }
            ElementsCache {
                outpoint_flags: sha256::Hash::from_engine(enc_flags),
                issuance_proofs: sha256::Hash::from_engine(enc_proofs),
                output_witnesses: sha256::Hash::from_engine(enc_out_witnesses),
            }
        })
    }

    fn taproot_cache<T: Borrow<TxOut>>(&mut self, prevouts: &[T]) -> &TaprootCache {
        self.taproot_cache.get_or_insert_with(|| {
            let mut enc_spent = sha256::Hash::engine();
            let mut enc_script_pubkeys = sha256::Hash::engine();
            for prevout in prevouts {
                prevout.borrow().asset.consensus_encode(&mut enc_spent).unwrap();
                prevout.borrow().value.consensus_encode(&mut enc_spent).unwrap();
                prevout.borrow().script_pubkey.consensus_encode(&mut enc_script_pubkeys).unwrap();
            }
            TaprootCache {
                spent_asset_values: sha256::Hash::from_engine(enc_spent),
                script_pubkeys: sha256::Hash::from_engine(enc_script_pubkeys),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::deserialize;
    use crate::hashes::hex::FromHex;

    const REF_TX: &str = "010000000001715df5ccebaf02ff18d6fae7263fa69fed5de59c900f4749556eba41bc7bf2af0000000000000000000201230f4f5d4b7c6fa845806ee4f67713459e1b69e8e60fcee2e4940c7a0d5de1b2010000000124101100001f5175517551755175517551755175517551755175517551755175517551755101230f4f5d4b7c6fa845806ee4f67713459e1b69e8e60fcee2e4940c7a0d5de1b2010000000005f5e100000000000000";

    const ISSUANCE_TX: &str = "010000000001715df5ccebaf02ff18d6fae7263fa69fed5de59c900f4749556eba41bc7bf2af000000800000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000100000000000003e801000000000000000a0201230f4f5d4b7c6fa845806ee4f67713459e1b69e8e60fcee2e4940c7a0d5de1b2010000000124101100001f5175517551755175517551755175517551755175517551755175517551755101230f4f5d4b7c6fa845806ee4f67713459e1b69e8e60fcee2e4940c7a0d5de1b2010000000005f5e100000000000000";

    /// Two inputs spending adjacent outputs of the same previous transaction.
    const TWO_INPUT_TX: &str = "010000000002715df5ccebaf02ff18d6fae7263fa69fed5de59c900f4749556eba41bc7bf2af000000000000000000715df5ccebaf02ff18d6fae7263fa69fed5de59c900f4749556eba41bc7bf2af0100000000000000000201230f4f5d4b7c6fa845806ee4f67713459e1b69e8e60fcee2e4940c7a0d5de1b2010000000124101100001f5175517551755175517551755175517551755175517551755175517551755101230f4f5d4b7c6fa845806ee4f67713459e1b69e8e60fcee2e4940c7a0d5de1b2010000000005f5e100000000000000";

    /// The same two-input transaction with a witness on the first input.
    const TWO_INPUT_WITNESS_TX: &str = "010000000102715df5ccebaf02ff18d6fae7263fa69fed5de59c900f4749556eba41bc7bf2af000000000000000000715df5ccebaf02ff18d6fae7263fa69fed5de59c900f4749556eba41bc7bf2af0100000000000000000201230f4f5d4b7c6fa845806ee4f67713459e1b69e8e60fcee2e4940c7a0d5de1b2010000000124101100001f5175517551755175517551755175517551755175517551755175517551755101230f4f5d4b7c6fa845806ee4f67713459e1b69e8e60fcee2e4940c7a0d5de1b2010000000005f5e10000000000000000000102beef000000000000000000";

    const SPK: &str = "76a914f54a5851e9372b87810a8e60cdd2e7cfd80b6e3188ac";

    fn parse_tx(hex: &str) -> Transaction {
        deserialize(&Vec::<u8>::from_hex(hex).unwrap()).unwrap()
    }

    fn parse_script(hex: &str) -> Script {
        Script::from(Vec::<u8>::from_hex(hex).unwrap())
    }

    fn test_legacy_sighash(tx: &str, input_index: usize, hash_type: u32, expected: &str) {
        let tx = parse_tx(tx);
        let cache = SighashCache::new(&tx);
        let got = cache.legacy_signature_hash(input_index, &parse_script(SPK), hash_type);
        assert_eq!(got.to_string(), expected);
    }

    #[test]
    fn legacy_sighashes() {
        // generated by the Elements Core test harness
        test_legacy_sighash(REF_TX, 0, 0x01, "769ad754a77282712895475eb17251bcb8f3cc35dc13406fa1188ef2707556cf");
        test_legacy_sighash(REF_TX, 0, 0x02, "b399ca018b4fec7d94e47092b72d25983db2d0d16eaa6a672050add66077ef40");
        test_legacy_sighash(REF_TX, 0, 0x03, "4efef74996f840ed104c0b69461f33da2e364288f3015c55b2516a68e3ee60bc");
        test_legacy_sighash(REF_TX, 0, 0x81, "a70a59ae29f1d9f4461f12e730e5cb75d3a75312666e8d911584aebb8e4afc5c");
        test_legacy_sighash(REF_TX, 0, 0x82, "5f3694a35f3b994639d3fb1f6214ec166f9e0721c7ab3f216e465b9b2728d834");
        test_legacy_sighash(REF_TX, 0, 0x83, "4c18486c473dc31c264c477c55e9c17d70fddb9f567c7d411ce922261577167c");

        // issuance data is carried into the signing serialization
        test_legacy_sighash(ISSUANCE_TX, 0, 0x01, "9f00e1758a230aaf6c9bce777701a604f50b2ac5f2a07e1cd478d8a0e70fc195");
    }

    #[test]
    fn legacy_sighash_single_blanks_earlier_outputs() {
        // input 1 signs output 1; output 0 is replaced by the blank output
        // with the all-ones explicit value
        test_legacy_sighash(TWO_INPUT_TX, 1, 0x03, "1192c91c2f4269263e091b4f6f536ab5b6fd6e19b6944483752d8d4092ee6830");
        test_legacy_sighash(TWO_INPUT_TX, 1, 0x83, "5035652619a2d9b1732d823a677e0a7b8d170df78691ca4b4aa3c6a8b2ab2d4b");
    }

    #[test]
    fn legacy_sighash_witness_value_substitution() {
        // on a transaction with witnesses, output values are replaced by an
        // explicit zero in the signing serialization
        test_legacy_sighash(TWO_INPUT_WITNESS_TX, 0, 0x01, "90a799cc915e39e413a4b96f26904d33f8fa7bd41990e7eb423cfcc4097af40f");
        test_legacy_sighash(TWO_INPUT_WITNESS_TX, 1, 0x03, "a02a791a9d541c0b105d12e1e7fede79c745a2bff76db4dcabdee89a93cf4eb2");
    }

    #[test]
    fn legacy_sighash_sentinels() {
        let tx = parse_tx(REF_TX);
        let cache = SighashCache::new(&tx);
        let one = LegacySighash::from_byte_array(ONE_32);

        // input index out of range
        assert_eq!(cache.legacy_signature_hash(1, &parse_script(SPK), 0x01), one);
        // SIGHASH_SINGLE with no corresponding output
        let two_in = parse_tx(TWO_INPUT_TX);
        let mut truncated = two_in.clone();
        truncated.output.truncate(1);
        let cache = SighashCache::new(&truncated);
        assert_eq!(cache.legacy_signature_hash(1, &parse_script(SPK), 0x03), one);
    }

    #[test]
    fn legacy_sighash_strips_code_separators() {
        let tx = parse_tx(REF_TX);
        let cache = SighashCache::new(&tx);
        let with_separator: Script =
            Script::from(Vec::<u8>::from_hex(&format!("ab{}", SPK)).unwrap());
        assert_eq!(
            cache.legacy_signature_hash(0, &with_separator, 0x01),
            cache.legacy_signature_hash(0, &parse_script(SPK), 0x01),
        );
    }

    fn test_segwit_sighash(
        tx: &str,
        input_index: usize,
        value: &str,
        hash_type: EcdsaSighashType,
        expected: &str,
    ) {
        let tx = parse_tx(tx);
        let value: confidential::Value = deserialize(&Vec::<u8>::from_hex(value).unwrap()).unwrap();
        let mut cache = SighashCache::new(&tx);
        let got = cache
            .segwit_signature_hash(input_index, &parse_script(SPK), value, hash_type)
            .unwrap();
        assert_eq!(got.to_string(), expected);
    }

    #[test]
    fn segwit_v0_sighashes_confidential_value() {
        use EcdsaSighashType::*;

        // generated by the Elements Core test harness; the spent value is a
        // commitment and is committed to verbatim
        const VALUE: &str = "0850863ad64a87ae8a2fe83c1af1a8403cb53f53e486d8511dad8a04887e5b2352";
        test_segwit_sighash(REF_TX, 0, VALUE, All, "e201b4019129a03ca0304989731c6dccde232c854d86fce999b7411da1e90048");
        test_segwit_sighash(REF_TX, 0, VALUE, None, "bfc6599816673083334ae82ac3459a2d0fef478d3e580e3ae203a28347502cb4");
        test_segwit_sighash(REF_TX, 0, VALUE, Single, "4bc8546e32d31c5415444138184696e80f49e537a083bfcc89be2ab41d962e76");
        test_segwit_sighash(REF_TX, 0, VALUE, AllPlusAnyoneCanPay, "b70ba5f4a1c2c48cd7f2104b2baa6a5c97987eb560916d39a5d427deb8b1dc2a");
        test_segwit_sighash(REF_TX, 0, VALUE, NonePlusAnyoneCanPay, "6d6a4749c09ffd9a8df4c5de5d939325d896009e18f94bb095c9d7d695a8465e");
        test_segwit_sighash(REF_TX, 0, VALUE, SinglePlusAnyoneCanPay, "7fc34367b42bf0e2bb78d8c20f45a64b81b2d4fbb59cbff8649322f619e88a0f");

        test_segwit_sighash(ISSUANCE_TX, 0, VALUE, All, "ea946ee417d5a16a1038b2c3b54d1b7b12a9f98c0dcb4684bf005eb1c27d0c92");
    }

    #[test]
    fn segwit_v0_sighashes_explicit_value() {
        use EcdsaSighashType::*;

        const VALUE: &str = "010000000005f5e100";
        test_segwit_sighash(REF_TX, 0, VALUE, All, "71141639d982f1a1a8901e32fb1a9e15a0ea168b37d33300a3c9619fc3767388");
        test_segwit_sighash(REF_TX, 0, VALUE, None, "00730922d0e1d55b4b5fffafd087b06aeb44c4cedb58d8e182cbb9b87382cddb");
        test_segwit_sighash(REF_TX, 0, VALUE, Single, "100063ea0923ef4432dd51c5756383530f28b31ffe9d50b59a11b94a63c84c78");
        test_segwit_sighash(REF_TX, 0, VALUE, AllPlusAnyoneCanPay, "e1c4ddf5f723759f7d99d4f162155119160b1c6b765fdbdb25aedb2059769b74");
        test_segwit_sighash(REF_TX, 0, VALUE, NonePlusAnyoneCanPay, "b0be275e0c69e89ef5c482fdf330038c3b2994ebce3e3639bb81456d15a95a7a");
        test_segwit_sighash(REF_TX, 0, VALUE, SinglePlusAnyoneCanPay, "27c293da7a0f08e161fa2a77aeefa6743c929905597b5bcb28f2015fe648aa0c");
    }

    #[test]
    fn segwit_v0_out_of_bounds_input() {
        let tx = parse_tx(REF_TX);
        let mut cache = SighashCache::new(&tx);
        let err = cache
            .segwit_signature_hash(
                5,
                &parse_script(SPK),
                confidential::Value::Explicit(1),
                EcdsaSighashType::All,
            )
            .unwrap_err();
        assert_eq!(err, Error::IndexOutOfInputsBounds { index: 5, inputs_size: 1 });
    }

    fn taproot_fixture() -> (BlockHash, Script, TxOut) {
        let genesis_hash: BlockHash =
            "a771da8e52ee6ad581ed1e9a99825e5b3b7992225534eaa2ae23244fe26ab1c1".parse().unwrap();
        let script = parse_script(&format!("5120{}", "33".repeat(32)));

        let mut asset = [0u8; 32];
        let mut value = [0u8; 32];
        for i in 0..32 {
            asset[i] = i as u8;
            value[i] = i as u8 + 1;
        }
        let prevout = TxOut {
            asset: confidential::Asset::Confidential(0x0a, asset),
            value: confidential::Value::Confidential(0x08, value),
            nonce: confidential::Nonce::Null,
            script_pubkey: script.clone(),
            witness: Default::default(),
        };
        (genesis_hash, script, prevout)
    }

    #[test]
    fn taproot_key_spend_sighash() {
        let tx = parse_tx(REF_TX);
        let (genesis_hash, _, prevout) = taproot_fixture();
        let prevouts = [prevout];

        let mut cache = SighashCache::new(&tx);
        let got = cache
            .taproot_key_spend_signature_hash(
                0,
                &Prevouts::All(&prevouts),
                SchnorrSighashType::Default,
                genesis_hash,
            )
            .unwrap();
        assert_eq!(
            got.to_string(),
            "cfa8b70030e07aa8cf459e12bf208e1016dc867e91e3953e04460281a2665605"
        );

        let got = cache
            .taproot_key_spend_signature_hash(
                0,
                &Prevouts::All(&prevouts),
                SchnorrSighashType::All,
                genesis_hash,
            )
            .unwrap();
        assert_eq!(
            got.to_string(),
            "00cfda1c1d8bb9bb33aebc22ab09676bd45d19649d2b323f58bd105028f31999"
        );
    }

    #[test]
    fn taproot_anyonecanpay_sighash() {
        let tx = parse_tx(REF_TX);
        let (genesis_hash, _, prevout) = taproot_fixture();

        // a single prevout suffices under ANYONECANPAY
        let mut cache = SighashCache::new(&tx);
        let got = cache
            .taproot_key_spend_signature_hash(
                0,
                &Prevouts::One(0, &prevout),
                SchnorrSighashType::NonePlusAnyoneCanPay,
                genesis_hash,
            )
            .unwrap();
        assert_eq!(
            got.to_string(),
            "4928c4613fd73345c7d99cf856143797e3cfbd318d8c77bf48b27acb5d2a296a"
        );
    }

    #[test]
    fn taproot_script_spend_sighash() {
        let tx = parse_tx(REF_TX);
        let (genesis_hash, _, prevout) = taproot_fixture();
        let leaf_hash = TapLeafHash::from_byte_array([0x44; 32]);
        let annex = [0x50u8, 0xde, 0xad, 0xbe, 0xef];

        let mut cache = SighashCache::new(&tx);
        let got = cache
            .taproot_signature_hash(
                0,
                &Prevouts::One(0, &prevout),
                Some(&annex[..]),
                Some(leaf_hash),
                SchnorrSighashType::SinglePlusAnyoneCanPay,
                genesis_hash,
            )
            .unwrap();
        assert_eq!(
            got.to_string(),
            "31acbf86a4ce4e35186d334516a7bf30638be72183cb3405431e8741afc8580b"
        );
    }

    #[test]
    fn taproot_issuance_sighash() {
        let tx = parse_tx(ISSUANCE_TX);
        let (genesis_hash, _, prevout) = taproot_fixture();
        let prevouts = [prevout];

        let mut cache = SighashCache::new(&tx);
        let got = cache
            .taproot_key_spend_signature_hash(
                0,
                &Prevouts::All(&prevouts),
                SchnorrSighashType::Default,
                genesis_hash,
            )
            .unwrap();
        assert_eq!(
            got.to_string(),
            "ef260f2170e24c07adba0ef8d707e803c42253bf1afc45030ff86ce2b5b8cb22"
        );

        // the ANYONECANPAY input block carries the issuance and the hash of
        // its (empty) issuance proofs
        let got = cache
            .taproot_key_spend_signature_hash(
                0,
                &Prevouts::All(&prevouts),
                SchnorrSighashType::AllPlusAnyoneCanPay,
                genesis_hash,
            )
            .unwrap();
        assert_eq!(
            got.to_string(),
            "bf2573cda843ab577078109a6218217ab5f00ee4a2e29c0080563c5b171ad7cc"
        );
    }

    #[test]
    fn taproot_prevout_errors() {
        let tx = parse_tx(REF_TX);
        let (genesis_hash, _, prevout) = taproot_fixture();

        let mut cache = SighashCache::new(&tx);
        // mismatched prevout count
        let empty: [TxOut; 0] = [];
        let err = cache
            .taproot_key_spend_signature_hash(
                0,
                &Prevouts::All(&empty),
                SchnorrSighashType::Default,
                genesis_hash,
            )
            .unwrap_err();
        assert_eq!(err, Error::PrevoutsSize);

        // a single prevout without ANYONECANPAY cannot provide the spent
        // asset/value and script hashes
        let err = cache
            .taproot_key_spend_signature_hash(
                0,
                &Prevouts::One(0, &prevout),
                SchnorrSighashType::Default,
                genesis_hash,
            )
            .unwrap_err();
        assert_eq!(err, Error::PrevoutKind);

        // out-of-bounds input index
        let prevouts = [prevout.clone()];
        let err = cache
            .taproot_key_spend_signature_hash(
                3,
                &Prevouts::All(&prevouts),
                SchnorrSighashType::Default,
                genesis_hash,
            )
            .unwrap_err();
        assert_eq!(err, Error::IndexOutOfInputsBounds { index: 3, inputs_size: 1 });
    }

    #[test]
    fn sighash_type_plumbing() {
        assert_eq!(
            EcdsaSighashType::from_consensus(SIGHASH_SINGLE | SIGHASH_ANYONECANPAY),
            EcdsaSighashType::SinglePlusAnyoneCanPay
        );
        // unmasked high bits are ignored the way consensus does
        assert_eq!(EcdsaSighashType::from_consensus(0x41), EcdsaSighashType::All);
        assert_eq!(EcdsaSighashType::from_consensus(0x04), EcdsaSighashType::All);
        assert_eq!(EcdsaSighashType::All.to_u32(), SIGHASH_ALL);
        assert_eq!(
            "SIGHASH_SINGLE|SIGHASH_ANYONECANPAY".parse::<EcdsaSighashType>().unwrap(),
            EcdsaSighashType::SinglePlusAnyoneCanPay
        );

        assert_eq!(
            SchnorrSighashType::from_consensus_u8(0x00).unwrap(),
            SchnorrSighashType::Default
        );
        assert_eq!(
            SchnorrSighashType::from_consensus_u8(0x04).unwrap_err(),
            Error::InvalidSighashType(4)
        );
    }
}
