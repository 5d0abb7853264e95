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

//! Confidential commitments.
//!
//! The three tag-prefixed field encodings of the Elements transaction format.
//! Each field is either null (a single `0x00` byte), explicit (cleartext
//! asset id, amount or nonce), or a Pedersen-style commitment whose internals
//! this crate never interprets: a commitment is carried as its tag byte plus
//! 32 opaque bytes and written back verbatim.

use std::{fmt, io, str};

use crate::encode::{self, Decodable, Encodable, ReadExt, WriteExt};

/// An Elements asset identifier, displayed in reverse byte order like a txid.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId([u8; 32]);

impl AssetId {
    /// Constructs an asset id from its wire bytes.
    pub fn from_byte_array(bytes: [u8; 32]) -> AssetId {
        AssetId(bytes)
    }

    /// Constructs an asset id from a byte slice of length 32.
    pub fn from_slice(sl: &[u8]) -> Result<AssetId, encode::Error> {
        if sl.len() != 32 {
            return Err(encode::Error::ParseFailed("asset id must be 32 bytes"));
        }
        let mut ret = [0u8; 32];
        ret.copy_from_slice(sl);
        Ok(AssetId(ret))
    }

    /// Returns the wire bytes of the asset id.
    pub fn to_byte_array(self) -> [u8; 32] {
        self.0
    }

    /// Returns a reference to the wire bytes of the asset id.
    pub fn as_byte_array(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in self.0.iter().rev() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl str::FromStr for AssetId {
    type Err = crate::hashes::hex::Error;

    fn from_str(s: &str) -> Result<AssetId, Self::Err> {
        use crate::hashes::hex::FromHex;

        let mut bytes = <[u8; 32]>::from_hex(s)?;
        bytes.reverse();
        Ok(AssetId(bytes))
    }
}

impl_hex_serde!(AssetId);

impl Encodable for AssetId {
    fn consensus_encode<S: io::Write>(&self, s: S) -> Result<usize, encode::Error> {
        self.0.consensus_encode(s)
    }
}

impl Decodable for AssetId {
    fn consensus_decode<D: io::Read>(d: D) -> Result<AssetId, encode::Error> {
        Ok(AssetId(<[u8; 32]>::consensus_decode(d)?))
    }
}

/// A confidential asset.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub enum Asset {
    /// No asset.
    Null,
    /// The cleartext asset id.
    Explicit(AssetId),
    /// An asset commitment: tag byte (0x0a or 0x0b) and 32 opaque bytes.
    Confidential(u8, [u8; 32]),
}

impl Asset {
    /// Constructs a commitment from its 33 wire bytes.
    pub fn from_commitment(bytes: &[u8]) -> Result<Asset, encode::Error> {
        if bytes.len() != 33 || (bytes[0] != 0x0a && bytes[0] != 0x0b) {
            return Err(encode::Error::ParseFailed("invalid asset commitment"));
        }
        let mut comm = [0u8; 32];
        comm.copy_from_slice(&bytes[1..]);
        Ok(Asset::Confidential(bytes[0], comm))
    }

    /// Whether the asset is null.
    pub fn is_null(&self) -> bool {
        matches!(*self, Asset::Null)
    }

    /// Whether the asset is a cleartext asset id.
    pub fn is_explicit(&self) -> bool {
        matches!(*self, Asset::Explicit(..))
    }

    /// Whether the asset is a blinded commitment.
    pub fn is_confidential(&self) -> bool {
        matches!(*self, Asset::Confidential(..))
    }

    /// Returns the cleartext asset id, if there is one.
    pub fn explicit(&self) -> Option<AssetId> {
        match *self {
            Asset::Explicit(id) => Some(id),
            _ => None,
        }
    }

    /// The length, in bytes, of the wire encoding including its tag byte.
    pub fn encoded_length(&self) -> usize {
        match *self {
            Asset::Null => 1,
            Asset::Explicit(..) | Asset::Confidential(..) => 33,
        }
    }
}

impl Default for Asset {
    fn default() -> Asset {
        Asset::Null
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Asset::Null => f.write_str("null"),
            Asset::Explicit(id) => fmt::Display::fmt(&id, f),
            Asset::Confidential(tag, comm) => {
                write!(f, "{:02x}", tag)?;
                for b in comm.iter() {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl Encodable for Asset {
    fn consensus_encode<S: io::Write>(&self, mut s: S) -> Result<usize, encode::Error> {
        match *self {
            Asset::Null => {
                s.emit_u8(0)?;
                Ok(1)
            }
            Asset::Explicit(id) => Ok(1u8.consensus_encode(&mut s)? + id.consensus_encode(&mut s)?),
            Asset::Confidential(tag, comm) => {
                Ok(tag.consensus_encode(&mut s)? + comm.consensus_encode(&mut s)?)
            }
        }
    }
}

impl Decodable for Asset {
    fn consensus_decode<D: io::Read>(mut d: D) -> Result<Asset, encode::Error> {
        match d.read_u8()? {
            0 => Ok(Asset::Null),
            1 => Ok(Asset::Explicit(AssetId::consensus_decode(&mut d)?)),
            tag @ 0x0a | tag @ 0x0b => {
                Ok(Asset::Confidential(tag, <[u8; 32]>::consensus_decode(&mut d)?))
            }
            _ => Err(encode::Error::ParseFailed("invalid confidential asset prefix")),
        }
    }
}

/// A confidential value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub enum Value {
    /// No value.
    Null,
    /// The cleartext amount in satoshis.
    Explicit(u64),
    /// A value commitment: tag byte (0x08 or 0x09) and 32 opaque bytes.
    Confidential(u8, [u8; 32]),
}

impl Value {
    /// Constructs a commitment from its 33 wire bytes.
    pub fn from_commitment(bytes: &[u8]) -> Result<Value, encode::Error> {
        if bytes.len() != 33 || (bytes[0] != 0x08 && bytes[0] != 0x09) {
            return Err(encode::Error::ParseFailed("invalid value commitment"));
        }
        let mut comm = [0u8; 32];
        comm.copy_from_slice(&bytes[1..]);
        Ok(Value::Confidential(bytes[0], comm))
    }

    /// Whether the value is null.
    pub fn is_null(&self) -> bool {
        matches!(*self, Value::Null)
    }

    /// Whether the value is a cleartext amount.
    pub fn is_explicit(&self) -> bool {
        matches!(*self, Value::Explicit(..))
    }

    /// Whether the value is a blinded commitment.
    pub fn is_confidential(&self) -> bool {
        matches!(*self, Value::Confidential(..))
    }

    /// Returns the cleartext amount, if there is one.
    pub fn explicit(&self) -> Option<u64> {
        match *self {
            Value::Explicit(n) => Some(n),
            _ => None,
        }
    }

    /// The length, in bytes, of the wire encoding including its tag byte.
    pub fn encoded_length(&self) -> usize {
        match *self {
            Value::Null => 1,
            Value::Explicit(..) => 9,
            Value::Confidential(..) => 33,
        }
    }
}

impl Default for Value {
    fn default() -> Value {
        Value::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Null => f.write_str("null"),
            Value::Explicit(n) => fmt::Display::fmt(&n, f),
            Value::Confidential(tag, comm) => {
                write!(f, "{:02x}", tag)?;
                for b in comm.iter() {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl Encodable for Value {
    fn consensus_encode<S: io::Write>(&self, mut s: S) -> Result<usize, encode::Error> {
        match *self {
            Value::Null => {
                s.emit_u8(0)?;
                Ok(1)
            }
            // explicit amounts are serialized big-endian inside the 9-byte field
            Value::Explicit(n) => {
                Ok(1u8.consensus_encode(&mut s)? + n.to_be_bytes().consensus_encode(&mut s)?)
            }
            Value::Confidential(tag, comm) => {
                Ok(tag.consensus_encode(&mut s)? + comm.consensus_encode(&mut s)?)
            }
        }
    }
}

impl Decodable for Value {
    fn consensus_decode<D: io::Read>(mut d: D) -> Result<Value, encode::Error> {
        match d.read_u8()? {
            0 => Ok(Value::Null),
            1 => Ok(Value::Explicit(u64::from_be_bytes(<[u8; 8]>::consensus_decode(&mut d)?))),
            tag @ 0x08 | tag @ 0x09 => {
                Ok(Value::Confidential(tag, <[u8; 32]>::consensus_decode(&mut d)?))
            }
            _ => Err(encode::Error::ParseFailed("invalid confidential value prefix")),
        }
    }
}

/// A confidential nonce.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub enum Nonce {
    /// No nonce.
    Null,
    /// A cleartext nonce.
    Explicit([u8; 32]),
    /// An ECDH public key: tag byte (0x02 or 0x03) and 32 opaque bytes.
    Confidential(u8, [u8; 32]),
}

impl Nonce {
    /// Constructs a nonce from its 33 wire bytes.
    pub fn from_commitment(bytes: &[u8]) -> Result<Nonce, encode::Error> {
        if bytes.len() != 33 || (bytes[0] != 0x02 && bytes[0] != 0x03) {
            return Err(encode::Error::ParseFailed("invalid nonce commitment"));
        }
        let mut comm = [0u8; 32];
        comm.copy_from_slice(&bytes[1..]);
        Ok(Nonce::Confidential(bytes[0], comm))
    }

    /// Whether the nonce is null.
    pub fn is_null(&self) -> bool {
        matches!(*self, Nonce::Null)
    }

    /// The length, in bytes, of the wire encoding including its tag byte.
    pub fn encoded_length(&self) -> usize {
        match *self {
            Nonce::Null => 1,
            Nonce::Explicit(..) | Nonce::Confidential(..) => 33,
        }
    }
}

impl Default for Nonce {
    fn default() -> Nonce {
        Nonce::Null
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Nonce::Null => f.write_str("null"),
            Nonce::Explicit(data) => {
                for b in data.iter() {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Nonce::Confidential(tag, comm) => {
                write!(f, "{:02x}", tag)?;
                for b in comm.iter() {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl Encodable for Nonce {
    fn consensus_encode<S: io::Write>(&self, mut s: S) -> Result<usize, encode::Error> {
        match *self {
            Nonce::Null => {
                s.emit_u8(0)?;
                Ok(1)
            }
            Nonce::Explicit(data) => {
                Ok(1u8.consensus_encode(&mut s)? + data.consensus_encode(&mut s)?)
            }
            Nonce::Confidential(tag, comm) => {
                Ok(tag.consensus_encode(&mut s)? + comm.consensus_encode(&mut s)?)
            }
        }
    }
}

impl Decodable for Nonce {
    fn consensus_decode<D: io::Read>(mut d: D) -> Result<Nonce, encode::Error> {
        match d.read_u8()? {
            0 => Ok(Nonce::Null),
            1 => Ok(Nonce::Explicit(<[u8; 32]>::consensus_decode(&mut d)?)),
            tag @ 0x02 | tag @ 0x03 => {
                Ok(Nonce::Confidential(tag, <[u8; 32]>::consensus_decode(&mut d)?))
            }
            _ => Err(encode::Error::ParseFailed("invalid confidential nonce prefix")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{deserialize, serialize};
    use crate::hashes::hex::FromHex;

    #[test]
    fn asset_roundtrip() {
        let bytes =
            Vec::<u8>::from_hex("01230f4f5d4b7c6fa845806ee4f67713459e1b69e8e60fcee2e4940c7a0d5de1b2")
                .unwrap();
        let asset: Asset = deserialize(&bytes).unwrap();
        assert!(asset.is_explicit());
        assert_eq!(asset.encoded_length(), 33);
        assert_eq!(serialize(&asset), bytes);
        assert_eq!(
            asset.explicit().unwrap().to_string(),
            "b2e15d0d7a0c94e4e2ce0fe6e8691b9e451377f6e46e8045a86f7c4b5d4f0f23",
        );
    }

    #[test]
    fn value_roundtrip() {
        // explicit amounts are big-endian on the wire
        let bytes = Vec::<u8>::from_hex("010000000005f5e100").unwrap();
        let value: Value = deserialize(&bytes).unwrap();
        assert_eq!(value, Value::Explicit(100_000_000));
        assert_eq!(value.encoded_length(), 9);
        assert_eq!(serialize(&value), bytes);

        let bytes =
            Vec::<u8>::from_hex("0850863ad64a87ae8a2fe83c1af1a8403cb53f53e486d8511dad8a04887e5b2352")
                .unwrap();
        let value: Value = deserialize(&bytes).unwrap();
        assert!(value.is_confidential());
        assert_eq!(value.encoded_length(), 33);
        assert_eq!(serialize(&value), bytes);
    }

    #[test]
    fn nonce_roundtrip() {
        let null: Nonce = deserialize(&[0u8]).unwrap();
        assert!(null.is_null());
        assert_eq!(serialize(&null), vec![0u8]);

        let mut bytes = vec![0x02u8];
        bytes.extend_from_slice(&[0x11u8; 32]);
        let nonce: Nonce = deserialize(&bytes).unwrap();
        assert_eq!(nonce, Nonce::Confidential(0x02, [0x11; 32]));
        assert_eq!(serialize(&nonce), bytes);
    }

    #[test]
    fn bad_prefixes() {
        // a value prefix is not a valid asset prefix and vice versa
        let mut bytes = vec![0x08u8];
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(deserialize::<Asset>(&bytes).is_err());

        let mut bytes = vec![0x0au8];
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(deserialize::<Value>(&bytes).is_err());

        assert!(Asset::from_commitment(&[0x0a; 32]).is_err());
        assert!(Value::from_commitment(&[0x01; 33]).is_err());
        assert!(Nonce::from_commitment(&[0x02; 33]).is_ok());
    }

    #[test]
    fn asset_id_display_reverses() {
        let id = AssetId::from_byte_array([0xab; 32]);
        assert_eq!(id.to_string(), "ab".repeat(32));

        let id: AssetId =
            "6f0e7e58941bc2208eb6cc21b342c3ea4f9a5a0f1b2a0b822f9c4e648f80c814".parse().unwrap();
        assert_eq!(id.as_byte_array()[0], 0x14);
        assert_eq!(
            id.to_string(),
            "6f0e7e58941bc2208eb6cc21b342c3ea4f9a5a0f1b2a0b822f9c4e648f80c814"
        );
    }
}
