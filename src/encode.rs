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

//! Consensus-encodable types.
//!
//! Anything that goes on the wire must be encoded with the `Encodable` trait,
//! since this data must be identical for all systems. The encoding is the
//! Elements network encoding: little-endian integers, Bitcoin-style compact
//! size prefixes, and raw byte strings.

use std::{error, fmt, io, mem};

use crate::hashes::{sha256, sha256d, Hash};
use crate::transaction::{TxIn, TxOut};

/// Encoding error.
#[derive(Debug)]
pub enum Error {
    /// An I/O error. Running out of input surfaces here as
    /// [`io::ErrorKind::UnexpectedEof`].
    Io(io::Error),
    /// Tried to allocate an oversized vector.
    OversizedVectorAllocation {
        /// The capacity requested.
        requested: usize,
        /// The maximum capacity.
        max: usize,
    },
    /// Parsing error.
    ParseFailed(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref e) => write!(f, "I/O error: {}", e),
            Error::OversizedVectorAllocation { requested, max } => {
                write!(f, "oversized vector allocation: requested {}, maximum {}", requested, max)
            }
            Error::ParseFailed(e) => write!(f, "parse failed: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            Error::OversizedVectorAllocation { .. } | Error::ParseFailed(..) => None,
        }
    }
}

#[doc(hidden)]
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

/// Encodes an object into a vector.
pub fn serialize<T: Encodable + ?Sized>(data: &T) -> Vec<u8> {
    let mut encoder = Vec::new();
    let len = data.consensus_encode(&mut encoder).expect("in-memory writers don't error");
    debug_assert_eq!(len, encoder.len());
    encoder
}

/// Encodes an object into a hex-encoded string.
pub fn serialize_hex<T: Encodable + ?Sized>(data: &T) -> String {
    use std::fmt::Write;

    let bytes = serialize(data);
    let mut ret = String::with_capacity(2 * bytes.len());
    for b in bytes {
        write!(ret, "{:02x}", b).expect("writing to a string cannot fail");
    }
    ret
}

/// Deserializes an object from a byte slice, erroring if the deserialization
/// does not consume the entire slice.
pub fn deserialize<T: Decodable>(data: &[u8]) -> Result<T, Error> {
    let (rv, consumed) = deserialize_partial(data)?;

    if consumed == data.len() {
        Ok(rv)
    } else {
        Err(Error::ParseFailed("data not consumed entirely when explicitly deserializing"))
    }
}

/// Deserializes an object from a byte slice, without the trailing-bytes check
/// of [`deserialize`]. Returns the object and the number of bytes consumed.
pub fn deserialize_partial<T: Decodable>(data: &[u8]) -> Result<(T, usize), Error> {
    let mut decoder = io::Cursor::new(data);
    let rv = Decodable::consensus_decode(&mut decoder)?;
    let consumed = decoder.position() as usize;

    Ok((rv, consumed))
}

/// Extensions of `Write` to encode data as per Elements consensus.
pub trait WriteExt {
    /// Outputs a 64-bit unsigned integer.
    fn emit_u64(&mut self, v: u64) -> Result<(), io::Error>;
    /// Outputs a 32-bit unsigned integer.
    fn emit_u32(&mut self, v: u32) -> Result<(), io::Error>;
    /// Outputs a 16-bit unsigned integer.
    fn emit_u16(&mut self, v: u16) -> Result<(), io::Error>;
    /// Outputs an 8-bit unsigned integer.
    fn emit_u8(&mut self, v: u8) -> Result<(), io::Error>;
    /// Outputs a 32-bit signed integer.
    fn emit_i32(&mut self, v: i32) -> Result<(), io::Error>;
    /// Outputs a byte slice.
    fn emit_slice(&mut self, v: &[u8]) -> Result<(), io::Error>;
}

/// Extensions of `Read` to decode data as per Elements consensus.
pub trait ReadExt {
    /// Reads a 64-bit unsigned integer.
    fn read_u64(&mut self) -> Result<u64, Error>;
    /// Reads a 32-bit unsigned integer.
    fn read_u32(&mut self) -> Result<u32, Error>;
    /// Reads a 16-bit unsigned integer.
    fn read_u16(&mut self) -> Result<u16, Error>;
    /// Reads an 8-bit unsigned integer.
    fn read_u8(&mut self) -> Result<u8, Error>;
    /// Reads a 32-bit signed integer.
    fn read_i32(&mut self) -> Result<i32, Error>;
    /// Reads a byte slice.
    fn read_slice(&mut self, slice: &mut [u8]) -> Result<(), Error>;
}

macro_rules! encoder_fn {
    ($name:ident, $val_type:ty) => {
        #[inline]
        fn $name(&mut self, v: $val_type) -> Result<(), io::Error> {
            self.write_all(&v.to_le_bytes())
        }
    };
}

macro_rules! decoder_fn {
    ($name:ident, $val_type:ty, $byte_len:expr) => {
        #[inline]
        fn $name(&mut self) -> Result<$val_type, Error> {
            let mut val = [0; $byte_len];
            self.read_exact(&mut val[..]).map_err(Error::Io)?;
            Ok(<$val_type>::from_le_bytes(val))
        }
    };
}

impl<W: io::Write> WriteExt for W {
    encoder_fn!(emit_u64, u64);
    encoder_fn!(emit_u32, u32);
    encoder_fn!(emit_u16, u16);
    encoder_fn!(emit_i32, i32);

    #[inline]
    fn emit_u8(&mut self, v: u8) -> Result<(), io::Error> {
        self.write_all(&[v])
    }
    #[inline]
    fn emit_slice(&mut self, v: &[u8]) -> Result<(), io::Error> {
        self.write_all(v)
    }
}

impl<R: io::Read> ReadExt for R {
    decoder_fn!(read_u64, u64, 8);
    decoder_fn!(read_u32, u32, 4);
    decoder_fn!(read_u16, u16, 2);
    decoder_fn!(read_i32, i32, 4);

    #[inline]
    fn read_u8(&mut self) -> Result<u8, Error> {
        let mut slice = [0u8; 1];
        self.read_exact(&mut slice).map_err(Error::Io)?;
        Ok(slice[0])
    }
    #[inline]
    fn read_slice(&mut self, slice: &mut [u8]) -> Result<(), Error> {
        self.read_exact(slice).map_err(Error::Io)
    }
}

/// Maximum size, in bytes, of a vector we are allowed to decode.
pub const MAX_VEC_SIZE: usize = 4_000_000;

/// Data which can be encoded in a consensus-consistent way.
pub trait Encodable {
    /// Encodes an object with a well-defined format; returns the number of
    /// bytes written. The only errors returned are errors propagated from
    /// the writer.
    fn consensus_encode<S: io::Write>(&self, s: S) -> Result<usize, Error>;
}

/// Data which can be decoded in a consensus-consistent way.
pub trait Decodable: Sized {
    /// Decodes an object with a well-defined format.
    fn consensus_decode<D: io::Read>(d: D) -> Result<Self, Error>;
}

/// A variable-length unsigned integer (Bitcoin's compact size).
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Length of this varint when encoded: 1 for 0..=0xFC, 3 for
    /// 0xFD..=0xFFFF, 5 for 0x10000..=0xFFFFFFFF, and 9 otherwise.
    #[inline]
    pub fn size(&self) -> usize {
        match self.0 {
            0..=0xFC => 1,
            0xFD..=0xFFFF => 3,
            0x10000..=0xFFFFFFFF => 5,
            _ => 9,
        }
    }
}

impl Encodable for VarInt {
    #[inline]
    fn consensus_encode<S: io::Write>(&self, mut s: S) -> Result<usize, Error> {
        match self.0 {
            0..=0xFC => {
                s.emit_u8(self.0 as u8)?;
                Ok(1)
            }
            0xFD..=0xFFFF => {
                s.emit_u8(0xFD)?;
                s.emit_u16(self.0 as u16)?;
                Ok(3)
            }
            0x10000..=0xFFFFFFFF => {
                s.emit_u8(0xFE)?;
                s.emit_u32(self.0 as u32)?;
                Ok(5)
            }
            _ => {
                s.emit_u8(0xFF)?;
                s.emit_u64(self.0)?;
                Ok(9)
            }
        }
    }
}

impl Decodable for VarInt {
    // Non-minimal encodings are accepted on the way in; the encoder always
    // emits the minimal form. Minimality enforcement belongs to a consensus
    // validator, not the codec.
    #[inline]
    fn consensus_decode<D: io::Read>(mut d: D) -> Result<VarInt, Error> {
        match d.read_u8()? {
            0xFF => Ok(VarInt(d.read_u64()?)),
            0xFE => Ok(VarInt(d.read_u32()? as u64)),
            0xFD => Ok(VarInt(d.read_u16()? as u64)),
            n => Ok(VarInt(n as u64)),
        }
    }
}

// Primitive types
macro_rules! impl_int_encodable {
    ($ty:ident, $meth_dec:ident, $meth_enc:ident) => {
        impl Decodable for $ty {
            #[inline]
            fn consensus_decode<D: io::Read>(mut d: D) -> Result<$ty, Error> {
                ReadExt::$meth_dec(&mut d)
            }
        }

        impl Encodable for $ty {
            #[inline]
            fn consensus_encode<S: io::Write>(&self, mut s: S) -> Result<usize, Error> {
                s.$meth_enc(*self)?;
                Ok(mem::size_of::<$ty>())
            }
        }
    };
}

impl_int_encodable!(u8, read_u8, emit_u8);
impl_int_encodable!(u16, read_u16, emit_u16);
impl_int_encodable!(u32, read_u32, emit_u32);
impl_int_encodable!(u64, read_u64, emit_u64);
impl_int_encodable!(i32, read_i32, emit_i32);

macro_rules! impl_array {
    ( $size:expr ) => {
        impl Encodable for [u8; $size] {
            #[inline]
            fn consensus_encode<S: io::Write>(&self, mut s: S) -> Result<usize, Error> {
                s.emit_slice(&self[..])?;
                Ok($size)
            }
        }

        impl Decodable for [u8; $size] {
            #[inline]
            fn consensus_decode<D: io::Read>(mut d: D) -> Result<Self, Error> {
                let mut ret = [0; $size];
                d.read_slice(&mut ret)?;
                Ok(ret)
            }
        }
    };
}

impl_array!(4);
impl_array!(8);
impl_array!(32);
impl_array!(33);

impl Encodable for Vec<u8> {
    #[inline]
    fn consensus_encode<S: io::Write>(&self, mut s: S) -> Result<usize, Error> {
        let len = VarInt(self.len() as u64).consensus_encode(&mut s)?;
        s.emit_slice(self)?;
        Ok(len + self.len())
    }
}

impl Decodable for Vec<u8> {
    #[inline]
    fn consensus_decode<D: io::Read>(mut d: D) -> Result<Vec<u8>, Error> {
        let len = VarInt::consensus_decode(&mut d)?.0 as usize;
        if len > MAX_VEC_SIZE {
            return Err(Error::OversizedVectorAllocation { requested: len, max: MAX_VEC_SIZE });
        }
        let mut ret = vec![0u8; len];
        d.read_slice(&mut ret)?;
        Ok(ret)
    }
}

macro_rules! impl_vec {
    ($type:ty) => {
        impl Encodable for Vec<$type> {
            #[inline]
            fn consensus_encode<S: io::Write>(&self, mut s: S) -> Result<usize, Error> {
                let mut len = VarInt(self.len() as u64).consensus_encode(&mut s)?;
                for c in self.iter() {
                    len += c.consensus_encode(&mut s)?;
                }
                Ok(len)
            }
        }

        impl Decodable for Vec<$type> {
            #[inline]
            fn consensus_decode<D: io::Read>(mut d: D) -> Result<Vec<$type>, Error> {
                let len = VarInt::consensus_decode(&mut d)?.0;
                let byte_size = (len as usize)
                    .checked_mul(mem::size_of::<$type>())
                    .ok_or(Error::ParseFailed("invalid length"))?;
                if byte_size > MAX_VEC_SIZE {
                    return Err(Error::OversizedVectorAllocation {
                        requested: byte_size,
                        max: MAX_VEC_SIZE,
                    });
                }
                let mut ret = Vec::with_capacity(len as usize);
                for _ in 0..len {
                    ret.push(Decodable::consensus_decode(&mut d)?);
                }
                Ok(ret)
            }
        }
    };
}

impl_vec!(Vec<u8>);
impl_vec!(TxIn);
impl_vec!(TxOut);

impl Encodable for sha256d::Hash {
    fn consensus_encode<S: io::Write>(&self, s: S) -> Result<usize, Error> {
        self.as_byte_array().consensus_encode(s)
    }
}

impl Decodable for sha256d::Hash {
    fn consensus_decode<D: io::Read>(d: D) -> Result<Self, Error> {
        Ok(Self::from_byte_array(<<Self as Hash>::Bytes>::consensus_decode(d)?))
    }
}

impl Encodable for sha256::Hash {
    fn consensus_encode<S: io::Write>(&self, s: S) -> Result<usize, Error> {
        self.as_byte_array().consensus_encode(s)
    }
}

impl Decodable for sha256::Hash {
    fn consensus_decode<D: io::Read>(d: D) -> Result<Self, Error> {
        Ok(Self::from_byte_array(<<Self as Hash>::Bytes>::consensus_decode(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_int() {
        // u8
        assert_eq!(serialize(&1u8), vec![1u8]);
        assert_eq!(serialize(&0u8), vec![0u8]);
        assert_eq!(serialize(&255u8), vec![255u8]);
        // u16
        assert_eq!(serialize(&5000u16), vec![136u8, 19]);
        // u32
        assert_eq!(serialize(&168430090u32), vec![10u8, 10, 10, 10]);
        // i32
        assert_eq!(serialize(&-1i32), vec![255u8, 255, 255, 255]);
        assert_eq!(serialize(&2i32), vec![2u8, 0, 0, 0]);
        // u64
        assert_eq!(serialize(&723401728380766730u64), vec![10u8, 10, 10, 10, 10, 10, 10, 10]);
    }

    #[test]
    fn serialize_varint() {
        assert_eq!(serialize(&VarInt(10)), vec![10u8]);
        assert_eq!(serialize(&VarInt(0xFC)), vec![0xFCu8]);
        assert_eq!(serialize(&VarInt(0xFD)), vec![0xFDu8, 0xFD, 0]);
        assert_eq!(serialize(&VarInt(0xFFF)), vec![0xFDu8, 0xFF, 0xF]);
        assert_eq!(serialize(&VarInt(0xF0F0F0F)), vec![0xFEu8, 0xF, 0xF, 0xF, 0xF]);
        assert_eq!(
            serialize(&VarInt(0xF0F0F0F0F0E0)),
            vec![0xFFu8, 0xE0, 0xF0, 0xF0, 0xF0, 0xF0, 0xF0, 0, 0]
        );

        for &n in [0u64, 0xFC, 0xFD, 0xFFFF, 0x10000, 0xFFFFFFFF, u64::max_value()].iter() {
            let encoded = serialize(&VarInt(n));
            assert_eq!(encoded.len(), VarInt(n).size());
            assert_eq!(deserialize::<VarInt>(&encoded).unwrap().0, n);
        }
    }

    #[test]
    fn varint_non_minimal() {
        // a non-minimal encoding of 32 decodes fine; the minimal form is emitted
        let decoded: VarInt = deserialize(&[0xFDu8, 0x20, 0x00]).unwrap();
        assert_eq!(decoded.0, 32);
        assert_eq!(serialize(&decoded), vec![0x20u8]);
    }

    #[test]
    fn serialize_varslice() {
        assert_eq!(serialize(&Vec::<u8>::new()), vec![0u8]);
        assert_eq!(serialize(&vec![1u8, 2, 3]), vec![3u8, 1, 2, 3]);

        let long: Vec<u8> = vec![7u8; 0xFD];
        let enc = serialize(&long);
        assert_eq!(&enc[..3], &[0xFDu8, 0xFD, 0]);
        assert_eq!(deserialize::<Vec<u8>>(&enc).unwrap(), long);
    }

    #[test]
    fn deserialize_truncated() {
        match deserialize::<u32>(&[1u8, 2]) {
            Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof => {}
            other => panic!("unexpected result: {:?}", other),
        }
        // varslice whose declared length runs past the end of the buffer
        match deserialize::<Vec<u8>>(&[5u8, 1, 2]) {
            Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn deserialize_trailing_bytes() {
        match deserialize::<u16>(&[1u8, 2, 3]) {
            Err(Error::ParseFailed(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        // the partial entry point is the explicit opt-out
        let (v, consumed) = deserialize_partial::<u16>(&[1u8, 2, 3]).unwrap();
        assert_eq!((v, consumed), (0x0201, 2));
    }

    #[test]
    fn deserialize_oversized_vec() {
        // 2^32 byte vector announced up front
        match deserialize::<Vec<u8>>(&[0xFEu8, 0xFF, 0xFF, 0xFF, 0xFF]) {
            Err(Error::OversizedVectorAllocation { max, .. }) => assert_eq!(max, MAX_VEC_SIZE),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
