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

//! Script byte strings.
//!
//! The codec treats scripts as opaque byte strings; the only structural
//! operation it performs is removal of `OP_CODESEPARATOR` for the legacy
//! signature hash, which requires decoding push opcodes so that pushed data
//! containing the opcode byte is left alone.

use std::{fmt, io};

use crate::encode::{self, Decodable, Encodable};

/// The `OP_CODESEPARATOR` opcode.
pub const OP_CODESEPARATOR: u8 = 0xab;

const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;
const OP_PUSHDATA4: u8 = 0x4e;

/// An Elements script.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Script(Box<[u8]>);

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Script(")?;
        fmt::LowerHex::fmt(self, f)?;
        write!(f, ")")
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::LowerHex for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &ch in self.0.iter() {
            write!(f, "{:02x}", ch)?;
        }
        Ok(())
    }
}

impl From<Vec<u8>> for Script {
    fn from(v: Vec<u8>) -> Script {
        Script(v.into_boxed_slice())
    }
}

impl From<&[u8]> for Script {
    fn from(v: &[u8]) -> Script {
        Script(v.to_vec().into_boxed_slice())
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Script {
    /// Creates a new empty script.
    pub fn new() -> Script {
        Script(vec![].into_boxed_slice())
    }

    /// The length in bytes of the script.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the script is the empty script.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the script data as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns a copy of the script data.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Iterates over the script instructions.
    pub fn instructions(&self) -> Instructions {
        Instructions { data: &self.0 }
    }

    /// Returns a copy of the script with every `OP_CODESEPARATOR` removed.
    ///
    /// Push opcodes are decoded so that pushed data containing the
    /// `OP_CODESEPARATOR` byte survives. If the script ends in a malformed
    /// push the trailing bytes are carried over unchanged.
    pub fn without_code_separators(&self) -> Script {
        let mut ret = Vec::with_capacity(self.0.len());
        let mut iter = self.instructions();
        loop {
            let start = self.0.len() - iter.data.len();
            match iter.next() {
                Some(Ok(Instruction::Op(OP_CODESEPARATOR))) => {}
                Some(Ok(_)) => {
                    let end = self.0.len() - iter.data.len();
                    ret.extend_from_slice(&self.0[start..end]);
                }
                Some(Err(_)) => {
                    ret.extend_from_slice(&self.0[start..]);
                    break;
                }
                None => break,
            }
        }
        Script(ret.into_boxed_slice())
    }
}

/// A script instruction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Instruction<'a> {
    /// A data push together with the pushed bytes.
    PushBytes(&'a [u8]),
    /// Any non-push opcode.
    Op(u8),
}

/// Iterator over a script returning parsed opcodes.
pub struct Instructions<'a> {
    data: &'a [u8],
}

/// A script instruction that could not be decoded, with the number of bytes
/// remaining at the point of failure.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct EarlyEndOfScript(pub usize);

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction<'a>, EarlyEndOfScript>;

    fn next(&mut self) -> Option<Self::Item> {
        let &opcode = self.data.first()?;

        let (push_len, advance) = match opcode {
            0x01..=0x4b => (opcode as usize, 1),
            OP_PUSHDATA1 => {
                if self.data.len() < 2 {
                    self.data = &[];
                    return Some(Err(EarlyEndOfScript(1)));
                }
                (self.data[1] as usize, 2)
            }
            OP_PUSHDATA2 => {
                if self.data.len() < 3 {
                    let rem = self.data.len();
                    self.data = &[];
                    return Some(Err(EarlyEndOfScript(rem)));
                }
                (u16::from_le_bytes([self.data[1], self.data[2]]) as usize, 3)
            }
            OP_PUSHDATA4 => {
                if self.data.len() < 5 {
                    let rem = self.data.len();
                    self.data = &[];
                    return Some(Err(EarlyEndOfScript(rem)));
                }
                let n = u32::from_le_bytes([self.data[1], self.data[2], self.data[3], self.data[4]]);
                (n as usize, 5)
            }
            op => {
                self.data = &self.data[1..];
                return Some(Ok(Instruction::Op(op)));
            }
        };

        if self.data.len() < advance + push_len {
            let rem = self.data.len();
            self.data = &[];
            return Some(Err(EarlyEndOfScript(rem)));
        }
        let push = &self.data[advance..advance + push_len];
        self.data = &self.data[advance + push_len..];
        Some(Ok(Instruction::PushBytes(push)))
    }
}

impl Encodable for Script {
    #[inline]
    fn consensus_encode<S: io::Write>(&self, mut s: S) -> Result<usize, encode::Error> {
        let len = encode::VarInt(self.0.len() as u64).consensus_encode(&mut s)?;
        encode::WriteExt::emit_slice(&mut s, &self.0)?;
        Ok(len + self.0.len())
    }
}

impl Decodable for Script {
    #[inline]
    fn consensus_decode<D: io::Read>(d: D) -> Result<Script, encode::Error> {
        Ok(Script(Vec::<u8>::consensus_decode(d)?.into_boxed_slice()))
    }
}

#[cfg(feature = "serde")]
impl crate::serde::Serialize for Script {
    fn serialize<S: crate::serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.collect_str(self)
        } else {
            s.serialize_bytes(self.as_bytes())
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> crate::serde::Deserialize<'de> for Script {
    fn deserialize<D: crate::serde::Deserializer<'de>>(d: D) -> Result<Script, D::Error> {
        use std::fmt::Formatter;

        if d.is_human_readable() {
            struct Visitor;
            impl<'de> crate::serde::de::Visitor<'de> for Visitor {
                type Value = Script;

                fn expecting(&self, f: &mut Formatter) -> fmt::Result {
                    f.write_str("a script hex string")
                }

                fn visit_str<E: crate::serde::de::Error>(self, v: &str) -> Result<Script, E> {
                    use crate::hashes::hex::FromHex;
                    let v = Vec::<u8>::from_hex(v).map_err(E::custom)?;
                    Ok(Script::from(v))
                }
            }
            d.deserialize_str(Visitor)
        } else {
            struct BytesVisitor;
            impl<'de> crate::serde::de::Visitor<'de> for BytesVisitor {
                type Value = Script;

                fn expecting(&self, f: &mut Formatter) -> fmt::Result {
                    f.write_str("a script bytestring")
                }

                fn visit_bytes<E: crate::serde::de::Error>(self, v: &[u8]) -> Result<Script, E> {
                    Ok(Script::from(v))
                }
            }
            d.deserialize_bytes(BytesVisitor)
        }
    }
}
