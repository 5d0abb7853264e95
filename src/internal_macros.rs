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

macro_rules! impl_consensus_encoding {
    ($thing:ident, $($field:ident),+) => (
        impl $crate::encode::Encodable for $thing {
            #[inline]
            fn consensus_encode<S: ::std::io::Write>(
                &self,
                mut s: S,
            ) -> Result<usize, $crate::encode::Error> {
                let mut len = 0;
                $(len += self.$field.consensus_encode(&mut s)?;)+
                Ok(len)
            }
        }

        impl $crate::encode::Decodable for $thing {
            #[inline]
            fn consensus_decode<D: ::std::io::Read>(
                mut d: D,
            ) -> Result<$thing, $crate::encode::Error> {
                Ok($thing {
                    $($field: $crate::encode::Decodable::consensus_decode(&mut d)?),+
                })
            }
        }
    );
}

/// Serde impls for 32-byte newtypes with a hex `Display`/`FromStr` pair:
/// hex strings for human-readable formats, raw wire bytes otherwise.
macro_rules! impl_hex_serde {
    ($t:ident) => {
        #[cfg(feature = "serde")]
        impl $crate::serde::Serialize for $t {
            fn serialize<S: $crate::serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                if s.is_human_readable() {
                    s.collect_str(self)
                } else {
                    s.serialize_bytes(&self.to_byte_array()[..])
                }
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> $crate::serde::Deserialize<'de> for $t {
            fn deserialize<D: $crate::serde::Deserializer<'de>>(d: D) -> Result<$t, D::Error> {
                if d.is_human_readable() {
                    struct HexVisitor;

                    impl<'de> $crate::serde::de::Visitor<'de> for HexVisitor {
                        type Value = $t;

                        fn expecting(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                            f.write_str("an ASCII hex string")
                        }

                        fn visit_str<E: $crate::serde::de::Error>(
                            self,
                            v: &str,
                        ) -> Result<Self::Value, E> {
                            ::std::str::FromStr::from_str(v).map_err(E::custom)
                        }
                    }

                    d.deserialize_str(HexVisitor)
                } else {
                    struct BytesVisitor;

                    impl<'de> $crate::serde::de::Visitor<'de> for BytesVisitor {
                        type Value = $t;

                        fn expecting(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                            f.write_str("a bytestring")
                        }

                        fn visit_bytes<E: $crate::serde::de::Error>(
                            self,
                            v: &[u8],
                        ) -> Result<Self::Value, E> {
                            if v.len() != 32 {
                                Err(E::invalid_length(v.len(), &"32"))
                            } else {
                                let mut ret = [0; 32];
                                ret.copy_from_slice(v);
                                Ok($t::from_byte_array(ret))
                            }
                        }
                    }

                    d.deserialize_bytes(BytesVisitor)
                }
            }
        }
    };
}

macro_rules! impl_hashencode {
    ($hashtype:ident) => {
        impl $crate::encode::Encodable for $hashtype {
            fn consensus_encode<S: ::std::io::Write>(
                &self,
                s: S,
            ) -> Result<usize, $crate::encode::Error> {
                use $crate::hashes::Hash;
                self.as_byte_array().consensus_encode(s)
            }
        }

        impl $crate::encode::Decodable for $hashtype {
            fn consensus_decode<D: ::std::io::Read>(d: D) -> Result<Self, $crate::encode::Error> {
                use $crate::hashes::Hash;
                Ok(Self::from_byte_array(
                    <<$hashtype as $crate::hashes::Hash>::Bytes>::consensus_decode(d)?,
                ))
            }
        }
    };
}
