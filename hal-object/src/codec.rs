//! Explicit wire codecs for property payloads
//!
//! The hardware layer moves properties as raw bytes. Each typed accessor names
//! the codec it reads and writes with, so the layout of every property is
//! stated at the call site instead of inferred from a type parameter.

use thiserror::Error;

use crate::address::{ClassId, PropertyElement, PropertyScope};
use crate::object::AudioObjectId;

const U32_SIZE: usize = std::mem::size_of::<u32>();

/// A payload did not have the layout the codec expects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("expected {expected} bytes, got {actual}")]
    Size { expected: usize, actual: usize },

    #[error("payload of {actual} bytes is not a whole number of {element}-byte elements")]
    Misaligned { element: usize, actual: usize },
}

/// Encodes and decodes one property's value
pub trait PropertyCodec {
    type Value;

    fn encode(value: &Self::Value) -> Vec<u8>;

    fn decode(bytes: &[u8]) -> Result<Self::Value, CodecError>;
}

/// One native-endian `u32`
pub struct U32Codec;

impl PropertyCodec for U32Codec {
    type Value = u32;

    fn encode(value: &u32) -> Vec<u8> {
        value.to_ne_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<u32, CodecError> {
        let raw: [u8; U32_SIZE] = bytes.try_into().map_err(|_| CodecError::Size {
            expected: U32_SIZE,
            actual: bytes.len(),
        })?;
        Ok(u32::from_ne_bytes(raw))
    }
}

/// A packed array of native-endian `u32`s; the element count is `len / 4`
pub struct U32ArrayCodec;

impl PropertyCodec for U32ArrayCodec {
    type Value = Vec<u32>;

    fn encode(values: &Vec<u32>) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    fn decode(bytes: &[u8]) -> Result<Vec<u32>, CodecError> {
        if bytes.len() % U32_SIZE != 0 {
            return Err(CodecError::Misaligned {
                element: U32_SIZE,
                actual: bytes.len(),
            });
        }
        Ok(bytes
            .chunks_exact(U32_SIZE)
            .map(|chunk| {
                let mut raw = [0u8; U32_SIZE];
                raw.copy_from_slice(chunk);
                u32::from_ne_bytes(raw)
            })
            .collect())
    }
}

/// Generates a codec for a newtype carried on the wire as a single `u32`
macro_rules! u32_newtype_codec {
    ($codec:ident, $ty:ty, $to:expr, $from:expr) => {
        pub struct $codec;

        impl PropertyCodec for $codec {
            type Value = $ty;

            #[allow(clippy::redundant_closure_call)]
            fn encode(value: &$ty) -> Vec<u8> {
                U32Codec::encode(&($to)(*value))
            }

            fn decode(bytes: &[u8]) -> Result<$ty, CodecError> {
                U32Codec::decode(bytes).map($from)
            }
        }
    };
}

u32_newtype_codec!(ClassIdCodec, ClassId, |c: ClassId| c.0, ClassId);
u32_newtype_codec!(ObjectIdCodec, AudioObjectId, |id: AudioObjectId| id.0, AudioObjectId);
u32_newtype_codec!(
    ScopeCodec,
    PropertyScope,
    |s: PropertyScope| s.code(),
    PropertyScope::from_code
);
u32_newtype_codec!(ElementCodec, PropertyElement, |e: PropertyElement| e.0, PropertyElement);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_u32_decode_requires_exact_size() {
        assert_eq!(U32Codec::decode(&75u32.to_ne_bytes()), Ok(75));
        assert_eq!(
            U32Codec::decode(&[1, 2]),
            Err(CodecError::Size {
                expected: 4,
                actual: 2
            })
        );
        assert!(U32Codec::decode(&[0; 8]).is_err());
    }

    #[test]
    fn test_u32_array_preserves_order_and_duplicates() {
        let values = vec![100, 0, 50, 50, 25];
        let bytes = U32ArrayCodec::encode(&values);
        assert_eq!(bytes.len(), 20);
        assert_eq!(U32ArrayCodec::decode(&bytes), Ok(values));
    }

    #[test]
    fn test_u32_array_empty_payload() {
        assert_eq!(U32ArrayCodec::decode(&[]), Ok(vec![]));
    }

    #[test]
    fn test_u32_array_rejects_partial_element() {
        assert_eq!(
            U32ArrayCodec::decode(&[0; 6]),
            Err(CodecError::Misaligned {
                element: 4,
                actual: 6
            })
        );
    }

    #[test]
    fn test_scope_codec_decodes_well_known_codes() {
        let bytes = U32Codec::encode(&PropertyScope::Output.code());
        assert_eq!(ScopeCodec::decode(&bytes), Ok(PropertyScope::Output));
    }

    proptest! {
        /// Any payload decodes to `len / 4` elements or is rejected as misaligned
        #[test]
        fn prop_u32_array_element_count(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            match U32ArrayCodec::decode(&bytes) {
                Ok(values) => {
                    prop_assert_eq!(bytes.len() % 4, 0);
                    prop_assert_eq!(values.len(), bytes.len() / 4);
                    prop_assert_eq!(U32ArrayCodec::encode(&values), bytes);
                }
                Err(e) => {
                    prop_assert_ne!(bytes.len() % 4, 0);
                    let expected = CodecError::Misaligned { element: 4, actual: bytes.len() };
                    prop_assert_eq!(e, expected);
                }
            }
        }
    }
}
