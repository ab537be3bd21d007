use crate::prelude::*;

/// Helper trait to serialize scalars and group elements through their canonical bytes.
pub trait KiteFromToBytes: Sized {
    /// Convert to bytes.
    fn kite_to_bytes(&self) -> Vec<u8>;
    /// Reconstruct from bytes.
    fn kite_from_bytes(bytes: &[u8]) -> Result<Self>;
}

/// Implement `KiteFromToBytes` for a scalar through `Scalar::to_bytes`.
#[macro_export]
macro_rules! to_from_bytes_scalar {
    ($t:ident) => {
        impl $crate::serialization::KiteFromToBytes for $t {
            fn kite_to_bytes(&self) -> $crate::prelude::Vec<u8> {
                <$t as $crate::traits::Scalar>::to_bytes(self)
            }
            fn kite_from_bytes(
                bytes: &[u8],
            ) -> core::result::Result<$t, $crate::errors::AlgebraError> {
                <$t as $crate::traits::Scalar>::from_bytes(bytes)
                    .map_err(|_| $crate::errors::AlgebraError::DeserializationError)
            }
        }
    };
}

/// Implement `KiteFromToBytes` for a group through its compressed encoding.
#[macro_export]
macro_rules! to_from_bytes_group {
    ($g:ident) => {
        impl $crate::serialization::KiteFromToBytes for $g {
            fn kite_to_bytes(&self) -> $crate::prelude::Vec<u8> {
                <$g as $crate::traits::Group>::to_compressed_bytes(self)
            }
            fn kite_from_bytes(
                bytes: &[u8],
            ) -> core::result::Result<$g, $crate::errors::AlgebraError> {
                <$g as $crate::traits::Group>::from_compressed_bytes(bytes)
                    .map_err(|_| $crate::errors::AlgebraError::DeserializationError)
            }
        }
    };
}

/// Derive serde from `KiteFromToBytes`: base64 strings for human-readable
/// formats, raw bytes otherwise.
#[macro_export]
macro_rules! serialize_deserialize {
    ($t:ident) => {
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                use $crate::serialization::KiteFromToBytes;
                if serializer.is_human_readable() {
                    serializer.serialize_str(&$crate::utils::b64enc(&self.kite_to_bytes()))
                } else {
                    serializer.serialize_bytes(&self.kite_to_bytes())
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                use $crate::serialization::KiteFromToBytes;
                let bytes = if deserializer.is_human_readable() {
                    deserializer.deserialize_str($crate::serialization::BytesVisitor)?
                } else {
                    deserializer.deserialize_bytes($crate::serialization::BytesVisitor)?
                };
                $t::kite_from_bytes(bytes.as_slice()).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Visitor accepting raw bytes, a base64 string or a byte sequence.
pub struct BytesVisitor;

impl<'de> serde::de::Visitor<'de> for BytesVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> core::fmt::Result {
        formatter.write_str("a valid KiteFromToBytes object")
    }

    fn visit_seq<V>(self, mut seq: V) -> core::result::Result<Vec<u8>, V::Error>
    where
        V: serde::de::SeqAccess<'de>,
    {
        let mut vec: Vec<u8> = vec![];
        while let Some(x) = seq.next_element()? {
            vec.push(x);
        }
        Ok(vec)
    }

    fn visit_bytes<E>(self, v: &[u8]) -> core::result::Result<Vec<u8>, E>
    where
        E: serde::de::Error,
    {
        Ok(v.to_vec())
    }

    fn visit_str<E>(self, v: &str) -> core::result::Result<Vec<u8>, E>
    where
        E: serde::de::Error,
    {
        b64dec(v).map_err(serde::de::Error::custom)
    }
}
