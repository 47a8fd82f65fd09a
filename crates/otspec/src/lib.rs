//! Big-endian reading and writing of sfnt table structures.
//!
//! Everything in a font file is a run of fixed-width big-endian fields, so
//! the whole crate is two traits: [`Serialize`] appends a value to a byte
//! buffer and [`Deserialize`] pulls one out of a [`ReaderContext`]. The
//! [`table!`] macro declares a flat table struct and implements both.
#![allow(non_snake_case, non_camel_case_types, clippy::upper_case_acronyms)]
#[macro_use]
extern crate shrinkwraprs;
use crate::types::*;
use std::convert::TryInto;
use std::mem;

mod tag;
pub mod types;

pub use tag::{InvalidTag, Tag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationError(pub String);
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeserializationError(pub String);

pub struct ReaderContext {
    pub input: Vec<u8>,
    pub ptr: usize,
}

impl ReaderContext {
    pub fn new(input: Vec<u8>) -> Self {
        ReaderContext { input, ptr: 0 }
    }

    fn consume_or_peek(
        &mut self,
        bytes: usize,
        consume: bool,
    ) -> Result<&[u8], DeserializationError> {
        let end = self
            .ptr
            .checked_add(bytes)
            .filter(|end| *end <= self.input.len())
            .ok_or_else(|| DeserializationError("End of file".to_string()))?;
        let subslice = &self.input[self.ptr..end];
        if consume {
            self.ptr = end;
        }
        Ok(subslice)
    }

    pub fn consume(&mut self, bytes: usize) -> Result<&[u8], DeserializationError> {
        self.consume_or_peek(bytes, true)
    }

    pub fn peek(&mut self, bytes: usize) -> Result<&[u8], DeserializationError> {
        self.consume_or_peek(bytes, false)
    }

    pub fn skip(&mut self, bytes: usize) {
        self.ptr += bytes;
    }

    /// Move the read pointer to an absolute position in the input.
    pub fn seek(&mut self, pos: usize) -> Result<(), DeserializationError> {
        if pos > self.input.len() {
            return Err(DeserializationError(format!(
                "Seek to {} beyond end of data ({} bytes)",
                pos,
                self.input.len()
            )));
        }
        self.ptr = pos;
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.input.len().saturating_sub(self.ptr)
    }
}

pub trait Serializer<T>
where
    T: Serialize,
{
    fn put(&mut self, data: T) -> Result<(), SerializationError>;
}

impl<T> Serializer<T> for Vec<u8>
where
    T: Serialize,
{
    fn put(&mut self, data: T) -> Result<(), SerializationError> {
        data.to_bytes(self)
    }
}

pub trait Deserializer<T>
where
    T: Deserialize,
{
    fn de(&mut self) -> Result<T, DeserializationError>;
    fn de_counted(&mut self, s: usize) -> Result<Vec<T>, DeserializationError>;
}

impl<T> Deserializer<T> for ReaderContext
where
    T: Deserialize,
{
    fn de(&mut self) -> Result<T, DeserializationError> {
        T::from_bytes(self)
    }
    fn de_counted(&mut self, s: usize) -> Result<Vec<T>, DeserializationError> {
        (0..s).map(|_| self.de()).collect()
    }
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Serialization error {:}", self.0)
    }
}

impl std::fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deserialization error {:}", self.0)
    }
}

impl std::error::Error for SerializationError {}
impl std::error::Error for DeserializationError {}

pub trait Serialize {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError>;
}

pub trait Deserialize {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError>
    where
        Self: std::marker::Sized;
}

macro_rules! serde_primitive {
    ($t: ty) => {
        impl Serialize for $t {
            fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
                data.extend_from_slice(&self.to_be_bytes());
                Ok(())
            }
        }

        impl Deserialize for $t {
            fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
                let bytes: &[u8] = c.consume(mem::size_of::<$t>())?;
                let bytes_array: [u8; mem::size_of::<$t>()] = bytes
                    .try_into()
                    .map_err(|_| DeserializationError("Slice with incorrect length".to_string()))?;
                Ok(<$t>::from_be_bytes(bytes_array))
            }
        }
    };
}

serde_primitive!(i8);
serde_primitive!(u8);
serde_primitive!(u16);
serde_primitive!(u32);
serde_primitive!(i16);
serde_primitive!(i32);
serde_primitive!(i64);

impl<const N: usize> Serialize for [u8; N] {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.extend_from_slice(self);
        Ok(())
    }
}

impl<const N: usize> Deserialize for [u8; N] {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        c.consume(N)?
            .try_into()
            .map_err(|_| DeserializationError("Slice with incorrect length".to_string()))
    }
}

impl<T> Serialize for Vec<T>
where
    T: Serialize,
{
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        for el in self {
            el.to_bytes(data)?
        }
        Ok(())
    }
}

/// Reads elements until the input runs out.
impl<T> Deserialize for Vec<T>
where
    T: Deserialize,
{
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let mut res: Vec<T> = vec![];
        while c.remaining() > 0 {
            res.push(c.de()?);
        }
        Ok(res)
    }
}

impl<T> Serialize for &T
where
    T: Serialize,
{
    fn to_bytes(
        &self,
        data: &mut std::vec::Vec<u8>,
    ) -> std::result::Result<(), SerializationError> {
        (*self).to_bytes(data)
    }
}

/// Declare flat tables: a struct whose fields are written and read in
/// declaration order.
///
/// ```
/// use otspec::types::*;
/// otspec::table!(example {
///     uint16 majorVersion
///     FWORD ascender
/// });
/// let t = example { majorVersion: 1, ascender: -2 };
/// assert_eq!(otspec::ser::to_bytes(&t).unwrap(), vec![0, 1, 0xff, 0xfe]);
/// ```
#[macro_export]
macro_rules! table {
    ($( $(#[$attr:meta])* $name:ident { $( $(#[$fattr:meta])* $ty:ident $field:ident )* } )*) => {
        $(
            $(#[$attr])*
            #[allow(non_snake_case, non_camel_case_types)]
            #[derive(Debug, Clone, PartialEq)]
            pub struct $name {
                $( $(#[$fattr])* pub $field: $ty, )*
            }

            impl $crate::Serialize for $name {
                fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), $crate::SerializationError> {
                    $( $crate::Serialize::to_bytes(&self.$field, data)?; )*
                    Ok(())
                }
            }

            impl $crate::Deserialize for $name {
                fn from_bytes(
                    c: &mut $crate::ReaderContext,
                ) -> Result<Self, $crate::DeserializationError> {
                    Ok($name {
                        $( $field: <$ty as $crate::Deserialize>::from_bytes(c)?, )*
                    })
                }
            }
        )*
    };
}

/* Provide a serde-style interface */
pub mod ser {
    use crate::SerializationError;
    use crate::Serialize;
    use crate::Serializer;

    pub fn to_bytes<T: Serialize>(data: &T) -> Result<Vec<u8>, SerializationError> {
        let mut out = vec![];
        out.put(data)?;
        Ok(out)
    }
}
pub mod de {
    pub use crate::{DeserializationError, Deserialize, Deserializer, ReaderContext};
    pub fn from_bytes<T: Deserialize>(data: &[u8]) -> Result<T, DeserializationError> {
        let mut rc = ReaderContext::new(data.to_vec());
        rc.de()
    }
}
