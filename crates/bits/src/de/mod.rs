//! Bitwise **de**serialization
mod r#as;
mod reader;

pub use self::{r#as::*, reader::*};

use bitvec::{order::Msb0, slice::BitSlice, vec::BitVec};

use crate::{Error, StringError};

/// A type that can be bitwise-**de**serialized from any [`BitReader`].
pub trait BitUnpack: Sized {
    /// Unpacks the value
    fn unpack<R>(reader: &mut R) -> Result<Self, R::Error>
    where
        R: BitReader + ?Sized;
}

/// A type that can be bitwise-**de**serialized from any [`BitReader`]
/// given [`Args`](BitUnpackWithArgs::Args) known only in runtime.
pub trait BitUnpackWithArgs: Sized {
    type Args;

    /// Unpacks the value with args
    fn unpack_with<R>(reader: &mut R, args: Self::Args) -> Result<Self, R::Error>
    where
        R: BitReader + ?Sized;
}

/// **De**serialize the value from given bits
#[inline]
pub fn unpack<T>(bits: impl AsRef<BitSlice<u8, Msb0>>) -> Result<T, StringError>
where
    T: BitUnpack,
{
    bits.as_ref().unpack()
}

/// **De**serialize the value from given bits and ensure
/// that no more data is left
#[inline]
pub fn unpack_fully<T>(bits: impl AsRef<BitSlice<u8, Msb0>>) -> Result<T, StringError>
where
    T: BitUnpack,
{
    let mut bits = bits.as_ref();
    let v = bits.unpack()?;
    if !bits.is_empty() {
        return Err(Error::custom(format!("more data left: {} bits", bits.len())));
    }
    Ok(v)
}

impl BitUnpack for () {
    #[inline]
    fn unpack<R>(_reader: &mut R) -> Result<Self, R::Error>
    where
        R: BitReader + ?Sized,
    {
        Ok(())
    }
}

impl BitUnpack for bool {
    #[inline]
    fn unpack<R>(reader: &mut R) -> Result<Self, R::Error>
    where
        R: BitReader + ?Sized,
    {
        reader.read_bit()
    }
}

/// Reads `args` bits
impl BitUnpackWithArgs for BitVec<u8, Msb0> {
    type Args = usize;

    #[inline]
    fn unpack_with<R>(reader: &mut R, len: Self::Args) -> Result<Self, R::Error>
    where
        R: BitReader + ?Sized,
    {
        let mut bits = BitVec::repeat(false, len);
        reader.read_bits_into(&mut bits)?;
        Ok(bits)
    }
}
