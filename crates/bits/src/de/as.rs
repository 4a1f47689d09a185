use bitvec::{order::Msb0, slice::BitSlice};

use crate::{Error, StringError};

use super::{BitReader, BitReaderExt};

/// Adapter to **de**serialize `T`.
/// See [`as`](crate::as) module-level documentation for more.
///
/// For dynamic arguments, see [`BitUnpackAsWithArgs`].
pub trait BitUnpackAs<T> {
    /// Unpacks the value using an adapter
    fn unpack_as<R>(reader: &mut R) -> Result<T, R::Error>
    where
        R: BitReader + ?Sized;
}

/// Adapter to **de**serialize `T` with args.
/// See [`as`](crate::as) module-level documentation for more.
///
/// For version without arguments, see [`BitUnpackAs`].
pub trait BitUnpackAsWithArgs<T> {
    type Args;

    /// Unpacks the value with args using an adapter
    fn unpack_as_with<R>(reader: &mut R, args: Self::Args) -> Result<T, R::Error>
    where
        R: BitReader + ?Sized;
}

/// **De**serialize the value from given bits using an adapter
#[inline]
pub fn unpack_as<T, As>(bits: impl AsRef<BitSlice<u8, Msb0>>) -> Result<T, StringError>
where
    As: BitUnpackAs<T> + ?Sized,
{
    bits.as_ref().unpack_as::<T, As>()
}

/// **De**serialize the value from given bits using an adapter and ensure
/// that no more data is left
#[inline]
pub fn unpack_fully_as<T, As>(bits: impl AsRef<BitSlice<u8, Msb0>>) -> Result<T, StringError>
where
    As: BitUnpackAs<T> + ?Sized,
{
    let mut bits = bits.as_ref();
    let v = bits.unpack_as::<T, As>()?;
    if !bits.is_empty() {
        return Err(Error::custom(format!("more data left: {} bits", bits.len())));
    }
    Ok(v)
}
