use bitvec::{order::Msb0, vec::BitVec};

use crate::StringError;

use super::{BitWriter, BitWriterExt};

/// Adapter to **ser**ialize `T`.
/// See [`as`](crate::as) module-level documentation for more.
///
/// For dynamic arguments, see [`BitPackAsWithArgs`].
pub trait BitPackAs<T: ?Sized> {
    /// Packs given value using an adapter
    fn pack_as<W>(source: &T, writer: &mut W) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized;
}

/// Adapter to **ser**ialize `T` with args.
/// See [`as`](crate::as) module-level documentation for more.
///
/// For version without arguments, see [`BitPackAs`].
pub trait BitPackAsWithArgs<T: ?Sized> {
    type Args;

    /// Packs given value with args using an adapter
    fn pack_as_with<W>(source: &T, writer: &mut W, args: Self::Args) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized;
}

/// **Ser**ialize given value into [`BitVec`] using an adapter
#[inline]
pub fn pack_as<T, As>(value: T) -> Result<BitVec<u8, Msb0>, StringError>
where
    As: BitPackAs<T> + ?Sized,
{
    let mut writer = BitVec::new();
    writer.pack_as::<_, As>(value)?;
    Ok(writer)
}

impl<'a, T, As> BitPackAs<&'a T> for &'a As
where
    T: ?Sized,
    As: BitPackAs<T> + ?Sized,
{
    #[inline]
    fn pack_as<W>(source: &&'a T, writer: &mut W) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        As::pack_as(source, writer)
    }
}

impl<'a, T, As> BitPackAsWithArgs<&'a T> for &'a As
where
    T: ?Sized,
    As: BitPackAsWithArgs<T> + ?Sized,
{
    type Args = As::Args;

    #[inline]
    fn pack_as_with<W>(source: &&'a T, writer: &mut W, args: Self::Args) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        As::pack_as_with(source, writer, args)
    }
}
