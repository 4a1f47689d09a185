use crate::{
    de::{BitReader, BitUnpack, BitUnpackAs, BitUnpackAsWithArgs, BitUnpackWithArgs},
    ser::{BitPack, BitPackAs, BitWriter},
};

/// Adapter to convert from `*As` to regular **de**/**ser**ialization traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Same;

impl<T> BitPackAs<T> for Same
where
    T: BitPack,
{
    #[inline]
    fn pack_as<W>(source: &T, writer: &mut W) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        source.pack(writer)
    }
}

impl<T> BitUnpackAs<T> for Same
where
    T: BitUnpack,
{
    #[inline]
    fn unpack_as<R>(reader: &mut R) -> Result<T, R::Error>
    where
        R: BitReader + ?Sized,
    {
        T::unpack(reader)
    }
}

impl<T> BitUnpackAsWithArgs<T> for Same
where
    T: BitUnpackWithArgs,
{
    type Args = T::Args;

    #[inline]
    fn unpack_as_with<R>(reader: &mut R, args: Self::Args) -> Result<T, R::Error>
    where
        R: BitReader + ?Sized,
    {
        T::unpack_with(reader, args)
    }
}
