use core::marker::PhantomData;

use crate::{
    bits::{
        de::{BitReaderExt, BitUnpackAs},
        ser::{BitPackAs, BitWriterExt},
    },
    de::{CellDeserializeAs, CellParser, CellParserError},
    ser::{CellBuilder, CellBuilderError, CellSerializeAs},
};

use super::Same;

/// Adapter to **de**/**ser**ialize a bit-level value from/into the data bits
/// of the current cell.
pub struct Data<As: ?Sized = Same>(PhantomData<As>);

impl<T, As> CellSerializeAs<T> for Data<As>
where
    As: BitPackAs<T> + ?Sized,
{
    #[inline]
    fn store_as(source: &T, builder: &mut CellBuilder) -> Result<(), CellBuilderError> {
        builder.pack_as::<&T, &As>(source)?;
        Ok(())
    }
}

impl<'de, T, As> CellDeserializeAs<'de, T> for Data<As>
where
    As: BitUnpackAs<T> + ?Sized,
{
    #[inline]
    fn parse_as(parser: &mut CellParser<'de>) -> Result<T, CellParserError<'de>> {
        parser.unpack_as::<T, As>()
    }
}
