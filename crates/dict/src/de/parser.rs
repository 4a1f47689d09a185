use std::sync::Arc;

use crate::{
    bits::{
        bitvec::{order::Msb0, slice::BitSlice},
        de::{BitReader, BitReaderExt},
    },
    Cell, Error,
};

use super::{CellDeserialize, CellDeserializeAs};

/// [`Error`] for [`CellParser`]
pub type CellParserError<'de> = <CellParser<'de> as BitReader>::Error;

/// Cursor over a [`Cell`]'s data bits and references,
/// created with [`Cell::parser()`].
pub struct CellParser<'de> {
    data: &'de BitSlice<u8, Msb0>,
    references: &'de [Arc<Cell>],
}

impl<'de> CellParser<'de> {
    #[inline]
    pub(crate) const fn new(data: &'de BitSlice<u8, Msb0>, references: &'de [Arc<Cell>]) -> Self {
        Self { data, references }
    }

    /// Parse the value using its [`CellDeserialize`] implementation
    #[inline]
    pub fn parse<T>(&mut self) -> Result<T, CellParserError<'de>>
    where
        T: CellDeserialize<'de>,
    {
        T::parse(self)
    }

    /// Parse the value using an adapter.
    /// See [`as`](crate::as) module-level documentation for more.
    #[inline]
    pub fn parse_as<T, As>(&mut self) -> Result<T, CellParserError<'de>>
    where
        As: CellDeserializeAs<'de, T> + ?Sized,
    {
        As::parse_as(self)
    }

    /// Load the next reference
    #[inline]
    pub fn load_reference(&mut self) -> Result<&'de Arc<Cell>, CellParserError<'de>> {
        let (first, rest) = self
            .references
            .split_first()
            .ok_or_else(|| Error::custom("no more references left"))?;
        self.references = rest;
        Ok(first)
    }

    /// Load a `Maybe ^Cell`: one bit, then a reference if the bit is set
    /// ```tlb
    /// nothing$0 {X:Type} = Maybe X;
    /// just$1 {X:Type} value:X = Maybe X;
    /// ```
    #[inline]
    pub fn load_maybe_reference(
        &mut self,
    ) -> Result<Option<&'de Arc<Cell>>, CellParserError<'de>> {
        Ok(match self.unpack()? {
            false => None,
            true => Some(self.load_reference()?),
        })
    }

    /// Load the next reference and parse it fully using an adapter
    #[inline]
    pub fn parse_reference_as<T, As>(&mut self) -> Result<T, CellParserError<'de>>
    where
        As: CellDeserializeAs<'de, T> + ?Sized,
    {
        self.load_reference()?.parse_fully_as::<T, As>()
    }

    /// Returns whether this parser has no more data and references
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.references.is_empty()
    }

    /// Returns an error if this parser has more data or references
    #[inline]
    pub fn ensure_empty(&self) -> Result<(), CellParserError<'de>> {
        if !self.is_empty() {
            return Err(Error::custom(format!(
                "more data left: {} bits, {} references",
                self.data.len(),
                self.references.len(),
            )));
        }
        Ok(())
    }
}

impl<'de> BitReader for CellParser<'de> {
    type Error = <&'de BitSlice<u8, Msb0> as BitReader>::Error;

    #[inline]
    fn bits_left(&self) -> usize {
        self.data.bits_left()
    }

    #[inline]
    fn read_bit(&mut self) -> Result<bool, Self::Error> {
        self.data.read_bit()
    }

    #[inline]
    fn read_bits_into(&mut self, dst: &mut BitSlice<u8, Msb0>) -> Result<(), Self::Error> {
        self.data.read_bits_into(dst)
    }

    #[inline]
    fn skip(&mut self, n: usize) -> Result<(), Self::Error> {
        self.data.skip(n)
    }
}
