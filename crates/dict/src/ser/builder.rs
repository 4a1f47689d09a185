use std::sync::Arc;

use crate::{
    bits::{
        bitvec::{order::Msb0, slice::BitSlice, vec::BitVec},
        ser::{BitWriter, LimitWriter},
    },
    Cell, Error, OrdinaryCell,
};

use super::{CellSerialize, CellSerializeAs};

type CellBitWriter = LimitWriter<BitVec<u8, Msb0>>;

/// [`Error`] for [`CellBuilder`]
pub type CellBuilderError = <CellBuilder as BitWriter>::Error;

pub(crate) const MAX_BITS_LEN: usize = 1023;
pub(crate) const MAX_REFS_COUNT: usize = 4;

/// Cell builder created with [`Cell::builder()`].
///
/// Accumulates data bits and references, then finalizes into an immutable
/// [`Cell`] with [`.into_cell()`](CellBuilder::into_cell).
pub struct CellBuilder {
    data: CellBitWriter,
    references: Vec<Arc<Cell>>,
}

impl CellBuilder {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            data: LimitWriter::new(BitVec::EMPTY, MAX_BITS_LEN),
            references: Vec::new(),
        }
    }

    /// Store the value using its [`CellSerialize`] implementation
    #[inline]
    pub fn store<T>(&mut self, value: T) -> Result<&mut Self, CellBuilderError>
    where
        T: CellSerialize,
    {
        value.store(self)?;
        Ok(self)
    }

    /// Store given value using an adapter.
    /// See [`as`](crate::as) module-level documentation for more.
    #[inline]
    pub fn store_as<T, As>(&mut self, value: T) -> Result<&mut Self, CellBuilderError>
    where
        As: CellSerializeAs<T> + ?Sized,
    {
        As::store_as(&value, self)?;
        Ok(self)
    }

    /// Attach given finalized cell as a reference
    #[inline]
    pub fn store_reference(
        &mut self,
        cell: impl Into<Arc<Cell>>,
    ) -> Result<&mut Self, CellBuilderError> {
        if self.references.len() == MAX_REFS_COUNT {
            return Err(Error::custom("too many references"));
        }
        self.references.push(cell.into());
        Ok(self)
    }

    /// Serialize given value into a fresh child cell and attach it
    /// as a reference
    #[inline]
    pub fn store_reference_as<T, As>(&mut self, value: T) -> Result<&mut Self, CellBuilderError>
    where
        As: CellSerializeAs<T> + ?Sized,
    {
        let mut builder = Self::new();
        builder.store_as::<T, As>(value)?;
        self.store_reference(builder.into_cell())?;
        Ok(self)
    }

    /// Snapshot of the data bits written so far
    #[inline]
    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        self.data.as_bitslice()
    }

    /// Finalize into [`Cell`]
    #[inline]
    #[must_use]
    pub fn into_cell(self) -> Cell {
        Cell::Ordinary(OrdinaryCell {
            data: self.data.into_inner(),
            references: self.references,
        })
    }
}

impl BitWriter for CellBuilder {
    type Error = <CellBitWriter as BitWriter>::Error;

    #[inline]
    fn capacity_left(&self) -> usize {
        self.data.capacity_left()
    }

    #[inline]
    fn write_bit(&mut self, bit: bool) -> Result<(), Self::Error> {
        self.data.write_bit(bit)
    }

    #[inline]
    fn write_bitslice(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<(), Self::Error> {
        self.data.write_bitslice(bits)
    }

    #[inline]
    fn repeat_bit(&mut self, n: usize, bit: bool) -> Result<(), Self::Error> {
        self.data.repeat_bit(n, bit)
    }
}
