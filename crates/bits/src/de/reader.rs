use bitvec::{order::Msb0, slice::BitSlice, view::AsMutBits};
use impl_tools::autoimpl;

use crate::{Error, StringError};

use super::{BitUnpack, BitUnpackAs, BitUnpackAsWithArgs, BitUnpackWithArgs};

/// Bitwise reader.
#[autoimpl(for <R: trait + ?Sized> &mut R, Box<R>)]
pub trait BitReader {
    /// An error occurred while reading
    type Error: Error;

    /// Returns count of bits left to read
    fn bits_left(&self) -> usize;

    /// Reads a single bit. Running out of data is an error.
    fn read_bit(&mut self) -> Result<bool, Self::Error>;

    /// Reads `dst.len()` bits into given bitslice.
    /// Might be optimized by the implementation.
    #[inline]
    fn read_bits_into(&mut self, dst: &mut BitSlice<u8, Msb0>) -> Result<(), Self::Error> {
        for mut bit in dst.iter_mut() {
            *bit = self.read_bit()?;
        }
        Ok(())
    }

    /// Reads and discards `n` bits
    #[inline]
    fn skip(&mut self, n: usize) -> Result<(), Self::Error> {
        for _ in 0..n {
            self.read_bit()?;
        }
        Ok(())
    }
}

/// Extension helper for [`BitReader`].
pub trait BitReaderExt: BitReader {
    /// Returns whether there are no more bits to read
    #[inline]
    fn is_empty(&self) -> bool {
        self.bits_left() == 0
    }

    /// Read `N` bytes and return an array
    #[inline]
    fn read_bytes_array<const N: usize>(&mut self) -> Result<[u8; N], Self::Error> {
        let mut arr = [0; N];
        self.read_bits_into(arr.as_mut_bits())?;
        Ok(arr)
    }

    /// Unpack the value using its [`BitUnpack`] implementation
    #[inline]
    fn unpack<T>(&mut self) -> Result<T, Self::Error>
    where
        T: BitUnpack,
    {
        T::unpack(self)
    }

    /// Unpack the value with args using its [`BitUnpackWithArgs`]
    /// implementation
    #[inline]
    fn unpack_with<T>(&mut self, args: T::Args) -> Result<T, Self::Error>
    where
        T: BitUnpackWithArgs,
    {
        T::unpack_with(self, args)
    }

    /// Unpack the value using an adapter.
    /// See [`as`](crate::as) module-level documentation for more.
    #[inline]
    fn unpack_as<T, As>(&mut self) -> Result<T, Self::Error>
    where
        As: BitUnpackAs<T> + ?Sized,
    {
        As::unpack_as(self)
    }

    /// Unpack the value with args using an adapter.
    /// See [`as`](crate::as) module-level documentation for more.
    #[inline]
    fn unpack_as_with<T, As>(&mut self, args: As::Args) -> Result<T, Self::Error>
    where
        As: BitUnpackAsWithArgs<T> + ?Sized,
    {
        As::unpack_as_with(self, args)
    }
}

impl<T> BitReaderExt for T where T: BitReader {}

impl<'a> BitReader for &'a BitSlice<u8, Msb0> {
    type Error = StringError;

    #[inline]
    fn bits_left(&self) -> usize {
        self.len()
    }

    #[inline]
    fn read_bit(&mut self) -> Result<bool, Self::Error> {
        let (bit, rest) = self
            .split_first()
            .ok_or_else(|| Error::custom("no more bits left"))?;
        *self = rest;
        Ok(*bit)
    }

    #[inline]
    fn read_bits_into(&mut self, dst: &mut BitSlice<u8, Msb0>) -> Result<(), Self::Error> {
        if dst.len() > self.len() {
            return Err(Error::custom(format!(
                "no more bits left: expected {}, got {}",
                dst.len(),
                self.len(),
            )));
        }
        let (v, rest) = self.split_at(dst.len());
        dst.copy_from_bitslice(v);
        *self = rest;
        Ok(())
    }

    #[inline]
    fn skip(&mut self, n: usize) -> Result<(), Self::Error> {
        if n > self.len() {
            return Err(Error::custom("no more bits left"));
        }
        let (_, rest) = self.split_at(n);
        *self = rest;
        Ok(())
    }
}
