//! Bitwise **ser**ialization
mod r#as;
mod writer;

pub use self::{r#as::*, writer::*};

use std::{rc::Rc, sync::Arc};

use bitvec::{order::Msb0, slice::BitSlice, vec::BitVec, view::AsBits};
use impl_tools::autoimpl;

use crate::StringError;

/// A type that can be bitwise-**ser**ialized into any [`BitWriter`].
#[autoimpl(for <T: trait + ?Sized> &T, &mut T, Box<T>, Rc<T>, Arc<T>)]
pub trait BitPack {
    /// Packs the value into given writer
    fn pack<W>(&self, writer: &mut W) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized;
}

/// **Ser**ialize given value into [`BitVec`]
#[inline]
pub fn pack<T>(value: T) -> Result<BitVec<u8, Msb0>, StringError>
where
    T: BitPack,
{
    let mut writer = BitVec::new();
    value.pack(&mut writer)?;
    Ok(writer)
}

impl BitPack for () {
    #[inline]
    fn pack<W>(&self, _writer: &mut W) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        Ok(())
    }
}

impl BitPack for bool {
    #[inline]
    fn pack<W>(&self, writer: &mut W) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        writer.write_bit(*self)
    }
}

impl BitPack for BitSlice<u8, Msb0> {
    #[inline]
    fn pack<W>(&self, writer: &mut W) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        writer.write_bitslice(self)
    }
}

impl BitPack for BitVec<u8, Msb0> {
    #[inline]
    fn pack<W>(&self, writer: &mut W) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        writer.write_bitslice(self)
    }
}

impl<const N: usize> BitPack for [u8; N] {
    #[inline]
    fn pack<W>(&self, writer: &mut W) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        writer.write_bitslice(self.as_bits())
    }
}
