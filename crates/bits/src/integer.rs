use core::mem;

use bitvec::{
    mem::bits_of,
    order::Msb0,
    slice::BitSlice,
    vec::BitVec,
    view::{AsBits, AsMutBits},
};
use num_bigint::BigUint;

use crate::{
    de::{BitReader, BitReaderExt, BitUnpack, BitUnpackAs, BitUnpackAsWithArgs},
    r#as::{NBits, VarNBits},
    ser::{BitPack, BitPackAs, BitPackAsWithArgs, BitWriter},
    Error,
};

macro_rules! impl_bit_serde_for_integers {
    ($($t:tt)+) => {$(
        impl BitPack for $t {
            #[inline]
            fn pack<W>(&self, writer: &mut W) -> Result<(), W::Error>
            where
                W: BitWriter + ?Sized,
            {
                writer.write_bitslice(self.to_be_bytes().as_bits())
            }
        }

        impl BitUnpack for $t {
            #[inline]
            fn unpack<R>(mut reader: &mut R) -> Result<Self, R::Error>
            where
                R: BitReader + ?Sized,
            {
                reader.read_bytes_array().map(Self::from_be_bytes)
            }
        }

        impl<const BITS: usize> BitPackAs<$t> for NBits<BITS> {
            #[inline]
            fn pack_as<W>(source: &$t, writer: &mut W) -> Result<(), W::Error>
            where
                W: BitWriter + ?Sized,
            {
                const BITS_SIZE: usize = bits_of::<$t>();
                assert!(BITS <= BITS_SIZE, "excessive bits for type");
                if BITS < BITS_SIZE - source.leading_zeros() as usize {
                    return Err(Error::custom(format!(
                        "{source:#b} cannot be packed into {BITS} bits"
                    )));
                }
                let bytes = source.to_be_bytes();
                let mut bits = bytes.as_bits::<Msb0>();
                bits = &bits[bits.len() - BITS..];
                writer.write_bitslice(bits)?;
                Ok(())
            }
        }

        impl<const BITS: usize> BitUnpackAs<$t> for NBits<BITS> {
            #[inline]
            fn unpack_as<R>(reader: &mut R) -> Result<$t, R::Error>
            where
                R: BitReader + ?Sized,
            {
                const BITS_SIZE: usize = bits_of::<$t>();
                assert!(BITS <= BITS_SIZE, "excessive bits for type");
                let mut arr = [0u8; mem::size_of::<$t>()];
                reader.read_bits_into(&mut arr.as_mut_bits()[BITS_SIZE - BITS..])?;
                Ok($t::from_be_bytes(arr))
            }
        }
    )+};
}
impl_bit_serde_for_integers! {
    u8 u16 u32 u64 u128 usize
    i8 i16 i32 i64 i128 isize
}

macro_rules! impl_var_n_bits_for_uints {
    ($($t:tt)+) => {$(
        impl BitPackAsWithArgs<$t> for VarNBits {
            /// number of bits
            type Args = u32;

            #[inline]
            fn pack_as_with<W>(source: &$t, writer: &mut W, bits: Self::Args) -> Result<(), W::Error>
            where
                W: BitWriter + ?Sized,
            {
                const BITS_SIZE: u32 = bits_of::<$t>() as u32;
                let used = BITS_SIZE - source.leading_zeros();
                if bits < used {
                    return Err(Error::custom(format!(
                        "{source:#b} cannot be packed into {bits} bits"
                    )));
                }
                writer.repeat_bit((bits - used) as usize, false)?;
                let bytes = source.to_be_bytes();
                let all = bytes.as_bits::<Msb0>();
                writer.write_bitslice(&all[all.len() - used as usize..])?;
                Ok(())
            }
        }

        impl BitUnpackAsWithArgs<$t> for VarNBits {
            /// number of bits
            type Args = u32;

            #[inline]
            fn unpack_as_with<R>(reader: &mut R, bits: Self::Args) -> Result<$t, R::Error>
            where
                R: BitReader + ?Sized,
            {
                const BITS_SIZE: u32 = bits_of::<$t>() as u32;
                let mut n = bits;
                // leading bits that do not fit must be zero
                while n > BITS_SIZE {
                    if reader.read_bit()? {
                        return Err(Error::custom(format!(
                            "{bits}-bit value does not fit into {}",
                            stringify!($t),
                        )));
                    }
                    n -= 1;
                }
                let mut v: $t = 0;
                for _ in 0..n {
                    v = v << 1 | reader.read_bit()? as $t;
                }
                Ok(v)
            }
        }
    )+};
}
impl_var_n_bits_for_uints! {
    u8 u16 u32 u64 u128 usize
}

/// Minimal big-endian representation: no leading zero bits, zero is empty
impl BitPack for BigUint {
    #[inline]
    fn pack<W>(&self, writer: &mut W) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        let used = self.bits() as usize;
        let bytes = self.to_bytes_be();
        let bits = bytes.as_bits::<Msb0>();
        writer.write_bitslice(&bits[bits.len() - used..])
    }
}

/// Consumes **all** bits left in the reader, so the caller is responsible
/// for bounding it first
impl BitUnpack for BigUint {
    #[inline]
    fn unpack<R>(mut reader: &mut R) -> Result<Self, R::Error>
    where
        R: BitReader + ?Sized,
    {
        let n = reader.bits_left();
        let bits: BitVec<u8, Msb0> = reader.unpack_with(n)?;
        Ok(biguint_from_bits(&bits))
    }
}

impl<const BITS: usize> BitPackAs<BigUint> for NBits<BITS> {
    #[inline]
    fn pack_as<W>(source: &BigUint, writer: &mut W) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        let used = source.bits() as usize;
        if BITS < used {
            return Err(Error::custom(format!(
                "{source:#b} cannot be packed into {BITS} bits"
            )));
        }
        writer.repeat_bit(BITS - used, false)?;
        source.pack(writer)
    }
}

impl<const BITS: usize> BitUnpackAs<BigUint> for NBits<BITS> {
    #[inline]
    fn unpack_as<R>(mut reader: &mut R) -> Result<BigUint, R::Error>
    where
        R: BitReader + ?Sized,
    {
        let bits: BitVec<u8, Msb0> = reader.unpack_with(BITS)?;
        Ok(biguint_from_bits(&bits))
    }
}

impl BitPackAsWithArgs<BigUint> for VarNBits {
    /// number of bits
    type Args = u32;

    #[inline]
    fn pack_as_with<W>(source: &BigUint, writer: &mut W, bits: Self::Args) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        let used = source.bits() as u32;
        if bits < used {
            return Err(Error::custom(format!(
                "{source:#b} cannot be packed into {bits} bits"
            )));
        }
        writer.repeat_bit((bits - used) as usize, false)?;
        source.pack(writer)
    }
}

impl BitUnpackAsWithArgs<BigUint> for VarNBits {
    /// number of bits
    type Args = u32;

    #[inline]
    fn unpack_as_with<R>(mut reader: &mut R, bits: Self::Args) -> Result<BigUint, R::Error>
    where
        R: BitReader + ?Sized,
    {
        let bits: BitVec<u8, Msb0> = reader.unpack_with(bits as usize)?;
        Ok(biguint_from_bits(&bits))
    }
}

fn biguint_from_bits(bits: &BitSlice<u8, Msb0>) -> BigUint {
    // left-pad to a byte boundary, so that the raw bytes are big-endian
    let mut aligned = BitVec::<u8, Msb0>::repeat(false, (8 - bits.len() % 8) % 8);
    aligned.extend_from_bitslice(bits);
    BigUint::from_bytes_be(aligned.as_raw_slice())
}
