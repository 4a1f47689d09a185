use crate::{
    bits::{
        bitvec::{order::Msb0, slice::BitSlice, vec::BitVec},
        de::{BitReader, BitReaderExt, BitUnpackAsWithArgs},
        r#as::{NBits, Unary, VarNBits},
        ser::{BitPackAsWithArgs, BitWriter, BitWriterExt},
    },
    Error,
};

/// `HmLabel ~n m`: compressed bit prefix along a dictionary edge.
/// ```tlb
/// hml_short$0 {m:#} {n:#} len:(Unary ~n) {n <= m} s:(n * Bit) = HmLabel ~n m;
/// hml_long$10 {m:#} n:(#<= m) s:(n * Bit) = HmLabel ~n m;
/// hml_same$11 {m:#} v:Bit n:(#<= m) = HmLabel ~n m;
/// ```
///
/// The encoder always picks the cheapest of the three forms, so the output
/// is reproducible bit-for-bit across implementations. Ties are broken
/// towards the lexicographically smaller header, i.e. `short < long < same`:
///
/// | form         | total bits    |
/// |--------------|---------------|
/// | `hml_short$0`| `2n + 2`      |
/// | `hml_long$10`| `k + n + 2`   |
/// | `hml_same$11`| `k + 3`       |
///
/// where `k = ⌈log2(m + 1)⌉` is the width of the `n:(#<= m)` field.
pub struct HmLabel;

impl HmLabel {
    /// Width of the `n:(#<= m)` length field
    #[inline]
    const fn len_bits(m: u32) -> u32 {
        match m {
            0 => 0,
            _ => m.ilog2() + 1,
        }
    }
}

impl BitPackAsWithArgs<BitSlice<u8, Msb0>> for HmLabel {
    /// m
    type Args = u32;

    fn pack_as_with<W>(
        source: &BitSlice<u8, Msb0>,
        mut writer: &mut W,
        m: Self::Args,
    ) -> Result<(), W::Error>
    where
        W: BitWriter + ?Sized,
    {
        let n = source.len() as u32;
        // {n <= m}
        if n > m {
            return Err(Error::custom(format!("label of {n} bits, budget is {m}")));
        }
        let k = Self::len_bits(m);

        // hml_same$11 costs k + 3 against short's 2n + 2; for n <= 1 the
        // repeated-bit value is redundant, so short or long always wins
        if n > 1 && k < 2 * n - 1 {
            let v = if source.all() {
                Some(true)
            } else if source.not_any() {
                Some(false)
            } else {
                None
            };
            if let Some(v) = v {
                writer
                    // hml_same$11
                    .pack_as::<_, NBits<2>>(0b11u8)?
                    // v:Bit
                    .pack(v)?
                    // n:(#<= m)
                    .pack_as_with::<_, VarNBits>(n, k)?;
                return Ok(());
            }
        }

        if k < n {
            writer
                // hml_long$10
                .pack_as::<_, NBits<2>>(0b10u8)?
                // n:(#<= m)
                .pack_as_with::<_, VarNBits>(n, k)?
                // s:(n * Bit)
                .pack(source)?;
            return Ok(());
        }

        writer
            // hml_short$0
            .pack(false)?
            // len:(Unary ~n)
            .pack_as::<_, Unary>(source.len())?
            // s:(n * Bit)
            .pack(source)?;
        Ok(())
    }
}

impl BitUnpackAsWithArgs<BitVec<u8, Msb0>> for HmLabel {
    /// m
    type Args = u32;

    fn unpack_as_with<R>(mut reader: &mut R, m: Self::Args) -> Result<BitVec<u8, Msb0>, R::Error>
    where
        R: BitReader + ?Sized,
    {
        match reader.unpack()? {
            // hml_short$0
            false => {
                // len:(Unary ~n)
                let n: u32 = reader.unpack_as::<_, Unary>()?;
                // {n <= m}
                if n > m {
                    return Err(Error::custom(format!("label of {n} bits, budget is {m}")));
                }
                // s:(n * Bit)
                reader.unpack_with(n as usize)
            }
            true => {
                let k = Self::len_bits(m);
                match reader.unpack()? {
                    // hml_long$10
                    false => {
                        // n:(#<= m)
                        let n: u32 = reader.unpack_as_with::<_, VarNBits>(k)?;
                        if n > m {
                            return Err(Error::custom(format!(
                                "label of {n} bits, budget is {m}"
                            )));
                        }
                        // s:(n * Bit)
                        reader.unpack_with(n as usize)
                    }
                    // hml_same$11
                    true => {
                        // v:Bit
                        let v: bool = reader.unpack()?;
                        // n:(#<= m)
                        let n: u32 = reader.unpack_as_with::<_, VarNBits>(k)?;
                        if n > m {
                            return Err(Error::custom(format!(
                                "label of {n} bits, budget is {m}"
                            )));
                        }
                        Ok(BitVec::repeat(v, n as usize))
                    }
                }
            }
        }
    }
}
