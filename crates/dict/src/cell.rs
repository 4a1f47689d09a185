use core::fmt::{self, Debug};
use core::ops::Deref;
use std::sync::Arc;

use bitvec::{order::Msb0, slice::BitSlice, vec::BitVec};
use sha2::{Digest, Sha256};

use crate::{
    de::{CellDeserialize, CellDeserializeAs, CellParser, CellParserError},
    ser::CellBuilder,
};

/// Kind of a [`Cell`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CellType {
    #[default]
    Ordinary,
    PrunedBranch,
}

/// Immutable record of up to 1023 data bits and up to 4 references to
/// child cells.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Ordinary(OrdinaryCell),
    PrunedBranch(PrunedBranchCell),
}

/// Regular cell carrying data bits and references
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct OrdinaryCell {
    pub data: BitVec<u8, Msb0>,
    pub references: Vec<Arc<Cell>>,
}

/// Exotic stand-in for a subtree cut out of a Merkle proof.
///
/// `data` carries the hashes and depths of the removed subtree and is never
/// interpreted by this crate.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct PrunedBranchCell {
    pub level: u8,
    pub data: BitVec<u8, Msb0>,
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::Ordinary(OrdinaryCell::default())
    }
}

impl From<OrdinaryCell> for Cell {
    #[inline]
    fn from(cell: OrdinaryCell) -> Self {
        Self::Ordinary(cell)
    }
}

impl From<PrunedBranchCell> for Cell {
    #[inline]
    fn from(cell: PrunedBranchCell) -> Self {
        Self::PrunedBranch(cell)
    }
}

impl Cell {
    /// Create new [`CellBuilder`]
    #[inline]
    #[must_use]
    pub const fn builder() -> CellBuilder {
        CellBuilder::new()
    }

    #[inline]
    pub const fn cell_type(&self) -> CellType {
        match self {
            Self::Ordinary(_) => CellType::Ordinary,
            Self::PrunedBranch(_) => CellType::PrunedBranch,
        }
    }

    /// Whether this cell is a non-ordinary variant whose contents must not
    /// be interpreted as data
    #[inline]
    pub const fn is_exotic(&self) -> bool {
        !matches!(self, Self::Ordinary(_))
    }

    /// Count of data bits
    #[inline]
    pub fn len(&self) -> usize {
        self.bits().len()
    }

    /// Returns whether this cell has no data and no references
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.references().is_empty()
    }

    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        match self {
            Self::Ordinary(OrdinaryCell { data, .. })
            | Self::PrunedBranch(PrunedBranchCell { data, .. }) => data.as_bitslice(),
        }
    }

    /// Raw data bytes, where the last byte might be partial
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Ordinary(OrdinaryCell { data, .. })
            | Self::PrunedBranch(PrunedBranchCell { data, .. }) => data.as_raw_slice(),
        }
    }

    pub fn references(&self) -> &[Arc<Self>] {
        match self {
            Self::Ordinary(OrdinaryCell { references, .. }) => references.as_slice(),
            Self::PrunedBranch(_) => &[],
        }
    }

    /// Return [`CellParser`] for this cell
    #[inline]
    #[must_use]
    pub fn parser(&self) -> CellParser<'_> {
        CellParser::new(self.bits(), self.references())
    }

    /// Shortcut for [`.parser()`](Cell::parser)[`.parse()`](CellParser::parse)[`.ensure_empty()`](CellParser::ensure_empty).
    #[inline]
    pub fn parse_fully<'de, T>(&'de self) -> Result<T, CellParserError<'de>>
    where
        T: CellDeserialize<'de>,
    {
        let mut parser = self.parser();
        let v = parser.parse()?;
        parser.ensure_empty()?;
        Ok(v)
    }

    /// Shortcut for [`.parser()`](Cell::parser)[`.parse_as()`](CellParser::parse_as)[`.ensure_empty()`](CellParser::ensure_empty).
    #[inline]
    pub fn parse_fully_as<'de, T, As>(&'de self) -> Result<T, CellParserError<'de>>
    where
        As: CellDeserializeAs<'de, T> + ?Sized,
    {
        let mut parser = self.parser();
        let v = parser.parse_as::<T, As>()?;
        parser.ensure_empty()?;
        Ok(v)
    }

    /// [Cell level](https://docs.ton.org/develop/data-formats/cell-boc#cell-level)
    #[inline]
    pub fn level(&self) -> u8 {
        match self {
            Self::Ordinary(OrdinaryCell { references, .. }) => references
                .iter()
                .map(Deref::deref)
                .map(Cell::level)
                .max()
                .unwrap_or(0),
            Self::PrunedBranch(PrunedBranchCell { level, .. }) => *level,
        }
    }

    #[inline]
    pub fn max_depth(&self) -> u16 {
        match self {
            Self::Ordinary(OrdinaryCell { references, .. }) => references
                .iter()
                .map(Deref::deref)
                .map(Cell::max_depth)
                .max()
                .map(|d| d + 1)
                .unwrap_or(0),
            Self::PrunedBranch(_) => 0,
        }
    }

    /// See [Cell serialization](https://docs.ton.org/develop/data-formats/cell-boc#cell-serialization)
    #[inline]
    fn refs_descriptor(&self) -> u8 {
        self.references().len() as u8
            + if self.is_exotic() { 8 } else { 0 }
            + self.level() * 32
    }

    /// See [Cell serialization](https://docs.ton.org/develop/data-formats/cell-boc#cell-serialization)
    #[inline]
    fn bits_descriptor(&self) -> u8 {
        let b = self.len() + if self.is_exotic() { 8 } else { 0 };

        (b / 8) as u8 + ((b + 7) / 8) as u8
    }

    /// [Standard Cell representation](https://docs.ton.org/develop/data-formats/cell-boc#standard-cell-representation-hash-calculation)
    fn repr(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(self.refs_descriptor());
        buf.push(self.bits_descriptor());

        if self.is_exotic() {
            buf.push(self.cell_type() as u8);
        }

        let rest_bits = self.len() % 8;
        if rest_bits == 0 {
            buf.extend(self.bytes());
        } else {
            let (last, data) = self.bytes().split_last().unwrap();
            buf.extend(data);
            let mut last = last & (!0u8 << (8 - rest_bits)); // clear the rest
            last |= 1 << (8 - rest_bits - 1); // put stop-bit
            buf.push(last)
        }

        // refs depth
        buf.extend(
            self.references()
                .iter()
                .flat_map(|r| r.max_depth().to_be_bytes()),
        );

        // refs hashes
        buf.extend(
            self.references()
                .iter()
                .map(Deref::deref)
                .flat_map(Cell::hash),
        );

        buf
    }

    /// Calculates [standard representation hash](https://docs.ton.org/develop/data-formats/cell-boc#cell-hash)
    /// of this cell
    #[inline]
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.repr());
        hasher.finalize().into()
    }
}

impl Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Self::PrunedBranch(PrunedBranchCell { level, .. }) = self {
            write!(f, "pruned:{level}:")?;
        }
        if f.alternate() {
            write!(f, "{}[0b", self.len())?;
            for bit in self.bits() {
                write!(f, "{}", if *bit { '1' } else { '0' })?;
            }
            write!(f, "]")?;
        } else {
            write!(f, "{}[0x{}]", self.len(), hex::encode_upper(self.bytes()))?;
        }
        if self.references().is_empty() {
            return Ok(());
        }
        write!(f, " -> ")?;
        f.debug_set().entries(self.references()).finish()
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use crate::{
        bits::{
            r#as::NBits,
            ser::{BitWriter, BitWriterExt},
        },
        r#as::Data,
    };

    use super::*;

    #[test]
    fn hash_no_refs() {
        let mut builder = Cell::builder();
        builder.pack_as::<_, NBits<32>>(0x0000000F_u32).unwrap();
        let cell = builder.into_cell();

        assert_eq!(
            cell.hash(),
            hex!("57b520dbcb9d135863fc33963cde9f6db2ded1430d88056810a2c9434a3860f9")
        );
    }

    #[test]
    fn hash_with_refs() {
        let mut builder = Cell::builder();
        builder
            .store_as::<_, Data<NBits<24>>>(0x00000B_u32)
            .unwrap()
            .store_reference_as::<_, Data>(0x0000000F_u32)
            .unwrap()
            .store_reference_as::<_, Data>(0x0000000F_u32)
            .unwrap();
        let cell = builder.into_cell();

        assert_eq!(
            cell.hash(),
            hex!("f345277cc6cfa747f001367e1e873dcfa8a936b8492431248b7a3eeafa8030e7")
        );
    }

    #[test]
    fn depth() {
        let leaf = Cell::builder().into_cell();
        let mut mid = Cell::builder();
        mid.store_reference(leaf).unwrap();
        let mut root = Cell::builder();
        root.store_reference(mid.into_cell()).unwrap();
        let root = root.into_cell();

        assert_eq!(root.max_depth(), 2);
        assert_eq!(root.level(), 0);
    }

    #[test]
    fn pruned_branch_is_exotic() {
        let pruned: Cell = PrunedBranchCell {
            level: 1,
            data: BitVec::repeat(false, 8 + 256 + 16),
        }
        .into();

        assert!(pruned.is_exotic());
        assert_eq!(pruned.cell_type(), CellType::PrunedBranch);
        assert_eq!(pruned.level(), 1);
        assert!(pruned.references().is_empty());
    }

    #[test]
    fn too_many_references() {
        let mut builder = Cell::builder();
        for _ in 0..4 {
            builder.store_reference(Cell::default()).unwrap();
        }
        assert!(builder.store_reference(Cell::default()).is_err());
    }

    #[test]
    fn data_overflow() {
        let mut builder = Cell::builder();
        builder.repeat_bit(1023, true).unwrap();
        assert_eq!(builder.capacity_left(), 0);
        assert_eq!(builder.bits().len(), 1023);
        assert!(builder.pack(true).is_err());
    }
}
