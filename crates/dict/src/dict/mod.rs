//! Dictionary codec: `HashmapE n X`
//! ```tlb
//! hme_empty$0 {n:#} {X:Type} = HashmapE n X;
//! hme_root$1 {n:#} {X:Type} root:^(Hashmap n X) = HashmapE n X;
//!
//! hm_edge#_ {n:#} {X:Type} {l:#} {m:#} label:(HmLabel ~l n)
//!           {n = (~m) + l} node:(HashmapNode m X) = Hashmap n X;
//!
//! hmn_leaf#_ {X:Type} value:X = HashmapNode 0 X;
//! hmn_fork#_ {n:#} {X:Type} left:^(Hashmap n X)
//!            right:^(Hashmap n X) = HashmapNode (n + 1) X;
//! ```
mod hm_label;
mod tree;

pub use self::hm_label::*;

use core::marker::PhantomData;
use std::collections::BTreeMap;

use crate::{
    bits::{
        bitvec::{order::Msb0, slice::BitSlice, vec::BitVec},
        de::{BitReaderExt, BitUnpackAs},
        ser::{BitPackAs, BitWriterExt},
    },
    de::{CellDeserializeAs, CellParser, CellParserError},
    r#as::Same,
    ser::{CellBuilder, CellBuilderError, CellSerializeAs},
    Cell, Error, ResultExt, StringError,
};

use self::tree::{build_edge, Edge, KeyBits, Node};

/// Codec for a dictionary with keys of `key_bits` bits each.
///
/// `KAs`/`VAs` are the **de**/**ser**ialization adapters for keys and
/// values: keys live in the data bits of the tree and therefore use the
/// bit-level adapters, while values are written at the leaves and may use
/// the whole cell (including references).
///
/// Key coders must be fixed-width: a key serialized to more than `key_bits`
/// bits is an error, a shorter one is left-padded with zeros.
///
/// ```rust
/// # use std::collections::BTreeMap;
/// # use celldict::{r#as::{Data, Same}, dict::Dict, Cell, StringError};
/// # fn main() -> Result<(), StringError> {
/// let codec = Dict::<u8, u8, Same, Data>::new(8);
/// let dict: BTreeMap<u8, u8> = [(1, 2), (3, 4)].into();
///
/// let mut builder = Cell::builder();
/// codec.store(&dict, &mut builder)?;
/// let cell = builder.into_cell();
///
/// let mut parser = cell.parser();
/// assert_eq!(codec.load(&mut parser)?, dict);
/// # Ok(())
/// # }
/// ```
pub struct Dict<K, V, KAs: ?Sized = Same, VAs: ?Sized = Same> {
    key_bits: u32,
    _phantom: PhantomData<(
        PhantomData<K>,
        PhantomData<V>,
        PhantomData<KAs>,
        PhantomData<VAs>,
    )>,
}

impl<K, V, KAs, VAs> Dict<K, V, KAs, VAs>
where
    KAs: ?Sized,
    VAs: ?Sized,
{
    /// New codec for keys of `key_bits` bits
    #[inline]
    #[must_use]
    pub const fn new(key_bits: u32) -> Self {
        Self {
            key_bits,
            _phantom: PhantomData,
        }
    }

    /// Store the dictionary with the outer `HashmapE` envelope:
    /// a single `0` bit for an empty one, a `1` bit and the root cell
    /// attached as a reference otherwise.
    pub fn store(
        &self,
        dict: &BTreeMap<K, V>,
        builder: &mut CellBuilder,
    ) -> Result<(), CellBuilderError>
    where
        KAs: BitPackAs<K>,
        VAs: CellSerializeAs<V>,
    {
        if dict.is_empty() {
            // hme_empty$0
            builder.pack(false)?;
            return Ok(());
        }
        // hme_root$1
        builder.pack(true)?;
        let mut root = Cell::builder();
        // root:^(Hashmap n X)
        self.store_root(dict, &mut root).context("root")?;
        builder.store_reference(root.into_cell())?;
        Ok(())
    }

    /// Store the root `Hashmap` of a non-empty dictionary into the
    /// current builder.
    pub fn store_root(
        &self,
        dict: &BTreeMap<K, V>,
        builder: &mut CellBuilder,
    ) -> Result<(), CellBuilderError>
    where
        KAs: BitPackAs<K>,
        VAs: CellSerializeAs<V>,
    {
        if dict.is_empty() {
            return Err(Error::custom("empty dictionary has no root"));
        }
        let mut padded: BTreeMap<KeyBits, &V> = BTreeMap::new();
        for (key, value) in dict {
            let mut raw = BitVec::new();
            raw.pack_as::<_, &KAs>(key).context("key")?;
            if raw.len() as u32 > self.key_bits {
                return Err(Error::custom(format!(
                    "key of {} bits, expected at most {}",
                    raw.len(),
                    self.key_bits,
                )));
            }
            let mut bits = BitVec::repeat(false, self.key_bits as usize - raw.len());
            bits.extend_from_bitslice(&raw);
            if padded.insert(bits, value).is_some() {
                return Err(Error::custom("two keys have the same bit representation"));
            }
        }
        let root = build_edge(padded)?;
        self.store_edge(&root, self.key_bits, builder)
    }

    /// `hm_edge#_ {l:#} {m:#} label:(HmLabel ~l n) {n = (~m) + l}
    /// node:(HashmapNode m X)`
    fn store_edge(
        &self,
        edge: &Edge<'_, V>,
        n: u32,
        builder: &mut CellBuilder,
    ) -> Result<(), CellBuilderError>
    where
        VAs: CellSerializeAs<V>,
    {
        builder
            // label:(HmLabel ~l n)
            .pack_as_with::<_, &HmLabel>(edge.label.as_bitslice(), n)
            .context("label")?;
        // {n = (~m) + l}
        let m = n - edge.label.len() as u32;
        match &edge.node {
            // hmn_leaf#_ value:X
            Node::Leaf(value) => {
                builder.store_as::<_, &VAs>(*value).context("value")?;
            }
            // hmn_fork#_ left:^(Hashmap n X) right:^(Hashmap n X)
            Node::Fork(fork) => {
                if m == 0 {
                    return Err(Error::custom("fork at exhausted key budget"));
                }
                let (left, right) = fork.as_ref();
                for (branch, child) in [("left", left), ("right", right)] {
                    let mut child_builder = Cell::builder();
                    self.store_edge(child, m - 1, &mut child_builder)
                        .context(branch)?;
                    builder.store_reference(child_builder.into_cell())?;
                }
            }
        }
        Ok(())
    }

    /// Load a dictionary stored with the outer `HashmapE` envelope.
    ///
    /// A pruned (exotic) root cell decodes as an empty dictionary;
    /// see [`load_strict`](Dict::load_strict) to treat it as an error.
    pub fn load<'de>(
        &self,
        parser: &mut CellParser<'de>,
    ) -> Result<BTreeMap<K, V>, CellParserError<'de>>
    where
        K: Ord,
        KAs: BitUnpackAs<K>,
        VAs: CellDeserializeAs<'de, V>,
    {
        match parser.load_maybe_reference()? {
            // hme_empty$0
            None => Ok(BTreeMap::new()),
            // hme_root$1 root:^(Hashmap n X)
            Some(root) if root.is_exotic() => Ok(BTreeMap::new()),
            Some(root) => self.load_root_cell(root).context("root"),
        }
    }

    /// Same as [`load`](Dict::load), but an exotic root cell is an error
    /// rather than an empty dictionary.
    pub fn load_strict<'de>(
        &self,
        parser: &mut CellParser<'de>,
    ) -> Result<BTreeMap<K, V>, CellParserError<'de>>
    where
        K: Ord,
        KAs: BitUnpackAs<K>,
        VAs: CellDeserializeAs<'de, V>,
    {
        match parser.load_maybe_reference()? {
            None => Ok(BTreeMap::new()),
            Some(root) if root.is_exotic() => Err(Error::custom("root cell is exotic")),
            Some(root) => self.load_root_cell(root).context("root"),
        }
    }

    /// Load the root `Hashmap` of a non-empty dictionary from the
    /// current parser.
    pub fn load_root<'de>(
        &self,
        parser: &mut CellParser<'de>,
    ) -> Result<BTreeMap<K, V>, CellParserError<'de>>
    where
        K: Ord,
        KAs: BitUnpackAs<K>,
        VAs: CellDeserializeAs<'de, V>,
    {
        let mut dict = BTreeMap::new();
        self.parse_edge(parser, BitVec::EMPTY, self.key_bits, &mut dict)?;
        Ok(dict)
    }

    fn load_root_cell<'de>(
        &self,
        cell: &'de Cell,
    ) -> Result<BTreeMap<K, V>, CellParserError<'de>>
    where
        K: Ord,
        KAs: BitUnpackAs<K>,
        VAs: CellDeserializeAs<'de, V>,
    {
        let mut parser = cell.parser();
        let dict = self.load_root(&mut parser)?;
        parser.ensure_empty()?;
        Ok(dict)
    }

    fn parse_edge<'de>(
        &self,
        parser: &mut CellParser<'de>,
        mut prefix: KeyBits,
        n: u32,
        dict: &mut BTreeMap<K, V>,
    ) -> Result<(), CellParserError<'de>>
    where
        K: Ord,
        KAs: BitUnpackAs<K>,
        VAs: CellDeserializeAs<'de, V>,
    {
        // label:(HmLabel ~l n)
        let label: BitVec<u8, Msb0> = parser.unpack_as_with::<_, HmLabel>(n).context("label")?;
        // {n = (~m) + l}
        let m = n - label.len() as u32;
        prefix.extend_from_bitslice(&label);

        if m == 0 {
            // hmn_leaf#_ value:X
            let key = self.unpack_key(&prefix).context("key")?;
            let value = parser.parse_as::<V, VAs>().context("value")?;
            dict.insert(key, value);
            return Ok(());
        }

        // hmn_fork#_ left:^(Hashmap n X) right:^(Hashmap n X)
        for (branch, bit) in [("left", false), ("right", true)] {
            let child = parser.load_reference().context(branch)?;
            if child.is_exotic() {
                // pruned subtree: whatever keys were under it are
                // unreachable, not an error
                continue;
            }
            let mut child_prefix = prefix.clone();
            child_prefix.push(bit);
            let mut child_parser = child.parser();
            self.parse_edge(&mut child_parser, child_prefix, m - 1, dict)
                .context(branch)?;
            child_parser.ensure_empty().context(branch)?;
        }
        Ok(())
    }

    fn unpack_key(&self, bits: &BitSlice<u8, Msb0>) -> Result<K, StringError>
    where
        KAs: BitUnpackAs<K>,
    {
        let mut reader = bits;
        let key = reader.unpack_as::<K, KAs>()?;
        if !reader.is_empty() {
            return Err(Error::custom(format!(
                "key coder left {} of {} bits unread",
                reader.len(),
                bits.len(),
            )));
        }
        Ok(key)
    }
}
