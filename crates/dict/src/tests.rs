use std::collections::BTreeMap;
use std::sync::Arc;

use bitvec::{bits, order::Msb0, vec::BitVec};
use num_bigint::BigUint;

use crate::{
    bits::{
        de::{BitReaderExt, BitUnpackAs},
        r#as::{NBits, Same, VarNBits},
        ser::{BitPackAs, BitWriterExt},
    },
    de::{CellDeserialize, CellDeserializeAsOwned, CellParser, CellParserError},
    dict::{Dict, HmLabel},
    r#as::{Data, Ref},
    ser::{CellBuilder, CellBuilderError, CellSerialize, CellSerializeAs, CellSerializeExt},
    Cell, OrdinaryCell, PrunedBranchCell,
};

type ByteDict = Dict<u8, u8, Same, Data>;

fn store_to_cell<K, V, KAs, VAs>(codec: &Dict<K, V, KAs, VAs>, dict: &BTreeMap<K, V>) -> Cell
where
    KAs: BitPackAs<K> + ?Sized,
    VAs: CellSerializeAs<V> + ?Sized,
{
    let mut builder = Cell::builder();
    codec.store(dict, &mut builder).unwrap();
    builder.into_cell()
}

#[track_caller]
fn assert_round_trip<K, V, KAs, VAs>(codec: &Dict<K, V, KAs, VAs>, dict: BTreeMap<K, V>)
where
    K: Ord + core::fmt::Debug,
    V: PartialEq + core::fmt::Debug,
    KAs: BitPackAs<K> + BitUnpackAs<K> + ?Sized,
    VAs: CellSerializeAs<V> + CellDeserializeAsOwned<V> + ?Sized,
{
    let cell = store_to_cell(codec, &dict);
    let mut parser = cell.parser();
    let parsed = codec.load(&mut parser).unwrap();
    parser.ensure_empty().unwrap();
    assert_eq!(parsed, dict);
}

#[test]
fn empty_dict_is_one_zero_bit() {
    let codec = ByteDict::new(8);
    let cell = store_to_cell(&codec, &BTreeMap::new());

    assert_eq!(cell.bits(), bits![u8, Msb0; 0]);
    assert!(cell.references().is_empty());

    let mut parser = cell.parser();
    assert!(codec.load(&mut parser).unwrap().is_empty());
}

#[test]
fn singleton_same_mode_label() {
    let codec = ByteDict::new(8);
    let cell = store_to_cell(&codec, &[(0x00, 0x2A)].into());

    // hme_root$1
    assert_eq!(cell.bits(), bits![u8, Msb0; 1]);
    let root = &cell.references()[0];

    // hml_same$11 v=0 n=8, then the value byte
    assert_eq!(root.len(), 15);
    assert_eq!(
        root.bits(),
        bits![u8, Msb0; 1, 1, 0, 1, 0, 0, 0, 0, 0, 1, 0, 1, 0, 1, 0]
    );

    assert_round_trip(&codec, [(0x00, 0x2A)].into());
}

#[test]
fn two_keys_shared_prefix() {
    let codec = ByteDict::new(8);
    let cell = store_to_cell(&codec, &[(0b0000_0000, 1), (0b0000_0001, 2)].into());
    let root = &cell.references()[0];

    // label is the 7-bit common prefix, hml_same$11 v=0 n=7
    assert_eq!(root.bits(), bits![u8, Msb0; 1, 1, 0, 0, 1, 1, 1]);
    assert_eq!(root.references().len(), 2);

    // both children carry an empty label (hml_short$0 len=0) and the value
    let left = &root.references()[0];
    assert_eq!(left.bits(), bits![u8, Msb0; 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    let right = &root.references()[1];
    assert_eq!(right.bits(), bits![u8, Msb0; 0, 0, 0, 0, 0, 0, 0, 0, 1, 0]);

    assert_round_trip(&codec, [(0b0000_0000, 1), (0b0000_0001, 2)].into());
}

#[test]
fn two_keys_no_common_prefix() {
    let codec = ByteDict::new(8);
    let cell = store_to_cell(&codec, &[(0x00, 1), (0x80, 2)].into());
    let root = &cell.references()[0];

    // empty root label: hml_short$0 len=0
    assert_eq!(root.bits(), bits![u8, Msb0; 0, 0]);
    assert_eq!(root.references().len(), 2);

    // each child consumes the remaining 7 zero bits: hml_same$11 v=0 n=7
    // with k = 3
    let left = &root.references()[0];
    assert_eq!(
        left.bits(),
        bits![u8, Msb0; 1, 1, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 1]
    );
    let right = &root.references()[1];
    assert_eq!(
        right.bits(),
        bits![u8, Msb0; 1, 1, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 1, 0]
    );

    assert_round_trip(&codec, [(0x00, 1), (0x80, 2)].into());
}

#[test]
fn one_bit_label_uses_short_form() {
    // same is forbidden for n <= 1, long costs 7, short costs 4
    let mut writer = BitVec::<u8, Msb0>::new();
    writer
        .pack_as_with::<_, &HmLabel>(bits![u8, Msb0; 1], 8)
        .unwrap();
    assert_eq!(writer, bits![u8, Msb0; 0, 1, 0, 1]);
}

#[test]
fn alternating_label_uses_short_form() {
    // not uniform, so same is out; short costs 6, long costs 8
    let mut writer = BitVec::<u8, Msb0>::new();
    writer
        .pack_as_with::<_, &HmLabel>(bits![u8, Msb0; 0, 1], 8)
        .unwrap();
    assert_eq!(writer, bits![u8, Msb0; 0, 1, 1, 0, 0, 1]);
}

#[test]
fn label_picks_cheapest_form() {
    const M: u32 = 8;
    const K: u32 = 4;
    for n in 0..=M {
        let label = BitVec::<u8, Msb0>::repeat(true, n as usize);
        let mut writer = BitVec::<u8, Msb0>::new();
        writer
            .pack_as_with::<_, &HmLabel>(label.as_bitslice(), M)
            .unwrap();

        let short = 2 * n + 2;
        let long = K + n + 2;
        let same = if n > 1 { K + 3 } else { u32::MAX };
        assert_eq!(
            writer.len() as u32,
            short.min(long).min(same),
            "uniform label of {n} bits"
        );
    }
}

#[test]
fn label_round_trip() {
    for (label, m) in [
        (BitVec::<u8, Msb0>::EMPTY, 0),
        (BitVec::repeat(false, 8), 8),
        (BitVec::repeat(true, 600), 1023),
        ({
            let mut v = BitVec::new();
            for i in 0..20 {
                v.push(i % 2 == 0);
            }
            v
        }, 1023),
        (bits![u8, Msb0; 1, 0, 1, 1].to_bitvec(), 4),
    ] {
        let mut writer = BitVec::<u8, Msb0>::new();
        writer
            .pack_as_with::<_, &HmLabel>(label.as_bitslice(), m)
            .unwrap();

        let mut reader = writer.as_bitslice();
        let parsed: BitVec<u8, Msb0> = reader.unpack_as_with::<_, HmLabel>(m).unwrap();
        assert_eq!(parsed, label);
        assert!(reader.is_empty());
    }
}

#[test]
fn label_longer_than_budget_fails() {
    let mut writer = BitVec::<u8, Msb0>::new();
    assert!(writer
        .pack_as_with::<_, &HmLabel>(bits![u8, Msb0; 1, 1, 1], 2)
        .is_err());
}

#[test]
fn unary_length_over_budget_fails() {
    // hml_short$0 with 9 ones of unary length, but the budget is only 8
    let mut writer = BitVec::<u8, Msb0>::new();
    writer
        .pack(false)
        .unwrap()
        .with_repeat_bit(9, true)
        .unwrap()
        .pack(false)
        .unwrap()
        .with_repeat_bit(9, true)
        .unwrap();

    let mut reader = writer.as_bitslice();
    assert!(reader
        .unpack_as_with::<BitVec<u8, Msb0>, HmLabel>(8)
        .is_err());
}

#[test]
fn truncated_label_fails() {
    // hml_long$10 announces 8 payload bits, but only 3 are present
    let mut writer = BitVec::<u8, Msb0>::new();
    writer
        .pack_as::<_, NBits<2>>(0b10u8)
        .unwrap()
        .pack_as_with::<_, VarNBits>(8u32, 4)
        .unwrap()
        .with_repeat_bit(3, true)
        .unwrap();

    let mut reader = writer.as_bitslice();
    assert!(reader
        .unpack_as_with::<BitVec<u8, Msb0>, HmLabel>(8)
        .is_err());
}

#[test]
fn root_round_trip() {
    let codec = ByteDict::new(8);
    let dict: BTreeMap<u8, u8> = [(5, 50), (9, 90), (250, 25)].into();

    let mut builder = Cell::builder();
    codec.store_root(&dict, &mut builder).unwrap();
    let cell = builder.into_cell();

    let mut parser = cell.parser();
    assert_eq!(codec.load_root(&mut parser).unwrap(), dict);
    parser.ensure_empty().unwrap();
}

#[test]
fn round_trip_all_byte_keys() {
    let codec = ByteDict::new(8);
    assert_round_trip(&codec, (0..=255u8).map(|i| (i, i.wrapping_mul(3))).collect());
}

#[test]
fn round_trip_sparse_keys() {
    let codec = ByteDict::new(8);
    assert_round_trip(
        &codec,
        [(0x00, 0), (0x01, 1), (0x7F, 2), (0x80, 3), (0xFF, 4)].into(),
    );
}

#[test]
fn round_trip_non_byte_key_width() {
    let codec = Dict::<u16, u8, NBits<9>, Data>::new(9);
    assert_round_trip(
        &codec,
        [(0, 1), (1, 2), (255, 3), (256, 4), (511, 5)].into(),
    );
}

#[test]
fn round_trip_biguint_keys() {
    let codec = Dict::<BigUint, u64, Same, Data>::new(256);
    assert_round_trip(
        &codec,
        [
            (BigUint::ZERO, 0),
            (BigUint::from(1u8), 1),
            (BigUint::from(42u8) << 248, 2),
            (BigUint::from(u128::MAX), 3),
        ]
        .into(),
    );
}

#[test]
fn round_trip_values_in_references() {
    let codec = Dict::<u8, u8, Same, Ref<Data>>::new(8);
    assert_round_trip(&codec, [(1, 11), (2, 22), (3, 33)].into());
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Account {
    balance: u64,
    frozen: bool,
}

impl CellSerialize for Account {
    fn store(&self, builder: &mut CellBuilder) -> Result<(), CellBuilderError> {
        builder.pack(self.balance)?.pack(self.frozen)?;
        Ok(())
    }
}

impl<'de> CellDeserialize<'de> for Account {
    fn parse(parser: &mut CellParser<'de>) -> Result<Self, CellParserError<'de>> {
        Ok(Self {
            balance: parser.unpack()?,
            frozen: parser.unpack()?,
        })
    }
}

#[test]
fn struct_cell_round_trip() {
    let account = Account {
        balance: 5,
        frozen: true,
    };
    let cell = account.to_cell().unwrap();
    assert_eq!(cell.parse_fully::<Account>().unwrap(), account);
}

#[test]
fn round_trip_struct_values() {
    let codec = Dict::<u8, Account>::new(8);
    assert_round_trip(
        &codec,
        [
            (
                7,
                Account {
                    balance: 1_000_000,
                    frozen: false,
                },
            ),
            (
                200,
                Account {
                    balance: 0,
                    frozen: true,
                },
            ),
        ]
        .into(),
    );
}

#[test]
fn store_root_of_empty_dict_fails() {
    let codec = ByteDict::new(8);
    let mut builder = Cell::builder();
    assert!(codec.store_root(&BTreeMap::new(), &mut builder).is_err());
}

#[test]
fn oversized_key_fails() {
    let codec = Dict::<u16, u8, Same, Data>::new(8);
    let mut builder = Cell::builder();
    assert!(codec
        .store(&[(0x1FF, 1)].into(), &mut builder)
        .is_err());
}

#[test]
fn oversized_value_fails() {
    // 7-bit label + 1020-bit value does not fit into 1023 bits
    let codec = Dict::<u8, BigUint, Same, Data<NBits<1020>>>::new(8);
    let mut builder = Cell::builder();
    assert!(codec
        .store(&[(1u8, BigUint::ZERO)].into(), &mut builder)
        .is_err());
}

#[test]
fn key_coder_width_mismatch_on_load() {
    // keys are padded to 16 bits, but the key coder only consumes 8 of them
    let store_codec = Dict::<u8, u8, Same, Data>::new(16);
    let cell = store_to_cell(&store_codec, &[(1, 2)].into());

    let mut parser = cell.parser();
    assert!(store_codec.load(&mut parser).is_err());
}

#[test]
fn label_is_full_common_prefix() {
    let codec = ByteDict::new(8);
    let cell = store_to_cell(&codec, &[(0xA0, 1), (0xAF, 2)].into());
    let root = &cell.references()[0];

    let mut parser = root.parser();
    let label: BitVec<u8, Msb0> = parser.unpack_as_with::<_, HmLabel>(8).unwrap();
    assert_eq!(label, bits![u8, Msb0; 1, 0, 1, 0]);
}

#[test]
fn deterministic_output() {
    let dict: BTreeMap<u8, u8> = (0..100).map(|i| (i * 2, i)).collect();
    let one = store_to_cell(&ByteDict::new(8), &dict);
    let other = store_to_cell(&ByteDict::new(8), &dict);
    assert_eq!(one.hash(), other.hash());
}

fn pruned() -> Arc<Cell> {
    Arc::new(
        PrunedBranchCell {
            level: 1,
            data: BitVec::repeat(false, 8 + 256 + 16),
        }
        .into(),
    )
}

#[test]
fn pruned_subtree_is_skipped() {
    let codec = ByteDict::new(8);
    let cell = store_to_cell(&codec, &[(0x00, 1), (0x80, 2)].into());
    let root = &cell.references()[0];

    // cut the left subtree out, as a Merkle proof would
    let patched: Cell = OrdinaryCell {
        data: root.bits().to_bitvec(),
        references: vec![pruned(), root.references()[1].clone()],
    }
    .into();

    let mut parser = patched.parser();
    let dict = codec.load_root(&mut parser).unwrap();
    assert_eq!(dict, [(0x80, 2)].into());
}

#[test]
fn pruned_root_loads_as_empty() {
    let codec = ByteDict::new(8);

    let mut builder = Cell::builder();
    builder.pack(true).unwrap();
    builder.store_reference(pruned()).unwrap();
    let cell = builder.into_cell();

    let mut parser = cell.parser();
    assert!(codec.load(&mut parser).unwrap().is_empty());
}

#[test]
fn load_strict_rejects_pruned_root() {
    let codec = ByteDict::new(8);

    let mut builder = Cell::builder();
    builder.pack(true).unwrap();
    builder.store_reference(pruned()).unwrap();
    let cell = builder.into_cell();

    let mut parser = cell.parser();
    assert!(codec.load_strict(&mut parser).is_err());
}
