use std::collections::BTreeMap;

use crate::{
    bits::bitvec::{order::Msb0, vec::BitVec},
    Error, ResultExt, StringError,
};

/// Uniform-length key as raw bits
pub(super) type KeyBits = BitVec<u8, Msb0>;

/// Edge of the in-memory prefix tree: compressed label plus the node
/// it leads to. Built bottom-up during encoding and consumed by a single
/// downward write pass.
pub(super) struct Edge<'a, T> {
    pub label: KeyBits,
    pub node: Node<'a, T>,
}

pub(super) enum Node<'a, T> {
    Leaf(&'a T),
    Fork(Box<(Edge<'a, T>, Edge<'a, T>)>),
}

/// Longest common prefix of all keys in the map.
///
/// Keys are sorted, so it is enough to compare the first and the last one.
fn common_prefix<T>(map: &BTreeMap<KeyBits, T>) -> KeyBits {
    let (min, _) = map.first_key_value().expect("empty map");
    let (max, _) = map.last_key_value().expect("empty map");
    let len = min
        .iter()
        .by_vals()
        .zip(max.iter().by_vals())
        .take_while(|(l, r)| l == r)
        .count();
    min[..len].to_bitvec()
}

/// Drops the first `len` bits of every key
fn remove_prefix<T>(
    map: BTreeMap<KeyBits, T>,
    len: usize,
) -> Result<BTreeMap<KeyBits, T>, StringError> {
    if len == 0 {
        return Ok(map);
    }
    map.into_iter()
        .map(|(key, value)| {
            if key.len() < len {
                return Err(Error::custom("key is shorter than the common prefix"));
            }
            Ok((key[len..].to_bitvec(), value))
        })
        .collect()
}

/// Partitions keys by their first bit, dropping that bit.
///
/// After the common prefix is removed, the first bits differ, so both sides
/// are non-empty; an empty side means the tree builder is broken.
#[allow(clippy::type_complexity)]
fn fork<T>(
    map: BTreeMap<KeyBits, T>,
) -> Result<(BTreeMap<KeyBits, T>, BTreeMap<KeyBits, T>), StringError> {
    let mut left = BTreeMap::new();
    let mut right = BTreeMap::new();
    for (key, value) in map {
        let Some(bit) = key.first().as_deref().copied() else {
            return Err(Error::custom("no key bits left to fork on"));
        };
        let rest = key[1..].to_bitvec();
        match bit {
            false => left.insert(rest, value),
            true => right.insert(rest, value),
        };
    }
    if left.is_empty() || right.is_empty() {
        return Err(Error::custom("fork produced an empty side"));
    }
    Ok((left, right))
}

fn build_node<'a, T>(map: BTreeMap<KeyBits, &'a T>) -> Result<Node<'a, T>, StringError> {
    if map.len() == 1 {
        let (_, value) = map.into_iter().next().expect("empty map");
        return Ok(Node::Leaf(value));
    }
    let (left, right) = fork(map)?;
    Ok(Node::Fork(
        (
            build_edge(left).context("left")?,
            build_edge(right).context("right")?,
        )
            .into(),
    ))
}

/// Groups given non-empty map into an edge: the longest common prefix of
/// all keys becomes the label.
pub(super) fn build_edge<T>(map: BTreeMap<KeyBits, &T>) -> Result<Edge<'_, T>, StringError> {
    if map.is_empty() {
        return Err(Error::custom("cannot build an edge out of no keys"));
    }
    let label = common_prefix(&map);
    Ok(Edge {
        node: build_node(remove_prefix(map, label.len())?)?,
        label,
    })
}
