//! **De**/**ser**ialization adapters.
//!
//! This approach is heavily inspired by
//! [serde_with](https://docs.rs/serde_with/latest/serde_with).
//! Please, read their docs for more usage examples.
mod same;
mod unary;

pub use self::{same::*, unary::*};

/// **De**/**ser**ialize an unsigned integer from/into exactly `BITS` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NBits<const BITS: usize>;

/// Like [`NBits`], but the bit-width is passed in runtime as
/// [`Args`](crate::ser::BitPackAsWithArgs::Args).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarNBits;
