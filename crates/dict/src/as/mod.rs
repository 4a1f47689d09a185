//! Cell-level **de**/**ser**ialization adapters.
//!
//! This approach is heavily inspired by
//! [serde_with](https://docs.rs/serde_with/latest/serde_with).
//! Please, read their docs for more usage examples.
mod data;
mod reference;
mod same;

pub use self::{data::*, reference::*};

pub use crate::bits::Same;
