#![doc = include_str!("../README.md")]
pub mod r#as;
mod cell;
pub mod de;
pub mod dict;
pub mod ser;

pub use self::cell::*;

pub use cellbits::{self as bits, Error, ResultExt, StringError};

#[cfg(test)]
mod tests;
