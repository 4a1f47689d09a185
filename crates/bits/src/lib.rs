#![doc = include_str!("../README.md")]
pub mod r#as;
pub mod de;
mod error;
mod integer;
pub mod ser;

pub use self::{r#as::*, error::*};

pub use bitvec;
