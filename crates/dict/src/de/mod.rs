//! Cell **de**serialization
mod r#as;
mod parser;

pub use self::{parser::*, r#as::*};

/// A type that can be **de**serialized from a [`CellParser`]
pub trait CellDeserialize<'de>: Sized {
    fn parse(parser: &mut CellParser<'de>) -> Result<Self, CellParserError<'de>>;
}

/// Owned version of [`CellDeserialize`]
pub trait CellDeserializeOwned: for<'de> CellDeserialize<'de> {}
impl<T> CellDeserializeOwned for T where T: for<'de> CellDeserialize<'de> {}

impl<'de> CellDeserialize<'de> for () {
    #[inline]
    fn parse(_parser: &mut CellParser<'de>) -> Result<Self, CellParserError<'de>> {
        Ok(())
    }
}
