use super::{CellParser, CellParserError};

/// Adapter to **de**serialize `T` from cells.
/// See [`as`](crate::as) module-level documentation for more.
pub trait CellDeserializeAs<'de, T> {
    /// Parse the value using an adapter
    fn parse_as(parser: &mut CellParser<'de>) -> Result<T, CellParserError<'de>>;
}

/// Owned version of [`CellDeserializeAs`]
pub trait CellDeserializeAsOwned<T>: for<'de> CellDeserializeAs<'de, T> {}
impl<T, As> CellDeserializeAsOwned<T> for As where As: for<'de> CellDeserializeAs<'de, T> + ?Sized {}
