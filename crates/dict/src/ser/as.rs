use super::{CellBuilder, CellBuilderError};

/// Adapter to **ser**ialize `T` into cells.
/// See [`as`](crate::as) module-level documentation for more.
pub trait CellSerializeAs<T: ?Sized> {
    /// Stores the value using an adapter
    fn store_as(source: &T, builder: &mut CellBuilder) -> Result<(), CellBuilderError>;
}

impl<'a, T, As> CellSerializeAs<&'a T> for &'a As
where
    T: ?Sized,
    As: CellSerializeAs<T> + ?Sized,
{
    #[inline]
    fn store_as(source: &&'a T, builder: &mut CellBuilder) -> Result<(), CellBuilderError> {
        As::store_as(source, builder)
    }
}
