//! Cell **ser**ialization
mod r#as;
mod builder;

pub use self::{builder::*, r#as::*};

use std::{rc::Rc, sync::Arc};

use impl_tools::autoimpl;

use crate::Cell;

/// A type that can be **ser**ialized into a [`CellBuilder`]
#[autoimpl(for <T: trait + ?Sized> &T, &mut T, Box<T>, Rc<T>, Arc<T>)]
pub trait CellSerialize {
    fn store(&self, builder: &mut CellBuilder) -> Result<(), CellBuilderError>;
}

impl CellSerialize for () {
    #[inline]
    fn store(&self, _builder: &mut CellBuilder) -> Result<(), CellBuilderError> {
        Ok(())
    }
}

pub trait CellSerializeExt: CellSerialize {
    /// Serialize the value into a fresh finalized [`Cell`]
    #[inline]
    fn to_cell(&self) -> Result<Cell, CellBuilderError> {
        let mut builder = Cell::builder();
        self.store(&mut builder)?;
        Ok(builder.into_cell())
    }
}
impl<T> CellSerializeExt for T where T: CellSerialize {}
