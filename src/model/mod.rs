//! Records produced by the catalog parsers.

mod entry;
mod type_def;

pub use entry::{
    ApiEntry, Dimension, Parameter, ReturnSpec, ENTRY_TYPE_FUNCTION, STATUS_IMPLEMENTED,
    VOID_TYPE,
};
pub use type_def::TypeDefinition;
