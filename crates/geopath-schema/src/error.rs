use thiserror::Error;

use crate::QName;

/// Errors raised while assembling a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("duplicate type definition: {name}")]
    DuplicateType { name: QName },

    #[error("duplicate property {property} on type {owner}")]
    DuplicateProperty { owner: QName, property: QName },

    #[error("duplicate element declaration: {name}")]
    DuplicateElement { name: QName },

    /// A type handle that was issued by a different builder
    #[error("unknown type id #{index}")]
    UnknownType { index: usize },

    #[error("unknown substitution group head: {name}")]
    UnknownElement { name: QName },

    #[error("type {name} already derives from {existing}")]
    SuperTypeAlreadySet { name: QName, existing: QName },

    #[error("deriving {sub} from {sup} would create a cycle")]
    DerivationCycle { sub: QName, sup: QName },
}
