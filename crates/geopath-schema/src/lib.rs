//! Schema model consumed by the geopath matcher.
//!
//! The model covers exactly what path matching needs from an application
//! schema: types with direct properties, single inheritance, and global
//! elements forming substitution groups. Loading the model from XSD is left
//! to the caller, who assembles it with [`SchemaBuilder`].

mod builder;
mod error;
mod name;
mod schema;

pub use builder::SchemaBuilder;
pub use error::SchemaError;
pub use name::{QName, QNameError, is_ncname};
pub use schema::{AttributeDefinition, Schema, SchemaElement, TypeDefinition, TypeId};
