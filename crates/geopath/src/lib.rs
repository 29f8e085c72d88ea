//! Schema path matching for geometry slots in GML output.
//!
//! Given an application schema and a candidate type, geopath decides whether
//! (and along which route) the type reaches a slot a geometry can be written
//! to. The route is recorded as a [`DefinitionPath`] that a document writer
//! replays into nested elements.
//!
//! Unqualified names resolve against the output namespace, so application
//! types and properties are given in Clark notation:
//!
//! ```ignore
//! let mut point = GeometryWriter::builder(GeometryKind::Point);
//! point.add_compatible_type(QName::new("urn:x-city", "City"));
//! point.add_pattern("{urn:x-city}geom/<Point>");
//!
//! let mut registry = WriterRegistry::builder();
//! registry.register(point.build()).with_standard_writers();
//! let registry = registry.build();
//!
//! let base = DefinitionPath::new(city, city_element_name);
//! if let Some(path) = registry.find_match(&schema, city, &base, GML_NAMESPACE) {
//!     path.replay(&schema, &mut xml_sink, |sink, _| encode_geometry(sink))?;
//! }
//! ```

mod emit;
pub mod path;
pub mod pattern;
pub mod registry;
pub mod standard;
pub mod writer;

#[cfg(test)]
mod test_fixtures;

pub use geopath_schema as schema;

pub use emit::{ElementSink, ReplayEvent};
pub use path::{DefinitionPath, PathElement, PathElementKind, PathError};
pub use pattern::{DEFAULT_MAX_DESCENT_DEPTH, MatchOptions, Pattern, PatternError, Segment};
pub use registry::{WriterRegistry, WriterRegistryBuilder};
pub use standard::{standard_writer, standard_writers};
pub use writer::{GeometryKind, GeometryWriter, GeometryWriterBuilder, UnknownGeometryKind};

/// GML 3.1 namespace.
pub const GML_NAMESPACE: &str = "http://www.opengis.net/gml";

/// GML 3.2 namespace.
pub const GML32_NAMESPACE: &str = "http://www.opengis.net/gml/3.2";
