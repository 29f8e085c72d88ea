//! Geometry writers and their encoding patterns
//!
//! A writer is configured in two phases. A [`GeometryWriterBuilder`]
//! collects compatible types and patterns; [`GeometryWriterBuilder::build`]
//! freezes them into an immutable [`GeometryWriter`] that is only used for
//! matching and may be shared across threads.

use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::Arc;

use geopath_schema::{QName, Schema, TypeId};
use indexmap::IndexSet;
use thiserror::Error;
use tracing::{debug, warn};

use crate::path::DefinitionPath;
use crate::pattern::{MatchOptions, Pattern};

/// The kind of geometry value a writer encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 7] = [
        GeometryKind::Point,
        GeometryKind::MultiPoint,
        GeometryKind::LineString,
        GeometryKind::MultiLineString,
        GeometryKind::Polygon,
        GeometryKind::MultiPolygon,
        GeometryKind::GeometryCollection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown geometry kind `{0}`")]
pub struct UnknownGeometryKind(pub String);

impl FromStr for GeometryKind {
    type Err = UnknownGeometryKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeometryKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownGeometryKind(s.to_string()))
    }
}

// =============================================================================
// GeometryWriterBuilder
// =============================================================================

/// Configuration phase of a [`GeometryWriter`].
#[derive(Debug)]
pub struct GeometryWriterBuilder {
    kind: GeometryKind,
    compatible_types: IndexSet<QName>,
    patterns: Vec<Pattern>,
}

impl GeometryWriterBuilder {
    pub fn new(kind: GeometryKind) -> Self {
        Self {
            kind,
            compatible_types: IndexSet::new(),
            patterns: Vec::new(),
        }
    }

    /// Add a compatible type. A name without namespace refers to the output
    /// namespace of the document being written.
    pub fn add_compatible_type(&mut self, type_name: QName) -> &mut Self {
        self.compatible_types.insert(type_name);
        self
    }

    /// Add an encoding pattern.
    ///
    /// Invalid patterns are logged and ignored; the writer's other patterns
    /// stay in effect. Adding the same pattern text twice keeps the first.
    pub fn add_pattern(&mut self, text: &str) -> &mut Self {
        let pattern = Pattern::parse(text);
        if let Some(error) = pattern.error() {
            warn!(kind = %self.kind, pattern = text, %error, "ignoring invalid pattern");
        } else if self.patterns.iter().any(|p| p.as_str() == text) {
            debug!(kind = %self.kind, pattern = text, "ignoring duplicate pattern");
        } else {
            self.patterns.push(pattern);
        }
        self
    }

    /// Patterns accepted so far, in registration order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn build(self) -> Arc<GeometryWriter> {
        Arc::new(GeometryWriter {
            kind: self.kind,
            compatible_types: self.compatible_types,
            patterns: self.patterns,
        })
    }
}

// =============================================================================
// GeometryWriter
// =============================================================================

/// Matching phase of a geometry writer: an immutable snapshot of its
/// compatible types and patterns.
#[derive(Debug)]
pub struct GeometryWriter {
    kind: GeometryKind,
    compatible_types: IndexSet<QName>,
    patterns: Vec<Pattern>,
}

impl GeometryWriter {
    pub fn builder(kind: GeometryKind) -> GeometryWriterBuilder {
        GeometryWriterBuilder::new(kind)
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn compatible_types(&self) -> &IndexSet<QName> {
        &self.compatible_types
    }

    /// Patterns in registration order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Whether this writer may attach to `type_id`: the type itself or one of
    /// its super-types must be listed as compatible.
    pub fn is_compatible(&self, schema: &Schema, type_id: TypeId, output_namespace: &str) -> bool {
        std::iter::once(type_id)
            .chain(schema.supertypes(type_id))
            .any(|t| {
                let name = schema.type_name(t);
                self.compatible_types
                    .iter()
                    .any(|compatible| compatible.matches_in(name, output_namespace))
            })
    }

    /// Find the first pattern, in registration order, that matches `type_id`.
    ///
    /// The returned path has this writer attached.
    pub fn try_match(
        self: &Arc<Self>,
        schema: &Schema,
        type_id: TypeId,
        base_path: &DefinitionPath,
        output_namespace: &str,
    ) -> Option<DefinitionPath> {
        self.try_match_with(
            schema,
            type_id,
            base_path,
            output_namespace,
            &MatchOptions::default(),
        )
    }

    pub fn try_match_with(
        self: &Arc<Self>,
        schema: &Schema,
        type_id: TypeId,
        base_path: &DefinitionPath,
        output_namespace: &str,
        options: &MatchOptions,
    ) -> Option<DefinitionPath> {
        let (pattern, path) = self.patterns.iter().find_map(|pattern| {
            pattern
                .matches_with(schema, type_id, base_path, output_namespace, options)
                .map(|path| (pattern, path))
        })?;
        let path = path.with_writer(Arc::clone(self));
        debug!(
            kind = %self.kind,
            pattern = %pattern,
            type_name = %schema.type_name(type_id),
            path = %path,
            "geometry path matched"
        );
        Some(path)
    }
}
