//! Built-in writers for the GML geometry property types.
//!
//! Type names and pattern names are unqualified, so the same writers serve
//! GML 3.1 and GML 3.2 documents; they resolve against whatever output
//! namespace the document is written in.

use std::sync::Arc;

use geopath_schema::QName;

use crate::writer::{GeometryKind, GeometryWriter};

struct StandardWriter {
    kind: GeometryKind,
    compatible_types: &'static [&'static str],
    patterns: &'static [&'static str],
}

const STANDARD_WRITERS: &[StandardWriter] = &[
    StandardWriter {
        kind: GeometryKind::Point,
        compatible_types: &["PointPropertyType", "GeometryPropertyType"],
        patterns: &["Point", "*/<Point>"],
    },
    StandardWriter {
        kind: GeometryKind::MultiPoint,
        compatible_types: &["MultiPointPropertyType", "GeometryPropertyType"],
        patterns: &["MultiPoint", "*/<MultiPoint>"],
    },
    StandardWriter {
        kind: GeometryKind::LineString,
        compatible_types: &[
            "LineStringPropertyType",
            "CurvePropertyType",
            "GeometryPropertyType",
        ],
        patterns: &["LineString", "*/<LineString>"],
    },
    StandardWriter {
        kind: GeometryKind::MultiLineString,
        compatible_types: &[
            "MultiLineStringPropertyType",
            "MultiCurvePropertyType",
            "GeometryPropertyType",
        ],
        patterns: &[
            "MultiLineString",
            "MultiCurve",
            "*/<MultiLineString>",
            "*/<MultiCurve>",
        ],
    },
    StandardWriter {
        kind: GeometryKind::Polygon,
        compatible_types: &[
            "PolygonPropertyType",
            "SurfacePropertyType",
            "GeometryPropertyType",
        ],
        patterns: &["Polygon", "*/<Polygon>"],
    },
    StandardWriter {
        kind: GeometryKind::MultiPolygon,
        compatible_types: &[
            "MultiPolygonPropertyType",
            "MultiSurfacePropertyType",
            "GeometryPropertyType",
        ],
        patterns: &[
            "MultiPolygon",
            "MultiSurface",
            "*/<MultiPolygon>",
            "*/<MultiSurface>",
        ],
    },
    StandardWriter {
        kind: GeometryKind::GeometryCollection,
        compatible_types: &["MultiGeometryPropertyType", "GeometryPropertyType"],
        patterns: &["MultiGeometry", "*/<MultiGeometry>"],
    },
];

/// The built-in writer for `kind`.
pub fn standard_writer(kind: GeometryKind) -> Arc<GeometryWriter> {
    let mut builder = GeometryWriter::builder(kind);
    for entry in STANDARD_WRITERS.iter().filter(|s| s.kind == kind) {
        for type_name in entry.compatible_types {
            builder.add_compatible_type(QName::unqualified(*type_name));
        }
        for pattern in entry.patterns {
            builder.add_pattern(pattern);
        }
    }
    builder.build()
}

/// One built-in writer per geometry kind, in [`GeometryKind::ALL`] order.
pub fn standard_writers() -> Vec<Arc<GeometryWriter>> {
    GeometryKind::ALL.into_iter().map(standard_writer).collect()
}
