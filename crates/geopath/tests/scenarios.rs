//! End-to-end matching scenarios over a small application schema.

use std::sync::{Arc, Once};
use std::thread;

use geopath::schema::{QName, Schema, SchemaBuilder, TypeId};
use geopath::{
    DefinitionPath, GeometryKind, GeometryWriter, PathElement, PathElementKind, Pattern,
    WriterRegistry,
};

const APP: &str = "urn:x-geopath:city";

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}

fn app(local: &str) -> QName {
    QName::new(APP, local)
}

struct CitySchema {
    schema: Schema,
    city: TypeId,
    building: TypeId,
    residential: TypeId,
    address: TypeId,
    street_type: TypeId,
    point: TypeId,
    polygon: TypeId,
}

fn city_schema() -> CitySchema {
    let mut b = SchemaBuilder::new();
    let geometry = b.add_abstract_type(app("AbstractGeometry")).unwrap();
    let point = b.add_type(app("PointType")).unwrap();
    let polygon = b.add_type(app("PolygonType")).unwrap();
    b.derive(point, geometry).unwrap();
    b.derive(polygon, geometry).unwrap();
    b.add_abstract_element(app("_Geometry"), geometry).unwrap();
    b.add_substitute(app("Point"), point, app("_Geometry"))
        .unwrap();
    b.add_substitute(app("Polygon"), polygon, app("_Geometry"))
        .unwrap();

    let street_type = b.add_type(app("StreetNameType")).unwrap();
    let address = b.add_type(app("AddressType")).unwrap();
    b.add_property(address, app("street"), street_type).unwrap();

    let city = b.add_type(app("City")).unwrap();
    b.add_property(city, app("geom"), geometry).unwrap();
    b.add_property(city, app("address"), address).unwrap();

    let building = b.add_type(app("Building")).unwrap();
    let residential = b.add_type(app("ResidentialBuilding")).unwrap();
    b.derive(residential, building).unwrap();

    CitySchema {
        schema: b.build(),
        city,
        building,
        residential,
        address,
        street_type,
        point,
        polygon,
    }
}

fn point_writer(patterns: &[&str]) -> Arc<GeometryWriter> {
    let mut builder = GeometryWriter::builder(GeometryKind::Point);
    builder.add_compatible_type(QName::unqualified("City"));
    for pattern in patterns {
        builder.add_pattern(pattern);
    }
    builder.build()
}

fn summary(path: &DefinitionPath) -> Vec<(PathElementKind, String, TypeId)> {
    path.steps()
        .iter()
        .map(|s| (s.kind(), s.name().to_string(), s.type_id()))
        .collect()
}

#[test]
fn scenario_a_substitution_overrides_property() {
    init_tracing();
    let s = city_schema();
    let writer = point_writer(&["geom/<Point>"]);
    let base = DefinitionPath::new(s.city, app("City"));

    let path = writer.try_match(&s.schema, s.city, &base, APP).unwrap();
    let point = s.schema.element(&app("Point")).unwrap();
    assert_eq!(path.steps(), &[PathElement::Substitution(point.clone())]);
    assert_eq!(path.last_type(), s.point);
    assert_eq!(path.last_name(), &app("Point"));
    assert!(base.is_empty());
}

#[test]
fn scenario_b_downcast_from_root_context() {
    init_tracing();
    let s = city_schema();
    let base = DefinitionPath::new(s.building, app("Building"));

    let path = Pattern::parse("(ResidentialBuilding)")
        .matches(&s.schema, s.building, &base, APP)
        .unwrap();
    assert_eq!(
        path.steps(),
        &[PathElement::Downcast {
            name: app("Building"),
            type_id: s.residential,
        }]
    );
    assert_eq!(path.last_type(), s.residential);
}

#[test]
fn scenario_c_malformed_patterns_are_excluded() {
    init_tracing();
    let s = city_schema();
    let mut builder = GeometryWriter::builder(GeometryKind::Point);
    builder
        .add_pattern("")
        .add_pattern("geom/<Point")
        .add_pattern("geom//<Point>")
        .add_pattern("geom/<Point>");
    let writer = builder.build();

    let texts: Vec<_> = writer.patterns().iter().map(Pattern::as_str).collect();
    assert_eq!(texts, vec!["geom/<Point>"]);

    let base = DefinitionPath::new(s.city, app("City"));
    assert!(writer.try_match(&s.schema, s.city, &base, APP).is_some());
}

#[test]
fn scenario_d_nested_properties() {
    init_tracing();
    let s = city_schema();
    let base = DefinitionPath::new(s.city, app("City"));

    let path = Pattern::parse("address/street")
        .matches(&s.schema, s.city, &base, APP)
        .unwrap();
    assert_eq!(
        summary(&path),
        vec![
            (
                PathElementKind::Property,
                format!("{{{APP}}}address"),
                s.address
            ),
            (
                PathElementKind::Property,
                format!("{{{APP}}}street"),
                s.street_type
            ),
        ]
    );
    assert_eq!(path.last_type(), s.street_type);
}

#[test]
fn first_match_law() {
    let s = city_schema();
    let base = DefinitionPath::new(s.city, app("City"));

    let substitution_first = point_writer(&["geom/<Point>", "geom"]);
    let path = substitution_first
        .try_match(&s.schema, s.city, &base, APP)
        .unwrap();
    assert_eq!(path.steps()[0].kind(), PathElementKind::Substitution);

    let property_first = point_writer(&["geom", "geom/<Point>"]);
    let path = property_first
        .try_match(&s.schema, s.city, &base, APP)
        .unwrap();
    assert_eq!(path.steps()[0].kind(), PathElementKind::Property);
}

#[test]
fn matching_is_pure() {
    let s = city_schema();
    let mut base = DefinitionPath::new(s.city, app("City"));
    base.add_property(s.schema.property(s.city, &app("address")).unwrap());

    let pattern = Pattern::parse("**/street");
    let first = pattern.matches(&s.schema, s.address, &base, APP).unwrap();
    let second = pattern.matches(&s.schema, s.address, &base, APP).unwrap();
    assert_eq!(first.steps(), second.steps());
    assert_eq!(summary(&first), summary(&second));
    assert_eq!(first.len(), 2);
    assert_eq!(base.len(), 1);
}

#[test]
fn no_partial_path_on_failure() {
    let s = city_schema();
    let base = DefinitionPath::new(s.city, app("City"));
    for text in ["address/number", "geom/<Curve>", "(Town)", "address/street/name"] {
        assert!(
            Pattern::parse(text)
                .matches(&s.schema, s.city, &base, APP)
                .is_none(),
            "{text}"
        );
    }
}

#[test]
fn registry_dispatch_over_threads() {
    init_tracing();
    let s = city_schema();
    let mut polygon = GeometryWriter::builder(GeometryKind::Polygon);
    polygon
        .add_compatible_type(QName::unqualified("City"))
        .add_pattern("geom/<Polygon>");
    let registry = {
        let mut builder = WriterRegistry::builder();
        builder
            .register(point_writer(&["geom/<Point>"]))
            .register(polygon.build());
        builder.build()
    };

    thread::scope(|scope| {
        let handles: Vec<_> = GeometryKind::ALL
            .into_iter()
            .map(|kind| {
                let (s, registry) = (&s, &registry);
                scope.spawn(move || {
                    let base = DefinitionPath::new(s.city, app("City"));
                    registry
                        .find_match_for_kind(kind, &s.schema, s.city, &base, APP)
                        .map(|path| (kind, path.last_type()))
                })
            })
            .collect();
        let found: Vec<_> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(
            found,
            vec![
                (GeometryKind::Point, s.point),
                (GeometryKind::Polygon, s.polygon),
            ]
        );
    });
}

#[test]
fn replay_scenario_a() {
    let s = city_schema();
    let writer = point_writer(&["geom/<Point>"]);
    let mut base = DefinitionPath::new(s.city, app("City"));
    base.add_property(s.schema.property(s.city, &app("address")).unwrap());

    // nothing to match below an address
    assert!(writer.try_match(&s.schema, s.address, &base, APP).is_none());

    let base = DefinitionPath::new(s.city, app("City"));
    let path = writer.try_match(&s.schema, s.city, &base, APP).unwrap();
    let mut rendered = Vec::new();
    for event in path.events(&s.schema) {
        rendered.push(match event {
            geopath::ReplayEvent::Start { name, .. } => format!("<{}>", name.local_name()),
            geopath::ReplayEvent::Value { .. } => "#".to_string(),
            geopath::ReplayEvent::End { name } => format!("</{}>", name.local_name()),
        });
    }
    assert_eq!(rendered.concat(), "<Point>#</Point>");
}
