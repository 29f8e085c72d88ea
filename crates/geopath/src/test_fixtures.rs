use geopath_schema::{AttributeDefinition, QName, Schema, SchemaBuilder, TypeId};

pub const NS: &str = "urn:x-geopath:test";

pub fn name(local: &str) -> QName {
    QName::new(NS, local)
}

/// A small city model with an abstract geometry slot, nested properties and
/// a subtype hierarchy on buildings.
pub struct Fixture {
    pub schema: Schema,
    pub string: TypeId,
    pub geometry: TypeId,
    pub point: TypeId,
    pub polygon: TypeId,
    pub address: TypeId,
    pub city: TypeId,
    pub building: TypeId,
    pub residential: TypeId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut b = SchemaBuilder::new();
        let string = b.add_type(name("string")).unwrap();
        let geometry = b.add_abstract_type(name("AbstractGeometry")).unwrap();
        let point = b.add_type(name("PointType")).unwrap();
        let polygon = b.add_type(name("PolygonType")).unwrap();
        b.derive(point, geometry).unwrap();
        b.derive(polygon, geometry).unwrap();
        b.add_abstract_element(name("_Geometry"), geometry).unwrap();
        b.add_substitute(name("Point"), point, name("_Geometry"))
            .unwrap();
        b.add_substitute(name("Polygon"), polygon, name("_Geometry"))
            .unwrap();
        // a global element outside any substitution group
        b.add_element(name("Marker"), point).unwrap();

        let address = b.add_type(name("AddressType")).unwrap();
        b.add_property(address, name("street"), string).unwrap();
        b.add_property(address, name("location"), geometry).unwrap();

        let city = b.add_type(name("City")).unwrap();
        b.add_property(city, name("name"), string).unwrap();
        b.add_property(city, name("geom"), geometry).unwrap();
        b.add_property(city, name("address"), address).unwrap();

        let building = b.add_type(name("Building")).unwrap();
        let residential = b.add_type(name("ResidentialBuilding")).unwrap();
        b.derive(residential, building).unwrap();
        b.add_property(building, name("footprint"), geometry).unwrap();
        b.add_property(residential, name("entrance"), point).unwrap();

        Self {
            schema: b.build(),
            string,
            geometry,
            point,
            polygon,
            address,
            city,
            building,
            residential,
        }
    }

    pub fn property(&self, owner: TypeId, local: &str) -> &AttributeDefinition {
        self.schema.property(owner, &name(local)).unwrap()
    }
}
