//! Builder for constructing schemas programmatically

use indexmap::IndexMap;

use crate::schema::{AttributeDefinition, Schema, SchemaElement, TypeDefinition, TypeId};
use crate::{QName, SchemaError};

/// Incrementally assembles a [`Schema`].
///
/// Every mutation is checked, so a built schema always has a consistent
/// subtype/super-type relation without cycles.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a concrete type.
    pub fn add_type(&mut self, name: QName) -> Result<TypeId, SchemaError> {
        self.insert_type(name, false)
    }

    /// Declare an abstract type.
    pub fn add_abstract_type(&mut self, name: QName) -> Result<TypeId, SchemaError> {
        self.insert_type(name, true)
    }

    fn insert_type(&mut self, name: QName, is_abstract: bool) -> Result<TypeId, SchemaError> {
        if self.schema.type_index.contains_key(&name) {
            return Err(SchemaError::DuplicateType { name });
        }
        let id = TypeId(self.schema.types.len());
        self.schema.type_index.insert(name.clone(), id);
        self.schema.types.push(TypeDefinition {
            name,
            is_abstract,
            super_type: None,
            subtypes: Vec::new(),
            properties: IndexMap::new(),
        });
        Ok(id)
    }

    /// Make `sub` a direct subtype of `sup`.
    pub fn derive(&mut self, sub: TypeId, sup: TypeId) -> Result<(), SchemaError> {
        self.check(sub)?;
        self.check(sup)?;
        if self.schema.is_assignable(sup, sub) {
            return Err(SchemaError::DerivationCycle {
                sub: self.schema.type_name(sub).clone(),
                sup: self.schema.type_name(sup).clone(),
            });
        }
        if let Some(existing) = self.schema.super_type(sub) {
            return Err(SchemaError::SuperTypeAlreadySet {
                name: self.schema.type_name(sub).clone(),
                existing: self.schema.type_name(existing).clone(),
            });
        }
        self.schema.types[sub.0].super_type = Some(sup);
        self.schema.types[sup.0].subtypes.push(sub);
        Ok(())
    }

    /// Add a direct property to `owner`.
    pub fn add_property(
        &mut self,
        owner: TypeId,
        name: QName,
        value_type: TypeId,
    ) -> Result<(), SchemaError> {
        self.check(owner)?;
        self.check(value_type)?;
        let definition = &mut self.schema.types[owner.0];
        if definition.properties.contains_key(&name) {
            return Err(SchemaError::DuplicateProperty {
                owner: definition.name.clone(),
                property: name,
            });
        }
        definition
            .properties
            .insert(name.clone(), AttributeDefinition::new(name, value_type));
        Ok(())
    }

    /// Declare a global element.
    pub fn add_element(&mut self, name: QName, type_id: TypeId) -> Result<(), SchemaError> {
        self.insert_element(SchemaElement::new(name, type_id))
    }

    /// Declare an abstract global element, typically a substitution group head.
    pub fn add_abstract_element(
        &mut self,
        name: QName,
        type_id: TypeId,
    ) -> Result<(), SchemaError> {
        let mut element = SchemaElement::new(name, type_id);
        element.is_abstract = true;
        self.insert_element(element)
    }

    /// Declare a global element that substitutes the already declared `head`.
    pub fn add_substitute(
        &mut self,
        name: QName,
        type_id: TypeId,
        head: QName,
    ) -> Result<(), SchemaError> {
        if !self.schema.element_index.contains_key(&head) {
            return Err(SchemaError::UnknownElement { name: head });
        }
        let mut element = SchemaElement::new(name, type_id);
        element.substitution_group = Some(head);
        self.insert_element(element)
    }

    fn insert_element(&mut self, element: SchemaElement) -> Result<(), SchemaError> {
        self.check(element.type_id)?;
        if self.schema.element_index.contains_key(&element.name) {
            return Err(SchemaError::DuplicateElement { name: element.name });
        }
        self.schema
            .element_index
            .insert(element.name.clone(), self.schema.elements.len());
        self.schema.elements.push(element);
        Ok(())
    }

    /// Look up a type declared so far.
    pub fn lookup_type(&self, name: &QName) -> Option<TypeId> {
        self.schema.lookup_type(name)
    }

    fn check(&self, id: TypeId) -> Result<(), SchemaError> {
        match self.schema.get(id) {
            Some(_) => Ok(()),
            None => Err(SchemaError::UnknownType { index: id.0 }),
        }
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}
