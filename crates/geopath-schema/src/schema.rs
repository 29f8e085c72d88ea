//! Schema model types
//!
//! A [`Schema`] is an arena of type definitions addressed by [`TypeId`],
//! plus the global element declarations that make up substitution groups.
//! It is assembled once through [`crate::SchemaBuilder`] and never mutated
//! afterwards, so it can be shared freely between threads.

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::QName;

// =============================================================================
// Handles and definitions
// =============================================================================

/// Handle of a type definition inside a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named, typed property of a type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    name: QName,
    value_type: TypeId,
}

impl AttributeDefinition {
    pub fn new(name: QName, value_type: TypeId) -> Self {
        Self { name, value_type }
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        self.name.namespace()
    }

    pub fn local_name(&self) -> &str {
        self.name.local_name()
    }

    /// Type of the values this property holds.
    pub fn value_type(&self) -> TypeId {
        self.value_type
    }
}

/// A global element declaration, usable in place of a property whose
/// declared type it is assignable to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaElement {
    pub(crate) name: QName,
    pub(crate) type_id: TypeId,
    pub(crate) is_abstract: bool,
    pub(crate) substitution_group: Option<QName>,
}

impl SchemaElement {
    pub fn new(name: QName, type_id: TypeId) -> Self {
        Self {
            name,
            type_id,
            is_abstract: false,
            substitution_group: None,
        }
    }

    pub fn element_name(&self) -> &QName {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Name of the head element this element substitutes, if declared.
    pub fn substitution_group(&self) -> Option<&QName> {
        self.substitution_group.as_ref()
    }
}

/// A node of the type hierarchy.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub(crate) name: QName,
    pub(crate) is_abstract: bool,
    pub(crate) super_type: Option<TypeId>,
    pub(crate) subtypes: Vec<TypeId>,
    pub(crate) properties: IndexMap<QName, AttributeDefinition>,
}

impl TypeDefinition {
    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn super_type(&self) -> Option<TypeId> {
        self.super_type
    }

    /// Direct subtypes in declaration order.
    pub fn subtypes(&self) -> &[TypeId] {
        &self.subtypes
    }

    /// Direct properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.properties.values()
    }

    pub fn property(&self, name: &QName) -> Option<&AttributeDefinition> {
        self.properties.get(name)
    }
}

// =============================================================================
// Schema
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub(crate) types: Vec<TypeDefinition>,
    pub(crate) type_index: AHashMap<QName, TypeId>,
    pub(crate) elements: Vec<SchemaElement>,
    pub(crate) element_index: AHashMap<QName, usize>,
}

impl Schema {
    pub fn get(&self, id: TypeId) -> Option<&TypeDefinition> {
        self.types.get(id.0)
    }

    /// Get the definition behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by the builder of this schema.
    pub fn type_definition(&self, id: TypeId) -> &TypeDefinition {
        &self.types[id.0]
    }

    pub fn type_name(&self, id: TypeId) -> &QName {
        &self.type_definition(id).name
    }

    pub fn lookup_type(&self, name: &QName) -> Option<TypeId> {
        self.type_index.get(name).copied()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeDefinition)> {
        self.types.iter().enumerate().map(|(i, def)| (TypeId(i), def))
    }

    pub fn subtypes(&self, id: TypeId) -> &[TypeId] {
        &self.type_definition(id).subtypes
    }

    pub fn super_type(&self, id: TypeId) -> Option<TypeId> {
        self.type_definition(id).super_type
    }

    /// The super-type chain of `id`, nearest first. Does not include `id`.
    pub fn supertypes(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        std::iter::successors(self.super_type(id), |&t| self.super_type(t))
    }

    /// Whether a value of type `sub` may stand where `sup` is declared.
    pub fn is_assignable(&self, sub: TypeId, sup: TypeId) -> bool {
        sub == sup || self.supertypes(sub).any(|t| t == sup)
    }

    pub fn properties(&self, id: TypeId) -> impl Iterator<Item = &AttributeDefinition> {
        self.type_definition(id).properties()
    }

    pub fn property(&self, id: TypeId, name: &QName) -> Option<&AttributeDefinition> {
        self.type_definition(id).property(name)
    }

    pub fn elements(&self) -> &[SchemaElement] {
        &self.elements
    }

    pub fn element(&self, name: &QName) -> Option<&SchemaElement> {
        self.element_index.get(name).map(|&i| &self.elements[i])
    }

    /// The substitution group heads of `element`, nearest first.
    pub fn substitution_heads<'a>(
        &'a self,
        element: &'a SchemaElement,
    ) -> impl Iterator<Item = &'a SchemaElement> + 'a {
        let head_of = move |e: &SchemaElement| {
            e.substitution_group
                .as_ref()
                .and_then(|head| self.element(head))
        };
        std::iter::successors(head_of(element), move |&e| head_of(e))
    }

    /// Elements that may replace a slot declared with `slot_type`, in
    /// declaration order.
    ///
    /// A candidate is non-abstract, its type is assignable to the slot, and
    /// one of its substitution group heads has a type assignable to the slot.
    /// Elements outside any substitution group never qualify.
    pub fn substitutions(&self, slot_type: TypeId) -> impl Iterator<Item = &SchemaElement> {
        self.elements.iter().filter(move |e| {
            !e.is_abstract
                && self.is_assignable(e.type_id, slot_type)
                && self
                    .substitution_heads(e)
                    .any(|head| self.is_assignable(head.type_id, slot_type))
        })
    }
}
