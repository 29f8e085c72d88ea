//! Writer dispatch
//!
//! The registry holds geometry writers in registration order and hands out
//! the path of the first eligible writer whose patterns match a type.

use std::sync::Arc;

use geopath_schema::{Schema, TypeId};
use tracing::debug;

use crate::path::DefinitionPath;
use crate::pattern::MatchOptions;
use crate::standard::standard_writers;
use crate::writer::{GeometryKind, GeometryWriter};

#[derive(Debug, Default)]
pub struct WriterRegistryBuilder {
    writers: Vec<Arc<GeometryWriter>>,
    options: MatchOptions,
}

impl WriterRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, writer: Arc<GeometryWriter>) -> &mut Self {
        self.writers.push(writer);
        self
    }

    /// Register the built-in GML writers after the ones registered so far.
    pub fn with_standard_writers(&mut self) -> &mut Self {
        self.writers.extend(standard_writers());
        self
    }

    pub fn options(&mut self, options: MatchOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn build(self) -> WriterRegistry {
        WriterRegistry {
            writers: self.writers,
            options: self.options,
        }
    }
}

/// An immutable, ordered set of geometry writers.
#[derive(Debug, Clone, Default)]
pub struct WriterRegistry {
    writers: Vec<Arc<GeometryWriter>>,
    options: MatchOptions,
}

impl WriterRegistry {
    pub fn builder() -> WriterRegistryBuilder {
        WriterRegistryBuilder::new()
    }

    pub fn writers(&self) -> &[Arc<GeometryWriter>] {
        &self.writers
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Writers compatible with `type_id`, in registration order.
    pub fn eligible<'a>(
        &'a self,
        schema: &'a Schema,
        type_id: TypeId,
        output_namespace: &'a str,
    ) -> impl Iterator<Item = &'a Arc<GeometryWriter>> + 'a {
        self.writers
            .iter()
            .filter(move |w| w.is_compatible(schema, type_id, output_namespace))
    }

    /// Find a geometry path for `type_id` using the first eligible writer
    /// that matches.
    ///
    /// `None` means the type is not a recognized geometry slot.
    pub fn find_match(
        &self,
        schema: &Schema,
        type_id: TypeId,
        base_path: &DefinitionPath,
        output_namespace: &str,
    ) -> Option<DefinitionPath> {
        let writers = self.eligible(schema, type_id, output_namespace);
        self.first_match(writers, schema, type_id, base_path, output_namespace)
    }

    /// Like [`find_match`](Self::find_match), restricted to writers of `kind`.
    pub fn find_match_for_kind(
        &self,
        kind: GeometryKind,
        schema: &Schema,
        type_id: TypeId,
        base_path: &DefinitionPath,
        output_namespace: &str,
    ) -> Option<DefinitionPath> {
        let writers = self
            .eligible(schema, type_id, output_namespace)
            .filter(|w| w.kind() == kind);
        self.first_match(writers, schema, type_id, base_path, output_namespace)
    }

    fn first_match<'a>(
        &self,
        mut writers: impl Iterator<Item = &'a Arc<GeometryWriter>>,
        schema: &Schema,
        type_id: TypeId,
        base_path: &DefinitionPath,
        output_namespace: &str,
    ) -> Option<DefinitionPath> {
        let found = writers.find_map(|writer| {
            writer.try_match_with(schema, type_id, base_path, output_namespace, &self.options)
        });
        if found.is_none() {
            debug!(
                type_name = %schema.type_name(type_id),
                "no geometry writer matched"
            );
        }
        found
    }
}
