//! Recorded traversals through a type hierarchy.
//!
//! A [`DefinitionPath`] is the trace a matched pattern leaves behind: the
//! properties descended into, the subtypes narrowed to and the substitution
//! group members used, in order. The document writer replays it to emit one
//! nested element per step (see [`DefinitionPath::replay`]).

use std::fmt::{self, Display};
use std::sync::Arc;

use geopath_schema::{AttributeDefinition, QName, SchemaElement, TypeId};
use thiserror::Error;

use crate::writer::{GeometryKind, GeometryWriter};

/// Discriminant of a [`PathElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathElementKind {
    Property,
    Downcast,
    Substitution,
}

impl Display for PathElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElementKind::Property => write!(f, "property"),
            PathElementKind::Downcast => write!(f, "downcast"),
            PathElementKind::Substitution => write!(f, "substitution"),
        }
    }
}

/// One step of a [`DefinitionPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathElement {
    /// Descent into a property of the current type.
    Property(AttributeDefinition),
    /// The current slot, narrowed to one of its subtypes. Keeps the slot name.
    Downcast { name: QName, type_id: TypeId },
    /// The current slot, replaced by a member of a substitution group.
    Substitution(SchemaElement),
}

impl PathElement {
    /// Name of the output element this step stands for.
    pub fn name(&self) -> &QName {
        match self {
            PathElement::Property(attdef) => attdef.name(),
            PathElement::Downcast { name, .. } => name,
            PathElement::Substitution(element) => element.element_name(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        match self {
            PathElement::Property(attdef) => attdef.value_type(),
            PathElement::Downcast { type_id, .. } => *type_id,
            PathElement::Substitution(element) => element.type_id(),
        }
    }

    pub fn kind(&self) -> PathElementKind {
        match self {
            PathElement::Property(_) => PathElementKind::Property,
            PathElement::Downcast { .. } => PathElementKind::Downcast,
            PathElement::Substitution(_) => PathElementKind::Substitution,
        }
    }

    pub fn is_property(&self) -> bool {
        matches!(self, PathElement::Property(_))
    }

    pub fn is_downcast(&self) -> bool {
        matches!(self, PathElement::Downcast { .. })
    }

    pub fn is_substitution(&self) -> bool {
        matches!(self, PathElement::Substitution(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("a {kind} writer is already attached to path `{path}`")]
    WriterAlreadyAttached { kind: GeometryKind, path: String },
}

/// A path in a type definition hierarchy, regarding subtypes, properties and
/// substitution groups.
///
/// The terminal type and name are cached: for an empty path they are the
/// root context given on creation, otherwise those of the last step.
#[derive(Debug, Clone)]
pub struct DefinitionPath {
    steps: Vec<PathElement>,
    last_type: TypeId,
    last_name: QName,
    writer: Option<Arc<GeometryWriter>>,
}

impl DefinitionPath {
    /// Create an empty path rooted at `start_type`, written as `start_name`.
    pub fn new(start_type: TypeId, start_name: QName) -> Self {
        Self {
            steps: Vec::new(),
            last_type: start_type,
            last_name: start_name,
            writer: None,
        }
    }

    /// Create a path continuing `base`. The writer is not carried over.
    pub fn from_base(base: &DefinitionPath) -> Self {
        Self {
            steps: base.steps.clone(),
            last_type: base.last_type,
            last_name: base.last_name.clone(),
            writer: None,
        }
    }

    /// Append a property step.
    pub fn add_property(&mut self, property: &AttributeDefinition) -> &mut Self {
        self.push_step(PathElement::Property(property.clone()));
        self
    }

    /// Narrow the current slot to `subtype`.
    ///
    /// The downcast overrides the last step instead of nesting below it; the
    /// new step keeps that step's name (or the root name for an empty path).
    pub fn add_downcast(&mut self, subtype: TypeId) -> &mut Self {
        let name = self.last_name.clone();
        self.steps.pop();
        self.push_step(PathElement::Downcast {
            name,
            type_id: subtype,
        });
        self
    }

    /// Replace the current slot with a substitution group member.
    ///
    /// Like [`add_downcast`](Self::add_downcast) this overrides the last
    /// step; the new step is named and typed after `element`.
    pub fn add_substitution(&mut self, element: &SchemaElement) -> &mut Self {
        self.steps.pop();
        self.push_step(PathElement::Substitution(element.clone()));
        self
    }

    fn push_step(&mut self, step: PathElement) {
        self.last_type = step.type_id();
        self.last_name = step.name().clone();
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[PathElement] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_element(&self) -> Option<&PathElement> {
        self.steps.last()
    }

    pub fn last_type(&self) -> TypeId {
        self.last_type
    }

    pub fn last_name(&self) -> &QName {
        &self.last_name
    }

    /// The writer this path was matched for.
    pub fn writer(&self) -> Option<&Arc<GeometryWriter>> {
        self.writer.as_ref()
    }

    /// Hand a freshly matched path to the writer that matched it.
    pub(crate) fn with_writer(mut self, writer: Arc<GeometryWriter>) -> Self {
        debug_assert!(self.writer.is_none());
        self.writer = Some(writer);
        self
    }

    /// Attach the writer that accepted this path. A path takes exactly one.
    pub fn attach_writer(&mut self, writer: Arc<GeometryWriter>) -> Result<(), PathError> {
        if let Some(existing) = &self.writer {
            return Err(PathError::WriterAlreadyAttached {
                kind: existing.kind(),
                path: self.to_string(),
            });
        }
        self.writer = Some(writer);
        Ok(())
    }
}

impl Display for DefinitionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "empty");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", step.name())?;
        }
        Ok(())
    }
}
