//! Replaying a matched path into nested output elements.

use std::convert::Infallible;

use geopath_schema::{QName, Schema, TypeId};

use crate::path::{DefinitionPath, PathElement};

/// Receiver of the element structure a [`DefinitionPath`] describes.
pub trait ElementSink {
    type Error;

    /// Open an element. `xsi_type` is set when the element's content is
    /// written as a subtype of its declared type.
    fn start_element(&mut self, name: &QName, xsi_type: Option<&QName>)
    -> Result<(), Self::Error>;

    fn end_element(&mut self, name: &QName) -> Result<(), Self::Error>;
}

impl DefinitionPath {
    /// Emit one element per step into `sink`, run `encode` with the terminal
    /// type inside the innermost element, then close the elements again.
    pub fn replay<S, F>(&self, schema: &Schema, sink: &mut S, encode: F) -> Result<(), S::Error>
    where
        S: ElementSink + ?Sized,
        F: FnOnce(&mut S, TypeId) -> Result<(), S::Error>,
    {
        for step in self.steps() {
            match step {
                PathElement::Property(property) => sink.start_element(property.name(), None)?,
                PathElement::Downcast { name, type_id } => {
                    sink.start_element(name, Some(schema.type_name(*type_id)))?
                }
                PathElement::Substitution(element) => {
                    sink.start_element(element.element_name(), None)?
                }
            }
        }
        encode(sink, self.last_type())?;
        for step in self.steps().iter().rev() {
            sink.end_element(step.name())?;
        }
        Ok(())
    }
}

/// An element event, as recorded by the `Vec<ReplayEvent>` sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayEvent {
    Start { name: QName, xsi_type: Option<QName> },
    Value { type_id: TypeId },
    End { name: QName },
}

impl ElementSink for Vec<ReplayEvent> {
    type Error = Infallible;

    fn start_element(&mut self, name: &QName, xsi_type: Option<&QName>) -> Result<(), Infallible> {
        self.push(ReplayEvent::Start {
            name: name.clone(),
            xsi_type: xsi_type.cloned(),
        });
        Ok(())
    }

    fn end_element(&mut self, name: &QName) -> Result<(), Infallible> {
        self.push(ReplayEvent::End { name: name.clone() });
        Ok(())
    }
}

impl DefinitionPath {
    /// Record the element structure of this path, with a
    /// [`ReplayEvent::Value`] marking where the geometry goes.
    pub fn events(&self, schema: &Schema) -> Vec<ReplayEvent> {
        let mut events = Vec::new();
        let recorded = self.replay(schema, &mut events, |sink, type_id| {
            sink.push(ReplayEvent::Value { type_id });
            Ok(())
        });
        match recorded {
            Ok(()) => events,
            Err(never) => match never {},
        }
    }
}
