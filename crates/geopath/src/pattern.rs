//! Path patterns
//!
//! A pattern describes the shape of a traversal from a type to the slot a
//! geometry is written to. Segments are separated by `/`:
//!
//! | segment   | meaning                                                  |
//! |-----------|----------------------------------------------------------|
//! | `name`    | direct property called `name`                            |
//! | `(name)`  | narrow the current slot to its direct subtype named `name` |
//! | `<name>`  | replace the current slot with substitution member `name` |
//! | `*`       | any single direct property                               |
//! | `**`      | any number of property descents, including none          |
//!
//! Names are either bare NCNames, resolved against the output namespace at
//! match time, or Clark notation (`{namespace}local`). `{}local` selects the
//! empty namespace. A `/` inside `{...}` does not separate segments.
//!
//! This holds for every named segment, downcast targets included. Property
//! and subtype names of an application schema usually live outside the GML
//! output namespace, so they need Clark notation there:
//! `({urn:x-city}ResidentialBuilding)`, not `(ResidentialBuilding)`.
//!
//! ```text
//! geom/<Point>
//! ({urn:x-city}ResidentialBuilding)/{urn:x-city}entrance
//! {http://www.opengis.net/gml}pointMember/<{http://www.opengis.net/gml}Point>
//! **/<Polygon>
//! ```

use std::fmt::{self, Display};
use std::str::FromStr;

use geopath_schema::{QName, Schema, TypeId, is_ncname};
use thiserror::Error;
use tracing::trace;

use crate::path::DefinitionPath;

/// Default bound on the number of properties a `**` segment descends into.
pub const DEFAULT_MAX_DESCENT_DEPTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Maximum number of properties a single `**` segment may descend into.
    pub max_descent_depth: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_descent_depth: DEFAULT_MAX_DESCENT_DEPTH,
        }
    }
}

// =============================================================================
// Segments
// =============================================================================

/// A name in a pattern, optionally qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTest {
    namespace: Option<String>,
    local: String,
}

impl NameTest {
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// Whether `name` is selected by this test. Unqualified tests resolve
    /// against `output_namespace`.
    pub fn matches(&self, name: &QName, output_namespace: &str) -> bool {
        let namespace = self.namespace.as_deref().unwrap_or(output_namespace);
        name.local_name() == self.local && name.namespace() == namespace
    }
}

impl Display for NameTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Property(NameTest),
    AnyProperty,
    Descendants,
    Downcast(NameTest),
    Substitution(NameTest),
}

impl Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Property(test) => write!(f, "{test}"),
            Segment::AnyProperty => write!(f, "*"),
            Segment::Descendants => write!(f, "**"),
            Segment::Downcast(test) => write!(f, "({test})"),
            Segment::Substitution(test) => write!(f, "<{test}>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("segment {index} is empty")]
    EmptySegment { index: usize },

    #[error("unclosed `{open}` in `{segment}`")]
    Unclosed { open: char, segment: String },

    #[error("unexpected characters after `{close}` in `{segment}`")]
    TrailingCharacters { close: char, segment: String },

    #[error("invalid name `{name}`")]
    InvalidName { name: String },

    #[error("`**` directly followed by `**`")]
    RepeatedDescendants,

    #[error("pattern ends with `**`")]
    TrailingDescendants,
}

// =============================================================================
// Pattern
// =============================================================================

/// A compiled path pattern.
///
/// Parsing never fails outright: a malformed text yields a pattern that
/// reports `is_valid() == false` and never matches anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    text: String,
    compiled: Result<Vec<Segment>, PatternError>,
}

impl Pattern {
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            compiled: compile(text),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    /// The reason this pattern is invalid, if it is.
    pub fn error(&self) -> Option<&PatternError> {
        self.compiled.as_ref().err()
    }

    /// Compiled segments. Empty for an invalid pattern.
    pub fn segments(&self) -> &[Segment] {
        match &self.compiled {
            Ok(segments) => segments,
            Err(_) => &[],
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Match this pattern against `type_id`, continuing `base_path`.
    pub fn matches(
        &self,
        schema: &Schema,
        type_id: TypeId,
        base_path: &DefinitionPath,
        output_namespace: &str,
    ) -> Option<DefinitionPath> {
        self.matches_with(
            schema,
            type_id,
            base_path,
            output_namespace,
            &MatchOptions::default(),
        )
    }

    /// Like [`matches`](Self::matches) with explicit options.
    ///
    /// Returns the extended path only if every segment resolved; the caller's
    /// `base_path` is never modified.
    pub fn matches_with(
        &self,
        schema: &Schema,
        type_id: TypeId,
        base_path: &DefinitionPath,
        output_namespace: &str,
        options: &MatchOptions,
    ) -> Option<DefinitionPath> {
        let Ok(segments) = &self.compiled else {
            return None;
        };
        let matcher = Matcher {
            schema,
            output_namespace,
            options,
        };
        let result = matcher.walk(segments, type_id, DefinitionPath::from_base(base_path));
        if result.is_none() {
            trace!(
                pattern = %self.text,
                type_name = %schema.type_name(type_id),
                "pattern did not match"
            );
        }
        result
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pattern = Self::parse(s);
        match pattern.error() {
            Some(e) => Err(e.clone()),
            None => Ok(pattern),
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

// =============================================================================
// Compilation
// =============================================================================

fn compile(text: &str) -> Result<Vec<Segment>, PatternError> {
    if text.trim().is_empty() {
        return Err(PatternError::Empty);
    }
    let mut segments = Vec::new();
    for (index, raw) in split_segments(text)?.into_iter().enumerate() {
        if raw.is_empty() {
            return Err(PatternError::EmptySegment { index });
        }
        let segment = compile_segment(raw)?;
        if segment == Segment::Descendants && segments.last() == Some(&Segment::Descendants) {
            return Err(PatternError::RepeatedDescendants);
        }
        segments.push(segment);
    }
    if segments.last() == Some(&Segment::Descendants) {
        return Err(PatternError::TrailingDescendants);
    }
    Ok(segments)
}

/// Split on `/`, except inside a `{namespace}`.
fn split_segments(text: &str) -> Result<Vec<&str>, PatternError> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_namespace = false;
    for (i, c) in text.char_indices() {
        match c {
            '{' if !in_namespace => in_namespace = true,
            '}' if in_namespace => in_namespace = false,
            '/' if !in_namespace => {
                segments.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if in_namespace {
        return Err(PatternError::Unclosed {
            open: '{',
            segment: text[start..].to_string(),
        });
    }
    segments.push(&text[start..]);
    Ok(segments)
}

fn compile_segment(raw: &str) -> Result<Segment, PatternError> {
    match raw {
        "*" => Ok(Segment::AnyProperty),
        "**" => Ok(Segment::Descendants),
        _ if raw.starts_with('(') => compile_enclosed(raw, '(', ')').map(Segment::Downcast),
        _ if raw.starts_with('<') => compile_enclosed(raw, '<', '>').map(Segment::Substitution),
        _ => compile_name(raw).map(Segment::Property),
    }
}

/// Compile `(name)` or `<name>`; `raw` starts with `open`.
fn compile_enclosed(raw: &str, open: char, close: char) -> Result<NameTest, PatternError> {
    let inner = &raw[open.len_utf8()..];
    let search_from = if inner.starts_with('{') {
        inner.find('}').map_or(0, |i| i + 1)
    } else {
        0
    };
    let Some(offset) = inner[search_from..].find(close) else {
        return Err(PatternError::Unclosed {
            open,
            segment: raw.to_string(),
        });
    };
    let end = search_from + offset;
    if end + close.len_utf8() != inner.len() {
        return Err(PatternError::TrailingCharacters {
            close,
            segment: raw.to_string(),
        });
    }
    compile_name(&inner[..end])
}

fn compile_name(raw: &str) -> Result<NameTest, PatternError> {
    let (namespace, local) = match raw.strip_prefix('{') {
        Some(rest) => {
            let Some(end) = rest.find('}') else {
                return Err(PatternError::Unclosed {
                    open: '{',
                    segment: raw.to_string(),
                });
            };
            (Some(rest[..end].to_string()), &rest[end + 1..])
        }
        None => (None, raw),
    };
    if !is_ncname(local) {
        return Err(PatternError::InvalidName {
            name: raw.to_string(),
        });
    }
    Ok(NameTest {
        namespace,
        local: local.to_string(),
    })
}

// =============================================================================
// Matching
// =============================================================================

/// Walks segments over the schema graph. Each branch owns its path, so a
/// failed branch leaves nothing behind.
struct Matcher<'a> {
    schema: &'a Schema,
    output_namespace: &'a str,
    options: &'a MatchOptions,
}

impl Matcher<'_> {
    fn walk(
        &self,
        segments: &[Segment],
        current: TypeId,
        mut path: DefinitionPath,
    ) -> Option<DefinitionPath> {
        let Some((segment, rest)) = segments.split_first() else {
            return Some(path);
        };
        match segment {
            Segment::Property(test) => {
                let Some(property) = self
                    .schema
                    .properties(current)
                    .find(|p| test.matches(p.name(), self.output_namespace))
                else {
                    trace!(segment = %segment, "no such property");
                    return None;
                };
                path.add_property(property);
                self.walk(rest, property.value_type(), path)
            }
            Segment::AnyProperty => self.schema.properties(current).find_map(|property| {
                let mut next = path.clone();
                next.add_property(property);
                self.walk(rest, property.value_type(), next)
            }),
            Segment::Descendants => self.descend(rest, current, path, 0),
            Segment::Downcast(test) => {
                let Some(subtype) = self
                    .schema
                    .subtypes(current)
                    .iter()
                    .copied()
                    .find(|&t| test.matches(self.schema.type_name(t), self.output_namespace))
                else {
                    trace!(segment = %segment, "no such subtype");
                    return None;
                };
                path.add_downcast(subtype);
                self.walk(rest, subtype, path)
            }
            Segment::Substitution(test) => {
                let Some(element) = self
                    .schema
                    .substitutions(current)
                    .find(|e| test.matches(e.element_name(), self.output_namespace))
                else {
                    trace!(segment = %segment, "no such substitution");
                    return None;
                };
                path.add_substitution(element);
                self.walk(rest, element.type_id(), path)
            }
        }
    }

    /// `**`: try the remaining segments here first, then below each property
    /// in declaration order.
    fn descend(
        &self,
        rest: &[Segment],
        current: TypeId,
        path: DefinitionPath,
        depth: usize,
    ) -> Option<DefinitionPath> {
        if let Some(found) = self.walk(rest, current, path.clone()) {
            return Some(found);
        }
        if depth >= self.options.max_descent_depth {
            return None;
        }
        self.schema.properties(current).find_map(|property| {
            let mut next = path.clone();
            next.add_property(property);
            self.descend(rest, property.value_type(), next, depth + 1)
        })
    }
}
