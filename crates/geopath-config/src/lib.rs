//! Configuration for geopath writers.
//!
//! The configuration is stored in `GeoPath.json` files at project roots:
//!
//! ```json
//! {
//!   "output-namespace": "http://www.opengis.net/gml/3.2",
//!   "max-descent-depth": 3,
//!   "standard-writers": true,
//!   "writers": [
//!     {
//!       "kind": "Point",
//!       "compatible-types": ["{urn:x-city}City"],
//!       "patterns": ["geom/<Point>"]
//!     }
//!   ]
//! }
//! ```
//!
//! Every field is optional. Custom writers are registered before the
//! standard ones, so they win when both match.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use geopath::{
    GML_NAMESPACE, GeometryKind, GeometryWriter, MatchOptions, UnknownGeometryKind,
    WriterRegistry,
};
use geopath_schema::{QName, QNameError};
use serde::Deserialize;
use tracing::debug;

/// The standard configuration filename.
pub const CONFIG_FILENAME: &str = "GeoPath.json";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid compatible type `{name}` for {kind} writer: {source}")]
    InvalidTypeName {
        kind: GeometryKind,
        name: String,
        #[source]
        source: QNameError,
    },
    #[error(transparent)]
    UnknownGeometryKind(#[from] UnknownGeometryKind),
}

/// A custom writer definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct WriterConfig {
    /// Geometry kind name, e.g. `"Polygon"`.
    pub kind: String,
    /// Type names in Clark notation; bare names resolve against the output
    /// namespace.
    #[serde(default)]
    pub compatible_types: Vec<String>,
    /// Encoding patterns, in priority order.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// The main geopath configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct GeoPathConfig {
    /// Namespace unqualified pattern and type names resolve against.
    pub output_namespace: String,
    /// Bound for `**` segments. Defaults to
    /// [`DEFAULT_MAX_DESCENT_DEPTH`](geopath::DEFAULT_MAX_DESCENT_DEPTH).
    pub max_descent_depth: Option<usize>,
    /// Whether to register the built-in GML writers after the custom ones.
    pub standard_writers: bool,
    pub writers: Vec<WriterConfig>,
}

impl Default for GeoPathConfig {
    fn default() -> Self {
        Self {
            output_namespace: GML_NAMESPACE.to_string(),
            max_descent_depth: None,
            standard_writers: true,
            writers: Vec::new(),
        }
    }
}

impl GeoPathConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse configuration from a string. Blank input yields the default
    /// configuration.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(content)?)
    }

    /// Find the configuration file by searching upward from the given directory.
    pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILENAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration by searching upward from the given directory.
    pub fn load_from_dir(start_dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        if let Some(config_path) = Self::find_config_file(start_dir) {
            debug!(path = %config_path.display(), "loading geopath config");
            let config = Self::load(&config_path)?;
            Ok(Some((config_path, config)))
        } else {
            Ok(None)
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        self.max_descent_depth
            .map(|max_descent_depth| MatchOptions { max_descent_depth })
            .unwrap_or_default()
    }

    /// Build one configured writer. Invalid patterns are skipped with a
    /// warning, like any pattern added to a writer.
    pub fn build_writer(writer: &WriterConfig) -> Result<Arc<GeometryWriter>, ConfigError> {
        let kind: GeometryKind = writer.kind.parse()?;
        let mut builder = GeometryWriter::builder(kind);
        for name in &writer.compatible_types {
            let type_name = name
                .parse::<QName>()
                .map_err(|source| ConfigError::InvalidTypeName {
                    kind,
                    name: name.clone(),
                    source,
                })?;
            builder.add_compatible_type(type_name);
        }
        for pattern in &writer.patterns {
            builder.add_pattern(pattern);
        }
        Ok(builder.build())
    }

    /// Build the writer registry this configuration describes.
    pub fn build_registry(&self) -> Result<WriterRegistry, ConfigError> {
        let mut builder = WriterRegistry::builder();
        for writer in &self.writers {
            builder.register(Self::build_writer(writer)?);
        }
        if self.standard_writers {
            builder.with_standard_writers();
        }
        builder.options(self.match_options());
        Ok(builder.build())
    }
}
