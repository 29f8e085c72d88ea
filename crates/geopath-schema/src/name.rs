use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static NCNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{N}._-]*$").unwrap());

/// Check whether `s` has the shape of an XML non-colonized name.
pub fn is_ncname(s: &str) -> bool {
    NCNAME.is_match(s)
}

/// A namespace-qualified name.
///
/// An empty namespace means the name is not in any namespace. The textual
/// form is Clark notation: `{namespace}local`, or just `local` when the
/// namespace is empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QName {
    namespace: String,
    local: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QNameError {
    #[error("empty local name")]
    Empty,
    #[error("unterminated namespace in `{text}`")]
    UnterminatedNamespace { text: String },
    #[error("invalid local name `{local}`")]
    InvalidLocalName { local: String },
}

impl QName {
    /// Creates a qualified name without validating the local part.
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// Creates a name without a namespace.
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self::new(String::new(), local)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_name(&self) -> &str {
        &self.local
    }

    pub fn has_namespace(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// Compare against `other`, treating an empty namespace on `self` as
    /// `default_namespace`.
    pub fn matches_in(&self, other: &QName, default_namespace: &str) -> bool {
        let namespace = if self.namespace.is_empty() {
            default_namespace
        } else {
            &self.namespace
        };
        self.local == other.local && namespace == other.namespace
    }
}

impl FromStr for QName {
    type Err = QNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, local) = match s.strip_prefix('{') {
            Some(rest) => {
                let Some(end) = rest.find('}') else {
                    return Err(QNameError::UnterminatedNamespace {
                        text: s.to_string(),
                    });
                };
                (&rest[..end], &rest[end + 1..])
            }
            None => ("", s),
        };
        if local.is_empty() {
            return Err(QNameError::Empty);
        }
        if !is_ncname(local) {
            return Err(QNameError::InvalidLocalName {
                local: local.to_string(),
            });
        }
        Ok(QName::new(namespace, local))
    }
}

impl Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}
