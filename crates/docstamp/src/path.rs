use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error as ThisError;

///
/// PathError
///

#[derive(Debug, ThisError)]
pub enum PathError {
    #[error("attribute path is empty")]
    Empty,

    #[error("attribute path '{path}' contains an empty segment")]
    EmptySegment { path: String },
}

///
/// AttrPath
///
/// Dotted attribute path within a document, e.g. `created.date`.
/// Construction validates that the path and every segment are non-empty.
///

#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct AttrPath(String);

impl AttrPath {
    pub fn new(path: impl Into<String>) -> Result<Self, PathError> {
        let path = path.into();

        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if path.split('.').any(str::is_empty) {
            return Err(PathError::EmptySegment { path });
        }

        Ok(Self(path))
    }

    // Built-in defaults are known-valid dotted paths.
    pub(crate) fn from_static(path: &'static str) -> Self {
        debug_assert!(Self::new(path).is_ok());

        Self(path.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl FromStr for AttrPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for AttrPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AttrPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
