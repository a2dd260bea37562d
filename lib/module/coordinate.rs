use std::{fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

use super::{ModulePath, ModulePathError};

/**
    Error type representing the possible errors that can occur when parsing a `ModuleCoordinate`.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateParseError {
    #[error("invalid module '{0}': missing '@' separator (must be path@version)")]
    MissingVersionSeparator(String),
    #[error("invalid module '{0}': too many '@' separators (must be path@version)")]
    ExtraVersionSeparator(String),
    #[error("invalid module '{0}': version is empty (must be path@version)")]
    EmptyVersion(String),
    #[error("invalid module '{coordinate}': {source}")]
    InvalidPath {
        coordinate: String,
        source: ModulePathError,
    },
}

/**
    A module coordinate, which is a module path and a version.

    The version may be anything the module proxy understands,
    such as `latest`, `v1.2.3`, a branch name, or a commit hash.
*/
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct ModuleCoordinate {
    pub(crate) path: ModulePath,
    pub(crate) version: String,
}

impl ModuleCoordinate {
    /**
        Creates a new module coordinate from an already validated path.

        # Errors

        - If the version is empty or contains an `@`.
    */
    pub fn new(path: ModulePath, version: impl Into<String>) -> Result<Self, CoordinateParseError> {
        let version = version.into();
        if version.contains('@') {
            return Err(CoordinateParseError::ExtraVersionSeparator(format!(
                "{path}@{version}"
            )));
        }
        if version.is_empty() {
            return Err(CoordinateParseError::EmptyVersion(format!("{path}@")));
        }
        Ok(Self { path, version })
    }

    #[must_use]
    pub fn path(&self) -> &ModulePath {
        &self.path
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /**
        Returns a copy of this coordinate pointing at a different version.

        # Errors

        - If the version is empty or contains an `@`.
    */
    pub fn with_version(&self, version: impl Into<String>) -> Result<Self, CoordinateParseError> {
        Self::new(self.path.clone(), version)
    }
}

impl FromStr for ModuleCoordinate {
    type Err = CoordinateParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((path, version)) = s.split_once('@') else {
            return Err(CoordinateParseError::MissingVersionSeparator(s.to_string()));
        };
        if version.contains('@') {
            return Err(CoordinateParseError::ExtraVersionSeparator(s.to_string()));
        }
        if version.is_empty() {
            return Err(CoordinateParseError::EmptyVersion(s.to_string()));
        }

        let path = path
            .parse::<ModulePath>()
            .map_err(|source| CoordinateParseError::InvalidPath {
                coordinate: s.to_string(),
                source,
            })?;

        Ok(Self {
            path,
            version: version.to_string(),
        })
    }
}

impl fmt::Display for ModuleCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.version)
    }
}
