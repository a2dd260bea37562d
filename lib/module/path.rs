use std::{fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

use super::util::{is_first_element_char, is_path_char, is_reserved_device_name};

/**
    Error type representing the reasons a module path can be rejected.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModulePathError {
    #[error("module path is empty")]
    Empty,
    #[error("leading slash")]
    LeadingSlash,
    #[error("leading dash")]
    LeadingDash,
    #[error("double slash")]
    DoubleSlash,
    #[error("trailing slash")]
    TrailingSlash,
    #[error("missing dot in first path element")]
    MissingDotInFirstElement,
    #[error("invalid char '{0}' in first path element")]
    InvalidFirstElementChar(char),
    #[error("empty path element")]
    EmptyElement,
    #[error("invalid path element '{0}'")]
    DotsOnlyElement(String),
    #[error("leading dot in path element '{0}'")]
    LeadingDot(String),
    #[error("trailing dot in path element '{0}'")]
    TrailingDot(String),
    #[error("invalid char '{1}' in path element '{0}'")]
    InvalidChar(String, char),
    #[error("disallowed path element '{0}'")]
    ReservedName(String),
    #[error("trailing tilde and digits in path element '{0}'")]
    TildeDigits(String),
    #[error("invalid major version suffix '{0}'")]
    InvalidMajorVersion(String),
}

/**
    A validated module path, such as `golang.org/x/tools/gopls`.

    Module paths are slash-separated, start with a domain-like element,
    and may end in a major version suffix such as `/v2`.
*/
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct ModulePath(String);

impl ModulePath {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /**
        Returns the number of slash-separated segments in this path.
    */
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.split('/').count()
    }
}

impl FromStr for ModulePath {
    type Err = ModulePathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check_module_path(s)?;
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for ModulePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/**
    Checks that the given string is a valid module path.

    # Errors

    - If any part of the path violates the module path grammar,
      with the first violation found as the reason.
*/
pub fn check_module_path(path: &str) -> Result<(), ModulePathError> {
    if path.is_empty() {
        return Err(ModulePathError::Empty);
    }

    let first = path.split('/').next().unwrap_or_default();
    if first.is_empty() {
        return Err(ModulePathError::LeadingSlash);
    }
    if !first.contains('.') {
        return Err(ModulePathError::MissingDotInFirstElement);
    }
    if first.starts_with('-') {
        return Err(ModulePathError::LeadingDash);
    }
    if let Some(c) = first.chars().find(|c| !is_first_element_char(*c)) {
        return Err(ModulePathError::InvalidFirstElementChar(c));
    }

    if path.contains("//") {
        return Err(ModulePathError::DoubleSlash);
    }
    if path.ends_with('/') {
        return Err(ModulePathError::TrailingSlash);
    }
    for elem in path.split('/') {
        check_element(elem)?;
    }

    if split_major_version(path).is_none() {
        let suffix = path.rsplit(['/', '.']).next().unwrap_or(path);
        return Err(ModulePathError::InvalidMajorVersion(suffix.to_string()));
    }

    Ok(())
}

fn check_element(elem: &str) -> Result<(), ModulePathError> {
    if elem.is_empty() {
        return Err(ModulePathError::EmptyElement);
    }
    if elem.chars().all(|c| c == '.') {
        return Err(ModulePathError::DotsOnlyElement(elem.to_string()));
    }
    if elem.starts_with('.') {
        return Err(ModulePathError::LeadingDot(elem.to_string()));
    }
    if elem.ends_with('.') {
        return Err(ModulePathError::TrailingDot(elem.to_string()));
    }
    if let Some(c) = elem.chars().find(|c| !is_path_char(*c)) {
        return Err(ModulePathError::InvalidChar(elem.to_string(), c));
    }

    // Everything before the first dot is what a Windows filesystem
    // would see as the name, so device names are rejected there
    let short = elem.split('.').next().unwrap_or(elem);
    if is_reserved_device_name(short) {
        return Err(ModulePathError::ReservedName(elem.to_string()));
    }
    if let Some((_, digits)) = short.rsplit_once('~') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ModulePathError::TildeDigits(elem.to_string()));
        }
    }

    Ok(())
}

/**
    Splits a module path into its prefix and major version suffix.

    Returns `None` if the path ends in a malformed major version suffix.
    The suffix is empty for paths without one.
*/
pub(crate) fn split_major_version(path: &str) -> Option<(&str, &str)> {
    if path.starts_with("gopkg.in/") {
        return split_gopkg_in(path);
    }

    let bytes = path.as_bytes();
    let mut i = bytes.len();
    let mut dot = false;
    while i > 0 && (bytes[i - 1].is_ascii_digit() || bytes[i - 1] == b'.') {
        if bytes[i - 1] == b'.' {
            dot = true;
        }
        i -= 1;
    }
    if i <= 1 || i == bytes.len() || bytes[i - 1] != b'v' || bytes[i - 2] != b'/' {
        return Some((path, ""));
    }

    let (prefix, major) = path.split_at(i - 2);
    if dot || major.len() <= 2 || major.as_bytes()[2] == b'0' || major == "/v1" {
        return None;
    }
    Some((prefix, major))
}

fn split_gopkg_in(path: &str) -> Option<(&str, &str)> {
    let bytes = path.as_bytes();
    let mut i = path.strip_suffix("-unstable").map_or(path.len(), str::len);
    while i > 0 && bytes[i - 1].is_ascii_digit() {
        i -= 1;
    }
    if i <= 1 || bytes[i - 1] != b'v' || bytes[i - 2] != b'.' {
        return None;
    }

    let (prefix, major) = path.split_at(i - 2);
    if major.len() <= 2 || (major.as_bytes()[2] == b'0' && major != ".v0") {
        return None;
    }
    Some((prefix, major))
}
