use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::module::{CoordinateParseError, ModuleCoordinate};

static SHORT_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Za-z](?:[0-9A-Za-z_-]*[0-9A-Za-z])?$")
        .expect("short name pattern should be valid")
});

/**
    Checks if the given string is a valid short name.

    Short names start and end with an alphanumeric character,
    and may contain dashes or underscores in between.
*/
#[must_use]
pub fn is_valid_short_name(s: &str) -> bool {
    SHORT_NAME_PATTERN.is_match(s)
}

/**
    Error type representing the reasons a single alias line can be rejected.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AliasLineError {
    #[error("expected 'short target [description]', found '{0}'")]
    MissingTarget(String),
    #[error("short name '{0}' is invalid")]
    InvalidShortName(String),
    #[error(transparent)]
    InvalidTarget(#[from] CoordinateParseError),
}

/**
    A short alias for a module coordinate, with an optional description.

    The short name includes the namespace of the
    list it was loaded from, such as `x/stringer`.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub(crate) short: String,
    pub(crate) target: ModuleCoordinate,
    pub(crate) description: String,
}

impl Alias {
    #[must_use]
    pub fn short(&self) -> &str {
        &self.short
    }

    #[must_use]
    pub fn target(&self) -> &ModuleCoordinate {
        &self.target
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /**
        Parses a single line of an alias list.

        Returns `Ok(None)` for blank lines and comments.

        # Errors

        - If the line has fewer than two fields.
        - If the short name or the target is invalid.
    */
    pub fn parse_line(line: &str) -> Result<Option<Self>, AliasLineError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (short, rest) = split_field(line);
        let (target, rest) = split_field(rest);
        if target.is_empty() {
            return Err(AliasLineError::MissingTarget(line.to_string()));
        }
        if !is_valid_short_name(short) {
            return Err(AliasLineError::InvalidShortName(short.to_string()));
        }

        Ok(Some(Self {
            short: short.to_string(),
            target: target.parse()?,
            description: rest.trim().to_string(),
        }))
    }

    pub(crate) fn with_namespace(mut self, namespace: &str) -> Self {
        if !namespace.is_empty() {
            self.short = format!("{namespace}/{}", self.short);
        }
        self
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.short, self.target)?;
        if !self.description.is_empty() {
            write!(f, " ({})", self.description)?;
        }
        Ok(())
    }
}

fn split_field(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    s.split_once(char::is_whitespace).unwrap_or((s, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_valid() {
        assert!(is_valid_short_name("a"));
        assert!(is_valid_short_name("7"));
        assert!(is_valid_short_name("ab"));
        assert!(is_valid_short_name("gopls"));
        assert!(is_valid_short_name("golangci-lint"));
        assert!(is_valid_short_name("go_vet2"));
        assert!(is_valid_short_name("a-_-b"));
    }

    #[test]
    fn short_names_invalid() {
        assert!(!is_valid_short_name(""));
        assert!(!is_valid_short_name("-"));
        assert!(!is_valid_short_name("_a"));
        assert!(!is_valid_short_name("a-"));
        assert!(!is_valid_short_name("a_"));
        assert!(!is_valid_short_name("a.b"));
        assert!(!is_valid_short_name("a/b"));
        assert!(!is_valid_short_name("a b"));
        assert!(!is_valid_short_name("tool@latest"));
    }

    #[test]
    fn parse_line_ignorable() {
        assert_eq!(Alias::parse_line(""), Ok(None));
        assert_eq!(Alias::parse_line("   \t"), Ok(None));
        assert_eq!(Alias::parse_line("# a comment"), Ok(None));
        assert_eq!(Alias::parse_line("  # indented comment"), Ok(None));
    }

    #[test]
    fn parse_line_full() {
        let alias = Alias::parse_line("gopl example.com/gopl@latest go programming language tool")
            .unwrap()
            .unwrap();
        assert_eq!(alias.short(), "gopl");
        assert_eq!(alias.target().to_string(), "example.com/gopl@latest");
        assert_eq!(alias.description(), "go programming language tool");
    }

    #[test]
    fn parse_line_extra_whitespace() {
        // Fields may be separated by any amount of whitespace, but
        // whitespace inside the description is kept as written
        let alias = Alias::parse_line("\tgopl   example.com/gopl@latest\t a  b ")
            .unwrap()
            .unwrap();
        assert_eq!(alias.short(), "gopl");
        assert_eq!(alias.target().to_string(), "example.com/gopl@latest");
        assert_eq!(alias.description(), "a  b");
    }

    #[test]
    fn parse_line_without_description() {
        let alias = Alias::parse_line("gopl example.com/gopl@latest")
            .unwrap()
            .unwrap();
        assert_eq!(alias.description(), "");
        assert_eq!(alias.to_string(), "gopl => example.com/gopl@latest");
    }

    #[test]
    fn parse_line_invalid() {
        assert!(matches!(
            Alias::parse_line("gopl"),
            Err(AliasLineError::MissingTarget(_))
        ));
        assert!(matches!(
            Alias::parse_line("-gopl example.com/gopl@latest"),
            Err(AliasLineError::InvalidShortName(_))
        ));
        assert!(matches!(
            Alias::parse_line("gopl example.com/gopl"),
            Err(AliasLineError::InvalidTarget(_))
        ));
        assert!(matches!(
            Alias::parse_line("gopl gopl@latest"),
            Err(AliasLineError::InvalidTarget(_))
        ));
    }

    #[test]
    fn namespacing() {
        let alias = Alias::parse_line("stringer golang.org/x/tools/cmd/stringer@latest")
            .unwrap()
            .unwrap();
        assert_eq!(alias.clone().with_namespace("").short(), "stringer");
        assert_eq!(alias.with_namespace("x").short(), "x/stringer");
    }
}
