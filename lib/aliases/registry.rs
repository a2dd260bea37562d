use std::collections::BTreeMap;

use thiserror::Error;
use tracing::trace;

use crate::module::{CoordinateParseError, ModuleCoordinate};

use super::{
    alias::{Alias, AliasLineError, is_valid_short_name},
    source::{AliasSource, NO_NAMESPACE},
};

/**
    Error type representing the possible errors that can occur when loading an `AliasRegistry`.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("invalid alias list name '{0}'")]
    InvalidSourceName(String),
    #[error("bad line {line} in alias list '{list}': {reason}")]
    InvalidAliasLine {
        list: String,
        line: usize,
        reason: AliasLineError,
    },
    #[error("alias '{short}' already exists, found again in alias list '{list}'")]
    DuplicateAlias { short: String, list: String },
}

/**
    An in-memory registry of aliases, keyed by their namespaced short name.

    Aliases are immutable once loaded, and iterate in short name order.
*/
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    aliases: BTreeMap<String, Alias>,
}

impl AliasRegistry {
    /**
        Loads a registry from the given alias sources.

        Sources are read in name order. Blank lines and comments are
        skipped, and every other line must be a valid alias definition.

        # Errors

        - If a source name is not usable as a namespace.
        - If any line in any source is invalid.
        - If the same namespaced short name is defined twice.
    */
    pub fn load<'a>(
        sources: impl IntoIterator<Item = &'a AliasSource>,
    ) -> Result<Self, RegistryError> {
        let mut sources = sources.into_iter().collect::<Vec<_>>();
        sources.sort_by(|a, b| a.name.cmp(&b.name));

        let mut aliases = BTreeMap::new();
        for source in sources {
            if source.name != NO_NAMESPACE && !is_valid_short_name(&source.name) {
                return Err(RegistryError::InvalidSourceName(source.name.clone()));
            }

            let namespace = source.namespace();
            for (index, line) in source.contents.lines().enumerate() {
                let alias = Alias::parse_line(line).map_err(|reason| {
                    RegistryError::InvalidAliasLine {
                        list: source.name.clone(),
                        line: index + 1,
                        reason,
                    }
                })?;

                let Some(alias) = alias else {
                    continue;
                };

                let alias = alias.with_namespace(namespace);
                if aliases.contains_key(&alias.short) {
                    return Err(RegistryError::DuplicateAlias {
                        short: alias.short,
                        list: source.name.clone(),
                    });
                }

                trace!(short = %alias.short, target = %alias.target, "loaded alias");
                aliases.insert(alias.short.clone(), alias);
            }
        }

        Ok(Self { aliases })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /**
        Gets an alias by its namespaced short name, if it exists.
    */
    #[must_use]
    pub fn get(&self, short: &str) -> Option<&Alias> {
        self.aliases.get(short)
    }

    /**
        Iterates over all aliases, sorted by short name.
    */
    pub fn iter(&self) -> impl Iterator<Item = &Alias> {
        self.aliases.values()
    }

    /**
        Turns a user-supplied token, `name[@version]`, into a module coordinate.

        If `name` is a known alias, it is replaced by the path of the
        aliased module. A version given by the user always wins over
        the version of the alias, which is only used as a default.

        # Errors

        - If the resulting coordinate is not valid. This
          is checked for both aliased and plain tokens.
    */
    pub fn resolve_token(&self, token: &str) -> Result<ModuleCoordinate, CoordinateParseError> {
        let (name, version) = match token.split_once('@') {
            Some((name, version)) => (name, Some(version)),
            None => (token, None),
        };

        let Some(alias) = self.get(name) else {
            return token.parse();
        };

        let coordinate = match version {
            Some(version) => alias.target.with_version(version)?,
            None => alias.target.clone(),
        };
        trace!(alias = %alias.short, %coordinate, "substituted alias");
        Ok(coordinate)
    }
}

impl<'a> IntoIterator for &'a AliasRegistry {
    type Item = &'a Alias;
    type IntoIter = std::collections::btree_map::Values<'a, String, Alias>;
    fn into_iter(self) -> Self::IntoIter {
        self.aliases.values()
    }
}
