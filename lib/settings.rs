use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{aliases::AliasSource, util::path::path_from_env};

pub const GO_BINARY_VAR: &str = "VA_GO";
pub const LISTS_DIR_VAR: &str = "VA_LISTS";

/**
    Settings for a single run, read from the environment.

    - `VA_GO` sets the `go` binary to use, instead of searching the `PATH`.
    - `VA_LISTS` sets a directory of extra `*.list` alias files,
      and defaults to `$HOME/.va/lists` when unset.
*/
#[derive(Debug, Clone, Default)]
pub struct Settings {
    go_binary: Option<PathBuf>,
    lists_dir: Option<PathBuf>,
}

impl Settings {
    /**
        Creates new settings from the environment.
    */
    #[must_use]
    pub fn load_from_env() -> Self {
        let go_binary = path_from_env(GO_BINARY_VAR);
        let lists_dir = path_from_env(LISTS_DIR_VAR)
            .or_else(|| dirs::home_dir().map(|home| home.join(".va").join("lists")));
        debug!(?go_binary, ?lists_dir, "loaded settings");
        Self {
            go_binary,
            lists_dir,
        }
    }

    #[must_use]
    pub fn with_go_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.go_binary = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_lists_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.lists_dir = Some(path.into());
        self
    }

    #[must_use]
    pub fn go_binary(&self) -> Option<&Path> {
        self.go_binary.as_deref()
    }

    #[must_use]
    pub fn lists_dir(&self) -> Option<&Path> {
        self.lists_dir.as_deref()
    }

    /**
        Gathers all alias sources: the lists compiled into
        this binary, followed by any user lists on disk.

        # Errors

        - If the user list directory exists but could not be read.
    */
    pub async fn alias_sources(&self) -> std::io::Result<Vec<AliasSource>> {
        let mut sources = AliasSource::embedded();
        if let Some(dir) = &self.lists_dir {
            sources.extend(AliasSource::read_dir(dir).await?);
        }
        Ok(sources)
    }
}
