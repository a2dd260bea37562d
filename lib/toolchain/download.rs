use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/**
    Error type representing why a module could not be downloaded.

    The resolver treats every one of these as "no module at this
    path" and moves on to the parent path.
*/
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{coordinate}: {message}")]
    NotFound { coordinate: String, message: String },
    #[error("failed to start go: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("failed to read go output for {coordinate}: {source}")]
    InvalidOutput {
        coordinate: String,
        source: serde_json::Error,
    },
}

/**
    A module downloaded into the local module cache.

    Decoded from the output of `go mod download -json`.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DownloadedModule {
    pub(crate) path: String,
    pub(crate) version: String,
    pub(crate) error: Option<String>,
    pub(crate) info: Option<PathBuf>,
    pub(crate) go_mod: Option<PathBuf>,
    pub(crate) zip: Option<PathBuf>,
    pub(crate) dir: Option<PathBuf>,
    pub(crate) sum: Option<String>,
    pub(crate) go_mod_sum: Option<String>,
}

impl DownloadedModule {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /**
        The exact version that was downloaded, which may
        differ from the requested one, such as `latest`.
    */
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /**
        The directory the module was unpacked into, if any.
    */
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    #[must_use]
    pub fn sum(&self) -> Option<&str> {
        self.sum.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/**
    Turns the output of a `go mod download -json` invocation into a module.

    Go reports failures both through its exit status and through an
    `Error` field in the JSON output, so both are checked here.
*/
pub(crate) fn parse_download_output(
    coordinate: &str,
    success: bool,
    stdout: &[u8],
    stderr: &[u8],
) -> Result<DownloadedModule, DownloadError> {
    let parsed = serde_json::from_slice::<DownloadedModule>(stdout);

    if !success {
        let message = match parsed {
            Ok(DownloadedModule {
                error: Some(error), ..
            }) => error,
            _ => {
                let stderr = String::from_utf8_lossy(stderr);
                let stdout = String::from_utf8_lossy(stdout);
                let combined = format!("{stdout}\n{stderr}");
                combined.trim().to_string()
            }
        };
        return Err(DownloadError::NotFound {
            coordinate: coordinate.to_string(),
            message,
        });
    }

    let module = parsed.map_err(|source| DownloadError::InvalidOutput {
        coordinate: coordinate.to_string(),
        source,
    })?;

    if let Some(error) = module.error {
        return Err(DownloadError::NotFound {
            coordinate: coordinate.to_string(),
            message: error,
        });
    }

    Ok(module)
}
