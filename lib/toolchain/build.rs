use std::{
    env::consts::EXE_SUFFIX,
    path::{Path, PathBuf},
};

use tempfile::TempPath;
use tokio::fs::metadata;
use tracing::{debug, warn};

use super::result::{ToolchainError, ToolchainResult};

const FALLBACK_TOOL_NAME: &str = "tool";

/**
    A freshly built tool binary in a temporary location.

    The binary is deleted when this is dropped, or when
    [`BuiltTool::remove`] is called, whichever comes first.
*/
#[derive(Debug)]
pub struct BuiltTool {
    path: TempPath,
}

impl BuiltTool {
    #[must_use]
    pub fn from_temp_path(path: TempPath) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /**
        Deletes the built binary right away.

        # Errors

        - If the binary could not be deleted.
    */
    pub fn remove(self) -> std::io::Result<()> {
        let path = self.path.to_path_buf();
        self.path.close().inspect_err(|e| {
            warn!("Failed to remove built tool at {path:?}:\n{e}");
        })
    }
}

/**
    Reserves a temporary file to build a tool into, named after
    the package directory and with the platform executable suffix.

    The file itself is created and closed right away, so that the
    build may replace it, and is deleted when the path is dropped.
*/
pub(crate) fn reserve_output_path(package_dir: &Path) -> ToolchainResult<TempPath> {
    let tool_name = package_dir
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(FALLBACK_TOOL_NAME);

    let file = tempfile::Builder::new()
        .prefix(&format!("{tool_name}-"))
        .suffix(EXE_SUFFIX)
        .tempfile()?;

    let path = file.into_temp_path();
    debug!(?path, "reserved build output");
    Ok(path)
}

/**
    Joins the tail of a resolved location onto the directory of a
    downloaded module, giving the directory of the package to build.
*/
pub(crate) async fn package_dir(module_dir: &Path, tail: &str) -> ToolchainResult<PathBuf> {
    let dir = tail
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(module_dir.to_path_buf(), |dir, segment| dir.join(segment));

    if metadata(&dir).await.is_ok_and(|m| m.is_dir()) {
        Ok(dir)
    } else {
        Err(ToolchainError::MissingPackageDir(dir))
    }
}
