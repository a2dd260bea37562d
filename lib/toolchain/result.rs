use std::{path::PathBuf, process::ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error(
        "go toolchain not found: {0}\
        \nMake sure Go is installed and in your PATH, or set VA_GO to the go binary."
    )]
    GoNotFound(#[from] which::Error),
    #[error("module '{0}' was downloaded but go did not report its directory")]
    MissingModuleDir(String),
    #[error("package directory {0:?} does not exist in the downloaded module")]
    MissingPackageDir(PathBuf),
    #[error("go build failed in {dir:?} ({status})")]
    BuildFailure { dir: PathBuf, status: ExitStatus },
    #[error("go build in {dir:?} was interrupted")]
    BuildInterrupted { dir: PathBuf, code: i32 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ToolchainResult<T> = Result<T, ToolchainError>;
