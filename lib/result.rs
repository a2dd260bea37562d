use std::path::PathBuf;

use thiserror::Error;

use crate::{
    aliases::RegistryError, module::CoordinateParseError, resolve::ResolveError,
    toolchain::ToolchainError,
};

#[derive(Debug, Error)]
pub enum VaError {
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordinateParseError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
    #[error("failed to run {path:?}: {source}")]
    ExecutionFailure {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type VaResult<T> = Result<T, VaError>;
