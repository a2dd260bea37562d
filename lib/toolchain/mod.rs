use std::{
    future::Future,
    path::{Path, PathBuf},
};

use crate::resolve::ModuleProbe;

mod build;
mod download;
mod go;
mod result;

pub use self::build::BuiltTool;
#[cfg(test)]
pub(crate) use self::build::{package_dir, reserve_output_path};
pub use self::download::{DownloadError, DownloadedModule};
pub use self::go::GoToolchain;
pub use self::result::{ToolchainError, ToolchainResult};

/**
    Everything needed to turn a module path into a runnable tool:
    finding modules, locating packages inside of them, and building.
*/
pub trait Toolchain: ModuleProbe {
    /**
        Returns the directory of the package at `tail` inside the found module.
    */
    fn package_dir(
        &self,
        module: &Self::Module,
        tail: &str,
    ) -> impl Future<Output = ToolchainResult<PathBuf>>;

    /**
        Builds the package in the given directory into a temporary binary.
    */
    fn build(&self, package_dir: &Path) -> impl Future<Output = ToolchainResult<BuiltTool>>;
}
