use std::ffi::OsStr;

use tracing::debug;

use crate::{
    module::ModuleCoordinate,
    resolve::resolve,
    result::{VaError, VaResult},
    system::run_interruptible,
    toolchain::{Toolchain, ToolchainError},
};

/**
    Downloads, builds, and runs the tool at the given module coordinate.

    The coordinate may point at a package inside of a module, in which case
    the module is found first and the package is built from inside of it.
    The built binary is run with the given arguments and removed afterwards,
    whether or not it could be started.

    Returns the exit code of the tool. A tool exiting with a non-zero
    code is not an error, the code is simply returned to the caller.
    The same goes for being interrupted by a signal, while building or
    while running, which gives `128` plus the signal number.

    # Errors

    - If no module could be found for the coordinate or any parent path.
    - If the package could not be found inside the module, or failed to build.
    - If the built binary could not be started.
*/
pub async fn launch<T, A, S>(
    toolchain: &T,
    coordinate: &ModuleCoordinate,
    args: A,
) -> VaResult<i32>
where
    T: Toolchain,
    A: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let resolved = resolve(toolchain, coordinate.path().as_str(), coordinate.version()).await?;
    debug!(%coordinate, location = %resolved.location, "resolved module");

    let package_dir = toolchain
        .package_dir(&resolved.module, resolved.location.tail())
        .await?;
    let tool = match toolchain.build(&package_dir).await {
        Ok(tool) => tool,
        Err(ToolchainError::BuildInterrupted { dir, code }) => {
            debug!(?dir, code, "build interrupted");
            return Ok(code);
        }
        Err(e) => return Err(e.into()),
    };

    let path = tool.path().to_path_buf();
    let result = run_interruptible(&path, args).await;

    // Failing to clean up is logged, but should not hide the tool's result
    tool.remove().ok();

    result.map_err(|source| VaError::ExecutionFailure { path, source })
}
