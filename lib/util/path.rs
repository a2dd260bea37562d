use std::path::{Path, PathBuf};

/**
    Cleans up a path reported by the environment or by `go`.

    This will currently:

    - De-UNC a path, removing the `\\?\` prefix
*/
pub fn simplify_path(path: impl AsRef<Path>) -> PathBuf {
    dunce::simplified(path.as_ref()).to_path_buf()
}

/**
    Reads a path from an environment variable, ignoring it if empty.
*/
pub fn path_from_env(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(simplify_path)
}
