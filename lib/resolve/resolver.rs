use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use super::{
    ModuleProbe,
    retreat::{PathRetreat, join_path_and_tail},
};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(
        "no module found for '{path}@{version}' or any of its parent paths \
        ({attempts} tried), last error: {source}"
    )]
    ResolutionExhausted {
        path: String,
        version: String,
        attempts: usize,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/**
    Where a module path was found: the root of the module that
    actually exists, and the subpath inside of it that was requested.

    The tail is `None` when the module was found at exactly the
    requested path, and `Some` (possibly empty) when the root is a
    parent of it.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub(crate) root: String,
    pub(crate) tail: Option<String>,
}

impl ResolvedLocation {
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /**
        Returns the subpath inside of the module root, which
        is empty if the module itself was requested.
    */
    #[must_use]
    pub fn tail(&self) -> &str {
        self.tail.as_deref().unwrap_or_default()
    }

    /**
        Returns `true` if the module was found at a parent
        of the requested path, rather than at the path itself.
    */
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.tail.is_some()
    }

    /**
        Joins the root and tail back into the originally requested path.
    */
    #[must_use]
    pub fn join(&self) -> String {
        join_path_and_tail(&self.root, self.tail.as_deref())
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tail.as_deref() {
            Some(tail) if !tail.is_empty() => write!(f, "{tail} (in {})", self.root),
            _ => write!(f, "{}", self.root),
        }
    }
}

/**
    A resolved location, together with what the probe returned for it.
*/
#[derive(Debug, Clone)]
pub struct Resolved<M> {
    pub location: ResolvedLocation,
    pub module: M,
}

/**
    Finds the module that contains the given path.

    The given path may point below the root of a module, for example at a
    command inside of its `cmd` directory. The probe is first asked about
    the full path, and on failure about each parent path in turn, until it
    succeeds or the first path segment has been tried.

    The probe is called at most once per path segment.

    # Errors

    - If the probe failed for every parent path, including the first
      segment on its own. The last probe error is kept as the source.
*/
#[tracing::instrument(skip(probe), level = "debug")]
pub async fn resolve<P: ModuleProbe>(
    probe: &P,
    path: &str,
    version: &str,
) -> Result<Resolved<P::Module>, ResolveError> {
    let mut retreat = PathRetreat::new(path);
    loop {
        debug_assert_eq!(retreat.joined(), path);

        let candidate = retreat.path();
        match probe.probe(&candidate, version).await {
            Ok(module) => {
                let location = ResolvedLocation {
                    root: candidate,
                    tail: retreat.split_tail(),
                };
                debug_assert_eq!(location.join(), path);
                debug!(root = %location.root, tail = %location.tail(), "found module");
                return Ok(Resolved { location, module });
            }
            Err(e) => {
                trace!(path = %candidate, error = %e, "no module at path");
                if !retreat.retreat() {
                    return Err(ResolveError::ResolutionExhausted {
                        path: path.to_string(),
                        version: version.to_string(),
                        attempts: retreat.retreated() + 1,
                        source: Box::new(e),
                    });
                }
            }
        }
    }
}
