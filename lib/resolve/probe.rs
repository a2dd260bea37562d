use std::future::Future;

/**
    Checks whether a module exists at an exact path and version.

    Implementors usually ask a module proxy or the local toolchain,
    and return whatever they learned about the module on success.
    Any error is treated as "no module here", and the resolver will
    retry with a parent path.
*/
pub trait ModuleProbe {
    type Module;
    type Error: std::error::Error + Send + Sync + 'static;

    fn probe(
        &self,
        path: &str,
        version: &str,
    ) -> impl Future<Output = Result<Self::Module, Self::Error>>;
}
