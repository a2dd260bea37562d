mod probe;
mod resolver;
mod retreat;

pub use self::probe::ModuleProbe;
pub use self::resolver::{ResolveError, Resolved, ResolvedLocation, resolve};
pub use self::retreat::PathRetreat;
