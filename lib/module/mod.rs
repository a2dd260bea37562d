mod coordinate;
mod path;
mod util;

pub use self::coordinate::{CoordinateParseError, ModuleCoordinate};
pub use self::path::{ModulePath, ModulePathError, check_module_path};
