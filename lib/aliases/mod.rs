mod alias;
mod registry;
mod source;

pub use self::alias::{Alias, AliasLineError, is_valid_short_name};
pub use self::registry::{AliasRegistry, RegistryError};
pub use self::source::{AliasSource, LIST_EXTENSION, NO_NAMESPACE};
