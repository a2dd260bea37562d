pub(crate) mod util;

pub mod aliases;
pub mod launch;
pub mod module;
pub mod result;
pub mod resolve;
pub mod settings;
pub mod system;
pub mod toolchain;
