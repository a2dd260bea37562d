use std::ffi::OsString;

use anyhow::{Context, Result};
use clap::Parser;

use va::{aliases::AliasRegistry, launch::launch, settings::Settings, toolchain::GoToolchain};

mod usage;

use self::usage::print_missing_module;

/// Downloads, builds and runs a Go tool by its short alias or module path.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// The tool to run, `short[@version]` or `path@version`,
    /// followed by any arguments to pass through to it.
    #[clap(
        value_name = "MODULE [ARGS]",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

impl Cli {
    /**
        Runs the requested tool and returns the exit code to exit with.
    */
    pub async fn run(self) -> Result<i32> {
        let settings = Settings::load_from_env();

        let sources = settings
            .alias_sources()
            .await
            .context("Failed to read alias lists!")?;
        let registry = AliasRegistry::load(&sources).context("Failed to load alias lists!")?;

        let Some((module, args)) = self.command.split_first() else {
            print_missing_module(&registry);
            return Ok(1);
        };

        let token = module
            .to_str()
            .with_context(|| format!("Module {module:?} is not valid UTF-8"))?;
        let coordinate = registry.resolve_token(token)?;

        let toolchain = GoToolchain::locate(&settings)?;
        let code = launch(&toolchain, &coordinate, args)
            .await
            .with_context(|| format!("Failed to run {coordinate}"))?;

        Ok(code)
    }
}
