use std::process::exit;

use clap::Parser;
use tracing::error;

mod cli;
mod util;

use self::cli::Cli;
use self::util::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    // NOTE: Everything owned by the run, including the temporary
    // tool binary, is dropped before we get here and exit.
    let code = match Cli::parse().run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:?}");
            1
        }
    };

    exit(code);
}
