use anyhow::Result;
use clap::Parser;

mod cli_bin;

use cli_bin::args::{is_informational, Cli};

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if is_informational(&err) => err.exit(),
        Err(err) => {
            // usage errors share the configuration-error exit status
            let _ = err.print();
            std::process::exit(1);
        }
    };

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    cli_bin::commands::run(cli)
}
