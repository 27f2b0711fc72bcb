#![forbid(unsafe_code)]

use clap::Parser;
use lt_server::config::{Cli, Command};
use lt_server::{import, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format());
    let store = cli.store_location();

    match cli.command {
        Some(Command::Import(args)) => {
            import::run_import(store, &args.file)?;
            Ok(())
        }
        None => lt_server::serve(cli.serve.into_config(store), lt_server::shutdown_signal()).await,
    }
}
