mod app;

use clap::Parser;
use std::process;

use app::cli::Cli;
use app::error::Error;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.quiet, cli.verbose);

    if let Err(e) = app::run(cli) {
        let exit_code = e.downcast_ref::<Error>().map_or(1, Error::exit_code);
        eprintln!("Error: {:#}", e);
        log::debug!("Exiting with code {}", exit_code);
        process::exit(exit_code);
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}
