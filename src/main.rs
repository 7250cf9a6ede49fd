mod cli;
mod config;

use clap::Parser;
use log::debug;

use crate::cli::Cli;
use crate::config::Config;

fn init_logging(debug: bool) {
    let default_filter = env_logger::Env::default().default_filter_or(if debug { "debug" } else { "warn" });
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_millis()
        .init();
}

fn main() {
    let cli = Cli::parse();
    let cfg = Config::resolve(cli.token.clone(), cli.debug);
    init_logging(cfg.debug);

    debug!(
        "remo {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );
    if let Err(e) = cli::dispatch(cli.command, &cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
