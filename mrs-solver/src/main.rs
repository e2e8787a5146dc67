use clap::Parser;
use mrs_solver::{config::Cli, solve, Config};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn verbosity_filter(level: u8) -> EnvFilter {
    match level {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(verbosity_filter(cli.verbose))
        .with_target(false)
        .init();

    let config = match Config::try_from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(e.exit_code());
        }
    };

    let code = match solve::run(&config) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    };
    std::process::exit(code);
}
