//! CLI entrypoint for remake-debug.

#[path = "remake-debug/cli.rs"]
mod cli;
#[path = "remake-debug/run.rs"]
mod run;
#[path = "remake-debug/style.rs"]
mod style;

use clap::Parser;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let code = match run::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", style::error(format!("Error: {err:#}")));
            run::BUILD_FAILED
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
