mod repl;
mod runner;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Script to execute. Starts the interactive shell when omitted.
    path: Option<PathBuf>,

    /// File the shell loads its history from and saves it to.
    #[arg(long, default_value = ".esla_history")]
    history_file: PathBuf,

    /// Maximum number of history entries kept by the shell.
    #[arg(long, default_value_t = 1000)]
    max_history: usize,

    /// Neither load nor save shell history.
    #[arg(long)]
    no_history: bool,
}

impl Cli {
    fn repl_options(&self) -> repl::Options {
        repl::Options {
            history_file: (!self.no_history).then(|| self.history_file.clone()),
            max_history: self.max_history,
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result = match &cli.path {
        None => repl::start(cli.repl_options()).map_err(|err| format!("Shell error: {}", err)),
        Some(path) => runner::execute_file(path).map_err(|err| format!("Runtime error: {}", err)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
