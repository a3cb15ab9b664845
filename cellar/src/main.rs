//! Cellar CLI

use cellar::config::RunConfig;
use cellar::error::report_error;
use cellar::interp::Interpreter;
use cellar::repl::Repl;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "cellar", version, about = "Cellar - a language with a bounded cell store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a source file
    Run {
        /// Source file to run
        file: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Start an interactive session
    Repl {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Parse and dump the AST as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Number of cells in the store
    #[arg(long)]
    capacity: Option<usize>,
    /// Maximum depth of nested closure calls
    #[arg(long)]
    max_depth: Option<usize>,
    /// TOML file with run settings (flags take precedence)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl RunArgs {
    fn resolve(&self) -> cellar::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        if let Some(capacity) = self.capacity {
            config = config.store_capacity(capacity);
        }
        if let Some(depth) = self.max_depth {
            config = config.max_recursion_depth(depth);
        }
        config.validate()
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let ok = match cli.command {
        Command::Run { file, run } => run_file(&file, &run),
        Command::Repl { run } => start_repl(&run),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
    };

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

static TRACING_INIT: Once = Once::new();

/// Install a subscriber once, and only when RUST_LOG is set.
/// Log lines go to stderr so program output stays clean.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .with(EnvFilter::from_default_env())
                .try_init();
        }
    });
}

fn read_source(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(err) => {
            eprintln!("Error: cannot read {}: {err}", path.display());
            None
        }
    }
}

fn report(filename: &str, source: &str, err: &cellar::CompileError) {
    if report_error(filename, source, err).is_err() {
        eprintln!("Error: {err}");
    }
}

fn run_file(path: &Path, args: &RunArgs) -> bool {
    let config = match args.resolve() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return false;
        }
    };
    let Some(source) = read_source(path) else {
        return false;
    };
    let filename = path.display().to_string();

    let program = match cellar::translator::parse_program(&source) {
        Ok(program) => program,
        Err(err) => {
            report(&filename, &source, &err);
            return false;
        }
    };

    tracing::debug!(file = %filename, statements = program.stmts.len(), "running program");
    let mut interpreter = Interpreter::with_config(&config);
    match interpreter.execute(&program) {
        Ok(output) => {
            for line in output {
                println!("{line}");
            }
            true
        }
        Err(err) => {
            eprintln!("{err}");
            false
        }
    }
}

fn start_repl(args: &RunArgs) -> bool {
    let config = match args.resolve() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return false;
        }
    };
    match Repl::new(&config).and_then(|mut repl| repl.run()) {
        Ok(()) => true,
        Err(err) => {
            eprintln!("Error: {err}");
            false
        }
    }
}

fn parse_file(path: &Path) -> bool {
    let Some(source) = read_source(path) else {
        return false;
    };
    let filename = path.display().to_string();

    let program = match cellar::translator::parse_program(&source) {
        Ok(program) => program,
        Err(err) => {
            report(&filename, &source, &err);
            return false;
        }
    };
    match serde_json::to_string_pretty(&program) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(err) => {
            eprintln!("Error: {err}");
            false
        }
    }
}

fn tokenize_file(path: &Path) -> bool {
    let Some(source) = read_source(path) else {
        return false;
    };
    let filename = path.display().to_string();

    match cellar::lexer::tokenize(&source) {
        Ok(tokens) => {
            for (token, span) in tokens {
                println!("{span}\t{token}");
            }
            true
        }
        Err(err) => {
            report(&filename, &source, &err);
            false
        }
    }
}
