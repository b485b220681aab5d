//! Optgen command-line driver.
//!
//! Usage: `optgen <compile|check|fmt|tokens> <FILE>...`

use clap::{Args, Parser, Subcommand, ValueEnum};
use optgen_lang::{compile_files, format, to_source, CompileConfig, Diagnostics, Lexer, Root};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "optgen")]
#[command(version, about = "Compile optgen rewrite-rule definition files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile sources and print the canonical tree
    Compile {
        /// Source files, compiled as one unit in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compile sources and report diagnostics only
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Diagnostics to print before the summary line
        #[arg(long = "max-errors")]
        max_errors: Option<usize>,
    },

    /// Compile sources and print them back as source text
    Fmt {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Dump the token stream of a file
    Tokens { file: PathBuf },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Include `Src=<file:line:col>` positions
    #[arg(long)]
    positions: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Diagnostics to print before the summary line
    #[arg(long = "max-errors")]
    max_errors: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Rendered diagnostics, printed to stdout.
    #[error("{0}")]
    Compile(String),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Compile(_) => 1,
            CliError::Read { .. } | CliError::Json(_) => 2,
        }
    }
}

/// Install a stderr subscriber. `RUST_LOG` overrides the default `warn`
/// filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let config = CompileConfig::from_env();

    match run(cli.command, config) {
        Ok(output) => print!("{}", output),
        Err(err @ CliError::Compile(_)) => {
            print!("{}", err);
            process::exit(err.exit_code());
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(err.exit_code());
        }
    }
}

fn run(command: Commands, mut config: CompileConfig) -> Result<String, CliError> {
    match command {
        Commands::Compile { files, output } => {
            config.positions |= output.positions;
            if let Some(max) = output.max_errors {
                config.max_errors = max;
            }

            let sources = read_sources(&files)?;
            match (compile_sources(&sources), output.format) {
                (Ok(root), OutputFormat::Text) => {
                    Ok(format!("{}\n", format(&root, &config.format_options())))
                }
                (Ok(root), OutputFormat::Json) => json_line(&root),
                (Err(diagnostics), OutputFormat::Text) => {
                    Err(CliError::Compile(diagnostics.render(config.max_errors)))
                }
                (Err(diagnostics), OutputFormat::Json) => {
                    Err(CliError::Compile(json_line(&diagnostics)?))
                }
            }
        }

        Commands::Check { files, max_errors } => {
            let max = max_errors.unwrap_or(config.max_errors);
            let sources = read_sources(&files)?;
            let root = compile_sources(&sources)
                .map_err(|diagnostics| CliError::Compile(diagnostics.render(max)))?;
            debug!(
                defines = root.defines.0.len(),
                rules = root.rules.0.len(),
                "check passed"
            );
            Ok(String::new())
        }

        Commands::Fmt { files } => {
            let sources = read_sources(&files)?;
            let root = compile_sources(&sources)
                .map_err(|diagnostics| CliError::Compile(diagnostics.render(config.max_errors)))?;
            Ok(to_source(&root))
        }

        Commands::Tokens { file } => {
            let source = read_source(&file)?;
            let mut output = String::new();
            for token in Lexer::new(&source) {
                output.push_str(&format!(
                    "{}:{} {:?}\n",
                    token.span.line, token.span.column, token.kind
                ));
            }
            Ok(output)
        }
    }
}

/// Read every path, keyed by the path as given on the command line.
fn read_sources(paths: &[PathBuf]) -> Result<Vec<(String, String)>, CliError> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        sources.push((path.display().to_string(), read_source(path)?));
    }
    Ok(sources)
}

fn compile_sources(sources: &[(String, String)]) -> Result<Root, Diagnostics> {
    compile_files(sources.iter().map(|(name, text)| (name.as_str(), text.as_str())))
}

fn read_source(path: &Path) -> Result<String, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read source");
    Ok(text)
}

fn json_line<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}
