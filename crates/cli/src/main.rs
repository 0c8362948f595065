mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use commands::{cmd_check, cmd_generate, cmd_parse};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Thrift-style IDL parser and code generator.
#[derive(Parser)]
#[command(
    name = "idlc",
    version,
    about = "Thrift-style IDL parser and code generator"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an IDL file and print its documents as JSON
    Parse {
        /// Path to the IDL source file, or `-` for stdin (includes are not followed)
        file: PathBuf,
        /// Additional directory searched for includes (repeatable)
        #[arg(short = 'I', long = "include-dir")]
        include_dirs: Vec<PathBuf>,
    },

    /// Parse an IDL file and its includes and report what they define
    Check {
        /// Path to the IDL source file
        file: PathBuf,
        /// Additional directory searched for includes (repeatable)
        #[arg(short = 'I', long = "include-dir")]
        include_dirs: Vec<PathBuf>,
    },

    /// Generate target-language source from an IDL file
    Generate {
        #[command(subcommand)]
        command: GenerateCommands,
    },
}

#[derive(Subcommand)]
pub(crate) enum GenerateCommands {
    /// Generate Rust modules, one per parsed file
    Rust {
        /// Path to the IDL source file
        file: PathBuf,
        /// Output directory
        #[arg(long, default_value = "./generated")]
        out: PathBuf,
        /// TOML file with a [generate] table
        #[arg(long)]
        config: Option<PathBuf>,
        /// Wrap optional fields in Option<T>
        #[arg(long)]
        nullable_optional: bool,
        /// Map `byte` to i8 instead of u8
        #[arg(long)]
        signed_bytes: bool,
        /// Additional directory searched for includes (repeatable)
        #[arg(short = 'I', long = "include-dir")]
        include_dirs: Vec<PathBuf>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file, include_dirs } => {
            cmd_parse(&file, include_dirs, cli.output, cli.quiet);
        }
        Commands::Check { file, include_dirs } => {
            cmd_check(&file, include_dirs, cli.output, cli.quiet);
        }
        Commands::Generate { command } => {
            cmd_generate(command, cli.output, cli.quiet);
        }
    }
}

/// Install a stderr subscriber when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Print a parse error: its JSON form with `--output json`, its message otherwise.
pub(crate) fn report_parse_error(e: &idlc_core::ParseError, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", e);
            }
        }
    }
}
