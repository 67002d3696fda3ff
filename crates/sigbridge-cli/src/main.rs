use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sigbridge_cli::driver;
use sigbridge_cli::logging::{self, LogLevel};
use sigbridge_emit::{Dialect, KnownTypeTable};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Exit status of `emit --strict` when a signature needed a placeholder.
const EXIT_INCOMPLETE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "sigbridge")]
#[command(about = "Print C and C++ forward declarations for Swift-style function signatures")]
struct Cli {
    /// Log verbosity (overrides SIGBRIDGE_LOG / RUST_LOG)
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a declaration for every function in a source file
    Emit {
        /// Path to the declaration source file
        file: PathBuf,

        /// Target dialect
        #[arg(long, value_enum, default_value_t = DialectArg::C)]
        dialect: DialectArg,

        /// Module the file's declarations belong to (default: file stem)
        #[arg(long)]
        module: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = EmitFormat::Text)]
        format: EmitFormat,

        /// Exit with status 2 if any type could not be translated
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Parse a source file and dump the AST
    Parse {
        /// Path to the declaration source file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = ParseFormat::Pretty)]
        format: ParseFormat,
    },

    /// List the effective known-type table
    Types {
        #[arg(long, value_enum, default_value_t = DialectArg::Both)]
        dialect: DialectArg,

        #[command(flatten)]
        table: TableArgs,
    },
}

#[derive(Args, Debug)]
struct TableArgs {
    /// JSON file with additional known types
    #[arg(long = "types", value_name = "FILE")]
    overlay: Option<PathBuf>,

    /// Start from an empty table instead of the standard-library mapping
    #[arg(long)]
    no_builtins: bool,
}

impl TableArgs {
    fn load(&self) -> Result<KnownTypeTable> {
        driver::load_table(self.overlay.as_deref(), !self.no_builtins)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DialectArg {
    C,
    Cxx,
    Both,
}

impl DialectArg {
    fn dialects(self) -> &'static [Dialect] {
        match self {
            DialectArg::C => &[Dialect::C],
            DialectArg::Cxx => &[Dialect::Cxx],
            DialectArg::Both => &Dialect::ALL,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EmitFormat {
    /// One declaration per line
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ParseFormat {
    /// Rust debug dump of the AST
    Pretty,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    match cli.command {
        Commands::Emit {
            file,
            dialect,
            module,
            format,
            strict,
            table,
        } => cmd_emit(&file, dialect, module.as_deref(), format, strict, &table),

        Commands::Parse { file, format } => cmd_parse(&file, format),

        Commands::Types { dialect, table } => {
            print!("{}", driver::render_table(&table.load()?, dialect.dialects()));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_emit(
    file: &std::path::Path,
    dialect: DialectArg,
    module: Option<&str>,
    format: EmitFormat,
    strict: bool,
    table: &TableArgs,
) -> Result<ExitCode> {
    let table = table.load()?;
    let session = driver::load_session(file, module)?;
    let dialects = dialect.dialects();
    let decls = driver::emit_all(&session, &table, dialects);

    match format {
        EmitFormat::Json => println!("{}", serde_json::to_string_pretty(&decls)?),
        EmitFormat::Text => print!("{}", driver::render_text(&decls, dialects)),
    }

    let incomplete = decls.iter().filter(|d| !d.complete).count();
    if strict && incomplete > 0 {
        error!(incomplete, "untranslated types in strict mode");
        return Ok(ExitCode::from(EXIT_INCOMPLETE));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_parse(file: &std::path::Path, format: ParseFormat) -> Result<ExitCode> {
    let module = driver::parse_file(file)?;
    match format {
        ParseFormat::Json => println!("{}", serde_json::to_string_pretty(&module)?),
        ParseFormat::Pretty => println!("{:#?}", module),
    }
    Ok(ExitCode::SUCCESS)
}
