/// Sage command-line tool: look inside game asset files with the byte-stream
/// decoder.
///
/// # Command overview
///
/// ```text
/// sage <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Decode and print the leading header of an asset file
///   read       Run a sequence of primitive reads at an offset
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log decoder diagnostics to stderr
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                     |
/// |------|---------------------------------------------|
/// | 0    | Success                                     |
/// | 1    | Error (I/O failure, malformed input, etc.)  |
///
/// Errors and logs go to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod cmd_inspect;
mod cmd_read;

use cmd_read::ReadOp;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Decode headers and primitive values from game asset files.
#[derive(Parser)]
#[command(name = "sage", version, about = "Game asset decoder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder diagnostics (debug level) to stderr. `RUST_LOG` overrides.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode and print the leading header of an asset file.
    Inspect(InspectArgs),
    /// Run a sequence of primitive reads and print each value.
    Read(ReadArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `sage inspect`.
///
/// The file kind comes from the extension; the header layout follows from
/// the kind. Kinds without a binary header are reported as such.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the asset file.
    pub file: PathBuf,

    /// Also print a hex dump of the first bytes of the file.
    #[arg(long)]
    pub show_hex: bool,
}

/// Arguments for `sage read`.
///
/// Each operation reads at the position the previous one left off:
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────┐
/// │ Operation     │ Reads                                        │
/// ├───────────────┼──────────────────────────────────────────────┤
/// │ u8 i8 bool    │ 1 byte                                       │
/// │ u16 i16 u16be │ 2 bytes                                      │
/// │ u24           │ 3 bytes, little-endian                       │
/// │ u32 i32 f32   │ 4 bytes, little-endian                       │
/// │ u32be         │ 4 bytes, big-endian                          │
/// │ u64           │ 8 bytes, little-endian                       │
/// │ cstr          │ null-terminated string                       │
/// │ ascii / wide  │ u16-prefixed ASCII / UTF-16LE string         │
/// │ fixed:N       │ N characters, trailing NULs stripped         │
/// │ u16grid:WxH   │ W×H little-endian u16 values, row-major      │
/// │ bitgrid:WxH   │ W×H bits, LSB first, rows byte-aligned       │
/// │ skip:N        │ N bytes, not decoded                         │
/// └───────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct ReadArgs {
    /// Path to the file to read.
    pub file: PathBuf,

    /// Operations to run, in order.
    #[arg(required = true, value_parser = clap::value_parser!(ReadOp))]
    pub ops: Vec<ReadOp>,

    /// Starting offset, decimal or `0x`-prefixed hex.
    #[arg(long, default_value = "0", value_parser = parse_offset)]
    pub at: usize,

    /// Character encoding for `cstr` and `fixed:N`.
    #[arg(long, value_enum, default_value_t = Encoding::SingleByte)]
    pub encoding: Encoding,

    /// Print results as a JSON array instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Encoding {
    SingleByte,
    Utf8,
}

fn parse_offset(s: &str) -> Result<usize, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid offset {s:?}: {e}"))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Read(args) => cmd_read::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
