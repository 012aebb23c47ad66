//! `benspan` command-line entry point.
//!
//! Decodes one Bencode value and prints its JSON projection (or, with
//! `--raw`, the raw spans of the root and its children).
//! Exit codes: 0 on success, 1 on a decode or projection error, 2 on a usage
//! or I/O error.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use benspan::{
    decode_with_options, encode_str, to_json_string_pretty, DecodeOptions, Trailing, Utf8Policy,
    Value, ValueKind, DEFAULT_MAX_DEPTH,
};
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "benspan", version, about = "Decode Bencode and show it as JSON or raw spans")]
struct Cli {
    /// Bencode text to decode; `-` or nothing reads stdin
    #[arg(value_name = "INPUT", conflicts_with = "file")]
    input: Option<String>,

    /// Read raw bytes from a file
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Replace invalid UTF-8 with U+FFFD instead of failing
    #[arg(long)]
    lossy: bool,

    /// Ignore bytes after the first complete value
    #[arg(long)]
    allow_trailing: bool,

    /// Maximum list/map nesting depth
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print raw spans instead of JSON
    #[arg(long)]
    raw: bool,

    /// Print the Bencode string form of STRING and exit
    #[arg(long, value_name = "STRING", conflicts_with_all = ["input", "file"])]
    encode: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Decode(#[from] benspan::Error),

    #[error("failed to read {what}: {source}")]
    Read { what: String, source: io::Error },

    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Decode(_) => 1,
            CliError::Read { .. } | CliError::Write(_) => 2,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = if verbose {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(content) = &cli.encode {
        out.write_all(&encode_str(content)).map_err(CliError::Write)?;
        return writeln!(out).map_err(CliError::Write);
    }

    let input = read_input(cli)?;
    let options = DecodeOptions::new()
        .with_max_depth(cli.max_depth)
        .with_trailing(if cli.allow_trailing {
            Trailing::Allow
        } else {
            Trailing::Reject
        });
    let value = decode_with_options(&input, options)?;
    tracing::debug!(bytes = input.len(), kind = value.type_name(), "decoded input");

    if cli.raw {
        write_spans(&mut out, &value, &input).map_err(CliError::Write)
    } else {
        let policy = if cli.lossy {
            Utf8Policy::Lossy
        } else {
            Utf8Policy::Strict
        };
        let json = to_json_string_pretty(&value, policy)?;
        writeln!(out, "{}", json).map_err(CliError::Write)
    }
}

fn read_input(cli: &Cli) -> Result<Vec<u8>, CliError> {
    if let Some(path) = &cli.file {
        return fs::read(path).map_err(|source| CliError::Read {
            what: path.display().to_string(),
            source,
        });
    }
    match cli.input.as_deref() {
        Some(text) if text != "-" => Ok(text.as_bytes().to_vec()),
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|source| CliError::Read {
                    what: "stdin".to_string(),
                    source,
                })?;
            Ok(buf)
        }
    }
}

fn write_spans(out: &mut impl Write, value: &Value, input: &[u8]) -> io::Result<()> {
    write_span(out, "root", value, input)?;
    match value.kind() {
        ValueKind::List(items) => {
            for (index, item) in items.iter().enumerate() {
                write_span(out, &format!("  [{}]", index), item, input)?;
            }
        }
        ValueKind::Map(map) => {
            for (key, item) in map {
                write_span(out, &format!("  {}", String::from_utf8_lossy(key)), item, input)?;
            }
        }
        ValueKind::Str(_) | ValueKind::Int(_) => {}
    }
    Ok(())
}

fn write_span(out: &mut impl Write, label: &str, value: &Value, input: &[u8]) -> io::Result<()> {
    let raw = value.raw(input).unwrap_or_default();
    writeln!(
        out,
        "{} {} {} {}",
        label,
        value.type_name(),
        value.span(),
        String::from_utf8_lossy(raw)
    )
}
