//! fwver - read driver versions from EFI firmware modules
//!
//! Usage:
//!   fwver scan <FILE>                   Identify the driver family and version
//!   fwver scan --list                   List supported driver families
//!   fwver extract <PREFIX> <PATTERN> <OFFSET> <END_MARKER> <MAX_LENGTH> <FILE>
//!   fwver count <PATTERN> <FILE>        Count occurrences of a hex pattern

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use fwver::config::{LogFormat, OutputFormat, ScanConfig};
use fwver::io::error::IoError;
use fwver::io::Image;
use fwver::search::parse_hex_pattern;
use fwver::{logging, Catalog, DecodeError, ExitStatus, FwverError, TextRule, VersionRecord};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(name = "fwver", version)]
#[command(about = "Reads driver versions from EFI firmware modules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit diagnostics on stderr as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Refuse input files larger than this many bytes
    #[arg(long, global = true, value_name = "BYTES")]
    max_file_size: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the driver family and version of an EFI module
    Scan {
        /// Path to the driver file
        #[arg(required_unless_present = "list")]
        file: Option<PathBuf>,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,

        /// List supported driver families and exit
        #[arg(long, conflicts_with = "file")]
        list: bool,
    },
    /// Print the text found at a fixed offset from a hex pattern
    Extract {
        /// Printed before the extracted text
        prefix: String,
        /// Pattern to find, hex digit pairs
        pattern: String,
        /// Signed offset of the text from the match
        #[arg(allow_negative_numbers = true)]
        offset: isize,
        /// Byte that ends the text, two hex digits
        end_marker: String,
        /// Maximum length of the printed text
        #[arg(allow_negative_numbers = true)]
        max_length: i64,
        /// Path to the input file
        file: PathBuf,
    },
    /// Count occurrences of a hex pattern, overlapping ones included
    Count {
        /// Pattern to find, hex digit pairs
        pattern: String,
        /// Path to the input file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitStatus::InvalidArgument.into(),
            };
        }
    };

    let config = ScanConfig {
        log: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        ..ScanConfig::default()
    }
    .with_max_file_size(cli.max_file_size);
    logging::init(config.log);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(cli.command, &config, &mut out) {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &ScanConfig, out: &mut impl Write) -> Result<ExitStatus> {
    match command {
        Commands::Scan { list: true, .. } => {
            for label in Catalog::builtin().labels() {
                writeln!(out, "{label}").context("writing to stdout")?;
            }
            Ok(ExitStatus::Success)
        }
        Commands::Scan { file, json, .. } => {
            let Some(file) = file else {
                return Ok(ExitStatus::InvalidArgument);
            };
            let format = if json {
                OutputFormat::Json
            } else {
                config.output
            };
            let result =
                load(&file, config).and_then(|image| fwver::scan(&image, Catalog::builtin()));
            match result {
                Ok(Some(record)) => {
                    write_record(out, &record, format)?;
                    Ok(ExitStatus::Success)
                }
                Ok(None) => report(out, &FwverError::NotFound),
                Err(err) => report(out, &err),
            }
        }
        Commands::Extract {
            prefix,
            pattern,
            offset,
            end_marker,
            max_length,
            file,
        } => {
            let result = load(&file, config).and_then(|image| {
                let rule = TextRule {
                    prefix,
                    pattern: parse_hex_pattern(&pattern)?,
                    offset,
                    end_marker: single_byte(&end_marker)?,
                    max_length: usize::try_from(max_length.unsigned_abs()).unwrap_or(usize::MAX),
                };
                rule.extract(&image)
            });
            match result {
                Ok(Some(record)) => {
                    writeln!(out, "{}{}", record.label, record.version)
                        .context("writing to stdout")?;
                    Ok(ExitStatus::Success)
                }
                Ok(None) => report(out, &FwverError::NotFound),
                Err(err) => match report(out, &err)? {
                    ExitStatus::UnknownVersion => Ok(ExitStatus::NotFound),
                    status => Ok(status),
                },
            }
        }
        Commands::Count { pattern, file } => {
            let result = parse_hex_pattern(&pattern)
                .map_err(FwverError::from)
                .and_then(|pattern| {
                    load(&file, config).map(|image| fwver::count(&image, &pattern))
                });
            match result {
                Ok(0) => report(out, &FwverError::NotFound),
                Ok(n) => {
                    writeln!(out, "{n}").context("writing to stdout")?;
                    Ok(ExitStatus::Success)
                }
                Err(err) => report(out, &err),
            }
        }
    }
}

fn load(path: &Path, config: &ScanConfig) -> fwver::Result<Image> {
    Ok(Image::open(path, &config.io)?)
}

fn single_byte(text: &str) -> fwver::Result<u8> {
    match parse_hex_pattern(text)?.as_slice() {
        [byte] => Ok(*byte),
        _ => Err(FwverError::InvalidArgument(
            "end marker must be exactly two hex digits".to_string(),
        )),
    }
}

fn write_record(out: &mut impl Write, record: &VersionRecord, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Line => writeln!(out, "{record}"),
        OutputFormat::Json => {
            let json = serde_json::to_string(record).context("serializing record")?;
            writeln!(out, "{json}")
        }
    }
    .context("writing to stdout")
}

/// Print the user-facing diagnostic for `err` and return its exit status.
fn report(out: &mut impl Write, err: &FwverError) -> Result<ExitStatus> {
    debug!(error = %err, "command failed");
    let message = match err {
        FwverError::Io(IoError::Open { .. }) => Some("File can't be opened.".to_string()),
        FwverError::Io(IoError::Read { .. } | IoError::ShortRead { .. }) => {
            Some("Can't read file.".to_string())
        }
        FwverError::Io(_) => Some("Can't allocate memory for file contents.".to_string()),
        FwverError::Pattern(_) => Some("Pattern can't be parsed as hex.".to_string()),
        FwverError::InvalidArgument(msg) => Some(msg.clone()),
        FwverError::Decode {
            source: DecodeError::UnsupportedVariant { notice },
            ..
        } => Some(format!("     {notice}")),
        FwverError::Decode { .. } | FwverError::NotFound => None,
    };
    if let Some(message) = message {
        writeln!(out, "{message}").context("writing to stdout")?;
    }
    Ok(err.exit_status())
}
