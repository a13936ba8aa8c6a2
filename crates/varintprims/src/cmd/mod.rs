use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;
pub mod zigzag;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode integers as varints.
    Encode(EncodeArgs),
    /// Decode a varint stream into integers.
    Decode(DecodeArgs),
    /// Apply the ZigZag transform to one integer.
    Zigzag(ZigzagArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Zigzag(args) => zigzag::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Decimal values to encode.
    #[arg(allow_negative_numbers = true, conflicts_with = "file")]
    pub values: Vec<String>,
    /// ZigZag-map signed values before encoding (sint64).
    #[arg(long)]
    pub signed: bool,
    /// Read 8-byte big-endian integers from a file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex-encoded varint stream (whitespace, commas and 0x prefixes allowed).
    #[arg(conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read the binary stream from a file. Default: stdin.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Undo the ZigZag mapping on every value.
    #[arg(long)]
    pub signed: bool,
    /// Fail if the stream holds more than N values.
    #[arg(long, value_name = "N")]
    pub max_values: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ZigzagArgs {
    /// Value to transform.
    #[arg(allow_negative_numbers = true)]
    pub value: String,
    /// Integer width in bits.
    #[arg(long, value_enum, default_value = "64")]
    pub width: ZigzagWidth,
    /// Map an unsigned value back to its signed form.
    #[arg(long)]
    pub decode: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ZigzagWidth {
    #[value(name = "32")]
    W32,
    #[value(name = "64")]
    W64,
}

impl ZigzagWidth {
    pub fn bits(self) -> u8 {
        match self {
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
