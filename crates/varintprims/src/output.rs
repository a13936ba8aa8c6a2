use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
pub struct EncodedValue {
    pub input: String,
    pub value: u64,
    pub hex: String,
    pub len: usize,
}

#[derive(Serialize)]
pub struct EncodeOutput {
    pub signed: bool,
    pub values: Vec<EncodedValue>,
    pub stream_hex: String,
    pub stream_len: usize,
    #[serde(skip)]
    pub stream: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct DecodedValue {
    pub offset: usize,
    pub len: usize,
    pub value: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed: Option<i64>,
}

#[derive(Serialize)]
pub struct DecodeOutput {
    pub count: usize,
    pub bytes: usize,
    pub values: Vec<DecodedValue>,
}

#[derive(Serialize)]
pub struct ZigzagOutput {
    pub direction: &'static str,
    pub width: u8,
    pub signed: i64,
    pub unsigned: u64,
}

pub fn print_encode<W: Write>(
    w: &mut W,
    out: &EncodeOutput,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => print_json(w, out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["INPUT", "VALUE", "VARINT", "LEN"]);
            for v in &out.values {
                table.add_row(vec![
                    v.input.clone(),
                    v.value.to_string(),
                    v.hex.clone(),
                    v.len.to_string(),
                ]);
            }
            writeln!(w, "{table}")?;
            writeln!(w, "stream: {} ({} bytes)", out.stream_hex, out.stream_len)
        }
        OutputFormat::Pretty => {
            for v in &out.values {
                writeln!(w, "{} -> {} ({} bytes)", v.input, spaced_hex(&v.hex), v.len)?;
            }
            Ok(())
        }
        OutputFormat::Raw => print_raw(w, &out.stream),
    }
}

pub fn print_decode<W: Write>(
    w: &mut W,
    out: &DecodeOutput,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => print_json(w, out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["#", "OFFSET", "LEN", "VALUE", "SIGNED"]);
            for (index, v) in out.values.iter().enumerate() {
                table.add_row(vec![
                    index.to_string(),
                    v.offset.to_string(),
                    v.len.to_string(),
                    v.value.to_string(),
                    v.signed.map(|s| s.to_string()).unwrap_or_default(),
                ]);
            }
            writeln!(w, "{table}")
        }
        OutputFormat::Pretty => {
            for v in &out.values {
                match v.signed {
                    Some(s) => {
                        writeln!(w, "@{} [{}] {} (zigzag {})", v.offset, v.len, s, v.value)?
                    }
                    None => writeln!(w, "@{} [{}] {}", v.offset, v.len, v.value)?,
                }
            }
            Ok(())
        }
        OutputFormat::Raw => {
            for v in &out.values {
                match v.signed {
                    Some(s) => writeln!(w, "{s}")?,
                    None => writeln!(w, "{}", v.value)?,
                }
            }
            Ok(())
        }
    }
}

pub fn print_zigzag<W: Write>(
    w: &mut W,
    out: &ZigzagOutput,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => print_json(w, out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["WIDTH", "SIGNED", "UNSIGNED"]);
            table.add_row(vec![
                out.width.to_string(),
                out.signed.to_string(),
                out.unsigned.to_string(),
            ]);
            writeln!(w, "{table}")
        }
        OutputFormat::Pretty => {
            if out.direction == "encode" {
                writeln!(w, "zigzag{}({}) = {}", out.width, out.signed, out.unsigned)
            } else {
                writeln!(w, "unzigzag{}({}) = {}", out.width, out.unsigned, out.signed)
            }
        }
        OutputFormat::Raw => {
            if out.direction == "encode" {
                writeln!(w, "{}", out.unsigned)
            } else {
                writeln!(w, "{}", out.signed)
            }
        }
    }
}

pub fn print_raw<W: Write>(w: &mut W, data: &[u8]) -> io::Result<()> {
    w.write_all(data)?;
    w.flush()
}

fn print_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *w, value)?;
    writeln!(w)?;
    w.flush()
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn spaced_hex(hex: &str) -> String {
    hex.as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
