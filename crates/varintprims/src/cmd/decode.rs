use std::fs::File;
use std::io::Read;

use varintprims_codec::{iter, zigzag_decode_64, StreamConfig, VarintError, VarintReader};

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, varint_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_decode, DecodeOutput, DecodedValue, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = StreamConfig {
        max_values: args.max_values,
    };

    let decoded = if let Some(hex) = &args.hex {
        let bytes = parse_hex(hex)?;
        decode_bytes(&bytes, &config, args.signed)
    } else if let Some(path) = &args.file {
        let file = File::open(path)
            .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
        decode_stream(file, config, args.signed)
    } else {
        decode_stream(std::io::stdin().lock(), config, args.signed)
    };
    let values = decoded.map_err(|err| varint_error("decode failed", err))?;

    let out = DecodeOutput {
        count: values.len(),
        bytes: values.last().map(|v| v.offset + v.len).unwrap_or(0),
        values,
    };
    tracing::debug!(values = out.count, bytes = out.bytes, "decoded varint stream");

    print_decode(&mut std::io::stdout().lock(), &out, format)
        .map_err(|err| io_error("failed writing output", err))?;
    Ok(SUCCESS)
}

/// Parse a hex string, ignoring whitespace, commas and `0x` prefixes.
fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|token| {
            token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token)
        })
        .collect();

    hex::decode(&digits).map_err(|err| CliError::new(USAGE, format!("invalid hex input: {err}")))
}

fn decode_bytes(
    bytes: &[u8],
    config: &StreamConfig,
    signed: bool,
) -> Result<Vec<DecodedValue>, VarintError> {
    let mut values = Vec::new();
    let mut it = iter(bytes);
    loop {
        let offset = it.offset();
        let Some(value) = it.next() else {
            break;
        };
        let value = match value {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(valid_prefix = values.len(), "discarding decoded prefix");
                return Err(err);
            }
        };
        values.push(to_output(offset, it.offset() - offset, value, signed));
        config.check_count(values.len())?;
    }
    Ok(values)
}

fn decode_stream<R: Read>(
    source: R,
    config: StreamConfig,
    signed: bool,
) -> Result<Vec<DecodedValue>, VarintError> {
    let mut reader = VarintReader::with_config(source, config);
    let mut values = Vec::new();
    loop {
        let offset = reader.bytes_consumed();
        let Some(value) = reader.read_value()? else {
            break;
        };
        values.push(to_output(offset, reader.bytes_consumed() - offset, value, signed));
    }
    Ok(values)
}

fn to_output(offset: usize, len: usize, value: u64, signed: bool) -> DecodedValue {
    DecodedValue {
        offset,
        len,
        value,
        signed: signed.then(|| zigzag_decode_64(value)),
    }
}
