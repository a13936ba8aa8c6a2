use std::fs;

use varintprims_codec::{encode_to, zigzag_encode_64};

use crate::cmd::EncodeArgs;
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_encode, EncodeOutput, EncodedValue, OutputFormat};

/// Size of one record in a `.uint64` input file.
const RECORD_SIZE: usize = 8;

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let inputs = resolve_inputs(&args)?;
    if inputs.is_empty() {
        return Err(CliError::new(USAGE, "nothing to encode"));
    }

    let out = encode_inputs(&inputs, args.signed)?;
    tracing::debug!(
        values = out.values.len(),
        bytes = out.stream_len,
        "encoded varint stream"
    );

    print_encode(&mut std::io::stdout().lock(), &out, format)
        .map_err(|err| io_error("failed writing output", err))?;
    Ok(SUCCESS)
}

fn resolve_inputs(args: &EncodeArgs) -> CliResult<Vec<String>> {
    let Some(path) = &args.file else {
        return Ok(args.values.clone());
    };

    let data = fs::read(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    let records = parse_records(&data, args.signed)?;
    tracing::debug!(path = %path.display(), records = records.len(), "read integer records");
    Ok(records)
}

/// Split a file of 8-byte big-endian integers into decimal strings.
fn parse_records(data: &[u8], signed: bool) -> CliResult<Vec<String>> {
    if data.len() % RECORD_SIZE != 0 {
        return Err(CliError::new(
            DATA_INVALID,
            format!(
                "input length {} is not a multiple of {RECORD_SIZE} bytes",
                data.len()
            ),
        ));
    }

    Ok(data
        .chunks_exact(RECORD_SIZE)
        .map(|chunk| {
            let mut record = [0u8; RECORD_SIZE];
            record.copy_from_slice(chunk);
            if signed {
                i64::from_be_bytes(record).to_string()
            } else {
                u64::from_be_bytes(record).to_string()
            }
        })
        .collect())
}

fn encode_inputs(inputs: &[String], signed: bool) -> CliResult<EncodeOutput> {
    let mut stream: Vec<u8> = Vec::new();
    let mut values = Vec::with_capacity(inputs.len());

    for input in inputs {
        let value = parse_value(input, signed)?;
        let start = stream.len();
        let len = encode_to(value, &mut stream);
        values.push(EncodedValue {
            input: input.clone(),
            value,
            hex: hex::encode(&stream[start..]),
            len,
        });
    }

    Ok(EncodeOutput {
        signed,
        values,
        stream_hex: hex::encode(&stream),
        stream_len: stream.len(),
        stream,
    })
}

fn parse_value(input: &str, signed: bool) -> CliResult<u64> {
    let input = input.trim();
    if signed {
        input
            .parse::<i64>()
            .map(zigzag_encode_64)
            .map_err(|_| {
                CliError::new(USAGE, format!("invalid signed 64-bit value: {input}"))
            })
    } else {
        input
            .parse::<u64>()
            .map_err(|_| {
                CliError::new(USAGE, format!("invalid unsigned 64-bit value: {input}"))
            })
    }
}
