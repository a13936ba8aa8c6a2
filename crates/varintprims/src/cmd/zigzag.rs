use varintprims_codec::{zigzag_decode_32, zigzag_decode_64, zigzag_encode_32, zigzag_encode_64};

use crate::cmd::{ZigzagArgs, ZigzagWidth};
use crate::exit::{io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_zigzag, OutputFormat, ZigzagOutput};

pub fn run(args: ZigzagArgs, format: OutputFormat) -> CliResult<i32> {
    let out = if args.decode {
        unzigzag(args.value.trim(), args.width)?
    } else {
        zigzag(args.value.trim(), args.width)?
    };

    print_zigzag(&mut std::io::stdout().lock(), &out, format)
        .map_err(|err| io_error("failed writing output", err))?;
    Ok(SUCCESS)
}

fn zigzag(input: &str, width: ZigzagWidth) -> CliResult<ZigzagOutput> {
    let bits = width.bits();
    let invalid = || CliError::new(USAGE, format!("invalid signed {bits}-bit value: {input}"));
    let (signed, unsigned) = match width {
        ZigzagWidth::W32 => {
            let n: i32 = input.parse().map_err(|_| invalid())?;
            (i64::from(n), u64::from(zigzag_encode_32(n)))
        }
        ZigzagWidth::W64 => {
            let n: i64 = input.parse().map_err(|_| invalid())?;
            (n, zigzag_encode_64(n))
        }
    };

    Ok(ZigzagOutput {
        direction: "encode",
        width: bits,
        signed,
        unsigned,
    })
}

fn unzigzag(input: &str, width: ZigzagWidth) -> CliResult<ZigzagOutput> {
    let bits = width.bits();
    let invalid = || CliError::new(USAGE, format!("invalid unsigned {bits}-bit value: {input}"));
    let (signed, unsigned) = match width {
        ZigzagWidth::W32 => {
            let u: u32 = input.parse().map_err(|_| invalid())?;
            (i64::from(zigzag_decode_32(u)), u64::from(u))
        }
        ZigzagWidth::W64 => {
            let u: u64 = input.parse().map_err(|_| invalid())?;
            (zigzag_decode_64(u), u)
        }
    };

    Ok(ZigzagOutput {
        direction: "decode",
        width: bits,
        signed,
        unsigned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::ZigzagWidth::{W32, W64};

    #[test]
    fn zigzag_small_values() {
        assert_eq!(zigzag("-1", W32).unwrap().unsigned, 1);
        assert_eq!(zigzag("1", W32).unwrap().unsigned, 2);
        assert_eq!(zigzag("-2", W64).unwrap().unsigned, 3);
    }

    #[test]
    fn zigzag_respects_width() {
        assert!(zigzag("2147483648", W32).is_err());
        assert_eq!(zigzag("2147483648", W64).unwrap().unsigned, 4294967296);
        assert_eq!(zigzag("-2147483648", W32).unwrap().unsigned, u64::from(u32::MAX));
    }

    #[test]
    fn unzigzag_inverts() {
        assert_eq!(unzigzag("3", W32).unwrap().signed, -2);
        assert_eq!(unzigzag("18446744073709551615", W64).unwrap().signed, i64::MIN);
        assert!(unzigzag("-1", W64).is_err());
        assert!(unzigzag("4294967296", W32).is_err());
    }

    #[test]
    fn output_reports_width_bits() {
        assert_eq!(zigzag("7", W32).unwrap().width, 32);
        assert_eq!(unzigzag("7", W64).unwrap().width, 64);
    }
}
