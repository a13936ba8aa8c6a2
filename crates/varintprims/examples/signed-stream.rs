//! Write a run of signed deltas as ZigZag varints, then read them back.
//!
//! Usage:
//!   cargo run --example signed-stream

use std::io::Cursor;

use varintprims::codec::{VarintReader, VarintWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let samples: [i64; 8] = [1000, 1003, 998, 998, 1010, -5, 0, 7];

    let mut previous = 0i64;
    let mut writer = VarintWriter::new(Cursor::new(Vec::<u8>::new()));
    for &sample in &samples {
        writer.write_signed(sample - previous)?;
        previous = sample;
    }
    writer.flush()?;
    println!(
        "{} samples -> {} bytes (fixed-width: {} bytes)",
        samples.len(),
        writer.bytes_written(),
        samples.len() * 8
    );

    let wire = writer.into_inner().into_inner();
    println!("wire: {wire:02x?}");

    let mut reader = VarintReader::new(Cursor::new(wire));
    let mut restored = Vec::new();
    let mut acc = 0i64;
    while let Some(delta) = reader.read_signed()? {
        acc += delta;
        restored.push(acc);
    }

    assert_eq!(restored, samples);
    println!("restored: {restored:?}");
    Ok(())
}
