//! Pixel format wire round-trip example.
//!
//! Serializes the well-known pixel formats to their 16-byte RFB wire form,
//! parses them back, and prints each format's CPIXEL width.
//!
//! Usage:
//!   cargo run --example formats

use bytes::BytesMut;
use rfbpixel::{PixelFormat, PIXEL_FORMAT_WIRE_LEN};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let formats = [
        ("RGBA32", PixelFormat::rgba32()),
        ("RGB565", PixelFormat::rgb565()),
        ("RGB555", PixelFormat::rgb555()),
        ("BGR233", PixelFormat::bgr233()),
    ];

    for (name, fmt) in &formats {
        let mut buf = BytesMut::new();
        fmt.write_to(&mut buf);
        assert_eq!(buf.len(), PIXEL_FORMAT_WIRE_LEN);
        let wire: Vec<String> = buf.iter().map(|b| format!("{b:02x}")).collect();

        let parsed = PixelFormat::from_bytes(&mut buf)?;
        assert!(parsed.matches(fmt));

        println!(
            "{name}: {} bpp, depth {}, cpixel {} bytes",
            fmt.bits_per_pixel,
            fmt.depth,
            fmt.cpixel_size()
        );
        println!("  wire: {}", wire.join(" "));
    }

    Ok(())
}
