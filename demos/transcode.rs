//! Framebuffer transcoding example.
//!
//! Builds a gradient test pattern and converts it to a bandwidth-constrained
//! client format both ways: full-width translation (raw-style encodings)
//! and CPIXEL packing (ZRLE-family encodings).
//!
//! Usage:
//!   cargo run --example transcode

use rfbpixel::{pack_cpixels, translate_pixels, PixelFormat};
use std::error::Error;

const WIDTH: usize = 320;
const HEIGHT: usize = 240;

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    // Create a test pattern (gradient) in native RGBA32
    let native = PixelFormat::rgba32();
    let mut pixels = vec![0u32; WIDTH * HEIGHT];
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let r = (x * 255 / WIDTH) as u32; // R: horizontal gradient
            let g = (y * 255 / HEIGHT) as u32; // G: vertical gradient
            let b = 128u32; // B: constant
            pixels[y * WIDTH + x] = r | (g << 8) | (b << 16);
        }
    }

    println!(
        "Native framebuffer: {}x{} = {} bytes",
        WIDTH,
        HEIGHT,
        pixels.len() * 4
    );

    // A client negotiated RGB565
    let client = PixelFormat::rgb565();

    let translated = translate_pixels(&pixels, &native, &client)?;
    println!(
        "Full-width RGB565:  {} bytes ({:.0}% of native)",
        translated.len(),
        translated.len() as f64 / (pixels.len() * 4) as f64 * 100.0
    );

    let packed = pack_cpixels(&client, &pixels, &native, client.cpixel_size());
    println!(
        "CPIXEL RGB565:      {} bytes ({} bytes per pixel)",
        packed.len(),
        client.cpixel_size()
    );

    // A depth-24 client: full width is 4 bytes, CPIXEL drops to 3
    let deep_client = PixelFormat::rgba32();
    let packed24 = pack_cpixels(&deep_client, &pixels, &native, deep_client.cpixel_size());
    println!(
        "CPIXEL depth-24:    {} bytes ({} bytes per pixel)",
        packed24.len(),
        deep_client.cpixel_size()
    );

    Ok(())
}
