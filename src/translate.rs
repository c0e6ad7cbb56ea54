// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Full-width pixel format translation.
//!
//! Raw-style encodings send each pixel at the client's full
//! `bits_per_pixel` width. This module converts native 32-bit true-colour
//! pixels into an arbitrary negotiated format (8/16/24/32 bpp), honouring
//! the destination's channel layout and byte order.
//!
//! Unlike CPIXEL packing (see [`crate::cpixel`]), channel values here are
//! rescaled proportionally (`value * dst_max / src_max`), which preserves
//! channel extremes and distributes intermediate values evenly. The CPIXEL
//! path keeps its shift-based rescale because ZRLE readers expect that
//! exact bit pattern; full-width translation has no such constraint and
//! favours visual fidelity.

use crate::error::{PixelError, Result};
use crate::format::PixelFormat;
use bytes::{BufMut, BytesMut};

/// Translates native 32-bit true-colour pixels into the destination format
/// at its full `bits_per_pixel` width.
///
/// # Arguments
///
/// * `src` - Source pixels as native-endian 32-bit words
/// * `src_fmt` - Layout of the source pixels (must be 32 bpp true-colour)
/// * `dst_fmt` - The destination pixel format
///
/// # Returns
///
/// A `BytesMut` containing `src.len()` pixels in the destination format,
/// `dst_fmt.bits_per_pixel / 8` bytes each.
///
/// # Errors
///
/// Returns [`PixelError::UnsupportedFormat`] if the destination
/// `bits_per_pixel` is not 8, 16, 24, or 32.
pub fn translate_pixels(
    src: &[u32],
    src_fmt: &PixelFormat,
    dst_fmt: &PixelFormat,
) -> Result<BytesMut> {
    debug_assert!(src_fmt.true_colour_flag != 0);
    debug_assert_eq!(src_fmt.bits_per_pixel, 32);

    // Fast path: same layout, just serialize the words in wire order
    if src_fmt.matches(dst_fmt) {
        let mut dst = BytesMut::with_capacity(src.len() * 4);
        if dst_fmt.big_endian_flag != 0 {
            for &px in src {
                dst.put_u32(px);
            }
        } else {
            for &px in src {
                dst.put_u32_le(px);
            }
        }
        return Ok(dst);
    }

    let bytes_per_pixel = match dst_fmt.bits_per_pixel {
        8 | 16 | 24 | 32 => (dst_fmt.bits_per_pixel / 8) as usize,
        other => {
            return Err(PixelError::UnsupportedFormat(format!(
                "{other} bits per pixel"
            )))
        }
    };

    log::trace!(
        "translating {} pixels to {}bpp depth {}",
        src.len(),
        dst_fmt.bits_per_pixel,
        dst_fmt.depth
    );

    let mut dst = BytesMut::with_capacity(src.len() * bytes_per_pixel);
    let big_endian = dst_fmt.big_endian_flag != 0;

    for &px in src {
        let r = rescale_channel(
            (px >> src_fmt.red_shift) & u32::from(src_fmt.red_max),
            src_fmt.red_max,
            dst_fmt.red_max,
        );
        let g = rescale_channel(
            (px >> src_fmt.green_shift) & u32::from(src_fmt.green_max),
            src_fmt.green_max,
            dst_fmt.green_max,
        );
        let b = rescale_channel(
            (px >> src_fmt.blue_shift) & u32::from(src_fmt.blue_max),
            src_fmt.blue_max,
            dst_fmt.blue_max,
        );

        let value =
            (r << dst_fmt.red_shift) | (g << dst_fmt.green_shift) | (b << dst_fmt.blue_shift);

        put_pixel(&mut dst, value, bytes_per_pixel, big_endian);
    }

    Ok(dst)
}

/// Rescales a colour channel proportionally between two ranges.
///
/// # Arguments
///
/// * `value` - The component value in its source range (0..=`src_max`)
/// * `src_max` - The maximum value for this component in the source format
/// * `dst_max` - The maximum value for this component in the destination format
///
/// # Returns
///
/// The rescaled value in 0..=`dst_max`.
#[inline]
fn rescale_channel(value: u32, src_max: u16, dst_max: u16) -> u32 {
    if src_max == 0 {
        return 0;
    }
    if src_max == dst_max {
        return value;
    }

    // Scale: value * dst_max / src_max
    // Use 64-bit to avoid overflow
    #[allow(clippy::cast_possible_truncation)] // result is bounded by dst_max
    {
        ((u64::from(value) * u64::from(dst_max)) / u64::from(src_max)) as u32
    }
}

/// Writes a composed pixel value in wire byte order.
#[allow(clippy::cast_possible_truncation)] // byte serialization truncates by design
fn put_pixel(dst: &mut BytesMut, value: u32, bytes_per_pixel: usize, big_endian: bool) {
    match bytes_per_pixel {
        1 => dst.put_u8(value as u8),
        2 => {
            if big_endian {
                dst.put_u16(value as u16);
            } else {
                dst.put_u16_le(value as u16);
            }
        }
        3 => {
            if big_endian {
                dst.put_u8((value >> 16) as u8);
                dst.put_u8((value >> 8) as u8);
                dst.put_u8(value as u8);
            } else {
                dst.put_u8(value as u8);
                dst.put_u8((value >> 8) as u8);
                dst.put_u8((value >> 16) as u8);
            }
        }
        4 => {
            if big_endian {
                dst.put_u32(value);
            } else {
                dst.put_u32_le(value);
            }
        }
        _ => unreachable!("bytes_per_pixel validated by caller"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_fast_path() {
        let fmt = PixelFormat::rgba32();
        let src = [0x0000_00FF, 0x0000_FF00]; // red, green
        let dst = translate_pixels(&src, &fmt, &fmt).unwrap();

        assert_eq!(&dst[..], &[255, 0, 0, 0, 0, 255, 0, 0]);
    }

    #[test]
    fn test_rgba32_to_rgb565() {
        let src_fmt = PixelFormat::rgba32();
        let dst_fmt = PixelFormat::rgb565();

        // Pure red: R=255 at shift 0
        let dst = translate_pixels(&[0x0000_00FF], &src_fmt, &dst_fmt).unwrap();

        // In RGB565: red = (255*31/255) << 11 = 31 << 11 = 0xF800
        assert_eq!(dst.len(), 2);
        let value = u16::from_le_bytes([dst[0], dst[1]]);
        assert_eq!(value, 0xF800);
    }

    #[test]
    fn test_rgba32_to_rgb565_big_endian() {
        let src_fmt = PixelFormat::rgba32();
        let mut dst_fmt = PixelFormat::rgb565();
        dst_fmt.big_endian_flag = 1;

        let dst = translate_pixels(&[0x0000_00FF], &src_fmt, &dst_fmt).unwrap();
        let value = u16::from_be_bytes([dst[0], dst[1]]);
        assert_eq!(value, 0xF800);
    }

    #[test]
    fn test_rgba32_to_bgr233() {
        let src_fmt = PixelFormat::rgba32();
        let dst_fmt = PixelFormat::bgr233();

        // White maps to all channels at max: 7 | 7<<3 | 3<<6
        let dst = translate_pixels(&[0x00FF_FFFF], &src_fmt, &dst_fmt).unwrap();
        assert_eq!(&dst[..], &[0xFF]);

        // Pure blue: only the top two bits set
        let dst = translate_pixels(&[0x00FF_0000], &src_fmt, &dst_fmt).unwrap();
        assert_eq!(&dst[..], &[0xC0]);
    }

    #[test]
    fn test_24bpp_output_byte_order() {
        let src_fmt = PixelFormat::rgba32();
        let mut dst_fmt = PixelFormat::rgba32();
        dst_fmt.bits_per_pixel = 24;

        // R=0x12, G=0x34, B=0x56 -> value 0x563412 (R in the low byte)
        let le = translate_pixels(&[0x0056_3412], &src_fmt, &dst_fmt).unwrap();
        assert_eq!(&le[..], &[0x12, 0x34, 0x56]);

        dst_fmt.big_endian_flag = 1;
        let be = translate_pixels(&[0x0056_3412], &src_fmt, &dst_fmt).unwrap();
        assert_eq!(&be[..], &[0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_rescale_channel() {
        // 5-bit (0-31) to 8-bit (0-255)
        assert_eq!(rescale_channel(0, 31, 255), 0);
        assert_eq!(rescale_channel(31, 31, 255), 255);
        assert_eq!(rescale_channel(15, 31, 255), 123); // 15 * 255 / 31 = 123.387... = 123

        // 8-bit (0-255) to 5-bit (0-31)
        assert_eq!(rescale_channel(255, 255, 31), 31);
        assert_eq!(rescale_channel(128, 255, 31), 15); // ~half

        // Identity
        assert_eq!(rescale_channel(128, 255, 255), 128);

        // Degenerate source range
        assert_eq!(rescale_channel(5, 0, 255), 0);
    }

    #[test]
    fn test_unsupported_destination_width() {
        let src_fmt = PixelFormat::rgba32();
        let mut dst_fmt = PixelFormat::rgba32();
        dst_fmt.bits_per_pixel = 12;
        dst_fmt.depth = 12;

        match translate_pixels(&[0], &src_fmt, &dst_fmt) {
            Err(PixelError::UnsupportedFormat(msg)) => assert!(msg.contains("12")),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_output_length() {
        let src = [0u32; 5];
        let src_fmt = PixelFormat::rgba32();

        let dst = translate_pixels(&src, &src_fmt, &PixelFormat::bgr233()).unwrap();
        assert_eq!(dst.len(), 5);
        let dst = translate_pixels(&src, &src_fmt, &PixelFormat::rgb565()).unwrap();
        assert_eq!(dst.len(), 10);
    }
}
