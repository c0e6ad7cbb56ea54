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

//! RFB pixel format descriptor.
//!
//! This module defines the `PIXEL_FORMAT` structure from the RFB protocol
//! (RFC 6143 §7.4) as an immutable value type, along with its wire
//! serialization, validation, and the well-known formats negotiated by
//! common VNC clients.
//!
//! A pixel format describes how a pixel value encodes its colour channels:
//! each channel occupies a contiguous bit field located by a shift and
//! bounded by a maximum value (which doubles as the channel mask). The
//! format also records the pixel's storage width, significant depth, and
//! the byte order multi-byte pixels use on the wire.

use crate::error::{PixelError, Result};
use bytes::{Buf, BufMut, BytesMut};

/// Size of a `PIXEL_FORMAT` structure on the wire, in bytes.
///
/// 4 single-byte fields, 3 two-byte maxima, 3 single-byte shifts, and
/// 3 bytes of padding as specified by RFC 6143.
pub const PIXEL_FORMAT_WIRE_LEN: usize = 16;

/// Represents the pixel format of a framebuffer or wire stream.
///
/// This struct defines how pixel data is interpreted, including color depth,
/// endianness, and RGB component details.
#[derive(Debug, Clone)]
pub struct PixelFormat {
    /// Number of bits per pixel.
    pub bits_per_pixel: u8,
    /// Depth of the pixel in bits.
    pub depth: u8,
    /// Flag indicating if the pixel data is big-endian (1) or little-endian (0).
    pub big_endian_flag: u8,
    /// Flag indicating if the pixel format is true-colour (1) or colormapped (0).
    pub true_colour_flag: u8,
    /// Maximum red color value.
    pub red_max: u16,
    /// Maximum green color value.
    pub green_max: u16,
    /// Maximum blue color value.
    pub blue_max: u16,
    /// Number of shifts to apply to get the red color component.
    pub red_shift: u8,
    /// Number of shifts to apply to get the green color component.
    pub green_shift: u8,
    /// Number of shifts to apply to get the blue color component.
    pub blue_shift: u8,
}

impl PixelFormat {
    /// Creates a standard 32-bit RGBA pixel format.
    ///
    /// This is the canonical native format: 8 bits per channel with red in
    /// the low byte, little-endian.
    ///
    /// # Returns
    ///
    /// A `PixelFormat` instance configured for 32-bit RGBA.
    #[must_use]
    pub fn rgba32() -> Self {
        Self {
            bits_per_pixel: 32,
            depth: 24,
            big_endian_flag: 0,
            true_colour_flag: 1,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 0,
            green_shift: 8,
            blue_shift: 16,
        }
    }

    /// Creates a 16-bit RGB565 pixel format.
    ///
    /// RGB565 uses 5 bits for red, 6 bits for green, and 5 bits for blue.
    /// This is a common format for embedded displays and bandwidth-constrained clients.
    ///
    /// # Returns
    ///
    /// A `PixelFormat` instance configured for 16-bit RGB565.
    #[must_use]
    pub fn rgb565() -> Self {
        Self {
            bits_per_pixel: 16,
            depth: 16,
            big_endian_flag: 0,
            true_colour_flag: 1,
            red_max: 31,   // 5 bits
            green_max: 63, // 6 bits
            blue_max: 31,  // 5 bits
            red_shift: 11,
            green_shift: 5,
            blue_shift: 0,
        }
    }

    /// Creates a 16-bit RGB555 pixel format.
    ///
    /// RGB555 uses 5 bits for each of red, green, and blue, with 1 unused bit.
    ///
    /// # Returns
    ///
    /// A `PixelFormat` instance configured for 16-bit RGB555.
    #[must_use]
    pub fn rgb555() -> Self {
        Self {
            bits_per_pixel: 16,
            depth: 15,
            big_endian_flag: 0,
            true_colour_flag: 1,
            red_max: 31,   // 5 bits
            green_max: 31, // 5 bits
            blue_max: 31,  // 5 bits
            red_shift: 10,
            green_shift: 5,
            blue_shift: 0,
        }
    }

    /// Creates an 8-bit BGR233 pixel format.
    ///
    /// BGR233 uses 2 bits for blue, 3 bits for green, and 3 bits for red.
    /// This format is used for very low bandwidth connections and legacy clients.
    ///
    /// # Returns
    ///
    /// A `PixelFormat` instance configured for 8-bit BGR233.
    #[must_use]
    pub fn bgr233() -> Self {
        Self {
            bits_per_pixel: 8,
            depth: 8,
            big_endian_flag: 0,
            true_colour_flag: 1,
            red_max: 7,   // 3 bits
            green_max: 7, // 3 bits
            blue_max: 3,  // 2 bits
            red_shift: 0,
            green_shift: 3,
            blue_shift: 6,
        }
    }

    /// Checks if this `PixelFormat` is the canonical 32-bit RGBA format.
    ///
    /// # Returns
    ///
    /// `true` if the pixel format matches 32-bit RGBA, `false` otherwise.
    #[must_use]
    pub fn is_rgba32(&self) -> bool {
        self.bits_per_pixel == 32
            && self.depth == 24
            && self.big_endian_flag == 0
            && self.true_colour_flag == 1
            && self.red_max == 255
            && self.green_max == 255
            && self.blue_max == 255
            && self.red_shift == 0
            && self.green_shift == 8
            && self.blue_shift == 16
    }

    /// Validates that this pixel format is supported by the library.
    ///
    /// Checks that the format uses valid bits-per-pixel values and that the
    /// true-colour channel layout is self-consistent. This is the boundary
    /// check applied when a format arrives from negotiation; the hot-path
    /// conversion routines assume it already passed.
    ///
    /// # Returns
    ///
    /// `true` if the format is valid and supported, `false` otherwise.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        // Check bits per pixel is valid
        if self.bits_per_pixel != 8
            && self.bits_per_pixel != 16
            && self.bits_per_pixel != 24
            && self.bits_per_pixel != 32
        {
            return false;
        }

        // Check depth is reasonable
        if self.depth == 0 || self.depth > 32 {
            return false;
        }

        // Only true-colour formats are supported; colour-map formats need a
        // palette this library does not carry.
        if self.true_colour_flag == 0 {
            return false;
        }

        // Check that max values fit in the bit depth
        #[allow(clippy::cast_possible_truncation)]
        // leading_zeros() returns max 32, result always fits in u8
        let bits_needed = |max: u16| -> u8 {
            if max == 0 {
                0
            } else {
                (16 - max.leading_zeros()) as u8
            }
        };

        let red_bits = bits_needed(self.red_max);
        let green_bits = bits_needed(self.green_max);
        let blue_bits = bits_needed(self.blue_max);

        // Total bits should not exceed depth
        if red_bits + green_bits + blue_bits > self.depth {
            return false;
        }

        // Each max must be a contiguous low mask (2^n - 1) for the shift
        // arithmetic to be meaningful
        let contiguous = |max: u16| max & max.wrapping_add(1) == 0;
        if !contiguous(self.red_max) || !contiguous(self.green_max) || !contiguous(self.blue_max) {
            return false;
        }

        // Shifts should not exceed the pixel width
        if self.red_shift >= 32 || self.green_shift >= 32 || self.blue_shift >= 32 {
            return false;
        }

        true
    }

    /// Checks whether two pixel formats describe the same pixel layout.
    ///
    /// Endianness is ignored for 8-bit formats since a single byte has no
    /// byte order.
    ///
    /// # Returns
    ///
    /// `true` if a pixel value converted between the two formats would be
    /// unchanged, `false` otherwise.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.bits_per_pixel == other.bits_per_pixel
            && self.depth == other.depth
            && (self.big_endian_flag == other.big_endian_flag || self.bits_per_pixel == 8)
            && self.true_colour_flag == other.true_colour_flag
            && self.red_max == other.red_max
            && self.green_max == other.green_max
            && self.blue_max == other.blue_max
            && self.red_shift == other.red_shift
            && self.green_shift == other.green_shift
            && self.blue_shift == other.blue_shift
    }

    /// Returns the number of bytes a compressed pixel (CPIXEL) occupies in
    /// this format.
    ///
    /// ZRLE-family encodings transmit a pixel in fewer bytes than its
    /// storage width when the format permits: a true-colour 32-bit format
    /// with depth at most 24 packs into 3 bytes. All other formats keep
    /// their full width.
    ///
    /// # Returns
    ///
    /// The CPIXEL width in bytes (1, 2, 3, or 4).
    #[must_use]
    pub fn cpixel_size(&self) -> usize {
        if self.true_colour_flag != 0 && self.bits_per_pixel == 32 && self.depth <= 24 {
            3
        } else {
            (self.bits_per_pixel / 8) as usize
        }
    }

    /// Writes the pixel format data into a `BytesMut` buffer.
    ///
    /// This function serializes the `PixelFormat` into the RFB protocol format.
    ///
    /// # Arguments
    ///
    /// * `buf` - A mutable reference to the `BytesMut` buffer to write into.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.put_u8(self.bits_per_pixel);
        buf.put_u8(self.depth);
        buf.put_u8(self.big_endian_flag);
        buf.put_u8(self.true_colour_flag);
        buf.put_u16(self.red_max);
        buf.put_u16(self.green_max);
        buf.put_u16(self.blue_max);
        buf.put_u8(self.red_shift);
        buf.put_u8(self.green_shift);
        buf.put_u8(self.blue_shift);
        buf.put_bytes(0, 3); // padding
    }

    /// Reads and deserializes a `PixelFormat` from a `BytesMut` buffer.
    ///
    /// This function extracts pixel format information from the RFB protocol stream.
    ///
    /// # Arguments
    ///
    /// * `buf` - A mutable reference to the `BytesMut` buffer to read from.
    ///
    /// # Returns
    ///
    /// `Ok(Self)` containing the parsed `PixelFormat`.
    ///
    /// # Errors
    ///
    /// Returns [`PixelError::TruncatedPixelFormat`] if there are not enough
    /// bytes in the buffer to read a complete `PixelFormat`.
    pub fn from_bytes(buf: &mut BytesMut) -> Result<Self> {
        if buf.len() < PIXEL_FORMAT_WIRE_LEN {
            return Err(PixelError::TruncatedPixelFormat {
                expected: PIXEL_FORMAT_WIRE_LEN,
                actual: buf.len(),
            });
        }

        let pf = Self {
            bits_per_pixel: buf.get_u8(),
            depth: buf.get_u8(),
            big_endian_flag: buf.get_u8(),
            true_colour_flag: buf.get_u8(),
            red_max: buf.get_u16(),
            green_max: buf.get_u16(),
            blue_max: buf.get_u16(),
            red_shift: buf.get_u8(),
            green_shift: buf.get_u8(),
            blue_shift: buf.get_u8(),
        };
        buf.advance(3);
        Ok(pf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        let fmt = PixelFormat::rgb565();
        let mut buf = BytesMut::new();
        fmt.write_to(&mut buf);
        assert_eq!(buf.len(), PIXEL_FORMAT_WIRE_LEN);

        let parsed = PixelFormat::from_bytes(&mut buf).unwrap();
        assert!(parsed.matches(&fmt));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_from_bytes_truncated() {
        let mut buf = BytesMut::from(&[0u8; 10][..]);
        match PixelFormat::from_bytes(&mut buf) {
            Err(PixelError::TruncatedPixelFormat { expected, actual }) => {
                assert_eq!(expected, PIXEL_FORMAT_WIRE_LEN);
                assert_eq!(actual, 10);
            }
            other => panic!("expected TruncatedPixelFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_well_known_formats_valid() {
        assert!(PixelFormat::rgba32().is_valid());
        assert!(PixelFormat::rgb565().is_valid());
        assert!(PixelFormat::rgb555().is_valid());
        assert!(PixelFormat::bgr233().is_valid());
    }

    #[test]
    fn test_is_valid_rejects_bad_formats() {
        let mut fmt = PixelFormat::rgba32();
        fmt.bits_per_pixel = 12;
        assert!(!fmt.is_valid());

        let mut fmt = PixelFormat::rgba32();
        fmt.depth = 0;
        assert!(!fmt.is_valid());

        // Colour-map formats are unsupported
        let mut fmt = PixelFormat::bgr233();
        fmt.true_colour_flag = 0;
        assert!(!fmt.is_valid());

        // Channel bits exceed depth
        let mut fmt = PixelFormat::rgb565();
        fmt.depth = 8;
        assert!(!fmt.is_valid());

        // Non-contiguous channel mask
        let mut fmt = PixelFormat::rgba32();
        fmt.green_max = 0xAA;
        assert!(!fmt.is_valid());
    }

    #[test]
    fn test_matches_ignores_endianness_for_8bpp() {
        let a = PixelFormat::bgr233();
        let mut b = PixelFormat::bgr233();
        b.big_endian_flag = 1;
        assert!(a.matches(&b));

        let a = PixelFormat::rgb565();
        let mut b = PixelFormat::rgb565();
        b.big_endian_flag = 1;
        assert!(!a.matches(&b));
    }

    #[test]
    fn test_is_rgba32() {
        assert!(PixelFormat::rgba32().is_rgba32());
        assert!(!PixelFormat::rgb565().is_rgba32());
    }

    #[test]
    fn test_cpixel_size() {
        // 32bpp depth 24 compresses to 3 bytes
        assert_eq!(PixelFormat::rgba32().cpixel_size(), 3);
        // 16bpp and 8bpp keep their full width
        assert_eq!(PixelFormat::rgb565().cpixel_size(), 2);
        assert_eq!(PixelFormat::bgr233().cpixel_size(), 1);

        // 32bpp with depth > 24 stays at 4 bytes
        let mut deep = PixelFormat::rgba32();
        deep.depth = 30;
        deep.red_max = 1023;
        deep.green_max = 1023;
        deep.blue_max = 1023;
        deep.red_shift = 0;
        deep.green_shift = 10;
        deep.blue_shift = 20;
        assert_eq!(deep.cpixel_size(), 4);
    }
}
