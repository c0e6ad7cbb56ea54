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

//! CPIXEL (compressed pixel) packing.
//!
//! ZRLE and TRLE encodings transmit "compressed pixels" (CPIXELs): when the
//! negotiated format has depth at most 24 and fits in fewer bytes than its
//! storage width, each pixel goes on the wire in 1-3 bytes instead of a
//! full word. This module converts a buffer of native 32-bit true-colour
//! pixels into such a packed stream, remapping each colour channel between
//! the two formats' bit fields.
//!
//! # Channel rescale
//!
//! Channels are rescaled between bit widths by shifting: widening pads
//! low-order zero bits, narrowing drops low-order bits. There is no
//! rounding. Wire readers expect exactly this packing, so the rescale must
//! stay bit-for-bit stable.
//!
//! # Performance
//!
//! The conversion is a pure per-pixel loop with no allocation and no
//! cross-pixel state; every pixel is independent, so the optimizer is free
//! to vectorize it.

use crate::format::PixelFormat;
use bytes::BytesMut;

/// Remaps one colour channel from a source bit field to a destination bit
/// field.
///
/// Bit widths are the population counts of the channel maxima, so the
/// rescale `<< dst_bits >> src_bits` scales by `2^(dst_bits - src_bits)`
/// without rounding.
#[derive(Clone, Copy)]
struct ChannelMap {
    src_shift: u32,
    src_max: u32,
    src_bits: u32,
    dst_shift: u32,
    dst_bits: u32,
}

impl ChannelMap {
    fn new(src_shift: u8, src_max: u16, dst_shift: u32, dst_max: u16) -> Self {
        Self {
            src_shift: u32::from(src_shift),
            src_max: u32::from(src_max),
            src_bits: u32::from(src_max).count_ones(),
            dst_shift,
            dst_bits: u32::from(dst_max).count_ones(),
        }
    }

    /// Extracts this channel from a source pixel, rescales it to the
    /// destination width, and positions it at the destination shift.
    #[inline]
    fn remap(self, px: u32) -> u32 {
        (((px >> self.src_shift) & self.src_max) << self.dst_bits >> self.src_bits)
            << self.dst_shift
    }
}

/// Packs native 32-bit true-colour pixels into CPIXELs, writing into a
/// caller-provided buffer.
///
/// Each source pixel is rewritten into the destination format's channel
/// layout and serialized in `bytes_per_cpixel` bytes. Multi-byte CPIXELs
/// follow the destination's endianness flag: big-endian emits the most
/// significant byte first, little-endian the least significant byte first.
/// Exactly `src.len() * bytes_per_cpixel` bytes are written and nothing is
/// allocated.
///
/// When a logically 32-bit destination (depth at most 24) is packed into 3
/// bytes, the channel shifts are normalized so the significant bits start
/// at bit 0 before serialization; a shift offset baked into the 32-bit
/// layout would otherwise push colour bits outside the 3-byte span.
///
/// # Preconditions
///
/// The caller guarantees (checked by `debug_assert!` only, per the
/// negotiation boundary having validated the formats):
///
/// * `src_fmt` is true-colour, 32 bits per pixel, depth at most 32
/// * `dst_fmt` is true-colour, at most 32 bits per pixel, depth at most 24
/// * channel bit fields within each format do not overlap
///
/// # Panics
///
/// Panics if `bytes_per_cpixel` is not 1, 2, or 3, or if `dst` is not
/// exactly `src.len() * bytes_per_cpixel` bytes long. Both indicate a bug
/// in the calling layer, not a recoverable condition.
pub fn pack_cpixels_into(
    dst: &mut [u8],
    dst_fmt: &PixelFormat,
    src: &[u32],
    src_fmt: &PixelFormat,
    bytes_per_cpixel: usize,
) {
    assert!(
        (1..=3).contains(&bytes_per_cpixel),
        "bytes_per_cpixel must be 1, 2, or 3 (got {bytes_per_cpixel})"
    );
    assert_eq!(
        dst.len(),
        src.len() * bytes_per_cpixel,
        "destination must hold exactly bytes_per_cpixel bytes per source pixel"
    );

    debug_assert!(src_fmt.true_colour_flag != 0);
    debug_assert_eq!(src_fmt.bits_per_pixel, 32);
    debug_assert!(src_fmt.depth <= 32);
    debug_assert!(dst_fmt.true_colour_flag != 0);
    debug_assert!(dst_fmt.bits_per_pixel <= 32);
    debug_assert!(dst_fmt.depth <= 24);

    let mut dst_red_shift = u32::from(dst_fmt.red_shift);
    let mut dst_green_shift = u32::from(dst_fmt.green_shift);
    let mut dst_blue_shift = u32::from(dst_fmt.blue_shift);

    // 3-byte packing of a logically 32-bit format: rebase the channel
    // shifts so the lowest one starts at bit 0.
    if bytes_per_cpixel == 3 && dst_fmt.bits_per_pixel == 32 && dst_fmt.depth <= 24 {
        let min_shift = dst_red_shift.min(dst_green_shift).min(dst_blue_shift);
        dst_red_shift -= min_shift;
        dst_green_shift -= min_shift;
        dst_blue_shift -= min_shift;
    }

    let red = ChannelMap::new(
        src_fmt.red_shift,
        src_fmt.red_max,
        dst_red_shift,
        dst_fmt.red_max,
    );
    let green = ChannelMap::new(
        src_fmt.green_shift,
        src_fmt.green_max,
        dst_green_shift,
        dst_fmt.green_max,
    );
    let blue = ChannelMap::new(
        src_fmt.blue_shift,
        src_fmt.blue_max,
        dst_blue_shift,
        dst_fmt.blue_max,
    );

    let big_endian = dst_fmt.big_endian_flag != 0;

    #[allow(clippy::cast_possible_truncation)] // byte serialization truncates by design
    match bytes_per_cpixel {
        3 => {
            for (&px, out) in src.iter().zip(dst.chunks_exact_mut(3)) {
                let cpx = red.remap(px) | green.remap(px) | blue.remap(px);
                if big_endian {
                    out[0] = (cpx >> 16) as u8;
                    out[1] = (cpx >> 8) as u8;
                    out[2] = cpx as u8;
                } else {
                    out[0] = cpx as u8;
                    out[1] = (cpx >> 8) as u8;
                    out[2] = (cpx >> 16) as u8;
                }
            }
        }
        2 => {
            for (&px, out) in src.iter().zip(dst.chunks_exact_mut(2)) {
                let cpx = red.remap(px) | green.remap(px) | blue.remap(px);
                if big_endian {
                    out[0] = (cpx >> 8) as u8;
                    out[1] = cpx as u8;
                } else {
                    out[0] = cpx as u8;
                    out[1] = (cpx >> 8) as u8;
                }
            }
        }
        1 => {
            for (&px, out) in src.iter().zip(dst.iter_mut()) {
                let cpx = red.remap(px) | green.remap(px) | blue.remap(px);
                *out = cpx as u8;
            }
        }
        _ => unreachable!(),
    }
}

/// Packs native 32-bit true-colour pixels into a freshly allocated CPIXEL
/// stream.
///
/// Convenience wrapper over [`pack_cpixels_into`] for callers assembling an
/// outgoing protocol message; the returned buffer holds exactly
/// `src.len() * bytes_per_cpixel` bytes.
///
/// # Panics
///
/// Panics if `bytes_per_cpixel` is not 1, 2, or 3.
#[must_use]
pub fn pack_cpixels(
    dst_fmt: &PixelFormat,
    src: &[u32],
    src_fmt: &PixelFormat,
    bytes_per_cpixel: usize,
) -> BytesMut {
    let mut dst = BytesMut::zeroed(src.len() * bytes_per_cpixel);
    pack_cpixels_into(&mut dst, dst_fmt, src, src_fmt, bytes_per_cpixel);
    dst
}
