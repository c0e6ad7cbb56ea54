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


//! # rfbpixel
//!
//! Pixel format translation and CPIXEL packing for RFB (VNC) servers.
//!
//! This library provides the numeric plumbing an RFB (Remote Framebuffer,
//! RFC 6143) server needs between its native framebuffer and a client's
//! negotiated pixel format: the wire-level `PIXEL_FORMAT` descriptor,
//! full-width pixel translation for raw-style encodings, and compressed
//! pixel (CPIXEL) packing for the ZRLE encoding family. It carries no
//! network, framing, or compression code of its own; those layers sit
//! around it.
//!
//! ## Features
//!
//! - **`PIXEL_FORMAT` descriptor**: wire (de)serialization, validation,
//!   well-known formats (RGBA32, RGB565, RGB555, BGR233)
//! - **Full-width translation**: 32-bit true-colour source to any 8/16/24/32
//!   bpp true-colour destination, with proportional channel scaling
//! - **CPIXEL packing**: 1/2/3-byte compressed pixels with bit-exact
//!   shift-based channel rescale, as ZRLE/TRLE readers expect
//! - **Memory safe**: pure Rust, no unsafe code, no allocation on the
//!   packing hot path
//!
//! ## Quick Start
//!
//! ```
//! use rfbpixel::{pack_cpixels, PixelFormat};
//!
//! // Native framebuffer pixels (RGBA32: red in the low byte)
//! let native = PixelFormat::rgba32();
//! let pixels = [0x0000_00FFu32, 0x0000_FF00, 0x00FF_0000];
//!
//! // Client negotiated RGB565; its CPIXELs are 2 bytes wide
//! let client = PixelFormat::rgb565();
//! let packed = pack_cpixels(&client, &pixels, &native, client.cpixel_size());
//! assert_eq!(packed.len(), pixels.len() * 2);
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │       Server framebuffer (&[u32])       │
//! │        native 32-bit true colour        │
//! └──────────────────┬──────────────────────┘
//!                    │
//!        ┌───────────┴───────────┐
//!        ▼                       ▼
//! ┌──────────────┐       ┌──────────────┐
//! │  translate   │       │    cpixel    │
//! │  full-width  │       │  1-3 byte    │
//! │  8/16/24/32  │       │  packed      │
//! └──────┬───────┘       └──────┬───────┘
//!        │                      │
//!        ▼                      ▼
//!   Raw-style encodings    ZRLE-family encodings
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cpixel;
pub mod error;
pub mod format;
pub mod translate;

// Re-exports
pub use cpixel::{pack_cpixels, pack_cpixels_into};
pub use error::{PixelError, Result};
pub use format::{PixelFormat, PIXEL_FORMAT_WIRE_LEN};
pub use translate::translate_pixels;
