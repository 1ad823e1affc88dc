//! # zentexture
//!
//! Texture decoder for 15-bit hardware color targets.
//!
//! Every supported container is fully decoded in memory and normalized to
//! native colors: 5 bits each of red, green and blue with red in the low
//! bits, plus a visibility bit (`0x8000`). A native value of `0` is
//! transparent.
//!
//! ## Supported Formats
//!
//! - **BMP**: 4-bit paletted and 16-bit X1R5G5B5 only. Palettes are
//!   quantized with rounding; 16-bit pixels go through [`to_native`].
//! - **PNG**: decoded with the `png` crate, then thresholded: only pixels
//!   with alpha 255 are kept, channels are truncated to 5 bits.
//! - **GRF** (RIFF `GRF `): raw 4-bit indices with a native palette, or an
//!   LZ77-compressed native bitmap that stays compressed until
//!   [`Texture::copy`].
//!
//! Magenta (`#ff00ff`) in BMP and PNG pixels is transparent.
//!
//! ## Non-Goals
//!
//! - Other BMP bit depths, RLE, top-down rows
//! - Streaming or partial decode
//! - General image processing beyond palette and bitmap effects
//!
//! ## Usage
//!
//! ```no_run
//! use zentexture::{ColorMode, MemoryRegion, TextureRequest};
//!
//! // Tries top.png, top.bmp, top.grf, then the fallback.
//! let mut texture = TextureRequest::new("themes/dark/top")
//!     .fallback("themes/default/top.png")
//!     .color_mode(ColorMode::Normal)
//!     .load();
//!
//! // Darken the palette, if there is one.
//! texture.apply_palette_effect(|palette| {
//!     for c in palette.iter_mut() {
//!         *c = 0x8000 | ((*c & 0x7BDE) >> 1);
//!     }
//! });
//!
//! let mut vram = vec![0u16; texture.copy_len()];
//! texture.copy(&mut vram, MemoryRegion::Vram)?;
//! # Ok::<(), zentexture::TextureError>(())
//! ```

#![forbid(unsafe_code)]

mod bmp;
mod color;
mod cursor;
mod decode;
mod error;
mod grf;
mod info;
mod limits;
mod load;
mod png;
mod texture;

// Re-exports
pub use color::{
    CHROMA_KEY, ColorMode, VISIBLE, palette_to_native, quantize_channel, to_native,
};
pub use decode::DecodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::TextureError;
pub use grf::GrfAttributes;
pub use info::{SNIFF_LEN, TextureInfo, TextureKind};
pub use limits::Limits;
pub use load::{DEFAULT_EXTENSIONS, TextureRequest};
pub use texture::{Compressed, Indexed, MemoryRegion, Texture, TextureData};
