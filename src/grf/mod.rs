//! GRF texture containers (internal).
//!
//! Two sub-variants share the RIFF framing: raw paletted data (data type
//! nibble `0x00`) and LZ77-compressed bitmaps (`0x10`).

mod decode;
pub(crate) mod lz77;

use crate::error::TextureError;
use crate::limits::Limits;
use crate::texture::Texture;
use enough::Stop;

pub use decode::GrfAttributes;
pub(crate) use decode::parse_header;

/// Decode a raw paletted GRF.
pub(crate) fn decode_paletted(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Texture, TextureError> {
    log::debug!("loading paletted GRF");
    decode::decode_paletted(data, limits, stop)
}

/// Decode an LZ77-compressed GRF without expanding it.
pub(crate) fn decode_compressed(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Texture, TextureError> {
    log::debug!("loading compressed GRF");
    decode::decode_compressed(data, limits, stop)
}
