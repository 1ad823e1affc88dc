//! GRF container decoder.
//!
//! ```text
//!  0  "RIFF" size "GRF "
//! 12  "HDR " size
//! 20  gfxAttr mapAttr mmapAttr palAttr tileW tileH metaW metaH   (u8 each)
//! 28  width (u32) height (u32)
//! 36  "GFX " size
//! 44  data header word: (byte_len << 8) | type
//! 48  data ...
//!     "PAL " size, palette header word, palette ...
//! ```
//!
//! Data header words carry the payload length in their upper 24 bits, so
//! `word >> 9` is the payload length in 16-bit cells.

use enough::Stop;

use super::lz77;
use crate::cursor::Cursor;
use crate::error::TextureError;
use crate::limits::Limits;
use crate::texture::{Compressed, Indexed, Texture, TextureData};

const HEADER_BODY: usize = 20;
const GFX_CHUNK: usize = 36;

/// Raw attribute bytes of the `HDR ` chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrfAttributes {
    pub gfx: u8,
    pub map: u8,
    pub meta_map: u8,
    pub palette: u8,
    pub tile_width: u8,
    pub tile_height: u8,
    pub meta_width: u8,
    pub meta_height: u8,
}

pub(crate) struct GrfHeader {
    pub attributes: GrfAttributes,
    pub width: u32,
    pub height: u32,
}

pub(crate) fn parse_header(data: &[u8]) -> Result<GrfHeader, TextureError> {
    let mut cur = Cursor::new(data);
    cur.set_position(HEADER_BODY)?;
    let [gfx, map, meta_map, palette, tile_width, tile_height, meta_width, meta_height] =
        cur.read_fixed_bytes::<8>()?;
    let width = cur.get_u32_le()?;
    let height = cur.get_u32_le()?;
    Ok(GrfHeader {
        attributes: GrfAttributes {
            gfx,
            map,
            meta_map,
            palette,
            tile_width,
            tile_height,
            meta_width,
            meta_height,
        },
        width,
        height,
    })
}

fn expect_tag(cur: &mut Cursor<'_>, tag: &[u8; 4]) -> Result<(), TextureError> {
    let found = cur.read_fixed_bytes::<4>()?;
    if &found != tag {
        return Err(TextureError::InvalidData(format!(
            "expected {:?} chunk at offset {}, found {:?}",
            String::from_utf8_lossy(tag),
            cur.position() - 4,
            String::from_utf8_lossy(&found)
        )));
    }
    Ok(())
}

fn read_header(data: &[u8], limits: Option<&Limits>) -> Result<GrfHeader, TextureError> {
    let header = parse_header(data)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }
    Ok(header)
}

fn check_memory(limits: Option<&Limits>, bytes: usize) -> Result<(), TextureError> {
    match limits {
        Some(limits) => limits.check_memory(bytes),
        None => Ok(()),
    }
}

/// Decode a raw GRF: packed 4-bit indices plus a native palette, both stored verbatim.
pub(crate) fn decode_paletted(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Texture, TextureError> {
    let header = read_header(data, limits)?;
    let mut cur = Cursor::new(data);
    cur.set_position(GFX_CHUNK)?;

    expect_tag(&mut cur, b"GFX ")?;
    cur.skip(4)?;
    let cells = (cur.get_u32_le()? >> 9) as usize;
    let bytes = cells.checked_mul(2).ok_or(TextureError::UnexpectedEof)?;
    check_memory(limits, bytes)?;
    let indices = cur.read_bytes(bytes)?.to_vec();

    let pixels = header.width as usize * header.height as usize;
    if indices.len() < pixels.div_ceil(2) {
        return Err(TextureError::InvalidData(format!(
            "GFX chunk holds {} indices for {}x{} pixels",
            indices.len() * 2,
            header.width,
            header.height
        )));
    }
    stop.check()?;

    expect_tag(&mut cur, b"PAL ")?;
    cur.skip(4)?;
    let entries = (cur.get_u32_le()? >> 9) as usize;
    check_memory(limits, entries.saturating_mul(2))?;
    let palette = cur.read_u16_cells(entries)?;

    Ok(Texture::from_parts(
        header.width,
        header.height,
        TextureData::PalettedGrf(Indexed { indices, palette }),
    ))
}

/// Decode an LZ77 GRF: the block is kept compressed until copied.
pub(crate) fn decode_compressed(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Texture, TextureError> {
    let header = read_header(data, limits)?;
    let mut cur = Cursor::new(data);
    cur.set_position(GFX_CHUNK)?;

    expect_tag(&mut cur, b"GFX ")?;
    // Chunk length covers the header word and the compressed tokens.
    let block_len = cur.get_u32_le()? as usize;
    check_memory(limits, block_len)?;
    let block = cur.read_bytes(block_len)?.to_vec();

    let expanded_cells = lz77::expanded_size(&block)? / 2;
    check_memory(limits, expanded_cells.saturating_mul(2))?;
    stop.check()?;

    Ok(Texture::from_parts(
        header.width,
        header.height,
        TextureData::CompressedGrf(Compressed {
            block,
            expanded_cells,
        }),
    ))
}
