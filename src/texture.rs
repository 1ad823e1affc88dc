use crate::error::TextureError;
use crate::grf::lz77;
use crate::info::TextureKind;

/// Kind of memory a [`Texture::copy`] destination lives in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemoryRegion {
    /// Byte-addressable working memory.
    #[default]
    Ram,
    /// Video memory: only whole 16-bit cells may be written.
    Vram,
}

/// 4-bit indices (two per byte, first pixel in the low nibble) plus a native palette.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Indexed {
    pub(crate) indices: Vec<u8>,
    pub(crate) palette: Vec<u16>,
}

impl Indexed {
    fn expand_into(&self, dst: &mut [u16]) {
        let color = |index: u8| self.palette.get(usize::from(index)).copied().unwrap_or(0);
        for (pair, byte) in dst.chunks_mut(2).zip(&self.indices) {
            pair[0] = color(byte & 0x0F);
            if let Some(second) = pair.get_mut(1) {
                *second = color(byte >> 4);
            }
        }
    }
}

/// An LZ77 block kept compressed until copied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compressed {
    pub(crate) block: Vec<u8>,
    pub(crate) expanded_cells: usize,
}

/// Decoded payload, one shape per [`TextureKind`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TextureData {
    #[default]
    Unknown,
    PalettedBmp(Indexed),
    Bmp(Vec<u16>),
    Png(Vec<u16>),
    PalettedGrf(Indexed),
    CompressedGrf(Compressed),
}

/// A decoded texture, ready to be copied out as native colors.
///
/// Buffers never change length after decoding; effects may rewrite their
/// contents in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    data: TextureData,
}

impl Texture {
    /// Load `stem` + `.png`/`.bmp`/`.grf`, falling back to `fallback`.
    ///
    /// Never fails: when nothing decodes the texture is [`TextureKind::Unknown`].
    pub fn new(
        stem: impl Into<std::path::PathBuf>,
        fallback: impl Into<std::path::PathBuf>,
    ) -> Self {
        crate::TextureRequest::new(stem).fallback(fallback).load()
    }

    /// An inert texture that owns no buffers.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(width: u32, height: u32, data: TextureData) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn kind(&self) -> TextureKind {
        match self.data {
            TextureData::Unknown => TextureKind::Unknown,
            TextureData::PalettedBmp(_) => TextureKind::PalettedBmp,
            TextureData::Bmp(_) => TextureKind::Bmp,
            TextureData::Png(_) => TextureKind::Png,
            TextureData::PalettedGrf(_) => TextureKind::PalettedGrf,
            TextureData::CompressedGrf(_) => TextureKind::CompressedGrf,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.kind() != TextureKind::Unknown
    }

    /// Width in pixels, 0 when not loaded.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels, 0 when not loaded.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &TextureData {
        &self.data
    }

    /// Native palette of paletted textures.
    pub fn palette(&self) -> Option<&[u16]> {
        match &self.data {
            TextureData::PalettedBmp(ix) | TextureData::PalettedGrf(ix) => {
                Some(ix.palette.as_slice())
            }
            _ => None,
        }
    }

    /// Packed 4-bit indices of paletted textures.
    pub fn indices(&self) -> Option<&[u8]> {
        match &self.data {
            TextureData::PalettedBmp(ix) | TextureData::PalettedGrf(ix) => {
                Some(ix.indices.as_slice())
            }
            _ => None,
        }
    }

    /// Native pixels of direct-color textures.
    pub fn bitmap(&self) -> Option<&[u16]> {
        match &self.data {
            TextureData::Bmp(px) | TextureData::Png(px) => Some(px.as_slice()),
            _ => None,
        }
    }

    /// Byte length of the still-compressed block.
    pub fn compressed_len(&self) -> Option<usize> {
        match &self.data {
            TextureData::CompressedGrf(c) => Some(c.block.len()),
            _ => None,
        }
    }

    /// Number of native cells [`Texture::copy`] writes.
    pub fn copy_len(&self) -> usize {
        match &self.data {
            TextureData::Unknown => 0,
            TextureData::PalettedBmp(_) | TextureData::PalettedGrf(_) => {
                self.width as usize * self.height as usize
            }
            TextureData::Bmp(px) | TextureData::Png(px) => px.len(),
            TextureData::CompressedGrf(c) => c.expanded_cells,
        }
    }

    /// Write native pixels into `dst`, returning the number of cells written.
    ///
    /// Paletted textures are expanded through the palette, compressed ones are
    /// decompressed with writes suited to `region`. Unknown textures write
    /// nothing, and so does any call that returns an error.
    pub fn copy(&self, dst: &mut [u16], region: MemoryRegion) -> Result<usize, TextureError> {
        let needed = self.copy_len();
        if dst.len() < needed {
            return Err(TextureError::BufferTooSmall {
                needed,
                actual: dst.len(),
            });
        }
        let dst = &mut dst[..needed];

        match &self.data {
            TextureData::Unknown => {}
            TextureData::PalettedBmp(ix) | TextureData::PalettedGrf(ix) => ix.expand_into(dst),
            TextureData::Bmp(px) | TextureData::Png(px) => dst.copy_from_slice(px),
            TextureData::CompressedGrf(c) => lz77::expand_into(&c.block, dst, region)?,
        }
        Ok(needed)
    }

    /// Run `effect` over the palette. Returns whether the texture has one.
    pub fn apply_palette_effect(&mut self, effect: impl FnOnce(&mut [u16])) -> bool {
        match &mut self.data {
            TextureData::PalettedBmp(ix) | TextureData::PalettedGrf(ix) => {
                effect(ix.palette.as_mut_slice());
                true
            }
            _ => false,
        }
    }

    /// Run `effect` over the direct bitmap. Returns whether the texture has one.
    pub fn apply_bitmap_effect(&mut self, effect: impl FnOnce(&mut [u16])) -> bool {
        match &mut self.data {
            TextureData::Bmp(px) | TextureData::Png(px) => {
                effect(px.as_mut_slice());
                true
            }
            _ => false,
        }
    }

    /// Copy into an [`imgref::ImgVec`] of native colors.
    ///
    /// Returns `None` for unknown textures, or when the expanded data does not
    /// cover `width * height` cells.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> Option<imgref::ImgVec<u16>> {
        let (w, h) = (self.width as usize, self.height as usize);
        if !self.is_loaded() || self.copy_len() < w * h {
            return None;
        }
        let mut cells = vec![0u16; self.copy_len()];
        self.copy(&mut cells, MemoryRegion::Ram).ok()?;
        cells.truncate(w * h);
        Some(imgref::ImgVec::new(cells, w, h))
    }
}
