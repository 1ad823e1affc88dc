//! LZ77 (type `0x10`) expansion into native cells.
//!
//! Block layout: a little-endian header word `(expanded_bytes << 8) | 0x10`,
//! then groups of up to eight tokens, each group led by a flag byte read
//! from its most significant bit. A clear bit is one literal byte; a set bit
//! is a two-byte back reference copying `(b0 >> 4) + 3` bytes from
//! `(((b0 & 0xF) << 8) | b1) + 1` bytes behind the write position.

use crate::error::TextureError;
use crate::texture::MemoryRegion;

/// Compression type of an LZ77 block (high nibble of the header byte).
pub(crate) const LZ77_TYPE: u8 = 0x10;

/// Destination for expanded bytes.
pub(crate) trait Lz77Sink {
    /// Bytes written so far.
    fn written(&self) -> usize;
    fn push(&mut self, byte: u8);
    /// Re-read a byte at `pos < written()`.
    fn byte_at(&self, pos: usize) -> u8;
}

/// Byte-addressable destination: every byte lands in its cell immediately.
struct ByteSink<'a> {
    cells: &'a mut [u16],
    len: usize,
}

impl Lz77Sink for ByteSink<'_> {
    fn written(&self) -> usize {
        self.len
    }

    fn push(&mut self, byte: u8) {
        let cell = &mut self.cells[self.len / 2];
        let mut bytes = cell.to_le_bytes();
        bytes[self.len % 2] = byte;
        *cell = u16::from_le_bytes(bytes);
        self.len += 1;
    }

    fn byte_at(&self, pos: usize) -> u8 {
        self.cells[pos / 2].to_le_bytes()[pos % 2]
    }
}

/// Halfword-only destination: a low byte is held back until its partner arrives.
struct HalfwordSink<'a> {
    cells: &'a mut [u16],
    len: usize,
    pending: u8,
}

impl HalfwordSink<'_> {
    fn flush(&mut self) {
        if self.len % 2 == 1 {
            self.cells[self.len / 2] = u16::from(self.pending);
        }
    }
}

impl Lz77Sink for HalfwordSink<'_> {
    fn written(&self) -> usize {
        self.len
    }

    fn push(&mut self, byte: u8) {
        if self.len % 2 == 0 {
            self.pending = byte;
        } else {
            self.cells[self.len / 2] = u16::from_le_bytes([self.pending, byte]);
        }
        self.len += 1;
    }

    fn byte_at(&self, pos: usize) -> u8 {
        if self.len % 2 == 1 && pos == self.len - 1 {
            self.pending
        } else {
            self.cells[pos / 2].to_le_bytes()[pos % 2]
        }
    }
}

/// Counts output without storing it, to check a block before writing.
struct CountingSink {
    len: usize,
}

impl Lz77Sink for CountingSink {
    fn written(&self) -> usize {
        self.len
    }

    fn push(&mut self, _byte: u8) {
        self.len += 1;
    }

    fn byte_at(&self, _pos: usize) -> u8 {
        0
    }
}

/// Read the header word, returning the expanded size in bytes.
pub(crate) fn expanded_size(block: &[u8]) -> Result<usize, TextureError> {
    let header: [u8; 4] = block
        .get(..4)
        .and_then(|h| h.try_into().ok())
        .ok_or(TextureError::UnexpectedEof)?;
    if header[0] & 0xF0 != LZ77_TYPE {
        return Err(TextureError::UnsupportedVariant(format!(
            "compression type {:#04x} is not LZ77",
            header[0] & 0xF0
        )));
    }
    Ok((u32::from_le_bytes(header) >> 8) as usize)
}

/// Expand tokens after the header until `size` bytes were produced.
pub(crate) fn decompress<S: Lz77Sink>(
    block: &[u8],
    sink: &mut S,
    size: usize,
) -> Result<(), TextureError> {
    let mut src = block.get(4..).ok_or(TextureError::UnexpectedEof)?.iter();
    let mut next = || src.next().copied().ok_or(TextureError::UnexpectedEof);

    while sink.written() < size {
        let flags = next()?;
        for bit in (0..8).rev() {
            if sink.written() >= size {
                break;
            }
            if flags & (1 << bit) == 0 {
                sink.push(next()?);
                continue;
            }

            let b0 = next()?;
            let b1 = next()?;
            let len = usize::from(b0 >> 4) + 3;
            let disp = ((usize::from(b0 & 0x0F) << 8) | usize::from(b1)) + 1;
            let start = sink.written().checked_sub(disp).ok_or_else(|| {
                TextureError::InvalidData(format!(
                    "LZ77 back reference {disp} before start of output at {}",
                    sink.written()
                ))
            })?;
            for i in 0..len {
                if sink.written() >= size {
                    break;
                }
                let byte = sink.byte_at(start + i);
                sink.push(byte);
            }
        }
    }
    Ok(())
}

/// Expand an LZ77 block into `dst`, filling exactly `dst.len()` cells.
///
/// The block must hold at least `dst.len()` cells of output. A malformed
/// token stream is found before anything is written, so `dst` is untouched
/// on error.
pub(crate) fn expand_into(
    block: &[u8],
    dst: &mut [u16],
    region: MemoryRegion,
) -> Result<(), TextureError> {
    let available = expanded_size(block)? / 2;
    if available < dst.len() {
        return Err(TextureError::InvalidData(format!(
            "LZ77 block expands to {available} cells, {} expected",
            dst.len()
        )));
    }
    let size = dst.len() * 2;
    decompress(block, &mut CountingSink { len: 0 }, size)?;

    match region {
        MemoryRegion::Ram => {
            let mut sink = ByteSink { cells: dst, len: 0 };
            decompress(block, &mut sink, size)
        }
        MemoryRegion::Vram => {
            let mut sink = HalfwordSink {
                cells: dst,
                len: 0,
                pending: 0,
            };
            decompress(block, &mut sink, size)?;
            sink.flush();
            Ok(())
        }
    }
}
