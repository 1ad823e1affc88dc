//! Little-endian reader over an in-memory texture file.

use crate::error::TextureError;

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_position(&mut self, pos: usize) -> Result<(), TextureError> {
        if pos > self.data.len() {
            return Err(TextureError::UnexpectedEof);
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), TextureError> {
        let new_pos = self.pos.checked_add(n).ok_or(TextureError::UnexpectedEof)?;
        self.set_position(new_pos)
    }

    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], TextureError> {
        let end = self.pos.checked_add(n).ok_or(TextureError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(TextureError::UnexpectedEof)?;
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], TextureError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    pub(crate) fn get_u16_le(&mut self) -> Result<u16, TextureError> {
        Ok(u16::from_le_bytes(self.read_fixed_bytes()?))
    }

    pub(crate) fn get_u32_le(&mut self) -> Result<u32, TextureError> {
        Ok(u32::from_le_bytes(self.read_fixed_bytes()?))
    }

    /// Read `count` little-endian 16-bit cells.
    pub(crate) fn read_u16_cells(&mut self, count: usize) -> Result<Vec<u16>, TextureError> {
        let len = count.checked_mul(2).ok_or(TextureError::UnexpectedEof)?;
        let bytes = self.read_bytes(len)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xAA];
        let mut cur = Cursor::new(&data);
        assert_eq!(cur.get_u16_le().unwrap(), 0x1234);
        assert_eq!(cur.get_u32_le().unwrap(), 0x1234_5678);
        assert_eq!(cur.read_bytes(1).unwrap(), &[0xAA]);
        assert!(matches!(cur.read_bytes(1), Err(TextureError::UnexpectedEof)));
    }

    #[test]
    fn short_reads_do_not_advance() {
        let data = [1, 2, 3];
        let mut cur = Cursor::new(&data);
        assert!(cur.get_u32_le().is_err());
        assert_eq!(cur.position(), 0);
        assert_eq!(cur.read_u16_cells(1).unwrap(), vec![0x0201]);
        assert!(cur.skip(2).is_err());
        assert!(cur.skip(1).is_ok());
    }
}
