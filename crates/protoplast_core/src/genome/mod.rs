//! Byte-buffer genome encoding.
//!
//! A genome buffer is the plain concatenation of cell records. Each record
//! starts with a fixed 13-byte header followed by a payload whose size
//! depends on the cell-function tag:
//!
//! ```text
//! [ref distance f32][ref angle f32][color][max conn][exec order][flags][tag][payload..]
//! ```
//!
//! Constructor and injector payloads end in a genome block carrying the
//! nested genome verbatim. Nested genomes stay opaque until asked for with
//! [`decode_sub_genome`] or checked with [`validate`].

mod codec;
mod index;

pub use codec::{decode, decode_sub_genome, encode, validate};
pub use index::{byte_index_to_cell_index, cell_count, cell_index_to_byte_index, cell_offsets};

use crate::error::{DescriptionError, Result};

pub(crate) const HEADER_SIZE: usize = 13;
pub(crate) const TAG_OFFSET: usize = 12;

pub(crate) const FLAG_INPUT_BLOCKED: u8 = 0b01;
pub(crate) const FLAG_OUTPUT_BLOCKED: u8 = 0b10;

pub(crate) const NEURON_PAYLOAD_SIZE: usize = (64 + 8) * 4;
pub(crate) const SENSOR_PAYLOAD_SIZE: usize = 10;
pub(crate) const NERVE_PAYLOAD_SIZE: usize = 2;
pub(crate) const MODE_PAYLOAD_SIZE: usize = 1;
/// Constructor fields preceding its genome block.
pub(crate) const CONSTRUCTOR_FIXED_SIZE: usize = 12;
/// Injector fields preceding its genome block.
pub(crate) const INJECTOR_FIXED_SIZE: usize = 5;

/// Bounds-checked little-endian cursor over a genome buffer.
pub(crate) struct GenomeReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> GenomeReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                DescriptionError::malformed(
                    self.pos,
                    format!(
                        "needs {len} bytes, {} left",
                        self.bytes.len().saturating_sub(self.pos)
                    ),
                )
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(raw))
    }

    pub(crate) fn read_f32(&mut self) -> Result<f32> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        Ok(f32::from_le_bytes(raw))
    }

    /// Reads a genome block: returns `None` for make-copy, else the nested
    /// buffer, followed by the cursor.
    pub(crate) fn read_genome_block(&mut self) -> Result<(Option<&'a [u8]>, u32)> {
        let make_copy = self.read_bool()?;
        let nested = if make_copy {
            None
        } else {
            let len = self.read_u32()? as usize;
            Some(self.take(len)?)
        };
        let cursor = self.read_u32()?;
        Ok((nested, cursor))
    }
}
