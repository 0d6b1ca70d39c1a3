//! Cursor mapping between byte offsets and cell indices.
//!
//! These walk record sizes only; payloads are skipped, never decoded.
//! Single lookups scan linearly; use [`cell_offsets`] to visit every record.

use super::{
    GenomeReader, CONSTRUCTOR_FIXED_SIZE, INJECTOR_FIXED_SIZE, MODE_PAYLOAD_SIZE,
    NERVE_PAYLOAD_SIZE, NEURON_PAYLOAD_SIZE, SENSOR_PAYLOAD_SIZE, TAG_OFFSET,
};
use crate::error::{DescriptionError, Result};
use protoplast_data::CellFunctionType;

fn skip_record(reader: &mut GenomeReader<'_>) -> Result<()> {
    let start = reader.position();
    reader.skip(TAG_OFFSET)?;
    let tag = reader.read_u8()?;
    if tag == 0 {
        return Ok(());
    }
    let function_type = CellFunctionType::from_u8(tag).ok_or_else(|| {
        DescriptionError::malformed(start + TAG_OFFSET, format!("unknown cell function tag {tag}"))
    })?;
    match function_type {
        CellFunctionType::Neuron => reader.skip(NEURON_PAYLOAD_SIZE),
        CellFunctionType::Transmitter | CellFunctionType::Attacker | CellFunctionType::Muscle => {
            reader.skip(MODE_PAYLOAD_SIZE)
        }
        CellFunctionType::Sensor => reader.skip(SENSOR_PAYLOAD_SIZE),
        CellFunctionType::Nerve => reader.skip(NERVE_PAYLOAD_SIZE),
        CellFunctionType::Constructor => {
            reader.skip(CONSTRUCTOR_FIXED_SIZE)?;
            reader.read_genome_block().map(|_| ())
        }
        CellFunctionType::Injector => {
            reader.skip(INJECTOR_FIXED_SIZE)?;
            reader.read_genome_block().map(|_| ())
        }
        CellFunctionType::Placeholder1 | CellFunctionType::Placeholder2 => Ok(()),
    }
}

/// Index of the first cell starting at or after `byte_index`.
///
/// Byte indices at or past the end map to the cell count.
pub fn byte_index_to_cell_index(bytes: &[u8], byte_index: usize) -> Result<usize> {
    let mut reader = GenomeReader::new(bytes);
    let mut cell_index = 0;
    while !reader.is_exhausted() && reader.position() < byte_index {
        skip_record(&mut reader)?;
        cell_index += 1;
    }
    Ok(cell_index)
}

/// Byte offset at which cell `cell_index` starts.
///
/// Cell indices at or past the cell count map to the buffer length.
pub fn cell_index_to_byte_index(bytes: &[u8], cell_index: usize) -> Result<usize> {
    let mut reader = GenomeReader::new(bytes);
    for _ in 0..cell_index {
        if reader.is_exhausted() {
            break;
        }
        skip_record(&mut reader)?;
    }
    Ok(reader.position())
}

/// Start offset of every record, in one walk over the buffer.
pub fn cell_offsets(bytes: &[u8]) -> Result<Vec<usize>> {
    let mut reader = GenomeReader::new(bytes);
    let mut offsets = Vec::new();
    while !reader.is_exhausted() {
        offsets.push(reader.position());
        skip_record(&mut reader)?;
    }
    Ok(offsets)
}

pub fn cell_count(bytes: &[u8]) -> Result<usize> {
    let mut reader = GenomeReader::new(bytes);
    let mut count = 0;
    while !reader.is_exhausted() {
        skip_record(&mut reader)?;
        count += 1;
    }
    Ok(count)
}
