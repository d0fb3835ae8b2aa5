//! Byte layout of an encoded stream:
//!
//! | Offset     | Size       | Field                                       |
//! |------------|------------|---------------------------------------------|
//! | 0          | 1024       | 256 little-endian `u32` counts, byte order  |
//! | 1024       | `L`        | packed code bits, MSB first, zero padded    |
//! | 1024 + `L` | 4          | `L` as a little-endian `u32`                |

use binary_rw::{BinaryReader, BinaryWriter, Endian, MemoryStream};

use crate::{
    error::{Error, Result},
    frequency::{FrequencyTable, SYMBOLS},
};

pub const HEADER_LEN: usize = SYMBOLS * 4;
pub const TRAILER_LEN: usize = 4;

const ENDIAN: Endian = Endian::Little;

/// A parsed stream: the counts and the still-packed payload.
#[derive(Debug)]
pub struct Frame<'a> {
    pub frequencies: FrequencyTable,
    pub payload: &'a [u8],
}

pub fn write_frame(frequencies: &FrequencyTable, payload: &[u8]) -> Result<Vec<u8>> {
    let payload_len = u32::try_from(payload.len()).map_err(|_| Error::TooLarge {
        what: "payload length",
        value: payload.len() as u64,
    })?;

    let mut stream = MemoryStream::new();
    let mut writer = BinaryWriter::new(&mut stream, ENDIAN);
    for &count in frequencies.counts() {
        writer.write_u32(count)?;
    }
    writer.write_bytes(payload)?;
    writer.write_u32(payload_len)?;

    Ok(stream.into())
}

pub fn read_frame(data: &[u8]) -> Result<Frame<'_>> {
    let minimum = HEADER_LEN + TRAILER_LEN;
    if data.len() < minimum {
        return Err(Error::TruncatedInput {
            expected: minimum,
            actual: data.len(),
        });
    }

    let payload_len = read_trailer(data)? as usize;
    let expected = minimum as u64 + payload_len as u64;
    if (data.len() as u64) < expected {
        return Err(Error::TruncatedInput {
            expected: expected as usize,
            actual: data.len(),
        });
    }
    if data.len() as u64 > expected {
        return Err(Error::corrupt(format!(
            "trailer gives a payload of {payload_len} bytes but {} bytes follow the header",
            data.len() - minimum
        )));
    }

    Ok(Frame {
        frequencies: read_header(data)?,
        payload: &data[HEADER_LEN..HEADER_LEN + payload_len],
    })
}

fn read_trailer(data: &[u8]) -> Result<u32> {
    let mut stream = MemoryStream::from(data[data.len() - TRAILER_LEN..].to_vec());
    let mut reader = BinaryReader::new(&mut stream, ENDIAN);
    Ok(reader.read_u32()?)
}

fn read_header(data: &[u8]) -> Result<FrequencyTable> {
    let mut stream = MemoryStream::from(data[..HEADER_LEN].to_vec());
    let mut reader = BinaryReader::new(&mut stream, ENDIAN);

    let mut counts = [0u32; SYMBOLS];
    for count in counts.iter_mut() {
        *count = reader.read_u32()?;
    }
    Ok(FrequencyTable::from_counts(counts))
}
