use std::io::{Cursor, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader};
use tracing::{debug, info};

use crate::{
    code_table::CodeTable,
    container::{self, Frame},
    error::{Error, Result},
    tree::HuffmanTree,
};

/// Framing details of an encoded stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Number of bytes the stream decodes to.
    pub symbols: u64,
    pub distinct_symbols: usize,
    pub payload_len: usize,
    /// Meaningful bits in the payload; the rest of the final byte is padding.
    pub payload_bits: u64,
    pub tree_depth: usize,
}

struct Prepared<'a> {
    frame: Frame<'a>,
    tree: HuffmanTree,
    bits: u64,
}

fn prepare(data: &[u8]) -> Result<Prepared<'_>> {
    let frame = container::read_frame(data)?;
    let tree = match HuffmanTree::build(&frame.frequencies) {
        Err(Error::EmptyAlphabet) => {
            return Err(Error::corrupt("frequency table has no symbols"));
        }
        result => result?,
    };

    // The counts fix every code length, so they also fix how many payload
    // bits carry data. Only those are walked.
    let bits = CodeTable::from_tree(&tree).encoded_bits(&frame.frequencies);
    let needed = (bits + 7) / 8;
    if needed != frame.payload.len() as u64 {
        return Err(Error::corrupt(format!(
            "payload is {} bytes but the counts need {needed}",
            frame.payload.len()
        )));
    }

    Ok(Prepared { frame, tree, bits })
}

/// Validates the framing of an encoded stream without decoding it.
pub fn inspect(data: &[u8]) -> Result<StreamInfo> {
    let Prepared { frame, tree, bits } = prepare(data)?;
    Ok(StreamInfo {
        symbols: frame.frequencies.total(),
        distinct_symbols: frame.frequencies.distinct(),
        payload_len: frame.payload.len(),
        payload_bits: bits,
        tree_depth: tree.depth(),
    })
}

#[tracing::instrument(skip_all, fields(input_len = data.len()))]
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let Prepared { frame, tree, bits } = prepare(data)?;
    let total = frame.frequencies.total();
    debug!(payload_len = frame.payload.len(), bits, total, "decoding payload");

    let mut output = Vec::with_capacity(total as usize);
    let mut reader = BitReader::endian(Cursor::new(frame.payload), BigEndian);
    let mut walker = tree.walker();
    for _ in 0..bits {
        if let Some(byte) = walker.step(reader.read_bit()?)? {
            output.push(byte);
        }
    }

    if !walker.at_root() {
        return Err(Error::corrupt("payload ends inside a code"));
    }
    if output.len() as u64 != total {
        return Err(Error::corrupt(format!(
            "decoded {} bytes but the counts sum to {total}",
            output.len()
        )));
    }

    info!(output_len = output.len(), "decoded");
    Ok(output)
}

/// Reads a whole encoded stream from `reader` and writes the decoded bytes
/// to `writer`. Nothing is written if decoding fails.
pub fn decode_stream<R: Read, W: Write>(mut reader: R, writer: &mut W) -> Result<usize> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let output = decode(&data)?;
    writer.write_all(&output)?;
    writer.flush()?;
    Ok(output.len())
}
