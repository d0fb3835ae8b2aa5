use std::io::{Read, Write};

use bitstream_io::{BigEndian, BitWrite, BitWriter, HuffmanWrite};
use tracing::{debug, info};

use crate::{
    code_table::CodeTable,
    container,
    error::{Error, Result},
    frequency::FrequencyTable,
    tree::HuffmanTree,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSummary {
    pub input_len: u64,
    pub distinct_symbols: usize,
    /// Meaningful code bits in the payload, excluding padding.
    pub payload_bits: u64,
    /// `L`, the value written to the trailer.
    pub payload_len: usize,
    pub output_len: usize,
}

/// Holds the counts and the codes derived from them for one input.
pub struct Encoder {
    frequencies: FrequencyTable,
    codes: CodeTable,
}

impl Encoder {
    pub fn new(frequencies: FrequencyTable) -> Result<Self> {
        let tree = HuffmanTree::build(&frequencies)?;
        let codes = CodeTable::from_tree(&tree);
        Ok(Self { frequencies, codes })
    }

    pub fn from_input(input: &[u8]) -> Result<Self> {
        Self::new(FrequencyTable::from_bytes(input)?)
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Packs the codes of `input` MSB first, zero padding the final byte.
    pub fn pack(&self, input: &[u8]) -> Result<Vec<u8>> {
        let tree = self.codes.to_write_tree()?;

        let bits = self.codes.encoded_bits(&self.frequencies);
        let mut payload = Vec::with_capacity(((bits + 7) / 8) as usize);
        let mut writer = BitWriter::endian(&mut payload, BigEndian);
        for &byte in input {
            if self.codes.get(byte).is_none() {
                return Err(Error::UnknownSymbol(byte));
            }
            writer.write_huffman(&tree, byte)?;
        }
        writer.byte_align()?;

        Ok(payload)
    }

    /// Writes header, payload and trailer for `input`, which must be the
    /// input the counts were taken from.
    pub fn encode(&self, input: &[u8]) -> Result<(Vec<u8>, EncodeSummary)> {
        let payload = self.pack(input)?;
        let output = container::write_frame(&self.frequencies, &payload)?;

        let summary = EncodeSummary {
            input_len: input.len() as u64,
            distinct_symbols: self.codes.len(),
            payload_bits: self.codes.encoded_bits(&self.frequencies),
            payload_len: payload.len(),
            output_len: output.len(),
        };
        debug!(?summary, "packed payload");
        Ok((output, summary))
    }
}

/// Encodes `input` into a complete stream.
pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    encode_with_summary(input).map(|(output, _)| output)
}

#[tracing::instrument(skip_all, fields(input_len = input.len()))]
pub fn encode_with_summary(input: &[u8]) -> Result<(Vec<u8>, EncodeSummary)> {
    let encoder = Encoder::from_input(input)?;
    let (output, summary) = encoder.encode(input)?;
    info!(
        payload_len = summary.payload_len,
        output_len = summary.output_len,
        "encoded"
    );
    Ok((output, summary))
}

/// Reads `reader` to the end, encodes it, and writes the whole stream to
/// `writer`. Nothing is written if encoding fails.
pub fn encode_stream<R: Read, W: Write>(mut reader: R, writer: &mut W) -> Result<EncodeSummary> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;

    let (output, summary) = encode_with_summary(&input)?;
    writer.write_all(&output)?;
    writer.flush()?;
    Ok(summary)
}
