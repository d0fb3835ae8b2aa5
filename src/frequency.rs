use std::io::{ErrorKind, Read};

use crate::error::{Error, Result};

/// Number of distinct byte values.
pub const SYMBOLS: usize = 256;

/// Occurrence count of every byte value in an input.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; SYMBOLS],
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: [0; SYMBOLS],
        }
    }

    pub fn from_counts(counts: [u32; SYMBOLS]) -> Self {
        Self { counts }
    }

    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Self> {
        let mut table = Self::new();
        table.extend(bytes.as_ref())?;
        Ok(table)
    }

    /// Counts every byte of `reader` until end of stream. The reader is consumed.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut table = Self::new();
        let mut buffer = [0u8; 8192];
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            table.extend(&buffer[..read])?;
        }
        Ok(table)
    }

    fn extend(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            let count = &mut self.counts[byte as usize];
            *count = count.checked_add(1).ok_or(Error::TooLarge {
                what: "symbol count",
                value: *count as u64 + 1,
            })?;
        }
        Ok(())
    }

    pub fn count(&self, byte: u8) -> u32 {
        self.counts[byte as usize]
    }

    pub fn counts(&self) -> &[u32; SYMBOLS] {
        &self.counts
    }

    /// Number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&count| count as u64).sum()
    }

    /// Number of byte values that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.distinct() == 0
    }

    /// Byte values with a nonzero count, in ascending byte order.
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(byte, &count)| (byte as u8, count))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.symbols()).finish()
    }
}
