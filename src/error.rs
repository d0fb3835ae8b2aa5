use bitstream_io::huffman::HuffmanTreeError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Input contains no symbols to encode")]
    EmptyAlphabet,

    #[error("Tried to extract from an empty priority queue")]
    EmptyQueue,

    #[error("Priority queue is full ({capacity} entries)")]
    QueueFull { capacity: usize },

    #[error("Byte {0:#04x} has no code in the table")]
    UnknownSymbol(u8),

    #[error("Corrupt stream: {0}")]
    CorruptStream(String),

    #[error("Truncated input: expected at least {expected} bytes, got {actual}")]
    TruncatedInput { expected: usize, actual: usize },

    #[error("{what} of {value} does not fit in a 4-byte field")]
    TooLarge { what: &'static str, value: u64 },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Binary(#[from] binary_rw::BinaryError),

    #[error("Invalid code table: {0}")]
    CodeTable(#[from] HuffmanTreeError),
}

impl Error {
    pub(crate) fn corrupt<S: Into<String>>(message: S) -> Self {
        Error::CorruptStream(message.into())
    }
}
