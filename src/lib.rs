//! # huffpack
//!
//! Static Huffman compression of byte streams.
//!
//! ```rust
//! let encoded = huffpack::encode(b"aaab")?;
//! assert_eq!(huffpack::decode(&encoded)?, b"aaab");
//! # Ok::<(), huffpack::Error>(())
//! ```

pub mod code_table;
pub mod container;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod logging;
pub mod tree;

mod min_heap;

pub use code_table::{Code, CodeTable};
pub use decoder::{decode, decode_stream, inspect, StreamInfo};
pub use encoder::{encode, encode_stream, encode_with_summary, EncodeSummary, Encoder};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use tree::HuffmanTree;
