//! Byte oriented Huffman compression.
//!
//! Builds a Huffman tree over the 256 byte values of an input, stores the resulting code
//! table in a compact header and bit-packs the input after it. Decoding rebuilds a trie
//! from the header and expands the payload until the recorded number of bytes is out.
//!
//! Basic usage to encode a file is as follows:
//!
//! `$> huffpack -z test.txt`
//!
//! This will create the file test.txt-encoded. `huffpack -d test.txt-encoded` writes
//! test.txt-encoded-decoded.
//!
//! From code:
//!
//! ```
//! let packed = huffpack::encode(b"abracadabra").unwrap();
//! assert_eq!(huffpack::decode(&packed).unwrap(), b"abracadabra");
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{encode, encode_payload, encode_with};
pub use compression::decompress::{decode, decode_payload};
pub use compression::header::{read_header, write_header, Header, HeaderLayout};
pub use error::{CodecError, Result};
pub use huffman_coding::code_table::{Code, CodeTable};
pub use huffman_coding::huffman::{analyze_and_build_tree, HuffmanTree};
pub use huffman_coding::trie::DecodeTrie;
pub use tools::freq_count::{freqs, FrequencyTable};
