//! The compression module drives encoding and decoding of whole buffers and files.
//!
//! Encoding happens in the following steps:
//! - Frequency count: how often each byte value occurs.
//! - Huffman tree: merge the two lightest nodes until one is left.
//! - Code table: walk the tree, 0 for left and 1 for right.
//! - Header: the code table and the input length.
//! - Payload: the code of every input byte, bit-packed MSB-first.
//!
//! Decoding is the inverse: read the header, rebuild a trie from its codes and walk the trie
//! over the payload until the recorded number of bytes is out.
//!
//! The whole input is held in memory; there is no streaming mode.
//!

pub mod compress;
pub mod decompress;
pub mod header;
