//! The huffman module builds the prefix codes.
//!
//! Encoding side: a frequency table becomes a weighted binary tree by greedy minimum-weight
//! merging, and a depth first walk of the tree gives each byte value its code. Ties between
//! equal weights are broken by a fixed order id, so the same input always gives the same codes.
//!
//! Decoding side: the codes read from a header are inserted into a trie, which the decoder
//! walks bit by bit. The frequencies are never needed to decode.
//!

pub mod code_table;
pub mod huffman;
pub mod trie;
