//! The bitstream module is the bit-level I/O subsystem of the codec.
//!
//! - bitpacker: packs codes MSB-first into bytes, zero padding the last byte.
//! - bitreader: reads bits back MSB-first from any `std::io::Read` source.
//!
pub mod bitpacker;
pub mod bitreader;
