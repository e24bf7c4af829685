//! The tools module provides helpers around the codec.
//!
//! The tools are:
//! - cli: Command line interface and options.
//! - data_io: Whole-file input and output.
//! - freq_count: Frequency count of the input bytes.
//!
pub mod cli;
pub mod data_io;
pub mod freq_count;
