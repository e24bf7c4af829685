use log::{debug, info, warn};

use super::header::{write_header, HeaderLayout};
use crate::bitstream::bitpacker::BitPacker;
use crate::error::{CodecError, Result};
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::huffman::analyze_and_build_tree;
use crate::tools::cli::HuffOpts;
use crate::tools::data_io::{read_input, show_code_table, write_output};

/// Bit-pack the code of every input byte, in input order. The last byte is zero padded.
pub fn encode_payload(data: &[u8], table: &CodeTable) -> Result<Vec<u8>> {
    let lookup = table.to_lookup();
    // Rough guess; the packer grows as needed.
    let mut bp = BitPacker::new(data.len() / 2 + 1);
    for &byte in data {
        match lookup[byte as usize] {
            Some(code) => bp.out_code(code),
            None => return Err(CodecError::UnknownSymbol(byte)),
        }
    }
    bp.flush();
    debug!(
        "Packed {} bytes into {} payload bytes ({} bits in the last byte).",
        data.len(),
        bp.output.len(),
        bp.last_bits
    );
    Ok(bp.output)
}

/// Encode a whole buffer: header followed by payload, header layout chosen automatically.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    encode_with(data, HeaderLayout::Auto)
}

/// Encode a whole buffer with the given header layout.
pub fn encode_with(data: &[u8], layout: HeaderLayout) -> Result<Vec<u8>> {
    encode_parts(data, layout).map(|(out, _)| out)
}

/// Encoded bytes plus the code table used for them.
fn encode_parts(data: &[u8], layout: HeaderLayout) -> Result<(Vec<u8>, CodeTable)> {
    let (mut out, table) = header_and_codes(data, layout)?;
    let payload = encode_payload(data, &table)?;
    out.extend_from_slice(&payload);

    info!(
        "Encoded {} bytes into {} bytes ({} header, {} payload).",
        data.len(),
        out.len(),
        out.len() - payload.len(),
        payload.len()
    );
    Ok((out, table))
}

/// Only the header encoding would produce.
pub fn code_table_header(data: &[u8], layout: HeaderLayout) -> Result<Vec<u8>> {
    header_and_codes(data, layout).map(|(header, _)| header)
}

/// Build the tree and its codes, and serialize the header.
fn header_and_codes(data: &[u8], layout: HeaderLayout) -> Result<(Vec<u8>, CodeTable)> {
    let tree = analyze_and_build_tree(data);
    let table = tree.code_table();
    if tree.is_empty() {
        info!("Empty input, writing an empty header.");
    } else {
        info!(
            "Found {} symbols, longest code is {} bits.",
            table.len(),
            table.max_len()
        );
    }
    let header = write_header(&table, data.len() as u64, layout)?;
    Ok((header, table))
}

/// Encode each input file named in opts.
pub fn compress_file(opts: &HuffOpts) -> Result<()> {
    for fname in &opts.files {
        let data = read_input(fname)?;
        let (encoded, table) = encode_parts(&data, opts.layout)?;
        if !data.is_empty() && encoded.len() >= data.len() {
            warn!("{} did not get smaller ({} -> {} bytes).", fname, data.len(), encoded.len());
        } else if !data.is_empty() {
            info!(
                "{}: {:.3}:1, {:.2}% saved.",
                fname,
                data.len() as f64 / encoded.len() as f64,
                100.0 * (1.0 - encoded.len() as f64 / data.len() as f64)
            );
        }
        let dest = write_output(opts, fname, &encoded)?;
        show_code_table(opts, &table);
        info!("Encoded {} to {}.", fname, dest);
    }
    Ok(())
}

/// Write only the header of each input file named in opts.
pub fn write_code_table_file(opts: &HuffOpts) -> Result<()> {
    for fname in &opts.files {
        let data = read_input(fname)?;
        let (header, table) = header_and_codes(&data, opts.layout)?;
        let dest = write_output(opts, fname, &header)?;
        show_code_table(opts, &table);
        info!("Wrote the code table of {} to {}.", fname, dest);
    }
    Ok(())
}
