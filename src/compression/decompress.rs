use log::{debug, info, trace};

use super::header::read_header;
use crate::bitstream::bitreader::BitReader;
use crate::error::{CodecError, Result};
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::trie::DecodeTrie;
use crate::tools::cli::HuffOpts;
use crate::tools::data_io::{read_input, show_code_table, write_output};

/// Where the walk through the trie currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    AtRoot,
    AtNode(usize),
}

/// Walk the trie one payload bit at a time, emitting a byte at every leaf, until
/// `total_bytes` bytes are out. Padding after the last code is never read.
pub fn decode_payload(payload: &[u8], trie: &DecodeTrie, total_bytes: u64) -> Result<Vec<u8>> {
    if total_bytes == 0 {
        return Ok(Vec::new());
    }
    let root = trie.root().ok_or(CodecError::InconsistentHeader {
        symbols: 0,
        total_bytes,
    })?;

    // Every byte costs at least one bit, so the payload bounds the output.
    let capacity = total_bytes.min(payload.len() as u64 * 8) as usize;
    let mut out = Vec::with_capacity(capacity);
    let mut br = BitReader::new(payload);
    let mut state = WalkState::AtRoot;

    while (out.len() as u64) < total_bytes {
        let produced = out.len() as u64;
        let bit = br.bit()?.ok_or(CodecError::IncompleteStream {
            expected: total_bytes,
            produced,
        })?;
        let from = match state {
            WalkState::AtRoot => root,
            WalkState::AtNode(at) => at,
        };
        let next = trie
            .step(from, bit)
            .ok_or(CodecError::CorruptCode { produced })?;
        state = match trie.symbol(next) {
            Some(sym) => {
                out.push(sym);
                WalkState::AtRoot
            }
            None => WalkState::AtNode(next),
        };
    }
    trace!("Decoding stopped at payload position {}.", br.loc());
    Ok(out)
}

/// Decode a whole buffer (header followed by payload).
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    decode_parts(data).map(|(out, _)| out)
}

/// Decoded bytes plus the code table the header carried.
fn decode_parts(data: &[u8]) -> Result<(Vec<u8>, CodeTable)> {
    let (header, used) = read_header(data)?;
    let trie = DecodeTrie::rebuild(&header.codes)?;
    debug!(
        "Rebuilt decode trie for {} symbols from a {} layout header.",
        header.codes.len(),
        header.layout
    );
    let out = decode_payload(&data[used..], &trie, header.total_bytes)?;
    info!(
        "Decoded {} payload bytes into {} bytes.",
        data.len() - used,
        out.len()
    );
    Ok((out, header.codes))
}

/// Decode each input file named in opts.
pub fn decompress_file(opts: &HuffOpts) -> Result<()> {
    for fname in &opts.files {
        let data = read_input(fname)?;
        let (decoded, codes) = decode_parts(&data)?;
        let dest = write_output(opts, fname, &decoded)?;
        info!("Decoded {} to {}.", fname, dest);
        for (sym, code) in codes.sorted() {
            debug!("{:#04x} {}", sym, code);
        }
        show_code_table(opts, &codes);
    }
    Ok(())
}
