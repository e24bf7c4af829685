//! Header codec. The header carries the code table and the original length, so the decoder
//! can rebuild its trie without the frequencies.
//!
//! All integers are little-endian.
//!
//! ```text
//! [u32 symbol count | layout flag]
//! symbol count times:
//!     packed layout:   [u8 symbol][u64 code with a sentinel 1 bit above its first bit]
//!     explicit layout: [u8 symbol][u8 bit length][ceil(length / 8) bytes of code, MSB-first]
//! [u64 original byte count]
//! ```
//!
//! The packed layout caps codes at 63 bits. Trees over 256 symbols can go deeper than that,
//! so bit 31 of the count word switches to the explicit layout, which holds up to 255 bits.

use log::{debug, trace};
use std::{fmt::Display, fmt::Formatter, str::FromStr};

use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bitreader::BitReader;
use crate::error::{CodecError, Result};
use crate::huffman_coding::code_table::{Code, CodeTable};

/// Longest code the sentinel-packed 64 bit field can hold.
pub const MAX_PACKED_CODE_LEN: usize = 63;
/// Longest code the explicit layout can hold.
pub const MAX_EXPLICIT_CODE_LEN: usize = u8::MAX as usize;
/// Symbol count word bit selecting the explicit layout.
const EXPLICIT_LAYOUT_FLAG: u32 = 0x8000_0000;
const MAX_SYMBOLS: usize = 256;

/// How the writer stores codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderLayout {
    /// Packed when every code fits in 63 bits, explicit otherwise.
    #[default]
    Auto,
    /// Sentinel-packed u64 per code.
    Packed,
    /// Length byte followed by the code bits.
    Explicit,
}

impl Display for HeaderLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for HeaderLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(HeaderLayout::Auto),
            "packed" => Ok(HeaderLayout::Packed),
            "explicit" => Ok(HeaderLayout::Explicit),
            other => Err(format!(
                "unknown header layout {:?} (expected auto, packed or explicit)",
                other
            )),
        }
    }
}

/// A decoded header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub codes: CodeTable,
    pub total_bytes: u64,
    /// Layout the header was stored in, Packed or Explicit.
    pub layout: HeaderLayout,
}

/// Store a code as an integer with a 1 bit placed above its first bit. None if the code is
/// empty or longer than 63 bits.
pub fn pack_code(code: &Code) -> Option<u64> {
    if code.is_empty() || code.len() > MAX_PACKED_CODE_LEN {
        return None;
    }
    Some(
        code.bits()
            .iter()
            .fold(1_u64, |acc, &bit| (acc << 1) | bit as u64),
    )
}

/// Inverse of pack_code: peel bits off the bottom until only the sentinel is left, then
/// reverse them. None if the value holds no code bits.
pub fn unpack_code(mut packed: u64) -> Option<Code> {
    if packed <= 1 {
        return None;
    }
    let mut bits = Vec::with_capacity(MAX_PACKED_CODE_LEN);
    while packed != 1 {
        bits.push(packed & 1 == 1);
        packed >>= 1;
    }
    bits.reverse();
    Some(Code::from_bits(bits))
}

/// Serialize the code table and original length.
pub fn write_header(table: &CodeTable, total_bytes: u64, layout: HeaderLayout) -> Result<Vec<u8>> {
    let entries = table.sorted();
    let longest = entries.iter().max_by_key(|(_, c)| c.len());

    let layout = match layout {
        HeaderLayout::Auto if table.max_len() > MAX_PACKED_CODE_LEN => HeaderLayout::Explicit,
        HeaderLayout::Auto => HeaderLayout::Packed,
        chosen => chosen,
    };
    let max = match layout {
        HeaderLayout::Explicit => MAX_EXPLICIT_CODE_LEN,
        _ => MAX_PACKED_CODE_LEN,
    };
    if let Some((symbol, code)) = longest {
        if code.len() > max {
            return Err(CodecError::CodeTooLong {
                symbol: *symbol,
                len: code.len(),
                max,
            });
        }
    }

    if let Some((symbol, _)) = entries.iter().find(|(_, c)| c.is_empty()) {
        return Err(CodecError::malformed(format!(
            "symbol {:#04x} has an empty code",
            symbol
        )));
    }

    let mut count = entries.len() as u32;
    if layout == HeaderLayout::Explicit {
        count |= EXPLICIT_LAYOUT_FLAG;
    }

    let mut out = Vec::with_capacity(12 + entries.len() * 9);
    out.extend_from_slice(&count.to_le_bytes());
    for (symbol, code) in &entries {
        out.push(*symbol);
        if layout == HeaderLayout::Explicit {
            out.push(code.len() as u8);
            let mut bp = BitPacker::new(code.len().div_ceil(8));
            bp.out_code(code);
            out.extend(bp.finish());
        } else {
            let packed = pack_code(code).ok_or(CodecError::CodeTooLong {
                symbol: *symbol,
                len: code.len(),
                max,
            })?;
            out.extend_from_slice(&packed.to_le_bytes());
        }
    }
    out.extend_from_slice(&total_bytes.to_le_bytes());

    debug!(
        "Wrote {} layout header: {} symbols, {} bytes of input, {} header bytes.",
        layout,
        entries.len(),
        total_bytes,
        out.len()
    );
    Ok(out)
}

/// Bounds checked reader over the header bytes.
struct HeaderCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderCursor<'a> {
    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.bytes.len());
        match end {
            Some(end) => {
                let bytes = self.bytes;
                let slice = &bytes[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(CodecError::malformed(format!(
                "truncated reading {} at byte {} of {}",
                what,
                self.pos,
                self.bytes.len()
            ))),
        }
    }

    fn u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        let mut word = [0_u8; 4];
        word.copy_from_slice(self.take(4, what)?);
        Ok(u32::from_le_bytes(word))
    }

    fn u64(&mut self, what: &str) -> Result<u64> {
        let mut word = [0_u8; 8];
        word.copy_from_slice(self.take(8, what)?);
        Ok(u64::from_le_bytes(word))
    }
}

/// Parse a header from the start of `bytes`. Returns the header and the number of bytes it
/// occupied; the payload starts right after.
pub fn read_header(bytes: &[u8]) -> Result<(Header, usize)> {
    let mut cursor = HeaderCursor { bytes, pos: 0 };

    let word = cursor.u32("symbol count")?;
    let layout = if word & EXPLICIT_LAYOUT_FLAG != 0 {
        HeaderLayout::Explicit
    } else {
        HeaderLayout::Packed
    };
    let count = (word & !EXPLICIT_LAYOUT_FLAG) as usize;
    if count > MAX_SYMBOLS {
        return Err(CodecError::malformed(format!(
            "{} symbols declared, at most {} exist",
            count, MAX_SYMBOLS
        )));
    }
    trace!("Reading {} layout header with {} symbols.", layout, count);

    let mut codes = CodeTable::new();
    for _ in 0..count {
        let symbol = cursor.u8("symbol")?;
        let code = match layout {
            HeaderLayout::Explicit => {
                let len = cursor.u8("code length")? as usize;
                if len == 0 {
                    return Err(CodecError::malformed(format!(
                        "zero length code for symbol {:#04x}",
                        symbol
                    )));
                }
                let raw = cursor.take(len.div_ceil(8), "code bits")?;
                let mut br = BitReader::with_capacity(raw, raw.len());
                let mut bits = Vec::with_capacity(len);
                for _ in 0..len {
                    match br.bit()? {
                        Some(bit) => bits.push(bit),
                        None => return Err(CodecError::malformed("code bits ran short")),
                    }
                }
                // The rest of the last code byte must be zero padding.
                let pad = raw.len() * 8 - len;
                match br.bint(pad)? {
                    Some(0) => {}
                    _ => {
                        return Err(CodecError::malformed(format!(
                            "non-zero padding after the code of symbol {:#04x} at {}",
                            symbol,
                            br.loc()
                        )))
                    }
                }
                Code::from_bits(bits)
            }
            _ => {
                let packed = cursor.u64("packed code")?;
                unpack_code(packed).ok_or_else(|| {
                    CodecError::malformed(format!(
                        "packed code {:#x} for symbol {:#04x} holds no bits",
                        packed, symbol
                    ))
                })?
            }
        };
        if codes.insert(symbol, code).is_some() {
            return Err(CodecError::malformed(format!(
                "symbol {:#04x} declared twice",
                symbol
            )));
        }
    }

    let total_bytes = cursor.u64("byte count")?;
    if count == 0 && total_bytes != 0 {
        return Err(CodecError::InconsistentHeader {
            symbols: 0,
            total_bytes,
        });
    }

    debug!(
        "Read header: {} symbols, {} bytes of output expected, payload at byte {}.",
        count, total_bytes, cursor.pos
    );
    Ok((
        Header {
            codes,
            total_bytes,
            layout,
        },
        cursor.pos,
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::huffman_coding::huffman::{analyze_and_build_tree, HuffmanTree};
    use crate::tools::freq_count::FrequencyTable;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    fn fibonacci_table() -> CodeTable {
        let mut counts = [0_u64; 256];
        let (mut a, mut b) = (1_u64, 1_u64);
        for count in counts.iter_mut().take(70) {
            *count = a;
            let next = a + b;
            a = b;
            b = next;
        }
        HuffmanTree::from_freqs(&FrequencyTable::from_counts(counts)).code_table()
    }

    #[test]
    fn sentinel_pack_test() {
        assert_eq!(pack_code(&code("0")), Some(0b10));
        assert_eq!(pack_code(&code("0011")), Some(0b10011));
        assert_eq!(pack_code(&code("")), None);
        assert_eq!(pack_code(&code(&"1".repeat(63))), Some(u64::MAX));
        assert_eq!(pack_code(&code(&"1".repeat(64))), None);
        assert_eq!(unpack_code(0b10011), Some(code("0011")));
        assert_eq!(unpack_code(u64::MAX), Some(code(&"1".repeat(63))));
        assert_eq!(unpack_code(1), None);
        assert_eq!(unpack_code(0), None);
    }

    #[test]
    fn single_symbol_bytes_test() {
        let table: CodeTable = [(0x41, code("0"))].into_iter().collect();
        let bytes = write_header(&table, 4, HeaderLayout::Auto).unwrap();
        let mut expect = vec![1, 0, 0, 0, 0x41];
        expect.extend_from_slice(&2_u64.to_le_bytes());
        expect.extend_from_slice(&4_u64.to_le_bytes());
        assert_eq!(bytes, expect);
    }

    #[test]
    fn empty_header_test() {
        let bytes = write_header(&CodeTable::new(), 0, HeaderLayout::Auto).unwrap();
        assert_eq!(bytes, vec![0; 12]);
        let (header, used) = read_header(&bytes).unwrap();
        assert!(header.codes.is_empty());
        assert_eq!(header.total_bytes, 0);
        assert_eq!(used, 12);
    }

    #[test]
    fn packed_round_trip_test() {
        let table = analyze_and_build_tree("she sells sea shells by the sea shore".as_bytes())
            .code_table();
        let mut bytes = write_header(&table, 37, HeaderLayout::Packed).unwrap();
        let header_len = bytes.len();
        assert_eq!(header_len, 4 + table.len() * 9 + 8);
        // Payload bytes after the header are not part of it.
        bytes.extend_from_slice(&[0xde, 0xad]);
        let (header, used) = read_header(&bytes).unwrap();
        assert_eq!(used, header_len);
        assert_eq!(header.codes, table);
        assert_eq!(header.total_bytes, 37);
        assert_eq!(header.layout, HeaderLayout::Packed);
    }

    #[test]
    fn explicit_round_trip_test() {
        let table: CodeTable = [(0, code("0")), (9, code("10")), (255, code("11"))]
            .into_iter()
            .collect();
        let bytes = write_header(&table, 1 << 40, HeaderLayout::Explicit).unwrap();
        assert_eq!(&bytes[..4], &[3, 0, 0, 0x80]);
        assert_eq!(&bytes[4..7], &[0, 1, 0b0000_0000]);
        assert_eq!(&bytes[7..10], &[9, 2, 0b1000_0000]);
        let (header, used) = read_header(&bytes).unwrap();
        assert_eq!(used, bytes.len());
        assert_eq!(header.codes, table);
        assert_eq!(header.total_bytes, 1 << 40);
        assert_eq!(header.layout, HeaderLayout::Explicit);
    }

    #[test]
    fn long_codes_test() {
        let table = fibonacci_table();
        assert!(table.max_len() > MAX_PACKED_CODE_LEN);

        let forced = write_header(&table, 99, HeaderLayout::Packed);
        assert!(matches!(
            forced,
            Err(CodecError::CodeTooLong { len: 69, max: 63, .. })
        ));

        let bytes = write_header(&table, 99, HeaderLayout::Auto).unwrap();
        let (header, _) = read_header(&bytes).unwrap();
        assert_eq!(header.layout, HeaderLayout::Explicit);
        assert_eq!(header.codes, table);
    }

    #[test]
    fn truncated_test() {
        let table = analyze_and_build_tree("abcabd".as_bytes()).code_table();
        let bytes = write_header(&table, 6, HeaderLayout::Auto).unwrap();
        for cut in 0..bytes.len() {
            assert!(matches!(
                read_header(&bytes[..cut]),
                Err(CodecError::MalformedHeader(_))
            ));
        }
    }

    #[test]
    fn bad_counts_test() {
        let mut too_many = 257_u32.to_le_bytes().to_vec();
        too_many.extend_from_slice(&[0; 64]);
        assert!(matches!(
            read_header(&too_many),
            Err(CodecError::MalformedHeader(_))
        ));

        let mut inconsistent = vec![0, 0, 0, 0];
        inconsistent.extend_from_slice(&5_u64.to_le_bytes());
        assert!(matches!(
            read_header(&inconsistent),
            Err(CodecError::InconsistentHeader { total_bytes: 5, .. })
        ));
    }

    #[test]
    fn bad_codes_test() {
        // Packed code 1 is a bare sentinel.
        let mut bare = vec![1, 0, 0, 0, 7];
        bare.extend_from_slice(&1_u64.to_le_bytes());
        bare.extend_from_slice(&3_u64.to_le_bytes());
        assert!(matches!(read_header(&bare), Err(CodecError::MalformedHeader(_))));

        // Same symbol twice.
        let mut twice = vec![2, 0, 0, 0];
        for packed in [0b10_u64, 0b11] {
            twice.push(7);
            twice.extend_from_slice(&packed.to_le_bytes());
        }
        twice.extend_from_slice(&3_u64.to_le_bytes());
        assert!(matches!(read_header(&twice), Err(CodecError::MalformedHeader(_))));

        // Explicit code of length zero.
        let mut zero = vec![1, 0, 0, 0x80, 7, 0];
        zero.extend_from_slice(&3_u64.to_le_bytes());
        assert!(matches!(read_header(&zero), Err(CodecError::MalformedHeader(_))));
    }

    #[test]
    fn explicit_padding_test() {
        // Code "10" stored as 0b1000_0000 is fine, stray bits after it are not.
        for (last, ok) in [(0b1000_0000_u8, true), (0b1000_0001, false), (0b1010_0000, false)] {
            let mut bytes = vec![2, 0, 0, 0x80, 7, 1, 0b0000_0000, 9, 2, last];
            bytes.extend_from_slice(&3_u64.to_le_bytes());
            let result = read_header(&bytes);
            if ok {
                let (header, _) = result.unwrap();
                assert_eq!(header.codes.get(9), Some(&code("10")));
            } else {
                assert!(matches!(result, Err(CodecError::MalformedHeader(_))));
            }
        }
    }

    #[test]
    fn random_tables_round_trip_test() {
        let mut rng = StdRng::seed_from_u64(0xc0de);
        for _ in 0..200 {
            let mut counts = [0_u64; 256];
            let present = rng.gen_range(1..=256);
            for _ in 0..present {
                counts[rng.gen::<u8>() as usize] += rng.gen_range(1..10_000);
            }
            let table = HuffmanTree::from_freqs(&FrequencyTable::from_counts(counts)).code_table();
            let total = rng.gen::<u64>() | 1;
            for layout in [HeaderLayout::Packed, HeaderLayout::Explicit] {
                let bytes = write_header(&table, total, layout).unwrap();
                let (header, used) = read_header(&bytes).unwrap();
                assert_eq!(used, bytes.len());
                assert_eq!(header.codes, table);
                assert_eq!(header.total_bytes, total);
                assert_eq!(header.layout, layout);
            }
        }
    }

    #[test]
    fn layout_parse_test() {
        assert_eq!("auto".parse::<HeaderLayout>(), Ok(HeaderLayout::Auto));
        assert_eq!("Packed".parse::<HeaderLayout>(), Ok(HeaderLayout::Packed));
        assert_eq!("explicit".parse::<HeaderLayout>(), Ok(HeaderLayout::Explicit));
        assert!("sideways".parse::<HeaderLayout>().is_err());
    }
}
