//! BitReader: reads a packed bitstream MSB-first.
//!
//! NOTE: This module can read from any I/O source that supports the read() call.
//!
use std::io;

const BUFFER_SIZE: usize = 64 * 1024;
const BIT_MASK: u8 = 0xff;

/// Reads bits, most significant bit of each byte first.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    source: R,
}

impl<R: io::Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self::with_capacity(source, BUFFER_SIZE)
    }

    /// Creates a new BitReader with a buffer of the given size.
    pub fn with_capacity(source: R, size: usize) -> Self {
        let size = size.max(1);
        Self {
            buffer: vec![0; size],
            cursor: size,
            bit_index: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> io::Result<bool> {
        // Only try to read more data when the buffer length is equal to the buffer cursor location
        if self.cursor == self.buffer.len() {
            let capacity = self.buffer.capacity();
            self.buffer.resize(capacity, 0);
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(size) => break size,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                self.buffer.truncate(0);
                self.cursor = 0;
                return Ok(false);
            }
            // Adjust the buffer if we read less than the buffer size
            self.buffer.truncate(size);
            // Reset the cursor and bit index
            self.cursor = 0;
            self.bit_index = 0;
        }
        Ok(true)
    }

    /// Return the next bit, or None if there is no more data to read
    pub fn bit(&mut self) -> io::Result<Option<bool>> {
        // If bit_index is == 0, check if we have a byte to read.
        if self.bit_index == 0 && !self.have_data()? {
            return Ok(None);
        }
        let bit =
            (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        Ok(Some(bit == 1))
    }

    /// Return the next n bits (n <= 64) as an integer, or None if the data runs out first.
    pub fn bint(&mut self, n: usize) -> io::Result<Option<u64>> {
        let mut result = 0_u64;
        for _ in 0..n {
            match self.bit()? {
                Some(bit) => result = (result << 1) | bit as u64,
                None => return Ok(None),
            }
        }
        Ok(Some(result))
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;

    #[test]
    fn basic_test() {
        let x = [0b10000001_u8].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bit().unwrap(), Some(true));
        for _ in 0..6 {
            assert_eq!(br.bit().unwrap(), Some(false));
        }
        assert_eq!(br.bit().unwrap(), Some(true));
        assert_eq!(br.bit().unwrap(), None);
        assert_eq!(br.bit().unwrap(), None);
    }

    #[test]
    fn bint_test() {
        let x = [0b00011011].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bint(5).unwrap(), Some(3));
        assert_eq!(br.bint(1).unwrap(), Some(0));
        assert_eq!(br.bint(2).unwrap(), Some(3));
        assert_eq!(br.bint(1).unwrap(), None);
    }

    #[test]
    fn small_buffer_refill_test() {
        let x = [0xa5_u8, 0x0f, 0xf0].as_slice();
        let mut br = BitReader::with_capacity(x, 1);
        assert_eq!(br.bint(12).unwrap(), Some(0xa50));
        assert_eq!(br.bint(12).unwrap(), Some(0xff0));
        assert_eq!(br.bit().unwrap(), None);
    }

    #[test]
    fn loc_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        br.bint(40).unwrap();
        br.bit().unwrap();
        assert_eq!(br.loc(), "[5.1]");
    }

    #[test]
    fn empty_source_test() {
        let mut br = BitReader::new([].as_slice());
        assert_eq!(br.bit().unwrap(), None);
        assert_eq!(br.bint(8).unwrap(), None);
    }
}
