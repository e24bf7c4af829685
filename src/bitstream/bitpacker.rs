use log::error;

use crate::huffman_coding::code_table::Code;

/// Packs bits MSB-first into a byte buffer.
pub struct BitPacker {
    pub output: Vec<u8>,
    /// Valid bits in the last byte after flush(), 0 if it was full.
    pub last_bits: u8,
    queue: u64,
    q_bits: u8,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of size specified. Call flush() to flush
    /// the bit queue to the buffer before using the output.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            last_bits: 0,
            queue: 0,
            q_bits: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /// Puts a single bit on the stream.
    pub fn out_bit(&mut self, bit: bool) {
        self.queue <<= 1;
        self.queue |= bit as u64;
        self.q_bits += 1;
        self.write_stream();
    }

    /// Writes the low `depth` bits of `data`, most significant first. Depth must be 0-56.
    pub fn out_bits(&mut self, data: u64, depth: u8) {
        if depth == 0 {
            return;
        }
        self.queue <<= depth; //shift queue by bit length
        self.queue |= data & (u64::MAX >> (64 - depth)); //add data portion to queue
        self.q_bits += depth; //update depth of queue bits
        self.write_stream();
    }

    /// Puts a code on the stream, up to 56 bits at a time.
    pub fn out_code(&mut self, code: &Code) {
        for chunk in code.bits().chunks(56) {
            let data = chunk
                .iter()
                .fold(0_u64, |acc, &bit| (acc << 1) | bit as u64);
            self.out_bits(data, chunk.len() as u8);
        }
    }

    /// Flushes the remaining bits (1-7) from the buffer, padding with 0s in the least
    /// signficant bits
    pub fn flush(&mut self) {
        self.last_bits = self.q_bits % 8;
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits += 8 - self.q_bits;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
    }

    /// Flush and hand over the packed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.output
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format! {"[{}.{}]",((self.output.len() * 8) + self.q_bits as usize)/8, ((self.output.len() * 8) + self.q_bits as usize)%8}
    }
}

#[cfg(test)]
mod test {
    use super::BitPacker;
    use crate::huffman_coding::code_table::Code;

    #[test]
    fn out_bit_test() {
        let mut bw = BitPacker::new(100);
        for bit in [false, false, true, false, false, false, false, true] {
            bw.out_bit(bit);
        }
        bw.flush();
        assert_eq!(bw.output, "!".as_bytes());
        assert_eq!(bw.last_bits, 0);
    }

    #[test]
    fn padding_test() {
        let mut bw = BitPacker::new(100);
        bw.out_bits(0b101, 3);
        assert_eq!("[0.3]", &bw.loc());
        bw.flush();
        assert_eq!(bw.output, vec![0b1010_0000]);
        assert_eq!(bw.last_bits, 3);
    }

    #[test]
    fn four_zero_bits_test() {
        let mut bw = BitPacker::new(1);
        for _ in 0..4 {
            bw.out_bit(false);
        }
        assert_eq!(bw.finish(), vec![0x00]);
    }

    #[test]
    fn out_bits_and_loc_test() {
        let mut bw = BitPacker::new(100);
        bw.out_bits(0b00100001, 8);
        assert_eq!("[1.0]", &bw.loc());
        bw.out_bits(0b11, 24);
        bw.flush();
        assert_eq!(bw.output, &[33, 0, 0, 3]);
        assert_eq!("[4.0]", &bw.loc());
    }

    #[test]
    fn out_code_test() {
        let mut bw = BitPacker::new(100);
        let code: Code = "1".repeat(60).parse().unwrap();
        bw.out_code(&code);
        bw.out_code(&"0101".parse().unwrap());
        let out = bw.finish();
        assert_eq!(out, vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xf5]);
    }

    #[test]
    fn empty_test() {
        let bw = BitPacker::new(0);
        assert!(bw.finish().is_empty());
    }
}
