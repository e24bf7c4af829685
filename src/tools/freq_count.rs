/// Occurrence count for each of the 256 byte values in one input, plus the input length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl FrequencyTable {
    /// Build a table from raw counts. The total is the sum of the counts.
    pub fn from_counts(counts: [u64; 256]) -> Self {
        let total = counts.iter().sum();
        Self { counts, total }
    }

    /// Count of one byte value.
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of byte values that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// (symbol, count) pairs for every byte value present, in ascending symbol order.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(s, &c)| (s as u8, c))
    }
}

/// Returns a frequency count of the input data.
pub fn freqs(data: &[u8]) -> FrequencyTable {
    let mut counts = [0_u64; 256];
    data.iter().for_each(|&el| counts[el as usize] += 1);
    FrequencyTable {
        counts,
        total: data.len() as u64,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_test() {
        let f = freqs(&[]);
        assert!(f.is_empty());
        assert_eq!(f.total(), 0);
        assert_eq!(f.distinct(), 0);
        assert_eq!(f.present().count(), 0);
    }

    #[test]
    fn count_test() {
        let f = freqs("abracadabra".as_bytes());
        assert_eq!(f.total(), 11);
        assert_eq!(f.count(b'a'), 5);
        assert_eq!(f.count(b'b'), 2);
        assert_eq!(f.count(b'z'), 0);
        assert_eq!(f.distinct(), 5);
        assert_eq!(
            f.present().collect::<Vec<_>>(),
            vec![(b'a', 5), (b'b', 2), (b'c', 1), (b'd', 1), (b'r', 2)]
        );
    }

    #[test]
    fn from_counts_test() {
        let mut counts = [0_u64; 256];
        counts[0] = 3;
        counts[255] = 4;
        let f = FrequencyTable::from_counts(counts);
        assert_eq!(f.total(), 7);
        assert_eq!(f, {
            let mut data = vec![0_u8; 3];
            data.extend([255_u8; 4]);
            freqs(&data)
        });
    }
}
