//! Error taxonomy for the codec.
//!
//! Every core operation returns [`Result`]. Nothing is retried internally; reopening a file or
//! asking the user again is left to the caller.

/// Errors produced while encoding or decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The source or sink could not be read or written.
    #[error("i/o unavailable: {0}")]
    Io(#[from] std::io::Error),

    /// The header is structurally broken (truncated, duplicate symbols, bad codes, ...).
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// The header declares no symbols but a non-zero output length.
    #[error("inconsistent header: {symbols} symbols declared for {total_bytes} bytes")]
    InconsistentHeader { symbols: usize, total_bytes: u64 },

    /// The payload ran out before the declared number of bytes was produced.
    #[error("incomplete stream: expected {expected} bytes, produced {produced}")]
    IncompleteStream { expected: u64, produced: u64 },

    /// A payload bit led to a branch the decode trie does not have.
    #[error("corrupt code after {produced} decoded bytes")]
    CorruptCode { produced: u64 },

    /// The encoder was handed a byte its code table has no code for.
    #[error("no code for byte {0:#04x}")]
    UnknownSymbol(u8),

    /// A code is longer than the chosen header layout can store.
    #[error("code for symbol {symbol:#04x} is {len} bits, the header layout holds at most {max}")]
    CodeTooLong { symbol: u8, len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    /// Shorthand used by the header reader.
    pub(crate) fn malformed<S: Into<String>>(msg: S) -> Self {
        CodecError::MalformedHeader(msg.into())
    }
}
