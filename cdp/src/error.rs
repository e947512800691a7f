use thiserror::Error;

/// Errors that can occur while decoding, encoding, or storing CDP frames.
#[derive(Error, Debug)]
pub enum CdpError {
    #[error("buffer exhausted: needed {needed} bytes at offset {offset}, {available} available")]
    BufferExhausted {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("malformed TLV (type {tlv_type:#06x} at offset {offset}): {reason}")]
    MalformedTlv {
        tlv_type: u16,
        offset: usize,
        reason: String,
    },

    #[error("protocol requirement violated: {0}")]
    ProtocolRequirement(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("allocation failure: {0}")]
    AllocationFailure(String),

    #[error("neighbor table unavailable: {0}")]
    LockContention(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CdpError>;
