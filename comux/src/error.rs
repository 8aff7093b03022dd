use thiserror::Error;

/// Everything that can go wrong while decoding a comux container. The
/// taxonomy is closed: consumers match on it to decide between rejecting an
/// input and repairing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("reached end-of-file")]
    Eof,
    #[error("the container header had an invalid magic field")]
    BadMagic,
    #[error("the container header had an invalid version field")]
    BadVersion,
    #[error("the container header had an invalid number-of-connections field")]
    BadNumConns,
    #[error("the container header had an invalid number-of-chunks field")]
    BadNumChunks,
    #[error("a chunk header had an invalid connection ID field")]
    BadConnId,
    #[error("a chunk header had an invalid data-length field")]
    BadConnLen,
    #[error("a chunk header had an invalid schedule field")]
    BadSched,
    #[error("a chunk header had invalid flags")]
    BadFlags,
    #[error("a chunk's data length didn't match the number of bytes present")]
    ConnLenMismatch,
}

/// Errors from the slice-backed encoders. `needed` is the total number of
/// bytes the destination would have to hold for the encode to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("buffer too small: {needed} bytes required")]
    Insufficient { needed: usize },
}
