use std::io;
use thiserror::Error;

/// Errors returned by [`StreamReaderAt`](crate::StreamReaderAt).
#[derive(Debug, Error)]
pub enum Error {
    /// A past offset was requested, but the reader was created without history.
    #[error("cannot seek back, no history buffer present")]
    NoHistory,

    /// The requested offset has already been evicted from the history, or
    /// was never recorded.
    #[error("history too small, unable to read from offset {offset}")]
    HistoryTooSmall { offset: u64 },

    /// The history buffer holds no entry where one is expected. This is a bug.
    #[error("invalid history buffer state")]
    InvalidHistoryState,

    #[error(transparent)]
    Source(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Source(why) => why,
            Error::NoHistory | Error::HistoryTooSmall { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            Error::InvalidHistoryState => io::Error::new(io::ErrorKind::Other, err),
        }
    }
}
