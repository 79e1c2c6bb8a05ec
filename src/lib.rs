//! [`StreamReaderAt`] provides random access to a [`Read`](std::io::Read) object which can
//! only be read once, from front to back (such as a socket or a pipe), without buffering
//! the whole stream. This is useful for parsers which occasionally need to look at
//! data they have already consumed, e.g. to re-parse a header.
//!
//! Reads at arbitrary offsets are limited by the following constraints:
//!
//!  - Only the most recently read bytes are kept (defined by the `history_size` parameter of [`StreamReaderAt::new()`])
//!  - Reading at a past offset is possible only if that offset is still in the history.
//!  - Reading at a future offset reads (and records) everything in between.
//!
//! # Reading at past offsets as long as they are in the history
//! ```rust
//! use std::io::{Cursor, Read};
//! use stream_reader_at::StreamReaderAt;
//! let cursor = Cursor::new(b"Hello World");
//! let mut reader = StreamReaderAt::new(cursor, 16);
//!
//! let mut buffer: [u8; 4] = [0; 4];
//! assert_eq!(reader.read_at(&mut buffer, 0).unwrap(), 4);
//! assert_eq!(&buffer, b"Hell");
//! assert_eq!(reader.position(), 4);
//!
//! /* reading the same bytes again does not touch the stream */
//! assert_eq!(reader.read_at(&mut buffer, 0).unwrap(), 4);
//! assert_eq!(&buffer, b"Hell");
//! assert_eq!(reader.position(), 4);
//!
//! assert_eq!(reader.read_at(&mut buffer, 4).unwrap(), 4);
//! assert_eq!(&buffer, b"o Wo");
//!
//! /* partly from the history, partly from the stream */
//! assert_eq!(reader.read_at(&mut buffer, 6).unwrap(), 4);
//! assert_eq!(&buffer, b"Worl");
//! assert_eq!(reader.position(), 10);
//! ```
//!
//! # Reading at past offsets fails if they have been evicted from the history
//! ```rust
//! # use std::io::{Cursor, Read};
//! use stream_reader_at::{Error, StreamReaderAt};
//! let cursor = Cursor::new(b"Hello World");
//! let mut reader = StreamReaderAt::new(cursor, 8);
//!
//! let mut content = Vec::new();
//! reader.read_to_end(&mut content).unwrap();
//!
//! let mut buffer: [u8; 4] = [0; 4];
//! assert!(matches!(reader.read_at(&mut buffer, 0), Err(Error::HistoryTooSmall { offset: 0 })));
//! assert_eq!(reader.read_at(&mut buffer, 4).unwrap(), 4);
//! assert_eq!(&buffer, b"o Wo");
//! ```
//!
//! # Seeking with [`StreamCursor`], e.g. for binary parsers which require [`Seek`](std::io::Seek)
//! ```rust
//! use std::io::{Cursor, Read, Seek, SeekFrom};
//! use stream_reader_at::{StreamCursor, StreamReaderAt};
//! # let mut arr: [u8; 256] = [0; 256];
//! # for (elem, val) in arr.iter_mut().zip(0..=255) { *elem = val; }
//! let cursor = Cursor::new(&arr); // points to array with values from \x00 .. \xff
//! let mut reader = StreamCursor::new(StreamReaderAt::new(cursor, 16));
//!
//! let mut buffer: [u8; 7] = [0; 7];
//! assert!(reader.seek(SeekFrom::Start(10)).is_ok());
//! reader.read_exact(&mut buffer).unwrap();
//! assert_eq!(&buffer, &arr[10..17]);
//!
//! assert!(reader.seek(SeekFrom::Current(-4)).is_ok());
//! reader.read_exact(&mut buffer).unwrap();
//! assert_eq!(&buffer, &arr[13..20]);
//!
//! assert!(reader.seek(SeekFrom::End(0)).is_err());
//! ```
mod cursor;
mod error;
mod history;
mod reader;

pub use crate::cursor::StreamCursor;
pub use crate::error::{Error, Result};
pub use crate::history::{HistoryBuffer, HistoryEntry};
pub use crate::reader::{StreamReaderAt, DISCARD_CHUNK_SIZE};
