use std::cmp::Ordering;
use std::io::{self, ErrorKind, Read};
use std::num::NonZeroUsize;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::history::HistoryBuffer;

/// Maximum number of bytes requested from the wrapped reader per call while
/// skipping ahead to a future offset.
pub const DISCARD_CHUNK_SIZE: usize = 1024;

/// Where a requested offset lies relative to the bytes produced so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Past,
    Present,
    Future { skip: u64 },
}

impl Target {
    fn locate(offset: u64, position: u64) -> Self {
        match offset.cmp(&position) {
            Ordering::Less => Target::Past,
            Ordering::Equal => Target::Present,
            Ordering::Greater => Target::Future {
                skip: offset - position,
            },
        }
    }
}

#[derive(Debug)]
pub struct StreamReaderAt<R>
where
    R: Read,
{
    reader: R,
    position: u64,
    history: Option<HistoryBuffer>,
}

impl<R> StreamReaderAt<R>
where
    R: Read,
{
    /// Creates a new StreamReaderAt which wraps `reader`.
    ///
    ///  - `reader` - forward-only reader which has to be wrapped. It is never rewound,
    ///    and it is not closed by this object; use [`into_inner`](Self::into_inner) to get it back
    ///  - `history_size` - number of most recently read bytes which stay available
    ///    for reads at past offsets. `0` disables the history, so that only reads at the
    ///    current or a future offset are possible
    pub fn new(reader: R, history_size: usize) -> Self {
        Self {
            reader,
            position: 0,
            history: NonZeroUsize::new(history_size).map(HistoryBuffer::new),
        }
    }

    /// Returns the number of bytes read from the wrapped reader so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns the number of bytes the history can hold, `0` if it is disabled.
    pub fn capacity(&self) -> usize {
        self.history.as_ref().map_or(0, HistoryBuffer::capacity)
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Gives mutable access to the wrapped reader. Reading from it directly
    /// desynchronizes [`position`](Self::position) from the stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Reads bytes starting at the absolute stream `offset` into `dst`.
    ///
    /// Offsets before [`position`](Self::position) are served from the history,
    /// the current position continues the stream and later offsets skip ahead,
    /// recording the skipped bytes. Like [`Read::read`], this may return fewer bytes
    /// than `dst` can hold.
    ///
    /// A past read whose replay reaches the newest recorded byte fills the rest of
    /// `dst` from the stream, so it can advance [`position`](Self::position) too.
    pub fn read_at(&mut self, dst: &mut [u8], offset: u64) -> Result<usize> {
        match Target::locate(offset, self.position) {
            Target::Past => {
                trace!(offset, position = self.position, "reading from history");
                self.read_from_history(dst, offset)
            }
            Target::Present => self.read_live(dst),
            Target::Future { skip } => {
                debug!(offset, position = self.position, skip, "skipping ahead in stream");
                self.skip_to(offset)?;
                self.read_live(dst)
            }
        }
    }

    fn read_live(&mut self, dst: &mut [u8]) -> Result<usize> {
        let bytes = self.reader.read(dst)?;
        self.record(&dst[..bytes]);
        Ok(bytes)
    }

    fn record(&mut self, bytes: &[u8]) {
        match &mut self.history {
            Some(history) => {
                for byte in bytes {
                    history.record(self.position, *byte);
                    self.position += 1;
                }
            }
            None => self.position += bytes.len() as u64,
        }
    }

    /// discards (but records) everything up to `offset`
    fn skip_to(&mut self, offset: u64) -> Result<()> {
        let mut skip = [0; DISCARD_CHUNK_SIZE];
        while self.position < offset {
            let remaining = offset - self.position;
            let len = usize::try_from(remaining).map_or(DISCARD_CHUNK_SIZE, |r| r.min(DISCARD_CHUNK_SIZE));
            if self.read_live(&mut skip[..len])? == 0 {
                return Err(Error::Source(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("stream ended at offset {} before reaching offset {}", self.position, offset),
                )));
            }
        }
        Ok(())
    }

    fn read_from_history(&mut self, dst: &mut [u8], offset: u64) -> Result<usize> {
        let history = self.history.as_ref().ok_or(Error::NoHistory)?;
        let (reference, reference_offset) = reference_entry(history).ok_or(Error::InvalidHistoryState)?;

        let start = match offset.cmp(&reference_offset) {
            Ordering::Equal => Some(reference),
            Ordering::Less => history.find_backward_from(reference, offset),
            Ordering::Greater => history.find_forward_from(reference, offset),
        };
        let start = match start {
            Some(slot) => slot,
            None => {
                debug!(offset, position = self.position, "offset is not in history");
                return Err(Error::HistoryTooSmall { offset });
            }
        };

        let bytes = history.read_forward_from(start, offset, dst);

        // the replay reached the newest byte, so the rest can come from the stream
        if bytes < dst.len() && offset.checked_add(bytes as u64) == Some(self.position) {
            return Ok(bytes + self.read_live(&mut dst[bytes..])?);
        }
        Ok(bytes)
    }
}

/// The slot under the cursor, or the one before it if the ring has not yet
/// been filled, together with the offset stored there.
fn reference_entry(history: &HistoryBuffer) -> Option<(usize, u64)> {
    let cursor = history.cursor();
    [cursor, history.prev_slot(cursor)]
        .into_iter()
        .find_map(|slot| history.get(slot).map(|entry| (slot, entry.offset)))
}

impl<R> Read for StreamReaderAt<R>
where
    R: Read,
{
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_live(dst)?)
    }
}
