use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

use tracing::trace;

use crate::{Error, StreamReaderAt};

/// A [`Read`]+[`Seek`] view of a [`StreamReaderAt`].
///
/// Seeking only moves a logical read position, no data is read at that time.
/// Whether the position can be served is decided by the next read: positions
/// inside the history are replayed, positions behind the data read so far are
/// reached by reading ahead, and everything else fails. A position behind the
/// end of the stream reads as end of file, like [`std::io::Cursor`] does.
#[derive(Debug)]
pub struct StreamCursor<R>
where
    R: Read,
{
    inner: StreamReaderAt<R>,
    current: u64,
}

impl<R> StreamCursor<R>
where
    R: Read,
{
    /// Wraps `inner`, starting at the number of bytes it has already read.
    pub fn new(inner: StreamReaderAt<R>) -> Self {
        let current = inner.position();
        Self { inner, current }
    }

    pub fn get_ref(&self) -> &StreamReaderAt<R> {
        &self.inner
    }

    pub fn into_inner(self) -> StreamReaderAt<R> {
        self.inner
    }
}

impl<R> From<StreamReaderAt<R>> for StreamCursor<R>
where
    R: Read,
{
    fn from(inner: StreamReaderAt<R>) -> Self {
        Self::new(inner)
    }
}

impl<R> Read for StreamCursor<R>
where
    R: Read,
{
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let bytes = match self.inner.read_at(dst, self.current) {
            Ok(bytes) => bytes,
            // the stream ended while reading ahead to `current`
            Err(Error::Source(why))
                if why.kind() == ErrorKind::UnexpectedEof && self.inner.position() < self.current =>
            {
                trace!(current = self.current, end = self.inner.position(), "seeked past end of stream");
                return Ok(0);
            }
            Err(err) => return Err(err.into()),
        };
        self.current += bytes as u64;
        Ok(bytes)
    }
}

impl<R> Seek for StreamCursor<R>
where
    R: Read,
{
    fn seek(&mut self, seek_from: SeekFrom) -> io::Result<u64> {
        let target = match seek_from {
            SeekFrom::Start(pos) => Some(pos),
            SeekFrom::Current(pos) => self.current.checked_add_signed(pos),

            // We don't know where the end of a stream is
            SeekFrom::End(_) => {
                return Err(io::Error::new(
                    ErrorKind::Unsupported,
                    "cannot seek relative to the end of a stream",
                ))
            }
        };

        match target {
            Some(pos) => {
                trace!(from = self.current, to = pos, "seek");
                self.current = pos;
                Ok(pos)
            }
            None => Err(io::Error::new(
                ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn numbers(history_size: usize) -> (Vec<u8>, StreamCursor<Cursor<Vec<u8>>>) {
        let arr: Vec<u8> = (0..=255).collect();
        let reader = StreamReaderAt::new(Cursor::new(arr.clone()), history_size);
        (arr, StreamCursor::new(reader))
    }

    #[test]
    fn seek_backward_inside_history() {
        let (arr, mut reader) = numbers(16);
        let mut buffer = [0; 7];

        assert_eq!(reader.read(&mut buffer).unwrap(), 7);
        assert_eq!(&buffer, &arr[0..7]);

        assert_eq!(reader.seek(SeekFrom::Current(-4)).unwrap(), 3);
        reader.read_exact(&mut buffer).unwrap();
        assert_eq!(&buffer, &arr[3..10]);
        assert_eq!(reader.stream_position().unwrap(), 10);
        assert_eq!(reader.get_ref().position(), 10);
    }

    #[test]
    fn seek_backward_outside_history() {
        let (_, mut reader) = numbers(16);
        let mut buffer = [0; 7];

        assert_eq!(reader.seek(SeekFrom::Start(96)).unwrap(), 96);
        reader.read_exact(&mut buffer).unwrap();
        assert_eq!(reader.get_ref().position(), 103);

        // 103 - 16 = 87 is the oldest retained offset
        reader.seek(SeekFrom::Start(80)).unwrap();
        let err = reader.read(&mut buffer).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        reader.seek(SeekFrom::Start(87)).unwrap();
        reader.read_exact(&mut buffer).unwrap();
        assert_eq!(buffer, [87, 88, 89, 90, 91, 92, 93]);
    }

    #[test]
    fn seek_forward_is_not_limited() {
        let (arr, mut reader) = numbers(16);
        let mut buffer = [0; 7];

        reader.seek(SeekFrom::Start(10)).unwrap();
        reader.read_exact(&mut buffer).unwrap();
        assert_eq!(&buffer, &arr[10..17]);

        reader.seek(SeekFrom::Current(122)).unwrap();
        reader.read_exact(&mut buffer).unwrap();
        assert_eq!(&buffer, &arr[139..146]);
    }

    #[test]
    fn invalid_seeks() {
        let (_, mut reader) = numbers(16);
        let err = reader.seek(SeekFrom::Current(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = reader.seek(SeekFrom::End(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        assert_eq!(reader.stream_position().unwrap(), 0);
    }

    #[test]
    fn read_to_end_after_rewind() {
        let (arr, mut reader) = numbers(256);
        let mut header = [0; 4];
        reader.read_exact(&mut header).unwrap();
        reader.rewind().unwrap();

        let mut all = Vec::new();
        reader.read_to_end(&mut all).unwrap();
        assert_eq!(all, arr);
    }

    #[test]
    fn seek_past_end_reads_nothing() {
        let (arr, mut reader) = numbers(16);
        reader.seek(SeekFrom::Start(300)).unwrap();
        let mut rest = Vec::new();
        assert_eq!(reader.read_to_end(&mut rest).unwrap(), 0);
        assert_eq!(reader.stream_position().unwrap(), 300);
        assert_eq!(reader.get_ref().position(), 256);

        // the tail of the stream is still in the history
        reader.seek(SeekFrom::Start(250)).unwrap();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, &arr[250..]);
    }

    #[test]
    fn starts_at_current_position() {
        let mut inner = StreamReaderAt::new(Cursor::new(b"Hello World".to_vec()), 0);
        let mut buffer = [0; 6];
        inner.read_exact(&mut buffer).unwrap();

        let mut reader = StreamCursor::from(inner);
        assert_eq!(reader.stream_position().unwrap(), 6);
        let mut rest = String::new();
        reader.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "World");
        assert_eq!(reader.into_inner().position(), 11);
    }
}
