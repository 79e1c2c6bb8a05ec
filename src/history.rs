use std::num::NonZeroUsize;

/// One byte produced by the wrapped stream, together with its absolute offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub offset: u64,
    pub byte: u8,
}

/// Fixed-capacity ring of the most recently produced bytes.
///
/// The cursor always points at the slot which will be overwritten next. Once
/// the ring is full this is the oldest entry, so walking forward from the
/// cursor visits entries oldest first and walking backward from the slot
/// before the cursor visits them newest first.
#[derive(Debug)]
pub struct HistoryBuffer {
    slots: Vec<Option<HistoryEntry>>,
    cursor: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: vec![None; capacity.get()],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot which will be written by the next call to [`record`](Self::record).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the live entry stored in `slot`, if any.
    pub fn get(&self, slot: usize) -> Option<&HistoryEntry> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn next_slot(&self, slot: usize) -> usize {
        (slot + 1) % self.capacity()
    }

    pub fn prev_slot(&self, slot: usize) -> usize {
        (slot + self.capacity() - 1) % self.capacity()
    }

    /// Stores `byte` at the cursor and advances it, evicting whatever the slot held.
    pub fn record(&mut self, offset: u64, byte: u8) {
        self.slots[self.cursor] = Some(HistoryEntry { offset, byte });
        self.cursor = self.next_slot(self.cursor);
    }

    pub fn find_forward_from(&self, start: usize, offset: u64) -> Option<usize> {
        self.walk_forward(start)
            .find(|&slot| matches!(self.get(slot), Some(e) if e.offset == offset))
    }

    pub fn find_backward_from(&self, start: usize, offset: u64) -> Option<usize> {
        self.walk_backward(start)
            .find(|&slot| matches!(self.get(slot), Some(e) if e.offset == offset))
    }

    /// Copies consecutive live entries with an offset of at least `offset`,
    /// starting at `start`, into `out`.
    ///
    /// Copying stops at the first slot which is empty or older than `offset`,
    /// when `out` is full, or after one full turn of the ring.
    pub fn read_forward_from(&self, start: usize, offset: u64, out: &mut [u8]) -> usize {
        let mut copied = 0;
        for slot in self.walk_forward(start) {
            if copied == out.len() {
                break;
            }
            match self.get(slot) {
                Some(entry) if entry.offset >= offset => {
                    out[copied] = entry.byte;
                    copied += 1;
                }
                _ => break,
            }
        }
        copied
    }

    fn walk_forward(&self, start: usize) -> impl Iterator<Item = usize> {
        let capacity = self.capacity();
        let start = start % capacity;
        (0..capacity).map(move |step| (start + step) % capacity)
    }

    fn walk_backward(&self, start: usize) -> impl Iterator<Item = usize> {
        let capacity = self.capacity();
        let start = start % capacity;
        (0..capacity).map(move |step| (start + capacity - step) % capacity)
    }
}
