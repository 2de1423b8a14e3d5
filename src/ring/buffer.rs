use super::cursor::Cursor;
use super::{RingError, Status};

/// Fixed-capacity FIFO of `T` over caller-supplied storage.
///
/// Capacity is the length of the storage slice. Slots outside the occupied
/// range keep whatever the caller or earlier transfers left there.
#[derive(Debug)]
pub struct RingBuffer<'a, T: Copy> {
    storage: &'a mut [T],
    cursor: Cursor,
}

impl<'a, T: Copy> RingBuffer<'a, T> {
    pub fn new(storage: &'a mut [T]) -> Self {
        let cursor = Cursor::new(storage.len());
        Self { storage, cursor }
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    #[inline(always)]
    pub fn occupied_count(&self) -> usize {
        self.cursor.occupied()
    }

    /// Free slots.
    #[inline(always)]
    pub fn available(&self) -> usize {
        self.cursor.available()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.cursor.is_full()
    }

    #[inline(always)]
    pub fn head(&self) -> usize {
        self.cursor.head()
    }

    #[inline(always)]
    pub fn tail(&self) -> usize {
        self.cursor.tail()
    }

    /// Appends all of `src`, or nothing.
    ///
    /// `Ok(Status::Full)` means the write went through and filled the buffer;
    /// `Err(RingError::Full)` means it was already full and nothing happened.
    #[inline]
    pub fn write(&mut self, src: &[T]) -> Result<Status, RingError> {
        let span = self.cursor.reserve_write(src.len())?;
        debug_assert_eq!(span.len(), src.len());
        let (first, second) = src.split_at(span.split(1));
        self.storage[span.head_range(1)].copy_from_slice(first);
        if span.wraps() {
            self.storage[span.wrap_range(1)].copy_from_slice(second);
        }
        Ok(self.cursor.commit_write(span))
    }

    /// Fills all of `dst` with the oldest elements, or nothing.
    ///
    /// `Ok(Status::Empty)` means the read went through and drained the buffer;
    /// `Err(RingError::Empty)` means there was nothing to read.
    #[inline]
    pub fn read(&mut self, dst: &mut [T]) -> Result<Status, RingError> {
        let span = self.cursor.reserve_read(dst.len())?;
        debug_assert_eq!(span.len(), dst.len());
        let (first, second) = dst.split_at_mut(span.split(1));
        first.copy_from_slice(&self.storage[span.head_range(1)]);
        if span.wraps() {
            second.copy_from_slice(&self.storage[span.wrap_range(1)]);
        }
        Ok(self.cursor.commit_read(span))
    }

    /// Forgets every stored element. Storage is left as is.
    pub fn clear(&mut self) {
        self.cursor.clear();
    }

    /// The whole backing region, occupied or not.
    pub fn storage(&self) -> &[T] {
        self.storage
    }

    pub fn into_storage(self) -> &'a mut [T] {
        self.storage
    }
}
