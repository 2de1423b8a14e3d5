use super::cursor::Cursor;
use super::{LayoutError, RingError, Status};

/// FIFO of opaque fixed-size byte blocks over caller-supplied bytes.
///
/// The element size is a runtime value, so records of any layout can be
/// stored without the buffer knowing their type. Only the first
/// `capacity * element_size` bytes of the storage are ever touched.
#[derive(Debug)]
pub struct RawRingBuffer<'a> {
    storage: &'a mut [u8],
    element_size: usize,
    cursor: Cursor,
}

impl<'a> RawRingBuffer<'a> {
    pub fn new(
        storage: &'a mut [u8],
        capacity: usize,
        element_size: usize,
    ) -> Result<Self, LayoutError> {
        if element_size == 0 {
            return Err(LayoutError::ZeroElementSize);
        }
        let required = capacity
            .checked_mul(element_size)
            .ok_or(LayoutError::Overflow {
                capacity,
                element_size,
            })?;
        if storage.len() < required {
            return Err(LayoutError::StorageTooSmall {
                required,
                provided: storage.len(),
            });
        }

        Ok(Self {
            storage,
            element_size,
            cursor: Cursor::new(capacity),
        })
    }

    /// Uses as many whole elements as fit in `storage`.
    pub fn from_storage(storage: &'a mut [u8], element_size: usize) -> Result<Self, LayoutError> {
        if element_size == 0 {
            return Err(LayoutError::ZeroElementSize);
        }
        let capacity = storage.len() / element_size;
        Self::new(storage, capacity, element_size)
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    #[inline(always)]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    #[inline(always)]
    pub fn occupied_count(&self) -> usize {
        self.cursor.occupied()
    }

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

    /// Appends `n` elements taken from the front of `src`.
    ///
    /// `src` may be longer than `n * element_size`; the rest is ignored.
    #[inline]
    pub fn write(&mut self, src: &[u8], n: usize) -> Result<Status, RingError> {
        let span = self.cursor.reserve_write(n)?;
        let src = self.caller_bytes(src.len(), n).map(|len| &src[..len])?;

        let stride = self.element_size;
        let (first, second) = src.split_at(span.split(stride));
        self.storage[span.head_range(stride)].copy_from_slice(first);
        if span.wraps() {
            self.storage[span.wrap_range(stride)].copy_from_slice(second);
        }
        Ok(self.cursor.commit_write(span))
    }

    /// Moves the `n` oldest elements into the front of `dst`.
    #[inline]
    pub fn read(&mut self, dst: &mut [u8], n: usize) -> Result<Status, RingError> {
        let span = self.cursor.reserve_read(n)?;
        let len = self.caller_bytes(dst.len(), n)?;

        let stride = self.element_size;
        let (first, second) = dst[..len].split_at_mut(span.split(stride));
        first.copy_from_slice(&self.storage[span.head_range(stride)]);
        if span.wraps() {
            second.copy_from_slice(&self.storage[span.wrap_range(stride)]);
        }
        Ok(self.cursor.commit_read(span))
    }

    pub fn clear(&mut self) {
        self.cursor.clear();
    }

    pub fn storage(&self) -> &[u8] {
        self.storage
    }

    pub fn into_storage(self) -> &'a mut [u8] {
        self.storage
    }

    /// Byte length `n` elements occupy in a caller slice of `provided` bytes.
    #[inline]
    fn caller_bytes(&self, provided: usize, n: usize) -> Result<usize, RingError> {
        // n <= capacity here, and capacity * element_size was checked in new()
        let required = n * self.element_size;
        if provided < required {
            return Err(RingError::ShortBuffer { required, provided });
        }
        Ok(required)
    }
}
