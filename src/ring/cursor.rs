use super::{RingError, Status};
use std::ops::Range;

/// The one or two contiguous slot ranges touched by a single transfer.
///
/// `first` slots starting at `start`, then `second` slots starting at 0 when the
/// transfer crosses the end of storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    start: usize,
    first: usize,
    second: usize,
}

impl Span {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.first + self.second
    }

    #[inline]
    pub(crate) fn wraps(&self) -> bool {
        self.second > 0
    }

    /// Slot range of the first copy, scaled by `stride` items per slot.
    #[inline]
    pub(crate) fn head_range(&self, stride: usize) -> Range<usize> {
        self.start * stride..(self.start + self.first) * stride
    }

    #[inline]
    pub(crate) fn wrap_range(&self, stride: usize) -> Range<usize> {
        0..self.second * stride
    }

    /// Split point inside the caller's contiguous slice.
    #[inline]
    pub(crate) fn split(&self, stride: usize) -> usize {
        self.first * stride
    }
}

/// Head/tail bookkeeping shared by the typed and raw buffers.
///
/// When `head == tail` exactly one of `empty`/`full` is set; otherwise both are clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    capacity: usize,
    head: usize,
    tail: usize,
    empty: bool,
    full: bool,
}

impl Cursor {
    pub(crate) const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            head: 0,
            tail: 0,
            empty: true,
            full: false,
        }
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub(crate) fn head(&self) -> usize {
        self.head
    }

    #[inline(always)]
    pub(crate) fn tail(&self) -> usize {
        self.tail
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.empty
    }

    #[inline(always)]
    pub(crate) fn is_full(&self) -> bool {
        self.full
    }

    #[inline]
    pub(crate) fn occupied(&self) -> usize {
        if self.empty {
            0
        } else if self.full {
            self.capacity
        } else if self.head > self.tail {
            self.head - self.tail
        } else {
            self.capacity - self.tail + self.head
        }
    }

    #[inline]
    pub(crate) fn available(&self) -> usize {
        self.capacity - self.occupied()
    }

    pub(crate) fn reserve_write(&self, n: usize) -> Result<Span, RingError> {
        if self.full {
            return Err(RingError::Full);
        }
        if n == 0 {
            return Err(RingError::ZeroLength);
        }
        let available = self.available();
        if n > available {
            return Err(RingError::InsufficientSpace {
                requested: n,
                available,
            });
        }
        Ok(self.span_at(self.head, n))
    }

    pub(crate) fn reserve_read(&self, n: usize) -> Result<Span, RingError> {
        if self.empty {
            return Err(RingError::Empty);
        }
        if n == 0 {
            return Err(RingError::ZeroLength);
        }
        let available = self.occupied();
        if n > available {
            return Err(RingError::InsufficientSpace {
                requested: n,
                available,
            });
        }
        Ok(self.span_at(self.tail, n))
    }

    /// Must only be given the span returned by the last `reserve_write`.
    pub(crate) fn commit_write(&mut self, span: Span) -> Status {
        self.empty = false;
        self.head = self.advance(self.head, &span);
        if self.head == self.tail {
            self.full = true;
            Status::Full
        } else {
            Status::Ok
        }
    }

    /// Must only be given the span returned by the last `reserve_read`.
    pub(crate) fn commit_read(&mut self, span: Span) -> Status {
        self.full = false;
        self.tail = self.advance(self.tail, &span);
        if self.tail == self.head {
            self.empty = true;
            Status::Empty
        } else {
            Status::Ok
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::new(self.capacity);
    }

    #[inline]
    fn span_at(&self, start: usize, n: usize) -> Span {
        let first = n.min(self.capacity - start);
        Span {
            start,
            first,
            second: n - first,
        }
    }

    #[inline]
    fn advance(&self, index: usize, span: &Span) -> usize {
        if span.wraps() {
            // n + index - capacity
            span.second
        } else {
            let next = index + span.first;
            if next == self.capacity { 0 } else { next }
        }
    }
}
