use std::fmt;

/// Buffer state reported after a transfer that moved data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Data moved; the buffer is neither saturated (write) nor drained (read).
    Ok,
    /// A write moved data and the buffer is now full.
    Full,
    /// A read moved data and the buffer is now empty.
    Empty,
}

/// A transfer that was refused. Nothing was copied and no index or flag changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// Write against a buffer that is already full.
    Full,
    /// Read against a buffer that is already empty.
    Empty,
    /// Zero elements requested.
    ZeroLength,
    /// More elements requested than there are free slots (write) or stored
    /// elements (read).
    InsufficientSpace { requested: usize, available: usize },
    /// The caller's byte slice cannot hold `n * element_size` bytes.
    ShortBuffer { required: usize, provided: usize },
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "Ring buffer is full"),
            Self::Empty => write!(f, "Ring buffer is empty"),
            Self::ZeroLength => write!(f, "Zero elements requested"),
            Self::InsufficientSpace {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Not enough space in ring buffer: requested {} elements, available {} elements",
                    requested, available
                )
            }
            Self::ShortBuffer { required, provided } => {
                write!(
                    f,
                    "Caller buffer too short: required {} bytes, provided {} bytes",
                    required, provided
                )
            }
        }
    }
}

impl std::error::Error for RingError {}

/// Rejected storage layout for a [`RawRingBuffer`](super::RawRingBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    ZeroElementSize,
    Overflow {
        capacity: usize,
        element_size: usize,
    },
    StorageTooSmall {
        required: usize,
        provided: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroElementSize => write!(f, "Element size must be non-zero"),
            Self::Overflow {
                capacity,
                element_size,
            } => {
                write!(
                    f,
                    "Storage size overflows: {} elements of {} bytes",
                    capacity, element_size
                )
            }
            Self::StorageTooSmall { required, provided } => {
                write!(
                    f,
                    "Storage too small: required {} bytes, provided {} bytes",
                    required, provided
                )
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Flat five-way result code.
///
/// `Full` and `Empty` are dual-purpose here: they mean either "refused, the
/// buffer was already full/empty" or "done, and the buffer just became
/// full/empty". Callers that need to tell the two apart should match on the
/// `Result<Status, RingError>` instead.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FifoCode {
    Ok = 0,
    Empty = 1,
    Full = 2,
    ZeroSize = 3,
    NotEnoughSpace = 4,
}

impl FifoCode {
    pub fn from_result(result: &Result<Status, RingError>) -> Self {
        match result {
            Ok(status) => (*status).into(),
            Err(err) => (*err).into(),
        }
    }
}

impl From<Status> for FifoCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => FifoCode::Ok,
            Status::Full => FifoCode::Full,
            Status::Empty => FifoCode::Empty,
        }
    }
}

impl From<RingError> for FifoCode {
    fn from(err: RingError) -> Self {
        match err {
            RingError::Full => FifoCode::Full,
            RingError::Empty => FifoCode::Empty,
            RingError::ZeroLength => FifoCode::ZeroSize,
            RingError::InsufficientSpace { .. } | RingError::ShortBuffer { .. } => {
                FifoCode::NotEnoughSpace
            }
        }
    }
}

impl From<FifoCode> for u8 {
    fn from(code: FifoCode) -> Self {
        code as u8
    }
}
