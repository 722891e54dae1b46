//! Error types for device operations.

use bytefifo_buffer::AllocError;

/// Result type alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Error type for device operations.
///
/// `write`/`read` never raise — short counts are their only failure signal.
/// Starting an already-running drain or stopping an already-stopped one is a
/// successful no-op, not an error.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// A control operation or argument was malformed or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A resize was requested below the bytes currently buffered.
    #[error("capacity exceeded: {required} bytes buffered, {requested} requested")]
    CapacityExceeded { required: usize, requested: usize },

    /// Backing-storage acquisition failed.
    #[error("allocation failure: {0}")]
    AllocationFailure(String),

    /// No device instance exists at the given index.
    #[error("device {0} not found")]
    NotFound(usize),
}

impl From<AllocError> for DeviceError {
    fn from(e: AllocError) -> Self {
        match e {
            AllocError::ZeroCapacity => {
                DeviceError::InvalidArgument("capacity must be greater than 0".to_string())
            }
            AllocError::Exhausted(e) => DeviceError::AllocationFailure(e.to_string()),
        }
    }
}
