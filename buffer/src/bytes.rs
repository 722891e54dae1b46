//! Convenience functions for creating pre-sized buffers.

use crate::FifoBuffer;
use crate::error::AllocError;

/// Creates a 32-byte FIFO buffer, the classic pseudo-device default.
pub fn fifo_32b() -> Result<FifoBuffer, AllocError> {
    FifoBuffer::new(32)
}

/// Creates a 1KB FIFO buffer.
pub fn fifo_1kb() -> Result<FifoBuffer, AllocError> {
    FifoBuffer::new(1024)
}

/// Creates a 4KB FIFO buffer.
pub fn fifo_4kb() -> Result<FifoBuffer, AllocError> {
    FifoBuffer::new(4096)
}

/// Creates a FIFO buffer with the specified capacity.
pub fn fifo_bytes(size: usize) -> Result<FifoBuffer, AllocError> {
    FifoBuffer::new(size)
}
