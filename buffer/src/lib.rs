//! Thread-safe bounded FIFO byte buffers.
//!
//! This crate provides the FIFO data structure behind a pseudo
//! character-device: a fixed-capacity byte queue with exact occupancy
//! accounting.
//!
//! - [`FifoBuffer`]: a fixed-size byte queue that truncates writes when full
//! - [`FifoInfo`]: a consistent capacity/length/available snapshot
//!
//! # Semantics
//!
//! Unlike an overwriting ring buffer, a [`FifoBuffer`] never discards
//! buffered data: a write stores only the leading bytes that fit and reports
//! the stored count, and a read removes at most the bytes held. Neither
//! operation blocks or errors; short counts are the only failure signal.
//!
//! ```
//! use bytefifo_buffer::FifoBuffer;
//!
//! let buf = FifoBuffer::new(32).unwrap();
//! assert_eq!(buf.write(b"hello"), 5);
//!
//! let info = buf.info();
//! assert_eq!((info.capacity, info.length, info.available), (32, 5, 27));
//!
//! let mut out = [0u8; 5];
//! assert_eq!(buf.read(&mut out), 5);
//! assert_eq!(&out, b"hello");
//! ```
//!
//! # Resizing
//!
//! [`FifoBuffer::resize`] replaces the backing storage while preserving the
//! buffered bytes in order. A resize below the current occupancy fails with
//! [`ResizeError::TooSmall`] and leaves the buffer untouched — buffered data
//! is never silently truncated.
//!
//! # Thread Safety
//!
//! `FifoBuffer` is `Send + Sync` and can be shared between threads using
//! `Clone` (which shares the underlying state via `Arc`). Every operation
//! holds the buffer's single internal lock for its full duration, so
//! concurrent writers, readers and resizers each observe the buffer
//! atomically.
//!
//! # Convenience Functions
//!
//! The [`bytes`] module provides pre-sized constructors:
//!
//! ```
//! use bytefifo_buffer::{fifo_32b, fifo_4kb};
//!
//! let small = fifo_32b().unwrap();
//! let large = fifo_4kb().unwrap();
//! ```

mod bytes;
mod error;
mod fifo;

pub use bytes::*;
pub use error::{AllocError, ResizeError};
pub use fifo::{FifoBuffer, FifoInfo};
