//! Bounded FIFO byte buffer implementation.

use std::sync::{Arc, Mutex};

use crate::error::{AllocError, ResizeError};

/// A point-in-time view of a buffer's occupancy.
///
/// `available` is always `capacity - length`; the three fields are read
/// under the buffer lock, so they are mutually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoInfo {
    /// Total capacity in bytes.
    pub capacity: usize,
    /// Bytes currently held.
    pub length: usize,
    /// Bytes that can still be written.
    pub available: usize,
}

/// A thread-safe bounded FIFO byte buffer.
///
/// `FifoBuffer` is a circular byte queue with a fixed capacity. Writes that
/// do not fit are truncated to the free space (never overwriting buffered
/// data), and reads are truncated to the bytes held. Neither blocks.
///
/// # Semantics
///
/// - **Write**: stores the leading bytes that fit, returns the stored count
///   (0 when full)
/// - **Read**: removes up to the requested count, oldest first
/// - **Resize**: replaces the backing storage, preserving buffered bytes in
///   order; fails without side effects if they would not fit
///
/// # Example
///
/// ```
/// use bytefifo_buffer::FifoBuffer;
///
/// let buf = FifoBuffer::new(4).unwrap();
///
/// // Only 4 of these 6 bytes fit
/// assert_eq!(buf.write(&[1, 2, 3, 4, 5, 6]), 4);
///
/// let mut out = [0u8; 8];
/// let n = buf.read(&mut out);
/// assert_eq!(&out[..n], &[1, 2, 3, 4]);
/// ```
pub struct FifoBuffer {
    inner: Arc<FifoInner>,
}

struct FifoInner {
    state: Mutex<FifoState>,
}

struct FifoState {
    buf: Vec<u8>,
    // Virtual counters that track total read/write positions. These grow
    // monotonically and wrap after 2^64 operations on 64-bit systems; the
    // implementation uses wrapping arithmetic to handle this correctly.
    // Writes never outrun reads by more than `buf.len()`, so the occupancy
    // is always tail - head (wrapping).
    head: usize, // read position (virtual counter)
    tail: usize, // write position (virtual counter)
}

impl FifoState {
    fn length(&self) -> usize {
        self.tail.wrapping_sub(self.head)
    }
}

impl Clone for FifoBuffer {
    fn clone(&self) -> Self {
        FifoBuffer {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl FifoBuffer {
    /// Creates a new FifoBuffer with the specified capacity.
    ///
    /// Fails with [`AllocError::ZeroCapacity`] for a zero capacity and
    /// [`AllocError::Exhausted`] when the backing storage cannot be
    /// allocated.
    pub fn new(capacity: usize) -> Result<Self, AllocError> {
        if capacity == 0 {
            return Err(AllocError::ZeroCapacity);
        }
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity).map_err(AllocError::Exhausted)?;
        buf.resize(capacity, 0);

        Ok(FifoBuffer {
            inner: Arc::new(FifoInner {
                state: Mutex::new(FifoState {
                    buf,
                    head: 0,
                    tail: 0,
                }),
            }),
        })
    }

    /// Returns the number of bytes currently in the buffer.
    pub fn len(&self) -> usize {
        let state = self.inner.state.lock().unwrap();
        state.length()
    }

    /// Returns the buffer capacity.
    pub fn capacity(&self) -> usize {
        let state = self.inner.state.lock().unwrap();
        state.buf.len()
    }

    /// Returns the number of bytes that can be written without truncation.
    pub fn available(&self) -> usize {
        let state = self.inner.state.lock().unwrap();
        state.buf.len() - state.length()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        let state = self.inner.state.lock().unwrap();
        state.head == state.tail
    }

    /// Returns a consistent snapshot of capacity, length and free space.
    pub fn info(&self) -> FifoInfo {
        let state = self.inner.state.lock().unwrap();
        let capacity = state.buf.len();
        let length = state.length();
        FifoInfo {
            capacity,
            length,
            available: capacity - length,
        }
    }

    /// Writes data to the buffer.
    ///
    /// Stores as many leading bytes of `data` as fit in the free space and
    /// returns the stored count, which is 0 when the buffer is full. Never
    /// blocks; buffered data is never overwritten.
    pub fn write(&self, data: &[u8]) -> usize {
        let mut state = self.inner.state.lock().unwrap();

        let capacity = state.buf.len();
        let available = capacity - state.length();
        let n = data.len().min(available);

        for &byte in &data[..n] {
            let tail_idx = state.tail % capacity;
            state.buf[tail_idx] = byte;
            state.tail = state.tail.wrapping_add(1);
        }

        n
    }

    /// Reads data from the buffer.
    ///
    /// Removes up to `buf.len()` bytes in FIFO order (oldest first) and
    /// returns the removed count, which is less than requested when fewer
    /// bytes are held. Never blocks.
    pub fn read(&self, buf: &mut [u8]) -> usize {
        let mut state = self.inner.state.lock().unwrap();

        let capacity = state.buf.len();
        let n = buf.len().min(state.length());

        for slot in &mut buf[..n] {
            let head_idx = state.head % capacity;
            *slot = state.buf[head_idx];
            state.head = state.head.wrapping_add(1);
        }

        n
    }

    /// Removes and returns the oldest byte, or `None` when empty.
    pub fn take_one(&self) -> Option<u8> {
        let mut state = self.inner.state.lock().unwrap();

        if state.head == state.tail {
            return None;
        }

        let capacity = state.buf.len();
        let head_idx = state.head % capacity;
        let byte = state.buf[head_idx];
        state.head = state.head.wrapping_add(1);

        Some(byte)
    }

    /// Resets the buffer by discarding all buffered bytes.
    ///
    /// Capacity is unchanged. O(1).
    pub fn reset(&self) {
        let mut state = self.inner.state.lock().unwrap();
        state.head = 0;
        state.tail = 0;
    }

    /// Replaces the backing storage with one of `new_capacity` bytes.
    ///
    /// Buffered bytes are preserved in FIFO order, moved to the start of the
    /// new storage. On any failure the buffer is left byte-for-byte
    /// unchanged:
    ///
    /// - [`ResizeError::InvalidCapacity`] when `new_capacity` is 0
    /// - [`ResizeError::TooSmall`] when `new_capacity` is less than the
    ///   bytes currently held
    /// - [`ResizeError::Alloc`] when the new storage cannot be allocated
    pub fn resize(&self, new_capacity: usize) -> Result<(), ResizeError> {
        let mut state = self.inner.state.lock().unwrap();

        if new_capacity == 0 {
            return Err(ResizeError::InvalidCapacity);
        }
        let length = state.length();
        if new_capacity < length {
            return Err(ResizeError::TooSmall { required: length });
        }

        let mut new_buf = Vec::new();
        new_buf
            .try_reserve_exact(new_capacity)
            .map_err(ResizeError::Alloc)?;
        new_buf.resize(new_capacity, 0);

        // Unspool the live bytes to offset 0 of the new storage.
        let capacity = state.buf.len();
        for (i, slot) in new_buf[..length].iter_mut().enumerate() {
            let idx = state.head.wrapping_add(i) % capacity;
            *slot = state.buf[idx];
        }

        state.buf = new_buf;
        state.head = 0;
        state.tail = length;

        Ok(())
    }

    /// Returns a copy of the buffered bytes in FIFO order without removing
    /// them.
    pub fn to_vec(&self) -> Vec<u8> {
        let state = self.inner.state.lock().unwrap();
        let capacity = state.buf.len();
        let count = state.length();
        let mut result = Vec::with_capacity(count);

        for i in 0..count {
            let idx = state.head.wrapping_add(i) % capacity;
            result.push(state.buf[idx]);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_basic_write_read() {
        let buf = FifoBuffer::new(8).unwrap();
        assert_eq!(buf.write(&[1, 2, 3]), 3);

        let mut data = [0u8; 3];
        let n = buf.read(&mut data);
        assert_eq!(n, 3);
        assert_eq!(data, [1, 2, 3]);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            FifoBuffer::new(0),
            Err(AllocError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_write_truncates_when_full() {
        let buf = FifoBuffer::new(4).unwrap();

        assert_eq!(buf.write(&[1, 2, 3]), 3);
        // Only one byte of space left
        assert_eq!(buf.write(&[4, 5, 6]), 1);
        assert_eq!(buf.len(), 4);
        // Full: write stores nothing, data intact
        assert_eq!(buf.write(&[7]), 0);
        assert_eq!(buf.to_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_read_truncates_when_short() {
        let buf = FifoBuffer::new(8).unwrap();
        buf.write(&[1, 2]);

        let mut data = [0u8; 5];
        assert_eq!(buf.read(&mut data), 2);
        assert_eq!(&data[..2], &[1, 2]);
        // Empty now
        assert_eq!(buf.read(&mut data), 0);
    }

    #[test]
    fn test_fifo_order_across_wrap() {
        let buf = FifoBuffer::new(4).unwrap();
        let mut out = [0u8; 4];

        // Cycle enough data through to wrap the cursors several times.
        for round in 0u8..10 {
            let chunk = [round, round + 100, round + 200];
            assert_eq!(buf.write(&chunk), 3);
            assert_eq!(buf.read(&mut out[..3]), 3);
            assert_eq!(&out[..3], &chunk);
        }
    }

    #[test]
    fn test_length_conservation() {
        let buf = FifoBuffer::new(16).unwrap();
        let mut written = 0usize;
        let mut read = 0usize;
        let mut out = [0u8; 8];

        written += buf.write(&[0; 12]);
        read += buf.read(&mut out);
        written += buf.write(&[0; 12]);
        read += buf.read(&mut out[..3]);

        assert_eq!(buf.len(), written - read);
        assert!(buf.len() <= buf.capacity());
        assert_eq!(buf.available(), buf.capacity() - buf.len());
    }

    #[test]
    fn test_take_one() {
        let buf = FifoBuffer::new(4).unwrap();
        assert_eq!(buf.take_one(), None);

        buf.write(&[7, 8]);
        assert_eq!(buf.take_one(), Some(7));
        assert_eq!(buf.take_one(), Some(8));
        assert_eq!(buf.take_one(), None);
    }

    #[test]
    fn test_reset() {
        let buf = FifoBuffer::new(8).unwrap();
        buf.write(&[1, 2, 3]);
        assert_eq!(buf.len(), 3);

        buf.reset();
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 8);
        // Reusable after reset
        assert_eq!(buf.write(&[9]), 1);
        assert_eq!(buf.take_one(), Some(9));
    }

    #[test]
    fn test_info_snapshot() {
        let buf = FifoBuffer::new(32).unwrap();
        buf.write(&[0; 10]);

        let info = buf.info();
        assert_eq!(info.capacity, 32);
        assert_eq!(info.length, 10);
        assert_eq!(info.available, 22);
    }

    #[test]
    fn test_resize_grow_preserves_contents() {
        let buf = FifoBuffer::new(4).unwrap();
        buf.write(&[1, 2, 3, 4]);
        // Wrap the cursors so the live bytes straddle the storage boundary.
        let mut out = [0u8; 2];
        buf.read(&mut out);
        buf.write(&[5, 6]);

        buf.resize(8).unwrap();
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.to_vec(), vec![3, 4, 5, 6]);

        // New space is usable
        assert_eq!(buf.write(&[7, 8, 9, 10]), 4);
        assert_eq!(buf.to_vec(), vec![3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_resize_shrink_to_length() {
        let buf = FifoBuffer::new(8).unwrap();
        buf.write(&[1, 2, 3]);

        buf.resize(3).unwrap();
        let info = buf.info();
        assert_eq!(info.capacity, 3);
        assert_eq!(info.length, 3);
        assert_eq!(info.available, 0);
        assert_eq!(buf.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_resize_too_small_is_side_effect_free() {
        let buf = FifoBuffer::new(8).unwrap();
        buf.write(&[1, 2, 3, 4, 5]);
        let before = buf.info();

        match buf.resize(4) {
            Err(ResizeError::TooSmall { required }) => assert_eq!(required, 5),
            other => panic!("expected TooSmall, got {:?}", other),
        }

        assert_eq!(buf.info(), before);
        assert_eq!(buf.to_vec(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_resize_zero_is_invalid() {
        let buf = FifoBuffer::new(8).unwrap();
        buf.write(&[1]);

        assert!(matches!(buf.resize(0), Err(ResizeError::InvalidCapacity)));
        assert_eq!(buf.to_vec(), vec![1]);
    }

    #[test]
    fn test_resize_empty_buffer() {
        let buf = FifoBuffer::new(8).unwrap();
        buf.resize(2).unwrap();
        assert_eq!(buf.capacity(), 2);
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn test_shared_handles_see_same_state() {
        let buf = FifoBuffer::new(16).unwrap();
        let writer = buf.clone();

        let handle = thread::spawn(move || {
            writer.write(&[1, 2, 3, 4]);
        });
        handle.join().unwrap();

        assert_eq!(buf.len(), 4);
        assert_eq!(buf.to_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_concurrent_writers_never_exceed_capacity() {
        let buf = FifoBuffer::new(32).unwrap();
        let mut handles = Vec::new();

        for _ in 0..4 {
            let writer = buf.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    writer.write(&[0xAB; 7]);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let info = buf.info();
        assert!(info.length <= info.capacity);
        assert_eq!(info.available, info.capacity - info.length);
    }
}
