//! Device instance: one addressable buffer-plus-drain unit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytefifo_buffer::{FifoBuffer, ResizeError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::control::{ControlReply, ControlRequest, DeviceInfo};
use crate::drain::DrainTask;
use crate::error::{DeviceError, Result};

/// One addressable device instance.
///
/// An instance binds a 0-based index to an exclusively owned [`FifoBuffer`]
/// and to the state of its periodic drain task. All buffer mutation — reads,
/// writes, control operations and drain ticks — serializes on the buffer's
/// internal lock, so each operation is atomic with respect to the others.
///
/// Instances are created by
/// [`DeviceRegistry::initialize`](crate::DeviceRegistry::initialize) and
/// handed out as `Arc<DeviceInstance>` by
/// [`lookup`](crate::DeviceRegistry::lookup).
pub struct DeviceInstance {
    index: usize,
    fifo: FifoBuffer,
    opens: AtomicUsize,
    drain_period: Duration,
    // Holds the drain task while one exists. Locked across the stop/join
    // await so a concurrent start cannot observe a task that is being
    // stopped.
    drain: Mutex<Option<DrainTask>>,
}

impl DeviceInstance {
    pub(crate) fn new(index: usize, capacity: usize, drain_period: Duration) -> Result<Self> {
        let fifo = FifoBuffer::new(capacity)?;
        info!(index, capacity, "device instance created");
        Ok(Self {
            index,
            fifo,
            opens: AtomicUsize::new(0),
            drain_period,
            drain: Mutex::new(None),
        })
    }

    /// Returns the instance index, stable for the instance lifetime.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Records an open of this instance. Pure bookkeeping.
    pub fn open(&self) {
        let opens = self.opens.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(index = self.index, opens, "device opened");
    }

    /// Records a close of this instance. Pure bookkeeping; an unbalanced
    /// close is ignored.
    pub fn close(&self) {
        let _ = self
            .opens
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        debug!(index = self.index, "device closed");
    }

    /// Returns the current open count.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Writes data to the instance's buffer.
    ///
    /// Stores the leading bytes that fit and returns the stored count; never
    /// blocks and never errors (0 means the buffer was full).
    pub fn write(&self, data: &[u8]) -> usize {
        let written = self.fifo.write(data);
        debug!(
            index = self.index,
            written,
            requested = data.len(),
            "write to device buffer"
        );
        written
    }

    /// Reads data from the instance's buffer.
    ///
    /// Removes up to `buf.len()` bytes in FIFO order and returns the removed
    /// count; never blocks and never errors (0 means the buffer was empty).
    pub fn read(&self, buf: &mut [u8]) -> usize {
        let read = self.fifo.read(buf);
        debug!(
            index = self.index,
            read,
            requested = buf.len(),
            "read from device buffer"
        );
        read
    }

    /// Returns the buffer occupancy record.
    pub fn info(&self) -> DeviceInfo {
        self.fifo.info().into()
    }

    /// Applies a control request to this instance.
    pub async fn control(&self, request: ControlRequest) -> Result<ControlReply> {
        match request {
            ControlRequest::Clear => {
                self.fifo.reset();
                info!(index = self.index, "device buffer cleared");
                Ok(ControlReply::Done)
            }
            ControlRequest::GetInfo => Ok(ControlReply::Info(self.info())),
            ControlRequest::Resize { capacity } => {
                self.resize(capacity)?;
                Ok(ControlReply::Done)
            }
            ControlRequest::StartDrain => {
                self.start_drain().await;
                Ok(ControlReply::Done)
            }
            ControlRequest::StopDrain => {
                self.stop_drain().await;
                Ok(ControlReply::Done)
            }
        }
    }

    /// Replaces the buffer's backing storage with one of `new_capacity`
    /// bytes, preserving buffered bytes in order.
    ///
    /// On failure the buffer is byte-for-byte unchanged. The resize takes
    /// the same buffer lock the drain tick takes, so it never races an
    /// in-flight drain; a running drain continues on the new storage.
    pub fn resize(&self, new_capacity: usize) -> Result<()> {
        match self.fifo.resize(new_capacity) {
            Ok(()) => {
                info!(index = self.index, new_capacity, "device buffer resized");
                Ok(())
            }
            Err(e) => {
                warn!(index = self.index, new_capacity, error = %e, "resize failed");
                Err(match e {
                    ResizeError::InvalidCapacity => DeviceError::InvalidArgument(
                        "resize capacity must be greater than 0".to_string(),
                    ),
                    ResizeError::TooSmall { required } => DeviceError::CapacityExceeded {
                        required,
                        requested: new_capacity,
                    },
                    ResizeError::Alloc(e) => DeviceError::AllocationFailure(e.to_string()),
                })
            }
        }
    }

    /// Starts the periodic drain task.
    ///
    /// Idempotent: if a task is already running, no second task is started.
    /// A task that self-stopped on an empty buffer counts as stopped and is
    /// replaced.
    pub async fn start_drain(&self) {
        let mut slot = self.drain.lock().await;
        if let Some(task) = slot.as_ref() {
            if !task.is_finished() {
                debug!(index = self.index, "drain already running");
                return;
            }
        }
        *slot = Some(DrainTask::spawn(
            self.index,
            self.fifo.clone(),
            self.drain_period,
        ));
        // Let the freshly spawned task run to its first await so its period
        // timer is registered before we return; callers (and the paused-time
        // tests) can then rely on the drain ticking from this point.
        tokio::task::yield_now().await;
        info!(index = self.index, "drain started");
    }

    /// Stops the periodic drain task and waits for it to exit.
    ///
    /// Idempotent: a no-op when no task is running. Does not return until
    /// the task is guaranteed not to run again, so teardown immediately
    /// after is safe.
    pub async fn stop_drain(&self) {
        let mut slot = self.drain.lock().await;
        match slot.take() {
            Some(task) => {
                task.stop().await;
                info!(index = self.index, "drain stopped");
            }
            None => debug!(index = self.index, "drain not running"),
        }
    }

    /// Returns true while the drain task is running.
    pub async fn is_draining(&self) -> bool {
        let slot = self.drain.lock().await;
        slot.as_ref().is_some_and(|task| !task.is_finished())
    }
}
