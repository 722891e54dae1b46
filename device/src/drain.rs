//! Periodic background drain task.
//!
//! While running, a drain task removes one byte from its instance's buffer
//! every period and logs it. A tick that finds the buffer empty stops the
//! task; it does not reschedule itself.

use std::time::Duration;

use bytefifo_buffer::FifoBuffer;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Handle to a running (or finished) drain task.
///
/// The task ticks until cancelled or until the buffer runs empty. `stop`
/// provides join semantics: once it returns, the task can never run again.
pub(crate) struct DrainTask {
    cancel: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl DrainTask {
    /// Spawns a drain task over the given buffer handle.
    ///
    /// Each tick takes the buffer's internal lock via `take_one`, so ticks
    /// serialize against reads, writes and control operations on the same
    /// instance.
    pub(crate) fn spawn(index: usize, fifo: FifoBuffer, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let join = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => return,
                    _ = tokio::time::sleep(period) => {
                        match fifo.take_one() {
                            Some(byte) => {
                                debug!(index, byte, "drained one byte from fifo");
                            }
                            None => {
                                info!(index, "fifo empty, drain task stopping");
                                return;
                            }
                        }
                    }
                }
            }
        });

        Self {
            cancel,
            join: Some(join),
        }
    }

    /// Returns true if the task has exited (cancelled or self-stopped).
    pub(crate) fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(|join| join.is_finished())
    }

    /// Cancels the task and waits for it to exit.
    ///
    /// An in-flight tick is allowed to finish; no further tick runs after
    /// this returns, so the buffer may be resized or destroyed immediately.
    pub(crate) async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl Drop for DrainTask {
    fn drop(&mut self) {
        // A dropped handle can no longer be joined; cancelling here keeps the
        // task from outliving its instance.
        self.cancel.cancel();
    }
}
