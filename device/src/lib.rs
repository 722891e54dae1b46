//! Multi-instance pseudo character-device FIFO engine.
//!
//! This crate turns the bounded byte FIFO of `bytefifo-buffer` into a pool
//! of addressable device instances:
//!
//! - [`DeviceRegistry`]: constructs, indexes and tears down a fixed pool of
//!   instances with all-or-nothing setup
//! - [`DeviceInstance`]: one addressable unit — a buffer, open/close
//!   bookkeeping, and drain-task state
//! - [`ControlRequest`] / [`ControlReply`]: the out-of-band control protocol
//!   (clear, get-info, resize, start-drain, stop-drain)
//! - a per-instance drain task that removes one byte per period while
//!   enabled and stops itself when the buffer runs empty
//!
//! Reads, writes, control operations and drain ticks on one instance
//! serialize on that instance's buffer lock; instances never contend with
//! each other.
//!
//! # Example
//!
//! ```
//! use bytefifo_device::{ControlReply, ControlRequest, DeviceRegistry, RegistryConfig};
//!
//! tokio_test::block_on(async {
//!     let mut registry = DeviceRegistry::initialize(RegistryConfig::default()).unwrap();
//!
//!     let dev = registry.lookup(0).unwrap();
//!     dev.open();
//!     assert_eq!(dev.write(b"hello"), 5);
//!
//!     let reply = dev.control(ControlRequest::GetInfo).await.unwrap();
//!     if let ControlReply::Info(info) = reply {
//!         assert_eq!((info.capacity, info.length, info.available), (32, 5, 27));
//!     }
//!
//!     dev.close();
//!     registry.teardown().await;
//! });
//! ```

mod control;
mod drain;
mod error;
mod instance;
mod registry;

pub use control::{ControlReply, ControlRequest, DeviceInfo};
pub use error::{DeviceError, Result};
pub use instance::DeviceInstance;
pub use registry::{DeviceRegistry, RegistryConfig};
