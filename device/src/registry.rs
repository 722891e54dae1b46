//! Device pool construction, lookup and teardown.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::error::{DeviceError, Result};
use crate::instance::DeviceInstance;

/// Configuration for a device registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Number of device instances in the pool.
    pub pool_size: usize,
    /// Per-instance buffer capacity in bytes.
    pub capacity: usize,
    /// Drain task period. Default: 1000 ms.
    pub drain_period: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            pool_size: 4,
            capacity: 32,
            drain_period: Duration::from_millis(1000),
        }
    }
}

/// A fixed pool of device instances, indexed 0..pool_size.
///
/// The pool is all-or-nothing: `initialize` either returns a fully
/// populated registry or tears down everything it built and fails. After
/// [`teardown`](DeviceRegistry::teardown) the registry is empty and every
/// lookup fails.
pub struct DeviceRegistry {
    devices: Vec<Arc<DeviceInstance>>,
}

impl DeviceRegistry {
    /// Constructs a pool of `config.pool_size` instances in index order.
    ///
    /// If construction of instance *k* fails, instances 0..k-1 are torn
    /// down in reverse order and the error is returned — a partially
    /// constructed pool is never observable.
    pub fn initialize(config: RegistryConfig) -> Result<Self> {
        let capacity = config.capacity;
        let period = config.drain_period;
        Self::initialize_with(config.pool_size, |index| {
            DeviceInstance::new(index, capacity, period)
        })
    }

    fn initialize_with(
        pool_size: usize,
        make: impl Fn(usize) -> Result<DeviceInstance>,
    ) -> Result<Self> {
        if pool_size == 0 {
            return Err(DeviceError::InvalidArgument(
                "pool size must be greater than 0".to_string(),
            ));
        }

        let mut devices = Vec::with_capacity(pool_size);
        for index in 0..pool_size {
            match make(index) {
                Ok(device) => devices.push(Arc::new(device)),
                Err(e) => {
                    error!(index, error = %e, "device construction failed, rolling back");
                    // No drain task can be running yet, so reverse-order
                    // release of the built instances is a plain drop.
                    while devices.pop().is_some() {}
                    return Err(e);
                }
            }
        }

        info!(pool_size, "device registry initialized");
        Ok(Self { devices })
    }

    /// Returns the number of live instances (0 after teardown).
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns true once the registry has been torn down.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Looks up the instance at `index`.
    pub fn lookup(&self, index: usize) -> Result<Arc<DeviceInstance>> {
        self.devices
            .get(index)
            .cloned()
            .ok_or(DeviceError::NotFound(index))
    }

    /// Tears the pool down: stops and joins every running drain task, then
    /// releases the instances.
    ///
    /// Idempotent — calling it on an already-torn-down registry is a no-op.
    pub async fn teardown(&mut self) {
        if self.devices.is_empty() {
            debug!("registry already torn down");
            return;
        }

        while let Some(device) = self.devices.pop() {
            device.stop_drain().await;
            debug!(index = device.index(), "device instance released");
        }
        info!("device registry torn down");
    }
}
