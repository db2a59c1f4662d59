//! The blocking-call boundary.
//!
//! Every device call is blocking network I/O and runs on the blocking
//! thread pool, bounded by a timeout, so one unreachable device never
//! stalls the polling of others. The handle lives in a mutex crossing
//! the boundary; since each adapter issues at most one call at a time
//! the lock is uncontended and only enforces the no-multiplexing rule.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::device::{CommandResult, DeviceCall, MiioDevice, StateSnapshot, TransportError};

/// Device handle as it crosses the spawn_blocking boundary.
pub type SharedDevice = Arc<Mutex<Box<dyn MiioDevice>>>;

/// Wrap a freshly connected handle for executor use.
pub fn share(device: Box<dyn MiioDevice>) -> SharedDevice {
    Arc::new(Mutex::new(device))
}

pub(crate) async fn offload<T, F>(call: F, timeout: Duration) -> Result<T, TransportError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, TransportError> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(call);
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(TransportError::Executor(join_err.to_string())),
        Err(_) => Err(TransportError::Timeout(timeout)),
    }
}

/// Execute a command call off the cooperative scheduler.
pub async fn execute(
    device: SharedDevice,
    call: DeviceCall,
    timeout: Duration,
) -> Result<CommandResult, TransportError> {
    offload(
        move || {
            let mut device = device.lock();
            match call {
                DeviceCall::On => device.on(),
                DeviceCall::Off => device.off(),
                DeviceCall::Set(property) => device.set_property(property),
            }
        },
        timeout,
    )
    .await
}

/// Fetch a status snapshot off the cooperative scheduler.
pub async fn fetch_status(
    device: SharedDevice,
    timeout: Duration,
) -> Result<StateSnapshot, TransportError> {
    offload(
        move || {
            let mut device = device.lock();
            device.status()
        },
        timeout,
    )
    .await
}
