//! Bounded pool of codec slots.
//!
//! Encoders are CPU bound, so at most `capacity` jobs run at once. A job holds a
//! [`CodecLease`] for its whole blocking section; the slot is returned when the lease
//! drops, including when the job is abandoned after a timeout.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
pub struct CodecPool {
    permits: Arc<Semaphore>,
    capacity: usize,
}

/// A reserved codec slot.
#[derive(Debug)]
pub struct CodecLease {
    _permit: OwnedSemaphorePermit,
}

impl CodecPool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        CodecPool {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently leased.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Wait for a free slot. Returns `None` if `cancel` fires first.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Option<CodecLease> {
        tokio::select! {
            _ = cancel.cancelled() => None,
            permit = self.permits.clone().acquire_owned() => {
                permit.ok().map(|permit| CodecLease { _permit: permit })
            }
        }
    }
}
