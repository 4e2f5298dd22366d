//! Observer registry for the button resource.
//!
//! Watchers subscribe with a GET carrying the observe option and receive one
//! [`Notification`] per reset press.  The table is fixed-size; a full table
//! answers new subscriptions with 5.03.

use heapless::Vec;
use log::{debug, info};

use super::ClientId;
use crate::error::RequestError;

/// Maximum concurrent watchers.
pub const MAX_OBSERVERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub ClientId);

/// Stateless event pushed to every watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub resource: &'static str,
    /// Monotonic sequence number of the press.
    pub seq: u32,
}

#[derive(Debug, Default)]
pub struct ObserverRegistry {
    observers: Vec<ObserverId, MAX_OBSERVERS>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `id`.  Returns `Ok(false)` if it was already subscribed.
    pub fn register(&mut self, id: ObserverId) -> Result<bool, RequestError> {
        if self.observers.contains(&id) {
            debug!("observe: client {} already subscribed", id.0.0);
            return Ok(false);
        }
        self.observers
            .push(id)
            .map_err(|_| RequestError::ObserverLimit)?;
        info!("observe: client {} subscribed ({} total)", id.0.0, self.observers.len());
        Ok(true)
    }

    /// Unsubscribe `id`.  Returns `false` if it was not subscribed.
    pub fn deregister(&mut self, id: ObserverId) -> bool {
        match self.observers.iter().position(|o| *o == id) {
            Some(idx) => {
                self.observers.swap_remove(idx);
                info!("observe: client {} unsubscribed", id.0.0);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ObserverId> + '_ {
        self.observers.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
