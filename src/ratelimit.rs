//! Per-client sliding-window rate limiter.
//!
//! Each client address owns a list of request timestamps. On every admission
//! check the list is pruned to the trailing window, then compared against the
//! quota. A rejected request is NOT recorded, so hammering a throttled
//! endpoint does not push the window further into the future.
//!
//! State lives in a `DashMap`; mutation of one client's record holds that
//! key's shard entry, so concurrent requests from the same address are
//! serialized without a global lock.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::{CritiqError, Result};

/// Request timestamps from a single client within the window.
#[derive(Debug, Default)]
struct ClientRecord {
    timestamps: Vec<Instant>,
}

impl ClientRecord {
    /// Drop timestamps that have aged out of the window.
    fn prune(&mut self, now: Instant, window: Duration) {
        self.timestamps
            .retain(|&t| now.duration_since(t) < window);
    }
}

/// Sliding-window limiter keyed by client address.
///
/// Distinct addresses accumulate entries for the process lifetime; there is
/// no background sweep. Stale timestamps within an entry are pruned lazily on
/// that client's next request.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    clients: DashMap<IpAddr, ClientRecord>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: DashMap::new(),
        }
    }

    /// Admit or reject a request from `client` at the current instant.
    ///
    /// # Errors
    ///
    /// Returns [`CritiqError::RateLimited`] when the client already has
    /// `max_requests` admitted requests inside the window.
    pub fn try_acquire(&self, client: IpAddr) -> Result<()> {
        self.try_acquire_at(client, Instant::now())
    }

    /// Admission check against an explicit clock reading. Lets tests walk the
    /// window without sleeping.
    pub fn try_acquire_at(&self, client: IpAddr, now: Instant) -> Result<()> {
        let mut record = self.clients.entry(client).or_default();
        record.prune(now, self.window);

        // Check BEFORE recording: a rejected request leaves no trace.
        if record.timestamps.len() >= self.max_requests {
            return Err(CritiqError::RateLimited);
        }

        record.timestamps.push(now);
        Ok(())
    }
}
