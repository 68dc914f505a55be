//! Per-visitor submission bookkeeping: cooldown state and the in-flight guard

use crate::models::FormKind;
use crate::submission::RateLimitState;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct VisitorEntry {
    rate_limit: Arc<RateLimitState>,
    in_flight: HashSet<FormKind>,
    last_seen: Instant,
}

impl VisitorEntry {
    fn new() -> Self {
        Self {
            rate_limit: Arc::new(RateLimitState::new()),
            in_flight: HashSet::new(),
            last_seen: Instant::now(),
        }
    }
}

#[derive(Clone, Default)]
pub struct VisitorRegistry {
    visitors: Arc<Mutex<HashMap<IpAddr, VisitorEntry>>>,
}

impl VisitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rate_limit_for(&self, ip: IpAddr) -> Arc<RateLimitState> {
        let mut visitors = self.visitors.lock();
        let entry = visitors.entry(ip).or_insert_with(VisitorEntry::new);
        entry.last_seen = Instant::now();
        Arc::clone(&entry.rate_limit)
    }

    /// Marks a submission of `kind` from `ip` as in flight.
    /// Returns `None` while a previous one has not settled.
    pub fn begin_submission(&self, ip: IpAddr, kind: FormKind) -> Option<InFlightGuard> {
        let mut visitors = self.visitors.lock();
        let entry = visitors.entry(ip).or_insert_with(VisitorEntry::new);
        entry.last_seen = Instant::now();

        if !entry.in_flight.insert(kind) {
            return None;
        }

        Some(InFlightGuard {
            registry: self.clone(),
            ip,
            kind,
        })
    }

    pub fn is_in_flight(&self, ip: IpAddr, kind: FormKind) -> bool {
        self.visitors
            .lock()
            .get(&ip)
            .map(|entry| entry.in_flight.contains(&kind))
            .unwrap_or(false)
    }

    /// Drops visitors idle for longer than `max_idle` with nothing in flight.
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut visitors = self.visitors.lock();
        let before = visitors.len();

        visitors.retain(|_, entry| {
            !entry.in_flight.is_empty() || now.duration_since(entry.last_seen) < max_idle
        });

        before - visitors.len()
    }

    pub fn visitor_count(&self) -> usize {
        self.visitors.lock().len()
    }

    fn finish_submission(&self, ip: IpAddr, kind: FormKind) {
        if let Some(entry) = self.visitors.lock().get_mut(&ip) {
            entry.in_flight.remove(&kind);
            entry.last_seen = Instant::now();
        }
    }
}

/// Releases the in-flight slot when dropped.
pub struct InFlightGuard {
    registry: VisitorRegistry,
    ip: IpAddr,
    kind: FormKind,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.finish_submission(self.ip, self.kind);
    }
}
