//! Bounded, time-windowed set of message ids already handled.
//!
//! Ids are kept in order of last sighting. Seeing a remembered id again
//! refreshes it, so an id is forgotten only once it has gone unseen for the
//! whole window, or when the cache is full and a newer id needs the slot.

use std::{
    collections::{HashSet, VecDeque},
    time::Duration,
};

use tokio::time::Instant;

pub struct SeenCache {
    capacity: usize,
    ttl: Duration,
    order: VecDeque<(String, Instant)>,
    ids: HashSet<String>,
}

impl SeenCache {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            ttl,
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True if `id` is remembered as of `now`.
    pub fn contains(&mut self, id: &str, now: Instant) -> bool {
        self.expire(now);
        self.ids.contains(id)
    }

    /// Remember `id`. Returns false if it was already remembered, in which
    /// case its sighting time is refreshed to `now`.
    pub fn insert(&mut self, id: &str, now: Instant) -> bool {
        self.expire(now);
        if self.ids.contains(id) {
            if let Some(pos) = self.order.iter().position(|(seen, _)| seen == id) {
                if let Some((refreshed, _)) = self.order.remove(pos) {
                    self.order.push_back((refreshed, now));
                }
            }
            return false;
        }
        while self.order.len() >= self.capacity {
            if let Some((evicted, _)) = self.order.pop_front() {
                self.ids.remove(&evicted);
            }
        }
        self.order.push_back((id.to_string(), now));
        self.ids.insert(id.to_string());
        true
    }

    /// Drop every id last seen more than `ttl` before `now`.
    pub fn expire(&mut self, now: Instant) {
        while let Some((_, seen_at)) = self.order.front() {
            if now.saturating_duration_since(*seen_at) <= self.ttl {
                break;
            }
            if let Some((expired, _)) = self.order.pop_front() {
                self.ids.remove(&expired);
            }
        }
    }
}
