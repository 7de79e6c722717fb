//! Per-user cache of rendered read views.
//!
//! Read handlers store the JSON they computed; mutations invalidate the views
//! they made stale so the next read recomputes from the database.
//!
//! Each user has a generation counter that [`ViewCache::invalidate`] bumps. A
//! read takes a [`Ticket`] before querying and [`ViewCache::insert`] drops the
//! value if the generation moved meanwhile, so a view computed before a
//! concurrent mutation is never stored after it. Entries also expire after a
//! TTL and the map holds at most `capacity` entries.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
    time::{Duration, Instant},
};

use serde_json::Value;

const DEFAULT_TTL: Duration = Duration::from_secs(300);
const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Deck(i64),
}

/// Generation observed by a read before it went to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
struct Entry {
    value: Value,
    stored_at: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<(String, View), Entry>,
    generations: HashMap<String, u64>,
}

impl Inner {
    fn generation(&self, user_id: &str) -> u64 {
        self.generations.get(user_id).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct ViewCache {
    inner: Arc<RwLock<Inner>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::with_limits(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: Arc::default(),
            ttl,
            capacity,
        }
    }

    /// Take before computing a view that will be passed to [`ViewCache::insert`].
    pub fn ticket(&self, user_id: &str) -> Ticket {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ticket(inner.generation(user_id))
    }

    pub fn get(&self, user_id: &str, view: View) -> Option<Value> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .entries
            .get(&(user_id.to_string(), view))
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Store a view unless the user's views were invalidated since `ticket`.
    ///
    /// Returns whether the value was stored.
    pub fn insert(&self, user_id: &str, view: View, ticket: Ticket, value: Value) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if inner.generation(user_id) != ticket.0 {
            tracing::debug!(user_id, ?view, "Discarded view computed before an invalidation");
            return false;
        }

        let key = (user_id.to_string(), view);
        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            self.make_room(&mut inner);
        }
        if self.capacity == 0 {
            return false;
        }

        inner.entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
        true
    }

    /// Drop expired entries, then the oldest one if still full.
    fn make_room(&self, inner: &mut Inner) {
        let ttl = self.ttl;
        inner.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);

        if inner.entries.len() >= self.capacity {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                inner.entries.remove(&key);
            }
        }
    }

    /// Drop the given views for one user and move their generation forward.
    pub fn invalidate(&self, user_id: &str, views: &[View]) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *inner.generations.entry(user_id.to_string()).or_insert(0) += 1;
        for view in views {
            inner.entries.remove(&(user_id.to_string(), *view));
        }
        tracing::debug!(user_id, ?views, "Invalidated cached views");
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
