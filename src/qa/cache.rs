//! Exact-match query cache.
//!
//! Bounded, insertion-ordered: when full, the earliest inserted entry goes
//! first. Lookups do not refresh an entry, and overwriting a key keeps its
//! original position.
//!
//! Single-writer: the cache is owned by the foreground loop and takes
//! `&mut self` for inserts. Wrap it in a lock before sharing across tasks.

use std::collections::{HashMap, VecDeque};

use crate::rag::ReviewDocument;

pub struct QueryCache<V = Vec<ReviewDocument>> {
    entries: HashMap<String, V>,
    order: VecDeque<String>,
    max_entries: usize,
}

impl<V> QueryCache<V> {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(max_entries + 1),
            order: VecDeque::with_capacity(max_entries + 1),
            max_entries,
        }
    }

    /// Case-sensitive, unnormalised match on the literal query.
    pub fn lookup(&self, query: &str) -> Option<&V> {
        self.entries.get(query)
    }

    pub fn insert(&mut self, query: &str, value: V) {
        if self.entries.insert(query.to_string(), value).is_none() {
            self.order.push_back(query.to_string());
        }

        if self.entries.len() > self.max_entries {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                tracing::debug!("Query cache full, evicted oldest entry");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }
}
