//! Pending-request bookkeeping: which outstanding request id was sent for what.

use crate::backend::RequestId;
use std::collections::HashMap;

/// Maps outstanding request ids to the intent that issued them.
///
/// Each id is consumed at most once; a response whose id is unknown (stale,
/// duplicate, or produced by another model) resolves to `None`.
#[derive(Debug)]
pub struct Correlator<I> {
    pending: HashMap<RequestId, I>,
}

impl<I> Default for Correlator<I> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<I> Correlator<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `intent` under a fresh request id.
    pub fn begin(&mut self, intent: I) -> RequestId {
        let request_id = RequestId::new();
        self.pending.insert(request_id, intent);
        request_id
    }

    /// Take the intent recorded for `request_id`.
    pub fn resolve(&mut self, request_id: RequestId) -> Option<I> {
        self.pending.remove(&request_id)
    }

    pub fn contains(&self, request_id: RequestId) -> bool {
        self.pending.contains_key(&request_id)
    }

    pub fn peek(&self, request_id: RequestId) -> Option<&I> {
        self.pending.get(&request_id)
    }

    /// Whether any outstanding intent matches `predicate`.
    pub fn any<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&I) -> bool,
    {
        self.pending.values().any(|intent| predicate(intent))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forget every outstanding request; late responses become no-ops.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
