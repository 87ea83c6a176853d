use std::collections::HashSet;

/// In-memory set of already-processed message ids.
///
/// Membership only grows within a run; there is no eviction and the ledger is
/// deliberately not cleared across reconnects, so ids seen before a reconnect
/// stay suppressed for the lifetime of the process.
#[derive(Debug, Default)]
pub struct Ledger {
    seen: HashSet<String>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Marks `id` as seen. Idempotent.
    pub fn record(&mut self, id: &str) {
        self.seen.insert(id.to_owned());
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
