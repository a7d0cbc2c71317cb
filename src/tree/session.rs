//! Per-parse context: the ambient file name and the node-identifier source.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::NodeId;

static PROCESS_IDS: Lazy<Arc<IdGenerator>> = Lazy::new(|| Arc::new(IdGenerator::new()));

/// Hands out node identifiers. Safe to share between sessions on different threads.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// One generator for the whole process, for callers that parse many files and
    /// want identifiers unique across all of them.
    pub fn process_wide() -> Arc<IdGenerator> {
        Arc::clone(&PROCESS_IDS)
    }

    pub fn next_id(&self) -> NodeId {
        NodeId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The identifier the next call to [`next_id`](Self::next_id) would return.
    pub fn peek(&self) -> NodeId {
        NodeId(self.next.load(Ordering::Relaxed))
    }
}

/// Context for building one tree.
#[derive(Debug, Clone)]
pub struct ParseSession {
    file_name: Arc<str>,
    ids: Arc<IdGenerator>,
}

impl ParseSession {
    /// A session with its own identifier generator.
    pub fn new(file_name: impl Into<Arc<str>>) -> Self {
        Self::with_ids(file_name, Arc::new(IdGenerator::new()))
    }

    /// A session drawing identifiers from a shared generator.
    pub fn with_ids(file_name: impl Into<Arc<str>>, ids: Arc<IdGenerator>) -> Self {
        Self {
            file_name: file_name.into(),
            ids,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub(crate) fn shared_file_name(&self) -> Arc<str> {
        Arc::clone(&self.file_name)
    }

    pub fn ids(&self) -> &Arc<IdGenerator> {
        &self.ids
    }

    pub fn next_id(&self) -> NodeId {
        self.ids.next_id()
    }
}
