//! The persisted set of missed missions.
//!
//! Every mission answered incorrectly lands here once and stays until the
//! queue is cleared. The set is stored under a single key as a versioned
//! JSON document: `{"version":1,"ids":["m1","m3"]}`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::Store;

/// Store key for the mistake set.
pub const MISTAKES_KEY: &str = "linux-service-quest-mistakes-v1";

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct MistakeDocument {
    version: u32,
    ids: Vec<String>,
}

/// Mission ids the learner has answered incorrectly, in first-miss order.
#[derive(Debug, Clone, Default)]
pub struct MistakeQueue {
    ids: Vec<String>,
    unsaved: bool,
}

impl MistakeQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the queue from a store; anything unusable loads as empty.
    pub fn load(store: &dyn Store) -> Self {
        let ids = store
            .get(MISTAKES_KEY)
            .map(|raw| decode(&raw))
            .unwrap_or_default();
        Self {
            ids,
            unsaved: false,
        }
    }

    /// Record a miss. Returns true if the id was not already queued.
    pub fn add(&mut self, store: &mut dyn Store, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        debug!(mission = id, queued = self.ids.len(), "mistake recorded");
        self.persist(store);
        true
    }

    /// Empty the queue.
    pub fn clear(&mut self, store: &mut dyn Store) {
        self.ids.clear();
        match store.remove(MISTAKES_KEY) {
            Ok(()) => self.unsaved = false,
            Err(e) => {
                warn!(error = %e, "could not clear stored mistakes");
                self.unsaved = true;
            }
        }
    }

    /// Snapshot of the queued ids.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Whether a mission is queued.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    /// Number of queued ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether the last write to the store failed.
    pub fn unsaved(&self) -> bool {
        self.unsaved
    }

    fn persist(&mut self, store: &mut dyn Store) {
        let doc = MistakeDocument {
            version: FORMAT_VERSION,
            ids: self.ids.clone(),
        };
        let result = serde_json::to_string(&doc)
            .map_err(crate::error::StoreError::from)
            .and_then(|json| store.set(MISTAKES_KEY, &json));
        match result {
            Ok(()) => self.unsaved = false,
            Err(e) => {
                warn!(error = %e, "mistakes not saved");
                self.unsaved = true;
            }
        }
    }
}

fn decode(raw: &str) -> Vec<String> {
    let doc = match serde_json::from_str::<MistakeDocument>(raw) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "unreadable mistake set, starting empty");
            return Vec::new();
        }
    };
    if doc.version != FORMAT_VERSION {
        warn!(version = doc.version, "unknown mistake set version, starting empty");
        return Vec::new();
    }
    let mut ids: Vec<String> = Vec::with_capacity(doc.ids.len());
    for id in doc.ids {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
