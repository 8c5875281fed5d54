use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{ContextFactory, PortalContext};

struct Entry {
    context: Arc<Mutex<PortalContext>>,
    last_seen: DateTime<Utc>,
}

pub const DEFAULT_MAX_CONTEXTS: usize = 10_000;

/// Live portal contexts keyed by the id stored in the visitor's session.
///
/// Holds at most `max_contexts`; making room evicts the least recently seen.
pub struct SessionRegistry {
    contexts: DashMap<Uuid, Entry>,
    factory: ContextFactory,
    max_contexts: usize,
}

impl SessionRegistry {
    pub fn new(factory: ContextFactory) -> Self {
        Self::with_max_contexts(factory, DEFAULT_MAX_CONTEXTS)
    }

    pub fn with_max_contexts(factory: ContextFactory, max_contexts: usize) -> Self {
        Self {
            contexts: DashMap::new(),
            factory,
            max_contexts: max_contexts.max(1),
        }
    }

    /// Fresh context that is not tracked, for visitors who only read.
    pub fn detached(&self) -> Arc<Mutex<PortalContext>> {
        Arc::new(Mutex::new(self.factory.build()))
    }

    /// Context for `id`, created on first use. Marks the session as seen.
    pub fn get_or_create(&self, id: Uuid) -> Arc<Mutex<PortalContext>> {
        if !self.contexts.contains_key(&id) {
            self.make_room();
        }

        let mut entry = self.contexts.entry(id).or_insert_with(|| {
            tracing::debug!(portal_id = %id, "Creating portal context");
            Entry {
                context: Arc::new(Mutex::new(self.factory.build())),
                last_seen: Utc::now(),
            }
        });
        entry.last_seen = Utc::now();
        Arc::clone(&entry.context)
    }

    fn make_room(&self) {
        while self.contexts.len() >= self.max_contexts {
            let oldest = self
                .contexts
                .iter()
                .min_by_key(|entry| entry.last_seen)
                .map(|entry| *entry.key());

            match oldest {
                Some(id) => {
                    self.contexts.remove(&id);
                    tracing::debug!(portal_id = %id, "Evicted least recently seen portal context");
                }
                None => break,
            }
        }
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.contexts.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Drop contexts not seen since `cutoff`. Returns how many were dropped.
    pub fn prune_seen_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.contexts.len();
        self.contexts.retain(|_, entry| entry.last_seen >= cutoff);
        before.saturating_sub(self.contexts.len())
    }

    pub fn prune_idle(&self, max_idle: chrono::Duration) -> usize {
        self.prune_seen_before(Utc::now() - max_idle)
    }
}

/// Periodically drop idle contexts, mirroring the session cookie expiry.
pub fn spawn_reaper(
    registry: Arc<SessionRegistry>,
    max_idle: chrono::Duration,
    every: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let pruned = registry.prune_idle(max_idle);
            if pruned > 0 {
                tracing::info!(pruned, remaining = registry.len(), "Pruned idle portal sessions");
            }
        }
    })
}
