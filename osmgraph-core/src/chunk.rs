//! Bounded batches of events handed to the loader.

use std::sync::Arc;

use crate::group::OsmGroups;
use crate::visitor::{InputEntityVisitor, VisitableEvent};

/// A finished batch of events from one pass.
///
/// A chunk is consumed once: every call to [`InputChunk::next`] visits the
/// following event until the batch is exhausted.
#[derive(Debug, Clone)]
pub struct InputChunk<E> {
    events: Vec<E>,
    cursor: usize,
    groups: Arc<OsmGroups>,
}

impl<E> InputChunk<E> {
    /// Wrap `events` for visiting against `groups`.
    #[must_use]
    pub const fn new(events: Vec<E>, groups: Arc<OsmGroups>) -> Self {
        Self {
            events,
            cursor: 0,
            groups,
        }
    }

    /// Number of events in the chunk, visited or not.
    #[must_use]
    pub fn size(&self) -> usize {
        self.events.len()
    }

    /// Whether the chunk holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events not yet visited.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len().saturating_sub(self.cursor)
    }

    /// Every event in the chunk, in production order.
    #[must_use]
    pub fn events(&self) -> &[E] {
        &self.events
    }

    /// Take ownership of the events.
    #[must_use]
    pub fn into_events(self) -> Vec<E> {
        self.events
    }
}

impl<E: VisitableEvent> InputChunk<E> {
    /// Visit the next event, returning `false` once the chunk is exhausted.
    pub fn next<V>(&mut self, visitor: &mut V) -> bool
    where
        V: InputEntityVisitor + ?Sized,
    {
        let Some(event) = self.events.get(self.cursor) else {
            return false;
        };
        event.accept(&self.groups, visitor);
        self.cursor = self.cursor.saturating_add(1);
        true
    }
}
