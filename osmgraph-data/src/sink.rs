//! The two event sinks the walker feeds: one per pass.

use std::sync::Arc;

use osmgraph_core::{EdgeEvent, EntityEvent, Properties, Taggable, VisitableEvent};

use crate::relation::RelationPlan;
use crate::way::WayPlan;

/// Receives parsed top-level elements and turns them into one pass's events.
///
/// The walker calls `tags` only after the owning node, way or relation has
/// been handed over, and only when the owner has at least one tag.
pub trait EventSink {
    /// Event type the pass produces.
    type Event: VisitableEvent;

    /// Events accumulated so far.
    fn len(&self) -> usize;

    /// Whether nothing has been accumulated.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The root `osm` element of a file.
    fn dataset(&mut self, file_name: &Arc<str>, properties: Properties);

    /// A top-level `bounds` element.
    fn bounds(&mut self, file_name: &Arc<str>, properties: Properties);

    /// A node that passed the range filter.
    fn node(&mut self, osm_id: i64, properties: Properties);

    /// A completed way.
    fn way(&mut self, plan: WayPlan);

    /// A completed relation.
    fn relation(&mut self, plan: RelationPlan);

    /// The trailing tags of `owner`.
    fn tags(&mut self, owner: Taggable, tags: Properties);

    /// Hand over the accumulated events.
    fn into_events(self) -> Vec<Self::Event>;
}

/// Sink for the node pass: every entity-creation event.
#[derive(Debug, Default)]
pub struct NodeSink {
    events: Vec<EntityEvent>,
}

impl NodeSink {
    /// Empty sink with room for `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }
}

impl EventSink for NodeSink {
    type Event = EntityEvent;

    fn len(&self) -> usize {
        self.events.len()
    }

    fn dataset(&mut self, file_name: &Arc<str>, properties: Properties) {
        self.events.push(EntityEvent::Dataset {
            file_name: Arc::clone(file_name),
            properties,
        });
    }

    fn bounds(&mut self, file_name: &Arc<str>, properties: Properties) {
        self.events.push(EntityEvent::Bounds {
            file_name: Arc::clone(file_name),
            properties,
        });
    }

    fn node(&mut self, osm_id: i64, properties: Properties) {
        self.events.push(EntityEvent::Node { osm_id, properties });
    }

    fn way(&mut self, plan: WayPlan) {
        self.events.extend(plan.into_entity_events());
    }

    fn relation(&mut self, plan: RelationPlan) {
        let osm_id = plan.osm_id();
        self.events.push(EntityEvent::Relation {
            osm_id,
            properties: plan.into_properties(),
        });
    }

    fn tags(&mut self, owner: Taggable, tags: Properties) {
        self.events.push(EntityEvent::Tags { owner, tags });
    }

    fn into_events(self) -> Vec<EntityEvent> {
        self.events
    }
}

/// Sink for the relationship pass: every edge-creation event.
#[derive(Debug, Default)]
pub struct EdgeSink {
    events: Vec<EdgeEvent>,
}

impl EdgeSink {
    /// Empty sink with room for `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }
}

impl EventSink for EdgeSink {
    type Event = EdgeEvent;

    fn len(&self) -> usize {
        self.events.len()
    }

    fn dataset(&mut self, _file_name: &Arc<str>, _properties: Properties) {}

    fn bounds(&mut self, file_name: &Arc<str>, _properties: Properties) {
        self.events.push(EdgeEvent::BBox {
            file_name: Arc::clone(file_name),
        });
    }

    fn node(&mut self, _osm_id: i64, _properties: Properties) {}

    fn way(&mut self, plan: WayPlan) {
        self.events.extend(plan.edge_events());
    }

    fn relation(&mut self, plan: RelationPlan) {
        self.events.extend(plan.edge_events());
    }

    fn tags(&mut self, owner: Taggable, _tags: Properties) {
        self.events.push(EdgeEvent::Tags { owner });
    }

    fn into_events(self) -> Vec<EdgeEvent> {
        self.events
    }
}
