//! The visitor contract the external loader consumes events through.
//!
//! Entity events are visited as `id`, `labels`, zero or more `property`
//! calls, then `end_of_entity`. Edge events are visited as `start_id`,
//! `end_id`, `edge_type`, zero or more `property` calls, then
//! `end_of_entity`. [`RecordingVisitor`] checks that ordering.

use thiserror::Error;

use crate::event::{EdgeEvent, EntityEvent};
use crate::group::{Group, OsmGroups};
use crate::property::{Properties, PropertyValue};

/// Receives one event at a time from an [`InputChunk`](crate::InputChunk).
pub trait InputEntityVisitor {
    /// Synthetic id and group of an entity event.
    fn id(&mut self, id: &str, group: &Group);
    /// Synthetic id and group of an edge's start entity.
    fn start_id(&mut self, id: &str, group: &Group);
    /// Synthetic id and group of an edge's end entity.
    fn end_id(&mut self, id: &str, group: &Group);
    /// Labels of an entity event.
    fn labels(&mut self, labels: &[&str]);
    /// Relationship type of an edge event.
    fn edge_type(&mut self, edge_type: &str);
    /// One property of the current event.
    fn property(&mut self, key: &str, value: &PropertyValue);
    /// The current event is complete.
    fn end_of_entity(&mut self);
}

/// An event that can replay itself into an [`InputEntityVisitor`].
pub trait VisitableEvent {
    /// Drive `visitor` through this event, resolving groups from `groups`.
    fn accept<V>(&self, groups: &OsmGroups, visitor: &mut V)
    where
        V: InputEntityVisitor + ?Sized;
}

impl VisitableEvent for EntityEvent {
    fn accept<V>(&self, groups: &OsmGroups, visitor: &mut V)
    where
        V: InputEntityVisitor + ?Sized,
    {
        let entity = self.entity();
        visitor.id(&entity.to_string(), groups.group(entity.group_kind()));
        visitor.labels(&[self.label().as_str()]);
        for (key, value) in self.properties().iter() {
            visitor.property(key, value);
        }
        visitor.end_of_entity();
    }
}

impl VisitableEvent for EdgeEvent {
    fn accept<V>(&self, groups: &OsmGroups, visitor: &mut V)
    where
        V: InputEntityVisitor + ?Sized,
    {
        let start = self.start();
        let end = self.end();
        visitor.start_id(&start.to_string(), groups.group(start.group_kind()));
        visitor.end_id(&end.to_string(), groups.group(end.group_kind()));
        visitor.edge_type(self.edge_type().as_str());
        for (key, value) in self.properties().iter() {
            visitor.property(key, value);
        }
        visitor.end_of_entity();
    }
}

/// An event as observed through the visitor contract.
#[derive(Debug, Clone, PartialEq)]
pub enum Visited {
    /// A completed entity event.
    Entity {
        /// Synthetic id.
        id: String,
        /// Group name.
        group: String,
        /// Labels in visit order.
        labels: Vec<String>,
        /// Properties in visit order.
        properties: Properties,
    },
    /// A completed edge event.
    Edge {
        /// Start synthetic id.
        start_id: String,
        /// Start group name.
        start_group: String,
        /// End synthetic id.
        end_id: String,
        /// End group name.
        end_group: String,
        /// Relationship type.
        edge_type: String,
        /// Properties in visit order.
        properties: Properties,
    },
}

/// A visitor call that arrived out of contract order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{call}` received {stage} (event #{event})")]
pub struct ContractViolation {
    /// Offending visitor method.
    pub call: &'static str,
    /// Where in the event the call arrived.
    pub stage: &'static str,
    /// Zero-based index of the event being visited.
    pub event: usize,
}

#[derive(Debug, Default)]
enum Stage {
    #[default]
    Idle,
    EntityId {
        id: String,
        group: String,
    },
    EntityBody {
        id: String,
        group: String,
        labels: Vec<String>,
        properties: Properties,
    },
    EdgeStart {
        start_id: String,
        start_group: String,
    },
    EdgeEnd {
        start_id: String,
        start_group: String,
        end_id: String,
        end_group: String,
    },
    EdgeBody {
        start_id: String,
        start_group: String,
        end_id: String,
        end_group: String,
        edge_type: String,
        properties: Properties,
    },
}

impl Stage {
    const fn describe(&self) -> &'static str {
        match self {
            Self::Idle => "between events",
            Self::EntityId { .. } => "after an entity id",
            Self::EntityBody { .. } => "inside an entity body",
            Self::EdgeStart { .. } => "after an edge start id",
            Self::EdgeEnd { .. } => "after an edge end id",
            Self::EdgeBody { .. } => "inside an edge body",
        }
    }
}

/// Visitor that records events as owned [`Visited`] values and checks the
/// call ordering of the contract.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use osmgraph_core::{
///     EntityEvent, InputChunk, OsmGroups, Properties, RecordingVisitor, Visited,
/// };
///
/// let groups = Arc::new(OsmGroups::default());
/// let mut chunk = InputChunk::new(
///     vec![EntityEvent::Node { osm_id: 1, properties: Properties::new() }],
///     groups,
/// );
/// let mut visitor = RecordingVisitor::default();
/// while chunk.next(&mut visitor) {}
///
/// assert!(visitor.violations().is_empty());
/// assert!(matches!(
///     visitor.visited(),
///     [Visited::Entity { id, .. }] if id == "n1"
/// ));
/// ```
#[derive(Debug, Default)]
pub struct RecordingVisitor {
    stage: Stage,
    visited: Vec<Visited>,
    violations: Vec<ContractViolation>,
}

impl RecordingVisitor {
    /// Events completed so far.
    #[must_use]
    pub fn visited(&self) -> &[Visited] {
        &self.visited
    }

    /// Ordering violations observed so far.
    #[must_use]
    pub fn violations(&self) -> &[ContractViolation] {
        &self.violations
    }

    /// Consume the visitor, returning the recorded events.
    #[must_use]
    pub fn into_visited(self) -> Vec<Visited> {
        self.visited
    }

    fn reject(&mut self, call: &'static str) {
        self.violations.push(ContractViolation {
            call,
            stage: self.stage.describe(),
            event: self.visited.len(),
        });
    }
}

impl InputEntityVisitor for RecordingVisitor {
    fn id(&mut self, id: &str, group: &Group) {
        if matches!(self.stage, Stage::Idle) {
            self.stage = Stage::EntityId {
                id: id.to_owned(),
                group: group.name().to_owned(),
            };
        } else {
            self.reject("id");
        }
    }

    fn start_id(&mut self, id: &str, group: &Group) {
        if matches!(self.stage, Stage::Idle) {
            self.stage = Stage::EdgeStart {
                start_id: id.to_owned(),
                start_group: group.name().to_owned(),
            };
        } else {
            self.reject("start_id");
        }
    }

    fn end_id(&mut self, id: &str, group: &Group) {
        match std::mem::take(&mut self.stage) {
            Stage::EdgeStart {
                start_id,
                start_group,
            } => {
                self.stage = Stage::EdgeEnd {
                    start_id,
                    start_group,
                    end_id: id.to_owned(),
                    end_group: group.name().to_owned(),
                };
            }
            other => {
                self.stage = other;
                self.reject("end_id");
            }
        }
    }

    fn labels(&mut self, labels: &[&str]) {
        match std::mem::take(&mut self.stage) {
            Stage::EntityId { id, group } => {
                self.stage = Stage::EntityBody {
                    id,
                    group,
                    labels: labels.iter().map(|label| (*label).to_owned()).collect(),
                    properties: Properties::new(),
                };
            }
            other => {
                self.stage = other;
                self.reject("labels");
            }
        }
    }

    fn edge_type(&mut self, edge_type: &str) {
        match std::mem::take(&mut self.stage) {
            Stage::EdgeEnd {
                start_id,
                start_group,
                end_id,
                end_group,
            } => {
                self.stage = Stage::EdgeBody {
                    start_id,
                    start_group,
                    end_id,
                    end_group,
                    edge_type: edge_type.to_owned(),
                    properties: Properties::new(),
                };
            }
            other => {
                self.stage = other;
                self.reject("edge_type");
            }
        }
    }

    fn property(&mut self, key: &str, value: &PropertyValue) {
        match &mut self.stage {
            Stage::EntityBody { properties, .. } | Stage::EdgeBody { properties, .. } => {
                properties.insert(key, value.clone());
            }
            _ => self.reject("property"),
        }
    }

    fn end_of_entity(&mut self) {
        match std::mem::take(&mut self.stage) {
            Stage::EntityBody {
                id,
                group,
                labels,
                properties,
            } => self.visited.push(Visited::Entity {
                id,
                group,
                labels,
                properties,
            }),
            Stage::EdgeBody {
                start_id,
                start_group,
                end_id,
                end_group,
                edge_type,
                properties,
            } => self.visited.push(Visited::Edge {
                start_id,
                start_group,
                end_id,
                end_group,
                edge_type,
                properties,
            }),
            other => {
                self.stage = other;
                self.reject("end_of_entity");
            }
        }
    }
}
