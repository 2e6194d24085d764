//! A counting visitor standing in for a bulk loader.

use std::collections::BTreeMap;

use osmgraph_core::{Group, InputEntityVisitor, PropertyValue};
use serde::Serialize;

/// Event counts for one pass, accumulated per consumer and merged at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct PassTally {
    /// Chunks received.
    pub(crate) chunks: u64,
    /// Events visited.
    pub(crate) events: u64,
    /// Size of the largest chunk.
    pub(crate) largest_chunk: usize,
    /// Property calls across all events.
    pub(crate) properties: u64,
    /// Entity events per label.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) labels: BTreeMap<String, u64>,
    /// Entity events per group.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) groups: BTreeMap<String, u64>,
    /// Edge events per relationship type.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) edge_types: BTreeMap<String, u64>,
}

impl PassTally {
    pub(crate) fn record_chunk(&mut self, size: usize) {
        self.chunks += 1;
        self.largest_chunk = self.largest_chunk.max(size);
    }

    pub(crate) fn merge(&mut self, other: Self) {
        self.chunks += other.chunks;
        self.events += other.events;
        self.largest_chunk = self.largest_chunk.max(other.largest_chunk);
        self.properties += other.properties;
        for (target, source) in [
            (&mut self.labels, other.labels),
            (&mut self.groups, other.groups),
            (&mut self.edge_types, other.edge_types),
        ] {
            for (key, count) in source {
                *target.entry(key).or_default() += count;
            }
        }
    }

    /// Count for `label`, or zero.
    pub(crate) fn label_count(&self, label: &str) -> u64 {
        self.labels.get(label).copied().unwrap_or_default()
    }

    /// Count for `edge_type`, or zero.
    pub(crate) fn edge_type_count(&self, edge_type: &str) -> u64 {
        self.edge_types.get(edge_type).copied().unwrap_or_default()
    }
}

fn bump(counts: &mut BTreeMap<String, u64>, key: &str) {
    if let Some(count) = counts.get_mut(key) {
        *count += 1;
    } else {
        counts.insert(key.to_owned(), 1);
    }
}

impl InputEntityVisitor for PassTally {
    fn id(&mut self, _id: &str, group: &Group) {
        bump(&mut self.groups, group.name());
    }

    fn start_id(&mut self, _id: &str, _group: &Group) {}

    fn end_id(&mut self, _id: &str, _group: &Group) {}

    fn labels(&mut self, labels: &[&str]) {
        for label in labels {
            bump(&mut self.labels, label);
        }
    }

    fn edge_type(&mut self, edge_type: &str) {
        bump(&mut self.edge_types, edge_type);
    }

    fn property(&mut self, _key: &str, _value: &PropertyValue) {
        self.properties += 1;
    }

    fn end_of_entity(&mut self) {
        self.events += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osmgraph_core::Groups;
    use rstest::rstest;

    #[rstest]
    fn merging_sums_counts_and_keeps_the_largest_chunk() {
        let mut groups = Groups::default();
        let nodes = groups.get_or_create("osm_nodes");

        let mut first = PassTally::default();
        first.record_chunk(3);
        first.id("n1", &nodes);
        first.labels(&["OSMNode"]);
        first.property("node_osm_id", &PropertyValue::Long(1));
        first.end_of_entity();

        let mut second = PassTally::default();
        second.record_chunk(7);
        second.start_id("w1", &nodes);
        second.end_id("w1n1", &nodes);
        second.edge_type("FIRST_NODE");
        second.end_of_entity();

        first.merge(second);
        assert_eq!(first.chunks, 2);
        assert_eq!(first.events, 2);
        assert_eq!(first.largest_chunk, 7);
        assert_eq!(first.properties, 1);
        assert_eq!(first.label_count("OSMNode"), 1);
        assert_eq!(first.edge_type_count("FIRST_NODE"), 1);
        assert_eq!(first.groups.get("osm_nodes"), Some(&1));
    }
}
