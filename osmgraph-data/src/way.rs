//! Way construction shared by both passes.

use std::collections::HashSet;

use log::debug;
use osmgraph_core::{
    Direction, EdgeEvent, EntityEvent, Geometry, Properties, collapse_consecutive,
};

/// A fully read way: attributes, tags and node references resolved into
/// everything either pass needs to emit.
///
/// # Examples
/// ```
/// use osmgraph_core::{Direction, Geometry, Properties};
/// use osmgraph_data::WayPlan;
///
/// let tags: Properties = [("highway", "residential"), ("oneway", "-1")].into_iter().collect();
/// let plan = WayPlan::new(7, Properties::new(), &tags, &[1, 2, 2, 3]);
///
/// assert_eq!(plan.direction(), Direction::Backward);
/// assert_eq!(plan.refs(), [1, 2, 3]);
/// assert_eq!(plan.geometry(), Geometry::Line);
/// assert_eq!(plan.properties().get_str("oneway"), Some("BACKWARD"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WayPlan {
    osm_id: i64,
    properties: Properties,
    refs: Vec<i64>,
    direction: Direction,
    geometry: Geometry,
}

impl WayPlan {
    /// Resolve a way from its attributes, tags and raw node references.
    #[must_use]
    pub fn new(osm_id: i64, mut properties: Properties, tags: &Properties, refs: &[i64]) -> Self {
        let direction = Direction::from_oneway(tags.get_str("oneway"));
        if let Some(highway) = tags.get_str("highway") {
            properties.insert("highway", highway);
            properties.insert("oneway", direction.as_str());
        }
        if let Some(name) = tags.get_str("name") {
            properties.insert("name", name);
        }
        let collapsed = collapse_consecutive(refs);
        let geometry = Geometry::classify(&collapsed);
        debug!(
            "way {osm_id}: {geometry} over {} references, {direction}",
            collapsed.len()
        );
        Self {
            osm_id,
            properties,
            refs: collapsed,
            direction,
            geometry,
        }
    }

    /// OSM id of the way.
    #[must_use]
    pub const fn osm_id(&self) -> i64 {
        self.osm_id
    }

    /// Attributes plus promoted tags.
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Node references with consecutive duplicates collapsed.
    #[must_use]
    pub fn refs(&self) -> &[i64] {
        &self.refs
    }

    /// Direction from the `oneway` tag.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Shape of the collapsed references.
    #[must_use]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Node ids that get a proxy, each once, in first-seen order.
    pub fn proxied_nodes(&self) -> impl Iterator<Item = i64> + '_ {
        let mut seen = HashSet::new();
        self.refs.iter().copied().filter(move |node| seen.insert(*node))
    }

    /// Entity events for the node pass: the way, then its proxies.
    #[must_use]
    pub fn into_entity_events(self) -> Vec<EntityEvent> {
        let way_id = self.osm_id;
        let proxies: Vec<EntityEvent> = self
            .proxied_nodes()
            .map(|node_id| EntityEvent::WayNode { way_id, node_id })
            .collect();
        let mut events = Vec::with_capacity(proxies.len().saturating_add(1));
        events.push(EntityEvent::Way {
            osm_id: way_id,
            properties: self.properties,
        });
        events.extend(proxies);
        events
    }

    /// Edge events for the relationship pass.
    ///
    /// One `FIRST_NODE` edge, then for each reference its `NODE` edge (the
    /// first time the reference is proxied) and the `NEXT` edge from the
    /// previous proxy. `NEXT` edges point against document order for
    /// [`Direction::Backward`]. A pair of proxies already linked in this way
    /// is not linked again.
    #[must_use]
    pub fn edge_events(&self) -> Vec<EdgeEvent> {
        let way_id = self.osm_id;
        let Some(&first) = self.refs.first() else {
            return Vec::new();
        };
        let mut edges = Vec::with_capacity(self.refs.len().saturating_mul(2));
        edges.push(EdgeEvent::FirstNode {
            way_id,
            node_id: first,
        });
        let mut seen = HashSet::new();
        let mut linked = HashSet::new();
        let mut previous: Option<i64> = None;
        for &node_id in &self.refs {
            if seen.insert(node_id) {
                edges.push(EdgeEvent::Node { way_id, node_id });
            }
            if let Some(prior) = previous {
                let (from_node, to_node) = match self.direction {
                    Direction::Backward => (node_id, prior),
                    Direction::Both | Direction::Forward => (prior, node_id),
                };
                if linked.insert((from_node, to_node)) {
                    edges.push(EdgeEvent::Next {
                        way_id,
                        from_node,
                        to_node,
                    });
                }
            }
            previous = Some(node_id);
        }
        edges
    }
}
