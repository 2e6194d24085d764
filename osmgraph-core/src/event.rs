//! Graph-construction events.
//!
//! Both event families are closed tagged unions: [`EntityEvent`] describes a
//! future graph entity and [`EdgeEvent`] a future relationship between two
//! entities addressed by [`EntityRef`]. Events are built once while a chunk
//! is filled and are never mutated afterwards.

use std::fmt;
use std::sync::Arc;

use crate::group::GroupKind;
use crate::property::{Properties, PropertyValue};

static EMPTY_PROPERTIES: Properties = Properties::new();

/// An entity that may own a trailing set of `<tag>` children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Taggable {
    /// An OSM node.
    Node(i64),
    /// An OSM way.
    Way(i64),
    /// An OSM relation.
    Relation(i64),
}

impl Taggable {
    /// Address of the taggable entity itself.
    #[must_use]
    pub const fn entity(self) -> EntityRef {
        match self {
            Self::Node(id) => EntityRef::Node(id),
            Self::Way(id) => EntityRef::Way(id),
            Self::Relation(id) => EntityRef::Relation(id),
        }
    }
}

impl fmt::Display for Taggable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "n{id}"),
            Self::Way(id) => write!(f, "w{id}"),
            Self::Relation(id) => write!(f, "r{id}"),
        }
    }
}

/// Label attached to an entity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityLabel {
    /// `OSMNode`.
    Node,
    /// `OSMWay`.
    Way,
    /// `OSMWayNode`.
    WayNode,
    /// `OSMRelation`.
    Relation,
    /// `OSMTags`.
    Tags,
    /// `OSMDataset`.
    Dataset,
    /// `OSMBounds`.
    Bounds,
}

impl EntityLabel {
    /// Label text handed to the visitor.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "OSMNode",
            Self::Way => "OSMWay",
            Self::WayNode => "OSMWayNode",
            Self::Relation => "OSMRelation",
            Self::Tags => "OSMTags",
            Self::Dataset => "OSMDataset",
            Self::Bounds => "OSMBounds",
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of an entity: its group plus synthetic id.
///
/// The [`Display`](fmt::Display) form is the synthetic id handed to the
/// loader.
///
/// # Examples
/// ```
/// use osmgraph_core::{EntityRef, GroupKind, Taggable};
///
/// assert_eq!(EntityRef::WayNode { way: 7, node: 42 }.to_string(), "w7n42");
/// assert_eq!(EntityRef::Tags(Taggable::Way(7)).to_string(), "tw7");
/// assert_eq!(EntityRef::Node(42).group_kind(), GroupKind::Nodes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// `n<osmId>` in `osm_nodes`.
    Node(i64),
    /// `w<osmId>` in `osm_ways`.
    Way(i64),
    /// `w<wayId>n<nodeId>` in `osm_way_nodes`.
    WayNode {
        /// Owning way.
        way: i64,
        /// Referenced node.
        node: i64,
    },
    /// `r<osmId>` in `osm_relations`.
    Relation(i64),
    /// `t<ownerId>` in `osm_tags`.
    Tags(Taggable),
    /// `osm_<fileName>` in `osm_misc`.
    Dataset(Arc<str>),
    /// `bounds_<fileName>` in `osm_misc`.
    Bounds(Arc<str>),
}

impl EntityRef {
    /// Group the synthetic id is scoped to.
    #[must_use]
    pub const fn group_kind(&self) -> GroupKind {
        match self {
            Self::Node(_) => GroupKind::Nodes,
            Self::Way(_) => GroupKind::Ways,
            Self::WayNode { .. } => GroupKind::WayNodes,
            Self::Relation(_) => GroupKind::Relations,
            Self::Tags(_) => GroupKind::Tags,
            Self::Dataset(_) | Self::Bounds(_) => GroupKind::Misc,
        }
    }

    /// Label of the entity behind this address.
    #[must_use]
    pub const fn label(&self) -> EntityLabel {
        match self {
            Self::Node(_) => EntityLabel::Node,
            Self::Way(_) => EntityLabel::Way,
            Self::WayNode { .. } => EntityLabel::WayNode,
            Self::Relation(_) => EntityLabel::Relation,
            Self::Tags(_) => EntityLabel::Tags,
            Self::Dataset(_) => EntityLabel::Dataset,
            Self::Bounds(_) => EntityLabel::Bounds,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "n{id}"),
            Self::Way(id) => write!(f, "w{id}"),
            Self::WayNode { way, node } => write!(f, "w{way}n{node}"),
            Self::Relation(id) => write!(f, "r{id}"),
            Self::Tags(owner) => write!(f, "t{owner}"),
            Self::Dataset(file_name) => write!(f, "osm_{file_name}"),
            Self::Bounds(file_name) => write!(f, "bounds_{file_name}"),
        }
    }
}

/// An entity-creation event.
///
/// Equality follows the loader's identity rule: two events are equal when
/// their group and synthetic id match, whatever their properties.
#[derive(Debug, Clone)]
pub enum EntityEvent {
    /// An `OSMNode` with its coerced attributes.
    Node {
        /// OSM node id.
        osm_id: i64,
        /// Coerced attributes, including `location` when known.
        properties: Properties,
    },
    /// An `OSMWay` with its attributes and promoted tags.
    Way {
        /// OSM way id.
        osm_id: i64,
        /// Coerced attributes plus `highway`, `oneway` and `name` promotions.
        properties: Properties,
    },
    /// An `OSMWayNode` proxy linking a way position to a node.
    WayNode {
        /// Owning way.
        way_id: i64,
        /// Referenced node.
        node_id: i64,
    },
    /// An `OSMRelation` with its attributes.
    Relation {
        /// OSM relation id.
        osm_id: i64,
        /// Coerced attributes.
        properties: Properties,
    },
    /// An `OSMTags` entity holding the free-form tags of its owner.
    Tags {
        /// Entity the tags belong to.
        owner: Taggable,
        /// Tag key/value pairs in document order.
        tags: Properties,
    },
    /// The per-file dataset entity.
    Dataset {
        /// Final path component of the source file.
        file_name: Arc<str>,
        /// Root element attributes.
        properties: Properties,
    },
    /// The per-file bounds entity.
    Bounds {
        /// Final path component of the source file.
        file_name: Arc<str>,
        /// Bounds attributes.
        properties: Properties,
    },
}

impl EntityEvent {
    /// Address of the entity this event creates.
    #[must_use]
    pub fn entity(&self) -> EntityRef {
        match self {
            Self::Node { osm_id, .. } => EntityRef::Node(*osm_id),
            Self::Way { osm_id, .. } => EntityRef::Way(*osm_id),
            Self::WayNode { way_id, node_id } => EntityRef::WayNode {
                way: *way_id,
                node: *node_id,
            },
            Self::Relation { osm_id, .. } => EntityRef::Relation(*osm_id),
            Self::Tags { owner, .. } => EntityRef::Tags(*owner),
            Self::Dataset { file_name, .. } => EntityRef::Dataset(Arc::clone(file_name)),
            Self::Bounds { file_name, .. } => EntityRef::Bounds(Arc::clone(file_name)),
        }
    }

    /// Label of the created entity.
    #[must_use]
    pub const fn label(&self) -> EntityLabel {
        match self {
            Self::Node { .. } => EntityLabel::Node,
            Self::Way { .. } => EntityLabel::Way,
            Self::WayNode { .. } => EntityLabel::WayNode,
            Self::Relation { .. } => EntityLabel::Relation,
            Self::Tags { .. } => EntityLabel::Tags,
            Self::Dataset { .. } => EntityLabel::Dataset,
            Self::Bounds { .. } => EntityLabel::Bounds,
        }
    }

    /// Properties of the created entity; proxies carry none.
    #[must_use]
    pub fn properties(&self) -> &Properties {
        match self {
            Self::Node { properties, .. }
            | Self::Way { properties, .. }
            | Self::Relation { properties, .. }
            | Self::Dataset { properties, .. }
            | Self::Bounds { properties, .. } => properties,
            Self::Tags { tags, .. } => tags,
            Self::WayNode { .. } => &EMPTY_PROPERTIES,
        }
    }
}

impl PartialEq for EntityEvent {
    fn eq(&self, other: &Self) -> bool {
        self.entity() == other.entity()
    }
}

impl Eq for EntityEvent {}

/// Relationship type of an edge event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeType {
    /// Taggable entity to its `OSMTags`.
    Tags,
    /// Way to its first proxy.
    FirstNode,
    /// Proxy to the following proxy.
    Next,
    /// Proxy to the referenced `OSMNode`.
    Node,
    /// Relation to one of its members.
    Member,
    /// Dataset to its bounds.
    BBox,
}

impl EdgeType {
    /// Type text handed to the visitor.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tags => "TAGS",
            Self::FirstNode => "FIRST_NODE",
            Self::Next => "NEXT",
            Self::Node => "NODE",
            Self::Member => "MEMBER",
            Self::BBox => "BBOX",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An edge-creation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeEvent {
    /// `(owner)-[:TAGS]->(t<owner>)`.
    Tags {
        /// Entity owning the tags.
        owner: Taggable,
    },
    /// `(way)-[:FIRST_NODE]->(first proxy)`.
    FirstNode {
        /// Way id.
        way_id: i64,
        /// Node referenced by the first proxy.
        node_id: i64,
    },
    /// `(proxy)-[:NEXT]->(proxy)`, already oriented by the way's direction.
    Next {
        /// Way id.
        way_id: i64,
        /// Node of the start proxy.
        from_node: i64,
        /// Node of the end proxy.
        to_node: i64,
    },
    /// `(proxy)-[:NODE]->(node)`.
    Node {
        /// Way id.
        way_id: i64,
        /// Referenced node id.
        node_id: i64,
    },
    /// `(relation)-[:MEMBER {role}]->(member)`.
    Member {
        /// Relation id.
        relation_id: i64,
        /// Resolved member entity.
        member: EntityRef,
        /// Declared role, present only when non-empty.
        role: Option<String>,
    },
    /// `(dataset)-[:BBOX]->(bounds)`.
    BBox {
        /// Final path component of the source file.
        file_name: Arc<str>,
    },
}

impl EdgeEvent {
    /// Relationship type.
    #[must_use]
    pub const fn edge_type(&self) -> EdgeType {
        match self {
            Self::Tags { .. } => EdgeType::Tags,
            Self::FirstNode { .. } => EdgeType::FirstNode,
            Self::Next { .. } => EdgeType::Next,
            Self::Node { .. } => EdgeType::Node,
            Self::Member { .. } => EdgeType::Member,
            Self::BBox { .. } => EdgeType::BBox,
        }
    }

    /// Start entity of the edge.
    #[must_use]
    pub fn start(&self) -> EntityRef {
        match self {
            Self::Tags { owner } => owner.entity(),
            Self::FirstNode { way_id, .. } => EntityRef::Way(*way_id),
            Self::Next {
                way_id, from_node, ..
            } => EntityRef::WayNode {
                way: *way_id,
                node: *from_node,
            },
            Self::Node { way_id, node_id } => EntityRef::WayNode {
                way: *way_id,
                node: *node_id,
            },
            Self::Member { relation_id, .. } => EntityRef::Relation(*relation_id),
            Self::BBox { file_name } => EntityRef::Dataset(Arc::clone(file_name)),
        }
    }

    /// End entity of the edge.
    #[must_use]
    pub fn end(&self) -> EntityRef {
        match self {
            Self::Tags { owner } => EntityRef::Tags(*owner),
            Self::FirstNode { way_id, node_id } => EntityRef::WayNode {
                way: *way_id,
                node: *node_id,
            },
            Self::Next {
                way_id, to_node, ..
            } => EntityRef::WayNode {
                way: *way_id,
                node: *to_node,
            },
            Self::Node { node_id, .. } => EntityRef::Node(*node_id),
            Self::Member { member, .. } => member.clone(),
            Self::BBox { file_name } => EntityRef::Bounds(Arc::clone(file_name)),
        }
    }

    /// Edge properties; only `MEMBER` edges with a role carry any.
    #[must_use]
    pub fn properties(&self) -> Properties {
        match self {
            Self::Member {
                role: Some(role), ..
            } => [("role", PropertyValue::String(role.clone()))]
                .into_iter()
                .collect(),
            _ => Properties::new(),
        }
    }
}
