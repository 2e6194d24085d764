//! Id-space partitions for synthetic entity identifiers.
//!
//! A [`Group`] names the namespace a synthetic id lives in, so that `n42`
//! in `osm_nodes` never collides with an identical string elsewhere. Groups
//! are registered once per import run through [`Groups`] and never change
//! afterwards.

use std::fmt;
use std::sync::Arc;

/// Handle to a registered id space.
///
/// Cloning is cheap; equality compares the registry slot and the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Group {
    id: usize,
    name: Arc<str>,
}

impl Group {
    /// Position of the group in its registry.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Name the group was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Append-only registry of [`Group`]s.
///
/// # Examples
/// ```
/// use osmgraph_core::Groups;
///
/// let mut groups = Groups::default();
/// let nodes = groups.get_or_create("osm_nodes");
/// assert_eq!(groups.get_or_create("osm_nodes"), nodes);
/// assert_eq!(groups.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Groups {
    groups: Vec<Group>,
}

impl Groups {
    /// Return the group registered under `name`, registering it on first use.
    pub fn get_or_create(&mut self, name: &str) -> Group {
        if let Some(existing) = self.get(name) {
            return existing.clone();
        }
        let group = Group {
            id: self.groups.len(),
            name: Arc::from(name),
        };
        self.groups.push(group.clone());
        group
    }

    /// Look up a previously registered group.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name() == name)
    }

    /// Number of registered groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate the groups in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }
}

/// The id spaces an OSM import partitions its entities into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// `OSMNode` entities.
    Nodes,
    /// `OSMWay` entities.
    Ways,
    /// `OSMWayNode` proxies.
    WayNodes,
    /// `OSMRelation` entities.
    Relations,
    /// `OSMTags` entities.
    Tags,
    /// Dataset and bounds entities.
    Misc,
}

impl GroupKind {
    /// Every kind, in registration order.
    pub const ALL: [Self; 6] = [
        Self::Nodes,
        Self::Ways,
        Self::WayNodes,
        Self::Relations,
        Self::Tags,
        Self::Misc,
    ];

    /// Registry name of the group.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nodes => "osm_nodes",
            Self::Ways => "osm_ways",
            Self::WayNodes => "osm_way_nodes",
            Self::Relations => "osm_relations",
            Self::Tags => "osm_tags",
            Self::Misc => "osm_misc",
        }
    }
}

/// The six well-known OSM groups, registered once and shared by both passes.
#[derive(Debug, Clone)]
pub struct OsmGroups {
    nodes: Group,
    ways: Group,
    way_nodes: Group,
    relations: Group,
    tags: Group,
    misc: Group,
}

impl OsmGroups {
    /// Register the OSM groups in `groups`.
    ///
    /// Registering twice against the same registry yields equal handles.
    pub fn register(groups: &mut Groups) -> Self {
        Self {
            nodes: groups.get_or_create(GroupKind::Nodes.name()),
            ways: groups.get_or_create(GroupKind::Ways.name()),
            way_nodes: groups.get_or_create(GroupKind::WayNodes.name()),
            relations: groups.get_or_create(GroupKind::Relations.name()),
            tags: groups.get_or_create(GroupKind::Tags.name()),
            misc: groups.get_or_create(GroupKind::Misc.name()),
        }
    }

    /// Handle for the given kind.
    #[must_use]
    pub const fn group(&self, kind: GroupKind) -> &Group {
        match kind {
            GroupKind::Nodes => &self.nodes,
            GroupKind::Ways => &self.ways,
            GroupKind::WayNodes => &self.way_nodes,
            GroupKind::Relations => &self.relations,
            GroupKind::Tags => &self.tags,
            GroupKind::Misc => &self.misc,
        }
    }
}

impl Default for OsmGroups {
    fn default() -> Self {
        Self::register(&mut Groups::default())
    }
}
