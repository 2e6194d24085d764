//! Heuristic sizing hints for the loader's memory structures.

/// Approximate bytes of uncompressed XML per node.
pub const BYTES_PER_NODE: u64 = 1_000;
/// Approximate bytes of uncompressed XML per relationship.
pub const BYTES_PER_RELATIONSHIP: u64 = 10_000;
/// Assumed expansion ratio of `.gz` and `.bz2` inputs.
pub const COMPRESSED_INFLATION: u64 = 10;

/// Sizing estimate derived from input byte counts.
///
/// # Examples
/// ```
/// use osmgraph_core::Estimates;
///
/// let estimates = Estimates::from_input_bytes(25_000);
/// assert_eq!(estimates.node_count, 25);
/// assert_eq!(estimates.relationship_count, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Estimates {
    /// Approximate number of entity events.
    pub node_count: u64,
    /// Approximate number of edge events.
    pub relationship_count: u64,
    /// Properties per entity.
    pub properties_per_node: u64,
    /// Properties per edge.
    pub properties_per_relationship: u64,
    /// Bytes per entity property.
    pub bytes_per_node_property: u64,
    /// Bytes per edge property.
    pub bytes_per_relationship_property: u64,
    /// Labels per entity.
    pub labels_per_node: u64,
}

impl Estimates {
    /// Estimate from an uncompressed byte total.
    #[must_use]
    pub const fn from_input_bytes(bytes: u64) -> Self {
        Self {
            node_count: bytes.div_euclid(BYTES_PER_NODE),
            relationship_count: bytes.div_euclid(BYTES_PER_RELATIONSHIP),
            properties_per_node: 8,
            properties_per_relationship: 1,
            bytes_per_node_property: 8,
            bytes_per_relationship_property: 8,
            labels_per_node: 1,
        }
    }
}
