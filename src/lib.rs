//! Facade crate for turning OpenStreetMap XML into graph-construction events.
//!
//! This crate re-exports the event model from `osmgraph-core` and, behind the
//! default `data` feature, the file-reading passes from `osmgraph-data`.

#![forbid(unsafe_code)]

pub use osmgraph_core::{
    ContractViolation, Direction, EdgeEvent, EdgeType, EntityEvent, EntityLabel, EntityRef,
    Estimates, Geometry, Group, GroupKind, Groups, InputChunk, InputEntityVisitor, OsmGroups,
    Properties, PropertyValue, RangeFilter, RangeFilterError, RecordingVisitor, Taggable,
    VisitableEvent, Visited,
};

#[cfg(feature = "data")]
pub use osmgraph_data::{
    ChunkReceiver, ChunkResult, DEFAULT_CHUNK_SIZE, InputSettings, MalformedXmlPolicy, NodeInput,
    OsmInput, OsmInputError, RelationshipInput, SharedChunks,
};
