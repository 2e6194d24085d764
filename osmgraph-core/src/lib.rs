//! Core types for turning OpenStreetMap data into graph-construction events.
//!
//! The crate holds the pure model: id-space [`Group`]s, the entity and edge
//! event unions, typed properties, the [`InputEntityVisitor`] contract that a
//! bulk loader consumes events through and the [`InputChunk`] batches that
//! carry them. Parsing and file handling live in `osmgraph-data`.

mod chunk;
mod estimate;
mod event;
mod group;
mod property;
mod range;
mod visitor;
mod way;

pub use chunk::InputChunk;
pub use estimate::{BYTES_PER_NODE, BYTES_PER_RELATIONSHIP, COMPRESSED_INFLATION, Estimates};
pub use event::{EdgeEvent, EdgeType, EntityEvent, EntityLabel, EntityRef, Taggable};
pub use group::{Group, GroupKind, Groups, OsmGroups};
pub use property::{Properties, PropertyValue};
pub use range::{RangeFilter, RangeFilterError};
pub use visitor::{ContractViolation, InputEntityVisitor, RecordingVisitor, VisitableEvent, Visited};
pub use way::{Direction, Geometry, collapse_consecutive};
