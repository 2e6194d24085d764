//! OSM XML ingestion into chunked graph-construction events.
//!
//! Responsibilities:
//! - Open plain, gzip and bzip2 OSM XML files in sequence.
//! - Walk each document in a single streaming pass with bounded scratch
//!   state.
//! - Produce two independent, replayable passes: entity events
//!   ([`OsmInput::nodes`]) and edge events ([`OsmInput::relationships`]).
//!
//! Boundaries:
//! - Event and visitor types live in `osmgraph-core`.
//! - Id resolution, storage and referential integrity belong to the loader.
//!
//! Invariants:
//! - A chunk never separates an entity from its own `TAGS` output.
//! - Iterating a pass twice yields identical event sequences.
//! - No global mutable state.

use std::sync::Arc;

use camino::Utf8PathBuf;
use osmgraph_core::{Estimates, Groups, OsmGroups};

mod error;
mod handoff;
mod input;
mod relation;
mod settings;
mod sink;
mod source;
mod walker;
mod way;

pub use error::OsmInputError;
pub use handoff::{ChunkReceiver, SharedChunks};
pub use input::{
    ChunkResult, ChunkSequence, InputIterable, NodeInput, RelationshipInput, SinkFactory,
};
pub use relation::{Member, MemberDescriptor, RelationPlan};
pub use settings::{DEFAULT_CHUNK_SIZE, InputSettings, MalformedXmlPolicy};
pub use sink::{EdgeSink, EventSink, NodeSink};
pub use source::Compression;
pub use way::WayPlan;

/// An ordered set of OSM XML files and the settings to read them with.
///
/// # Examples
/// ```no_run
/// use osmgraph_core::RecordingVisitor;
/// use osmgraph_data::{InputSettings, OsmInput};
///
/// # fn main() -> Result<(), osmgraph_data::OsmInputError> {
/// let input = OsmInput::new(["map.osm.bz2"], InputSettings::default())?;
/// let mut visitor = RecordingVisitor::default();
/// for chunk in &input.nodes() {
///     let mut chunk = chunk?;
///     while chunk.next(&mut visitor) {}
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OsmInput {
    files: Arc<[Utf8PathBuf]>,
    settings: InputSettings,
    groups: Arc<OsmGroups>,
}

impl OsmInput {
    /// Describe an import over `files`, registering the OSM groups in a
    /// fresh registry.
    ///
    /// # Errors
    /// Returns [`OsmInputError::NoInputFiles`] when `files` is empty.
    pub fn new<I, P>(files: I, settings: InputSettings) -> Result<Self, OsmInputError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        let mut groups = Groups::default();
        Self::with_groups(files, settings, &mut groups)
    }

    /// Describe an import over `files`, registering the OSM groups in
    /// `groups`.
    ///
    /// # Errors
    /// Returns [`OsmInputError::NoInputFiles`] when `files` is empty.
    pub fn with_groups<I, P>(
        files: I,
        settings: InputSettings,
        groups: &mut Groups,
    ) -> Result<Self, OsmInputError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        let paths: Arc<[Utf8PathBuf]> = files.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            return Err(OsmInputError::NoInputFiles);
        }
        Ok(Self {
            files: paths,
            settings,
            groups: Arc::new(OsmGroups::register(groups)),
        })
    }

    /// Input files in reading order.
    #[must_use]
    pub fn files(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    /// Settings shared by both passes.
    #[must_use]
    pub const fn settings(&self) -> &InputSettings {
        &self.settings
    }

    /// The OSM groups events are scoped to.
    #[must_use]
    pub fn groups(&self) -> &OsmGroups {
        &self.groups
    }

    /// The entity-creation pass.
    #[must_use]
    pub fn nodes(&self) -> NodeInput {
        InputIterable::new(
            Arc::clone(&self.files),
            self.settings,
            Arc::clone(&self.groups),
            Arc::new(NodeSink::with_capacity),
        )
    }

    /// The edge-creation pass.
    #[must_use]
    pub fn relationships(&self) -> RelationshipInput {
        InputIterable::new(
            Arc::clone(&self.files),
            self.settings,
            Arc::clone(&self.groups),
            Arc::new(EdgeSink::with_capacity),
        )
    }

    /// Size hints derived from the files' on-disk sizes.
    ///
    /// # Errors
    /// Returns [`OsmInputError::Metadata`] when a file cannot be inspected.
    pub fn calculate_estimates(&self) -> Result<Estimates, OsmInputError> {
        let bytes = self.files.iter().try_fold(0_u64, |total, path| {
            source::decoded_size(path).map(|size| total.saturating_add(size))
        })?;
        Ok(Estimates::from_input_bytes(bytes))
    }
}
