//! Replayable, chunked passes over an ordered list of OSM files.

use std::fmt;
use std::sync::Arc;

use camino::Utf8PathBuf;
use log::{error, info, warn};
use osmgraph_core::{InputChunk, OsmGroups};

use crate::settings::{InputSettings, MalformedXmlPolicy};
use crate::sink::{EdgeSink, EventSink, NodeSink};
use crate::source::{SourceReader, open_source};
use crate::walker::{Advance, Walker};
use crate::{ChunkReceiver, OsmInputError, handoff};

/// Builds an empty sink for each new chunk.
pub type SinkFactory<S> = Arc<dyn Fn(usize) -> S + Send + Sync>;

/// One item of a pass: a finished chunk or the error that ended the pass.
pub type ChunkResult<E> = Result<InputChunk<E>, OsmInputError>;

/// The node pass: entity-creation events.
pub type NodeInput = InputIterable<NodeSink>;

/// The relationship pass: edge-creation events.
pub type RelationshipInput = InputIterable<EdgeSink>;

/// A pass that can be iterated any number of times.
///
/// Every call to [`InputIterable::iter`] reopens the files from the start,
/// so two iterations observe identical event sequences.
pub struct InputIterable<S> {
    files: Arc<[Utf8PathBuf]>,
    settings: InputSettings,
    groups: Arc<OsmGroups>,
    factory: SinkFactory<S>,
}

impl<S> Clone for InputIterable<S> {
    fn clone(&self) -> Self {
        Self {
            files: Arc::clone(&self.files),
            settings: self.settings,
            groups: Arc::clone(&self.groups),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<S> fmt::Debug for InputIterable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputIterable")
            .field("files", &self.files)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<S: EventSink> InputIterable<S> {
    /// Pass over `files` with sinks built by `factory`.
    pub fn new(
        files: Arc<[Utf8PathBuf]>,
        settings: InputSettings,
        groups: Arc<OsmGroups>,
        factory: SinkFactory<S>,
    ) -> Self {
        Self {
            files,
            settings,
            groups,
            factory,
        }
    }

    /// Start a fresh iteration from the first file.
    #[must_use]
    pub fn iter(&self) -> ChunkSequence<S> {
        ChunkSequence {
            files: Arc::clone(&self.files),
            next_file: 0,
            current: None,
            settings: self.settings,
            groups: Arc::clone(&self.groups),
            factory: Arc::clone(&self.factory),
            deferred: None,
            halted: false,
        }
    }

    /// Groups shared by the events of this pass.
    #[must_use]
    pub fn groups(&self) -> &Arc<OsmGroups> {
        &self.groups
    }

    /// Files the pass reads, in order.
    #[must_use]
    pub fn files(&self) -> &[Utf8PathBuf] {
        &self.files
    }
}

impl<S> InputIterable<S>
where
    S: EventSink + 'static,
    S::Event: Send + 'static,
{
    /// Produce chunks on a background thread into a channel holding at most
    /// `capacity` finished chunks.
    ///
    /// # Errors
    /// Returns [`OsmInputError::SpawnProducer`] when the thread cannot start.
    pub fn spawn(&self, capacity: usize) -> Result<ChunkReceiver<S::Event>, OsmInputError> {
        handoff::spawn(self.iter(), capacity)
    }
}

impl<S: EventSink> IntoIterator for &InputIterable<S> {
    type Item = ChunkResult<S::Event>;
    type IntoIter = ChunkSequence<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct OpenFile {
    path: Utf8PathBuf,
    walker: Walker<SourceReader>,
}

/// A single iteration of a pass, continuing across file boundaries.
///
/// At most one file is open at a time; it is closed as soon as its last
/// token is read or the iteration is dropped.
pub struct ChunkSequence<S> {
    files: Arc<[Utf8PathBuf]>,
    next_file: usize,
    current: Option<OpenFile>,
    settings: InputSettings,
    groups: Arc<OsmGroups>,
    factory: SinkFactory<S>,
    deferred: Option<OsmInputError>,
    halted: bool,
}

impl<S> fmt::Debug for ChunkSequence<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkSequence")
            .field("next_file", &self.next_file)
            .field("open", &self.current.as_ref().map(|file| &file.path))
            .field("halted", &self.halted)
            .finish_non_exhaustive()
    }
}

enum Fill {
    Full,
    Exhausted,
}

impl<S: EventSink> ChunkSequence<S> {
    fn open_next(&mut self) -> Option<Result<OpenFile, OsmInputError>> {
        let path = self.files.get(self.next_file)?.clone();
        self.next_file = self.next_file.saturating_add(1);
        let file_name: Arc<str> = Arc::from(path.file_name().unwrap_or(path.as_str()));
        Some(open_source(&path).map(|source| OpenFile {
            walker: Walker::new(source, file_name, self.settings.range),
            path,
        }))
    }

    fn fill(&mut self, sink: &mut S, chunk_size: usize) -> Fill {
        loop {
            if self.current.is_none() {
                match self.open_next() {
                    Some(Ok(opened)) => self.current = Some(opened),
                    Some(Err(err)) => {
                        self.deferred = Some(err);
                        return Fill::Exhausted;
                    }
                    None => return Fill::Exhausted,
                }
            }
            let Some(file) = self.current.as_mut() else {
                return Fill::Exhausted;
            };
            match file.walker.advance(sink) {
                Ok(Advance::Progress) => {
                    if sink.len() >= chunk_size && !file.walker.in_entity() {
                        return Fill::Full;
                    }
                }
                Ok(Advance::EndOfFile) => {
                    let totals = file.walker.totals();
                    info!(
                        "finished {}: {} nodes, {} ways, {} relations ({} out of range, {} skipped)",
                        file.path,
                        totals.nodes,
                        totals.ways,
                        totals.relations,
                        totals.filtered,
                        totals.skipped
                    );
                    self.current = None;
                }
                Err(source) => {
                    let position = file.walker.position();
                    let path = file.path.clone();
                    self.current = None;
                    self.malformed(path, position, source);
                    return Fill::Exhausted;
                }
            }
        }
    }

    fn malformed(&mut self, path: Utf8PathBuf, position: usize, source: quick_xml::Error) {
        match self.settings.malformed {
            MalformedXmlPolicy::Truncate => {
                error!("malformed XML in {path} at byte {position}, ending pass early: {source}");
            }
            MalformedXmlPolicy::Fail => {
                self.deferred = Some(OsmInputError::Malformed {
                    path,
                    position,
                    source: Box::new(source),
                });
            }
        }
    }
}

impl<S: EventSink> Iterator for ChunkSequence<S> {
    type Item = ChunkResult<S::Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return self.deferred.take().map(Err);
        }
        let chunk_size = self.settings.effective_chunk_size();
        let mut sink = (self.factory)(chunk_size);
        if matches!(self.fill(&mut sink, chunk_size), Fill::Exhausted) {
            self.halted = true;
            self.current = None;
        }
        if sink.is_empty() {
            return self.deferred.take().map(Err);
        }
        let size = sink.len();
        if size > chunk_size.saturating_mul(2) {
            warn!("chunk of {size} events exceeds twice the nominal size of {chunk_size}");
        }
        Some(Ok(InputChunk::new(sink.into_events(), Arc::clone(&self.groups))))
    }
}
