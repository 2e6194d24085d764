//! Streaming walk over one OSM XML document.
//!
//! The walker pulls one token at a time, tracks the open element stack and
//! the scratch state of the current top-level entity (its tags, way node
//! references or relation members) and hands completed elements to an
//! [`EventSink`]. It never decides chunk boundaries; it only reports whether
//! a top-level element is still open.

use std::io::BufRead;
use std::mem;
use std::sync::Arc;

use geo::Point;
use log::{debug, warn};
use osmgraph_core::{Properties, RangeFilter, Taggable};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::relation::{MemberDescriptor, RelationPlan};
use crate::sink::EventSink;
use crate::way::WayPlan;

mod attributes;

const ROOT: &str = "osm";

/// Outcome of one [`Walker::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    /// A token was consumed.
    Progress,
    /// The document ended cleanly.
    EndOfFile,
}

/// Per-file counters reported when a file is finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FileTotals {
    pub nodes: u64,
    pub ways: u64,
    pub relations: u64,
    pub filtered: u64,
    pub skipped: u64,
}

#[derive(Debug, Default)]
enum Pending {
    #[default]
    Empty,
    Way {
        osm_id: i64,
        properties: Properties,
        refs: Vec<i64>,
    },
    Relation {
        osm_id: i64,
        properties: Properties,
        members: Vec<MemberDescriptor>,
    },
}

pub(crate) struct Walker<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    file_name: Arc<str>,
    range: Option<RangeFilter>,
    stack: Vec<String>,
    tags: Properties,
    pending: Pending,
    open: Option<Taggable>,
    totals: FileTotals,
}

impl<R: BufRead> Walker<R> {
    pub(crate) fn new(source: R, file_name: Arc<str>, range: Option<RangeFilter>) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            file_name,
            range,
            stack: Vec::new(),
            tags: Properties::new(),
            pending: Pending::Empty,
            open: None,
            totals: FileTotals::default(),
        }
    }

    /// Whether a top-level element is open, so a chunk must not close yet.
    pub(crate) fn in_entity(&self) -> bool {
        self.stack.len() > 1
    }

    /// Byte offset into the decoded stream.
    pub(crate) fn position(&self) -> usize {
        self.reader.buffer_position()
    }

    pub(crate) const fn totals(&self) -> FileTotals {
        self.totals
    }

    /// Consume one token, feeding any completed element into `sink`.
    pub(crate) fn advance<S: EventSink>(&mut self, sink: &mut S) -> Result<Advance, quick_xml::Error> {
        let mut buf = mem::take(&mut self.buf);
        buf.clear();
        let outcome = self.dispatch(&mut buf, sink);
        self.buf = buf;
        outcome
    }

    fn dispatch<S: EventSink>(
        &mut self,
        buf: &mut Vec<u8>,
        sink: &mut S,
    ) -> Result<Advance, quick_xml::Error> {
        match self.reader.read_event_into(buf)? {
            Event::Start(element) => self.open_element(&element, sink)?,
            Event::Empty(element) => {
                self.open_element(&element, sink)?;
                self.close_element(sink);
            }
            Event::End(_) => self.close_element(sink),
            Event::Eof => {
                if let Some(unclosed) = self.stack.last() {
                    return Err(quick_xml::Error::UnexpectedEof(format!("</{unclosed}>")));
                }
                return Ok(Advance::EndOfFile);
            }
            _ => {}
        }
        Ok(Advance::Progress)
    }

    fn under_root(&self) -> bool {
        self.stack.first().is_some_and(|root| root == ROOT)
    }

    fn open_element<S: EventSink>(
        &mut self,
        element: &BytesStart<'_>,
        sink: &mut S,
    ) -> Result<(), quick_xml::Error> {
        let name = attributes::element_name(element)?;
        match (self.stack.len(), name.as_str()) {
            (_, "tag") => self.record_tag(element)?,
            (0, ROOT) => {
                let properties = attributes::dataset(&self.file_name, attributes::decode(element)?);
                sink.dataset(&self.file_name, properties);
            }
            (1, top_level) if self.under_root() => self.open_top_level(top_level, element, sink)?,
            (2, "nd") => self.record_node_ref(element)?,
            (2, "member") => self.record_member(element)?,
            _ => {}
        }
        self.stack.push(name);
        Ok(())
    }

    fn open_top_level<S: EventSink>(
        &mut self,
        name: &str,
        element: &BytesStart<'_>,
        sink: &mut S,
    ) -> Result<(), quick_xml::Error> {
        self.tags = Properties::new();
        self.pending = Pending::Empty;
        self.open = None;
        match name {
            "bounds" => sink.bounds(&self.file_name, attributes::bounds(attributes::decode(element)?)),
            "node" => {
                if let Some((osm_id, properties, location)) = self.identify(name, element)? {
                    self.open_node(osm_id, properties, location, sink);
                }
            }
            "way" => {
                if let Some((osm_id, properties, _)) = self.identify(name, element)? {
                    self.pending = Pending::Way {
                        osm_id,
                        properties,
                        refs: Vec::new(),
                    };
                    self.open = Some(Taggable::Way(osm_id));
                }
            }
            "relation" => {
                if let Some((osm_id, properties, _)) = self.identify(name, element)? {
                    self.pending = Pending::Relation {
                        osm_id,
                        properties,
                        members: Vec::new(),
                    };
                    self.open = Some(Taggable::Relation(osm_id));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn identify(
        &mut self,
        kind: &str,
        element: &BytesStart<'_>,
    ) -> Result<Option<(i64, Properties, Option<Point<f64>>)>, quick_xml::Error> {
        let coerced = attributes::entity(kind, attributes::decode(element)?);
        let Some(osm_id) = coerced.osm_id else {
            warn!("{kind} without a usable id in {} skipped", self.file_name);
            self.totals.skipped += 1;
            return Ok(None);
        };
        Ok(Some((osm_id, coerced.properties, coerced.location)))
    }

    fn open_node<S: EventSink>(
        &mut self,
        osm_id: i64,
        properties: Properties,
        location: Option<Point<f64>>,
        sink: &mut S,
    ) {
        let outside = self
            .range
            .zip(location)
            .is_some_and(|(range, point)| !range.contains(point));
        if outside {
            self.totals.filtered += 1;
            return;
        }
        sink.node(osm_id, properties);
        self.open = Some(Taggable::Node(osm_id));
        self.totals.nodes += 1;
    }

    fn record_tag(&mut self, element: &BytesStart<'_>) -> Result<(), quick_xml::Error> {
        let raw = attributes::decode(element)?;
        let Some(key) = attributes::lookup(&raw, "k") else {
            warn!("tag without key in {} ignored", self.file_name);
            return Ok(());
        };
        let value = attributes::lookup(&raw, "v").unwrap_or_default();
        self.tags.insert(key, value);
        Ok(())
    }

    fn record_node_ref(&mut self, element: &BytesStart<'_>) -> Result<(), quick_xml::Error> {
        let Pending::Way { osm_id, refs, .. } = &mut self.pending else {
            return Ok(());
        };
        let raw = attributes::decode(element)?;
        match attributes::lookup(&raw, "ref").map(|text| text.trim().parse::<i64>()) {
            Some(Ok(node_id)) => refs.push(node_id),
            Some(Err(err)) => warn!("way {osm_id} has an unparsable nd ref: {err}"),
            None => warn!("way {osm_id} has an nd without ref"),
        }
        Ok(())
    }

    fn record_member(&mut self, element: &BytesStart<'_>) -> Result<(), quick_xml::Error> {
        let Pending::Relation { members, .. } = &mut self.pending else {
            return Ok(());
        };
        let raw = attributes::decode(element)?;
        members.push(MemberDescriptor::new(
            attributes::lookup(&raw, "type"),
            attributes::lookup(&raw, "ref"),
            attributes::lookup(&raw, "role"),
        ));
        Ok(())
    }

    fn close_element<S: EventSink>(&mut self, sink: &mut S) {
        if self.stack.pop().is_none() || self.stack.len() != 1 || !self.under_root() {
            return;
        }
        match mem::take(&mut self.pending) {
            Pending::Way {
                osm_id,
                properties,
                refs,
            } => {
                sink.way(WayPlan::new(osm_id, properties, &self.tags, &refs));
                self.totals.ways += 1;
            }
            Pending::Relation {
                osm_id,
                properties,
                members,
            } => {
                sink.relation(RelationPlan::resolve(osm_id, properties, &members));
                self.totals.relations += 1;
            }
            Pending::Empty => {}
        }
        let tags = mem::take(&mut self.tags);
        if let Some(owner) = self.open.take()
            && !tags.is_empty()
        {
            sink.tags(owner, tags);
        }
    }
}

impl<R> Drop for Walker<R> {
    fn drop(&mut self) {
        debug!("closed {}", self.file_name);
    }
}

#[cfg(test)]
mod tests;
