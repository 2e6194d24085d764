//! Unit tests for the streaming walker.

use std::sync::Arc;

use osmgraph_core::{EdgeType, EntityRef, RangeFilter, Taggable};
use rstest::rstest;

use super::{Advance, FileTotals, Walker};
use crate::sink::{EdgeSink, EventSink, NodeSink};

fn walk<S: EventSink>(
    xml: &str,
    range: Option<RangeFilter>,
    sink: &mut S,
) -> Result<FileTotals, quick_xml::Error> {
    let mut walker = Walker::new(xml.as_bytes(), Arc::from("test.osm"), range);
    while walker.advance(sink)? == Advance::Progress {}
    Ok(walker.totals())
}

fn entities(xml: &str, range: Option<RangeFilter>) -> (Vec<EntityRef>, FileTotals) {
    let mut sink = NodeSink::default();
    let totals = walk(xml, range, &mut sink).expect("document should parse");
    let refs = sink.into_events().iter().map(|event| event.entity()).collect();
    (refs, totals)
}

#[rstest]
fn tags_are_flushed_after_their_owner_and_never_leak() {
    let xml = r#"<osm>
        <node id="1" lat="1.0" lon="1.0"><tag k="amenity" v="cafe"/></node>
        <node id="2" lat="2.0" lon="2.0"/>
    </osm>"#;
    let (refs, totals) = entities(xml, None);
    assert_eq!(
        refs,
        vec![
            EntityRef::Dataset(Arc::from("test.osm")),
            EntityRef::Node(1),
            EntityRef::Tags(Taggable::Node(1)),
            EntityRef::Node(2),
        ]
    );
    assert_eq!(totals.nodes, 2);
}

#[rstest]
fn self_closing_elements_behave_like_open_and_close() {
    let xml = r#"<osm><node id="1"/><node id="2"/><way id="9"><nd ref="1"/><nd ref="2"/></way></osm>"#;
    let (refs, totals) = entities(xml, None);
    assert_eq!(
        refs,
        vec![
            EntityRef::Dataset(Arc::from("test.osm")),
            EntityRef::Node(1),
            EntityRef::Node(2),
            EntityRef::Way(9),
            EntityRef::WayNode { way: 9, node: 1 },
            EntityRef::WayNode { way: 9, node: 2 },
        ]
    );
    assert_eq!(totals.ways, 1);
}

#[rstest]
fn elements_without_an_id_are_skipped_with_their_tags() {
    let xml = r#"<osm>
        <node lat="1.0" lon="1.0"><tag k="name" v="orphan"/></node>
        <way id="x"><nd ref="1"/><tag k="highway" v="path"/></way>
        <node id="3"/>
    </osm>"#;
    let (refs, totals) = entities(xml, None);
    assert_eq!(
        refs,
        vec![EntityRef::Dataset(Arc::from("test.osm")), EntityRef::Node(3)]
    );
    assert_eq!(totals.skipped, 2);
}

#[rstest]
fn nodes_outside_the_range_are_dropped_with_their_tags() {
    let range: RangeFilter = "0,0,10,10".parse().expect("valid range");
    let xml = r#"<osm>
        <node id="1" lat="5.0" lon="5.0"/>
        <node id="2" lat="50.0" lon="5.0"><tag k="name" v="far"/></node>
        <node id="3" lat="10.0" lon="10.0"/>
        <node id="4"/>
    </osm>"#;
    let (refs, totals) = entities(xml, Some(range));
    assert_eq!(
        refs,
        vec![
            EntityRef::Dataset(Arc::from("test.osm")),
            EntityRef::Node(1),
            EntityRef::Node(3),
            EntityRef::Node(4),
        ]
    );
    assert_eq!(totals.filtered, 1);
}

#[rstest]
fn relation_tags_follow_the_member_edges() {
    let xml = r#"<osm>
        <relation id="7">
            <member type="node" ref="1" role="stop"/>
            <tag k="type" v="route"/>
        </relation>
    </osm>"#;
    let mut sink = EdgeSink::default();
    walk(xml, None, &mut sink).expect("document should parse");
    let types: Vec<EdgeType> = sink
        .into_events()
        .iter()
        .map(|event| event.edge_type())
        .collect();
    assert_eq!(types, vec![EdgeType::Member, EdgeType::Tags]);
}

#[rstest]
fn in_entity_tracks_open_top_level_elements() {
    let xml = r#"<osm><way id="5"><nd ref="1"/><nd ref="2"/></way></osm>"#;
    let mut walker = Walker::new(xml.as_bytes(), Arc::from("test.osm"), None);
    let mut sink = NodeSink::default();
    let mut observed = Vec::new();
    while walker.advance(&mut sink).expect("document should parse") == Advance::Progress {
        observed.push(walker.in_entity());
    }
    assert_eq!(observed, vec![false, true, true, true, false, false]);
}

#[rstest]
#[case::unclosed("<osm><node id=\"1\">")]
#[case::mismatched("<osm><node id=\"1\"></way></osm>")]
fn broken_documents_report_an_error(#[case] xml: &str) {
    let mut sink = NodeSink::default();
    assert!(walk(xml, None, &mut sink).is_err());
}

#[rstest]
fn unclosed_documents_keep_what_was_emitted() {
    let mut sink = NodeSink::default();
    let err = walk(r#"<osm><node id="1"/><node id="2">"#, None, &mut sink)
        .expect_err("document is truncated");
    assert!(matches!(err, quick_xml::Error::UnexpectedEof(_)));
    assert_eq!(sink.len(), 3);
}
