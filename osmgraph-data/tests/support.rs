// Shared helpers for OSM input tests.

use std::fmt::Debug;
use std::fs;
use std::io::Write;

use bzip2::write::BzEncoder;
use camino::{Utf8Path, Utf8PathBuf};
use flate2::write::GzEncoder;
use osmgraph_core::{InputChunk, RecordingVisitor, VisitableEvent, Visited};

/// Directory holding the `.osm` fixtures.
pub fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Path of a named fixture.
pub fn fixture(name: &str) -> Utf8PathBuf {
    fixtures_dir().join(name)
}

/// Compression applied by [`packed_copy`].
#[derive(Debug, Clone, Copy)]
pub enum Packing {
    Gzip,
    Bzip2,
}

/// Write `contents` to `dir/name`.
pub fn write_plain(dir: &Utf8Path, name: &str, contents: &str) -> Utf8PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture copy");
    path
}

/// Copy a fixture into `dir`, compressed with `packing`.
pub fn packed_copy(dir: &Utf8Path, name: &str, packing: Packing) -> Utf8PathBuf {
    let raw = fs::read(fixture(name)).expect("read fixture");
    let (path, packed) = match packing {
        Packing::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(&raw).expect("gzip fixture");
            (dir.join(format!("{name}.gz")), encoder.finish().expect("finish gzip"))
        }
        Packing::Bzip2 => {
            let mut encoder = BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(&raw).expect("bzip2 fixture");
            (dir.join(format!("{name}.bz2")), encoder.finish().expect("finish bzip2"))
        }
    };
    fs::write(&path, packed).expect("write packed fixture");
    path
}

/// A temporary directory addressed by a UTF-8 path.
pub fn scratch_dir() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    (dir, path)
}

/// Replay every chunk of a pass through a recording visitor.
///
/// Returns the visited events and the size of each chunk. Panics on the
/// first chunk error or visitor contract violation.
pub fn replay<E, Er, I>(pass: I) -> (Vec<Visited>, Vec<usize>)
where
    E: VisitableEvent,
    Er: Debug,
    I: IntoIterator<Item = Result<InputChunk<E>, Er>>,
{
    let mut visitor = RecordingVisitor::default();
    let mut sizes = Vec::new();
    for chunk in pass {
        let mut chunk = chunk.expect("chunk should be produced");
        sizes.push(chunk.size());
        while chunk.next(&mut visitor) {}
    }
    assert!(
        visitor.violations().is_empty(),
        "visitor contract violated: {:?}",
        visitor.violations()
    );
    (visitor.into_visited(), sizes)
}

/// Number of entities carrying `label`.
pub fn count_label(visited: &[Visited], label: &str) -> usize {
    visited
        .iter()
        .filter(|item| matches!(item, Visited::Entity { labels, .. } if labels.iter().any(|l| l == label)))
        .count()
}

/// Number of edges of `edge_type`.
pub fn count_edge_type(visited: &[Visited], wanted: &str) -> usize {
    visited
        .iter()
        .filter(|item| matches!(item, Visited::Edge { edge_type, .. } if edge_type == wanted))
        .count()
}

/// `(start, end)` ids of every edge of `wanted` type, in emission order.
pub fn edges_of(visited: &[Visited], wanted: &str) -> Vec<(String, String)> {
    visited
        .iter()
        .filter_map(|item| match item {
            Visited::Edge {
                start_id,
                end_id,
                edge_type,
                ..
            } if edge_type == wanted => Some((start_id.clone(), end_id.clone())),
            _ => None,
        })
        .collect()
}

/// Follow `NEXT` edges from `start`, returning the ids visited in order.
pub fn walk_next(visited: &[Visited], start: &str) -> Vec<String> {
    let next = edges_of(visited, "NEXT");
    let mut chain = vec![start.to_owned()];
    let mut current = start.to_owned();
    while let Some((_, to)) = next.iter().find(|(from, _)| *from == current) {
        if chain.contains(to) {
            break;
        }
        chain.push(to.clone());
        current = to.clone();
    }
    chain
}

/// Follow incoming `NEXT` edges from `start`, returning the ids visited.
pub fn walk_next_incoming(visited: &[Visited], start: &str) -> Vec<String> {
    let next = edges_of(visited, "NEXT");
    let mut chain = vec![start.to_owned()];
    let mut current = start.to_owned();
    while let Some((from, _)) = next.iter().find(|(_, to)| *to == current) {
        if chain.contains(from) {
            break;
        }
        chain.push(from.clone());
        current = from.clone();
    }
    chain
}

/// Take exactly `steps` outgoing `NEXT` hops from `start`, stopping early
/// only at a proxy with no outgoing edge.
pub fn follow_next(visited: &[Visited], start: &str, steps: usize) -> Vec<String> {
    let next = edges_of(visited, "NEXT");
    let mut path = vec![start.to_owned()];
    let mut current = start.to_owned();
    for _ in 0..steps {
        let Some((_, to)) = next.iter().find(|(from, _)| *from == current) else {
            break;
        };
        path.push(to.clone());
        current = to.clone();
    }
    path
}
