//! Test helpers that write small OSM XML inputs to a scratch directory.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

pub(super) const ONE_STREET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="test">
  <node id="1" lat="51.5000" lon="-0.1200"/>
  <node id="2" lat="51.5001" lon="-0.1190"/>
  <node id="3" lat="51.5002" lon="-0.1180">
    <tag k="highway" v="crossing"/>
  </node>
  <way id="10">
    <nd ref="1"/>
    <nd ref="2"/>
    <nd ref="3"/>
    <tag k="highway" v="residential"/>
    <tag k="oneway" v="yes"/>
  </way>
</osm>
"#;

pub(super) const MALFORMED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="1" lat="51.5" lon="-0.12">
  </way>
</osm>
"#;

/// Input files materialised in a temporary directory.
#[derive(Debug)]
pub(super) struct OsmFiles {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl OsmFiles {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        Self { _dir: dir, root }
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write OSM file");
        path
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }
}
