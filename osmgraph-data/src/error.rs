//! Error types produced while reading OSM XML inputs.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors produced while opening, sizing or parsing OSM XML inputs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OsmInputError {
    /// The input file could not be opened.
    #[error("failed to open OSM file {path:?}")]
    Open { path: Utf8PathBuf, source: io::Error },
    /// The compressed stream could not be decoded.
    #[error("failed to decompress OSM file {path:?}")]
    Decompress { path: Utf8PathBuf, source: io::Error },
    /// The size of an input file could not be determined.
    #[error("failed to read metadata for OSM file {path:?}")]
    Metadata { path: Utf8PathBuf, source: io::Error },
    /// The XML token stream was malformed and the strict policy is active.
    #[error("malformed OSM XML in {path:?} at byte {position}")]
    Malformed {
        path: Utf8PathBuf,
        position: usize,
        source: Box<quick_xml::Error>,
    },
    /// No input files were supplied.
    #[error("no OSM files specified")]
    NoInputFiles,
    /// The background chunk producer could not be started.
    #[error("failed to spawn chunk producer")]
    SpawnProducer { source: io::Error },
    /// The background chunk producer panicked.
    #[error("chunk producer panicked")]
    ProducerPanicked,
}
