//! Opening OSM files and selecting a decoder by file-name suffix.

use std::io::{BufRead, BufReader};

use bzip2::read::MultiBzDecoder;
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use flate2::read::MultiGzDecoder;
use log::debug;
use osmgraph_core::COMPRESSED_INFLATION;

use crate::OsmInputError;

/// Compression of an input file, chosen from its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Plain XML.
    None,
    /// `.gz`
    Gzip,
    /// `.bz2`
    Bzip2,
}

impl Compression {
    /// Detect the compression from the path's extension, ignoring case.
    ///
    /// # Examples
    /// ```
    /// use camino::Utf8Path;
    /// use osmgraph_data::Compression;
    ///
    /// assert_eq!(Compression::from_path(Utf8Path::new("map.osm.bz2")), Compression::Bzip2);
    /// assert_eq!(Compression::from_path(Utf8Path::new("map.OSM.GZ")), Compression::Gzip);
    /// assert_eq!(Compression::from_path(Utf8Path::new("map.osm")), Compression::None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("bz2") => Self::Bzip2,
            Some(ext) if ext.eq_ignore_ascii_case("gz") => Self::Gzip,
            _ => Self::None,
        }
    }

    /// Factor applied to the on-disk size when estimating decoded size.
    #[must_use]
    pub const fn inflation(self) -> u64 {
        match self {
            Self::None => 1,
            Self::Gzip | Self::Bzip2 => COMPRESSED_INFLATION,
        }
    }
}

pub(crate) type SourceReader = Box<dyn BufRead + Send>;

/// Open `path` and wrap it in the decoder its suffix calls for.
///
/// The decoded stream is primed once so a corrupt compressed header surfaces
/// here as [`OsmInputError::Decompress`] rather than as malformed XML later.
pub(crate) fn open_source(path: &Utf8Path) -> Result<SourceReader, OsmInputError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        OsmInputError::Open {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let compression = Compression::from_path(path);
    debug!("opened {path} ({compression:?})");
    let raw = BufReader::new(file);
    let mut reader: SourceReader = match compression {
        Compression::None => Box::new(raw),
        Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(raw))),
        Compression::Bzip2 => Box::new(BufReader::new(MultiBzDecoder::new(raw))),
    };
    reader
        .fill_buf()
        .map_err(|source| OsmInputError::Decompress {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(reader)
}

/// Approximate decoded size of `path` in bytes.
pub(crate) fn decoded_size(path: &Utf8Path) -> Result<u64, OsmInputError> {
    let metadata = fs_utf8::File::open_ambient(path, ambient_authority())
        .and_then(|file| file.metadata())
        .map_err(|source| OsmInputError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(metadata
        .len()
        .saturating_mul(Compression::from_path(path).inflation()))
}
