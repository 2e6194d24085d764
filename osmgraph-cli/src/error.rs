//! Error types emitted by the osmgraph CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use osmgraph_core::RangeFilterError;
use osmgraph_data::OsmInputError;
use thiserror::Error;

/// Errors emitted by the osmgraph CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// The `--range` value is not a bounding box.
    #[error("invalid range {value:?}")]
    InvalidRange {
        value: String,
        #[source]
        source: RangeFilterError,
    },
    /// The `--log-level` value is not a log level.
    #[error("invalid log level {value:?}")]
    InvalidLogLevel {
        value: String,
        #[source]
        source: log::ParseLevelError,
    },
    /// Reading the OSM input failed.
    #[error("failed to read OSM input")]
    Input(#[from] OsmInputError),
    /// A chunk consumer thread panicked.
    #[error("chunk consumer panicked")]
    WorkerPanicked,
    /// Serialising the summary failed.
    #[error("failed to serialise inspect summary")]
    SerialiseSummary(#[source] serde_json::Error),
    /// Writing the summary failed.
    #[error("failed to write inspect summary")]
    WriteSummary(#[source] std::io::Error),
}

impl CliError {
    /// Render the error followed by each of its causes, separated by `: `.
    #[must_use]
    pub fn report(&self) -> String {
        let mut rendered = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(inner) = cause {
            rendered.push_str(": ");
            rendered.push_str(&inner.to_string());
            cause = inner.source();
        }
        rendered
    }
}
