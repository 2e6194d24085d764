//! The `inspect` command: drive both passes and summarise them.

use std::io::Write;
use std::thread;

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use log::{LevelFilter, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmgraph_core::{Estimates, RangeFilter, VisitableEvent};
use osmgraph_data::{
    DEFAULT_CHUNK_SIZE, EventSink, InputIterable, InputSettings, MalformedXmlPolicy, OsmInput,
    OsmInputError, SharedChunks,
};
use serde::{Deserialize, Serialize};

use crate::tally::PassTally;
use crate::{
    ARG_CHANNEL_CAPACITY, ARG_CHUNK_SIZE, ARG_FILES, ARG_LOG_LEVEL, ARG_RANGE, ARG_STRICT,
    ARG_WORKERS, CliError, ENV_FILES,
};

pub(crate) const DEFAULT_WORKERS: usize = 2;
pub(crate) const DEFAULT_CHANNEL_CAPACITY: usize = 4;

/// CLI arguments for the `inspect` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read OSM XML files (plain, .gz or .bz2) in order, replay the \
                 node and relationship passes through a pool of consumer \
                 threads and print a JSON summary of the events. Options can \
                 come from CLI flags, configuration files, or environment \
                 variables.",
    about = "Summarise the graph events produced from OSM XML files"
)]
#[ortho_config(prefix = "OSMGRAPH")]
pub(crate) struct InspectArgs {
    /// OSM XML files, read in the order given.
    #[arg(value_name = "path", num_args = 1..)]
    #[serde(default)]
    pub(crate) files: Option<Vec<Utf8PathBuf>>,
    /// Keep only nodes inside `minx,miny,maxx,maxy` (longitude, latitude).
    #[arg(long = ARG_RANGE, value_name = "minx,miny,maxx,maxy", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) range: Option<String>,
    /// Nominal number of events per chunk.
    #[arg(long = ARG_CHUNK_SIZE, value_name = "events")]
    #[serde(default)]
    pub(crate) chunk_size: Option<usize>,
    /// Fail on malformed XML instead of ending the pass early.
    #[arg(long = ARG_STRICT, action = ArgAction::SetTrue)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) strict: bool,
    /// Consumer threads per pass.
    #[arg(long = ARG_WORKERS, value_name = "count")]
    #[serde(default)]
    pub(crate) workers: Option<usize>,
    /// Finished chunks that may wait for a consumer.
    #[arg(long = ARG_CHANNEL_CAPACITY, value_name = "chunks")]
    #[serde(default)]
    pub(crate) channel_capacity: Option<usize>,
    /// Log level for the JSON log written to stderr.
    #[arg(long = ARG_LOG_LEVEL, value_name = "level")]
    #[serde(default)]
    pub(crate) log_level: Option<String>,
}

impl InspectArgs {
    pub(crate) fn into_config(self) -> Result<InspectConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        InspectConfig::try_from(merged)
    }
}

/// Resolved `inspect` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InspectConfig {
    pub(crate) files: Vec<Utf8PathBuf>,
    pub(crate) settings: InputSettings,
    pub(crate) workers: usize,
    pub(crate) channel_capacity: usize,
    pub(crate) log_level: LevelFilter,
}

impl InspectConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        for path in &self.files {
            if !path.is_file() {
                return Err(CliError::MissingSourceFile {
                    field: ARG_FILES,
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }
}

impl TryFrom<InspectArgs> for InspectConfig {
    type Error = CliError;

    fn try_from(args: InspectArgs) -> Result<Self, Self::Error> {
        let files = args
            .files
            .filter(|files| !files.is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_FILES,
                env: ENV_FILES,
            })?;
        let range = args.range.as_deref().map(parse_range).transpose()?;
        let malformed = if args.strict {
            MalformedXmlPolicy::Fail
        } else {
            MalformedXmlPolicy::Truncate
        };
        let settings = InputSettings::default()
            .with_chunk_size(args.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE))
            .with_range(range)
            .with_malformed(malformed);
        let log_level = args
            .log_level
            .as_deref()
            .map_or(Ok(LevelFilter::Info), parse_log_level)?;
        Ok(Self {
            files,
            settings,
            workers: args.workers.unwrap_or(DEFAULT_WORKERS).max(1),
            channel_capacity: args.channel_capacity.unwrap_or(DEFAULT_CHANNEL_CAPACITY),
            log_level,
        })
    }
}

fn parse_range(value: &str) -> Result<RangeFilter, CliError> {
    value.parse().map_err(|source| CliError::InvalidRange {
        value: value.to_owned(),
        source,
    })
}

fn parse_log_level(value: &str) -> Result<LevelFilter, CliError> {
    value.parse().map_err(|source| CliError::InvalidLogLevel {
        value: value.to_owned(),
        source,
    })
}

/// What a loader would have received from both passes.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct InspectSummary {
    pub(crate) files: Vec<Utf8PathBuf>,
    pub(crate) nodes: PassTally,
    pub(crate) relationships: PassTally,
    pub(crate) estimates: Estimates,
}

pub(crate) fn resolve_inspect_config(args: InspectArgs) -> Result<InspectConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn run_inspect_with(
    config: &InspectConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let summary = inspect(config)?;
    write_summary(writer, &summary)
}

pub(crate) fn inspect(config: &InspectConfig) -> Result<InspectSummary, CliError> {
    let input = OsmInput::new(config.files.iter().cloned(), config.settings)?;
    let estimates = input.calculate_estimates()?;
    info!(
        "inspecting {} file(s) with {} consumer(s) per pass",
        config.files.len(),
        config.workers
    );
    let nodes = drain(&input.nodes(), config)?;
    info!(
        "node pass: {} events in {} chunks ({} nodes, {} ways)",
        nodes.events,
        nodes.chunks,
        nodes.label_count("OSMNode"),
        nodes.label_count("OSMWay")
    );
    let relationships = drain(&input.relationships(), config)?;
    info!(
        "relationship pass: {} events in {} chunks ({} NEXT)",
        relationships.events,
        relationships.chunks,
        relationships.edge_type_count("NEXT")
    );
    Ok(InspectSummary {
        files: config.files.clone(),
        nodes,
        relationships,
        estimates,
    })
}

fn drain<S>(pass: &InputIterable<S>, config: &InspectConfig) -> Result<PassTally, CliError>
where
    S: EventSink + 'static,
    S::Event: Send + 'static,
{
    let receiver = pass.spawn(config.channel_capacity)?;
    let outcomes: Vec<Result<PassTally, CliError>> = thread::scope(|scope| {
        let workers: Vec<_> = (0..config.workers)
            .map(|_| {
                let chunks = receiver.shared();
                scope.spawn(move || consume(&chunks))
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| match worker.join() {
                Ok(outcome) => outcome.map_err(CliError::from),
                Err(_) => Err(CliError::WorkerPanicked),
            })
            .collect()
    });
    receiver.join()?;
    outcomes
        .into_iter()
        .try_fold(PassTally::default(), |mut total, outcome| {
            total.merge(outcome?);
            Ok(total)
        })
}

fn consume<E: VisitableEvent>(chunks: &SharedChunks<E>) -> Result<PassTally, OsmInputError> {
    let mut tally = PassTally::default();
    for chunk in chunks.iter() {
        let mut chunk = chunk?;
        tally.record_chunk(chunk.size());
        while chunk.next(&mut tally) {}
    }
    Ok(tally)
}

fn write_summary(writer: &mut dyn Write, summary: &InspectSummary) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(summary).map_err(CliError::SerialiseSummary)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteSummary)?;
    writer.write_all(b"\n").map_err(CliError::WriteSummary)?;
    Ok(())
}
