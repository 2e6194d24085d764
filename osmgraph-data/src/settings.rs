//! Tunables shared by both passes.

use osmgraph_core::RangeFilter;

/// Events per chunk when nothing else is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000;

/// What a pass does when the XML token stream turns out to be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedXmlPolicy {
    /// Log the failure, yield what was already accumulated and end the pass.
    #[default]
    Truncate,
    /// Yield what was already accumulated, then an error, then end the pass.
    Fail,
}

/// Settings for an [`OsmInput`](crate::OsmInput).
///
/// # Examples
/// ```
/// use osmgraph_data::{InputSettings, MalformedXmlPolicy};
///
/// # fn main() -> Result<(), osmgraph_core::RangeFilterError> {
/// let settings = InputSettings::default()
///     .with_chunk_size(500)
///     .with_range(Some("12.9,55.5,13.1,55.7".parse()?))
///     .with_malformed(MalformedXmlPolicy::Fail);
/// assert_eq!(settings.chunk_size, 500);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSettings {
    /// Nominal number of events per chunk. Zero is treated as one.
    pub chunk_size: usize,
    /// Nodes outside this box are dropped.
    pub range: Option<RangeFilter>,
    /// Reaction to malformed XML.
    pub malformed: MalformedXmlPolicy,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            range: None,
            malformed: MalformedXmlPolicy::default(),
        }
    }
}

impl InputSettings {
    /// Override the nominal chunk size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set or clear the range filter.
    #[must_use]
    pub const fn with_range(mut self, range: Option<RangeFilter>) -> Self {
        self.range = range;
        self
    }

    /// Choose the malformed-XML policy.
    #[must_use]
    pub const fn with_malformed(mut self, malformed: MalformedXmlPolicy) -> Self {
        self.malformed = malformed;
        self
    }

    pub(crate) fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}
