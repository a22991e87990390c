//! Event formatting
//!
//! Projects each `ChildOutcome` onto an `EventRecord` and serializes it as
//! one JSON object per line, ready for Logstash/Kibana ingestion.

use chrono::{DateTime, Utc};

use crate::error::DriverError;
use crate::models::{ChildOutcome, EventFields, EventRecord, EVENT_TYPE, SUCCESS_MESSAGE};

/// `@source` label used unless configured otherwise
pub const DEFAULT_SOURCE: &str = "Runt Demo";

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Outcome-to-event formatter
#[derive(Clone, Debug)]
pub struct EventFormatter {
    format: OutputFormat,
    source: String,
}

impl EventFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            source: DEFAULT_SOURCE.to_string(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Build the event for `outcome`, stamped with the current time
    pub fn to_event(&self, outcome: &ChildOutcome) -> EventRecord {
        self.to_event_at(outcome, Utc::now())
    }

    /// Build the event for `outcome` with an explicit timestamp
    pub fn to_event_at(&self, outcome: &ChildOutcome, timestamp: DateTime<Utc>) -> EventRecord {
        let message = match &outcome.error {
            None => SUCCESS_MESSAGE.to_string(),
            Some(e) => format!("Error: {e}"),
        };

        EventRecord {
            timestamp,
            tags: Vec::new(),
            event_type: EVENT_TYPE.to_string(),
            source: self.source.clone(),
            fields: EventFields {
                executable: outcome.executable.clone(),
                stdout: outcome.stdout_text(),
                stderr: outcome.stderr_text(),
            },
            message,
        }
    }

    /// Serialize one event as a single JSON line
    pub fn to_json(&self, record: &EventRecord) -> Result<String, DriverError> {
        serde_json::to_string(record).map_err(|source| DriverError::Serialization {
            record: format!("{record:?}"),
            source,
        })
    }

    /// One JSON line per outcome; any serialization failure fails them all
    pub fn json_events(&self, outcomes: &[ChildOutcome]) -> Result<Vec<String>, DriverError> {
        outcomes
            .iter()
            .map(|outcome| self.to_json(&self.to_event(outcome)))
            .collect()
    }

    /// Render outcomes in the configured format
    pub fn format_outcomes(&self, outcomes: &[ChildOutcome]) -> Result<Vec<String>, DriverError> {
        match self.format {
            OutputFormat::Json => self.json_events(outcomes),
            OutputFormat::Summary => Ok(outcomes.iter().map(|o| self.format_brief(o)).collect()),
        }
    }

    fn format_brief(&self, outcome: &ChildOutcome) -> String {
        match &outcome.error {
            None => format!("✓ {}", outcome.executable),
            Some(e) => format!("✗ {}: Error: {}", outcome.executable, e),
        }
    }
}

impl Default for EventFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Json)
    }
}
