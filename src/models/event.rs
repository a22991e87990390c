//! Logstash-style JSON events
//!
//! One `EventRecord` is produced per `ChildOutcome` at output time and
//! thrown away once serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value of `@type` on every event
pub const EVENT_TYPE: &str = "ShellCommand";

/// `@message` for a child that exited cleanly
pub const SUCCESS_MESSAGE: &str = "Command completed successfully.";

/// Serialized event, one JSON object per executable
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "@timestamp")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "@tags")]
    pub tags: Vec<String>,

    #[serde(rename = "@type")]
    pub event_type: String,

    #[serde(rename = "@source")]
    pub source: String,

    #[serde(rename = "@fields")]
    pub fields: EventFields,

    #[serde(rename = "@message")]
    pub message: String,
}

/// Executable name and captured output
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventFields {
    pub executable: String,
    pub stdout: String,
    pub stderr: String,
}

impl EventRecord {
    pub fn is_success(&self) -> bool {
        self.message == SUCCESS_MESSAGE
    }
}
