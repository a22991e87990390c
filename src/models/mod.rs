//! Data models
//!
//! Outcomes of dispatched executables and their JSON event projection.

mod event;
mod outcome;

pub use event::{EventFields, EventRecord, EVENT_TYPE, SUCCESS_MESSAGE};
pub use outcome::ChildOutcome;
