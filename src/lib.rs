//! runt - parallel test-executable runner
//!
//! Discovers every executable under a batch directory, runs each one as an
//! isolated child process under a fixed concurrency ceiling, and reports one
//! Logstash-style JSON event per executable.
//!
//! ```no_run
//! # async fn demo() -> Result<(), runt::DriverError> {
//! let mut driver = runt::Driver::new();
//! driver.use_batch("tests/batch")?;
//! driver.launch_suites().await?;
//! for line in driver.json_events()? {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod executor;
pub mod models;
pub mod output;
pub mod utils;

pub use driver::{Driver, DriverState};
pub use error::{ChildError, DriverError};
pub use models::{ChildOutcome, EventRecord};
