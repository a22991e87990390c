//! Outcome collection
//!
//! Every launch task reports through one shared channel; the aggregator
//! counts arrivals until each dispatched executable has reported.

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::DriverError;
use crate::models::ChildOutcome;

/// Producer half handed to each launch task
pub type CompletionSender = mpsc::UnboundedSender<ChildOutcome>;

/// Consumer half of the completion channel
pub struct Aggregator {
    rx: mpsc::UnboundedReceiver<ChildOutcome>,
    expected: usize,
}

impl Aggregator {
    /// Open a completion channel expecting `expected` outcomes
    pub fn channel(expected: usize) -> (CompletionSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx, expected })
    }

    /// Block until every expected outcome has arrived
    ///
    /// Outcomes come back in completion order. If every sender is dropped
    /// early the partial set is discarded and `Incomplete` is returned.
    pub async fn collect(mut self) -> Result<Vec<ChildOutcome>, DriverError> {
        let mut results = Vec::with_capacity(self.expected);

        while results.len() < self.expected {
            match self.rx.recv().await {
                Some(outcome) => {
                    debug!(
                        "Collected {} ({}/{})",
                        outcome.executable,
                        results.len() + 1,
                        self.expected
                    );
                    results.push(outcome);
                }
                None => {
                    return Err(DriverError::Incomplete {
                        expected: self.expected,
                        received: results.len(),
                    })
                }
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collects_expected_count() {
        let (tx, aggregator) = Aggregator::channel(3);
        for name in ["a", "b", "c"] {
            tx.send(ChildOutcome::success(name, Vec::new(), Vec::new()))
                .unwrap();
        }

        let results = aggregator.collect().await.unwrap();
        let names: Vec<_> = results.iter().map(|r| r.executable.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_stops_at_expected_count() {
        let (tx, aggregator) = Aggregator::channel(1);
        tx.send(ChildOutcome::success("a", Vec::new(), Vec::new()))
            .unwrap();
        tx.send(ChildOutcome::success("b", Vec::new(), Vec::new()))
            .unwrap();

        // Returns without waiting for the sender to drop
        let results = aggregator.collect().await.unwrap();
        assert_eq!(results.len(), 1);
        drop(tx);
    }

    #[tokio::test]
    async fn test_zero_expected() {
        let (_tx, aggregator) = Aggregator::channel(0);
        assert!(aggregator.collect().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_channel_is_incomplete() {
        let (tx, aggregator) = Aggregator::channel(2);
        tx.send(ChildOutcome::success("a", Vec::new(), Vec::new()))
            .unwrap();
        drop(tx);

        let err = aggregator.collect().await.unwrap_err();
        assert!(matches!(
            err,
            DriverError::Incomplete {
                expected: 2,
                received: 1
            }
        ));
    }
}
