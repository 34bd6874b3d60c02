//! Active-pool tracking and failover detection.

/// A detected change of the serving pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolChange {
    pub from: String,
    pub to: String,
}

/// Tracks which backend pool is currently serving traffic.
///
/// Starts with no pool observed; the first observation establishes the
/// active pool without counting as a failover. Runs for the process
/// lifetime, there is no terminal state.
#[derive(Debug, Default)]
pub struct PoolTracker {
    current: Option<String>,
}

impl PoolTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observed pool.
    ///
    /// Returns the transition when the active pool changed. The state is
    /// updated on every distinct observation, even if the caller later
    /// suppresses the resulting alert.
    pub fn observe(&mut self, pool: &str) -> Option<PoolChange> {
        match self.current.as_deref() {
            None => {
                self.current = Some(pool.to_string());
                None
            }
            Some(active) if active == pool => None,
            Some(active) => {
                let change = PoolChange {
                    from: active.to_string(),
                    to: pool.to_string(),
                };
                self.current = Some(pool.to_string());
                Some(change)
            }
        }
    }

    /// The currently active pool, if one has been observed.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_not_report_failover_on_first_observation() {
        // Arrange
        let mut tracker = PoolTracker::new();

        // Act
        let change = tracker.observe("blue");

        // Assert
        assert!(change.is_none());
        assert_eq!(tracker.current(), Some("blue"));
    }

    #[test]
    fn should_not_report_failover_for_repeated_pool() {
        // Arrange
        let mut tracker = PoolTracker::new();
        tracker.observe("blue");

        // Act & Assert
        assert!(tracker.observe("blue").is_none());
        assert!(tracker.observe("blue").is_none());
    }

    #[test]
    fn should_report_exactly_one_change_per_distinct_observation() {
        // Arrange
        let mut tracker = PoolTracker::new();
        tracker.observe("blue");

        // Act
        let first = tracker.observe("green");
        let repeat = tracker.observe("green");
        let second = tracker.observe("blue");

        // Assert
        assert_eq!(
            first,
            Some(PoolChange {
                from: "blue".to_string(),
                to: "green".to_string()
            })
        );
        assert!(repeat.is_none());
        assert_eq!(
            second,
            Some(PoolChange {
                from: "green".to_string(),
                to: "blue".to_string()
            })
        );
        assert_eq!(tracker.current(), Some("blue"));
    }
}
