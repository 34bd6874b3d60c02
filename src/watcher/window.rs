//! Sliding-window request statistics.

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

/// Minimum in-window request count before an error rate is meaningful.
/// Below this floor `error_rate` reports no data rather than a noisy ratio.
pub const MIN_SAMPLE_SIZE: usize = 10;

/// Time-bounded request and error counters over the most recent window of
/// traffic.
///
/// Both queues are appended at the back with non-decreasing timestamps and
/// evicted from the front, so they stay sorted by construction; eviction
/// never needs to look past the first fresh entry.
#[derive(Debug)]
pub struct SlidingWindow {
    window: Duration,
    requests: VecDeque<DateTime<Utc>>,
    errors: VecDeque<DateTime<Utc>>,
}

impl SlidingWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            requests: VecDeque::new(),
            errors: VecDeque::new(),
        }
    }

    /// Record a request at `now` and evict entries that fell out of the
    /// window.
    pub fn record_request(&mut self, now: DateTime<Utc>) {
        self.requests.push_back(now);
        self.evict(now);
    }

    /// Record an error at `now` and evict entries that fell out of the
    /// window.
    pub fn record_error(&mut self, now: DateTime<Utc>) {
        self.errors.push_back(now);
        self.evict(now);
    }

    /// Drop entries older than `now - window` from the front of both
    /// queues.
    pub fn evict(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.window;
        while self.requests.front().is_some_and(|t| *t < cutoff) {
            self.requests.pop_front();
        }
        while self.errors.front().is_some_and(|t| *t < cutoff) {
            self.errors.pop_front();
        }
    }

    /// In-window error percentage, or `None` while fewer than
    /// [`MIN_SAMPLE_SIZE`] requests are in the window.
    pub fn error_rate(&self) -> Option<f64> {
        let total = self.requests.len();
        if total < MIN_SAMPLE_SIZE {
            return None;
        }
        Some(self.errors.len() as f64 / total as f64 * 100.0)
    }

    /// Raw in-window error count.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Raw in-window request count.
    pub fn request_count(&self) -> usize {
        self.requests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap()
    }

    fn window() -> SlidingWindow {
        SlidingWindow::new(Duration::seconds(60))
    }

    #[test]
    fn should_keep_only_entries_inside_window_after_insertion() {
        // Arrange
        let mut window = window();
        let start = base_time();

        // Act - entries at t+0, t+30, then one at t+90 evicting t+0
        window.record_request(start);
        window.record_request(start + Duration::seconds(30));
        window.record_request(start + Duration::seconds(90));

        // Assert - t+0 is older than 90 - 60 and must be gone
        assert_eq!(window.request_count(), 2);
    }

    #[test]
    fn should_retain_entry_exactly_at_window_boundary() {
        // Arrange
        let mut window = window();
        let start = base_time();

        // Act - the first entry sits exactly at now - window
        window.record_request(start);
        window.record_request(start + Duration::seconds(60));

        // Assert
        assert_eq!(window.request_count(), 2);
    }

    #[test]
    fn should_evict_nothing_on_second_pass_without_insertion() {
        // Arrange
        let mut window = window();
        let start = base_time();
        window.record_request(start);
        window.record_request(start + Duration::seconds(90));

        let now = start + Duration::seconds(90);
        window.evict(now);
        let after_first = window.request_count();

        // Act
        window.evict(now);

        // Assert - eviction is idempotent
        assert_eq!(window.request_count(), after_first);
    }

    #[test]
    fn should_evict_errors_independently_of_requests() {
        // Arrange
        let mut window = window();
        let start = base_time();
        window.record_error(start);

        // Act - a request insertion 90s later evicts the stale error too
        window.record_request(start + Duration::seconds(90));

        // Assert
        assert_eq!(window.error_count(), 0);
        assert_eq!(window.request_count(), 1);
    }

    #[test]
    fn should_compute_error_rate_once_sample_floor_met() {
        // Arrange
        let mut window = window();
        let now = base_time();
        for _ in 0..10 {
            window.record_request(now);
        }
        window.record_error(now);

        // Act
        let rate = window.error_rate();

        // Assert
        assert_eq!(rate, Some(10.0));
    }

    #[test]
    fn should_report_insufficient_data_below_sample_floor() {
        // Arrange
        let mut window = window();
        let now = base_time();
        for _ in 0..9 {
            window.record_request(now);
        }
        window.record_error(now);

        // Act & Assert
        assert_eq!(window.error_rate(), None);
    }

    #[test]
    fn should_compute_sixty_percent_for_six_errors_in_ten_requests() {
        // Arrange
        let mut window = window();
        let now = base_time();
        for _ in 0..10 {
            window.record_request(now);
        }
        for _ in 0..6 {
            window.record_error(now);
        }

        // Act & Assert
        assert_eq!(window.error_rate(), Some(60.0));
    }
}
