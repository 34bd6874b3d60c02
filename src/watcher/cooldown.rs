//! Per-kind alert cooldown.

use crate::alert::AlertKind;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Suppresses repeated alerts of the same kind within a fixed interval.
///
/// The check and the timestamp update happen in one call; with the single
/// ingestion path holding `&mut self` there is no window in which two
/// callers could both pass the gate.
#[derive(Debug)]
pub struct CooldownGate {
    interval: Duration,
    last_fired: HashMap<AlertKind, DateTime<Utc>>,
}

impl CooldownGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: HashMap::new(),
        }
    }

    /// Gate-then-set: returns `true` and records `now` when `kind` has not
    /// fired within the cooldown interval, `false` otherwise.
    pub fn try_fire(&mut self, kind: AlertKind, now: DateTime<Utc>) -> bool {
        if let Some(last) = self.last_fired.get(&kind) {
            if now - *last < self.interval {
                return false;
            }
        }
        self.last_fired.insert(kind, now);
        true
    }
}
