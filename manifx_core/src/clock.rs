//! Time sources for export timestamps.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Local, TimeZone, Utc};

/// A source of the current time as milliseconds since the Unix epoch.
///
pub trait Clock: Send + Sync {
  fn now_millis(&self) -> i64;
}

/// The system's wall clock.
///
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now_millis(&self) -> i64 {
    Utc::now().timestamp_millis()
  }
}

/// A clock that only moves when told to.
///
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
  pub fn new(millis: i64) -> Self {
    Self(AtomicI64::new(millis))
  }

  pub fn set(&self, millis: i64) {
    self.0.store(millis, Ordering::SeqCst);
  }

  pub fn advance(&self, millis: i64) {
    self.0.fetch_add(millis, Ordering::SeqCst);
  }
}

impl Clock for ManualClock {
  fn now_millis(&self) -> i64 {
    self.0.load(Ordering::SeqCst)
  }
}

/// Formats an export timestamp as `YYYY.MM.DD` in the local time zone.
/// Timestamps outside chrono's representable range format as an empty string.
///
pub fn format_export_date(millis: i64) -> String {
  match Local.timestamp_millis_opt(millis).single() {
    Some(time) => time.format("%Y.%m.%d").to_string(),
    None => String::new(),
  }
}
