//! User-facing notices — the typed replacement for a toast side channel.
//!
//! Business logic returns typed outcomes; the presentation layer converts
//! them to notices and renders them at the top of the screen for the
//! severity's duration.

use std::time::Duration;

/// Notice severity. Durations match the product's toast timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Success,
  Error,
  Warning,
}

impl Severity {
  /// How long the notice stays on screen.
  pub fn duration(self) -> Duration {
    match self {
      Self::Success => Duration::from_secs(2),
      Self::Error | Self::Warning => Duration::from_secs(3),
    }
  }
}

/// A short human-readable message with a severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub severity: Severity,
  pub message:  String,
}

impl Notice {
  pub fn success(message: impl Into<String>) -> Self {
    Self { severity: Severity::Success, message: message.into() }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self { severity: Severity::Error, message: message.into() }
  }

  pub fn warning(message: impl Into<String>) -> Self {
    Self { severity: Severity::Warning, message: message.into() }
  }
}
