//! Microsecond-precision transaction timestamp
//!
//! Every time value in a contract record comes from the host's transaction
//! clock, never from the local wall clock. All replicas executing the same
//! transaction observe the same `Timestamp`.
//!
//! ## Precision
//!
//! Timestamps are stored as microseconds since Unix epoch (1970-01-01 00:00:00 UTC).
//!
//! ## Wire format
//!
//! Records persist timestamps as fixed-width RFC 3339 UTC strings with six
//! fractional digits:
//!
//! ```text
//! 2026-10-18T09:30:00.000000Z
//! ```
//!
//! Because the width is fixed, lexical order of the strings equals temporal
//! order. Store selectors such as `finished_time <= now` rely on this.
//!
//! The width only holds through year 9999, so every constructor and every
//! addition saturates at [`Timestamp::MAX`] (`9999-12-31T23:59:59.999999Z`).
//!
//! ```
//! use covenant_core::Timestamp;
//!
//! let ts = Timestamp::from_secs(1_700_000_000);
//! assert_eq!(ts.to_rfc3339(), "2023-11-14T22:13:20.000000Z");
//! assert_eq!(Timestamp::parse_rfc3339(&ts.to_rfc3339()).unwrap(), ts);
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

/// Seconds in one calendar day (UTC has no DST)
const SECS_PER_DAY: u64 = 86_400;

/// Microsecond-precision timestamp
///
/// ## Invariants
///
/// - Timestamps are always non-negative (u64)
/// - Timestamps never exceed [`Timestamp::MAX`]
/// - Timestamps are always in microseconds
/// - Timestamps are comparable and orderable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Latest instant with a four-digit year (9999-12-31T23:59:59.999999Z)
    pub const MAX: Timestamp = Timestamp(253_402_300_799_999_999);

    const fn clamped(micros: u64) -> Self {
        if micros > Self::MAX.0 {
            Self::MAX
        } else {
            Timestamp(micros)
        }
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a timestamp from microseconds since epoch, saturating at `MAX`
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Self::clamped(micros)
    }

    /// Create a timestamp from milliseconds since epoch
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self::clamped(millis.saturating_mul(1_000))
    }

    /// Create a timestamp from seconds since epoch
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Self::clamped(secs.saturating_mul(1_000_000))
    }

    /// Parse an RFC 3339 string (any offset, converted to UTC)
    ///
    /// Returns `None` for malformed input or instants before the epoch.
    /// Chrono only parses four-digit years, so the result never exceeds `MAX`.
    pub fn parse_rfc3339(s: &str) -> Option<Self> {
        let parsed = DateTime::parse_from_rfc3339(s).ok()?;
        let micros = parsed.with_timezone(&Utc).timestamp_micros();
        u64::try_from(micros).ok().map(Timestamp)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get microseconds since Unix epoch
    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Get seconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1_000_000
    }

    /// Format as fixed-width RFC 3339 UTC with microsecond precision
    pub fn to_rfc3339(&self) -> String {
        let secs = (self.0 / 1_000_000) as i64;
        let nanos = ((self.0 % 1_000_000) * 1_000) as u32;
        DateTime::<Utc>::from_timestamp(secs, nanos)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    // =========================================================================
    // Duration Operations
    // =========================================================================

    /// Add a duration to this timestamp
    ///
    /// Saturates at [`Timestamp::MAX`].
    pub fn saturating_add(&self, duration: Duration) -> Self {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        Self::clamped(self.0.saturating_add(micros))
    }

    /// Add whole seconds
    pub fn add_secs(&self, secs: u64) -> Self {
        self.saturating_add(Duration::from_secs(secs))
    }

    /// Add whole calendar days
    pub fn add_days(&self, days: u64) -> Self {
        self.add_secs(days.saturating_mul(SECS_PER_DAY))
    }

    /// Compute duration since an earlier timestamp
    ///
    /// Returns `None` if `earlier` is actually later than `self`.
    pub fn duration_since(&self, earlier: Timestamp) -> Option<Duration> {
        self.0.checked_sub(earlier.0).map(Duration::from_micros)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse_rfc3339(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", s)))
    }
}

impl From<u64> for Timestamp {
    /// Create from raw microseconds
    fn from(micros: u64) -> Self {
        Timestamp::from_micros(micros)
    }
}

impl From<Timestamp> for u64 {
    /// Extract raw microseconds
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

// ============================================================================
// Tests
// ============================================================================
