use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A calendar or clock value.
///
/// Under lenient-date comparison only the presence of a temporal value
/// matters; otherwise two temporal values are equal when they are of the
/// same [`TemporalKind`] and denote the same point.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Instant(DateTime<Utc>),
    Offset(DateTime<FixedOffset>),
}

/// The family a [`Temporal`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemporalKind {
    Date,
    Time,
    DateTime,
    Instant,
    Offset,
}

impl Temporal {
    pub fn kind(&self) -> TemporalKind {
        match self {
            Self::Date(_) => TemporalKind::Date,
            Self::Time(_) => TemporalKind::Time,
            Self::DateTime(_) => TemporalKind::DateTime,
            Self::Instant(_) => TemporalKind::Instant,
            Self::Offset(_) => TemporalKind::Offset,
        }
    }

    /// The current instant.
    pub fn now() -> Self {
        Self::Instant(Utc::now())
    }

    /// Parse an RFC 3339 timestamp, keeping its offset.
    pub fn parse_rfc3339(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s).ok().map(Self::Offset)
    }
}

impl fmt::Debug for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind(), self)
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::Instant(i) => write!(f, "{}", i.to_rfc3339()),
            Self::Offset(o) => write!(f, "{}", o.to_rfc3339()),
        }
    }
}

impl From<NaiveDate> for Temporal {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for Temporal {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

impl From<NaiveDateTime> for Temporal {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for Temporal {
    fn from(i: DateTime<Utc>) -> Self {
        Self::Instant(i)
    }
}

impl From<DateTime<FixedOffset>> for Temporal {
    fn from(o: DateTime<FixedOffset>) -> Self {
        Self::Offset(o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Temporal::from(date).kind(), TemporalKind::Date);
        assert_eq!(Temporal::now().kind(), TemporalKind::Instant);
    }

    #[test]
    fn parse_rfc3339_keeps_offset() {
        let t = Temporal::parse_rfc3339("2024-05-01T10:00:00+02:00").unwrap();
        assert_eq!(t.kind(), TemporalKind::Offset);
        assert_eq!(format!("{t}"), "2024-05-01T10:00:00+02:00");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Temporal::parse_rfc3339("yesterday").is_none());
    }

    #[test]
    fn same_date_is_equal() {
        let a = Temporal::from(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        let b = Temporal::from(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn serde_roundtrip() {
        let t = Temporal::from(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap());
        let json = serde_json::to_string(&t).unwrap();
        let parsed: Temporal = serde_json::from_str(&json).unwrap();
        assert_eq!(t, parsed);
    }
}
