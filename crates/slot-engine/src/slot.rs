//! The canonical, timezone-aware slot instant.
//!
//! A [`Slot`] remembers the zone it was written in so it can be shown back to
//! the user in that zone, but equality, hashing and ordering look only at the
//! absolute instant. `2025-04-22 16:00 +02:00` and `2025-04-22 14:00 UTC` are
//! the same slot.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset, SecondsFormat, Timelike, Utc};
use chrono_tz::Tz;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// The zone a slot is expressed in. Never absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotZone {
    /// An IANA timezone (`UTC`, `Europe/Berlin`, ...).
    Named(Tz),
    /// A bare UTC offset taken from the input (`+02:00`).
    Fixed(FixedOffset),
}

impl fmt::Display for SlotZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotZone::Named(tz) => f.write_str(tz.name()),
            SlotZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// A single availability instant.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    instant: DateTime<Utc>,
    zone: SlotZone,
}

impl Slot {
    pub fn new(instant: DateTime<Utc>, zone: SlotZone) -> Self {
        Self { instant, zone }
    }

    /// The absolute instant.
    pub fn utc(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn zone(&self) -> SlotZone {
        self.zone
    }

    /// The instant as wall-clock time in the slot's own zone.
    pub fn local(&self) -> DateTime<FixedOffset> {
        match self.zone {
            SlotZone::Named(tz) => self.instant.with_timezone(&tz).fixed_offset(),
            SlotZone::Fixed(offset) => self.instant.with_timezone(&offset),
        }
    }

    /// The same instant expressed in another zone.
    pub fn with_zone(&self, zone: SlotZone) -> Self {
        Self {
            instant: self.instant,
            zone,
        }
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for Slot {}

impl Hash for Slot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instant.hash(state);
    }
}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

/// `YYYY-MM-DD HH:MM <zone>`, with seconds only when they are non-zero.
///
/// The output is accepted by [`parse_slot`](crate::parser::parse_slot).
impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = self.local();
        let pattern = if local.second() == 0 && local.nanosecond() == 0 {
            "%Y-%m-%d %H:%M"
        } else {
            "%Y-%m-%d %H:%M:%S%.f"
        };
        write!(f, "{} {}", local.format(pattern), self.zone)
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Slot", 3)?;
        state.serialize_field(
            "utc",
            &self.instant.to_rfc3339_opts(SecondsFormat::Secs, true),
        )?;
        state.serialize_field(
            "local",
            &self.local().to_rfc3339_opts(SecondsFormat::Secs, false),
        )?;
        state.serialize_field("zone", &self.zone.to_string())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 22, h, m, 0).unwrap()
    }

    #[test]
    fn equality_ignores_zone() {
        let berlin: Tz = "Europe/Berlin".parse().unwrap();
        let a = Slot::new(utc(14, 0), SlotZone::Named(Tz::UTC));
        let b = Slot::new(utc(14, 0), SlotZone::Named(berlin));
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn display_uses_own_zone() {
        let berlin: Tz = "Europe/Berlin".parse().unwrap();
        let slot = Slot::new(utc(14, 0), SlotZone::Named(berlin));
        assert_eq!(slot.to_string(), "2025-04-22 16:00 Europe/Berlin");

        let fixed = slot.with_zone(SlotZone::Fixed(FixedOffset::west_opt(5 * 3600).unwrap()));
        assert_eq!(fixed.to_string(), "2025-04-22 09:00 -05:00");
    }

    #[test]
    fn display_keeps_nonzero_seconds() {
        let instant = Utc.with_ymd_and_hms(2025, 4, 22, 14, 0, 30).unwrap();
        let slot = Slot::new(instant, SlotZone::Named(Tz::UTC));
        assert_eq!(slot.to_string(), "2025-04-22 14:00:30 UTC");
    }

    #[test]
    fn serializes_utc_local_and_zone() {
        let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
        let slot = Slot::new(utc(1, 0), SlotZone::Named(tokyo));
        let json = serde_json::to_value(slot).unwrap();
        assert_eq!(json["utc"], "2025-04-22T01:00:00Z");
        assert_eq!(json["local"], "2025-04-22T10:00:00+09:00");
        assert_eq!(json["zone"], "Asia/Tokyo");
    }
}
