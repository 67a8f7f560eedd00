//! DST transition policies for zone-less slots.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Policy for local times that occur twice (fall back) or never (spring forward)
/// in the default zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DstPolicy {
    /// Ambiguous times take the first occurrence (daylight time).
    /// Gap times shift forward by the length of the gap.
    Earliest,
    /// Ambiguous times take the second occurrence (standard time).
    /// Gap times shift forward by the length of the gap.
    #[default]
    Latest,
    /// Both ambiguous and gap times are parse failures.
    Reject,
}

/// Outcome of localizing a naive time under a [`DstPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Localized {
    Instant(DateTime<Utc>),
    Ambiguous,
    Nonexistent,
}

impl DstPolicy {
    /// Resolve a wall-clock time in `tz` to an absolute instant.
    pub(crate) fn localize(self, naive: &NaiveDateTime, tz: &Tz) -> Localized {
        match tz.from_local_datetime(naive) {
            LocalResult::Single(dt) => Localized::Instant(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(first, second) => match self {
                DstPolicy::Earliest => Localized::Instant(first.with_timezone(&Utc)),
                DstPolicy::Latest => Localized::Instant(second.with_timezone(&Utc)),
                DstPolicy::Reject => Localized::Ambiguous,
            },
            LocalResult::None => match self {
                DstPolicy::Reject => Localized::Nonexistent,
                DstPolicy::Earliest | DstPolicy::Latest => {
                    Localized::Instant(shift_past_gap(naive, tz))
                }
            },
        }
    }
}

/// Apply the offset in force just before the gap, which lands the wall-clock
/// time on the far side of the transition (02:30 EST becomes 03:30 EDT).
fn shift_past_gap(naive: &NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    // Transitions are never less than a day apart in tzdata.
    let before = *naive - Duration::days(1);
    let offset = tz.offset_from_utc_datetime(&before).fix().local_minus_utc();
    Utc.from_utc_datetime(&(*naive - Duration::seconds(i64::from(offset))))
}

impl FromStr for DstPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "earliest" => Ok(DstPolicy::Earliest),
            "latest" => Ok(DstPolicy::Latest),
            "reject" => Ok(DstPolicy::Reject),
            _ => Err(ConfigError::InvalidDstPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for DstPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DstPolicy::Earliest => "earliest",
            DstPolicy::Latest => "latest",
            DstPolicy::Reject => "reject",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn unambiguous_time_ignores_policy() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 6, 1, 13, 0, 0).unwrap();
        for policy in [DstPolicy::Earliest, DstPolicy::Latest, DstPolicy::Reject] {
            assert_eq!(
                policy.localize(&naive(2026, 6, 1, 9, 0), &tz),
                Localized::Instant(expected)
            );
        }
    }

    #[test]
    fn fall_back_picks_occurrence_by_policy() {
        // 2026-11-01 01:30 happens at 05:30Z (EDT) and again at 06:30Z (EST).
        let tz: Tz = "America/New_York".parse().unwrap();
        let local = naive(2026, 11, 1, 1, 30);
        assert_eq!(
            DstPolicy::Earliest.localize(&local, &tz),
            Localized::Instant(Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap())
        );
        assert_eq!(
            DstPolicy::Latest.localize(&local, &tz),
            Localized::Instant(Utc.with_ymd_and_hms(2026, 11, 1, 6, 30, 0).unwrap())
        );
        assert_eq!(DstPolicy::Reject.localize(&local, &tz), Localized::Ambiguous);
    }

    #[test]
    fn spring_forward_gap_shifts_or_rejects() {
        // 2026-03-08 02:30 does not exist in New York.
        let tz: Tz = "America/New_York".parse().unwrap();
        let local = naive(2026, 3, 8, 2, 30);
        // 02:30 at the EST offset is 07:30Z, which reads 03:30 EDT.
        let shifted = Utc.with_ymd_and_hms(2026, 3, 8, 7, 30, 0).unwrap();
        assert_eq!(DstPolicy::Latest.localize(&local, &tz), Localized::Instant(shifted));
        assert_eq!(DstPolicy::Earliest.localize(&local, &tz), Localized::Instant(shifted));
        assert_eq!(DstPolicy::Reject.localize(&local, &tz), Localized::Nonexistent);
    }

    #[test]
    fn parses_policy_names_case_insensitively() {
        assert_eq!("Earliest".parse::<DstPolicy>().unwrap(), DstPolicy::Earliest);
        assert_eq!(" reject ".parse::<DstPolicy>().unwrap(), DstPolicy::Reject);
        assert!(matches!(
            "sometimes".parse::<DstPolicy>(),
            Err(ConfigError::InvalidDstPolicy(_))
        ));
    }
}
