//! Lenient parsing of human-entered slot strings.
//!
//! People type availability in many shapes: `2025-04-22 14:00`,
//! `04/22/2025 2:00 PM`, `Tue, April 22, 2025 14:00`, `2025-04-22T14:00:00+02:00`.
//! [`parse_slot`] tries a fixed sequence of recognizers and returns the first
//! match as a zone-aware [`Slot`]. Anything that carries no zone is localized
//! in the caller's default zone, so a parsed slot is never naive.
//!
//! # Recognizers, in order
//!
//! 1. RFC 3339 with offset or `Z`
//! 2. Date-time with an attached offset (`2025-04-22 14:00+0200`)
//! 3. Date-time followed by a zone token (`UTC`, `Europe/Berlin`, `+02:00`)
//! 4. Naive date-time or bare date, localized in the default zone
//!
//! Numeric dates are month-first (`04/05/2025` is April 5th), falling back to
//! day-first only when the first field cannot be a month (`22/04/2025`). A time
//! may come before the date (`14:00 2025-04-22`), and an hour may stand alone
//! with am/pm (`2pm`, `2 PM`). A `Z` glued to the time means UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::dst::{DstPolicy, Localized};
use crate::error::{Result, SlotError};
use crate::slot::{Slot, SlotZone};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %I:%M %p",
    "%Y-%m-%d %I:%M%p",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M%p",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %I:%M %p",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
    "%B %d %Y %H:%M",
    "%B %d %Y %I:%M %p",
    "%d %B %Y %H:%M",
    "%d %B %Y %I:%M %p",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

/// Parse a raw slot string into a canonical [`Slot`].
///
/// Zone-less input is localized in `default_zone`, resolving DST ambiguities
/// and gaps with `policy`.
///
/// # Errors
///
/// - [`SlotError::Empty`] for blank input
/// - [`SlotError::Unrecognized`] when no recognizer accepts the text, including
///   out-of-range fields such as `2025-02-30`
/// - [`SlotError::AmbiguousLocalTime`] / [`SlotError::NonexistentLocalTime`]
///   when `policy` is [`DstPolicy::Reject`]
///
/// # Examples
///
/// ```
/// use chrono_tz::Tz;
/// use slot_engine::{parse_slot, DstPolicy};
///
/// let a = parse_slot("2025-04-22 14:00", &Tz::UTC, DstPolicy::default()).unwrap();
/// let b = parse_slot("2025-04-22T16:00:00+02:00", &Tz::UTC, DstPolicy::default()).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "2025-04-22 14:00 UTC");
/// ```
pub fn parse_slot(raw: &str, default_zone: &Tz, policy: DstPolicy) -> Result<Slot> {
    let text = normalize(raw);
    if text.is_empty() {
        return Err(SlotError::Empty);
    }

    if let Some(slot) = try_rfc3339(&text).or_else(|| try_attached_offset(&text)) {
        return Ok(slot);
    }

    if let Some((local, token)) = text.rsplit_once(' ') {
        if let Some(zone) = parse_zone_token(token) {
            if let Some(naive) = parse_naive(local) {
                return localize(&naive, zone, policy, &text);
            }
        }
    }

    match parse_naive(&text) {
        Some(naive) => localize(&naive, SlotZone::Named(*default_zone), policy, &text),
        None => Err(SlotError::Unrecognized(text)),
    }
}

/// Trim, collapse whitespace runs, drop a leading weekday name, spell out
/// bare am/pm hours and turn an attached `Z` into `+00:00`.
fn normalize(raw: &str) -> String {
    let mut tokens: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if tokens.len() > 1 {
        let first = tokens[0].trim_end_matches([',', '.']);
        if first.parse::<Weekday>().is_ok() {
            tokens.remove(0);
        }
    }

    for i in 0..tokens.len() {
        let next_is_meridiem = tokens.get(i + 1).is_some_and(|t| is_meridiem(t));
        let token = &mut tokens[i];
        if is_bare_hour(token) && next_is_meridiem {
            token.push_str(":00");
        } else if let Some(spelled) =
            split_glued_meridiem(token).map(|(hour, meridiem)| format!("{}:00 {}", hour, meridiem))
        {
            *token = spelled;
        }
    }

    if let Some(last) = tokens.last_mut() {
        let glued_zulu = last.len() > 1
            && last.ends_with(['Z', 'z'])
            && last[..last.len() - 1].ends_with(|c: char| c.is_ascii_digit());
        if glued_zulu {
            last.pop();
            last.push_str("+00:00");
        }
    }
    tokens.join(" ")
}

fn is_meridiem(token: &str) -> bool {
    token.eq_ignore_ascii_case("am") || token.eq_ignore_ascii_case("pm")
}

fn is_bare_hour(token: &str) -> bool {
    (1..=2).contains(&token.len()) && token.chars().all(|c| c.is_ascii_digit())
}

/// `2pm` → `("2", "pm")`.
fn split_glued_meridiem(token: &str) -> Option<(&str, &str)> {
    let split = token.len().checked_sub(2)?;
    let (hour, meridiem) = token.split_at_checked(split)?;
    (is_bare_hour(hour) && is_meridiem(meridiem)).then_some((hour, meridiem))
}

/// chrono accepts second 60 and encodes it as a leap second.
fn is_leap_second<T: Timelike>(time: &T) -> bool {
    time.nanosecond() >= 1_000_000_000
}

fn try_rfc3339(text: &str) -> Option<Slot> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .filter(|dt| !is_leap_second(dt))
        .map(slot_from_fixed)
}

fn try_attached_offset(text: &str) -> Option<Slot> {
    OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        .filter(|dt| !is_leap_second(dt))
        .map(slot_from_fixed)
}

fn slot_from_fixed(dt: DateTime<FixedOffset>) -> Slot {
    Slot::new(dt.with_timezone(&Utc), zone_for_offset(*dt.offset()))
}

/// A zero offset is reported as `UTC` rather than `+00:00`.
fn zone_for_offset(offset: FixedOffset) -> SlotZone {
    if offset.local_minus_utc() == 0 {
        SlotZone::Named(Tz::UTC)
    } else {
        SlotZone::Fixed(offset)
    }
}

/// Recognize a trailing zone token: `Z`, `UTC`, `GMT`, an IANA name, or a
/// numeric offset.
fn parse_zone_token(token: &str) -> Option<SlotZone> {
    if ["z", "utc", "gmt"]
        .iter()
        .any(|name| token.eq_ignore_ascii_case(name))
    {
        return Some(SlotZone::Named(Tz::UTC));
    }
    if let Ok(tz) = Tz::from_str_insensitive(token) {
        return Some(SlotZone::Named(tz));
    }
    parse_offset(token).map(zone_for_offset)
}

/// `+02:00`, `+0200`, `+02`, `-5`.
fn parse_offset(token: &str) -> Option<FixedOffset> {
    let (sign, rest) = match *token.as_bytes().first()? {
        b'+' => (1, &token[1..]),
        b'-' => (-1, &token[1..]),
        _ => return None,
    };
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit() || c == ':') {
        return None;
    }

    let (hours, minutes): (i32, i32) = match rest.split_once(':') {
        Some((h, m)) if (1..=2).contains(&h.len()) && m.len() == 2 => {
            (h.parse().ok()?, m.parse().ok()?)
        }
        Some(_) => return None,
        None => match rest.len() {
            1 | 2 => (rest.parse().ok()?, 0),
            4 => (rest[..2].parse().ok()?, rest[2..].parse().ok()?),
            _ => return None,
        },
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    parse_date_first(text)
        .or_else(|| time_first_to_date_first(text).and_then(|t| parse_date_first(&t)))
        .filter(|naive| !is_leap_second(naive))
}

/// `14:00 2025-04-22` → `2025-04-22 14:00`, `2:00 pm April 22, 2025` →
/// `April 22, 2025 2:00 pm`.
fn time_first_to_date_first(text: &str) -> Option<String> {
    let tokens: Vec<&str> = text.split(' ').collect();
    if tokens.len() < 2 || !tokens[0].contains(':') {
        return None;
    }
    let time_len = if is_meridiem(tokens[1]) { 2 } else { 1 };
    if tokens.len() <= time_len {
        return None;
    }
    let (time, date) = tokens.split_at(time_len);
    Some(format!("{} {}", date.join(" "), time.join(" ")))
}

fn parse_date_first(text: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn localize(naive: &NaiveDateTime, zone: SlotZone, policy: DstPolicy, text: &str) -> Result<Slot> {
    match zone {
        SlotZone::Named(tz) => match policy.localize(naive, &tz) {
            Localized::Instant(instant) => Ok(Slot::new(instant, zone)),
            Localized::Ambiguous => Err(SlotError::AmbiguousLocalTime(text.to_string())),
            Localized::Nonexistent => Err(SlotError::NonexistentLocalTime(text.to_string())),
        },
        SlotZone::Fixed(offset) => offset
            .from_local_datetime(naive)
            .single()
            .map(|dt| Slot::new(dt.with_timezone(&Utc), zone))
            .ok_or_else(|| SlotError::Unrecognized(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_weekday() {
        assert_eq!(normalize("  2025-04-22    14:00 \t"), "2025-04-22 14:00");
        assert_eq!(normalize("Tue, April 22, 2025 14:00"), "April 22, 2025 14:00");
        assert_eq!(normalize("tuesday 2025-04-22 14:00"), "2025-04-22 14:00");
        // A lone weekday is left for the recognizers to reject.
        assert_eq!(normalize("Monday"), "Monday");
    }

    #[test]
    fn normalize_spells_out_bare_hours_and_zulu() {
        assert_eq!(normalize("2025-04-22 2pm"), "2025-04-22 2:00 pm");
        assert_eq!(normalize("2025-04-22 11 AM"), "2025-04-22 11:00 AM");
        assert_eq!(normalize("2025-04-22T14:00Z"), "2025-04-22T14:00+00:00");
        assert_eq!(normalize("2025-04-22 14:00z"), "2025-04-22 14:00+00:00");
        // Standalone tokens are left alone.
        assert_eq!(normalize("2025-04-22 14:00 Z"), "2025-04-22 14:00 Z");
        assert_eq!(normalize("22 April 2025 14:00"), "22 April 2025 14:00");
    }

    #[test]
    fn time_first_is_reordered() {
        assert_eq!(
            time_first_to_date_first("14:00 2025-04-22").as_deref(),
            Some("2025-04-22 14:00")
        );
        assert_eq!(
            time_first_to_date_first("2:00 pm April 22, 2025").as_deref(),
            Some("April 22, 2025 2:00 pm")
        );
        assert_eq!(time_first_to_date_first("2025-04-22 14:00"), None);
        assert_eq!(time_first_to_date_first("2:00 pm"), None);
    }

    #[test]
    fn offset_tokens() {
        assert_eq!(parse_offset("+02:00"), FixedOffset::east_opt(7200));
        assert_eq!(parse_offset("+0530"), FixedOffset::east_opt(5 * 3600 + 1800));
        assert_eq!(parse_offset("-05"), FixedOffset::west_opt(5 * 3600));
        assert_eq!(parse_offset("-5"), FixedOffset::west_opt(5 * 3600));
        assert_eq!(parse_offset("+2:00"), FixedOffset::east_opt(7200));
        assert_eq!(parse_offset("+25:00"), None);
        assert_eq!(parse_offset("+02:7"), None);
        assert_eq!(parse_offset("+020"), None);
        assert_eq!(parse_offset("02:00"), None);
        assert_eq!(parse_offset("+"), None);
    }

    #[test]
    fn zone_tokens() {
        assert_eq!(parse_zone_token("utc"), Some(SlotZone::Named(Tz::UTC)));
        assert_eq!(parse_zone_token("Z"), Some(SlotZone::Named(Tz::UTC)));
        assert_eq!(parse_zone_token("+00:00"), Some(SlotZone::Named(Tz::UTC)));
        assert_eq!(
            parse_zone_token("Europe/Berlin"),
            Some(SlotZone::Named(chrono_tz::Europe::Berlin))
        );
        assert_eq!(
            parse_zone_token("europe/berlin"),
            Some(SlotZone::Named(chrono_tz::Europe::Berlin))
        );
        assert_eq!(parse_zone_token("PM"), None);
        assert_eq!(parse_zone_token("14:00"), None);
    }

    #[test]
    fn naive_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 4, 22)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        for text in [
            "2025-04-22 14:00",
            "2025-04-22T14:00:00",
            "2025/04/22 14:00",
            "04/22/2025 14:00",
            "04/22/2025 2:00 PM",
            "2025-04-22 02:00 pm",
            "April 22, 2025 14:00",
            "Apr 22 2025 2:00 PM",
            "22 April 2025 14:00",
            "22/04/2025 14:00",
            "14:00 2025-04-22",
            "2:00 PM 04/22/2025",
        ] {
            assert_eq!(parse_naive(text), Some(expected), "{text}");
        }
    }

    #[test]
    fn bare_date_is_midnight() {
        let midnight = NaiveDate::from_ymd_opt(2025, 4, 22)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_naive("2025-04-22"), Some(midnight));
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        assert_eq!(parse_naive("2025-02-30 10:00"), None);
        assert_eq!(parse_naive("2025-04-22 25:00"), None);
        assert_eq!(parse_naive("2025-13-01 10:00"), None);
        assert_eq!(parse_naive("2025-04-22 23:59:60"), None);
    }

    #[test]
    fn ambiguous_numeric_date_stays_month_first() {
        let april_fifth = NaiveDate::from_ymd_opt(2025, 4, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(parse_naive("04/05/2025 09:00"), Some(april_fifth));
    }
}
