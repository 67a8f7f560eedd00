//! Intersect two parties' availability.
//!
//! Each side's raw lines are parsed with the same default zone and DST policy,
//! failures are dropped, duplicates collapse into a [`SlotSet`], and the
//! intersection comes back sorted by absolute instant.
//!
//! [`SlotMatcher::common_slots`] returns only the slots. When the caller needs
//! to tell "nothing entered", "nothing parseable" and "no overlap" apart, use
//! [`SlotMatcher::match_slots`], which returns a [`MatchOutcome`].

use std::collections::BTreeSet;
use std::fmt;

use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::dst::DstPolicy;
use crate::parser;
use crate::slot::Slot;

/// Which party a list of slots belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Candidate,
    Interviewer,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Candidate => f.write_str("candidate"),
            Side::Interviewer => f.write_str("interviewer"),
        }
    }
}

/// The unique, parseable slots from one side's input.
#[derive(Debug, Clone, Default)]
pub struct SlotSet {
    slots: BTreeSet<Slot>,
    blank_lines: usize,
    rejected: Vec<String>,
}

impl SlotSet {
    /// Slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, slot: &Slot) -> bool {
        self.slots.contains(slot)
    }

    /// Lines that were empty or whitespace-only.
    pub fn blank_lines(&self) -> usize {
        self.blank_lines
    }

    /// Non-blank lines that did not parse, trimmed, in input order.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// True when the input had no non-blank lines at all.
    pub fn had_no_input(&self) -> bool {
        self.slots.is_empty() && self.rejected.is_empty()
    }

    /// Slots present in both sets, ascending. Each slot keeps the zone it was
    /// written in on `self`'s side.
    pub fn intersection(&self, other: &SlotSet) -> Vec<Slot> {
        self.slots.intersection(&other.slots).copied().collect()
    }
}

/// What matching two sides produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// The side had no non-blank lines.
    NoInput(Side),
    /// The side had lines, but none parsed.
    NoValidSlots(Side),
    /// Both sides had valid slots and none coincide.
    NoOverlap,
    /// Common slots, ascending, never empty.
    Matched(Vec<Slot>),
}

impl MatchOutcome {
    pub fn slots(&self) -> &[Slot] {
        match self {
            MatchOutcome::Matched(slots) => slots.as_slice(),
            _ => &[],
        }
    }

    pub fn into_slots(self) -> Vec<Slot> {
        match self {
            MatchOutcome::Matched(slots) => slots,
            _ => Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }
}

/// Parses and intersects slot lists under one zone assumption.
///
/// Immutable once built; share it freely across requests.
#[derive(Debug, Clone)]
pub struct SlotMatcher {
    default_zone: Tz,
    dst_policy: DstPolicy,
}

impl Default for SlotMatcher {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}

impl SlotMatcher {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            default_zone: config.default_zone,
            dst_policy: config.dst_policy,
        }
    }

    /// A matcher for `zone` with the default DST policy.
    pub fn in_zone(zone: Tz) -> Self {
        Self {
            default_zone: zone,
            dst_policy: DstPolicy::default(),
        }
    }

    pub fn default_zone(&self) -> Tz {
        self.default_zone
    }

    pub fn dst_policy(&self) -> DstPolicy {
        self.dst_policy
    }

    /// Resolve a single slot string, e.g. one previously shown to the user.
    pub fn parse_slot(&self, raw: &str) -> Option<Slot> {
        parser::parse_slot(raw, &self.default_zone, self.dst_policy).ok()
    }

    /// Parse one side's lines into a set, dropping blanks and failures.
    pub fn slot_set<I, S>(&self, lines: I) -> SlotSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = SlotSet::default();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                set.blank_lines += 1;
                continue;
            }
            match parser::parse_slot(line, &self.default_zone, self.dst_policy) {
                Ok(slot) => {
                    set.slots.insert(slot);
                }
                Err(err) => {
                    debug!(line, error = %err, "dropping unparseable slot");
                    set.rejected.push(line.to_string());
                }
            }
        }
        set
    }

    /// Slots present in both lists, ascending, without duplicates.
    ///
    /// Unparseable and blank lines are ignored. An empty result covers no
    /// input, no valid input and no overlap alike; see [`Self::match_slots`].
    pub fn common_slots<A, B>(&self, candidate: &[A], interviewer: &[B]) -> Vec<Slot>
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        self.match_slots(candidate, interviewer).into_slots()
    }

    /// Like [`Self::common_slots`], but says why nothing matched.
    ///
    /// The candidate side is checked before the interviewer side.
    pub fn match_slots<A, B>(&self, candidate: &[A], interviewer: &[B]) -> MatchOutcome
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        self.match_sets(&self.slot_set(candidate), &self.slot_set(interviewer))
    }

    /// Match two already-built sets. Lets callers inspect each side's
    /// rejected lines without parsing twice.
    pub fn match_sets(&self, candidate: &SlotSet, interviewer: &SlotSet) -> MatchOutcome {
        let outcome = classify(candidate, interviewer);
        debug!(
            candidate = candidate.len(),
            interviewer = interviewer.len(),
            rejected = candidate.rejected().len() + interviewer.rejected().len(),
            common = outcome.slots().len(),
            "matched slot lists"
        );
        outcome
    }
}

fn classify(candidate: &SlotSet, interviewer: &SlotSet) -> MatchOutcome {
    for (side, set) in [(Side::Candidate, candidate), (Side::Interviewer, interviewer)] {
        if set.had_no_input() {
            return MatchOutcome::NoInput(side);
        }
        if set.is_empty() {
            return MatchOutcome::NoValidSlots(side);
        }
    }

    let common = candidate.intersection(interviewer);
    if common.is_empty() {
        MatchOutcome::NoOverlap
    } else {
        MatchOutcome::Matched(common)
    }
}

/// Split a multi-line block (one slot per line) into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_set_counts_blanks_and_rejects() {
        let matcher = SlotMatcher::default();
        let set = matcher.slot_set(["2025-04-22 10:00", "", "   ", "nope", "2025-04-22 10:00"]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.blank_lines(), 2);
        assert_eq!(set.rejected(), ["nope".to_string()]);
        assert!(!set.had_no_input());
    }

    #[test]
    fn classify_checks_candidate_first() {
        let matcher = SlotMatcher::default();
        let empty = matcher.slot_set(Vec::<String>::new());
        let invalid = matcher.slot_set(["garbage"]);
        assert_eq!(classify(&empty, &invalid), MatchOutcome::NoInput(Side::Candidate));
        assert_eq!(
            classify(&invalid, &empty),
            MatchOutcome::NoValidSlots(Side::Candidate)
        );
    }

    #[test]
    fn split_lines_drops_blank_lines() {
        let text = "2025-04-22 10:00\r\n\n   \n  2025-04-22 14:00  \n";
        assert_eq!(split_lines(text), vec!["2025-04-22 10:00", "2025-04-22 14:00"]);
    }
}
