//! Error types for slot-engine operations.

use thiserror::Error;

/// Why a single raw slot line could not be turned into a [`Slot`](crate::Slot).
///
/// The matcher absorbs these per line; they only reach callers through
/// [`parse_slot`](crate::parser::parse_slot).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Empty time slot")]
    Empty,

    #[error("Unrecognized time slot: {0}")]
    Unrecognized(String),

    /// The local time falls in a DST gap and the policy rejects gaps.
    #[error("Nonexistent local time: {0}")]
    NonexistentLocalTime(String),

    #[error("Ambiguous local time: {0}")]
    AmbiguousLocalTime(String),
}

/// Errors raised while building a [`SchedulerConfig`](crate::SchedulerConfig).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid DST policy: {0} (expected earliest, latest or reject)")]
    InvalidDstPolicy(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
