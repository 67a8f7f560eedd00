//! # slot-engine
//!
//! Timezone-aware matching of free-text availability slots.
//!
//! Two parties (a candidate and an interviewer) each list the instants they
//! are free, one per line, in whatever format they like. The engine parses
//! every line into a canonical zone-aware [`Slot`], drops what it cannot
//! read, and returns the instants both parties share, oldest first. A
//! [`Notifier`] then confirms the chosen slot.
//!
//! ## Quick start
//!
//! ```rust
//! use slot_engine::SlotMatcher;
//!
//! let matcher = SlotMatcher::default();
//! let common = matcher.common_slots(
//!     &["2025-04-22 10:00", "2025-04-22 14:00", "2025-04-23 11:00"],
//!     &["2025-04-22 14:00", "2025-04-23 09:00", "2025-04-23 11:00"],
//! );
//! let shown: Vec<String> = common.iter().map(|s| s.to_string()).collect();
//! assert_eq!(shown, ["2025-04-22 14:00 UTC", "2025-04-23 11:00 UTC"]);
//! ```
//!
//! ## Modules
//!
//! - [`parser`] — raw string → [`Slot`]
//! - [`matcher`] — two raw lists → sorted common slots
//! - [`slot`] — the canonical instant type
//! - [`dst`] — DST ambiguity and gap policies
//! - [`notifier`] — confirmation delivery
//! - [`config`] — start-up configuration
//! - [`error`] — error types

pub mod config;
pub mod dst;
pub mod error;
pub mod matcher;
pub mod notifier;
pub mod parser;
pub mod slot;

pub use config::SchedulerConfig;
pub use dst::DstPolicy;
pub use error::{ConfigError, SlotError};
pub use matcher::{split_lines, MatchOutcome, Side, SlotMatcher, SlotSet};
pub use notifier::{Confirmation, LogNotifier, Notifier, RecordingNotifier};
pub use parser::parse_slot;
pub use slot::{Slot, SlotZone};
