//! Behavioral pattern detection over a trader's journal.
//!
//! Three independently tuned strategies share the statistics primitives:
//! the global scanner ranks every signal it finds across all history, the
//! today-selector picks at most one contextual nudge for the current day,
//! and the monthly generator picks one talking point for a bounded month.
//! All of them are pure, synchronous transforms that never fail on valid
//! input.

pub mod global;
pub mod monthly;
pub mod stats;
pub mod today;

pub use global::{generate_insights, GlobalInsightGenerator};
pub use monthly::{generate_month_insight, MonthlySummaryGenerator};
pub use today::{get_today_insight, TodayContextSelector};
