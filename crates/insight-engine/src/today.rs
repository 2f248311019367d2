use chrono::{Datelike, NaiveDate, Utc};
use journal_core::{
    weekday_name, Insight, InsightStrategy, InsightTag, JournalEntry, Outcome, Severity,
};
use tracing::debug;

use crate::stats;

const MIN_SAMPLE: usize = 5;
const MIN_DAY_GROUP: usize = 3;
const WEAK_DAY_RATE: f64 = 0.35;
const STRONG_DAY_RATE: f64 = 0.60;
const DAY_GAP: f64 = 0.15;

const LOSS_STREAK_MIN: usize = 3;
/// Deliberately stricter than the global scanner's win-streak bound.
const WIN_STREAK_MIN: usize = 5;

/// Pick at most one insight relevant to `today`: the weekday effect wins
/// over an active streak, and a quiet history returns nothing.
///
/// The caller supplies all history up to and including today, newest-first.
pub fn get_today_insight(entries: &[JournalEntry], today: NaiveDate) -> Option<Insight> {
    if entries.len() < MIN_SAMPLE {
        return None;
    }

    let all: Vec<&JournalEntry> = entries.iter().collect();
    let overall = stats::win_rate(&all);
    let weekday = today.weekday();
    let name = weekday_name(weekday);

    debug!(entries = entries.len(), weekday = name, "selecting today context");

    let day_entries: Vec<&JournalEntry> = entries
        .iter()
        .filter(|e| e.trade_date.weekday() == weekday)
        .collect();

    if day_entries.len() >= MIN_DAY_GROUP {
        let rate = stats::win_rate(&day_entries);

        if rate < WEAK_DAY_RATE && overall - rate > DAY_GAP {
            return Some(Insight {
                id: "today-weak-day".to_string(),
                severity: Severity::Warning,
                tag: InsightTag::Time,
                title: format!("Careful: it's {}", name),
                message: format!(
                    "Historically you win only {:.0}% of trades on {}s, against {:.0}% \
                     overall. Smaller size or higher selectivity today.",
                    rate * 100.0,
                    name,
                    overall * 100.0
                ),
                stat: Some(format!("{:.0}% win rate on {}s", rate * 100.0, name)),
                icon: "calendar-x".to_string(),
            });
        }

        if rate > STRONG_DAY_RATE && rate - overall > DAY_GAP {
            return Some(Insight {
                id: "today-best-day".to_string(),
                severity: Severity::Success,
                tag: InsightTag::Time,
                title: format!("{} suits you", name),
                message: format!(
                    "You win {:.0}% of trades on {}s, your strongest day. Conditions favor \
                     your setups today.",
                    rate * 100.0,
                    name
                ),
                stat: Some(format!("{:.0}% win rate on {}s", rate * 100.0, name)),
                icon: "calendar-check".to_string(),
            });
        }
    }

    match stats::current_streak(entries) {
        Some((Outcome::Loss, length)) if length >= LOSS_STREAK_MIN => Some(Insight {
            id: "today-loss-streak".to_string(),
            severity: Severity::Warning,
            tag: InsightTag::Streak,
            title: format!("{} straight losses", length),
            message: format!(
                "You come into today off {} consecutive losses. Consider paper trading or a \
                 smaller first position.",
                length
            ),
            stat: Some(format!("{} consecutive losses", length)),
            icon: "pause-circle".to_string(),
        }),
        Some((Outcome::Win, length)) if length >= WIN_STREAK_MIN => Some(Insight {
            id: "today-win-streak".to_string(),
            severity: Severity::Info,
            tag: InsightTag::Streak,
            title: format!("{} straight wins", length),
            message: format!(
                "You are {} wins deep. Nothing to fix, just don't let the streak talk you \
                 into bigger risk.",
                length
            ),
            stat: Some(format!("{} consecutive wins", length)),
            icon: "flame".to_string(),
        }),
        _ => None,
    }
}

/// Strategy wrapper carrying the reference date, so callers can pin it in
/// tests and schedulers.
pub struct TodayContextSelector {
    pub today: NaiveDate,
}

impl TodayContextSelector {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn for_today() -> Self {
        Self {
            today: Utc::now().date_naive(),
        }
    }
}

impl InsightStrategy for TodayContextSelector {
    type Report = Option<Insight>;

    fn evaluate(&self, entries: &[JournalEntry]) -> Option<Insight> {
        get_today_insight(entries, self.today)
    }
}
