use std::collections::HashMap;

use chrono::{Datelike, Weekday};
use journal_core::{
    weekday_name, Emotion, Insight, InsightStrategy, InsightTag, JournalEntry, Outcome, Severity,
};
use tracing::debug;

use crate::stats;

const MIN_GROUP: usize = 3;
const EMOTION_GAP: f64 = 0.10;
const DAY_GAP: f64 = 0.10;
const STREAK_MIN: usize = 3;
const CONCENTRATION: f64 = 0.50;
/// Decided trades required before the fallback win-rate line is worth
/// showing.
const FALLBACK_MIN_DECIDED: usize = 2;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Pick the single best talking point for one calendar month of entries.
///
/// The caller pre-filters to the target month. Unlike the global scanner
/// this is a fixed priority cascade, returning on the first match:
/// emotion pattern, then longest streak, then best weekday, then
/// instrument concentration, then a plain win-rate fallback.
pub fn generate_month_insight(entries: &[JournalEntry]) -> Option<Insight> {
    if entries.is_empty() {
        return Some(Insight {
            id: "month-empty".to_string(),
            severity: Severity::Info,
            tag: InsightTag::Pattern,
            title: "A quiet month".to_string(),
            message: "No trades were logged this month.".to_string(),
            stat: None,
            icon: "calendar".to_string(),
        });
    }

    if entries.len() < MIN_GROUP {
        let n = entries.len();
        return Some(Insight {
            id: "month-small-sample".to_string(),
            severity: Severity::Info,
            tag: InsightTag::Pattern,
            title: "Not much to go on yet".to_string(),
            message: format!(
                "Only {} trade{} this month, too few to read a pattern from.",
                n,
                if n == 1 { "" } else { "s" }
            ),
            stat: Some(format!("{} trades", n)),
            icon: "calendar".to_string(),
        });
    }

    let all: Vec<&JournalEntry> = entries.iter().collect();
    let overall = stats::win_rate(&all);

    debug!(entries = entries.len(), month_win_rate = overall, "summarizing month");

    // 1. Negative emotion dragging the month down.
    for emotion in Emotion::NEGATIVE {
        let group: Vec<&JournalEntry> = entries
            .iter()
            .filter(|e| e.emotion_before == emotion)
            .collect();
        if group.len() < MIN_GROUP {
            continue;
        }

        let rate = stats::win_rate(&group);
        if overall - rate > EMOTION_GAP {
            return Some(Insight {
                id: format!("month-emotion-{}", emotion.as_str()),
                severity: Severity::Warning,
                tag: InsightTag::Emotion,
                title: format!("{} entries dragged the month", emotion.label()),
                message: format!(
                    "Trades entered while {} won only {:.0}% this month, against {:.0}% \
                     overall.",
                    emotion.as_str(),
                    rate * 100.0,
                    overall * 100.0
                ),
                stat: Some(format!("{:.0}% win rate", rate * 100.0)),
                icon: "alert-triangle".to_string(),
            });
        }
    }

    // 2. Longest same-outcome run, in date order.
    if let Some(run) = longest_run(entries) {
        if run.length >= STREAK_MIN {
            return Some(match run.outcome {
                Outcome::Win => Insight {
                    id: "month-streak".to_string(),
                    severity: Severity::Success,
                    tag: InsightTag::Streak,
                    title: format!("{} wins in a row", run.length),
                    message: format!(
                        "Your best stretch this month: {} straight wins from the {} to the {}.",
                        run.length,
                        ordinal(run.first_day),
                        ordinal(run.last_day)
                    ),
                    stat: Some(format!("{} consecutive wins", run.length)),
                    icon: "flame".to_string(),
                },
                _ => Insight {
                    id: "month-streak".to_string(),
                    severity: Severity::Warning,
                    tag: InsightTag::Streak,
                    title: format!("{} losses in a row", run.length),
                    message: format!(
                        "The roughest stretch this month ran {} straight losses from the {} \
                         to the {}.",
                        run.length,
                        ordinal(run.first_day),
                        ordinal(run.last_day)
                    ),
                    stat: Some(format!("{} consecutive losses", run.length)),
                    icon: "trending-down".to_string(),
                },
            });
        }
    }

    // 3. Best weekday of the month.
    let mut best: Option<(Weekday, f64)> = None;
    for day in WEEKDAYS {
        let group: Vec<&JournalEntry> = entries
            .iter()
            .filter(|e| e.trade_date.weekday() == day)
            .collect();
        if group.len() < MIN_GROUP {
            continue;
        }

        let rate = stats::win_rate(&group);
        if best.map_or(true, |(_, b)| rate > b) {
            best = Some((day, rate));
        }
    }

    if let Some((day, rate)) = best {
        if rate - overall > DAY_GAP {
            let name = weekday_name(day);
            return Some(Insight {
                id: "month-best-day".to_string(),
                severity: Severity::Success,
                tag: InsightTag::Time,
                title: format!("{}s carried the month", name),
                message: format!(
                    "{}s were your strongest day at a {:.0}% win rate, against {:.0}% \
                     overall.",
                    name,
                    rate * 100.0,
                    overall * 100.0
                ),
                stat: Some(format!("{:.0}% win rate", rate * 100.0)),
                icon: "calendar-check".to_string(),
            });
        }
    }

    // 4. Instrument concentration.
    let mut counts: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.instrument.to_uppercase()).or_insert(0) += 1;
    }
    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| a.0.cmp(&b.0));

    let mut top: Option<&(String, usize)> = None;
    for item in &counts {
        if top.map_or(true, |t| item.1 > t.1) {
            top = Some(item);
        }
    }

    if let Some((symbol, count)) = top {
        let share = *count as f64 / entries.len() as f64;
        if share >= CONCENTRATION {
            return Some(Insight {
                id: "month-concentration".to_string(),
                severity: Severity::Info,
                tag: InsightTag::Instrument,
                title: format!("A {} kind of month", symbol),
                message: format!(
                    "{} accounted for {:.0}% of your trades this month ({} of {}).",
                    symbol,
                    share * 100.0,
                    count,
                    entries.len()
                ),
                stat: Some(format!("{:.0}% of trades", share * 100.0)),
                icon: "pie-chart".to_string(),
            });
        }
    }

    // 5. Fallback: plain win rate, when enough trades were decided.
    let decided = entries.iter().filter(|e| e.outcome.is_decided()).count();
    if decided >= FALLBACK_MIN_DECIDED {
        return Some(Insight {
            id: "month-win-rate".to_string(),
            severity: Severity::Info,
            tag: InsightTag::Pattern,
            title: "The month in one number".to_string(),
            message: format!(
                "You closed the month winning {:.0}% of decided trades.",
                overall * 100.0
            ),
            stat: Some(format!("{:.0}% win rate", overall * 100.0)),
            icon: "bar-chart".to_string(),
        });
    }

    None
}

/// Strategy wrapper for the month summary.
pub struct MonthlySummaryGenerator;

impl InsightStrategy for MonthlySummaryGenerator {
    type Report = Option<Insight>;

    fn evaluate(&self, entries: &[JournalEntry]) -> Option<Insight> {
        generate_month_insight(entries)
    }
}

#[derive(Debug, Clone)]
struct OutcomeRun {
    outcome: Outcome,
    length: usize,
    first_day: u32,
    last_day: u32,
}

/// Longest run of identical win/loss outcomes, scanning the month in date
/// order. Breakeven and open trades break a run.
fn longest_run(entries: &[JournalEntry]) -> Option<OutcomeRun> {
    let mut ordered: Vec<&JournalEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.trade_date);

    let mut best: Option<OutcomeRun> = None;
    let mut current: Option<OutcomeRun> = None;

    for entry in ordered {
        match entry.outcome {
            Outcome::Win | Outcome::Loss => match current.as_mut() {
                Some(run) if run.outcome == entry.outcome => {
                    run.length += 1;
                    run.last_day = entry.trade_date.day();
                }
                _ => {
                    current = Some(OutcomeRun {
                        outcome: entry.outcome,
                        length: 1,
                        first_day: entry.trade_date.day(),
                        last_day: entry.trade_date.day(),
                    });
                }
            },
            Outcome::Breakeven | Outcome::Open => current = None,
        }

        if let Some(run) = &current {
            if best.as_ref().map_or(true, |b| run.length > b.length) {
                best = Some(run.clone());
            }
        }
    }

    best
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}
