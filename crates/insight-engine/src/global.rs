use std::collections::HashMap;

use chrono::{Datelike, Weekday};
use journal_core::{
    weekday_name, Emotion, Insight, InsightStrategy, InsightTag, JournalEntry, Outcome, Severity,
};
use tracing::debug;

use crate::stats;

/// Below this many entries the scanner stays silent entirely.
const MIN_SAMPLE: usize = 5;
/// Minimum entries a group (emotion, weekday, instrument) needs before its
/// win rate is trusted.
const MIN_GROUP: usize = 3;
/// Families that need a longer history (stop-loss, streak, overall context).
const MIN_EXTENDED_SAMPLE: usize = 10;

/// A negative emotion must drag results this far below overall to warn.
const EMOTION_DRAG_GAP: f64 = 0.15;
/// The best emotional state must beat overall by this much to celebrate.
const EMOTION_EDGE_GAP: f64 = 0.10;

const WEAK_DAY_RATE: f64 = 0.35;
const STRONG_DAY_RATE: f64 = 0.60;
const DAY_GAP: f64 = 0.15;

const INSTRUMENT_STRONG_RATE: f64 = 0.60;
const INSTRUMENT_WEAK_RATE: f64 = 0.35;

/// Entries without a stop-loss needed before the discipline check runs.
const MIN_NO_STOP: usize = 3;
const NO_STOP_FRACTION: f64 = 0.20;
/// Extra average loss (in R) that unprotected losers must show before the
/// warning quantifies the comparison.
const UNPROTECTED_LOSS_GAP: f64 = 0.3;

/// Entries carrying an R-multiple needed before expectancy is judged.
const MIN_R_SAMPLE: usize = 10;
const POSITIVE_EDGE_R: f64 = 0.5;

const WIN_STREAK_MIN: usize = 3;
const LOSS_STREAK_MIN: usize = 3;

const STRONG_WIN_RATE: f64 = 0.55;
const WEAK_WIN_RATE: f64 = 0.40;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Scan the full journal and return every qualifying insight, most urgent
/// first. Returns nothing below [`MIN_SAMPLE`] entries.
pub fn generate_insights(entries: &[JournalEntry]) -> Vec<Insight> {
    if entries.len() < MIN_SAMPLE {
        return Vec::new();
    }

    let all: Vec<&JournalEntry> = entries.iter().collect();
    let overall = stats::win_rate(&all);

    debug!(
        entries = entries.len(),
        overall_win_rate = overall,
        "scanning journal for behavioral patterns"
    );

    let mut insights = Vec::new();
    insights.extend(emotion_signals(entries, overall));
    insights.extend(weekday_signals(entries, overall));
    insights.extend(instrument_signals(entries));
    insights.extend(stop_loss_signals(entries));
    insights.extend(expectancy_signals(entries));
    insights.extend(streak_signals(entries));
    insights.extend(context_signals(entries, overall));

    // Stable sort: within a severity, family evaluation order is preserved.
    insights.sort_by_key(|i| i.severity.rank());
    insights
}

/// Strategy wrapper for the global scanner.
pub struct GlobalInsightGenerator;

impl InsightStrategy for GlobalInsightGenerator {
    type Report = Vec<Insight>;

    fn evaluate(&self, entries: &[JournalEntry]) -> Vec<Insight> {
        generate_insights(entries)
    }
}

fn emotion_signals(entries: &[JournalEntry], overall: f64) -> Vec<Insight> {
    let mut insights = Vec::new();

    let mut groups: HashMap<Emotion, Vec<&JournalEntry>> = HashMap::new();
    for entry in entries {
        groups.entry(entry.emotion_before).or_default().push(entry);
    }

    for emotion in Emotion::NEGATIVE {
        let Some(group) = groups.get(&emotion) else {
            continue;
        };
        if group.len() < MIN_GROUP {
            continue;
        }

        let rate = stats::win_rate(group);
        if overall - rate > EMOTION_DRAG_GAP {
            let loss_pct = (1.0 - rate) * 100.0;
            insights.push(Insight {
                id: format!("emotion-{}", emotion.as_str()),
                severity: Severity::Warning,
                tag: InsightTag::Emotion,
                title: format!("{} trading is costing you", emotion.label()),
                message: format!(
                    "You lose {:.0}% of trades entered while {}, well below your usual results. \
                     Consider sitting out when you notice this state.",
                    loss_pct,
                    emotion.as_str()
                ),
                stat: Some(format!("{:.0}% loss rate", loss_pct)),
                icon: "alert-triangle".to_string(),
            });
        }
    }

    // Best state: fixed declaration order keeps ties deterministic.
    let mut best: Option<(Emotion, f64)> = None;
    for emotion in Emotion::ALL {
        let Some(group) = groups.get(&emotion) else {
            continue;
        };
        if group.len() < MIN_GROUP {
            continue;
        }

        let rate = stats::win_rate(group);
        if best.map_or(true, |(_, b)| rate > b) {
            best = Some((emotion, rate));
        }
    }

    if let Some((emotion, rate)) = best {
        if rate > overall + EMOTION_EDGE_GAP {
            insights.push(Insight {
                id: "emotion-best".to_string(),
                severity: Severity::Success,
                tag: InsightTag::Emotion,
                title: format!("{} is your optimal state", emotion.label()),
                message: format!(
                    "Trades entered while {} win {:.0}% of the time, clearly above your overall \
                     {:.0}%. Protect whatever routine gets you there.",
                    emotion.as_str(),
                    rate * 100.0,
                    overall * 100.0
                ),
                stat: Some(format!("{:.0}% win rate", rate * 100.0)),
                icon: "sparkles".to_string(),
            });
        }
    }

    insights
}

fn weekday_signals(entries: &[JournalEntry], overall: f64) -> Vec<Insight> {
    let mut insights = Vec::new();

    for day in WEEKDAYS {
        let group: Vec<&JournalEntry> = entries
            .iter()
            .filter(|e| e.trade_date.weekday() == day)
            .collect();
        if group.len() < MIN_GROUP {
            continue;
        }

        let rate = stats::win_rate(&group);
        let name = weekday_name(day);

        if rate < WEAK_DAY_RATE && overall - rate > DAY_GAP {
            insights.push(Insight {
                id: format!("day-worst-{}", name.to_lowercase()),
                severity: Severity::Danger,
                tag: InsightTag::Time,
                title: format!("{}s are your worst day", name),
                message: format!(
                    "You win only {:.0}% of trades on {}s across {} trades, far below your \
                     overall {:.0}%. Consider reducing size or skipping the day.",
                    rate * 100.0,
                    name,
                    group.len(),
                    overall * 100.0
                ),
                stat: Some(format!("{:.0}% win rate", rate * 100.0)),
                icon: "calendar-x".to_string(),
            });
        }

        if rate > STRONG_DAY_RATE && rate - overall > DAY_GAP {
            insights.push(Insight {
                id: format!("day-best-{}", name.to_lowercase()),
                severity: Severity::Success,
                tag: InsightTag::Time,
                title: format!("{}s are your best day", name),
                message: format!(
                    "You win {:.0}% of trades on {}s, well above your overall {:.0}%.",
                    rate * 100.0,
                    name,
                    overall * 100.0
                ),
                stat: Some(format!("{:.0}% win rate", rate * 100.0)),
                icon: "calendar-check".to_string(),
            });
        }
    }

    insights
}

fn instrument_signals(entries: &[JournalEntry]) -> Vec<Insight> {
    let mut insights = Vec::new();

    let mut groups: HashMap<String, Vec<&JournalEntry>> = HashMap::new();
    for entry in entries {
        groups
            .entry(entry.instrument.to_uppercase())
            .or_default()
            .push(entry);
    }

    // Sorted symbol order so ties resolve the same way on every run.
    let mut rated: Vec<(String, f64, usize)> = groups
        .into_iter()
        .filter(|(_, group)| group.len() >= MIN_GROUP)
        .map(|(symbol, group)| {
            let rate = stats::win_rate(&group);
            (symbol, rate, group.len())
        })
        .collect();
    rated.sort_by(|a, b| a.0.cmp(&b.0));

    let mut best: Option<&(String, f64, usize)> = None;
    let mut worst: Option<&(String, f64, usize)> = None;
    for item in &rated {
        if best.map_or(true, |b| item.1 > b.1) {
            best = Some(item);
        }
        if worst.map_or(true, |w| item.1 < w.1) {
            worst = Some(item);
        }
    }

    if let Some((symbol, rate, _)) = best {
        if *rate > INSTRUMENT_STRONG_RATE {
            insights.push(Insight {
                id: format!("instrument-best-{}", symbol.to_lowercase()),
                severity: Severity::Success,
                tag: InsightTag::Instrument,
                title: format!("{} is working for you", symbol),
                message: format!(
                    "{} is your strongest instrument at a {:.0}% win rate. Your edge is \
                     clearest here.",
                    symbol,
                    rate * 100.0
                ),
                stat: Some(format!("{:.0}% win rate", rate * 100.0)),
                icon: "trending-up".to_string(),
            });
        }
    }

    if let (Some((best_symbol, _, _)), Some((symbol, rate, count))) = (best, worst) {
        if *rate < INSTRUMENT_WEAK_RATE && symbol != best_symbol {
            insights.push(Insight {
                id: format!("instrument-worst-{}", symbol.to_lowercase()),
                severity: Severity::Danger,
                tag: InsightTag::Instrument,
                title: format!("{} keeps taking your money", symbol),
                message: format!(
                    "Across {} trades on {} you win only {:.0}%. Step back from it or cut \
                     size until the numbers improve.",
                    count,
                    symbol,
                    rate * 100.0
                ),
                stat: Some(format!("{} trades, {:.0}% win rate", count, rate * 100.0)),
                icon: "trending-down".to_string(),
            });
        }
    }

    insights
}

fn stop_loss_signals(entries: &[JournalEntry]) -> Vec<Insight> {
    if entries.len() < MIN_EXTENDED_SAMPLE {
        return Vec::new();
    }

    let no_stop: Vec<&JournalEntry> = entries.iter().filter(|e| e.stop_loss.is_none()).collect();
    if no_stop.len() < MIN_NO_STOP {
        return Vec::new();
    }

    let fraction = no_stop.len() as f64 / entries.len() as f64;
    if fraction <= NO_STOP_FRACTION {
        return Vec::new();
    }

    let mut message = format!(
        "{:.0}% of your trades were entered without a stop-loss.",
        fraction * 100.0
    );

    let unprotected_losses: Vec<&JournalEntry> = no_stop
        .iter()
        .copied()
        .filter(|e| e.outcome == Outcome::Loss)
        .collect();
    let protected_losses: Vec<&JournalEntry> = entries
        .iter()
        .filter(|e| e.stop_loss.is_some() && e.outcome == Outcome::Loss)
        .collect();

    if !unprotected_losses.is_empty() && !protected_losses.is_empty() {
        let unprotected_avg = stats::avg_r(&unprotected_losses);
        let protected_avg = stats::avg_r(&protected_losses);
        if unprotected_avg <= protected_avg - UNPROTECTED_LOSS_GAP {
            message.push_str(&format!(
                " When they lose, they average {:.2}R against {:.2}R for trades with a stop.",
                unprotected_avg, protected_avg
            ));
        }
    }

    vec![Insight {
        id: "stop-loss-discipline".to_string(),
        severity: Severity::Warning,
        tag: InsightTag::Discipline,
        title: "Stops are being skipped".to_string(),
        message,
        stat: Some(format!("{:.0}% without stops", fraction * 100.0)),
        icon: "shield-off".to_string(),
    }]
}

fn expectancy_signals(entries: &[JournalEntry]) -> Vec<Insight> {
    let rs: Vec<f64> = entries.iter().filter_map(|e| e.r_multiple).collect();
    if rs.len() < MIN_R_SAMPLE {
        return Vec::new();
    }

    let mean = rs.iter().sum::<f64>() / rs.len() as f64;

    if mean < 0.0 {
        return vec![Insight {
            id: "negative-expectancy".to_string(),
            severity: Severity::Danger,
            tag: InsightTag::Risk,
            title: "Negative expectancy".to_string(),
            message: format!(
                "Your average trade returns {:.2}R. As it stands, each trade is expected to \
                 lose money. Review entries and risk sizing before adding more.",
                mean
            ),
            stat: Some(format!("{:.2}R per trade", mean)),
            icon: "trending-down".to_string(),
        }];
    }

    if mean > POSITIVE_EDGE_R {
        return vec![Insight {
            id: "positive-expectancy".to_string(),
            severity: Severity::Success,
            tag: InsightTag::Risk,
            title: "You have a measurable edge".to_string(),
            message: format!(
                "Your average trade returns {:.2}R. Keep executing the same way.",
                mean
            ),
            stat: Some(format!("{:.2}R per trade", mean)),
            icon: "target".to_string(),
        }];
    }

    Vec::new()
}

fn streak_signals(entries: &[JournalEntry]) -> Vec<Insight> {
    if entries.len() < MIN_EXTENDED_SAMPLE {
        return Vec::new();
    }

    match stats::current_streak(entries) {
        Some((Outcome::Win, length)) if length >= WIN_STREAK_MIN => vec![Insight {
            id: "win-streak".to_string(),
            severity: Severity::Info,
            tag: InsightTag::Streak,
            title: format!("{} wins in a row", length),
            message: format!(
                "You are riding a {}-trade winning streak. Stay with the process and avoid \
                 sizing up out of excitement.",
                length
            ),
            stat: Some(format!("{} consecutive wins", length)),
            icon: "flame".to_string(),
        }],
        Some((Outcome::Loss, length)) if length >= LOSS_STREAK_MIN => vec![Insight {
            id: "loss-streak".to_string(),
            severity: Severity::Warning,
            tag: InsightTag::Streak,
            title: format!("{} losses in a row", length),
            message: format!(
                "Your last {} trades all lost. A short break often does more for the account \
                 than the next trade.",
                length
            ),
            stat: Some(format!("{} consecutive losses", length)),
            icon: "pause-circle".to_string(),
        }],
        _ => Vec::new(),
    }
}

fn context_signals(entries: &[JournalEntry], overall: f64) -> Vec<Insight> {
    if entries.len() < MIN_EXTENDED_SAMPLE {
        return Vec::new();
    }

    if overall >= STRONG_WIN_RATE {
        return vec![Insight {
            id: "overall-strong".to_string(),
            severity: Severity::Success,
            tag: InsightTag::Pattern,
            title: "Solid overall hit rate".to_string(),
            message: format!(
                "You win {:.0}% of your decided trades. Consistency at this level is rare.",
                overall * 100.0
            ),
            stat: Some(format!("{:.0}% win rate", overall * 100.0)),
            icon: "award".to_string(),
        }];
    }

    if overall < WEAK_WIN_RATE {
        return vec![Insight {
            id: "overall-weak".to_string(),
            severity: Severity::Warning,
            tag: InsightTag::Pattern,
            title: "Hit rate is below water".to_string(),
            message: format!(
                "You win {:.0}% of decided trades. That can still be profitable with large \
                 winners, but check your expectancy.",
                overall * 100.0
            ),
            stat: Some(format!("{:.0}% win rate", overall * 100.0)),
            icon: "bar-chart".to_string(),
        }];
    }

    Vec::new()
}
