//! Pre-trade mindset correlation analysis.
//!
//! Correlates the 1-5 readiness score and mental-state tags captured
//! before each trade with how those trades actually went: per-level
//! performance, per-tag impact, a readiness time series, and the
//! best/worst readiness-range and tag combination. Win rates in this
//! crate are percentages (0-100), matching the impact thresholds.

use chrono::NaiveDate;
use insight_engine::stats;
use journal_core::{InsightStrategy, JournalEntry, Outcome};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The mental-state tags the check-in form offers.
pub const TAG_VOCABULARY: [&str; 5] = ["Revenge", "FOMO", "Confident", "Uncertain", "Tired"];

/// Readiness ranges crossed with tags for the combined pattern.
const READINESS_RANGES: [(&str, u8, u8); 3] = [("4-5", 4, 5), ("1-2", 1, 2), ("3", 3, 3)];

/// Entries with both outcome and readiness needed before the combined
/// pattern is computed at all.
const MIN_COMBINED_SAMPLE: usize = 5;
/// Matches a single range-and-tag cell needs to be reported.
const MIN_COMBO_MATCHES: usize = 2;
/// A tag's impact (percentage points) must fall below this to warrant the
/// worst-tag warning.
const WORST_TAG_IMPACT: f64 = -5.0;
const MIN_WORST_TAG_COUNT: usize = 2;
/// A readiness time series shorter than this is not worth charting.
const MIN_TREND_POINTS: usize = 2;

/// Performance of trades entered at one exact readiness level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessBucket {
    pub level: u8,
    pub count: usize,
    pub wins: usize,
    /// Percent of decided trades at this level that won.
    pub win_rate: f64,
    pub avg_r: f64,
}

/// How a mental-state tag shifts results against trades without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagImpact {
    pub tag: String,
    /// Entries carrying the tag.
    pub count: usize,
    pub win_rate_with: f64,
    pub win_rate_without: f64,
    pub avg_r_with: f64,
    pub avg_r_without: f64,
    /// win_rate_with minus win_rate_without, in percentage points.
    pub impact: f64,
}

/// The tag doing the most damage, when it clears the reporting bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagWarning {
    pub tag: String,
    pub impact: f64,
    pub count: usize,
}

/// One point of the readiness time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessTrendPoint {
    pub date: NaiveDate,
    pub readiness: u8,
    pub outcome: Outcome,
}

/// Win rate of one readiness-range and tag cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboStat {
    pub readiness_range: String,
    pub tag: String,
    pub win_rate: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedPattern {
    pub best: Option<ComboStat>,
    pub worst: Option<ComboStat>,
}

/// Everything the mindset screen renders, computed in one pass batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychologyReport {
    pub readiness: Vec<ReadinessBucket>,
    pub readiness_insight: Option<String>,
    pub tags: Vec<TagImpact>,
    pub worst_tag: Option<TagWarning>,
    pub trend: Vec<ReadinessTrendPoint>,
    pub combined: Option<CombinedPattern>,
}

/// Correlate pre-trade mindset data with trade results.
///
/// Total over any input: entries without mindset data simply fall out of
/// the buckets they cannot contribute to.
pub fn analyze_mindset(entries: &[JournalEntry]) -> PsychologyReport {
    debug!(entries = entries.len(), "correlating mindset with outcomes");

    let tags = tag_impacts(entries);
    let worst_tag = worst_tag(&tags);

    PsychologyReport {
        readiness: readiness_buckets(entries),
        readiness_insight: readiness_insight(entries),
        tags,
        worst_tag,
        trend: readiness_trend(entries),
        combined: combined_pattern(entries),
    }
}

/// Strategy wrapper for the mindset analyzer.
pub struct PsychologyAnalyzer;

impl InsightStrategy for PsychologyAnalyzer {
    type Report = PsychologyReport;

    fn evaluate(&self, entries: &[JournalEntry]) -> PsychologyReport {
        analyze_mindset(entries)
    }
}

fn readiness_buckets(entries: &[JournalEntry]) -> Vec<ReadinessBucket> {
    (1..=5u8)
        .map(|level| {
            let group: Vec<&JournalEntry> = entries
                .iter()
                .filter(|e| e.readiness() == Some(level))
                .collect();
            let wins = group
                .iter()
                .filter(|e| e.outcome == Outcome::Win)
                .count();

            ReadinessBucket {
                level,
                count: group.len(),
                wins,
                win_rate: stats::win_rate(&group) * 100.0,
                avg_r: stats::avg_r(&group),
            }
        })
        .collect()
}

fn readiness_insight(entries: &[JournalEntry]) -> Option<String> {
    let high: Vec<&JournalEntry> = entries
        .iter()
        .filter(|e| matches!(e.readiness(), Some(4) | Some(5)))
        .collect();
    let low: Vec<&JournalEntry> = entries
        .iter()
        .filter(|e| matches!(e.readiness(), Some(1) | Some(2)))
        .collect();

    if high.is_empty() || low.is_empty() {
        return None;
    }

    let high_rate = stats::win_rate(&high) * 100.0;
    let low_rate = stats::win_rate(&low) * 100.0;

    Some(if high_rate >= low_rate {
        format!(
            "Trades entered at readiness 4-5 win {:.0}% of the time versus {:.0}% at \
             readiness 1-2. Preparation is paying off.",
            high_rate, low_rate
        )
    } else {
        format!(
            "Trades entered at readiness 4-5 win only {:.0}% versus {:.0}% at readiness \
             1-2. The score may not be calibrated yet.",
            high_rate, low_rate
        )
    })
}

fn tag_impacts(entries: &[JournalEntry]) -> Vec<TagImpact> {
    let mut impacts = Vec::new();

    for tag in TAG_VOCABULARY {
        let with: Vec<&JournalEntry> = entries.iter().filter(|e| e.has_tag(tag)).collect();
        if with.is_empty() {
            continue;
        }
        let without: Vec<&JournalEntry> = entries.iter().filter(|e| !e.has_tag(tag)).collect();

        let win_rate_with = stats::win_rate(&with) * 100.0;
        let win_rate_without = stats::win_rate(&without) * 100.0;

        impacts.push(TagImpact {
            tag: tag.to_string(),
            count: with.len(),
            win_rate_with,
            win_rate_without,
            avg_r_with: stats::avg_r(&with),
            avg_r_without: stats::avg_r(&without),
            impact: win_rate_with - win_rate_without,
        });
    }

    impacts
}

fn worst_tag(impacts: &[TagImpact]) -> Option<TagWarning> {
    let mut worst: Option<&TagImpact> = None;
    for impact in impacts {
        if worst.map_or(true, |w| impact.impact < w.impact) {
            worst = Some(impact);
        }
    }

    let worst = worst?;
    if worst.impact < WORST_TAG_IMPACT && worst.count >= MIN_WORST_TAG_COUNT {
        Some(TagWarning {
            tag: worst.tag.clone(),
            impact: worst.impact,
            count: worst.count,
        })
    } else {
        None
    }
}

fn readiness_trend(entries: &[JournalEntry]) -> Vec<ReadinessTrendPoint> {
    let mut points: Vec<ReadinessTrendPoint> = entries
        .iter()
        .filter_map(|e| {
            e.readiness().map(|readiness| ReadinessTrendPoint {
                date: e.trade_date,
                readiness,
                outcome: e.outcome,
            })
        })
        .collect();

    if points.len() < MIN_TREND_POINTS {
        return Vec::new();
    }

    points.sort_by_key(|p| p.date);
    points
}

fn combined_pattern(entries: &[JournalEntry]) -> Option<CombinedPattern> {
    let eligible: Vec<&JournalEntry> = entries
        .iter()
        .filter(|e| e.outcome != Outcome::Open && e.readiness().is_some())
        .collect();
    if eligible.len() < MIN_COMBINED_SAMPLE {
        return None;
    }

    let mut best: Option<ComboStat> = None;
    let mut worst: Option<ComboStat> = None;

    for (label, lo, hi) in READINESS_RANGES {
        for tag in TAG_VOCABULARY {
            let matches: Vec<&JournalEntry> = eligible
                .iter()
                .copied()
                .filter(|e| {
                    let readiness = e.readiness().unwrap_or(0);
                    (lo..=hi).contains(&readiness) && e.has_tag(tag)
                })
                .collect();
            if matches.len() < MIN_COMBO_MATCHES {
                continue;
            }

            let cell = ComboStat {
                readiness_range: label.to_string(),
                tag: tag.to_string(),
                win_rate: stats::win_rate(&matches) * 100.0,
                count: matches.len(),
            };

            // Ties go to the cell with more trades behind it.
            let beats_best = best.as_ref().map_or(true, |b| {
                cell.win_rate > b.win_rate
                    || (cell.win_rate == b.win_rate && cell.count > b.count)
            });
            if beats_best {
                best = Some(cell.clone());
            }

            let beats_worst = worst.as_ref().map_or(true, |w| {
                cell.win_rate < w.win_rate
                    || (cell.win_rate == w.win_rate && cell.count > w.count)
            });
            if beats_worst {
                worst = Some(cell);
            }
        }
    }

    if best.is_none() && worst.is_none() {
        return None;
    }

    Some(CombinedPattern { best, worst })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use journal_core::{Direction, Emotion, PreTradeMindset};

    fn mock_entry(
        outcome: Outcome,
        readiness: Option<u8>,
        tags: &[&str],
        day: u32,
    ) -> JournalEntry {
        JournalEntry {
            outcome,
            r_multiple: Some(if outcome == Outcome::Win { 1.5 } else { -1.0 }),
            pnl: None,
            emotion_before: Emotion::Neutral,
            instrument: "EURUSD".to_string(),
            direction: Direction::Long,
            trade_date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            stop_loss: Some(1.0),
            pre_trade_mindset: Some(PreTradeMindset {
                readiness,
                tags: tags.iter().map(|t| t.to_string()).collect(),
            }),
        }
    }

    fn bare_entry(outcome: Outcome, day: u32) -> JournalEntry {
        let mut entry = mock_entry(outcome, None, &[], day);
        entry.pre_trade_mindset = None;
        entry
    }

    #[test]
    fn test_empty_input_degrades_gracefully() {
        let report = analyze_mindset(&[]);

        assert_eq!(report.readiness.len(), 5);
        assert!(report.readiness.iter().all(|b| b.count == 0));
        assert!(report.readiness_insight.is_none());
        assert!(report.tags.is_empty());
        assert!(report.worst_tag.is_none());
        assert!(report.trend.is_empty());
        assert!(report.combined.is_none());
    }

    #[test]
    fn test_readiness_buckets() {
        let entries = vec![
            mock_entry(Outcome::Win, Some(5), &[], 1),
            mock_entry(Outcome::Win, Some(5), &[], 2),
            mock_entry(Outcome::Loss, Some(5), &[], 3),
            mock_entry(Outcome::Loss, Some(2), &[], 4),
            bare_entry(Outcome::Win, 5),
        ];

        let report = analyze_mindset(&entries);

        let level5 = &report.readiness[4];
        assert_eq!(level5.level, 5);
        assert_eq!(level5.count, 3);
        assert_eq!(level5.wins, 2);
        // 2 of 3 decided trades at level 5 won.
        assert!((level5.win_rate - 66.666).abs() < 0.01);
        // (1.5 + 1.5 - 1.0) / 3
        assert!((level5.avg_r - (2.0 / 3.0)).abs() < 1e-9);

        // The entry without mindset data lands in no bucket.
        let total: usize = report.readiness.iter().map(|b| b.count).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_key_insight_needs_both_buckets() {
        let high_only = vec![
            mock_entry(Outcome::Win, Some(4), &[], 1),
            mock_entry(Outcome::Win, Some(5), &[], 2),
        ];
        assert!(analyze_mindset(&high_only).readiness_insight.is_none());

        let both = vec![
            mock_entry(Outcome::Win, Some(4), &[], 1),
            mock_entry(Outcome::Win, Some(5), &[], 2),
            mock_entry(Outcome::Loss, Some(1), &[], 3),
        ];
        let insight = analyze_mindset(&both).readiness_insight.unwrap();
        assert!(insight.contains("100%"));
        assert!(insight.contains("0%"));
    }

    #[test]
    fn test_tag_impact_and_worst_tag() {
        let entries = vec![
            mock_entry(Outcome::Loss, Some(3), &["FOMO"], 1),
            mock_entry(Outcome::Loss, Some(3), &["FOMO"], 2),
            mock_entry(Outcome::Win, Some(3), &[], 3),
            mock_entry(Outcome::Win, Some(3), &[], 4),
            mock_entry(Outcome::Win, Some(3), &[], 5),
        ];

        let report = analyze_mindset(&entries);

        // Only FOMO has tagged entries; the other four stay unreported.
        assert_eq!(report.tags.len(), 1);
        let fomo = &report.tags[0];
        assert_eq!(fomo.tag, "FOMO");
        assert_eq!(fomo.count, 2);
        assert_eq!(fomo.win_rate_with, 0.0);
        assert_eq!(fomo.win_rate_without, 100.0);
        // 0% with minus 100% without.
        assert_eq!(fomo.impact, -100.0);

        let warning = report.worst_tag.expect("a -100 point impact should warn");
        assert_eq!(warning.tag, "FOMO");
        assert_eq!(warning.count, 2);
    }

    #[test]
    fn test_worst_tag_needs_two_tagged_entries() {
        let entries = vec![
            mock_entry(Outcome::Loss, Some(3), &["Tired"], 1),
            mock_entry(Outcome::Win, Some(3), &[], 2),
            mock_entry(Outcome::Win, Some(3), &[], 3),
        ];

        let report = analyze_mindset(&entries);
        assert_eq!(report.tags.len(), 1);
        assert!(report.worst_tag.is_none());
    }

    #[test]
    fn test_trend_is_chronological() {
        let entries = vec![
            mock_entry(Outcome::Win, Some(4), &[], 20),
            mock_entry(Outcome::Loss, Some(2), &[], 5),
            mock_entry(Outcome::Win, Some(3), &[], 12),
            bare_entry(Outcome::Win, 1),
        ];

        let report = analyze_mindset(&entries);

        let days: Vec<u32> = report.trend.iter().map(|p| p.date.day()).collect();
        assert_eq!(days, vec![5, 12, 20]);
        assert_eq!(report.trend[0].readiness, 2);
    }

    #[test]
    fn test_trend_needs_two_points() {
        let entries = vec![
            mock_entry(Outcome::Win, Some(4), &[], 1),
            bare_entry(Outcome::Loss, 2),
        ];

        assert!(analyze_mindset(&entries).trend.is_empty());
    }

    #[test]
    fn test_combined_pattern_best_cell() {
        // Readiness 5 + Confident, three wins; readiness 2 + Tired, two
        // losses. Five eligible entries in total.
        let entries = vec![
            mock_entry(Outcome::Win, Some(5), &["Confident"], 1),
            mock_entry(Outcome::Win, Some(5), &["Confident"], 2),
            mock_entry(Outcome::Win, Some(5), &["Confident"], 3),
            mock_entry(Outcome::Loss, Some(2), &["Tired"], 4),
            mock_entry(Outcome::Loss, Some(2), &["Tired"], 5),
        ];

        let combined = analyze_mindset(&entries).combined.unwrap();

        let best = combined.best.unwrap();
        assert_eq!(best.readiness_range, "4-5");
        assert_eq!(best.tag, "Confident");
        assert_eq!(best.win_rate, 100.0);
        assert_eq!(best.count, 3);

        let worst = combined.worst.unwrap();
        assert_eq!(worst.readiness_range, "1-2");
        assert_eq!(worst.tag, "Tired");
        assert_eq!(worst.win_rate, 0.0);
        assert_eq!(worst.count, 2);
    }

    #[test]
    fn test_combined_pattern_needs_five_eligible() {
        let entries = vec![
            mock_entry(Outcome::Win, Some(5), &["Confident"], 1),
            mock_entry(Outcome::Win, Some(5), &["Confident"], 2),
            mock_entry(Outcome::Loss, Some(2), &["Tired"], 3),
            // Open trade and a no-mindset entry do not count as eligible.
            mock_entry(Outcome::Open, Some(4), &["Confident"], 4),
            bare_entry(Outcome::Win, 5),
        ];

        assert!(analyze_mindset(&entries).combined.is_none());
    }

    #[test]
    fn test_combined_tie_breaks_on_count() {
        // Two all-winning cells; the one with three trades outranks the
        // one with two.
        let entries = vec![
            mock_entry(Outcome::Win, Some(5), &["Confident"], 1),
            mock_entry(Outcome::Win, Some(5), &["Confident"], 2),
            mock_entry(Outcome::Win, Some(5), &["Confident"], 3),
            mock_entry(Outcome::Win, Some(3), &["FOMO"], 4),
            mock_entry(Outcome::Win, Some(3), &["FOMO"], 5),
        ];

        let combined = analyze_mindset(&entries).combined.unwrap();
        let best = combined.best.unwrap();
        assert_eq!(best.tag, "Confident");
        assert_eq!(best.count, 3);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let entries = vec![
            mock_entry(Outcome::Win, Some(5), &["Confident"], 1),
            mock_entry(Outcome::Loss, Some(2), &["Tired", "FOMO"], 2),
            mock_entry(Outcome::Breakeven, Some(3), &[], 3),
            bare_entry(Outcome::Win, 4),
        ];

        assert_eq!(analyze_mindset(&entries), analyze_mindset(&entries));
    }
}
