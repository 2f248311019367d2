use journal_core::{JournalEntry, Outcome};

/// Win rate over decided trades (wins and losses). Breakeven and open
/// trades never enter the denominator. 0.0 on an empty or undecided set.
pub fn win_rate(entries: &[&JournalEntry]) -> f64 {
    let decided = entries.iter().filter(|e| e.outcome.is_decided()).count();
    if decided == 0 {
        return 0.0;
    }

    let wins = entries.iter().filter(|e| e.outcome == Outcome::Win).count();
    wins as f64 / decided as f64
}

/// Mean R-multiple over entries that carry one. 0.0 when none do.
pub fn avg_r(entries: &[&JournalEntry]) -> f64 {
    let rs: Vec<f64> = entries.iter().filter_map(|e| e.r_multiple).collect();
    if rs.is_empty() {
        return 0.0;
    }

    rs.iter().sum::<f64>() / rs.len() as f64
}

/// Streak of identical outcomes running up to the most recent entry.
///
/// Entries arrive newest-first; the scan walks backward in time from
/// index 0. A breakeven or open trade terminates the scan immediately and
/// never joins a streak, so a breakeven at the front means no streak at
/// all.
pub fn current_streak(entries: &[JournalEntry]) -> Option<(Outcome, usize)> {
    let mut kind: Option<Outcome> = None;
    let mut length = 0usize;

    for entry in entries {
        match entry.outcome {
            Outcome::Win | Outcome::Loss => match kind {
                None => {
                    kind = Some(entry.outcome);
                    length = 1;
                }
                Some(k) if k == entry.outcome => length += 1,
                Some(_) => break,
            },
            Outcome::Breakeven | Outcome::Open => break,
        }
    }

    kind.map(|k| (k, length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use journal_core::{Direction, Emotion, JournalEntry};

    fn mock_entry(outcome: Outcome, r_multiple: Option<f64>) -> JournalEntry {
        JournalEntry {
            outcome,
            r_multiple,
            pnl: None,
            emotion_before: Emotion::Neutral,
            instrument: "EURUSD".to_string(),
            direction: Direction::Long,
            trade_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            stop_loss: None,
            pre_trade_mindset: None,
        }
    }

    #[test]
    fn test_win_rate_empty_is_zero() {
        assert_eq!(win_rate(&[]), 0.0);
    }

    #[test]
    fn test_win_rate_ignores_breakeven_and_open() {
        let entries = vec![
            mock_entry(Outcome::Win, None),
            mock_entry(Outcome::Loss, None),
            mock_entry(Outcome::Breakeven, None),
            mock_entry(Outcome::Open, None),
        ];
        let refs: Vec<&JournalEntry> = entries.iter().collect();

        // 1 win out of 2 decided; breakeven and open do not count.
        assert!((win_rate(&refs) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_win_rate_all_undecided_is_zero() {
        let entries = vec![
            mock_entry(Outcome::Breakeven, None),
            mock_entry(Outcome::Open, None),
        ];
        let refs: Vec<&JournalEntry> = entries.iter().collect();
        assert_eq!(win_rate(&refs), 0.0);
    }

    #[test]
    fn test_avg_r_skips_missing_values() {
        let entries = vec![
            mock_entry(Outcome::Win, Some(2.0)),
            mock_entry(Outcome::Loss, Some(-1.0)),
            mock_entry(Outcome::Win, None),
        ];
        let refs: Vec<&JournalEntry> = entries.iter().collect();

        // Mean over the two present values: (2.0 - 1.0) / 2 = 0.5
        assert!((avg_r(&refs) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_avg_r_all_missing_is_zero() {
        let entries = vec![mock_entry(Outcome::Win, None)];
        let refs: Vec<&JournalEntry> = entries.iter().collect();
        assert_eq!(avg_r(&refs), 0.0);
    }

    #[test]
    fn test_current_streak_scans_newest_first() {
        // Newest-first: three recent losses, then two older wins.
        let entries = vec![
            mock_entry(Outcome::Loss, None),
            mock_entry(Outcome::Loss, None),
            mock_entry(Outcome::Loss, None),
            mock_entry(Outcome::Win, None),
            mock_entry(Outcome::Win, None),
        ];

        assert_eq!(current_streak(&entries), Some((Outcome::Loss, 3)));
    }

    #[test]
    fn test_current_streak_terminated_by_breakeven() {
        let entries = vec![
            mock_entry(Outcome::Breakeven, None),
            mock_entry(Outcome::Win, None),
            mock_entry(Outcome::Win, None),
        ];

        // Breakeven at the front: no streak, not a shortened one.
        assert_eq!(current_streak(&entries), None);
    }

    #[test]
    fn test_current_streak_empty() {
        assert_eq!(current_streak(&[]), None);
    }
}
