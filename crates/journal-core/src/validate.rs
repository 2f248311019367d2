use crate::{JournalEntry, ValidationError};

const READINESS_MIN: u8 = 1;
const READINESS_MAX: u8 = 5;

/// Check a batch of entries for malformed numeric fields before handing
/// them to the generators. Structural validity only; missing optionals
/// are fine, the generators degrade gracefully on those.
pub fn validate_entries(entries: &[JournalEntry]) -> Result<(), ValidationError> {
    for entry in entries {
        let numerics = [
            ("r_multiple", entry.r_multiple),
            ("pnl", entry.pnl),
            ("stop_loss", entry.stop_loss),
        ];

        for (field, value) in numerics {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(ValidationError::NonFiniteValue(format!(
                        "{} = {} on trade dated {}",
                        field, v, entry.trade_date
                    )));
                }
            }
        }

        if let Some(readiness) = entry.readiness() {
            if !(READINESS_MIN..=READINESS_MAX).contains(&readiness) {
                return Err(ValidationError::ReadinessOutOfRange(format!(
                    "{} on trade dated {} (expected 1-5)",
                    readiness, entry.trade_date
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, Emotion, Outcome, PreTradeMindset};
    use chrono::NaiveDate;

    fn mock_entry() -> JournalEntry {
        JournalEntry {
            outcome: Outcome::Win,
            r_multiple: Some(1.5),
            pnl: Some(120.0),
            emotion_before: Emotion::Calm,
            instrument: "EURUSD".to_string(),
            direction: Direction::Long,
            trade_date: NaiveDate::from_ymd_opt(2024, 2, 6).unwrap(),
            stop_loss: Some(1.0712),
            pre_trade_mindset: Some(PreTradeMindset {
                readiness: Some(4),
                tags: vec!["Confident".to_string()],
            }),
        }
    }

    #[test]
    fn test_clean_entries_pass() {
        let entries = vec![mock_entry(), mock_entry()];
        assert!(validate_entries(&entries).is_ok());
    }

    #[test]
    fn test_empty_collection_passes() {
        assert!(validate_entries(&[]).is_ok());
    }

    #[test]
    fn test_non_finite_r_multiple_rejected() {
        let mut entry = mock_entry();
        entry.r_multiple = Some(f64::NAN);
        let err = validate_entries(&[entry]).unwrap_err();
        assert!(matches!(err, ValidationError::NonFiniteValue(_)));
    }

    #[test]
    fn test_infinite_pnl_rejected() {
        let mut entry = mock_entry();
        entry.pnl = Some(f64::INFINITY);
        assert!(validate_entries(&[entry]).is_err());
    }

    #[test]
    fn test_readiness_out_of_range_rejected() {
        let mut entry = mock_entry();
        entry.pre_trade_mindset = Some(PreTradeMindset {
            readiness: Some(6),
            tags: Vec::new(),
        });
        let err = validate_entries(&[entry]).unwrap_err();
        assert!(matches!(err, ValidationError::ReadinessOutOfRange(_)));
    }

    #[test]
    fn test_missing_optionals_are_fine() {
        let mut entry = mock_entry();
        entry.r_multiple = None;
        entry.pnl = None;
        entry.stop_loss = None;
        entry.pre_trade_mindset = None;
        assert!(validate_entries(&[entry]).is_ok());
    }
}
