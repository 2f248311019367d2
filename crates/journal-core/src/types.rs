use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Result of a closed trade. Open positions carry no outcome yet and
/// serialize as "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Breakeven,
    #[serde(rename = "none")]
    Open,
}

impl Outcome {
    /// A decided trade is a win or a loss; breakeven and open trades are
    /// excluded from win-rate denominators.
    pub fn is_decided(&self) -> bool {
        matches!(self, Outcome::Win | Outcome::Loss)
    }
}

/// Emotional state recorded before entering the trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Calm,
    Confident,
    Anxious,
    Fearful,
    Greedy,
    Frustrated,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Calm,
        Emotion::Confident,
        Emotion::Anxious,
        Emotion::Fearful,
        Emotion::Greedy,
        Emotion::Frustrated,
        Emotion::Neutral,
    ];

    /// States that tend to precede forced or impulsive entries.
    pub const NEGATIVE: [Emotion; 4] = [
        Emotion::Anxious,
        Emotion::Fearful,
        Emotion::Greedy,
        Emotion::Frustrated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Calm => "calm",
            Emotion::Confident => "confident",
            Emotion::Anxious => "anxious",
            Emotion::Fearful => "fearful",
            Emotion::Greedy => "greedy",
            Emotion::Frustrated => "frustrated",
            Emotion::Neutral => "neutral",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Calm => "Calm",
            Emotion::Confident => "Confident",
            Emotion::Anxious => "Anxious",
            Emotion::Fearful => "Fearful",
            Emotion::Greedy => "Greedy",
            Emotion::Frustrated => "Frustrated",
            Emotion::Neutral => "Neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

/// Pre-trade mindset check-in: a 1-5 readiness score plus free-form
/// mental-state tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreTradeMindset {
    #[serde(default)]
    pub readiness: Option<u8>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One journal entry as supplied by the storage layer.
///
/// Entries are immutable inputs; the insight generators never mutate them.
/// Collections are expected newest-first (journal feed order); the streak
/// scanners walk from index 0 backward in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub outcome: Outcome,
    #[serde(default)]
    pub r_multiple: Option<f64>,
    #[serde(default)]
    pub pnl: Option<f64>,
    pub emotion_before: Emotion,
    pub instrument: String,
    pub direction: Direction,
    pub trade_date: NaiveDate,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub pre_trade_mindset: Option<PreTradeMindset>,
}

impl JournalEntry {
    pub fn readiness(&self) -> Option<u8> {
        self.pre_trade_mindset.as_ref().and_then(|m| m.readiness)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.pre_trade_mindset
            .as_ref()
            .map(|m| m.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
            .unwrap_or(false)
    }
}

/// How urgently an insight should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Warning,
    Info,
    Success,
}

impl Severity {
    /// Sort rank, danger first. Insight lists are ordered by this.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Danger => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
            Severity::Success => 3,
        }
    }
}

/// Category of the detected pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightTag {
    Emotion,
    Instrument,
    Time,
    Risk,
    Discipline,
    Streak,
    Pattern,
}

/// A single behavioral insight ready for rendering.
///
/// Built fresh on every invocation; `id` is stable per pattern so the
/// caller can key and deduplicate cards, but carries no identity beyond
/// one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    pub severity: Severity,
    pub tag: InsightTag,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub stat: Option<String>,
    pub icon: String,
}

/// Full weekday name for display ("Monday", not chrono's "Mon").
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
