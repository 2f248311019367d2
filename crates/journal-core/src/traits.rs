use crate::JournalEntry;

/// Common seam for the pattern-detection strategies.
///
/// Each strategy is a pure, synchronous transform over a batch of entries.
/// The report shape differs per strategy (ranked list, single optional
/// insight, structured mindset report), hence the associated type. The
/// strategies deliberately keep their own thresholds; they evolved
/// independently and unifying the numbers would change product behavior.
pub trait InsightStrategy: Send + Sync {
    type Report;

    fn evaluate(&self, entries: &[JournalEntry]) -> Self::Report;
}
