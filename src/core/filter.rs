use crate::domain::model::Record;
use crate::domain::selection::FilterSelection;

/// Keeps the records matching every constrained field of `selection`,
/// preserving their original order.
///
/// An empty result is a normal outcome, distinct from an unconstrained
/// selection which returns every record.
pub fn apply_filters(records: &[Record], selection: &FilterSelection) -> Vec<Record> {
    if selection.is_unconstrained() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| selection.matches(record))
        .cloned()
        .collect()
}
