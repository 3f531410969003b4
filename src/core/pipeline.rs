use crate::core::aggregate::{
    aggregate_by_province, aggregate_by_year_and_province, aggregate_by_year_and_type,
};
use crate::core::filter::apply_filters;
use crate::domain::aggregates::PipelineOutput;
use crate::domain::model::Dataset;
use crate::domain::selection::FilterSelection;

/// Filters the dataset and builds the three chart tables.
///
/// Pure: the same dataset and selection always give the same output, and
/// every call recomputes from the full dataset.
pub fn run_pipeline(dataset: &Dataset, selection: &FilterSelection) -> PipelineOutput {
    let filtered = apply_filters(dataset.records(), selection);

    tracing::debug!(
        "Filter [{}] kept {} of {} records",
        selection,
        filtered.len(),
        dataset.len()
    );

    let by_year_and_type = aggregate_by_year_and_type(&filtered);
    let by_province = aggregate_by_province(&filtered);
    let by_year_and_province = aggregate_by_year_and_province(&filtered, dataset.all_provinces());

    PipelineOutput {
        selection: *selection,
        filtered,
        by_year_and_type,
        by_province,
        by_year_and_province,
    }
}
