use crate::domain::aggregates::{ProvinceCounts, YearProvinceCounts, YearTypeCounts};
use crate::domain::model::{Province, Record, Year};
use std::collections::{BTreeMap, BTreeSet};

/// Counts records per (year, contract type). Absent pairs are not emitted.
pub fn aggregate_by_year_and_type(records: &[Record]) -> YearTypeCounts {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry((record.year, record.contract_type)).or_insert(0) += 1;
    }
    counts.into()
}

/// Counts records per province. Provinces with no records are not emitted.
pub fn aggregate_by_province(records: &[Record]) -> ProvinceCounts {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.province).or_insert(0) += 1;
    }
    counts.into()
}

/// Counts records per (year, province), emitting every province of
/// `all_provinces` for each year present in `records` (0 when absent) so a
/// line series has one point per year.
///
/// Unlike [`aggregate_by_province`] this table is zero-filled.
pub fn aggregate_by_year_and_province(
    records: &[Record],
    all_provinces: &[Province],
) -> YearProvinceCounts {
    let years: BTreeSet<Year> = records.iter().map(|r| r.year).collect();

    let mut counts: BTreeMap<(Year, Province), usize> = years
        .iter()
        .flat_map(|year| all_provinces.iter().map(move |province| ((*year, *province), 0)))
        .collect();

    for record in records {
        // 資料集建立後才出現的省份也要計入，避免總數不符
        *counts.entry((record.year, record.province)).or_insert(0) += 1;
    }

    counts.into()
}
