//! Chart-ready count tables produced by the pipeline.
//!
//! Every table is an ordered map so repeated runs iterate identically.

use crate::domain::model::{ContractType, Province, Record, Year};
use crate::domain::selection::FilterSelection;
use std::collections::btree_map::{self, BTreeMap};

/// Everything the presentation layer needs for one filter selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub selection: FilterSelection,
    pub filtered: Vec<Record>,
    pub by_year_and_type: YearTypeCounts,
    pub by_province: ProvinceCounts,
    pub by_year_and_province: YearProvinceCounts,
}

impl PipelineOutput {
    /// True when no record matched; this is the "no records found" state,
    /// not an error.
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.filtered.len()
    }
}

/// Counts per (year, contract type). Only pairs present in the input appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearTypeCounts(BTreeMap<(Year, ContractType), usize>);

/// Counts per province. Provinces without records do not appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvinceCounts(BTreeMap<Province, usize>);

/// Counts per (year, province), zero-filled over every province of the
/// dataset for each year present in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearProvinceCounts(BTreeMap<(Year, Province), usize>);

macro_rules! count_table {
    ($name:ident, $key:ty) => {
        impl $name {
            pub fn get(&self, key: &$key) -> Option<usize> {
                self.0.get(key).copied()
            }

            pub fn iter(&self) -> btree_map::Iter<'_, $key, usize> {
                self.0.iter()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Sum of all cells.
            pub fn total(&self) -> usize {
                self.0.values().sum()
            }

            pub fn as_map(&self) -> &BTreeMap<$key, usize> {
                &self.0
            }
        }

        impl From<BTreeMap<$key, usize>> for $name {
            fn from(map: BTreeMap<$key, usize>) -> Self {
                Self(map)
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = (&'a $key, &'a usize);
            type IntoIter = btree_map::Iter<'a, $key, usize>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

count_table!(YearTypeCounts, (Year, ContractType));
count_table!(ProvinceCounts, Province);
count_table!(YearProvinceCounts, (Year, Province));

impl YearTypeCounts {
    pub fn years(&self) -> Vec<Year> {
        let mut years: Vec<Year> = self.0.keys().map(|(y, _)| *y).collect();
        years.dedup();
        years
    }

    pub fn contract_types(&self) -> Vec<ContractType> {
        let mut types: Vec<ContractType> = self.0.keys().map(|(_, t)| *t).collect();
        types.sort();
        types.dedup();
        types
    }

    /// Bars of one contract type; years where the type is absent are omitted.
    pub fn series(&self, contract_type: ContractType) -> Vec<(Year, usize)> {
        self.0
            .iter()
            .filter(|((_, t), _)| *t == contract_type)
            .map(|((y, _), count)| (*y, *count))
            .collect()
    }
}

impl ProvinceCounts {
    /// Descending by count, ties broken by province order.
    pub fn ranked(&self) -> Vec<(Province, usize)> {
        let mut entries: Vec<(Province, usize)> = self.0.iter().map(|(p, c)| (*p, *c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }

    /// Share of the total in percent, 0.0 when the table is empty.
    pub fn percentage(&self, province: Province) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(&province).unwrap_or(0) as f64 * 100.0 / total as f64
    }
}

impl YearProvinceCounts {
    pub fn years(&self) -> Vec<Year> {
        let mut years: Vec<Year> = self.0.keys().map(|(y, _)| *y).collect();
        years.dedup();
        years
    }

    pub fn provinces(&self) -> Vec<Province> {
        let mut provinces: Vec<Province> = self.0.keys().map(|(_, p)| *p).collect();
        provinces.sort();
        provinces.dedup();
        provinces
    }

    /// One point per year for the given province.
    pub fn series(&self, province: Province) -> Vec<(Year, usize)> {
        self.0
            .iter()
            .filter(|((_, p), _)| *p == province)
            .map(|((y, _), count)| (*y, *count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(y: &str) -> Year {
        y.parse().unwrap()
    }

    #[test]
    fn test_ranked_orders_by_count_then_province() {
        let counts = ProvinceCounts::from(BTreeMap::from([
            (Province::Pichincha, 3),
            (Province::Azuay, 1),
            (Province::Loja, 3),
        ]));

        assert_eq!(
            counts.ranked(),
            vec![
                (Province::Loja, 3),
                (Province::Pichincha, 3),
                (Province::Azuay, 1)
            ]
        );
        assert_eq!(counts.total(), 7);
        assert!((counts.percentage(Province::Azuay) - 100.0 / 7.0).abs() < 1e-9);
        assert_eq!(counts.percentage(Province::Guayas), 0.0);
    }

    #[test]
    fn test_percentage_of_empty_table_is_zero() {
        assert_eq!(ProvinceCounts::default().percentage(Province::Loja), 0.0);
    }

    #[test]
    fn test_year_type_series_skips_absent_years() {
        let counts = YearTypeCounts::from(BTreeMap::from([
            ((year("2020"), ContractType::Licitacion), 2),
            ((year("2021"), ContractType::MenorCuantia), 1),
            ((year("2022"), ContractType::Licitacion), 4),
        ]));

        assert_eq!(
            counts.series(ContractType::Licitacion),
            vec![(year("2020"), 2), (year("2022"), 4)]
        );
        assert_eq!(counts.years(), vec![year("2020"), year("2021"), year("2022")]);
        assert_eq!(
            counts.contract_types(),
            vec![ContractType::Licitacion, ContractType::MenorCuantia]
        );
    }

    #[test]
    fn test_year_province_series() {
        let counts = YearProvinceCounts::from(BTreeMap::from([
            ((year("2020"), Province::Azuay), 1),
            ((year("2020"), Province::Loja), 0),
            ((year("2021"), Province::Azuay), 0),
            ((year("2021"), Province::Loja), 2),
        ]));

        assert_eq!(
            counts.series(Province::Loja),
            vec![(year("2020"), 0), (year("2021"), 2)]
        );
        assert_eq!(counts.years(), vec![year("2020"), year("2021")]);
        assert_eq!(counts.provinces(), vec![Province::Azuay, Province::Loja]);
    }
}
