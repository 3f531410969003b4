use crate::core::DatasetSource;
use crate::domain::model::{ContractType, Dataset, Province, Record, Year};
use crate::utils::error::{DashError, Result};

/// Province cycle used when generating rows.
pub const SEED_PROVINCES: [Province; 5] = [
    Province::Azuay,
    Province::Pichincha,
    Province::Guayas,
    Province::Loja,
    Province::Manabi,
];

pub const SEED_CONTRACT_TYPES: [ContractType; 5] = [
    ContractType::SubastaInversa,
    ContractType::MenorCuantia,
    ContractType::ContratacionDirecta,
    ContractType::CatalogoElectronico,
    ContractType::Licitacion,
];

pub const SEED_DESCRIPTIONS: [&str; 5] = [
    "Adquisición de equipos informáticos",
    "Construcción de obras públicas",
    "Servicio de limpieza",
    "Compra de mobiliario",
    "Implementación de software",
];

pub const DEFAULT_START_YEAR: u16 = 2015;
pub const DEFAULT_END_YEAR: u16 = 2024;
pub const DEFAULT_REPETITIONS: usize = 5;

/// Deterministic in-memory procurement dataset.
///
/// Produces `(end_year - start_year + 1) * repetitions` rows. Row `i` gets
/// year `start_year + i % span` and the `i % 5`-th entry of each seed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticSource {
    pub start_year: u16,
    pub end_year: u16,
    pub repetitions: usize,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            repetitions: DEFAULT_REPETITIONS,
        }
    }
}

impl SyntheticSource {
    pub fn new(start_year: u16, end_year: u16, repetitions: usize) -> Self {
        Self {
            start_year,
            end_year,
            repetitions,
        }
    }
}

impl DatasetSource for SyntheticSource {
    fn load(&self) -> Result<Dataset> {
        if self.end_year < self.start_year {
            return Err(DashError::InvalidConfigValueError {
                field: "dataset.end_year".to_string(),
                value: self.end_year.to_string(),
                reason: format!("must not be before start_year {}", self.start_year),
            });
        }

        let years = (self.start_year..=self.end_year)
            .map(Year::new)
            .collect::<Result<Vec<_>>>()?;
        let rows = years.len() * self.repetitions;

        let records = (0..rows)
            .map(|i| {
                let seed = i % SEED_PROVINCES.len();
                Record::new(
                    years[i % years.len()],
                    SEED_PROVINCES[seed],
                    SEED_CONTRACT_TYPES[seed],
                    SEED_DESCRIPTIONS[seed],
                )
            })
            .collect();

        tracing::debug!(
            "Generated {} synthetic records for {}-{}",
            rows,
            self.start_year,
            self.end_year
        );

        Ok(Dataset::new(records))
    }
}
