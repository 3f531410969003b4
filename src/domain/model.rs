use crate::utils::error::{DashError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// 四位數年份，例如 "2020"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(u16);

impl Year {
    pub fn new(value: u16) -> Result<Self> {
        if (1000..=9999).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DashError::InvalidYear {
                value: value.to_string(),
            })
        }
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl FromStr for Year {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DashError::InvalidYear {
                value: s.to_string(),
            });
        }
        s.parse::<u16>()
            .map(Self)
            .map_err(|_| DashError::InvalidYear {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl Serialize for Year {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Year {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Provinces covered by the dataset. Declared in label order so ordered maps
/// list them alphabetically.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum Province {
    #[strum(to_string = "AZUAY")]
    #[serde(rename = "AZUAY")]
    Azuay,
    #[strum(to_string = "GUAYAS")]
    #[serde(rename = "GUAYAS")]
    Guayas,
    #[strum(to_string = "LOJA")]
    #[serde(rename = "LOJA")]
    Loja,
    #[strum(to_string = "MANABÍ")]
    #[serde(rename = "MANABÍ")]
    Manabi,
    #[strum(to_string = "PICHINCHA")]
    #[serde(rename = "PICHINCHA")]
    Pichincha,
}

impl Province {
    pub fn label(&self) -> &'static str {
        self.into()
    }

    pub fn labels() -> Vec<&'static str> {
        Self::iter().map(|p| p.label()).collect()
    }

    /// 精確比對標籤 (大小寫敏感)
    pub fn parse_label(value: &str) -> Result<Self> {
        value.parse().map_err(|_| DashError::UnknownProvince {
            value: value.to_string(),
        })
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum ContractType {
    #[strum(to_string = "Catálogo electrónico - Mejor oferta")]
    #[serde(rename = "Catálogo electrónico - Mejor oferta")]
    CatalogoElectronico,
    #[strum(to_string = "Contratacion directa")]
    #[serde(rename = "Contratacion directa")]
    ContratacionDirecta,
    #[strum(to_string = "Licitación")]
    #[serde(rename = "Licitación")]
    Licitacion,
    #[strum(to_string = "Menor Cuantía")]
    #[serde(rename = "Menor Cuantía")]
    MenorCuantia,
    #[strum(to_string = "Subasta Inversa Electrónica")]
    #[serde(rename = "Subasta Inversa Electrónica")]
    SubastaInversa,
}

impl ContractType {
    pub fn label(&self) -> &'static str {
        self.into()
    }

    pub fn labels() -> Vec<&'static str> {
        Self::iter().map(|t| t.label()).collect()
    }

    pub fn parse_label(value: &str) -> Result<Self> {
        value.parse().map_err(|_| DashError::UnknownContractType {
            value: value.to_string(),
        })
    }
}

/// One procurement entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Año")]
    pub year: Year,
    #[serde(rename = "Provincia")]
    pub province: Province,
    #[serde(rename = "Tipo de Contratación")]
    pub contract_type: ContractType,
    #[serde(rename = "Descripción")]
    pub description: String,
}

impl Record {
    pub fn new(
        year: Year,
        province: Province,
        contract_type: ContractType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            year,
            province,
            contract_type,
            description: description.into(),
        }
    }
}

/// Read-only dataset built once at startup and passed by reference to every
/// pipeline call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Record>,
    provinces: Vec<Province>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        let provinces = records
            .iter()
            .map(|r| r.province)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self { records, provinces }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Province enumeration captured when the dataset was built.
    pub fn all_provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn year_options(&self) -> Vec<Year> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn province_options(&self) -> Vec<Province> {
        self.provinces.clone()
    }

    pub fn contract_type_options(&self) -> Vec<ContractType> {
        self.records
            .iter()
            .map(|r| r.contract_type)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_requires_four_digits() {
        assert_eq!("2020".parse::<Year>().unwrap().value(), 2020);
        assert!("20".parse::<Year>().is_err());
        assert!("20200".parse::<Year>().is_err());
        assert!("20a0".parse::<Year>().is_err());
        assert!(" 2020".parse::<Year>().is_err());
        assert!(Year::new(999).is_err());
        assert_eq!(Year::new(2015).unwrap().to_string(), "2015");
    }

    #[test]
    fn test_province_labels_are_case_sensitive() {
        assert_eq!(Province::parse_label("AZUAY").unwrap(), Province::Azuay);
        assert_eq!(Province::parse_label("MANABÍ").unwrap(), Province::Manabi);
        assert!(Province::parse_label("Azuay").is_err());
        assert!(Province::parse_label("MANABI").is_err());
        assert_eq!(Province::Pichincha.to_string(), "PICHINCHA");
    }

    #[test]
    fn test_contract_type_labels_round_trip_through_display() {
        for contract_type in ContractType::iter() {
            let label = contract_type.to_string();
            assert_eq!(ContractType::parse_label(&label).unwrap(), contract_type);
        }
        assert!(ContractType::parse_label("licitación").is_err());
    }

    #[test]
    fn test_enum_order_matches_sorted_labels() {
        let mut labels = Province::labels();
        labels.sort();
        assert_eq!(labels, Province::labels());

        let mut labels = ContractType::labels();
        labels.sort();
        assert_eq!(labels, ContractType::labels());
    }

    #[test]
    fn test_dataset_captures_options() {
        let dataset = Dataset::new(vec![
            Record::new(Year::new(2021).unwrap(), Province::Loja, ContractType::Licitacion, "a"),
            Record::new(Year::new(2020).unwrap(), Province::Azuay, ContractType::Licitacion, "b"),
            Record::new(Year::new(2020).unwrap(), Province::Loja, ContractType::MenorCuantia, "c"),
        ]);

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.all_provinces(), &[Province::Azuay, Province::Loja]);
        assert_eq!(
            dataset.year_options(),
            vec![Year::new(2020).unwrap(), Year::new(2021).unwrap()]
        );
        assert_eq!(
            dataset.contract_type_options(),
            vec![ContractType::Licitacion, ContractType::MenorCuantia]
        );
    }
}
