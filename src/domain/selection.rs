use crate::domain::model::{ContractType, Province, Record, Year};
use crate::utils::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown by the presentation layer for "no constraint".
pub const ALL_LABEL: &str = "Todos";

/// Three optional equality constraints. `None` matches every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    pub year: Option<Year>,
    pub province: Option<Province>,
    pub contract_type: Option<ContractType>,
}

impl FilterSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: Year) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_province(mut self, province: Province) -> Self {
        self.province = Some(province);
        self
    }

    pub fn with_contract_type(mut self, contract_type: ContractType) -> Self {
        self.contract_type = Some(contract_type);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.year.is_none() && self.province.is_none() && self.contract_type.is_none()
    }

    /// 建立篩選條件；空字串或 "Todos" 代表不限制
    pub fn from_labels(
        year: Option<&str>,
        province: Option<&str>,
        contract_type: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            year: constraint(year).map(str::parse::<Year>).transpose()?,
            province: constraint(province).map(Province::parse_label).transpose()?,
            contract_type: constraint(contract_type)
                .map(ContractType::parse_label)
                .transpose()?,
        })
    }

    /// Parses `year=2020; province=AZUAY; type=Licitación`.
    ///
    /// Keys may be given in English or Spanish (`año`, `provincia`, `tipo`).
    /// Fields not mentioned stay unconstrained.
    pub fn parse_query(query: &str) -> Result<Self> {
        let mut selection = Self::default();

        for part in query.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| DashError::InvalidQuery {
                query: query.to_string(),
                reason: format!("expected key=value, got '{}'", part),
            })?;
            let value = constraint(Some(value.trim()));

            match key.trim() {
                "year" | "año" | "anio" => {
                    selection.year = value.map(str::parse::<Year>).transpose()?;
                }
                "province" | "provincia" => {
                    selection.province = value.map(Province::parse_label).transpose()?;
                }
                "type" | "contract_type" | "tipo" => {
                    selection.contract_type = value.map(ContractType::parse_label).transpose()?;
                }
                other => {
                    return Err(DashError::InvalidQuery {
                        query: query.to_string(),
                        reason: format!("unknown field '{}'", other),
                    })
                }
            }
        }

        Ok(selection)
    }

    /// Exact equality on every constrained field.
    pub fn matches(&self, record: &Record) -> bool {
        self.year.map_or(true, |y| record.year == y)
            && self.province.map_or(true, |p| record.province == p)
            && self.contract_type.map_or(true, |t| record.contract_type == t)
    }
}

fn constraint(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL_LABEL)
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn label<T: fmt::Display>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| ALL_LABEL.to_string())
        }

        write!(
            f,
            "Año: {} | Provincia: {} | Tipo de Contratación: {}",
            label(&self.year),
            label(&self.province),
            label(&self.contract_type)
        )
    }
}
