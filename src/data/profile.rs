use serde::Serialize;

use super::model::HouseholdRecord;
use super::schema::{columns, INCOME_SOURCES};
use crate::config::MAX_DEPENDENTS;
use crate::error::Result;

// ---------------------------------------------------------------------------
// HouseholdProfile – typed view of one record
// ---------------------------------------------------------------------------

/// Demographic and baseline financial profile of a household.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdProfile {
    pub household_id: i64,
    pub state: String,
    pub age_of_head: f64,
    pub age_of_spouse: Option<f64>,
    pub number_of_dependents: u32,
    pub is_married: bool,
    pub baseline_federal_tax: f64,
    pub baseline_net_income: f64,
    pub household_weight: f64,
}

impl HouseholdProfile {
    /// Project a record onto its profile. Fails only on required columns
    /// that carry no usable value for this row.
    pub fn from_record(record: &HouseholdRecord) -> Result<Self> {
        let dependents = record.require_number(columns::NUMBER_OF_DEPENDENTS)?;
        Ok(HouseholdProfile {
            household_id: record.id(),
            state: record.text(columns::STATE).unwrap_or_default().to_string(),
            age_of_head: record.require_number(columns::AGE_OF_HEAD)?,
            age_of_spouse: record.number(columns::AGE_OF_SPOUSE),
            number_of_dependents: dependents.max(0.0) as u32,
            is_married: record.flag(columns::IS_MARRIED).unwrap_or(false),
            baseline_federal_tax: record.require_number(columns::BASELINE_FEDERAL_TAX)?,
            baseline_net_income: record.require_number(columns::BASELINE_NET_INCOME)?,
            household_weight: record.require_number(columns::HOUSEHOLD_WEIGHT)?,
        })
    }

    /// "Married" with the spouse's age when known, otherwise "Single".
    pub fn marital_label(&self) -> String {
        match (self.is_married, self.age_of_spouse) {
            (true, Some(age)) if age > 0.0 => format!("Married (spouse age {age:.0})"),
            (true, _) => "Married".to_string(),
            (false, _) => "Single".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Optional household details
// ---------------------------------------------------------------------------

/// Attributes read defensively from optional columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdDetails {
    pub tax_units: f64,
    pub gross_income: f64,
    pub state_income_tax: f64,
    pub property_taxes: f64,
    pub dependent_ages: Vec<u32>,
    /// Positive income sources as (display name, amount).
    pub income_sources: Vec<(String, f64)>,
}

impl HouseholdDetails {
    pub fn from_record(record: &HouseholdRecord) -> Self {
        HouseholdDetails {
            tax_units: record.number_or(columns::NUMBER_OF_TAX_UNITS, 0.0),
            gross_income: record.number_or(columns::GROSS_INCOME, 0.0),
            state_income_tax: record.number_or(columns::STATE_INCOME_TAX, 0.0),
            property_taxes: record.number_or(columns::PROPERTY_TAXES, 0.0),
            dependent_ages: dependent_ages(record),
            income_sources: income_sources(record),
        }
    }
}

/// Ages of dependents 1..=MAX_DEPENDENTS, skipping empty and zero slots.
pub fn dependent_ages(record: &HouseholdRecord) -> Vec<u32> {
    (1..=MAX_DEPENDENTS)
        .filter_map(|n| record.number(&columns::dependent_age(n)))
        .filter(|age| *age > 0.0)
        .map(|age| age.round() as u32)
        .collect()
}

/// Income sources with a positive amount, in display order.
pub fn income_sources(record: &HouseholdRecord) -> Vec<(String, f64)> {
    INCOME_SOURCES
        .iter()
        .map(|(name, col)| (name.to_string(), record.number_or(col, 0.0)))
        .filter(|(_, amount)| *amount > 0.0)
        .collect()
}
