use crate::error::{ExplorerError, Result};

/// Column names of the household export.
pub mod columns {
    pub const HOUSEHOLD_ID: &str = "Household ID";
    pub const STATE: &str = "State";
    pub const AGE_OF_HEAD: &str = "Age of Head";
    pub const AGE_OF_SPOUSE: &str = "Age of Spouse";
    pub const NUMBER_OF_DEPENDENTS: &str = "Number of Dependents";
    pub const IS_MARRIED: &str = "Is Married";
    pub const NUMBER_OF_TAX_UNITS: &str = "Number of Tax Units";
    pub const HOUSEHOLD_WEIGHT: &str = "Household Weight";
    pub const GROSS_INCOME: &str = "Gross Income";

    pub const BASELINE_FEDERAL_TAX: &str = "Baseline Federal Tax Liability";
    pub const BASELINE_NET_INCOME: &str = "Baseline Net Income";
    pub const STATE_INCOME_TAX: &str = "State Income Tax";
    pub const PROPERTY_TAXES: &str = "Property Taxes";

    pub const TOTAL_CHANGE_FEDERAL_TAX: &str = "Total Change in Federal Tax Liability";
    pub const PCT_CHANGE_FEDERAL_TAX: &str = "Percentage Change in Federal Tax Liability";
    pub const TOTAL_CHANGE_STATE_TAX: &str = "Total Change in State Tax Liability";
    pub const PCT_CHANGE_STATE_TAX: &str = "Percentage Change in State Tax Liability";
    pub const TOTAL_CHANGE_NET_INCOME: &str = "Total Change in Net Income";
    pub const PCT_CHANGE_NET_INCOME: &str = "Percentage Change in Net Income";

    /// `Age of Dependent {n}`, counted from 1.
    pub fn dependent_age(n: usize) -> String {
        format!("Age of Dependent {n}")
    }
}

/// Income sources as (display name, column).
pub const INCOME_SOURCES: [(&str, &str); 5] = [
    ("Employment Income", "Employment Income"),
    ("Self-Employment Income", "Self-Employment Income"),
    ("Tip Income", "Tip Income"),
    ("Overtime Income", "Overtime Income"),
    ("Capital Gains", "Capital Gains"),
];

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    columns::HOUSEHOLD_ID,
    columns::STATE,
    columns::AGE_OF_HEAD,
    columns::NUMBER_OF_DEPENDENTS,
    columns::IS_MARRIED,
    columns::BASELINE_FEDERAL_TAX,
    columns::BASELINE_NET_INCOME,
    columns::HOUSEHOLD_WEIGHT,
    columns::TOTAL_CHANGE_FEDERAL_TAX,
    columns::TOTAL_CHANGE_NET_INCOME,
];

/// Check the loaded header against [`REQUIRED_COLUMNS`].
///
/// The error lists every missing column in contract order.
pub fn validate<S: AsRef<str>>(column_names: &[S]) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|req| !column_names.iter().any(|c| c.as_ref() == **req))
        .map(|req| req.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ExplorerError::Schema { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_header_passes() {
        let mut header: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        header.push("Gross Income");
        assert!(validate(&header).is_ok());
    }

    #[test]
    fn missing_columns_are_listed_in_contract_order() {
        let header = [
            columns::HOUSEHOLD_ID,
            columns::STATE,
            columns::AGE_OF_HEAD,
            columns::NUMBER_OF_DEPENDENTS,
            columns::IS_MARRIED,
            columns::BASELINE_FEDERAL_TAX,
            columns::BASELINE_NET_INCOME,
            columns::TOTAL_CHANGE_FEDERAL_TAX,
        ];
        let err = validate(&header).unwrap_err();
        assert_eq!(
            err,
            ExplorerError::Schema {
                missing: vec![
                    columns::HOUSEHOLD_WEIGHT.to_string(),
                    columns::TOTAL_CHANGE_NET_INCOME.to_string(),
                ],
            }
        );
    }

    #[test]
    fn dependent_age_columns_count_from_one() {
        assert_eq!(columns::dependent_age(1), "Age of Dependent 1");
        assert_eq!(columns::dependent_age(11), "Age of Dependent 11");
    }
}
