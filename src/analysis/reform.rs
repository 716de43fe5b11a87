use serde::Serialize;

use crate::config::SIGNIFICANCE_THRESHOLD;

/// One provision of the bill: display name and delta column suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reform {
    pub name: &'static str,
    pub column_suffix: &'static str,
}

const fn reform(name: &'static str, column_suffix: &'static str) -> Reform {
    Reform { name, column_suffix }
}

/// The bill's components in declaration order.
pub const REFORMS: [Reform; 15] = [
    reform("Tax Rate Reform", "Tax Rate Reform"),
    reform("Standard Deduction Reform", "Standard Deduction Reform"),
    reform("Exemption Reform", "Exemption Reform"),
    reform("Child Tax Credit Reform", "CTC Reform"),
    reform("QBID Reform", "QBID Reform"),
    reform("AMT Reform", "AMT Reform"),
    reform("SALT Reform", "SALT Reform"),
    reform("Estate Tax Reform", "Estate Tax Reform"),
    reform("Tip Income Exemption", "Tip Income Exempt"),
    reform("Senior Deduction Reform", "Senior Deduction Reform"),
    reform("Overtime Income Exemption", "Overtime Income Exempt"),
    reform("Auto Loan Interest Deduction", "Auto Loan Interest ALD"),
    reform("Miscellaneous Reform", "Miscellaneous Reform"),
    reform("Limitation on Itemized Deductions", "Other Itemized Deductions Reform"),
    reform("Pease Reform", "Pease Reform"),
];

/// A reform's contribution to the active focus for one household.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReformImpact {
    pub name: String,
    pub total_change: f64,
}

impl ReformImpact {
    /// Strictly above the threshold; a delta of exactly 0.01 is noise.
    pub fn is_significant(&self) -> bool {
        self.total_change.abs() > SIGNIFICANCE_THRESHOLD
    }
}

/// "A, B, ..., and O".
pub fn reform_list_sentence() -> String {
    let names: Vec<&str> = REFORMS.iter().map(|r| r.name).collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, and {last}", rest.join(", ")),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impact(change: f64) -> ReformImpact {
        ReformImpact {
            name: "SALT Reform".into(),
            total_change: change,
        }
    }

    #[test]
    fn significance_boundary() {
        assert!(!impact(0.01).is_significant());
        assert!(!impact(-0.01).is_significant());
        assert!(impact(0.0101).is_significant());
        assert!(impact(-0.0101).is_significant());
        assert!(!impact(0.0).is_significant());
    }

    #[test]
    fn list_sentence_names_every_reform() {
        let sentence = reform_list_sentence();
        assert!(sentence.starts_with("Tax Rate Reform, Standard Deduction Reform"));
        assert!(sentence.ends_with("Limitation on Itemized Deductions, and Pease Reform"));
    }
}
