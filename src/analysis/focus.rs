use serde::Serialize;

use crate::data::model::HouseholdRecord;
use crate::data::profile::HouseholdProfile;
use crate::data::schema::columns;

/// Whether a change is good or bad news for the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImpactTone {
    Favorable,
    Unfavorable,
}

/// Which quantity the analysis is centred on.
///
/// Each variant carries everything focus-specific: the reform column
/// prefix, the baseline and change columns, labels and the tone rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AnalysisFocus {
    #[default]
    FederalTaxes,
    StateTaxes,
    NetIncome,
}

impl AnalysisFocus {
    pub const ALL: [AnalysisFocus; 3] = [
        AnalysisFocus::FederalTaxes,
        AnalysisFocus::StateTaxes,
        AnalysisFocus::NetIncome,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnalysisFocus::FederalTaxes => "Federal Taxes",
            AnalysisFocus::StateTaxes => "State Taxes",
            AnalysisFocus::NetIncome => "Net Income",
        }
    }

    /// Prefix of the per-reform delta columns, `"<prefix> <reform>"`.
    pub fn reform_prefix(self) -> &'static str {
        match self {
            AnalysisFocus::FederalTaxes => "Change in Federal tax liability after",
            AnalysisFocus::StateTaxes => "Change in State tax liability after",
            AnalysisFocus::NetIncome => "Change in Net income after",
        }
    }

    pub fn reform_column(self, suffix: &str) -> String {
        format!("{} {suffix}", self.reform_prefix())
    }

    pub fn chart_title(self) -> &'static str {
        match self {
            AnalysisFocus::FederalTaxes => "Federal Tax Liability",
            AnalysisFocus::StateTaxes => "State Tax Liability",
            AnalysisFocus::NetIncome => "Net Income",
        }
    }

    /// How the analysis-scope sentence names the focus.
    pub fn scope_phrase(self) -> &'static str {
        match self {
            AnalysisFocus::FederalTaxes => "Federal Taxes",
            AnalysisFocus::StateTaxes => "State Taxes",
            AnalysisFocus::NetIncome => "Net Income overall",
        }
    }

    /// `(total change, percentage change)` columns.
    pub fn change_columns(self) -> (&'static str, &'static str) {
        match self {
            AnalysisFocus::FederalTaxes => {
                (columns::TOTAL_CHANGE_FEDERAL_TAX, columns::PCT_CHANGE_FEDERAL_TAX)
            }
            AnalysisFocus::StateTaxes => {
                (columns::TOTAL_CHANGE_STATE_TAX, columns::PCT_CHANGE_STATE_TAX)
            }
            AnalysisFocus::NetIncome => {
                (columns::TOTAL_CHANGE_NET_INCOME, columns::PCT_CHANGE_NET_INCOME)
            }
        }
    }

    /// `(change label, final label)`.
    pub fn change_labels(self) -> (&'static str, &'static str) {
        match self {
            AnalysisFocus::FederalTaxes => ("Federal Tax Change", "Reformed Federal Tax"),
            AnalysisFocus::StateTaxes => ("State Tax Change", "Reformed State Tax"),
            AnalysisFocus::NetIncome => ("Net Income Change", "Reformed Net Income"),
        }
    }

    /// Label for a single reform's delta in the breakdown.
    pub fn delta_label(self) -> &'static str {
        match self {
            AnalysisFocus::NetIncome => "Income Change",
            AnalysisFocus::FederalTaxes | AnalysisFocus::StateTaxes => "Tax Change",
        }
    }

    /// Baseline value and label. State tax falls back to zero when the
    /// export has no `State Income Tax` column.
    pub fn baseline(self, profile: &HouseholdProfile, record: &HouseholdRecord) -> (f64, &'static str) {
        match self {
            AnalysisFocus::FederalTaxes => (profile.baseline_federal_tax, "Federal Taxes"),
            AnalysisFocus::StateTaxes => (record.number_or(columns::STATE_INCOME_TAX, 0.0), "State Taxes"),
            AnalysisFocus::NetIncome => (profile.baseline_net_income, "Net Income"),
        }
    }

    /// More income is good news; more tax is bad news. A zero change takes
    /// the "else" side of each rule.
    pub fn tone(self, change: f64) -> ImpactTone {
        let favorable = match self {
            AnalysisFocus::NetIncome => change > 0.0,
            AnalysisFocus::FederalTaxes | AnalysisFocus::StateTaxes => change <= 0.0,
        };
        if favorable {
            ImpactTone::Favorable
        } else {
            ImpactTone::Unfavorable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_inverts_between_income_and_taxes() {
        assert_eq!(AnalysisFocus::NetIncome.tone(500.0), ImpactTone::Favorable);
        assert_eq!(AnalysisFocus::FederalTaxes.tone(500.0), ImpactTone::Unfavorable);
        assert_eq!(AnalysisFocus::StateTaxes.tone(500.0), ImpactTone::Unfavorable);
        assert_eq!(AnalysisFocus::NetIncome.tone(-500.0), ImpactTone::Unfavorable);
        assert_eq!(AnalysisFocus::FederalTaxes.tone(-500.0), ImpactTone::Favorable);
    }

    #[test]
    fn zero_change_follows_the_else_branch() {
        assert_eq!(AnalysisFocus::NetIncome.tone(0.0), ImpactTone::Unfavorable);
        assert_eq!(AnalysisFocus::FederalTaxes.tone(0.0), ImpactTone::Favorable);
    }

    #[test]
    fn reform_columns_use_the_focus_prefix() {
        assert_eq!(
            AnalysisFocus::StateTaxes.reform_column("SALT Reform"),
            "Change in State tax liability after SALT Reform"
        );
        assert_eq!(
            AnalysisFocus::NetIncome.reform_column("CTC Reform"),
            "Change in Net income after CTC Reform"
        );
    }
}
