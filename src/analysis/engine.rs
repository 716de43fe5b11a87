use serde::Serialize;

use super::focus::{AnalysisFocus, ImpactTone};
use super::reform::{reform_list_sentence, ReformImpact, REFORMS};
use super::waterfall::{check_decomposition, Waterfall};
use crate::data::model::HouseholdRecord;
use crate::data::profile::{HouseholdDetails, HouseholdProfile};
use crate::data::schema::columns;
use crate::error::{ExplorerError, Result};
use crate::format;
use crate::story;

// ---------------------------------------------------------------------------
// Result types handed to the renderer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeInfo {
    pub change: f64,
    pub pct_change: f64,
    pub change_label: &'static str,
    pub final_label: &'static str,
    pub tone: ImpactTone,
    /// Baseline of the focus plus `change`.
    pub final_value: f64,
}

/// Outcome of the waterfall decomposition for one household.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Decomposition {
    Decomposed(Waterfall),
    /// No reform moves this focus by more than the threshold.
    NoSignificantReforms,
    /// The reform deltas do not add up to the total change in the data.
    Mismatch { expected: f64, actual: f64 },
}

/// Everything the viewer shows for one household under one focus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdReport {
    pub focus: AnalysisFocus,
    pub profile: HouseholdProfile,
    pub details: HouseholdDetails,
    pub baseline: f64,
    pub baseline_label: &'static str,
    pub additional_taxes: Vec<String>,
    pub change: ChangeInfo,
    pub impacts: Vec<ReformImpact>,
    pub decomposition: Decomposition,
    pub story: String,
}

// ---------------------------------------------------------------------------
// AnalysisEngine
// ---------------------------------------------------------------------------

/// Resolves the active focus's columns and decomposes a household's change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisEngine {
    pub focus: AnalysisFocus,
}

impl AnalysisEngine {
    pub fn new(focus: AnalysisFocus) -> Self {
        Self { focus }
    }

    /// Significant reform impacts in declaration order.
    ///
    /// A reform whose column is absent simply does not apply to this focus
    /// and is skipped.
    pub fn reform_impacts(&self, record: &HouseholdRecord) -> Vec<ReformImpact> {
        REFORMS
            .iter()
            .filter_map(|reform| {
                let column = self.focus.reform_column(reform.column_suffix);
                record.number(&column).map(|total_change| ReformImpact {
                    name: reform.name.to_string(),
                    total_change,
                })
            })
            .filter(ReformImpact::is_significant)
            .collect()
    }

    pub fn baseline(&self, profile: &HouseholdProfile, record: &HouseholdRecord) -> (f64, &'static str) {
        self.focus.baseline(profile, record)
    }

    /// Change, percentage change, labels, tone and final value.
    ///
    /// Unlike reform columns, the total and percentage change columns are
    /// required: their absence means the dataset is malformed.
    pub fn change_info(&self, record: &HouseholdRecord) -> Result<ChangeInfo> {
        let (total_col, pct_col) = self.focus.change_columns();
        let change = record.require_number(total_col)?;
        let pct_change = record.require_number(pct_col)?;

        let baseline = match self.focus {
            AnalysisFocus::FederalTaxes => record.require_number(columns::BASELINE_FEDERAL_TAX)?,
            AnalysisFocus::StateTaxes => record.number_or(columns::STATE_INCOME_TAX, 0.0),
            AnalysisFocus::NetIncome => record.require_number(columns::BASELINE_NET_INCOME)?,
        };
        let (change_label, final_label) = self.focus.change_labels();

        Ok(ChangeInfo {
            change,
            pct_change,
            change_label,
            final_label,
            tone: self.focus.tone(change),
            final_value: baseline + change,
        })
    }

    /// Waterfall from baseline through every significant reform to the
    /// final value.
    pub fn waterfall(&self, record: &HouseholdRecord) -> Result<Waterfall> {
        let profile = HouseholdProfile::from_record(record)?;
        let (baseline, _) = self.baseline(&profile, record);
        let change = self.change_info(record)?;
        let impacts = self.reform_impacts(record);
        Waterfall::build(self.focus.chart_title(), baseline, &impacts, change.final_value)
    }

    /// Other baseline taxes worth listing next to the focus baseline.
    pub fn additional_taxes(&self, profile: &HouseholdProfile, record: &HouseholdRecord) -> Vec<String> {
        let state_tax = record.number_or(columns::STATE_INCOME_TAX, 0.0);
        let property_tax = record.number_or(columns::PROPERTY_TAXES, 0.0);
        let federal = format::currency(profile.baseline_federal_tax);

        let state_line = (state_tax > 0.0).then(|| format!("State Taxes: {}", format::currency(state_tax)));
        let property_line =
            (property_tax > 0.0).then(|| format!("Property Taxes: {}", format::currency(property_tax)));

        let lines = match self.focus {
            AnalysisFocus::FederalTaxes => vec![state_line, property_line],
            AnalysisFocus::StateTaxes => vec![Some(format!("Federal Taxes: {federal}")), property_line],
            AnalysisFocus::NetIncome => vec![
                Some(format!("Federal Tax Liability: {federal}")),
                state_line,
                property_line,
            ],
        };
        lines.into_iter().flatten().collect()
    }

    /// "We are currently analyzing the effects of ... on Federal Taxes."
    pub fn scope_summary(&self) -> String {
        format!(
            "We are currently analyzing the effects of {} on {}.",
            reform_list_sentence(),
            self.focus.scope_phrase()
        )
    }

    /// Assemble the full report. Fails only when a required column is
    /// missing for this household; a waterfall that does not add up is
    /// carried in [`HouseholdReport::decomposition`].
    pub fn report(&self, record: &HouseholdRecord) -> Result<HouseholdReport> {
        let profile = HouseholdProfile::from_record(record)?;
        let details = HouseholdDetails::from_record(record);
        let (baseline, baseline_label) = self.baseline(&profile, record);
        let change = self.change_info(record)?;
        let impacts = self.reform_impacts(record);

        let outcome = if impacts.is_empty() {
            check_decomposition(baseline, baseline, change.final_value)
                .map(|()| Decomposition::NoSignificantReforms)
        } else {
            Waterfall::build(self.focus.chart_title(), baseline, &impacts, change.final_value)
                .map(Decomposition::Decomposed)
        };
        let decomposition = match outcome {
            Ok(d) => d,
            Err(ExplorerError::DecompositionMismatch { expected, actual }) => {
                log::warn!(
                    "household {}: reforms add up to {actual}, data says {expected}",
                    record.id()
                );
                Decomposition::Mismatch { expected, actual }
            }
            Err(other) => return Err(other),
        };

        Ok(HouseholdReport {
            focus: self.focus,
            additional_taxes: self.additional_taxes(&profile, record),
            story: story::summarize(record),
            profile,
            details,
            baseline,
            baseline_label,
            change,
            impacts,
            decomposition,
        })
    }
}
