//! One-paragraph story angle for the selected household.

use crate::config::{MODERATE_IMPACT_THRESHOLD, SIGNIFICANT_IMPACT_THRESHOLD};
use crate::data::model::HouseholdRecord;
use crate::data::schema::columns;
use crate::format;

/// Returned whenever the inputs for a story are incomplete.
pub const STORY_UNAVAILABLE: &str =
    "Quick Story Angle: Error generating summary. Please try a different household.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactLevel {
    Minimal,
    Moderate,
    Significant,
}

impl ImpactLevel {
    /// Band an absolute dollar change: ≤100 minimal, ≤1000 moderate.
    pub fn classify(abs_change: f64) -> Self {
        if abs_change > SIGNIFICANT_IMPACT_THRESHOLD {
            ImpactLevel::Significant
        } else if abs_change > MODERATE_IMPACT_THRESHOLD {
            ImpactLevel::Moderate
        } else {
            ImpactLevel::Minimal
        }
    }

    pub fn adverb(self) -> &'static str {
        match self {
            ImpactLevel::Minimal => "minimally",
            ImpactLevel::Moderate => "moderately",
            ImpactLevel::Significant => "significantly",
        }
    }
}

/// "benefits from" for a gain, "is burdened by" otherwise.
pub fn direction(change: f64) -> &'static str {
    if change > 0.0 {
        "benefits from"
    } else {
        "is burdened by"
    }
}

/// Build the story sentence from the household's net income change.
///
/// Never fails: missing or non-numeric inputs yield [`STORY_UNAVAILABLE`].
pub fn summarize(record: &HouseholdRecord) -> String {
    match compose(record) {
        Some(story) => story,
        None => {
            log::error!("household {}: story inputs are incomplete", record.id());
            STORY_UNAVAILABLE.to_string()
        }
    }
}

fn compose(record: &HouseholdRecord) -> Option<String> {
    let state = record.text(columns::STATE)?;
    let change = record.number(columns::TOTAL_CHANGE_NET_INCOME)?;
    let pct_change = record.number(columns::PCT_CHANGE_NET_INCOME)?;
    let weight = record.number(columns::HOUSEHOLD_WEIGHT)?;

    let level = ImpactLevel::classify(change.abs());
    Some(format!(
        "Quick Story Angle: This {state} household {} {} the HR1 bill, \
         with a net income change of {} ({}). \
         The household represents approximately {} similar American families.",
        level.adverb(),
        direction(change),
        format::currency(change),
        format::signed_percent(pct_change),
        format::weight(weight),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;
    use crate::data::model::FieldValue;

    #[test]
    fn bands_are_inclusive_at_the_top() {
        assert_eq!(ImpactLevel::classify(100.0), ImpactLevel::Minimal);
        assert_eq!(ImpactLevel::classify(100.5), ImpactLevel::Moderate);
        assert_eq!(ImpactLevel::classify(1000.0), ImpactLevel::Moderate);
        assert_eq!(ImpactLevel::classify(1000.01), ImpactLevel::Significant);
    }

    #[test]
    fn zero_change_reads_as_burdened() {
        assert_eq!(direction(0.0), "is burdened by");
        assert_eq!(direction(0.5), "benefits from");
    }

    #[test]
    fn moderate_gain_story() {
        let rec = record(
            3,
            &[
                (columns::STATE, FieldValue::String("OH".into())),
                (columns::HOUSEHOLD_WEIGHT, FieldValue::Float(12_000.0)),
                (columns::BASELINE_NET_INCOME, FieldValue::Float(60_000.0)),
                (columns::TOTAL_CHANGE_NET_INCOME, FieldValue::Float(750.0)),
                (columns::PCT_CHANGE_NET_INCOME, FieldValue::Float(1.25)),
            ],
        );
        let story = summarize(&rec);
        assert!(story.contains("This OH household moderately benefits from the HR1 bill"));
        assert!(story.contains("net income change of $750 (+1.2%)"));
        assert!(story.contains("approximately 12,000 similar"));
    }

    #[test]
    fn large_loss_story() {
        let rec = record(
            4,
            &[
                (columns::TOTAL_CHANGE_NET_INCOME, FieldValue::Float(-2_500.0)),
                (columns::PCT_CHANGE_NET_INCOME, FieldValue::Float(-4.0)),
                (columns::HOUSEHOLD_WEIGHT, FieldValue::Float(0.4)),
            ],
        );
        let story = summarize(&rec);
        assert!(story.contains("significantly is burdened by"));
        assert!(story.contains("$-2,500 (-4.0%)"));
        assert!(story.contains("approximately 1 similar"));
    }

    #[test]
    fn incomplete_inputs_degrade_gracefully() {
        let rec = record(
            5,
            &[(columns::TOTAL_CHANGE_NET_INCOME, FieldValue::String("n/a".into()))],
        );
        assert_eq!(summarize(&rec), STORY_UNAVAILABLE);

        let no_pct = record(6, &[]);
        assert_eq!(summarize(&no_pct), STORY_UNAVAILABLE);
    }
}
