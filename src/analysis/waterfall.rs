use serde::Serialize;

use super::reform::ReformImpact;
use crate::config::WATERFALL_TOLERANCE;
use crate::error::{ExplorerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepKind {
    /// Absolute starting bar.
    Baseline,
    /// Relative bar stacked on the running total.
    Reform,
    /// Absolute closing bar.
    Final,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub label: String,
    pub kind: StepKind,
    /// Bar height: the absolute value for baseline/final, the delta otherwise.
    pub amount: f64,
    /// Running total after this step.
    pub running_total: f64,
}

impl WaterfallStep {
    /// Where the bar starts on the value axis.
    pub fn base(&self) -> f64 {
        match self.kind {
            StepKind::Reform => self.running_total - self.amount,
            StepKind::Baseline | StepKind::Final => 0.0,
        }
    }
}

/// Running-total breakdown: baseline, one step per significant reform,
/// final value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waterfall {
    pub title: String,
    pub baseline: f64,
    pub final_value: f64,
    pub steps: Vec<WaterfallStep>,
}

impl Waterfall {
    /// Build the decomposition and check `baseline + Σ impacts == final`.
    ///
    /// A mismatch means the reform deltas do not add up to the total change
    /// in the data; it is reported, never patched over.
    pub fn build(title: &str, baseline: f64, impacts: &[ReformImpact], final_value: f64) -> Result<Self> {
        let mut steps = Vec::with_capacity(impacts.len() + 2);
        steps.push(WaterfallStep {
            label: format!("Baseline {title}"),
            kind: StepKind::Baseline,
            amount: baseline,
            running_total: baseline,
        });

        let mut running_total = baseline;
        for impact in impacts {
            running_total += impact.total_change;
            steps.push(WaterfallStep {
                label: impact.name.clone(),
                kind: StepKind::Reform,
                amount: impact.total_change,
                running_total,
            });
        }

        check_decomposition(baseline, running_total, final_value)?;

        steps.push(WaterfallStep {
            label: format!("Final {title}"),
            kind: StepKind::Final,
            amount: final_value,
            running_total: final_value,
        });

        Ok(Waterfall {
            title: title.to_string(),
            baseline,
            final_value,
            steps,
        })
    }

    /// Value-axis range: anchored at zero and padded by 15% on the side
    /// the running totals extend to.
    pub fn value_range(&self) -> (f64, f64) {
        let (lo, hi) = self
            .steps
            .iter()
            .map(|s| s.running_total)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        ((lo * 1.15).min(0.0), (hi * 1.15).max(0.0))
    }

    pub fn reform_steps(&self) -> impl Iterator<Item = &WaterfallStep> {
        self.steps.iter().filter(|s| s.kind == StepKind::Reform)
    }
}

/// `actual` must equal `expected` within [`WATERFALL_TOLERANCE`], relative
/// to the largest magnitude involved (and never tighter than absolute 1e-6).
pub fn check_decomposition(baseline: f64, actual: f64, expected: f64) -> Result<()> {
    let scale = expected.abs().max(baseline.abs()).max(1.0);
    if (actual - expected).abs() <= WATERFALL_TOLERANCE * scale {
        Ok(())
    } else {
        Err(ExplorerError::DecompositionMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::{prop_assert, proptest};

    fn impact(name: &str, change: f64) -> ReformImpact {
        ReformImpact {
            name: name.into(),
            total_change: change,
        }
    }

    #[test]
    fn steps_accumulate_from_the_baseline() {
        let impacts = [impact("Tax Rate Reform", -900.0), impact("SALT Reform", 150.0)];
        let wf = Waterfall::build("Federal Tax Liability", 5_000.0, &impacts, 4_250.0).unwrap();

        let labels: Vec<&str> = wf.steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Baseline Federal Tax Liability",
                "Tax Rate Reform",
                "SALT Reform",
                "Final Federal Tax Liability",
            ]
        );
        assert_eq!(wf.steps[1].running_total, 4_100.0);
        assert_eq!(wf.steps[1].base(), 5_000.0);
        assert_eq!(wf.steps[2].running_total, 4_250.0);
        assert_eq!(wf.reform_steps().count(), 2);
    }

    #[test]
    fn mismatch_is_reported_with_both_values() {
        let impacts = [impact("Tax Rate Reform", -900.0)];
        let err = Waterfall::build("Net Income", 60_000.0, &impacts, 60_750.0).unwrap_err();
        assert_eq!(
            err,
            ExplorerError::DecompositionMismatch {
                expected: 60_750.0,
                actual: 59_100.0,
            }
        );
    }

    #[test]
    fn value_range_is_zero_anchored() {
        let impacts = [impact("AMT Reform", -1_000.0)];
        let wf = Waterfall::build("Net Income", 2_000.0, &impacts, 1_000.0).unwrap();
        let (lo, hi) = wf.value_range();
        assert_eq!(lo, 0.0);
        assert!((hi - 2_300.0).abs() < 1e-9);

        let negative = Waterfall::build("Net Income", -400.0, &[], -400.0).unwrap();
        let (lo, hi) = negative.value_range();
        assert!((lo + 460.0).abs() < 1e-9);
        assert_eq!(hi, 0.0);
    }

    proptest! {
        #[test]
        fn prop_consistent_deltas_always_decompose(
            baseline in -1e6f64..1e6,
            deltas in vec(-5e4f64..5e4, 0..15),
        ) {
            let impacts: Vec<ReformImpact> = deltas
                .iter()
                .enumerate()
                .map(|(i, d)| impact(&format!("reform {i}"), *d))
                .collect();
            let final_value = baseline + deltas.iter().sum::<f64>();
            let wf = Waterfall::build("Net Income", baseline, &impacts, final_value).unwrap();
            prop_assert!(wf.steps.len() == impacts.len() + 2);
            let last_reform = wf.steps[wf.steps.len() - 2].running_total;
            prop_assert!(check_decomposition(baseline, last_reform, final_value).is_ok());
        }
    }
}
