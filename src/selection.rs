use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::Serialize;

use crate::config::RANKED_CASE_LIMIT;
use crate::data::filter::FilteredView;
use crate::data::model::HouseholdRecord;
use crate::data::schema::columns;
use crate::error::{ExplorerError, Result};
use crate::format;

// ---------------------------------------------------------------------------
// Ranked "interesting case" presets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RankDirection {
    Largest,
    Smallest,
}

/// How a ranked metric is shown in its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricKind {
    Currency,
    Percent,
}

impl MetricKind {
    pub fn format(self, value: f64) -> String {
        match self {
            MetricKind::Currency => format::signed_currency(value),
            MetricKind::Percent => format::signed_percent(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InterestingCase {
    LargestPctFederalTaxIncrease,
    LargestPctFederalTaxDecrease,
    LargestFederalTaxIncrease,
    LargestFederalTaxDecrease,
    LargestPctIncomeIncrease,
    LargestPctIncomeDecrease,
    LargestIncomeIncrease,
    LargestIncomeDecrease,
}

impl InterestingCase {
    pub const ALL: [InterestingCase; 8] = [
        InterestingCase::LargestPctFederalTaxIncrease,
        InterestingCase::LargestPctFederalTaxDecrease,
        InterestingCase::LargestFederalTaxIncrease,
        InterestingCase::LargestFederalTaxDecrease,
        InterestingCase::LargestPctIncomeIncrease,
        InterestingCase::LargestPctIncomeDecrease,
        InterestingCase::LargestIncomeIncrease,
        InterestingCase::LargestIncomeDecrease,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InterestingCase::LargestPctFederalTaxIncrease => "Largest % Federal Tax Increase",
            InterestingCase::LargestPctFederalTaxDecrease => "Largest % Federal Tax Decrease",
            InterestingCase::LargestFederalTaxIncrease => "Largest Federal Tax Increase",
            InterestingCase::LargestFederalTaxDecrease => "Largest Federal Tax Decrease",
            InterestingCase::LargestPctIncomeIncrease => "Largest % Income Increase",
            InterestingCase::LargestPctIncomeDecrease => "Largest % Income Decrease",
            InterestingCase::LargestIncomeIncrease => "Largest Income Increase",
            InterestingCase::LargestIncomeDecrease => "Largest Income Decrease",
        }
    }

    /// Column, direction and display kind the case ranks by.
    pub fn metric(self) -> (&'static str, RankDirection, MetricKind) {
        use InterestingCase::*;
        use MetricKind::{Currency, Percent};
        use RankDirection::{Largest, Smallest};
        match self {
            LargestPctFederalTaxIncrease => (columns::PCT_CHANGE_FEDERAL_TAX, Largest, Percent),
            LargestPctFederalTaxDecrease => (columns::PCT_CHANGE_FEDERAL_TAX, Smallest, Percent),
            LargestFederalTaxIncrease => (columns::TOTAL_CHANGE_FEDERAL_TAX, Largest, Currency),
            LargestFederalTaxDecrease => (columns::TOTAL_CHANGE_FEDERAL_TAX, Smallest, Currency),
            LargestPctIncomeIncrease => (columns::PCT_CHANGE_NET_INCOME, Largest, Percent),
            LargestPctIncomeDecrease => (columns::PCT_CHANGE_NET_INCOME, Smallest, Percent),
            LargestIncomeIncrease => (columns::TOTAL_CHANGE_NET_INCOME, Largest, Currency),
            LargestIncomeDecrease => (columns::TOTAL_CHANGE_NET_INCOME, Smallest, Currency),
        }
    }
}

/// One entry of a ranked list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    /// 1-based position.
    pub rank: usize,
    pub household_id: i64,
    pub value: f64,
    /// `#rank: value`, e.g. `#1: $+12,400` or `#3: -8.2%`.
    pub label: String,
}

/// Rank the view by `column` and keep the top [`RANKED_CASE_LIMIT`].
///
/// The sort is stable, so equal values keep their dataset order. Rows
/// without a numeric value in `column` are not ranked.
pub fn rank(
    view: &FilteredView<'_>,
    column: &str,
    direction: RankDirection,
    kind: MetricKind,
) -> Vec<RankedCandidate> {
    let mut scored: Vec<(i64, f64)> = view
        .records()
        .filter_map(|r| r.number(column).map(|v| (r.id(), v)))
        .collect();

    match direction {
        RankDirection::Largest => scored.sort_by(|a, b| b.1.total_cmp(&a.1)),
        RankDirection::Smallest => scored.sort_by(|a, b| a.1.total_cmp(&b.1)),
    }

    scored
        .into_iter()
        .take(RANKED_CASE_LIMIT)
        .enumerate()
        .map(|(i, (household_id, value))| RankedCandidate {
            rank: i + 1,
            household_id,
            value,
            label: format!("#{}: {}", i + 1, kind.format(value)),
        })
        .collect()
}

pub fn rank_case(view: &FilteredView<'_>, case: InterestingCase) -> Vec<RankedCandidate> {
    let (column, direction, kind) = case.metric();
    rank(view, column, direction, kind)
}

// ---------------------------------------------------------------------------
// Weighted random draw with a session cache
// ---------------------------------------------------------------------------

/// Draw one household id with probability proportional to its weight.
pub fn draw_weighted<R: Rng + ?Sized>(view: &FilteredView<'_>, rng: &mut R) -> Result<i64> {
    let records: Vec<&HouseholdRecord> = view.records().collect();
    let weights = records
        .iter()
        .map(|r| {
            r.number(columns::HOUSEHOLD_WEIGHT).ok_or_else(|| {
                ExplorerError::InvalidWeight(format!("household {} has no weight", r.id()))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    let dist = WeightedIndex::new(&weights)
        .map_err(|e| ExplorerError::InvalidWeight(e.to_string()))?;
    Ok(records[dist.sample(rng)].id())
}

/// Session-scoped selection state: the randomly drawn household.
///
/// The cached id only changes through [`SelectionSession::reshuffle`] (or
/// the first draw); changing filters never clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSession {
    random_household: Option<i64>,
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<i64> {
        self.random_household
    }

    /// The cached draw, drawing once if nothing is cached yet.
    pub fn random_household<R: Rng + ?Sized>(
        &mut self,
        view: &FilteredView<'_>,
        rng: &mut R,
    ) -> Result<i64> {
        match self.random_household {
            Some(id) => Ok(id),
            None => self.reshuffle(view, rng),
        }
    }

    /// Draw a new household on explicit user request. On failure the
    /// previous draw is kept.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, view: &FilteredView<'_>, rng: &mut R) -> Result<i64> {
        let id = draw_weighted(view, rng)?;
        log::debug!("random draw picked household {id} from {} candidates", view.len());
        self.random_household = Some(id);
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// Strategy dispatch
// ---------------------------------------------------------------------------

/// How the caller wants the household chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    ById(i64),
    WeightedRandom,
    /// Pick the household at `rank` (1-based) of an interesting-case list.
    Ranked { case: InterestingCase, rank: usize },
}

/// Resolve a selection to a household id of the view.
pub fn resolve<R: Rng + ?Sized>(
    view: &FilteredView<'_>,
    selection: Selection,
    session: &mut SelectionSession,
    rng: &mut R,
) -> Result<i64> {
    match selection {
        Selection::ById(id) => Ok(id),
        Selection::WeightedRandom => session.random_household(view, rng),
        Selection::Ranked { case, rank } => {
            let ranked = rank_case(view, case);
            rank.checked_sub(1)
                .and_then(|i| ranked.get(i))
                .map(|c| c.household_id)
                .ok_or(ExplorerError::RankOutOfRange {
                    rank,
                    available: ranked.len(),
                })
        }
    }
}

/// Resolve a selection and fetch the record from the view.
pub fn select<'a, R: Rng + ?Sized>(
    view: &FilteredView<'a>,
    selection: Selection,
    session: &mut SelectionSession,
    rng: &mut R,
) -> Result<&'a HouseholdRecord> {
    let id = resolve(view, selection, session, rng)?;
    view.get(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterCriteria, StateFilter};
    use crate::data::model::fixtures::{dataset, row};
    use crate::data::model::{FieldValue, HouseholdDataset};
    use proptest::prelude::{any, prop_assert_eq, proptest};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn weighted(id: i64, weight: f64, change: f64, state: &str) -> std::collections::BTreeMap<String, FieldValue> {
        row(
            id,
            &[
                (columns::HOUSEHOLD_WEIGHT, FieldValue::Float(weight)),
                (columns::TOTAL_CHANGE_NET_INCOME, FieldValue::Float(change)),
                (columns::PCT_CHANGE_NET_INCOME, FieldValue::Float(change / 600.0)),
                (columns::STATE, FieldValue::String(state.into())),
            ],
        )
    }

    fn sample() -> HouseholdDataset {
        dataset(vec![
            weighted(1, 100.0, 50.0, "CA"),
            weighted(2, 0.0, 900.0, "CA"),
            weighted(3, 300.0, -200.0, "NY"),
            weighted(4, 50.0, 900.0, "NY"),
            weighted(5, 10.0, 50.0, "TX"),
        ])
    }

    #[test]
    fn by_id_requires_membership_in_view() {
        let ds = sample();
        let criteria = FilterCriteria {
            state: StateFilter::Only("CA".into()),
            ..Default::default()
        };
        let view = apply(&ds, &criteria).unwrap();
        let mut session = SelectionSession::new();
        let mut rng = StdRng::seed_from_u64(1);

        let rec = select(&view, Selection::ById(2), &mut session, &mut rng).unwrap();
        assert_eq!(rec.id(), 2);
        let err = select(&view, Selection::ById(3), &mut session, &mut rng).unwrap_err();
        assert_eq!(err, ExplorerError::NotFound { household_id: 3 });
    }

    #[test]
    fn largest_ranking_is_stable_on_ties() {
        let ds = sample();
        let view = FilteredView::all(&ds);
        let ranked = rank_case(&view, InterestingCase::LargestIncomeIncrease);
        let ids: Vec<i64> = ranked.iter().map(|c| c.household_id).collect();
        assert_eq!(ids, vec![2, 4, 1, 5, 3]);
        assert_eq!(ranked[0].label, "#1: $+900");
        assert_eq!(ranked[4].label, "#5: $-200");
    }

    #[test]
    fn smallest_ranking_ascends() {
        let ds = sample();
        let view = FilteredView::all(&ds);
        let ranked = rank_case(&view, InterestingCase::LargestPctIncomeDecrease);
        let ids: Vec<i64> = ranked.iter().map(|c| c.household_id).collect();
        assert_eq!(ids, vec![3, 1, 5, 2, 4]);
        assert_eq!(ranked[0].label, "#1: -0.3%");
    }

    #[test]
    fn ranking_keeps_at_most_twenty() {
        let rows = (0..30).map(|i| weighted(i, 1.0, i as f64, "CA")).collect();
        let ds = dataset(rows);
        let view = FilteredView::all(&ds);
        let ranked = rank_case(&view, InterestingCase::LargestIncomeIncrease);
        assert_eq!(ranked.len(), RANKED_CASE_LIMIT);
        assert_eq!(ranked[0].household_id, 29);
        assert_eq!(ranked[19].household_id, 10);
    }

    #[test]
    fn rows_without_the_metric_are_not_ranked() {
        let ds = sample();
        let view = FilteredView::all(&ds);
        let ranked = rank_case(&view, InterestingCase::LargestPctFederalTaxIncrease);
        assert!(ranked.is_empty());
    }

    #[test]
    fn ranked_selection_by_position() {
        let ds = sample();
        let view = FilteredView::all(&ds);
        let mut session = SelectionSession::new();
        let mut rng = StdRng::seed_from_u64(1);
        let pick = Selection::Ranked {
            case: InterestingCase::LargestIncomeIncrease,
            rank: 2,
        };
        assert_eq!(resolve(&view, pick, &mut session, &mut rng).unwrap(), 4);

        let out_of_range = Selection::Ranked {
            case: InterestingCase::LargestIncomeIncrease,
            rank: 6,
        };
        assert_eq!(
            resolve(&view, out_of_range, &mut session, &mut rng).unwrap_err(),
            ExplorerError::RankOutOfRange { rank: 6, available: 5 }
        );
    }

    #[test]
    fn zero_weight_household_is_never_drawn() {
        let ds = sample();
        let view = FilteredView::all(&ds);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_ne!(draw_weighted(&view, &mut rng).unwrap(), 2);
        }
    }

    #[test]
    fn all_zero_weights_are_invalid() {
        let ds = dataset(vec![weighted(1, 0.0, 1.0, "CA"), weighted(2, 0.0, 1.0, "CA")]);
        let view = FilteredView::all(&ds);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            draw_weighted(&view, &mut rng),
            Err(ExplorerError::InvalidWeight(_))
        ));
    }

    #[test]
    fn negative_weight_is_invalid() {
        let ds = dataset(vec![weighted(1, -5.0, 1.0, "CA"), weighted(2, 10.0, 1.0, "CA")]);
        let view = FilteredView::all(&ds);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            draw_weighted(&view, &mut rng),
            Err(ExplorerError::InvalidWeight(_))
        ));
    }

    #[test]
    fn session_draw_is_stable_until_reshuffled() {
        let ds = sample();
        let view = FilteredView::all(&ds);
        let mut session = SelectionSession::new();
        let mut rng = StdRng::seed_from_u64(3);

        let first = session.random_household(&view, &mut rng).unwrap();
        for _ in 0..20 {
            assert_eq!(session.random_household(&view, &mut rng).unwrap(), first);
        }
        assert_eq!(session.current(), Some(first));

        let redrawn = session.reshuffle(&view, &mut rng).unwrap();
        assert_eq!(session.current(), Some(redrawn));
    }

    #[test]
    fn cached_draw_filtered_out_is_not_found() {
        let ds = dataset(vec![weighted(1, 10.0, 1.0, "CA"), weighted(2, 10.0, 1.0, "NY")]);
        let mut session = SelectionSession::new();
        let mut rng = StdRng::seed_from_u64(11);

        let all = FilteredView::all(&ds);
        let drawn = session.random_household(&all, &mut rng).unwrap();
        let other_state = if drawn == 1 { "NY" } else { "CA" };
        let criteria = FilterCriteria {
            state: StateFilter::Only(other_state.into()),
            ..Default::default()
        };
        let narrowed = apply(&ds, &criteria).unwrap();
        let err = select(&narrowed, Selection::WeightedRandom, &mut session, &mut rng).unwrap_err();
        assert_eq!(err, ExplorerError::NotFound { household_id: drawn });
        assert_eq!(session.current(), Some(drawn));
    }

    proptest! {
        #[test]
        fn prop_single_row_is_always_drawn(seed in any::<u64>(), weight in 0.001f64..1e6) {
            let ds = dataset(vec![weighted(77, weight, 0.0, "CA")]);
            let view = FilteredView::all(&ds);
            let mut rng = StdRng::seed_from_u64(seed);
            prop_assert_eq!(draw_weighted(&view, &mut rng).unwrap(), 77);
        }
    }
}
