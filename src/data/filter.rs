use super::model::{HouseholdDataset, HouseholdRecord};
use super::schema::columns;
use crate::error::{ExplorerError, Result};

// ---------------------------------------------------------------------------
// Typed criteria
// ---------------------------------------------------------------------------

/// Inclusive range on baseline net income.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeRange {
    pub min: f64,
    pub max: f64,
}

impl IncomeRange {
    pub const ALL: IncomeRange = IncomeRange {
        min: 0.0,
        max: f64::INFINITY,
    };

    pub fn is_identity(&self) -> bool {
        self.min <= 0.0 && self.max == f64::INFINITY
    }

    pub fn contains(&self, income: f64) -> bool {
        income >= self.min && income <= self.max
    }

    pub fn from_label(label: &str) -> Option<Self> {
        lookup(&INCOME_RANGES, label)
    }
}

/// Half-open range `[min, max)` on the age of the household head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgeRange {
    All,
    Between { min: f64, max: f64 },
}

impl AgeRange {
    pub fn contains(&self, age: f64) -> bool {
        match self {
            AgeRange::All => true,
            AgeRange::Between { min, max } => age >= *min && age < *max,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        lookup(&AGE_RANGES, label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StateFilter {
    #[default]
    All,
    Only(String),
}

impl StateFilter {
    pub const ALL_LABEL: &'static str = "All States";

    pub fn from_label(label: &str) -> Self {
        if label == Self::ALL_LABEL {
            StateFilter::All
        } else {
            StateFilter::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StateFilter::All => Self::ALL_LABEL,
            StateFilter::Only(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaritalStatus {
    #[default]
    All,
    Married,
    Single,
}

impl MaritalStatus {
    pub fn from_label(label: &str) -> Option<Self> {
        lookup(&MARITAL_OPTIONS, label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependentCount {
    #[default]
    All,
    Exactly(u32),
    ThreeOrMore,
}

impl DependentCount {
    pub fn from_label(label: &str) -> Option<Self> {
        lookup(&DEPENDENT_OPTIONS, label)
    }
}

// ---------------------------------------------------------------------------
// Preset option tables (label → criterion)
// ---------------------------------------------------------------------------

pub const WEIGHT_OPTIONS: [(&str, f64); 6] = [
    ("All Households", 0.0),
    ("Weight 1,000+", 1_000.0),
    ("Weight 5,000+", 5_000.0),
    ("Weight 10,000+", 10_000.0),
    ("Weight 25,000+", 25_000.0),
    ("Weight 50,000+", 50_000.0),
];

pub const INCOME_RANGES: [(&str, IncomeRange); 6] = [
    ("All Income Levels", IncomeRange::ALL),
    ("Under $25k", IncomeRange { min: 0.0, max: 25_000.0 }),
    ("$25k - $50k", IncomeRange { min: 25_000.0, max: 50_000.0 }),
    ("$50k - $100k", IncomeRange { min: 50_000.0, max: 100_000.0 }),
    ("$100k - $200k", IncomeRange { min: 100_000.0, max: 200_000.0 }),
    ("$200k+", IncomeRange { min: 200_000.0, max: f64::INFINITY }),
];

pub const AGE_RANGES: [(&str, AgeRange); 8] = [
    ("All Ages", AgeRange::All),
    ("Under 30", AgeRange::Between { min: 0.0, max: 30.0 }),
    ("30-40", AgeRange::Between { min: 30.0, max: 40.0 }),
    ("40-50", AgeRange::Between { min: 40.0, max: 50.0 }),
    ("50-60", AgeRange::Between { min: 50.0, max: 60.0 }),
    ("60-70", AgeRange::Between { min: 60.0, max: 70.0 }),
    ("70-80", AgeRange::Between { min: 70.0, max: 80.0 }),
    ("80+", AgeRange::Between { min: 80.0, max: 200.0 }),
];

pub const DEPENDENT_OPTIONS: [(&str, DependentCount); 5] = [
    ("All", DependentCount::All),
    ("0", DependentCount::Exactly(0)),
    ("1", DependentCount::Exactly(1)),
    ("2", DependentCount::Exactly(2)),
    ("3+", DependentCount::ThreeOrMore),
];

pub const MARITAL_OPTIONS: [(&str, MaritalStatus); 3] = [
    ("All", MaritalStatus::All),
    ("Married", MaritalStatus::Married),
    ("Single", MaritalStatus::Single),
];

fn lookup<T: Copy>(table: &[(&str, T)], label: &str) -> Option<T> {
    table.iter().find(|(l, _)| *l == label).map(|(_, v)| *v)
}

/// Reverse lookup for the viewer's combo boxes.
pub fn label_of<T: PartialEq>(table: &[(&'static str, T)], value: &T) -> &'static str {
    table
        .iter()
        .find(|(_, v)| v == value)
        .map(|(l, _)| *l)
        .unwrap_or("Custom")
}

// ---------------------------------------------------------------------------
// Filter chain
// ---------------------------------------------------------------------------

/// One predicate of the chain.
///
/// Every variant reads a column no other variant reads, so the chain can
/// be applied in any order and yields the same rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    WeightFloor(f64),
    Income(IncomeRange),
    State(StateFilter),
    Marital(MaritalStatus),
    Dependents(DependentCount),
    Age(AgeRange),
    SingleTaxUnit(bool),
}

impl Filter {
    /// Whether this predicate lets every row through.
    pub fn is_identity(&self) -> bool {
        match self {
            Filter::WeightFloor(min) => *min <= 0.0,
            Filter::Income(range) => range.is_identity(),
            Filter::State(state) => *state == StateFilter::All,
            Filter::Marital(status) => *status == MaritalStatus::All,
            Filter::Dependents(count) => *count == DependentCount::All,
            Filter::Age(range) => *range == AgeRange::All,
            Filter::SingleTaxUnit(enabled) => !enabled,
        }
    }

    pub fn matches(&self, record: &HouseholdRecord) -> bool {
        if self.is_identity() {
            return true;
        }
        match self {
            Filter::WeightFloor(min) => record
                .number(columns::HOUSEHOLD_WEIGHT)
                .is_some_and(|w| w >= *min),
            Filter::Income(range) => record
                .number(columns::BASELINE_NET_INCOME)
                .is_some_and(|v| range.contains(v)),
            Filter::State(StateFilter::Only(state)) => {
                record.text(columns::STATE) == Some(state.as_str())
            }
            Filter::Marital(status) => {
                let wanted = *status == MaritalStatus::Married;
                record.flag(columns::IS_MARRIED) == Some(wanted)
            }
            Filter::Dependents(count) => record
                .number(columns::NUMBER_OF_DEPENDENTS)
                .is_some_and(|n| match count {
                    DependentCount::Exactly(k) => n == f64::from(*k),
                    DependentCount::ThreeOrMore => n >= 3.0,
                    DependentCount::All => true,
                }),
            Filter::Age(range) => record
                .number(columns::AGE_OF_HEAD)
                .is_some_and(|age| range.contains(age)),
            Filter::SingleTaxUnit(_) => record.number(columns::NUMBER_OF_TAX_UNITS) == Some(1.0),
            Filter::State(StateFilter::All) => true,
        }
    }
}

/// The user's full set of filter choices. The default matches everything.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub min_weight: f64,
    pub income: IncomeRange,
    pub state: StateFilter,
    pub marital: MaritalStatus,
    pub dependents: DependentCount,
    pub age: AgeRange,
    pub single_tax_unit: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_weight: 0.0,
            income: IncomeRange::ALL,
            state: StateFilter::All,
            marital: MaritalStatus::All,
            dependents: DependentCount::All,
            age: AgeRange::All,
            single_tax_unit: false,
        }
    }
}

impl FilterCriteria {
    /// The chain in the order the side panel presents it.
    pub fn chain(&self) -> Vec<Filter> {
        vec![
            Filter::WeightFloor(self.min_weight),
            Filter::Income(self.income),
            Filter::State(self.state.clone()),
            Filter::Marital(self.marital),
            Filter::Dependents(self.dependents),
            Filter::Age(self.age),
            Filter::SingleTaxUnit(self.single_tax_unit),
        ]
    }

    pub fn matches(&self, record: &HouseholdRecord) -> bool {
        self.chain().iter().all(|f| f.matches(record))
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows of a dataset that survived a filter pass. Borrows the dataset.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a HouseholdDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every row.
    pub fn all(dataset: &'a HouseholdDataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn dataset(&self) -> &'a HouseholdDataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a HouseholdRecord> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    pub fn ids(&self) -> Vec<i64> {
        self.records().map(HouseholdRecord::id).collect()
    }

    /// Look up a household that is part of this view.
    pub fn get(&self, household_id: i64) -> Result<&'a HouseholdRecord> {
        self.dataset
            .position(household_id)
            .filter(|pos| self.indices.binary_search(pos).is_ok())
            .map(|pos| &self.dataset.records[pos])
            .ok_or(ExplorerError::NotFound { household_id })
    }

    /// Apply further criteria to this view.
    pub fn refine(&self, criteria: &FilterCriteria) -> Result<FilteredView<'a>> {
        self.refine_with(&criteria.chain())
    }

    fn refine_with(&self, chain: &[Filter]) -> Result<FilteredView<'a>> {
        let indices: Vec<usize> = self
            .indices
            .iter()
            .copied()
            .filter(|&i| {
                let record = &self.dataset.records[i];
                chain.iter().all(|f| f.matches(record))
            })
            .collect();

        log::debug!(
            "filter pass kept {} of {} households ({} active filters)",
            indices.len(),
            self.indices.len(),
            chain.iter().filter(|f| !f.is_identity()).count()
        );

        if indices.is_empty() {
            return Err(ExplorerError::EmptyResult);
        }
        Ok(FilteredView {
            dataset: self.dataset,
            indices,
        })
    }

    /// "Showing N of M households".
    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} households",
            crate::format::thousands(self.len() as i64),
            crate::format::thousands(self.dataset.len() as i64)
        )
    }
}

/// Filter a dataset. An empty result is an error the caller must resolve
/// by changing the criteria.
pub fn apply<'a>(dataset: &'a HouseholdDataset, criteria: &FilterCriteria) -> Result<FilteredView<'a>> {
    apply_chain(dataset, &criteria.chain())
}

/// Filter a dataset with an explicit chain, in the given order.
pub fn apply_chain<'a>(dataset: &'a HouseholdDataset, chain: &[Filter]) -> Result<FilteredView<'a>> {
    FilteredView::all(dataset).refine_with(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{dataset, row};
    use crate::data::model::FieldValue;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest, Just, Strategy};
    use proptest::sample::select;

    fn household(
        id: i64,
        state: &str,
        income: f64,
        weight: f64,
        married: bool,
        dependents: i64,
        age: f64,
        tax_units: i64,
    ) -> std::collections::BTreeMap<String, FieldValue> {
        row(
            id,
            &[
                (columns::STATE, FieldValue::String(state.into())),
                (columns::BASELINE_NET_INCOME, FieldValue::Float(income)),
                (columns::HOUSEHOLD_WEIGHT, FieldValue::Float(weight)),
                (columns::IS_MARRIED, FieldValue::Bool(married)),
                (columns::NUMBER_OF_DEPENDENTS, FieldValue::Integer(dependents)),
                (columns::AGE_OF_HEAD, FieldValue::Float(age)),
                (columns::NUMBER_OF_TAX_UNITS, FieldValue::Integer(tax_units)),
            ],
        )
    }

    fn sample() -> HouseholdDataset {
        dataset(vec![
            household(1, "CA", 20_000.0, 500.0, false, 0, 25.0, 1),
            household(2, "CA", 50_000.0, 12_000.0, true, 2, 41.0, 1),
            household(3, "NY", 100_000.0, 3_000.0, true, 3, 59.9, 2),
            household(4, "NY", 100_000.01, 60_000.0, false, 1, 60.0, 1),
            household(5, "TX", 250_000.0, 1_000.0, true, 5, 82.0, 1),
            household(6, "TX", -4_000.0, 0.0, false, 0, 30.0, 3),
        ])
    }

    fn ids(view: &FilteredView<'_>) -> Vec<i64> {
        view.ids()
    }

    #[test]
    fn default_criteria_keep_everything() {
        let ds = sample();
        let view = apply(&ds, &FilterCriteria::default()).unwrap();
        assert_eq!(ids(&view), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(view.summary(), "Showing 6 of 6 households");
    }

    #[test]
    fn income_band_is_inclusive_at_the_top() {
        let ds = sample();
        let criteria = FilterCriteria {
            income: IncomeRange::from_label("$50k - $100k").unwrap(),
            ..Default::default()
        };
        let view = apply(&ds, &criteria).unwrap();
        assert_eq!(ids(&view), vec![2, 3]);
    }

    #[test]
    fn weight_floor_is_inclusive() {
        let ds = sample();
        let criteria = FilterCriteria {
            min_weight: 12_000.0,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&ds, &criteria).unwrap()), vec![2, 4]);
    }

    #[test]
    fn state_and_marital_filters() {
        let ds = sample();
        let criteria = FilterCriteria {
            state: StateFilter::from_label("NY"),
            marital: MaritalStatus::from_label("Single").unwrap(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&ds, &criteria).unwrap()), vec![4]);
        assert_eq!(StateFilter::from_label("All States"), StateFilter::All);
    }

    #[test]
    fn three_plus_dependents_means_at_least_three() {
        let ds = sample();
        let criteria = FilterCriteria {
            dependents: DependentCount::from_label("3+").unwrap(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&ds, &criteria).unwrap()), vec![3, 5]);

        let criteria = FilterCriteria {
            dependents: DependentCount::from_label("0").unwrap(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&ds, &criteria).unwrap()), vec![1, 6]);
    }

    #[test]
    fn age_range_excludes_its_upper_bound() {
        let ds = sample();
        let criteria = FilterCriteria {
            age: AgeRange::from_label("50-60").unwrap(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&ds, &criteria).unwrap()), vec![3]);
    }

    #[test]
    fn single_tax_unit_flag() {
        let ds = sample();
        let criteria = FilterCriteria {
            single_tax_unit: true,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&ds, &criteria).unwrap()), vec![1, 2, 4, 5]);
    }

    #[test]
    fn empty_result_is_an_error() {
        let ds = sample();
        let criteria = FilterCriteria {
            state: StateFilter::Only("WY".into()),
            ..Default::default()
        };
        assert_eq!(apply(&ds, &criteria).unwrap_err(), ExplorerError::EmptyResult);
    }

    #[test]
    fn view_lookup_only_sees_kept_rows() {
        let ds = sample();
        let criteria = FilterCriteria {
            state: StateFilter::Only("CA".into()),
            ..Default::default()
        };
        let view = apply(&ds, &criteria).unwrap();
        assert_eq!(view.get(2).unwrap().id(), 2);
        assert_eq!(view.get(3).unwrap_err(), ExplorerError::NotFound { household_id: 3 });
    }

    #[test]
    fn labels_round_trip_through_tables() {
        assert_eq!(label_of(&INCOME_RANGES, &IncomeRange::ALL), "All Income Levels");
        assert_eq!(label_of(&AGE_RANGES, &AgeRange::All), "All Ages");
        assert!(IncomeRange::from_label("$1M+").is_none());
    }

    fn criteria_strategy() -> impl Strategy<Value = FilterCriteria> {
        (
            select(WEIGHT_OPTIONS.to_vec()),
            select(INCOME_RANGES.to_vec()),
            select(vec!["All States", "CA", "NY", "TX"]),
            select(MARITAL_OPTIONS.to_vec()),
            select(DEPENDENT_OPTIONS.to_vec()),
            select(AGE_RANGES.to_vec()),
            proptest::bool::ANY,
        )
            .prop_map(|(w, inc, st, mar, dep, age, single)| FilterCriteria {
                min_weight: w.1,
                income: inc.1,
                state: StateFilter::from_label(st),
                marital: mar.1,
                dependents: dep.1,
                age: age.1,
                single_tax_unit: single,
            })
    }

    proptest! {
        #[test]
        fn prop_filtering_is_a_subset_and_idempotent(criteria in criteria_strategy()) {
            let ds = sample();
            if let Ok(view) = apply(&ds, &criteria) {
                prop_assert!(view.ids().iter().all(|id| ds.position(*id).is_some()));
                prop_assert!(view.len() <= ds.len());
                let again = view.refine(&criteria).unwrap();
                prop_assert_eq!(again.ids(), view.ids());
            }
        }

        #[test]
        fn prop_chain_order_does_not_matter(
            criteria in criteria_strategy(),
            order in Just((0..7usize).collect::<Vec<_>>()).prop_shuffle(),
        ) {
            let ds = sample();
            let chain = criteria.chain();
            let permuted: Vec<Filter> = order.iter().map(|&i| chain[i].clone()).collect();
            let forward = apply_chain(&ds, &chain).map(|v| v.ids());
            let shuffled = apply_chain(&ds, &permuted).map(|v| v.ids());
            prop_assert_eq!(forward, shuffled);
        }
    }
}
