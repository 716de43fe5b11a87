use rand::rngs::StdRng;
use rand::SeedableRng;

use household_impact::analysis::{AnalysisEngine, AnalysisFocus, HouseholdReport};
use household_impact::data::filter::{self, FilterCriteria};
use household_impact::data::model::{HouseholdDataset, HouseholdRecord};
use household_impact::selection::{self, InterestingCase, RankedCandidate, Selection, SelectionSession};
use household_impact::ExplorerError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMethod {
    RandomShuffle,
    ById,
    InterestingCases,
}

impl SelectionMethod {
    pub const ALL: [SelectionMethod; 3] = [
        SelectionMethod::RandomShuffle,
        SelectionMethod::ById,
        SelectionMethod::InterestingCases,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SelectionMethod::RandomShuffle => "Random Shuffle",
            SelectionMethod::ById => "By Household ID",
            SelectionMethod::InterestingCases => "Find Interesting Cases",
        }
    }
}

/// The selected household and its analysis.
pub struct Selected {
    pub record: HouseholdRecord,
    pub report: HouseholdReport,
}

/// Every user choice that feeds a recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub criteria: FilterCriteria,
    pub method: SelectionMethod,
    pub chosen_id: Option<i64>,
    pub case: InterestingCase,
    pub case_rank: usize,
    pub focus: AnalysisFocus,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<HouseholdDataset>,

    /// Current user choices.
    pub inputs: Inputs,

    /// Cached random draw; only the reshuffle button changes it.
    pub session: SelectionSession,

    /// Ids passing the current filters (cached for the id picker).
    pub visible_ids: Vec<i64>,

    /// "Showing N of M households".
    pub visible_summary: String,

    /// Top households for the active interesting case.
    pub ranked: Vec<RankedCandidate>,

    /// Result of the last recomputation.
    pub current: Option<Result<Selected, ExplorerError>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    rng: StdRng,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            inputs: Inputs {
                criteria: FilterCriteria::default(),
                method: SelectionMethod::RandomShuffle,
                chosen_id: None,
                case: InterestingCase::LargestPctFederalTaxIncrease,
                case_rank: 1,
                focus: AnalysisFocus::default(),
            },
            session: SelectionSession::new(),
            visible_ids: Vec::new(),
            visible_summary: String::new(),
            ranked: Vec::new(),
            current: None,
            status_message: None,
            rng: StdRng::from_entropy(),
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and run the first pass.
    pub fn set_dataset(&mut self, dataset: HouseholdDataset) {
        self.dataset = Some(dataset);
        self.session = SelectionSession::new();
        self.inputs.chosen_id = None;
        self.status_message = None;
        self.refresh();
    }

    /// Draw a new random household (the "Get Random Household" button).
    pub fn reshuffle(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let drawn = filter::apply(dataset, &self.inputs.criteria)
            .and_then(|view| self.session.reshuffle(&view, &mut self.rng));
        if let Err(e) = drawn {
            log::warn!("reshuffle failed: {e}");
        }
        self.refresh();
    }

    /// Re-run filter → select → analyse for the current inputs.
    pub fn refresh(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };

        let view = match filter::apply(dataset, &self.inputs.criteria) {
            Ok(view) => view,
            Err(e) => {
                log::warn!("{e}");
                self.visible_ids.clear();
                self.ranked.clear();
                self.visible_summary = format!("Showing 0 of {} households", dataset.len());
                self.current = Some(Err(e));
                return;
            }
        };

        self.visible_summary = view.summary();
        self.visible_ids = view.ids();
        self.ranked = selection::rank_case(&view, self.inputs.case);

        // The id picker follows the filters the way a select box would.
        let first_visible = self.visible_ids.first().copied();
        if self
            .inputs
            .chosen_id
            .map_or(true, |id| view.get(id).is_err())
        {
            self.inputs.chosen_id = first_visible;
        }

        let pick = match self.inputs.method {
            SelectionMethod::RandomShuffle => Selection::WeightedRandom,
            SelectionMethod::ById => match self.inputs.chosen_id {
                Some(id) => Selection::ById(id),
                None => return,
            },
            SelectionMethod::InterestingCases => Selection::Ranked {
                case: self.inputs.case,
                rank: self.inputs.case_rank,
            },
        };

        let engine = AnalysisEngine::new(self.inputs.focus);
        let result = selection::select(&view, pick, &mut self.session, &mut self.rng).and_then(|record| {
            Ok(Selected {
                report: engine.report(record)?,
                record: record.clone(),
            })
        });

        match &result {
            Ok(sel) => log::debug!(
                "showing household {} ({})",
                sel.record.id(),
                self.inputs.focus.label()
            ),
            Err(e) => log::warn!("{e}"),
        }
        self.current = Some(result);
    }
}
