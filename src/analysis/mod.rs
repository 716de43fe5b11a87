//! Per-focus impact analysis of a single household.
//!
//! ```text
//!   HouseholdRecord ──► AnalysisEngine(focus)
//!                          │  reform_impacts  → significant ReformImpact list
//!                          │  baseline        → (value, label)
//!                          │  change_info     → change, %, tone, final value
//!                          ▼
//!                       Waterfall  (baseline → reforms → final, checked)
//! ```

pub mod engine;
pub mod focus;
pub mod reform;
pub mod waterfall;

pub use engine::{AnalysisEngine, ChangeInfo, Decomposition, HouseholdReport};
pub use focus::{AnalysisFocus, ImpactTone};
pub use reform::{ReformImpact, REFORMS};
pub use waterfall::{StepKind, Waterfall, WaterfallStep};
