use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Tunables
// ---------------------------------------------------------------------------

/// A reform delta must exceed this (in absolute dollars) to be shown.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.01;

/// Story bands on the absolute net income change.
pub const MODERATE_IMPACT_THRESHOLD: f64 = 100.0;
pub const SIGNIFICANT_IMPACT_THRESHOLD: f64 = 1000.0;

/// How many households an "interesting case" ranking offers.
pub const RANKED_CASE_LIMIT: usize = 20;

/// Highest `Age of Dependent {i}` column that is read.
pub const MAX_DEPENDENTS: usize = 11;

/// Relative tolerance for `baseline + Σ reforms == final`.
pub const WATERFALL_TOLERANCE: f64 = 1e-6;

/// Environment variable naming the dataset to open at start-up.
pub const DATA_ENV_VAR: &str = "HOUSEHOLD_DATA";

/// File name the generator writes and the viewer suggests.
pub const DEFAULT_DATA_FILE: &str = "household_tax_income_changes.csv";

// ---------------------------------------------------------------------------
// Start-up data source
// ---------------------------------------------------------------------------

/// Where the viewer should load its dataset from at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Path given on the command line.
    Argument(PathBuf),
    /// Path taken from [`DATA_ENV_VAR`].
    Environment(PathBuf),
    /// Nothing configured; the user opens a file from the menu.
    Interactive,
}

impl DataSource {
    /// Resolve the source: first CLI argument, then the environment.
    pub fn resolve(args: impl IntoIterator<Item = String>, env_value: Option<String>) -> Self {
        if let Some(arg) = args.into_iter().nth(1).filter(|a| !a.is_empty()) {
            return DataSource::Argument(PathBuf::from(arg));
        }
        match env_value.filter(|v| !v.is_empty()) {
            Some(v) => DataSource::Environment(PathBuf::from(v)),
            None => DataSource::Interactive,
        }
    }

    /// Resolve from the running process.
    pub fn from_process() -> Self {
        Self::resolve(std::env::args(), std::env::var(DATA_ENV_VAR).ok())
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            DataSource::Argument(p) | DataSource::Environment(p) => Some(p),
            DataSource::Interactive => None,
        }
    }
}
