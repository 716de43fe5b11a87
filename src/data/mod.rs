//! Data layer: schema contract, household table, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → rows of FieldValue
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  schema   │  required columns present? (once, at load)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────────┐
//!   │ HouseholdDataset │  Vec<HouseholdRecord>, id index, states
//!   └─────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  predicate chain → FilteredView (row indices)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ profile   │  one record → HouseholdProfile / HouseholdDetails
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod profile;
pub mod schema;
