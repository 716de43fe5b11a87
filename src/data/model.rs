use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;

use super::schema::{self, columns};
use crate::error::{ExplorerError, Result};

// ---------------------------------------------------------------------------
// FieldValue – a single cell of the household table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a household export carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v:.2}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

impl FieldValue {
    /// Numeric view of the cell. Booleans count as 0/1; NaN and infinities
    /// are treated as absent.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            FieldValue::Float(v) => *v,
            FieldValue::Integer(i) => *i as f64,
            FieldValue::Bool(b) => f64::from(u8::from(*b)),
            FieldValue::String(_) | FieldValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Boolean view of the cell, accepting 0/1 numbers and `True`/`False` text.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Integer(i) => Some(*i != 0),
            FieldValue::Float(v) if v.is_finite() => Some(*v != 0.0),
            FieldValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// HouseholdRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single household row. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdRecord {
    id: i64,
    fields: BTreeMap<String, FieldValue>,
}

impl HouseholdRecord {
    /// Build a record, reading the household id from its column.
    ///
    /// `row` is only used to name the offending row in the error.
    pub fn from_fields(row: usize, fields: BTreeMap<String, FieldValue>) -> Result<Self> {
        let id = fields
            .get(columns::HOUSEHOLD_ID)
            .and_then(FieldValue::as_f64)
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i64)
            .ok_or_else(|| ExplorerError::MalformedRow {
                row,
                column: columns::HOUSEHOLD_ID.to_string(),
            })?;
        Ok(Self { id, fields })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// All cells in column-name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.fields.get(column).and_then(FieldValue::as_f64)
    }

    /// Read an optional numeric column, falling back when it is absent,
    /// null or not a number.
    pub fn number_or(&self, column: &str, fallback: f64) -> f64 {
        self.number(column).unwrap_or(fallback)
    }

    /// Read a column the current analysis cannot do without.
    pub fn require_number(&self, column: &str) -> Result<f64> {
        self.number(column).ok_or_else(|| ExplorerError::MissingColumn {
            household_id: self.id,
            column: column.to_string(),
        })
    }

    pub fn flag(&self, column: &str) -> Option<bool> {
        self.fields.get(column).and_then(FieldValue::as_bool)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(FieldValue::as_str)
    }
}

// ---------------------------------------------------------------------------
// HouseholdDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full validated table with a few pre-computed indices.
#[derive(Debug, Clone)]
pub struct HouseholdDataset {
    /// All households (rows), in file order.
    pub records: Vec<HouseholdRecord>,
    /// Column names in file order.
    pub column_names: Vec<String>,
    /// Sorted unique values of the `State` column.
    pub states: BTreeSet<String>,
    by_id: HashMap<i64, usize>,
}

impl HouseholdDataset {
    /// Validate the schema contract and index the rows.
    ///
    /// This is the only validation pass: rows are trusted to be well-typed
    /// beyond carrying a usable household id.
    pub fn new(column_names: Vec<String>, rows: Vec<BTreeMap<String, FieldValue>>) -> Result<Self> {
        schema::validate(&column_names)?;

        let mut records = Vec::with_capacity(rows.len());
        let mut by_id = HashMap::with_capacity(rows.len());
        let mut states = BTreeSet::new();

        for (row, fields) in rows.into_iter().enumerate() {
            let record = HouseholdRecord::from_fields(row, fields)?;
            if by_id.insert(record.id(), records.len()).is_some() {
                return Err(ExplorerError::DuplicateHousehold {
                    household_id: record.id(),
                });
            }
            if let Some(state) = record.text(columns::STATE) {
                states.insert(state.to_string());
            }
            records.push(record);
        }

        Ok(HouseholdDataset {
            records,
            column_names,
            states,
            by_id,
        })
    }

    /// Row index of a household id.
    pub fn position(&self, household_id: i64) -> Option<usize> {
        self.by_id.get(&household_id).copied()
    }

    /// Number of households.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
