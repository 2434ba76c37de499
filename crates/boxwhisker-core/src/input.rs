//! Host input normalization
//!
//! The host hands over a categorical table: one label per category row and
//! a set of series columns, each carrying a numeric group key (for
//! timestamped data, seconds) and one observation per row. Only columns whose
//! key falls on the time bucket are active. The active columns are transposed
//! so every category ends up with one observation array.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

/// Default time bucket in group-key units
pub const DEFAULT_TIME_BUCKET: u32 = 60;

/// A single cell of the host table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Observation {
    Number(f64),
    Text(String),
    Missing,
}

impl Observation {
    /// Numeric value of the cell
    ///
    /// Text that parses as a finite `f64` counts. Missing cells, unparsable
    /// text and non-finite numbers do not.
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            Observation::Number(v) => *v,
            Observation::Text(s) => s.trim().parse::<f64>().ok()?,
            Observation::Missing => return None,
        };
        v.is_finite().then_some(v)
    }

    fn describe(&self) -> String {
        match self {
            Observation::Number(v) => v.to_string(),
            Observation::Text(s) => s.clone(),
            Observation::Missing => "null".to_string(),
        }
    }
}

impl From<f64> for Observation {
    fn from(v: f64) -> Self {
        Observation::Number(v)
    }
}

impl From<&str> for Observation {
    fn from(s: &str) -> Self {
        Observation::Text(s.to_string())
    }
}

/// One series column of the host table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesColumn {
    /// Numeric group key matched against the time bucket
    pub group_key: i64,
    /// One observation per category row
    pub values: Vec<Observation>,
}

impl SeriesColumn {
    pub fn new(group_key: i64, values: impl IntoIterator<Item = impl Into<Observation>>) -> Self {
        Self {
            group_key,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the column falls on `bucket`; a zero bucket keeps everything
    pub fn is_active(&self, bucket: u32) -> bool {
        bucket == 0 || self.group_key.rem_euclid(i64::from(bucket)) == 0
    }
}

/// Categorical table as delivered by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoricalInput {
    /// Category labels, one per row
    pub categories: Vec<String>,
    /// Series columns
    #[serde(default)]
    pub series: Vec<SeriesColumn>,
}

/// Observations of one category after transposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupObservations {
    pub label: String,
    pub values: Vec<f64>,
}

impl CategoricalInput {
    pub fn new(categories: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            series: Vec::new(),
        }
    }

    /// Append a series column
    pub fn with_series(mut self, column: SeriesColumn) -> Self {
        self.series.push(column);
        self
    }

    /// Active columns transposed into one array per category
    ///
    /// Category labels must be unique, and every active cell must be
    /// numeric; the first violation aborts extraction. Categories without any
    /// active cell come back empty.
    pub fn extract(&self, bucket: u32) -> DataResult<Vec<GroupObservations>> {
        let mut rows: BTreeMap<&str, usize> = BTreeMap::new();
        for (row, label) in self.categories.iter().enumerate() {
            if let Some(&first) = rows.get(label.as_str()) {
                return Err(DataError::DuplicateCategory {
                    label: label.clone(),
                    first,
                    second: row,
                });
            }
            rows.insert(label.as_str(), row);
        }

        let mut groups: Vec<GroupObservations> = self
            .categories
            .iter()
            .map(|label| GroupObservations {
                label: label.clone(),
                values: Vec::new(),
            })
            .collect();

        for column in self.series.iter().filter(|c| c.is_active(bucket)) {
            if column.values.len() > groups.len() {
                return Err(DataError::RowMismatch {
                    group_key: column.group_key,
                    rows: column.values.len(),
                    categories: groups.len(),
                });
            }

            for (row, observation) in column.values.iter().enumerate() {
                let value = observation.value().ok_or_else(|| DataError::NonNumeric {
                    group_key: column.group_key,
                    row,
                    value: observation.describe(),
                })?;
                groups[row].values.push(value);
            }
        }

        Ok(groups)
    }

    /// Number of columns active under `bucket`
    pub fn active_columns(&self, bucket: u32) -> usize {
        self.series.iter().filter(|c| c.is_active(bucket)).count()
    }
}
