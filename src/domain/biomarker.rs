//! Biomarker result rows as rendered by the portal.

use serde::{Deserialize, Serialize};

/// One extracted result row.
///
/// Every field except `category` is kept as the text the portal displayed.
/// Values are not parsed: the portal mixes numeric and qualitative results
/// and formats numbers per locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomarkerRecord {
    /// Most recent heading seen before this row, if any.
    pub category: Option<String>,
    pub name: String,
    pub status: String,
    pub value: String,
    pub units: String,
}

impl BiomarkerRecord {
    pub fn new(category: Option<String>, name: impl Into<String>, fields: ResultFields) -> Self {
        Self {
            category,
            name: name.into(),
            status: fields.status,
            value: fields.value,
            units: fields.units,
        }
    }
}

/// Status/value/units triple read from a record's result cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultFields {
    pub status: String,
    pub value: String,
    pub units: String,
}

impl ResultFields {
    /// Interprets result cell texts by how many of them there are.
    ///
    /// | count | mapping                 |
    /// |-------|-------------------------|
    /// | 3     | status, value, units    |
    /// | 2     | status, value           |
    /// | 1     | value                   |
    /// | other | everything left empty   |
    ///
    /// Panels with four or more cells do not follow any known layout, so no
    /// cell is trusted for them.
    pub fn from_positional(texts: &[String]) -> Self {
        match texts {
            [status, value, units] => Self {
                status: status.clone(),
                value: value.clone(),
                units: units.clone(),
            },
            [status, value] => Self {
                status: status.clone(),
                value: value.clone(),
                ..Self::default()
            },
            [value] => Self {
                value: value.clone(),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Replaces the units with text read from a dedicated unit element.
    pub fn with_unit_override(mut self, unit: Option<String>) -> Self {
        if let Some(unit) = unit {
            self.units = unit;
        }
        self
    }
}
