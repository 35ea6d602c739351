use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ColumnKind – how a single field is interpreted
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// IEEE-754 double.
    Float,
    /// Signed 64-bit integer.
    Integer,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Integer => write!(f, "integer"),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnSchema – ordered column descriptors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn float(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ColumnKind::Float,
        }
    }

    pub fn integer(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ColumnKind::Integer,
        }
    }
}

/// Describes how to interpret each field of a data row, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSchema {
    columns: Vec<ColumnSpec>,
}

impl ColumnSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Position of the named column, if declared.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    // -- Presets for the simulator output formats --

    /// `spikes.csv`: spike time and the id of the neuron that fired.
    pub fn spikes() -> Self {
        Self::new(vec![ColumnSpec::float("time"), ColumnSpec::integer("neuron_id")])
    }

    /// `voltages.csv`: one row per (sample, neuron), neurons interleaved.
    pub fn voltages() -> Self {
        Self::new(vec![
            ColumnSpec::float("time"),
            ColumnSpec::integer("neuron_index"),
            ColumnSpec::float("voltage"),
        ])
    }

    /// `stim.csv`: the two external input conductances, no time column.
    pub fn stimulus() -> Self {
        Self::new(vec![
            ColumnSpec::float("channel_a"),
            ColumnSpec::float("channel_b"),
        ])
    }

    /// `data.csv` from the AdEx model: signals followed by the RK4 slopes.
    pub fn adaptation() -> Self {
        let mut columns = vec![
            ColumnSpec::float("time"),
            ColumnSpec::float("voltage"),
            ColumnSpec::float("adaptation"),
        ];
        columns.extend((1..=4).map(|k| ColumnSpec::float(&format!("dv{k}"))));
        columns.extend((1..=4).map(|k| ColumnSpec::float(&format!("dw{k}"))));
        Self::new(columns)
    }
}
