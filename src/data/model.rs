// ---------------------------------------------------------------------------
// ColumnValues – one typed column of a parsed table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Float(Vec<f64>),
    Integer(Vec<i64>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Float(v) => v.len(),
            ColumnValues::Integer(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            ColumnValues::Float(v) => Some(v),
            ColumnValues::Integer(_) => None,
        }
    }

    pub fn as_integers(&self) -> Option<&[i64]> {
        match self {
            ColumnValues::Integer(v) => Some(v),
            ColumnValues::Float(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ParsedTable – the result of loading one recording file
// ---------------------------------------------------------------------------

/// Named, row-aligned numeric columns in schema order.
///
/// Every column has exactly [`ParsedTable::row_count`] values.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    columns: Vec<(String, ColumnValues)>,
    row_count: usize,
}

impl ParsedTable {
    /// Callers guarantee every column has `row_count` values.
    pub(crate) fn from_columns(columns: Vec<(String, ColumnValues)>, row_count: usize) -> Self {
        debug_assert!(columns.iter().all(|(_, c)| c.len() == row_count));
        Self { columns, row_count }
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Column names are unique; the loader rejects schemas that repeat one.
    pub fn column(&self, name: &str) -> Option<&ColumnValues> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values)
    }

    pub fn floats(&self, name: &str) -> Option<&[f64]> {
        self.column(name)?.as_floats()
    }

    pub fn integers(&self, name: &str) -> Option<&[i64]> {
        self.column(name)?.as_integers()
    }

    /// Move a float column out of the table, leaving an empty one behind.
    pub fn take_floats(&mut self, name: &str) -> Option<Vec<f64>> {
        self.columns.iter_mut().find(|(n, _)| n == name).and_then(|(_, values)| match values {
            ColumnValues::Float(v) => Some(std::mem::take(v)),
            ColumnValues::Integer(_) => None,
        })
    }

    /// Move an integer column out of the table, leaving an empty one behind.
    pub fn take_integers(&mut self, name: &str) -> Option<Vec<i64>> {
        self.columns.iter_mut().find(|(n, _)| n == name).and_then(|(_, values)| match values {
            ColumnValues::Integer(v) => Some(std::mem::take(v)),
            ColumnValues::Float(_) => None,
        })
    }
}

// ---------------------------------------------------------------------------
// ChannelGroup – flat row-major samples reshaped to [sample][channel]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelGroup<T> {
    channels: usize,
    samples: Vec<Vec<T>>,
}

impl<T> ChannelGroup<T> {
    /// Callers guarantee `channels >= 1` and every row holds `channels` values.
    pub(crate) fn from_rows(channels: usize, samples: Vec<Vec<T>>) -> Self {
        debug_assert!(channels >= 1);
        debug_assert!(samples.iter().all(|row| row.len() == channels));
        Self { channels, samples }
    }

    pub fn channel_count(&self) -> usize {
        self.channels
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.samples
    }

    /// All channels at one sample index.
    pub fn sample(&self, index: usize) -> Option<&[T]> {
        self.samples.get(index).map(Vec::as_slice)
    }

    /// One channel across every sample, in sample order.
    pub fn channel(&self, index: usize) -> impl Iterator<Item = &T> + '_ {
        self.samples.iter().filter_map(move |row| row.get(index))
    }

    /// Undo the reshape, restoring the original row-major order.
    pub fn flatten(self) -> Vec<T> {
        self.samples.into_iter().flatten().collect()
    }
}

impl<T: Copy> ChannelGroup<T> {
    pub fn channel_series(&self, index: usize) -> Vec<T> {
        self.channel(index).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ParsedTable {
        ParsedTable::from_columns(
            vec![
                ("time".to_string(), ColumnValues::Float(vec![0.5, 1.5])),
                ("id".to_string(), ColumnValues::Integer(vec![3, 1])),
            ],
            2,
        )
    }

    #[test]
    fn typed_accessors_respect_column_kind() {
        let t = table();
        assert_eq!(t.floats("time"), Some(&[0.5, 1.5][..]));
        assert_eq!(t.integers("id"), Some(&[3, 1][..]));
        assert!(t.floats("id").is_none());
        assert!(t.integers("missing").is_none());
        assert_eq!(t.column_names().collect::<Vec<_>>(), ["time", "id"]);
    }

    #[test]
    fn take_moves_column_out() {
        let mut t = table();
        assert_eq!(t.take_integers("id"), Some(vec![3, 1]));
        assert_eq!(t.integers("id"), Some(&[][..]));
        assert!(t.take_floats("id").is_none());
    }

    #[test]
    fn channel_views() {
        let group = ChannelGroup::from_rows(2, vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
        assert_eq!(group.sample_count(), 3);
        assert_eq!(group.channel_series(1), vec![2, 4, 6]);
        assert_eq!(group.sample(1), Some(&[3, 4][..]));
        assert!(group.sample(3).is_none());
        assert_eq!(group.flatten(), vec![1, 2, 3, 4, 5, 6]);
    }
}
