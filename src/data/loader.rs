use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{LoadError, LoadResult};
use super::model::{ChannelGroup, ColumnValues, ParsedTable};
use super::schema::{ColumnKind, ColumnSchema};

// ---------------------------------------------------------------------------
// RecordingFile – where a table lives and how to read it
// ---------------------------------------------------------------------------

/// What to do with the header row of a file that has one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    /// Discard the first row without looking at it.
    #[default]
    Skip,
    /// Discard the first row, but only if its field count matches the schema.
    Validate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordingFile {
    pub path: PathBuf,
    pub delimiter: u8,
    pub has_header: bool,
    pub header_mode: HeaderMode,
    pub schema: ColumnSchema,
}

impl RecordingFile {
    /// Comma-delimited file with a header row that is skipped unchecked.
    pub fn new(path: impl Into<PathBuf>, schema: ColumnSchema) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
            has_header: true,
            header_mode: HeaderMode::Skip,
            schema,
        }
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_header_mode(mut self, mode: HeaderMode) -> Self {
        self.header_mode = mode;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a recording file into named, typed columns.
///
/// The file handle lives only for the duration of this call.
pub fn load(file: &RecordingFile) -> LoadResult<ParsedTable> {
    let handle = File::open(&file.path).map_err(|source| LoadError::SourceUnavailable {
        path: file.path.clone(),
        source,
    })?;
    load_reader(handle, file)
}

/// Same as [`load`], reading from an already open source.
/// `file.path` is only used to label I/O errors.
pub fn load_reader<R: io::Read>(source: R, file: &RecordingFile) -> LoadResult<ParsedTable> {
    if file.schema.is_empty() {
        return Err(LoadError::EmptySchema);
    }
    let mut seen = HashSet::new();
    if let Some(name) = file.schema.names().find(|name| !seen.insert(*name)) {
        return Err(LoadError::DuplicateColumn(name.to_string()));
    }

    let rows = read_rows(source, file)?;
    let row_count = rows.len();
    let raw_columns = zip_columns(rows)?;

    // Zero rows zip to zero columns; every schema column is then empty.
    let columns = file
        .schema
        .columns()
        .iter()
        .enumerate()
        .map(|(i, spec)| -> LoadResult<(String, ColumnValues)> {
            let raw = raw_columns.get(i).map(Vec::as_slice).unwrap_or(&[]);
            let values = parse_column(&spec.name, spec.kind, raw)?;
            Ok((spec.name.clone(), values))
        })
        .collect::<LoadResult<Vec<_>>>()?;

    Ok(ParsedTable::from_columns(columns, row_count))
}

/// Transpose row-major string fields into one vector per column.
pub fn zip_columns(rows: Vec<Vec<String>>) -> LoadResult<Vec<Vec<String>>> {
    let Some(width) = rows.first().map(Vec::len) else {
        return Ok(Vec::new());
    };

    let mut columns: Vec<Vec<String>> = (0..width)
        .map(|_| Vec::with_capacity(rows.len()))
        .collect();

    for (row, fields) in rows.into_iter().enumerate() {
        if fields.len() != width {
            return Err(LoadError::RaggedTable {
                row,
                expected: width,
                found: fields.len(),
            });
        }
        for (column, field) in columns.iter_mut().zip(fields) {
            column.push(field);
        }
    }

    Ok(columns)
}

/// Split a flat row-major sequence into `[sample][channel]` rows.
pub fn reshape_to_channels<T>(sequence: Vec<T>, channels: usize) -> LoadResult<ChannelGroup<T>> {
    if channels == 0 {
        return Err(LoadError::InvalidChannelCount);
    }
    if sequence.len() % channels != 0 {
        return Err(LoadError::NotDivisible {
            len: sequence.len(),
            channels,
        });
    }

    let sample_count = sequence.len() / channels;
    let mut values = sequence.into_iter();
    let samples = (0..sample_count)
        .map(|_| values.by_ref().take(channels).collect())
        .collect();

    Ok(ChannelGroup::from_rows(channels, samples))
}

// ---------------------------------------------------------------------------
// Raw row reading
// ---------------------------------------------------------------------------

fn read_rows<R: io::Read>(source: R, file: &RecordingFile) -> LoadResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(file.delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let expected = file.schema.len();

    // Raw bytes: a header in any encoding is skipped without being decoded.
    if file.has_header {
        let mut header = csv::ByteRecord::new();
        let found = reader
            .read_byte_record(&mut header)
            .map_err(|e| csv_error(e, &file.path))?;
        if found && file.header_mode == HeaderMode::Validate && header.len() != expected {
            return Err(LoadError::HeaderMismatch {
                expected,
                found: header.len(),
            });
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(e, &file.path))?;
        if record.len() != expected {
            return Err(LoadError::MalformedRow {
                line: record.position().map_or(0, |p| p.line()),
                expected,
                found: record.len(),
            });
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

fn csv_error(err: csv::Error, path: &Path) -> LoadError {
    let line = err.position().map_or(0, |p| p.line());
    if !err.is_io_error() {
        return LoadError::Decode { line, source: err };
    }
    let source = match err.into_kind() {
        csv::ErrorKind::Io(source) => source,
        other => io::Error::other(format!("{other:?}")),
    };
    LoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Typed parsing
// ---------------------------------------------------------------------------

fn parse_column(name: &str, kind: ColumnKind, raw: &[String]) -> LoadResult<ColumnValues> {
    let fail = |row: usize, value: &str| LoadError::ParseError {
        column: name.to_string(),
        row,
        value: value.to_string(),
        kind,
    };

    match kind {
        ColumnKind::Float => raw
            .iter()
            .enumerate()
            .map(|(row, s)| s.parse::<f64>().map_err(|_| fail(row, s)))
            .collect::<LoadResult<Vec<_>>>()
            .map(ColumnValues::Float),
        ColumnKind::Integer => raw
            .iter()
            .enumerate()
            .map(|(row, s)| s.parse::<i64>().map_err(|_| fail(row, s)))
            .collect::<LoadResult<Vec<_>>>()
            .map(ColumnValues::Integer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::ColumnSpec;

    fn time_id_schema() -> ColumnSchema {
        ColumnSchema::new(vec![ColumnSpec::float("time"), ColumnSpec::integer("id")])
    }

    fn load_str(text: &str, file: &RecordingFile) -> LoadResult<ParsedTable> {
        load_reader(text.as_bytes(), file)
    }

    #[test]
    fn skips_header_and_parses_columns() {
        let file = RecordingFile::new("mem", time_id_schema());
        let table = load_str("t,id\n1.0,0\n2.5,1\n4.0,0\n", &file).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.floats("time"), Some(&[1.0, 2.5, 4.0][..]));
        assert_eq!(table.integers("id"), Some(&[0, 1, 0][..]));
    }

    #[test]
    fn header_content_is_not_inspected_by_default() {
        let file = RecordingFile::new("mem", time_id_schema());
        let table = load_str("Time [ms], Neuron ID, extra\n1.0,0\n", &file).unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn non_utf8_header_is_skipped() {
        let file = RecordingFile::new("mem", ColumnSchema::voltages());
        let text = b"Time [ms], Neuron number, Membrane voltage [\xb5V]\n0.0, 0, -60.0\n";
        let table = load_reader(&text[..], &file).unwrap();
        assert_eq!(table.floats("voltage"), Some(&[-60.0][..]));

        let strict = file.with_header_mode(HeaderMode::Validate);
        assert_eq!(load_reader(&text[..], &strict).unwrap().row_count(), 1);
    }

    #[test]
    fn non_utf8_data_row_is_still_a_decode_error() {
        let file = RecordingFile::new("mem", time_id_schema());
        let err = load_reader(&b"t,id\n\xb5,0\n"[..], &file).unwrap_err();
        assert!(matches!(err, LoadError::Decode { line: 2, .. }));
    }

    #[test]
    fn duplicate_column_names_are_rejected() {
        let schema = ColumnSchema::new(vec![ColumnSpec::float("t"), ColumnSpec::integer("t")]);
        let file = RecordingFile::new("mem", schema).with_header(false);
        match load_str("1.0,0\n", &file) {
            Err(LoadError::DuplicateColumn(name)) => assert_eq!(name, "t"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn validate_mode_rejects_header_of_wrong_width() {
        let file =
            RecordingFile::new("mem", time_id_schema()).with_header_mode(HeaderMode::Validate);
        let err = load_str("a,b,c\n1.0,0\n", &file).unwrap_err();
        assert!(matches!(err, LoadError::HeaderMismatch { expected: 2, found: 3 }));

        assert!(load_str("a,b\n1.0,0\n", &file).is_ok());
    }

    #[test]
    fn trims_space_after_delimiter() {
        let file = RecordingFile::new("mem", time_id_schema()).with_header(false);
        let table = load_str("0.1, 3\n0.2, 4\n", &file).unwrap();
        assert_eq!(table.floats("time"), Some(&[0.1, 0.2][..]));
        assert_eq!(table.integers("id"), Some(&[3, 4][..]));
    }

    #[test]
    fn first_row_is_data_without_header() {
        let file = RecordingFile::new("mem", time_id_schema()).with_header(false);
        let table = load_str("1.0,0\n2.0,1\n", &file).unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn header_only_file_gives_empty_columns() {
        let file = RecordingFile::new("mem", time_id_schema());
        let table = load_str("t,id\n", &file).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.floats("time"), Some(&[][..]));
        assert_eq!(table.integers("id"), Some(&[][..]));
    }

    #[test]
    fn wrong_field_count_is_malformed_row() {
        let file = RecordingFile::new("mem", time_id_schema());
        let err = load_str("t,id\n1.0,0\n2.0\n3.0,1\n", &file).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedRow { line: 3, expected: 2, found: 1 }
        ));
    }

    #[test]
    fn bad_integer_is_parse_error() {
        let file = RecordingFile::new("mem", time_id_schema());
        let err = load_str("t,id\n1.0,0\n2.0,1.5\n", &file).unwrap_err();
        match err {
            LoadError::ParseError { column, row, value, kind } => {
                assert_eq!(column, "id");
                assert_eq!(row, 1);
                assert_eq!(value, "1.5");
                assert_eq!(kind, ColumnKind::Integer);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_schema_is_rejected() {
        let file = RecordingFile::new("mem", ColumnSchema::default());
        assert!(matches!(load_str("1\n", &file), Err(LoadError::EmptySchema)));
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let file = RecordingFile::new("/definitely/not/here.csv", time_id_schema());
        assert!(matches!(load(&file), Err(LoadError::SourceUnavailable { .. })));
    }

    struct FailingReader;

    impl io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn read_failure_mid_stream_is_source_unavailable() {
        let file = RecordingFile::new("pipe.csv", time_id_schema());
        match load_reader(FailingReader, &file) {
            Err(LoadError::SourceUnavailable { path, source }) => {
                assert_eq!(path, Path::new("pipe.csv"));
                assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn custom_delimiter() {
        let file = RecordingFile::new("mem", time_id_schema())
            .with_header(false)
            .with_delimiter(b';');
        let table = load_str("1.5;2\n", &file).unwrap();
        assert_eq!(table.integers("id"), Some(&[2][..]));
    }

    #[test]
    fn zip_transposes_rows() {
        let rows = vec![
            vec!["1".to_string(), "a".to_string()],
            vec!["2".to_string(), "b".to_string()],
        ];
        let cols = zip_columns(rows).unwrap();
        assert_eq!(cols, vec![vec!["1", "2"], vec!["a", "b"]]);
    }

    #[test]
    fn zip_then_parse_recovers_values() {
        let values = [0.25, -3.0, 1e-3, 42.0];
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, v)| vec![v.to_string(), i.to_string()])
            .collect();
        let cols = zip_columns(rows).unwrap();

        let floats = parse_column("v", ColumnKind::Float, &cols[0]).unwrap();
        let ints = parse_column("i", ColumnKind::Integer, &cols[1]).unwrap();
        assert_eq!(floats, ColumnValues::Float(values.to_vec()));
        assert_eq!(ints, ColumnValues::Integer(vec![0, 1, 2, 3]));
    }

    #[test]
    fn zip_rejects_ragged_rows() {
        let rows = vec![vec!["1".to_string(), "2".to_string()], vec!["3".to_string()]];
        assert!(matches!(
            zip_columns(rows),
            Err(LoadError::RaggedTable { row: 1, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn zip_of_nothing_is_nothing() {
        assert!(zip_columns(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn reshape_into_rows_of_channels() {
        let group = reshape_to_channels((1..=8).collect::<Vec<i32>>(), 4).unwrap();
        assert_eq!(group.rows(), &[vec![1, 2, 3, 4], vec![5, 6, 7, 8]]);
    }

    #[test]
    fn reshape_flatten_is_identity() {
        let seq: Vec<u32> = (0..30).collect();
        for channels in [1, 2, 3, 5, 6, 10, 15, 30] {
            let group = reshape_to_channels(seq.clone(), channels).unwrap();
            assert_eq!(group.sample_count(), 30 / channels);
            assert!(group.rows().iter().all(|r| r.len() == channels));
            assert_eq!(group.flatten(), seq);
        }
    }

    #[test]
    fn reshape_rejects_uneven_length() {
        let err = reshape_to_channels((1..=7).collect::<Vec<i32>>(), 4).unwrap_err();
        assert!(matches!(err, LoadError::NotDivisible { len: 7, channels: 4 }));
    }

    #[test]
    fn reshape_of_empty_sequence_has_no_rows() {
        let group = reshape_to_channels(Vec::<f64>::new(), 3).unwrap();
        assert!(group.is_empty());
        assert_eq!(group.channel_count(), 3);
    }

    #[test]
    fn reshape_rejects_zero_channels() {
        assert!(matches!(
            reshape_to_channels(vec![1.0], 0),
            Err(LoadError::InvalidChannelCount)
        ));
    }
}
