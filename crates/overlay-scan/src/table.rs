use overlay_scan_types::{RegionSet, Strategy, TextRole};

/// One cell of the result table. Absence is a first-class state, distinct
/// from zero and from the empty string, and survives post-processing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Absent,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// Extraction outcome for one region in one sample.
#[derive(Debug, Clone, Default)]
pub struct RegionReading {
    pub value: Cell,
    pub confidence: Option<f32>,
}

/// One row of the result table, keyed by sample index.
#[derive(Debug, Clone)]
pub struct SampleRecord {
    pub index: u64,
    pub time: f64,
    pub readings: Vec<RegionReading>,
}

#[derive(Debug, Clone)]
struct RegionColumn {
    name: String,
    text: bool,
    timestamp: bool,
}

/// Ordered rows by increasing sample index; columns are `time` plus each
/// region's value column (and `<name>_confidence` for text regions when
/// confidence recording is enabled), in region-declaration order.
#[derive(Debug, Clone)]
pub struct ResultTable {
    columns: Vec<RegionColumn>,
    record_confidence: bool,
    records: Vec<SampleRecord>,
}

impl ResultTable {
    pub fn new(regions: &RegionSet, record_confidence: bool) -> Self {
        let columns = regions
            .iter()
            .map(|region| RegionColumn {
                name: region.name.clone(),
                text: region.strategy == Strategy::Text,
                timestamp: region.strategy == Strategy::Text
                    && region.text_role() == TextRole::Timestamp,
            })
            .collect();
        Self {
            columns,
            record_confidence,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: SampleRecord) {
        debug_assert_eq!(record.readings.len(), self.columns.len());
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn record_confidence(&self) -> bool {
        self.record_confidence
    }

    /// True for columns whose confidence is emitted alongside the value.
    pub(crate) fn confidence_column(&self, index: usize) -> bool {
        self.record_confidence && self.columns[index].text
    }

    /// Header row: `time`, then per region the value column and, for text
    /// regions with confidence recording on, `<name>_confidence`.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec!["time".to_string()];
        for (index, column) in self.columns.iter().enumerate() {
            headers.push(column.name.clone());
            if self.confidence_column(index) {
                headers.push(format!("{}_confidence", column.name));
            }
        }
        headers
    }

    fn timestamp_column(&self) -> Option<usize> {
        self.columns.iter().position(|column| column.timestamp)
    }

    pub(crate) fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Parse `HH:MM:SS:FF` into minutes, discarding the frame field. Anything
/// that is not exactly four colon-separated integers yields no value.
pub fn time_string_to_minutes(text: &str) -> Option<f64> {
    let mut parts = text.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = parts.next()?.parse().ok()?;
    let _frames: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let total_seconds = hours * 3600 + minutes * 60 + seconds;
    Some(total_seconds as f64 / 60.0)
}

/// Normalize the timestamp column, repair its internal gaps, and coerce every
/// column to numbers where possible.
///
/// 1. The timestamp-role column's text cells are parsed to minutes; malformed
///    or non-text cells become absent rather than erroring.
/// 2. Internal gaps in that column are linearly interpolated by row position;
///    leading and trailing gaps stay absent. This compensates for transient
///    recognition failures on the timestamp region specifically.
/// 3. Every region column is then coerced to numbers all-or-nothing: one
///    unparseable non-absent cell nulls the entire column, so mixed columns
///    are never silently truncated.
pub fn post_process(table: &mut ResultTable) {
    if let Some(column) = table.timestamp_column() {
        parse_timestamp_column(table, column);
        interpolate_column(table, column);
    }
    for column in 0..table.column_count() {
        coerce_column(table, column);
    }
}

fn parse_timestamp_column(table: &mut ResultTable, column: usize) {
    for record in &mut table.records {
        let parsed = match &record.readings[column].value {
            Cell::Text(text) => time_string_to_minutes(text).map(Cell::Number),
            _ => None,
        };
        record.readings[column].value = parsed.unwrap_or(Cell::Absent);
    }
}

/// Linear interpolation between the nearest known neighbors, by row position.
fn interpolate_column(table: &mut ResultTable, column: usize) {
    let known: Vec<(usize, f64)> = table
        .records
        .iter()
        .enumerate()
        .filter_map(|(row, record)| {
            record.readings[column]
                .value
                .as_number()
                .map(|value| (row, value))
        })
        .collect();

    if known.len() < 2 {
        return;
    }

    for pair in known.windows(2) {
        let (start_row, start_value) = pair[0];
        let (end_row, end_value) = pair[1];
        let span = (end_row - start_row) as f64;
        for row in start_row + 1..end_row {
            let t = (row - start_row) as f64 / span;
            table.records[row].readings[column].value =
                Cell::Number(start_value + t * (end_value - start_value));
        }
    }
}

/// All-or-nothing numeric coercion for one region column.
fn coerce_column(table: &mut ResultTable, column: usize) {
    let mut coerced = Vec::with_capacity(table.records.len());
    for record in &table.records {
        let cell = match &record.readings[column].value {
            Cell::Absent => Cell::Absent,
            Cell::Number(value) => Cell::Number(*value),
            Cell::Text(text) => match text.parse::<f64>() {
                Ok(value) => Cell::Number(value),
                Err(_) => {
                    // Not fully numeric: null the whole column.
                    for record in &mut table.records {
                        record.readings[column].value = Cell::Absent;
                    }
                    return;
                }
            },
        };
        coerced.push(cell);
    }
    for (record, value) in table.records.iter_mut().zip(coerced) {
        record.readings[column].value = value;
    }
}
