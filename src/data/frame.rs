//! Frame decoding: raw comma-separated text into rows of nullable cells.
//!
//! The decoder is deliberately lenient. Garbled or truncated telemetry must
//! not stop the rest of a payload from being charted, so rows that do not
//! look like data are dropped instead of reported.

/// A single cell: `None` for an empty field, otherwise the raw text.
pub type Cell = Option<String>;

/// One decoded line. Always holds at least two cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow(pub Vec<Cell>);

impl RawRow {
    /// Build a row from string slices, mapping `""` to `None`.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        RawRow(
            fields
                .into_iter()
                .map(|f| if f.is_empty() { None } else { Some(f.to_string()) })
                .collect(),
        )
    }

    /// Text of cell `idx`; missing and null cells both read as `None`.
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).and_then(|c| c.as_deref())
    }

    /// Owned copy of cell `idx`, `None` when absent or null.
    pub fn cell_owned(&self, idx: usize) -> Cell {
        self.0.get(idx).cloned().flatten()
    }

    /// Cell `idx` parsed as a number. Null, absent and non-numeric cells are `None`.
    pub fn number(&self, idx: usize) -> Option<f64> {
        self.cell(idx).and_then(parse_number)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rows of one payload in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawFrame {
    pub rows: Vec<RawRow>,
}

impl RawFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<RawRow> {
        self.rows
    }
}

impl From<Vec<RawRow>> for RawFrame {
    fn from(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

/// Decode a text payload into a [`RawFrame`].
///
/// Lines are split on `\n` and cells on `,`. Empty cells become `None`.
/// Any line with one cell or fewer (blank lines, the trailing newline) is
/// dropped. A `\r` before the newline is kept as part of the last cell's
/// text, which numeric parsing tolerates.
///
/// ```
/// # use ivplot::data::frame::decode;
/// let frame = decode("1,2\n\n3,4,5\n");
/// assert_eq!(frame.len(), 2);
/// assert_eq!(frame.rows[1].cell(2), Some("5"));
/// ```
pub fn decode(text: &str) -> RawFrame {
    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for line in text.split('\n') {
        let row = RawRow::from_fields(line.split(','));
        if row.len() > 1 {
            rows.push(row);
        } else {
            dropped += 1;
        }
    }
    if dropped > 1 {
        // one dropped line is the usual trailing newline
        log::debug!("decode: dropped {dropped} lines without cell separators");
    }
    RawFrame { rows }
}

/// Parse a numeric cell, ignoring surrounding whitespace (including `\r`).
pub fn parse_number(text: &str) -> Option<f64> {
    let v: f64 = text.trim().parse().ok()?;
    v.is_finite().then_some(v)
}
