//! Series extraction: a decoded frame plus a static column layout become
//! named, label-aligned series.

use crate::data::frame::{decode, parse_number, Cell, RawFrame, RawRow};
use crate::error::ExtractError;

/// How the first row of a frame is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaLayout {
    /// The frame carries no metadata row; every row is data.
    None,
    /// `[updated_at_epoch_seconds]`
    UpdatedAt,
    /// `[updated_at_epoch_seconds, atm_strike]`
    UpdatedAtWithStrike,
}

/// Non-series context carried by the first row of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaRecord {
    pub updated_at_epoch_seconds: i64,
    pub atm_strike: Option<f64>,
}

impl MetaRecord {
    fn from_row(row: &RawRow, layout: MetaLayout) -> Result<Self, ExtractError> {
        let updated = row
            .number(0)
            .ok_or_else(|| ExtractError::InvalidMeta {
                field: "updated_at",
                value: row.cell_owned(0),
            })?;
        let atm_strike = match layout {
            MetaLayout::UpdatedAtWithStrike => {
                Some(row.number(1).ok_or_else(|| ExtractError::InvalidMeta {
                    field: "atm_strike",
                    value: row.cell_owned(1),
                })?)
            }
            _ => None,
        };
        Ok(Self {
            updated_at_epoch_seconds: updated.trunc() as i64,
            atm_strike,
        })
    }
}

/// One projected column: `key` names the series, `column` is the cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColumn {
    pub key: &'static str,
    pub column: usize,
}

/// Static projection table for one chart variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub meta: MetaLayout,
    pub label_column: usize,
    pub series: &'static [SeriesColumn],
}

/// A named sequence of values aligned with [`SeriesSet::labels`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Series {
    pub key: String,
    pub values: Vec<Cell>,
}

/// Series sharing one label axis. Every series has `labels.len()` entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeriesSet {
    pub labels: Vec<Cell>,
    pub series: Vec<Series>,
}

impl SeriesSet {
    fn with_keys(map: &ColumnMap, capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            series: map
                .series
                .iter()
                .map(|c| Series {
                    key: c.key.to_string(),
                    values: Vec::with_capacity(capacity),
                })
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.key == key)
    }

    /// Number of points per series.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(label, value)` pairs of series `key`.
    pub fn pairs(&self, key: &str) -> Option<impl Iterator<Item = (&Cell, &Cell)>> {
        self.get(key).map(|s| self.labels.iter().zip(s.values.iter()))
    }

    /// Labels parsed as numbers (gaps stay `None`).
    pub fn numeric_labels(&self) -> Vec<Option<f64>> {
        self.labels
            .iter()
            .map(|l| l.as_deref().and_then(parse_number))
            .collect()
    }
}

/// Decode a payload whose first line is a metadata row.
///
/// The first non-empty line is kept as row 0 even when it holds a single
/// cell, which [`decode`] alone would drop. The rest is decoded as usual.
/// With [`MetaLayout::None`] this is plain [`decode`].
pub fn decode_with_meta(text: &str, layout: MetaLayout) -> RawFrame {
    if layout == MetaLayout::None {
        return decode(text);
    }
    let text = text.trim_start_matches(['\r', '\n']);
    let (head, rest) = text.split_once('\n').unwrap_or((text, ""));
    let mut frame = decode(rest);
    if !head.trim().is_empty() {
        frame.rows.insert(0, RawRow::from_fields(head.split(',')));
    }
    frame
}

/// Remove the metadata row from `frame` according to `layout`.
///
/// The row is taken out of the returned data rows so it can never be read
/// as a data point.
pub fn split_meta(
    frame: RawFrame,
    layout: MetaLayout,
) -> Result<(Option<MetaRecord>, Vec<RawRow>), ExtractError> {
    let mut rows = frame.into_rows();
    if layout == MetaLayout::None {
        return Ok((None, rows));
    }
    if rows.is_empty() {
        return Err(ExtractError::MissingMeta);
    }
    let first = rows.remove(0);
    let meta = MetaRecord::from_row(&first, layout)?;
    Ok((Some(meta), rows))
}

/// Split off the metadata row and project every remaining row through `map`.
///
/// Cells stay as text; numeric conversion is left to the consumer. Row order
/// is kept as delivered.
pub fn extract(
    frame: RawFrame,
    map: &ColumnMap,
) -> Result<(Option<MetaRecord>, SeriesSet), ExtractError> {
    let (meta, rows) = split_meta(frame, map.meta)?;
    let mut set = SeriesSet::with_keys(map, rows.len());
    for row in &rows {
        set.labels.push(row.cell_owned(map.label_column));
        for (series, col) in set.series.iter_mut().zip(map.series) {
            series.values.push(row.cell_owned(col.column));
        }
    }
    Ok((meta, set))
}
