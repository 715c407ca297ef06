use log::debug;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::modules::emotion::Emotion;
use crate::modules::render::RenderError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("File '{0}' not found. Make sure it is in the same folder as the program.")]
    MissingFile(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported CSV schema: {0}")]
    UnsupportedSchema(String),

    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue { column: String, row: usize, value: String },

    #[error("Column '{column}' has {found} values, expected {expected}")]
    LengthMismatch { column: String, expected: usize, found: usize },

    #[error("The session file contains no rows")]
    Empty,

    #[error("Chart error: {0}")]
    Render(#[from] RenderError),
}

/// A wide session CSV held column-wise. Only the emotions present in the file
/// have a column, kept in vocabulary order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionTable {
    columns: Vec<(Emotion, Vec<f64>)>,
    time: Option<Vec<f64>>,
    rows: usize,
}

impl SessionTable {
    /// Every emotion column and `time` must hold the same number of values.
    pub fn from_columns(columns: Vec<(Emotion, Vec<f64>)>, time: Option<Vec<f64>>) -> Result<Self, ReportError> {
        let mut columns = columns;
        columns.sort_by_key(|(emotion, _)| emotion.index());
        let rows = columns
            .first()
            .map(|(_, values)| values.len())
            .or_else(|| time.as_ref().map(Vec::len))
            .unwrap_or(0);

        let lengths = columns
            .iter()
            .map(|(emotion, values)| (emotion.as_str(), values.len()))
            .chain(time.as_ref().map(|time| ("time", time.len())));
        for (column, found) in lengths {
            if found != rows {
                return Err(ReportError::LengthMismatch {
                    column: column.to_string(),
                    expected: rows,
                    found,
                });
            }
        }

        Ok(Self { columns, time, rows })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn emotions(&self) -> impl Iterator<Item = Emotion> + '_ {
        self.columns.iter().map(|(emotion, _)| *emotion)
    }

    pub fn column(&self, emotion: Emotion) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(e, _)| *e == emotion)
            .map(|(_, values)| values.as_slice())
    }

    pub fn columns(&self) -> &[(Emotion, Vec<f64>)] {
        &self.columns
    }

    pub fn time(&self) -> Option<&[f64]> {
        self.time.as_deref()
    }
}

pub fn load_session_csv(path: &Path) -> Result<SessionTable, ReportError> {
    if !path.exists() {
        return Err(ReportError::MissingFile(path.to_path_buf()));
    }
    let table = parse_session_csv(std::fs::File::open(path)?)?;
    debug!("Loaded {} rows from {}", table.rows(), path.display());
    Ok(table)
}

/// Reads the wide schema. Emotion columns may use either the raw names or the
/// report names (`focused`, `thoughtful`); the time column may be `time` or
/// `tempo`. Other columns, `timestamp` included, are ignored.
pub fn parse_session_csv<R: Read>(reader: R) -> Result<SessionTable, ReportError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut emotion_columns: Vec<(usize, Emotion)> = Vec::new();
    let mut time_column = None;
    for (index, header) in headers.iter().enumerate() {
        let name = header.trim().to_ascii_lowercase();
        if name == "time" || name == "tempo" {
            if time_column.is_none() {
                time_column = Some(index);
            }
        } else if let Some(emotion) = Emotion::from_name(&name) {
            if !emotion_columns.iter().any(|(_, e)| *e == emotion) {
                emotion_columns.push((index, emotion));
            }
        }
    }

    if emotion_columns.is_empty() {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_ascii_lowercase()).collect();
        if lowered.iter().any(|h| h == "emotion") && lowered.iter().any(|h| h == "intensity") {
            return Err(ReportError::UnsupportedSchema(
                "long format {minute, emotion, intensity} is not supported; expected one column per emotion".to_string(),
            ));
        }
        return Err(ReportError::UnsupportedSchema(format!(
            "no emotion columns found in header '{}'",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); emotion_columns.len()];
    let mut time: Option<Vec<f64>> = time_column.map(|_| Vec::new());

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for ((index, _), column) in emotion_columns.iter().zip(values.iter_mut()) {
            column.push(parse_cell(&record, *index, &headers, row)?);
        }
        if let (Some(index), Some(time)) = (time_column, time.as_mut()) {
            time.push(parse_cell(&record, index, &headers, row)?);
        }
    }

    let columns = emotion_columns
        .into_iter()
        .map(|(_, emotion)| emotion)
        .zip(values)
        .collect();
    SessionTable::from_columns(columns, time)
}

fn parse_cell(record: &csv::StringRecord, index: usize, headers: &csv::StringRecord, row: usize) -> Result<f64, ReportError> {
    let raw = record.get(index).unwrap_or("").trim();
    raw.parse::<f64>().map_err(|_| ReportError::InvalidValue {
        column: headers.get(index).unwrap_or("").to_string(),
        row,
        value: raw.to_string(),
    })
}
