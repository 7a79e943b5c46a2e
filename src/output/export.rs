use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::mapper::DisplayRecord;
use crate::output::value_text;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to tabulate: the result set has no columns")]
    NoColumns,

    #[error("failed to serialize record {index}: {source}")]
    Serialize {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {index} is not a flat mapping")]
    NotTabular { index: usize },

    #[error("failed to write csv: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("failed to write export file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Header row plus one row per record, cells aligned to the header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Columns are the union of record keys in first-seen order; missing cells
/// are left empty.
pub fn tabulate(records: &[DisplayRecord]) -> Result<Table, ExportError> {
    let mut objects: Vec<Map<String, Value>> = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match serde_json::to_value(record)
            .map_err(|source| ExportError::Serialize { index, source })?
        {
            Value::Object(obj) => objects.push(obj),
            _ => return Err(ExportError::NotTabular { index }),
        }
    }

    let mut headers: Vec<String> = Vec::new();
    for obj in objects.iter() {
        for key in obj.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }
    if headers.is_empty() {
        return Err(ExportError::NoColumns);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(value_text).unwrap_or_default())
                .collect()
        })
        .collect();
    Ok(Table { headers, rows })
}

pub fn write_csv<W: Write>(writer: W, table: &Table) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.headers)
        .map_err(|source| ExportError::Csv { source })?;
    for row in table.rows.iter() {
        wtr.write_record(row)
            .map_err(|source| ExportError::Csv { source })?;
    }
    wtr.flush().map_err(|e| ExportError::Csv { source: e.into() })?;
    Ok(())
}

pub fn render_csv(records: &[DisplayRecord]) -> Result<Vec<u8>, ExportError> {
    let table = tabulate(records)?;
    let mut buf = Vec::new();
    write_csv(&mut buf, &table)?;
    Ok(buf)
}

/// `numinfo_<term>.csv`, with path separators and NUL replaced by `_`.
pub fn export_file_name(term: &str) -> String {
    let safe: String = term
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();
    format!("numinfo_{safe}.csv")
}

pub fn export_to_dir(
    dir: &Path,
    term: &str,
    records: &[DisplayRecord],
) -> Result<PathBuf, ExportError> {
    let rendered = render_csv(records)?;
    let path = dir.join(export_file_name(term));
    std::fs::write(&path, rendered).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = records.len(), "wrote csv export");
    Ok(path)
}
