//! Raw tabular input.
//!
//! Reads a delimited file with a header row into [`RawTable`]. Some exports of
//! the movie dataset carry a trailing column with an empty header, which only
//! ever holds overflow from rows whose free-text fields were split badly. Rows
//! with data in such a column are dropped along with the column itself.

use std::{collections::HashMap, io, path::Path};

use csv::ReaderBuilder;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, TableError};

const UNNAMED_PREFIX: &str = "Unnamed:";

/// Cell contents read back as missing, matching the common dataframe exports.
const MISSING_SENTINELS: [&str; 17] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "n/a", "nan",
];

#[derive(Clone, Debug, Default)]
pub struct RawRow {
    /// 0-based position among the data rows of the file.
    pub index: usize,
    values: HashMap<String, String>,
}

impl RawRow {
    /// Raw cell value; `None` when the cell is missing.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Indices of rows dropped for carrying overflow data.
    pub malformed: Vec<usize>,
}

impl RawTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Header and the first `rows` rows as tab-separated text.
    pub fn preview(&self, rows: usize) -> String {
        let mut out = self.columns.join("\t");
        out.push('\n');
        for row in self.rows.iter().take(rows) {
            let cells: Vec<&str> = self.columns.iter().map(|c| row.get(c).unwrap_or("")).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }
}

pub fn load_table(path: &Path) -> AppResult<RawTable> {
    info!(path = %path.display(), "loading dataset");

    let load_err = |source| AppError::Load { path: path.to_path_buf(), source };
    let reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| load_err(e.into()))?;
    let table = read_records(reader).map_err(load_err)?;

    info!(
        path = %path.display(),
        rows = table.rows.len(),
        malformed = table.malformed.len(),
        "loaded dataset"
    );
    Ok(table)
}

/// Same as [`load_table`] over any reader; used for in-memory input.
pub fn read_table<R: io::Read>(input: R) -> Result<RawTable, TableError> {
    read_records(ReaderBuilder::new().flexible(true).from_reader(input))
}

fn read_records<R: io::Read>(mut reader: csv::Reader<R>) -> Result<RawTable, TableError> {
    if reader.headers()?.is_empty() {
        return Err(TableError::MissingHeader);
    }

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let name = name.trim();
            if name.is_empty() { format!("{UNNAMED_PREFIX} {i}") } else { name.to_string() }
        })
        .collect();

    let spurious: Vec<usize> = header
        .iter()
        .enumerate()
        .filter(|(i, name)| is_spurious_column(*i, name))
        .map(|(i, _)| i)
        .collect();
    for &i in &spurious {
        warn!(column = %header[i], "found suspicious trailing column");
    }

    let mut table = RawTable {
        columns: header
            .iter()
            .enumerate()
            .filter(|(i, _)| !spurious.contains(i))
            .map(|(_, name)| name.clone())
            .collect(),
        ..Default::default()
    };

    for (index, record) in reader.records().enumerate() {
        let record = record?;

        let overflow = record.len() > header.len()
            || spurious.iter().any(|&i| record.get(i).is_some_and(|v| !is_missing(v)));
        if overflow {
            warn!(row = index, "skipping malformed record");
            table.malformed.push(index);
            continue;
        }

        let values = header
            .iter()
            .enumerate()
            .filter(|(i, _)| !spurious.contains(i))
            .filter_map(|(i, name)| {
                let value = record.get(i)?;
                (!is_missing(value)).then(|| (name.clone(), value.to_string()))
            })
            .collect();

        table.rows.push(RawRow { index, values });
    }

    debug!(columns = table.columns.len(), rows = table.rows.len(), "parsed tabular input");
    Ok(table)
}

/// An unnamed column anywhere but first; position 0 is a legitimate index column.
fn is_spurious_column(position: usize, name: &str) -> bool {
    let Some(id) = name.strip_prefix(UNNAMED_PREFIX) else {
        return false;
    };
    position != 0 && id.trim() != "0"
}

fn is_missing(value: &str) -> bool {
    MISSING_SENTINELS.contains(&value)
}
