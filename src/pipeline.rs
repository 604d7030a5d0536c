use std::{collections::BTreeMap, path::Path};

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    dataset::{self, RawTable},
    dimensions::{DimensionIndices, DimensionNames, upsert_dimensions},
    error::AppResult,
    movies, normalize,
    normalize::MovieRecord,
    relations::{self, LinkCounts},
};

/// Row-level anomaly. The row is left out and the load carries on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadWarning {
    MalformedRow { row: usize },
    DuplicateMovie { row: usize, first_row: usize, title: String, year: String },
    MissingTitle { row: usize },
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub malformed_rows: usize,
    pub missing_titles: usize,
    pub duplicates: usize,
    pub movies_created: usize,
    pub movies_updated: usize,
    /// Records created per dimension table.
    pub dimensions_created: BTreeMap<&'static str, usize>,
    pub links_added: LinkCounts,
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    /// Starts a report for `table`, carrying over rows the loader already dropped.
    pub fn for_table(table: &RawTable) -> Self {
        let mut report = Self {
            rows_read: table.rows.len() + table.malformed.len(),
            ..Default::default()
        };
        for &row in &table.malformed {
            report.malformed_rows += 1;
            report.warnings.push(LoadWarning::MalformedRow { row });
        }
        report
    }

    /// Logs and records a skipped row.
    pub fn warn(&mut self, warning: LoadWarning) {
        match &warning {
            LoadWarning::MalformedRow { row } => {
                warn!(row, "skipping malformed record");
                self.malformed_rows += 1;
            },
            LoadWarning::DuplicateMovie { row, first_row, title, year } => {
                warn!(row, first_row, title = %title, year = %year, "skipping duplicate movie");
                self.duplicates += 1;
            },
            LoadWarning::MissingTitle { row } => {
                warn!(row, "skipping record without a title");
                self.missing_titles += 1;
            },
        }
        self.warnings.push(warning);
    }
}

pub async fn load_file(db: &DatabaseConnection, path: &Path) -> AppResult<LoadReport> {
    let table = dataset::load_table(path)?;
    load_table(db, &table).await
}

/// Runs the full import over an already loaded table.
///
/// Dimensions are committed one by one before the movie pass; movies and
/// their links are committed together at the end. A fatal error part way
/// leaves the committed dimensions in place, and re-running is safe.
pub async fn load_table(db: &DatabaseConnection, table: &RawTable) -> AppResult<LoadReport> {
    let mut report = LoadReport::for_table(table);

    for column in normalize::column::REQUIRED {
        if !table.has_column(column) {
            warn!(column, "dataset is missing a column; its values load as missing");
        }
    }

    let records: Vec<MovieRecord> = table.rows.iter().map(MovieRecord::from_raw).collect();

    report.dimensions_created = upsert_dimensions(db, DimensionNames::collect(&records)).await?;
    let indices = DimensionIndices::load(db).await?;

    report.links_added = load_movies(db, &records, &indices, &mut report).await?;

    info!(
        rows = report.rows_read,
        malformed = report.malformed_rows,
        missing_titles = report.missing_titles,
        duplicates = report.duplicates,
        created = report.movies_created,
        updated = report.movies_updated,
        "load complete"
    );
    Ok(report)
}

/// Movie and relation passes in one transaction. On error nothing from either
/// pass is kept.
pub async fn load_movies(
    db: &DatabaseConnection,
    records: &[MovieRecord],
    indices: &DimensionIndices,
    report: &mut LoadReport,
) -> AppResult<LinkCounts> {
    let txn = db.begin().await?;
    let resolved = movies::upsert_movies(&txn, records, indices, report).await?;
    let links = relations::attach_relations(&txn, &resolved, indices).await?;
    txn.commit().await?;
    Ok(links)
}
