use std::path::PathBuf;

/// Why a delimited file could not be read as a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("no header row")]
    MissingHeader,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to read dataset {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("{dimension} \"{name}\" referenced by row #{row} is missing from the index")]
    DimensionLookup { dimension: &'static str, name: String, row: usize },

    #[error(transparent)]
    Store(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
