use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub dataset_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DB_CONNECTION")
            .unwrap_or_else(|_| "sqlite://data/db.sqlite?mode=rwc".to_string());

        let dataset_path = std::env::var("DATASET_NAME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/movie_metadata.csv"));

        Self { database_url, dataset_path }
    }

    /// Filesystem path behind a `sqlite://` url, if it names a file.
    pub fn sqlite_file(&self) -> Option<PathBuf> {
        sqlite_file(&self.database_url)
    }
}

fn sqlite_file(url: &str) -> Option<PathBuf> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(PathBuf::from(path))
}
