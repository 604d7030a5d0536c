#![allow(dead_code)]

use std::collections::HashMap;

use moviedb::dataset::{RawTable, read_table};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub const COLUMNS: [&str; 28] = [
    "color",
    "director_name",
    "num_critic_for_reviews",
    "duration",
    "director_facebook_likes",
    "actor_3_facebook_likes",
    "actor_2_name",
    "actor_1_facebook_likes",
    "gross",
    "genres",
    "actor_1_name",
    "movie_title",
    "num_voted_users",
    "cast_total_facebook_likes",
    "actor_3_name",
    "facenumber_in_poster",
    "plot_keywords",
    "movie_imdb_link",
    "num_user_for_reviews",
    "language",
    "country",
    "content_rating",
    "budget",
    "title_year",
    "actor_2_facebook_likes",
    "imdb_score",
    "aspect_ratio",
    "movie_facebook_likes",
];

/// Fresh, migrated in-memory store. One pooled connection keeps every
/// query on the same database.
pub async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    moviedb::db::migrate(&db).await.unwrap();
    db
}

/// One source row; unset columns are written as empty cells.
#[derive(Clone, Debug, Default)]
pub struct MovieRow(HashMap<&'static str, String>);

impl MovieRow {
    pub fn new(title: &str, year: &str) -> Self {
        Self::default().with("movie_title", title).with("title_year", year)
    }

    pub fn with(mut self, column: &'static str, value: impl ToString) -> Self {
        self.0.insert(column, value.to_string());
        self
    }

    pub fn money(self, gross: f64, budget: f64) -> Self {
        self.with("gross", gross).with("budget", budget)
    }
}

pub fn table(rows: &[MovieRow]) -> RawTable {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS).unwrap();
    for row in rows {
        writer
            .write_record(COLUMNS.iter().map(|c| row.0.get(c).map(String::as_str).unwrap_or("")))
            .unwrap();
    }
    let bytes = writer.into_inner().unwrap();
    read_table(bytes.as_slice()).unwrap()
}
