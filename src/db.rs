use migration::Migrator;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityTrait, Insert,
    IntoActiveModel, Statement, sea_query::OnConflict,
};
use sea_orm_migration::MigratorTrait;

use crate::error::AppResult;

const SQLITE_PRAGMAS: [&str; 4] = [
    "PRAGMA journal_mode=WAL",
    "PRAGMA synchronous=NORMAL",
    "PRAGMA cache_size=-64000",
    "PRAGMA foreign_keys=ON",
];

/// Keeps each statement well under SQLite's bound-parameter limit.
const INSERT_BATCH: usize = 500;

pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    migrate(&db).await?;
    Ok(db)
}

/// Applies connection pragmas and brings the schema up to date. Safe to re-run.
pub async fn migrate(db: &DatabaseConnection) -> AppResult<()> {
    if db.get_database_backend() == DbBackend::Sqlite {
        for pragma in SQLITE_PRAGMAS {
            db.execute(Statement::from_string(DbBackend::Sqlite, pragma.to_string())).await?;
        }
    }

    Migrator::up(db, None).await?;
    Ok(())
}

/// Multi-row insert in batches. Rows rejected by `on_conflict` are skipped, not errors.
pub async fn insert_batched<A, C>(db: &C, models: Vec<A>, on_conflict: OnConflict) -> AppResult<u64>
where
    A: ActiveModelTrait + 'static,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    let mut inserted = 0;
    let mut pending = models.into_iter().peekable();
    while pending.peek().is_some() {
        let batch: Vec<A> = pending.by_ref().take(INSERT_BATCH).collect();
        inserted += Insert::many(batch)
            .on_conflict(on_conflict.clone())
            .exec_without_returning(db)
            .await?;
    }
    Ok(inserted)
}
