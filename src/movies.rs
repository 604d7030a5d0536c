use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, QueryOrder, QuerySelect, Set, Unchanged,
};
use tracing::{debug, info};

use crate::{
    dimensions::DimensionIndices,
    entities::movie,
    error::AppResult,
    normalize::MovieRecord,
    pipeline::{LoadReport, LoadWarning},
};

/// `(lower-cased title, year)`.
pub type NaturalKey = (String, String);

/// A source row matched to its persisted movie.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedMovie<'a> {
    pub pk: i32,
    pub record: &'a MovieRecord,
}

/// Natural key to pk for every persisted movie; the lowest pk wins if the
/// store already holds duplicates.
pub async fn natural_key_index<C: ConnectionTrait>(db: &C) -> AppResult<HashMap<NaturalKey, i32>> {
    let rows: Vec<(i32, String, String)> = movie::Entity::find()
        .select_only()
        .columns([movie::Column::Pk, movie::Column::MovieTitle, movie::Column::TitleYear])
        .order_by_asc(movie::Column::Pk)
        .into_tuple()
        .all(db)
        .await?;

    let mut index = HashMap::with_capacity(rows.len());
    for (pk, title, year) in rows {
        index.entry((title.to_lowercase(), year)).or_insert(pk);
    }
    Ok(index)
}

/// Creates or overwrites one movie per natural key, in row order.
///
/// Rows without a title are skipped, as are later rows repeating a key seen
/// earlier in the same pass; the first row's values stand. Every scalar and
/// foreign key is overwritten, so a blank cell nulls a previously set field.
pub async fn upsert_movies<'a, C: ConnectionTrait>(
    db: &C,
    records: &'a [MovieRecord],
    indices: &DimensionIndices,
    report: &mut LoadReport,
) -> AppResult<Vec<ResolvedMovie<'a>>> {
    let existing = natural_key_index(db).await?;
    debug!(existing = existing.len(), rows = records.len(), "starting movie pass");

    let mut seen: HashMap<NaturalKey, usize> = HashMap::new();
    let mut resolved = Vec::with_capacity(records.len());

    for record in records {
        let (Some(title), Some(key)) = (record.title.as_ref(), record.natural_key()) else {
            report.warn(LoadWarning::MissingTitle { row: record.row });
            continue;
        };

        if let Some(&first_row) = seen.get(&key) {
            report.warn(LoadWarning::DuplicateMovie {
                row: record.row,
                first_row,
                title: title.clone(),
                year: record.year.clone(),
            });
            continue;
        }
        seen.insert(key.clone(), record.row);

        let mut model = movie_fields(record, indices)?;
        let pk = match existing.get(&key) {
            Some(&pk) => {
                model.pk = Unchanged(pk);
                model.update(db).await?;
                report.movies_updated += 1;
                pk
            },
            None => {
                model.movie_title = Set(title.clone());
                model.title_year = Set(record.year.clone());
                let pk = movie::Entity::insert(model).exec(db).await?.last_insert_id;
                debug!(row = record.row, pk, title = %title, year = %record.year, "created movie");
                report.movies_created += 1;
                pk
            },
        };

        resolved.push(ResolvedMovie { pk, record });
    }

    info!(
        created = report.movies_created,
        updated = report.movies_updated,
        "movie pass complete"
    );
    Ok(resolved)
}

/// Foreign keys and statistics for a row. Title and year are left unset.
fn movie_fields(record: &MovieRecord, indices: &DimensionIndices) -> AppResult<movie::ActiveModel> {
    let row = record.row;
    let stats = &record.stats;

    Ok(movie::ActiveModel {
        pk: NotSet,
        movie_title: NotSet,
        title_year: NotSet,
        movie_color_pk: Set(indices.colors.resolve_opt(record.color.as_deref(), row)?),
        country_pk: Set(indices.countries.resolve_opt(record.country.as_deref(), row)?),
        language_pk: Set(indices.languages.resolve_opt(record.language.as_deref(), row)?),
        content_rating_pk: Set(indices
            .content_ratings
            .resolve_opt(record.content_rating.as_deref(), row)?),
        director_pk: Set(indices
            .people
            .resolve_opt(record.director.as_ref().map(|d| d.name.as_str()), row)?),
        aspect_ratio: Set(stats.aspect_ratio),
        budget: Set(stats.budget),
        cast_total_facebook_likes: Set(stats.cast_total_facebook_likes),
        duration: Set(stats.duration),
        facenumber_in_poster: Set(stats.facenumber_in_poster),
        gross: Set(stats.gross),
        imdb_id: Set(stats.imdb_id.clone()),
        imdb_score: Set(stats.imdb_score),
        movie_facebook_likes: Set(stats.movie_facebook_likes),
        num_critic_for_reviews: Set(stats.num_critic_for_reviews),
        num_user_for_reviews: Set(stats.num_user_for_reviews),
        num_voted_users: Set(stats.num_voted_users),
    })
}
