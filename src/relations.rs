//! Many-to-many links from movies to genres, keywords and cast members.
//!
//! Directors are a plain foreign key on the movie and are written by the
//! movie pass; only the cast goes through `movie_actors`.

use std::collections::HashSet;

use sea_orm::{ConnectionTrait, EntityTrait, Set, sea_query::OnConflict};
use serde::Serialize;
use tracing::debug;

use crate::{
    db::insert_batched,
    dimensions::{DimensionIndex, DimensionIndices},
    entities::{movie_actor, movie_genre, movie_keyword},
    error::AppResult,
    movies::ResolvedMovie,
};

/// Links added per relation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LinkCounts {
    pub genres: usize,
    pub keywords: usize,
    pub actors: usize,
}

/// `(movie_pk, target_pk)` pairs already persisted for one link table.
struct Attached {
    pairs: HashSet<(i32, i32)>,
}

impl Attached {
    /// Resolves each name and keeps the pairs not linked yet.
    fn pending<'n>(
        &mut self,
        movie_pk: i32,
        names: impl IntoIterator<Item = &'n str>,
        index: &DimensionIndex,
        row: usize,
    ) -> AppResult<Vec<i32>> {
        let mut pending = Vec::new();
        for name in names {
            let target_pk = index.resolve(name, row)?;
            if self.pairs.insert((movie_pk, target_pk)) {
                pending.push(target_pk);
            }
        }
        Ok(pending)
    }
}

pub async fn attach_relations<C: ConnectionTrait>(
    db: &C,
    movies: &[ResolvedMovie<'_>],
    indices: &DimensionIndices,
) -> AppResult<LinkCounts> {
    let mut genres = Attached {
        pairs: movie_genre::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|l| (l.movie_pk, l.genre_pk))
            .collect(),
    };
    let mut keywords = Attached {
        pairs: movie_keyword::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|l| (l.movie_pk, l.keyword_pk))
            .collect(),
    };
    let mut actors = Attached {
        pairs: movie_actor::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|l| (l.movie_pk, l.person_pk))
            .collect(),
    };

    let mut new_genres = Vec::new();
    let mut new_keywords = Vec::new();
    let mut new_actors = Vec::new();

    for movie in movies {
        let record = movie.record;
        let row = record.row;

        for genre_pk in genres.pending(
            movie.pk,
            record.genres.iter().map(String::as_str),
            &indices.genres,
            row,
        )? {
            new_genres.push(movie_genre::ActiveModel {
                movie_pk: Set(movie.pk),
                genre_pk: Set(genre_pk),
            });
        }

        for keyword_pk in keywords.pending(
            movie.pk,
            record.keywords.iter().map(String::as_str),
            &indices.keywords,
            row,
        )? {
            new_keywords.push(movie_keyword::ActiveModel {
                movie_pk: Set(movie.pk),
                keyword_pk: Set(keyword_pk),
            });
        }

        for person_pk in actors.pending(
            movie.pk,
            record.actors.iter().map(|a| a.name.as_str()),
            &indices.people,
            row,
        )? {
            new_actors.push(movie_actor::ActiveModel {
                movie_pk: Set(movie.pk),
                person_pk: Set(person_pk),
            });
        }
    }

    let counts = LinkCounts {
        genres: new_genres.len(),
        keywords: new_keywords.len(),
        actors: new_actors.len(),
    };

    insert_batched(
        db,
        new_genres,
        OnConflict::columns([movie_genre::Column::MoviePk, movie_genre::Column::GenrePk])
            .do_nothing()
            .to_owned(),
    )
    .await?;
    insert_batched(
        db,
        new_keywords,
        OnConflict::columns([movie_keyword::Column::MoviePk, movie_keyword::Column::KeywordPk])
            .do_nothing()
            .to_owned(),
    )
    .await?;
    insert_batched(
        db,
        new_actors,
        OnConflict::columns([movie_actor::Column::MoviePk, movie_actor::Column::PersonPk])
            .do_nothing()
            .to_owned(),
    )
    .await?;

    debug!(
        genres = counts.genres,
        keywords = counts.keywords,
        actors = counts.actors,
        "relations attached"
    );
    Ok(counts)
}
