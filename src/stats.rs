//! Post-load profitability queries.

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap},
};

use sea_orm::{ConnectionTrait, EntityTrait};
use serde::Serialize;

use crate::{
    actions::Query,
    entities::{genre, movie, movie_actor, movie_genre, person},
    error::AppResult,
};

/// Name to mean profit.
pub type ProfitMap = HashMap<String, f64>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfitRank {
    pub name: String,
    pub average_profit: f64,
}

/// Mean profit of each genre's movies. Genres with no movie of known profit are left out.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenreProfit;

impl Query for GenreProfit {
    type Output = ProfitMap;

    async fn query<C: ConnectionTrait>(&self, db: &C) -> AppResult<ProfitMap> {
        let profits = movie_profits(db).await?;

        let mut movies_by_genre: HashMap<i32, BTreeSet<i32>> = HashMap::new();
        for link in movie_genre::Entity::find().all(db).await? {
            movies_by_genre.entry(link.genre_pk).or_default().insert(link.movie_pk);
        }

        let genres = genre::Entity::find().all(db).await?;
        Ok(genres
            .into_iter()
            .filter_map(|g| {
                let movies = movies_by_genre.get(&g.pk)?;
                mean_profit(movies, &profits).map(|p| (g.name, p))
            })
            .collect())
    }
}

/// Mean profit over every movie a person directed or acted in, each movie
/// counted once.
#[derive(Clone, Copy, Debug, Default)]
pub struct PersonProfit;

impl Query for PersonProfit {
    type Output = ProfitMap;

    async fn query<C: ConnectionTrait>(&self, db: &C) -> AppResult<ProfitMap> {
        let movies = movie::Entity::find().all(db).await?;

        let mut movies_by_person: HashMap<i32, BTreeSet<i32>> = HashMap::new();
        for m in &movies {
            if let Some(director) = m.director_pk {
                movies_by_person.entry(director).or_default().insert(m.pk);
            }
        }
        for link in movie_actor::Entity::find().all(db).await? {
            movies_by_person.entry(link.person_pk).or_default().insert(link.movie_pk);
        }

        let profits: HashMap<i32, f64> =
            movies.iter().filter_map(|m| m.profit().map(|p| (m.pk, p))).collect();

        let people = person::Entity::find().all(db).await?;
        Ok(people
            .into_iter()
            .filter_map(|p| {
                let movies = movies_by_person.get(&p.pk)?;
                mean_profit(movies, &profits).map(|profit| (p.name, profit))
            })
            .collect())
    }
}

async fn movie_profits<C: ConnectionTrait>(db: &C) -> AppResult<HashMap<i32, f64>> {
    Ok(movie::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .filter_map(|m| m.profit().map(|p| (m.pk, p)))
        .collect())
}

fn mean_profit(movies: &BTreeSet<i32>, profits: &HashMap<i32, f64>) -> Option<f64> {
    let (total, count) = movies
        .iter()
        .filter_map(|pk| profits.get(pk))
        .fold((0.0, 0usize), |(total, count), p| (total + p, count + 1));
    (count > 0).then(|| total / count as f64)
}

/// Highest mean profit first, ties by name; at most `limit` entries.
pub fn rank_profit_map(profits: ProfitMap, limit: usize) -> Vec<ProfitRank> {
    let mut ranked: Vec<ProfitRank> = profits
        .into_iter()
        .map(|(name, average_profit)| ProfitRank { name, average_profit })
        .collect();
    ranked.sort_by(|a, b| {
        b.average_profit
            .total_cmp(&a.average_profit)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(limit);
    ranked
}

/// Tab-separated table with profits truncated to whole units.
pub fn format_ranking(label: &str, ranked: &[ProfitRank]) -> String {
    let mut out = format!("{label}\tAverage Profit\n{}\t--------------\n", "-".repeat(label.len()));
    for rank in ranked {
        out.push_str(&format!("{}\t{}\n", rank.name, rank.average_profit.trunc() as i64));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_ignores_movies_without_profit() {
        let profits = HashMap::from([(1, 60.0), (2, 50.0)]);
        assert_eq!(mean_profit(&BTreeSet::from([1, 2, 3]), &profits), Some(55.0));
        assert_eq!(mean_profit(&BTreeSet::from([3]), &profits), None);
    }

    #[test]
    fn ranking_sorts_descending_and_truncates() {
        let profits = ProfitMap::from([
            ("drama".to_string(), 55.0),
            ("action".to_string(), 120.5),
            ("horror".to_string(), -10.0),
            ("comedy".to_string(), 55.0),
        ]);

        let ranked = rank_profit_map(profits, 3);
        let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, ["action", "comedy", "drama"]);
    }

    #[test]
    fn ranking_table_truncates_profit() {
        let ranked = [ProfitRank { name: "action".into(), average_profit: 120.9 }];
        assert_eq!(
            format_ranking("Genre", &ranked),
            "Genre\tAverage Profit\n-----\t--------------\naction\t120\n"
        );
    }

    #[test]
    fn ranking_limit_larger_than_map() {
        let profits = ProfitMap::from([("drama".to_string(), 1.0)]);
        assert_eq!(rank_profit_map(profits, 10).len(), 1);
    }
}
