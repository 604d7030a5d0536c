use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use crate::dataset::RawRow;

pub const MULTIVALUE_DELIMITER: char = '|';

static IMDB_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"title/tt(\d+)/").expect("invalid imdb id regex"));

/// Source columns the pipeline reads.
pub mod column {
    pub const MOVIE_TITLE: &str = "movie_title";
    pub const TITLE_YEAR: &str = "title_year";
    pub const COLOR: &str = "color";
    pub const COUNTRY: &str = "country";
    pub const LANGUAGE: &str = "language";
    pub const CONTENT_RATING: &str = "content_rating";
    pub const GENRES: &str = "genres";
    pub const PLOT_KEYWORDS: &str = "plot_keywords";
    pub const DIRECTOR_NAME: &str = "director_name";
    pub const DIRECTOR_LIKES: &str = "director_facebook_likes";
    pub const ACTORS: [(&str, &str); 3] = [
        ("actor_1_name", "actor_1_facebook_likes"),
        ("actor_2_name", "actor_2_facebook_likes"),
        ("actor_3_name", "actor_3_facebook_likes"),
    ];
    pub const MOVIE_IMDB_LINK: &str = "movie_imdb_link";
    pub const ASPECT_RATIO: &str = "aspect_ratio";
    pub const BUDGET: &str = "budget";
    pub const CAST_TOTAL_FACEBOOK_LIKES: &str = "cast_total_facebook_likes";
    pub const DURATION: &str = "duration";
    pub const FACENUMBER_IN_POSTER: &str = "facenumber_in_poster";
    pub const GROSS: &str = "gross";
    pub const IMDB_SCORE: &str = "imdb_score";
    pub const MOVIE_FACEBOOK_LIKES: &str = "movie_facebook_likes";
    pub const NUM_CRITIC_FOR_REVIEWS: &str = "num_critic_for_reviews";
    pub const NUM_USER_FOR_REVIEWS: &str = "num_user_for_reviews";
    pub const NUM_VOTED_USERS: &str = "num_voted_users";

    pub const REQUIRED: [&str; 24] = [
        MOVIE_TITLE,
        TITLE_YEAR,
        COLOR,
        COUNTRY,
        LANGUAGE,
        CONTENT_RATING,
        GENRES,
        PLOT_KEYWORDS,
        DIRECTOR_NAME,
        ACTORS[0].0,
        ACTORS[1].0,
        ACTORS[2].0,
        MOVIE_IMDB_LINK,
        ASPECT_RATIO,
        BUDGET,
        CAST_TOTAL_FACEBOOK_LIKES,
        DURATION,
        FACENUMBER_IN_POSTER,
        GROSS,
        IMDB_SCORE,
        MOVIE_FACEBOOK_LIKES,
        NUM_CRITIC_FOR_REVIEWS,
        NUM_USER_FOR_REVIEWS,
        NUM_VOTED_USERS,
    ];
}

/// Trimmed, lower-cased category name. Blank cells count as missing.
pub fn clean_categorical(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    (!value.is_empty()).then(|| value.to_lowercase())
}

pub fn clean_multivalue(raw: Option<&str>, delimiter: char) -> BTreeSet<String> {
    let Some(raw) = raw else {
        return BTreeSet::new();
    };
    raw.split(delimiter).filter_map(|part| clean_categorical(Some(part))).collect()
}

pub fn clean_numeric(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer column; accepts integral float text such as `"123.0"`.
pub fn clean_integer(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    clean_numeric(Some(raw)).filter(|v| v.fract() == 0.0).map(|v| v as i64)
}

/// Year as text; the empty string stands for an unknown year.
pub fn clean_year(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim) else {
        return String::new();
    };
    match clean_integer(Some(raw)) {
        Some(year) => year.to_string(),
        None => raw.to_string(),
    }
}

/// Digits of an IMDb `title/tt<digits>/` link.
pub fn extract_external_id(url: Option<&str>) -> Option<String> {
    let url = url.filter(|u| !u.is_empty())?;
    IMDB_ID_RE.captures(url).map(|caps| caps[1].to_string())
}

/// A person named on a row, with the likes count the row reports for them.
#[derive(Clone, Debug, PartialEq)]
pub struct Credit {
    pub name: String,
    pub likes: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieStats {
    pub aspect_ratio: Option<f64>,
    pub budget: Option<f64>,
    pub cast_total_facebook_likes: Option<i64>,
    pub duration: Option<i64>,
    pub facenumber_in_poster: Option<i64>,
    pub gross: Option<f64>,
    pub imdb_id: Option<String>,
    pub imdb_score: Option<f64>,
    pub movie_facebook_likes: Option<i64>,
    pub num_critic_for_reviews: Option<i64>,
    pub num_user_for_reviews: Option<i64>,
    pub num_voted_users: Option<i64>,
}

/// One source row after normalization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieRecord {
    pub row: usize,
    /// Trimmed, original casing.
    pub title: Option<String>,
    pub year: String,
    pub color: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub content_rating: Option<String>,
    pub genres: BTreeSet<String>,
    pub keywords: BTreeSet<String>,
    pub director: Option<Credit>,
    /// Distinct cast members in billing order.
    pub actors: Vec<Credit>,
    pub stats: MovieStats,
}

impl MovieRecord {
    pub fn from_raw(raw: &RawRow) -> Self {
        let title = raw
            .get(column::MOVIE_TITLE)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let credit = |name_col: &str, likes_col: &str| {
            clean_categorical(raw.get(name_col))
                .map(|name| Credit { name, likes: clean_integer(raw.get(likes_col)) })
        };

        let mut actors: Vec<Credit> = Vec::new();
        for (name_col, likes_col) in column::ACTORS {
            if let Some(actor) = credit(name_col, likes_col) {
                if !actors.iter().any(|a| a.name == actor.name) {
                    actors.push(actor);
                }
            }
        }

        Self {
            row: raw.index,
            title,
            year: clean_year(raw.get(column::TITLE_YEAR)),
            color: clean_categorical(raw.get(column::COLOR)),
            country: clean_categorical(raw.get(column::COUNTRY)),
            language: clean_categorical(raw.get(column::LANGUAGE)),
            content_rating: clean_categorical(raw.get(column::CONTENT_RATING)),
            genres: clean_multivalue(raw.get(column::GENRES), MULTIVALUE_DELIMITER),
            keywords: clean_multivalue(raw.get(column::PLOT_KEYWORDS), MULTIVALUE_DELIMITER),
            director: credit(column::DIRECTOR_NAME, column::DIRECTOR_LIKES),
            actors,
            stats: MovieStats {
                aspect_ratio: clean_numeric(raw.get(column::ASPECT_RATIO)),
                budget: clean_numeric(raw.get(column::BUDGET)),
                cast_total_facebook_likes: clean_integer(
                    raw.get(column::CAST_TOTAL_FACEBOOK_LIKES),
                ),
                duration: clean_integer(raw.get(column::DURATION)),
                facenumber_in_poster: clean_integer(raw.get(column::FACENUMBER_IN_POSTER)),
                gross: clean_numeric(raw.get(column::GROSS)),
                imdb_id: extract_external_id(raw.get(column::MOVIE_IMDB_LINK)),
                imdb_score: clean_numeric(raw.get(column::IMDB_SCORE)),
                movie_facebook_likes: clean_integer(raw.get(column::MOVIE_FACEBOOK_LIKES)),
                num_critic_for_reviews: clean_integer(raw.get(column::NUM_CRITIC_FOR_REVIEWS)),
                num_user_for_reviews: clean_integer(raw.get(column::NUM_USER_FOR_REVIEWS)),
                num_voted_users: clean_integer(raw.get(column::NUM_VOTED_USERS)),
            },
        }
    }

    /// `(lower-cased title, year)`; `None` without a title.
    pub fn natural_key(&self) -> Option<(String, String)> {
        self.title.as_ref().map(|t| (t.to_lowercase(), self.year.clone()))
    }

    /// Director first, then cast.
    pub fn people(&self) -> impl Iterator<Item = &Credit> {
        self.director.iter().chain(self.actors.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read_table;

    #[test]
    fn categorical_is_trimmed_and_lowercased() {
        assert_eq!(clean_categorical(Some("  Color ")), Some("color".to_string()));
        assert_eq!(
            clean_categorical(Some(" Black and White")),
            clean_categorical(Some("black and white "))
        );
        assert_eq!(clean_categorical(None), None);
        assert_eq!(clean_categorical(Some("   ")), None);
    }

    #[test]
    fn multivalue_dedupes_after_normalization() {
        let genres = clean_multivalue(Some("Action|Drama| action "), '|');
        assert_eq!(genres, BTreeSet::from(["action".to_string(), "drama".to_string()]));

        assert_eq!(clean_multivalue(Some("Sci-Fi||"), '|').len(), 1);
        assert!(clean_multivalue(None, '|').is_empty());
    }

    #[test]
    fn numeric_missing_is_none() {
        assert_eq!(clean_numeric(Some("237000000")), Some(237_000_000.0));
        assert_eq!(clean_numeric(Some("1.78")), Some(1.78));
        assert_eq!(clean_numeric(None), None);
        assert_eq!(clean_numeric(Some("NaN")), None);
        assert_eq!(clean_integer(Some("178.0")), Some(178));
        assert_eq!(clean_integer(Some("1.5")), None);
    }

    #[test]
    fn year_keeps_text_and_defaults_to_empty() {
        assert_eq!(clean_year(Some("2009")), "2009");
        assert_eq!(clean_year(Some("2009.0")), "2009");
        assert_eq!(clean_year(None), "");
    }

    #[test]
    fn external_id_from_imdb_link() {
        assert_eq!(
            extract_external_id(Some("https://www.imdb.com/title/tt1234567/")),
            Some("1234567".to_string())
        );
        assert_eq!(
            extract_external_id(Some("http://www.imdb.com/title/tt0499549/?ref_=fn_tt_tt_1")),
            Some("0499549".to_string())
        );
        assert_eq!(extract_external_id(Some("")), None);
        assert_eq!(extract_external_id(Some("not a url")), None);
        assert_eq!(extract_external_id(None), None);
    }

    #[test]
    fn record_from_raw_row() {
        let csv = "movie_title,title_year,genres,director_name,director_facebook_likes,\
                   actor_1_name,actor_2_name,gross\n\
                   Avatar\u{a0},2009,Action|Adventure,James Cameron,0,\
                   CCH Pounder,cch pounder ,760505847\n";
        let table = read_table(csv.as_bytes()).unwrap();
        let record = MovieRecord::from_raw(&table.rows[0]);

        assert_eq!(record.title.as_deref(), Some("Avatar"));
        assert_eq!(record.natural_key(), Some(("avatar".to_string(), "2009".to_string())));
        assert_eq!(record.genres.len(), 2);
        assert_eq!(
            record.director,
            Some(Credit { name: "james cameron".to_string(), likes: Some(0) })
        );
        assert_eq!(record.actors.len(), 1);
        assert_eq!(record.people().count(), 2);
        assert_eq!(record.stats.gross, Some(760_505_847.0));
        assert_eq!(record.stats.budget, None);
        assert_eq!(record.color, None);
    }
}
