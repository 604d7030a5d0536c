use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub pk: i32,
    pub movie_title: String,
    /// Empty string when the year is unknown, never null.
    pub title_year: String,
    pub movie_color_pk: Option<i32>,
    pub country_pk: Option<i32>,
    pub language_pk: Option<i32>,
    pub content_rating_pk: Option<i32>,
    pub director_pk: Option<i32>,
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie_color::Entity",
        from = "Column::MovieColorPk",
        to = "super::movie_color::Column::Pk"
    )]
    MovieColor,
    #[sea_orm(
        belongs_to = "super::country::Entity",
        from = "Column::CountryPk",
        to = "super::country::Column::Pk"
    )]
    Country,
    #[sea_orm(
        belongs_to = "super::language::Entity",
        from = "Column::LanguagePk",
        to = "super::language::Column::Pk"
    )]
    Language,
    #[sea_orm(
        belongs_to = "super::content_rating::Entity",
        from = "Column::ContentRatingPk",
        to = "super::content_rating::Column::Pk"
    )]
    ContentRating,
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::DirectorPk",
        to = "super::person::Column::Pk"
    )]
    Director,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Gross minus budget; undefined unless both are known.
    pub fn profit(&self) -> Option<f64> {
        Some(self.gross? - self.budget?)
    }
}
