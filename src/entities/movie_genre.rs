use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movie_genres")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub movie_pk: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub genre_pk: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MoviePk",
        to = "super::movie::Column::Pk"
    )]
    Movie,
    #[sea_orm(
        belongs_to = "super::genre::Entity",
        from = "Column::GenrePk",
        to = "super::genre::Column::Pk"
    )]
    Genre,
}

impl ActiveModelBehavior for ActiveModel {}
