use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movie_keywords")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub movie_pk: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub keyword_pk: i32,
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
        belongs_to = "super::keyword::Entity",
        from = "Column::KeywordPk",
        to = "super::keyword::Column::Pk"
    )]
    Keyword,
}

impl ActiveModelBehavior for ActiveModel {}
