use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movie_actors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub movie_pk: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub person_pk: i32,
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
        belongs_to = "super::person::Entity",
        from = "Column::PersonPk",
        to = "super::person::Column::Pk"
    )]
    Person,
}

impl ActiveModelBehavior for ActiveModel {}
