use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(dimension_table(MovieColor::Table, MovieColor::Pk, MovieColor::Name))
            .await?;
        manager.create_table(dimension_table(Country::Table, Country::Pk, Country::Name)).await?;
        manager.create_table(dimension_table(Language::Table, Language::Pk, Language::Name)).await?;
        manager
            .create_table(dimension_table(
                ContentRating::Table,
                ContentRating::Pk,
                ContentRating::Name,
            ))
            .await?;
        manager.create_table(dimension_table(Genre::Table, Genre::Pk, Genre::Name)).await?;
        manager.create_table(dimension_table(Keyword::Table, Keyword::Pk, Keyword::Name)).await?;

        let mut person = dimension_table(Person::Table, Person::Pk, Person::Name);
        person.col(big_integer_null(Person::Likes));
        manager.create_table(person).await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Pk))
                    .col(string(Movie::MovieTitle))
                    .col(string(Movie::TitleYear))
                    .col(integer_null(Movie::MovieColorPk))
                    .col(integer_null(Movie::CountryPk))
                    .col(integer_null(Movie::LanguagePk))
                    .col(integer_null(Movie::ContentRatingPk))
                    .col(integer_null(Movie::DirectorPk))
                    .col(double_null(Movie::AspectRatio))
                    .col(double_null(Movie::Budget))
                    .col(big_integer_null(Movie::CastTotalFacebookLikes))
                    .col(big_integer_null(Movie::Duration))
                    .col(big_integer_null(Movie::FacenumberInPoster))
                    .col(double_null(Movie::Gross))
                    .col(string_null(Movie::ImdbId))
                    .col(double_null(Movie::ImdbScore))
                    .col(big_integer_null(Movie::MovieFacebookLikes))
                    .col(big_integer_null(Movie::NumCriticForReviews))
                    .col(big_integer_null(Movie::NumUserForReviews))
                    .col(big_integer_null(Movie::NumVotedUsers))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_movie_color")
                            .from(Movie::Table, Movie::MovieColorPk)
                            .to(MovieColor::Table, MovieColor::Pk),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_country")
                            .from(Movie::Table, Movie::CountryPk)
                            .to(Country::Table, Country::Pk),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_language")
                            .from(Movie::Table, Movie::LanguagePk)
                            .to(Language::Table, Language::Pk),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_content_rating")
                            .from(Movie::Table, Movie::ContentRatingPk)
                            .to(ContentRating::Table, ContentRating::Pk),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_director")
                            .from(Movie::Table, Movie::DirectorPk)
                            .to(Person::Table, Person::Pk),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key lookups; deliberately not unique.
        manager
            .create_index(
                Index::create()
                    .name("idx_movie_title_year")
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(Movie::TitleYear)
                    .col(Movie::MovieTitle)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(link_table(
                MovieGenres::Table,
                MovieGenres::MoviePk,
                (Genre::Table, Genre::Pk),
                MovieGenres::GenrePk,
                "movie_genres",
            ))
            .await?;
        manager
            .create_table(link_table(
                MovieKeywords::Table,
                MovieKeywords::MoviePk,
                (Keyword::Table, Keyword::Pk),
                MovieKeywords::KeywordPk,
                "movie_keywords",
            ))
            .await?;
        manager
            .create_table(link_table(
                MovieActors::Table,
                MovieActors::MoviePk,
                (Person::Table, Person::Pk),
                MovieActors::PersonPk,
                "movie_actors",
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MovieActors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieKeywords::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieGenres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Person::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Keyword::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ContentRating::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Language::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Country::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieColor::Table).to_owned()).await?;
        Ok(())
    }
}

/// `(pk, name unique)` lookup table shared by every categorical dimension.
fn dimension_table<T>(table: T, pk: T, name: T) -> TableCreateStatement
where
    T: Iden + 'static,
{
    Table::create().table(table).if_not_exists().col(pk_auto(pk)).col(string_uniq(name)).to_owned()
}

fn link_table<L, D>(
    table: L,
    movie_pk: L,
    target: (D, D),
    target_pk: L,
    name: &str,
) -> TableCreateStatement
where
    L: Iden + Clone + 'static,
    D: Iden + 'static,
{
    let (target_table, target_table_pk) = target;
    Table::create()
        .table(table.clone())
        .if_not_exists()
        .col(integer(movie_pk.clone()))
        .col(integer(target_pk.clone()))
        .primary_key(Index::create().col(movie_pk.clone()).col(target_pk.clone()))
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_movie"))
                .from(table.clone(), movie_pk)
                .to(Movie::Table, Movie::Pk),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_target"))
                .from(table, target_pk)
                .to(target_table, target_table_pk),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum MovieColor {
    Table,
    Pk,
    Name,
}

#[derive(DeriveIden)]
enum Country {
    Table,
    Pk,
    Name,
}

#[derive(DeriveIden)]
enum Language {
    Table,
    Pk,
    Name,
}

#[derive(DeriveIden)]
enum ContentRating {
    Table,
    Pk,
    Name,
}

#[derive(DeriveIden)]
enum Genre {
    Table,
    Pk,
    Name,
}

#[derive(DeriveIden)]
enum Keyword {
    Table,
    Pk,
    Name,
}

#[derive(DeriveIden)]
enum Person {
    Table,
    Pk,
    Name,
    Likes,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Pk,
    MovieTitle,
    TitleYear,
    MovieColorPk,
    CountryPk,
    LanguagePk,
    ContentRatingPk,
    DirectorPk,
    AspectRatio,
    Budget,
    CastTotalFacebookLikes,
    Duration,
    FacenumberInPoster,
    Gross,
    ImdbId,
    ImdbScore,
    MovieFacebookLikes,
    NumCriticForReviews,
    NumUserForReviews,
    NumVotedUsers,
}

#[derive(DeriveIden, Clone)]
enum MovieGenres {
    Table,
    MoviePk,
    GenrePk,
}

#[derive(DeriveIden, Clone)]
enum MovieKeywords {
    Table,
    MoviePk,
    KeywordPk,
}

#[derive(DeriveIden, Clone)]
enum MovieActors {
    Table,
    MoviePk,
    PersonPk,
}
