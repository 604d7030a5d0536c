mod common;

use common::{MovieRow, memory_db, table};
use moviedb::{
    actions::Query,
    pipeline::load_table,
    stats::{GenreProfit, PersonProfit, rank_profit_map},
};

#[tokio::test]
async fn genre_profit_is_the_mean_over_its_movies() {
    let db = memory_db().await;
    let rows = table(&[
        MovieRow::new("First", "2001").with("genres", "Drama").money(100.0, 40.0),
        MovieRow::new("Second", "2002").with("genres", "Drama|Comedy").money(200.0, 150.0),
    ]);
    load_table(&db, &rows).await.unwrap();

    let profits = GenreProfit.query(&db).await.unwrap();

    assert_eq!(profits.len(), 2);
    assert_eq!(profits["drama"], 55.0);
    assert_eq!(profits["comedy"], 50.0);
}

#[tokio::test]
async fn movies_without_gross_or_budget_are_left_out() {
    let db = memory_db().await;
    let rows = table(&[
        MovieRow::new("Known", "2001")
            .with("genres", "Drama")
            .with("director_name", "Ann Lee")
            .money(300.0, 100.0),
        MovieRow::new("No Gross", "2002")
            .with("genres", "Drama|Horror")
            .with("director_name", "Ann Lee")
            .with("budget", "50"),
        MovieRow::new("No Budget", "2003")
            .with("genres", "Western")
            .with("director_name", "Bo Park")
            .with("gross", "80"),
    ]);
    load_table(&db, &rows).await.unwrap();

    let genres = GenreProfit.query(&db).await.unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres["drama"], 200.0);

    let people = PersonProfit.query(&db).await.unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people["ann lee"], 200.0);
}

#[tokio::test]
async fn negative_profit_is_kept() {
    let db = memory_db().await;
    let rows = table(&[MovieRow::new("Flop", "2010").with("genres", "Family").money(10.0, 110.0)]);
    load_table(&db, &rows).await.unwrap();

    let profits = GenreProfit.query(&db).await.unwrap();
    assert_eq!(profits["family"], -100.0);
}

#[tokio::test]
async fn person_counts_each_movie_once() {
    let db = memory_db().await;
    let rows = table(&[
        MovieRow::new("Directed And Starred", "1990")
            .with("director_name", "Kevin Costner")
            .with("actor_1_name", "Kevin Costner")
            .money(160.0, 100.0),
        MovieRow::new("Only Starred", "1991")
            .with("director_name", "Someone Else")
            .with("actor_2_name", "kevin costner")
            .money(40.0, 20.0),
    ]);
    load_table(&db, &rows).await.unwrap();

    let profits = PersonProfit.query(&db).await.unwrap();

    assert_eq!(profits["kevin costner"], 40.0);
    assert_eq!(profits["someone else"], 20.0);
}

#[tokio::test]
async fn ranking_of_queried_profits() {
    let db = memory_db().await;
    let rows = table(&[
        MovieRow::new("A", "2000").with("genres", "Action").money(500.0, 100.0),
        MovieRow::new("B", "2000").with("genres", "Drama").money(150.0, 100.0),
        MovieRow::new("C", "2000").with("genres", "Horror").money(300.0, 100.0),
    ]);
    load_table(&db, &rows).await.unwrap();

    let ranked = rank_profit_map(GenreProfit.query(&db).await.unwrap(), 2);
    let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(names, ["action", "horror"]);
    assert_eq!(ranked[0].average_profit, 400.0);
}

#[tokio::test]
async fn empty_store_has_no_rankings() {
    let db = memory_db().await;

    assert!(GenreProfit.query(&db).await.unwrap().is_empty());
    assert!(PersonProfit.query(&db).await.unwrap().is_empty());
}
