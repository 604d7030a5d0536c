pub mod content_rating;
pub mod country;
pub mod genre;
pub mod keyword;
pub mod language;
pub mod movie;
pub mod movie_actor;
pub mod movie_color;
pub mod movie_genre;
pub mod movie_keyword;
pub mod person;
