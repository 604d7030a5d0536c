pub mod actions;
pub mod config;
pub mod dataset;
pub mod db;
pub mod dimensions;
pub mod entities;
pub mod error;
pub mod movies;
pub mod normalize;
pub mod pipeline;
pub mod relations;
pub mod stats;
