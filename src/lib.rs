pub mod app;
pub mod collate;
pub mod config;
pub mod domain;
pub mod error;
pub mod genomes;
pub mod normalize;
pub mod organisms;
pub mod output;
pub mod table;
pub mod writer;
