pub mod config;
pub mod db;
pub mod error;
pub mod flat_files;
pub mod generator;
pub mod ingest;
pub mod integrity;
pub mod loader;
pub mod models;
pub mod store;
pub mod tables;
