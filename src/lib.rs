pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod reconcile;
pub mod storage;
pub mod utils;
