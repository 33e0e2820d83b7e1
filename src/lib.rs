pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod output;
pub mod session;
pub mod timing;
