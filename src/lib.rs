pub mod cache;
pub mod config;
pub mod engine;
pub mod fetcher;
pub mod latest;
pub mod model;
pub mod observability;
pub mod surface;
