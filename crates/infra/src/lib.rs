//! Infrastructure layer: persistence, caching, mail delivery, configuration,
//! and the background report pipeline.

pub mod cache;
pub mod config;
pub mod db;
pub mod jobs;
pub mod mail;
pub mod statistics;
