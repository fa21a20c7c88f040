//! parkfinder library
//!
//! Retrieves national park sites by state from the park catalog and places
//! near each site from a radius search API, memoizing every remote fetch in
//! one persistent cache file.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod service;
