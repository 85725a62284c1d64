//! Movie Mirror API Library
//!
//! This library mirrors a WordPress movie catalog: it fetches upstream pages
//! through a time-based cache, extracts movies, details, categories and
//! recent posts, and exposes them through REST API endpoints.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod routes;
pub mod scraper;

#[cfg(test)]
mod test_support;
