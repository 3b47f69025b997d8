//! Library layer for SchoolScout: disk-cached paginated fetching from the
//! College Scorecard API, threshold filtering, and display formatting.
//!
//! Wraps the `scorecard_api` crate with a hash-keyed file cache and the
//! filter/transform pipeline that turns raw API records into CSV-ready rows.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod school;
pub mod search;
pub mod transform;

pub use scorecard_api;
pub use scorecard_api::types;
pub use scorecard_api::{Query, SchoolQuery};

pub use cache::{CacheKey, DiskCache};
pub use client::CachedClient;
pub use config::{ApiKey, Settings};
pub use error::ScoutError;
pub use filter::{FilterConfig, FilterEngine, Rejection};
pub use school::School;
pub use search::{find_by_name, general_search, school_query, search_from_list};
pub use transform::{DisplayRecord, FieldMapping, ProjectionMode, Transformer};
