// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod record;
pub mod specs;

pub mod csv;
pub mod file;
pub mod log;
pub mod progress;
pub mod scrape;
pub mod store;

pub use crate::core::net::{Fetch, HttpFetcher, StaticFetcher};
pub use crate::error::{ExportError, FetchError, ParseError, ScrapeError, ValidationError};
pub use crate::record::{ChallengeRating, MonsterRecord, StatValue};
pub use crate::scrape::{run, ScrapeReport};
