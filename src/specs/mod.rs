//! # Scraping “specs” module
//!
//! This module hosts the **page-specific scraping specifications** for the site.
//! Each spec focuses on one kind of page and encodes *where the ground truth
//! lives in the page* and *how to extract it robustly*.
//!
//! ## What lives here
//! - **Pure parsing** of fetched HTML: the bestiary listing, monster pages,
//!   hub pages with a "Subpages" block, the suggestion page, the feat index.
//! - **Stat-block regexes.** No other layer matches site text.
//! - **Tolerant extraction**: optional fields are left out of the record rather
//!   than failing the page.
//!
//! ## What does **not** live here
//! - **Fetching, pausing, recursion into subpages** (`scrape`).
//! - **Validation of the core subset** (`record::MonsterRecord::validate`).
//! - **Output formatting** (`store`, `file`).
//!
//! ## Typical call chain
//! ```text
//! cli → scrape::run → specs::listing::monster_links()
//!                   ↘ for each URL: specs::monster::parse_monster()
//!                                       ↘ specs::attacks / specs::feats
//!            file::write_export (outside of specs)
//! ```
//!
//! ## Conventions & invariants
//! - Specs take `&str` HTML (or extracted text) and never touch the network.
//! - Text is normalized once (`core::sanitize::normalize_stat_text`) before
//!   any pattern runs.
//! - Returned records keep a fixed key order per section so the dataset
//!   columns are stable.
//!
//! ## Testing notes
//! - Every spec is testable **offline** against captured fixtures
//!   (`tests/fixtures/*.html`).
pub mod attacks;
pub mod feats;
pub mod listing;
pub mod monster;
