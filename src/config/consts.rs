// src/config/consts.rs

// Site
pub const LISTING_URL: &str = "https://www.d20pfsrd.com/bestiary/bestiary-hub/monsters-by-cr/";
pub const MONSTER_PREFIX: &str = "https://www.d20pfsrd.com/bestiary/monster-listings/";
pub const FEATS_URL: &str = "https://www.d20pfsrd.com/feats/";
pub const FEATS_PREFIX: &str = "https://www.d20pfsrd.com/feats/";

// The site serves its "did you mean" page with a 404
pub const SUGGESTION_MARKER: &str = "We've found at least one possible match";

// Net
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_6) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36";
pub const TIMEOUT_SECS: u64 = 30;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite

// Subpage recursion guard
pub const MAX_SUBPAGE_DEPTH: usize = 3;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "bestiary";
pub const CSV_SEP: char = ',';
pub const SQLITE_TABLE: &str = "monsters";
