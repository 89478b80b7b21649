// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Bestiary index page to enumerate monsters from.
    pub listing_url: String,
    /// Only links under this prefix count as monster pages.
    pub monster_prefix: String,
    pub include_summons: bool,
    /// Follow "Subpages" blocks of hub pages.
    pub follow_subpages: bool,
    /// Fetch the feat index to count feats by name.
    pub load_feats: bool,
    /// Stop after this many listing entries.
    pub limit: Option<usize>,
    pub pause: Duration,
    pub timeout: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            listing_url: s!(LISTING_URL),
            monster_prefix: s!(MONSTER_PREFIX),
            include_summons: false,
            follow_subpages: true,
            load_feats: true,
            limit: None,
            pause: Duration::from_millis(REQUEST_PAUSE_MS),
            timeout: Duration::from_secs(TIMEOUT_SECS),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    out_path: PathBuf,
    pub sqlite_path: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_path: Self::default_out_path(),
            sqlite_path: None,
        }
    }
}

impl ExportOptions {
    pub fn default_out_path() -> PathBuf {
        PathBuf::from(DEFAULT_OUT_DIR).join(format!("{DEFAULT_FILE}.csv"))
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    /// Accepts a file path, or a directory (existing, or hinted with a
    /// trailing separator) which gets the default file name.
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        if s.is_empty() {
            self.out_path = Self::default_out_path();
            return;
        }
        let p = PathBuf::from(crate::file::normalize_separators(s));
        self.out_path = if crate::file::looks_like_dir_hint(s) || p.is_dir() {
            p.join(format!("{DEFAULT_FILE}.csv"))
        } else {
            p
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_hint_gets_default_file_name() {
        let mut opts = ExportOptions::default();
        opts.set_path("data/");
        assert_eq!(opts.out_path(), Path::new("data").join("bestiary.csv"));

        opts.set_path("data/monsters.csv");
        assert!(opts.out_path().ends_with("monsters.csv"));

        opts.set_path("   ");
        assert_eq!(opts.out_path(), ExportOptions::default_out_path());
    }
}
