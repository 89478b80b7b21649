// src/specs/feats.rs
//! Feat catalog scraped from the site's feat index, used to count the feats on
//! a monster's `Feats` line.
//!
//! Feat lines are free text (`Improved Initiative, Power Attack, Weapon Focus
//! (greataxe)`), and some feat names contain commas or parentheses of their
//! own, so matching against known names is more reliable than splitting.
//! Without a catalog the counter falls back to top-level commas.

use std::collections::HashSet;

use url::Url;

use crate::config::consts::FEATS_PREFIX;
use crate::core::html::{anchors, anchors_after_heading};
use crate::core::sanitize::{normalize_link, normalize_ws, strip_parens};

/// Longest feat name on the site, in words.
const MAX_FEAT_WORDS: usize = 6;

#[derive(Clone, Debug, Default)]
pub struct FeatCatalog {
    names: HashSet<String>,
}

impl FeatCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| normalize_ws(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    /// Feat names linked from the feat index page. Only links after the
    /// `<h4>General Feats</h4>` heading are read when it exists; the site menu
    /// above it links unrelated pages under the same prefix.
    pub fn parse(html: &str) -> Self {
        let base = Url::parse(FEATS_PREFIX).ok();
        let prefix = normalize_link(FEATS_PREFIX);

        let found = anchors_after_heading(html, "h4", "General Feats", "a[href]", base.as_ref())
            .unwrap_or_else(|| anchors(html, "a[href]", base.as_ref()));
        let names = found
            .into_iter()
            .filter(|a| {
                let key = normalize_link(&a.href);
                key.len() > prefix.len() && key.starts_with(&prefix)
            })
            // "Weapon Focus (Combat)" → "Weapon Focus"
            .map(|a| a.text.split('(').next().unwrap_or("").trim().to_string());
        Self::from_names(names)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of feats on a `Feats` line.
    pub fn count(&self, feats_line: &str) -> i64 {
        if self.is_empty() {
            return count_by_commas(feats_line);
        }

        // Parenthesised arguments never start a feat name
        let cleaned = strip_parens(feats_line).replace(',', " ");
        let mut words: Vec<&str> = cleaned.split_whitespace().collect();
        let mut found = 0i64;

        // Longest names first; matched words are consumed so the words of
        // "Great Cleave" are not counted again as "Cleave".
        for len in (1..=MAX_FEAT_WORDS).rev() {
            let mut used = vec![false; words.len()];
            let mut i = 0usize;
            while i + len <= words.len() {
                let phrase = words[i..i + len].join(" ");
                if self.contains(&phrase) {
                    found += 1;
                    used[i..i + len].fill(true);
                    i += len;
                } else {
                    i += 1;
                }
            }
            let mut idx = 0;
            words.retain(|_| {
                let keep = !used[idx];
                idx += 1;
                keep
            });
        }
        found
    }
}

/// Top-level comma count; commas inside parentheses do not separate feats.
pub fn count_by_commas(feats_line: &str) -> i64 {
    strip_parens(feats_line)
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_catalog_from_index() {
        let html = r#"
            <ul class="menu">
              <li><a href="https://www.d20pfsrd.com/feats/">Feats</a></li>
              <li><a href="https://www.d20pfsrd.com/feats/general-feats/">General Feats</a></li>
              <li><a href="https://www.d20pfsrd.com/feats/combat-feats/cleave-combat/">Cleave</a></li>
            </ul>
            <h4><span><a href="x">General Feats</a></span></h4>
            <ul>
              <li><a href="https://www.d20pfsrd.com/feats/general-feats/dodge/">Dodge</a></li>
              <li><a href="https://www.d20pfsrd.com/feats/combat-feats/power-attack-combat/">Power Attack (Combat)</a></li>
              <li><a href="/feats/combat-feats/weapon-focus-combat/">Weapon Focus (Combat)</a></li>
              <li><a href="https://www.d20pfsrd.com/classes/">Classes</a></li>
            </ul>"#;
        let cat = FeatCatalog::parse(html);
        assert_eq!(cat.len(), 3);
        assert!(cat.contains("Dodge"));
        assert!(cat.contains("Power Attack"));
        assert!(cat.contains("Weapon Focus"));
        assert!(!cat.contains("Feats"));
        assert!(!cat.contains("Cleave"));
        assert!(!cat.contains("General Feats"));
    }

    #[test]
    fn parse_without_heading_reads_whole_page() {
        let html = r#"<a href="https://www.d20pfsrd.com/feats/general-feats/toughness/">Toughness</a>"#;
        assert!(FeatCatalog::parse(html).contains("Toughness"));
    }

    #[test]
    fn count_with_catalog_prefers_longest_unconsumed() {
        let cat = FeatCatalog::from_names([
            "Dodge",
            "Power Attack",
            "Improved Initiative",
            "Weapon Focus",
            "Cleave",
            "Great Cleave",
        ]);
        let line = " Cleave, Great Cleave, Improved Initiative, Power Attack, Weapon Focus (greataxe, bite)";
        assert_eq!(cat.count(line), 5);
        assert_eq!(cat.count("Great Cleave"), 1);
        assert_eq!(cat.count("Dodge"), 1);
        assert_eq!(cat.count(""), 0);
    }

    #[test]
    fn count_without_catalog_uses_commas() {
        let cat = FeatCatalog::empty();
        assert_eq!(cat.count("Power Attack, Weapon Focus (greataxe, gore), Toughness"), 3);
        assert_eq!(count_by_commas("  "), 0);
    }
}
