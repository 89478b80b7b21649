// src/specs/listing.rs
//! Scraping *spec* for the bestiary listing and for link blocks on monster pages.
//!
//! Purpose:
//! - Read the **bestiary index** (monsters by CR) and return every monster page
//!   link, in document order, once.
//! - Read the **"Subpages"** block (`div.ogn-childpages`) of hub pages that group
//!   several monsters (e.g. a dragon family).
//! - Read the site's **suggestion page** ("We've found at least one possible
//!   match…") and return the first suggested link.
//!
//! A monster link is any anchor whose resolved href lives under the configured
//! monster prefix. Third-party content (`3pp`, `tohc`) is dropped. Links are
//! deduplicated ignoring a trailing slash; the first occurrence keeps its place
//! and its original spelling.
//!
//! Non-Responsibilities:
//! - **No fetching.** Callers hand in HTML.
//! - **No summon filtering.** That is a run option, see [`is_summon`].

use std::collections::HashSet;

use url::Url;

use crate::config::consts::SUGGESTION_MARKER;
use crate::core::html::{anchors, slice_after, Anchor};
use crate::core::sanitize::{is_third_party, normalize_link};
use crate::error::ParseError;

/// Ordered, deduplicated monster page URLs. Iterate as often as needed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonsterLinks {
    links: Vec<String>,
}

impl MonsterLinks {
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.links
    }
}

impl<'a> IntoIterator for &'a MonsterLinks {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

/// Every monster link on the listing page.
/// Errors with `NoMonsterLinks` when none are found (page layout changed).
pub fn monster_links(html: &str, prefix: &str) -> Result<MonsterLinks, ParseError> {
    let base = Url::parse(prefix).ok();
    let links = filter_links(anchors(html, "a[href]", base.as_ref()), prefix, None);
    if links.is_empty() {
        return Err(ParseError::NoMonsterLinks);
    }
    Ok(MonsterLinks { links })
}

/// Links in a hub page's "Subpages" block. Empty when the page has none.
pub fn subpage_links(html: &str, page_url: &str, prefix: &str) -> Vec<String> {
    let base = Url::parse(page_url).ok();
    let found = anchors(html, "div.ogn-childpages a[href]", base.as_ref());
    filter_links(found, prefix, Some(page_url))
}

/// First link of a suggestion page, if `html` is one.
pub fn suggested_link(html: &str, page_url: &str) -> Option<String> {
    let rest = slice_after(html, SUGGESTION_MARKER)?;
    let base = Url::parse(page_url).ok();
    anchors(rest, "a[href]", base.as_ref())
        .into_iter()
        .map(|a| a.href)
        .find(|href| normalize_link(href) != normalize_link(page_url))
}

/// Summoned-creature templates have non-standard stat blocks.
pub fn is_summon(url: &str) -> bool {
    url.to_ascii_lowercase().contains("summon")
}

fn filter_links(found: Vec<Anchor>, prefix: &str, exclude: Option<&str>) -> Vec<String> {
    let prefix = normalize_link(prefix);
    let mut seen: HashSet<String> = HashSet::new();
    if let Some(own) = exclude {
        seen.insert(normalize_link(own));
    }

    found
        .into_iter()
        .filter(|a| !is_third_party(&a.href) && !is_third_party(&a.text))
        .filter_map(|a| {
            let key = normalize_link(&a.href);
            // strictly below the prefix: the prefix page itself is an index
            let below = key.len() > prefix.len()
                && key.starts_with(&prefix)
                && key[prefix.len()..].starts_with('/');
            (below && seen.insert(key)).then_some(a.href)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "https://www.d20pfsrd.com/bestiary/monster-listings/";

    #[test]
    fn keeps_order_drops_dupes_and_3pp() {
        let html = r#"
            <a href="https://www.d20pfsrd.com/bestiary/monster-listings/humanoids/goblin/">Goblin</a>
            <a href="https://www.d20pfsrd.com/bestiary/monster-listings/">All monsters</a>
            <a href="https://www.d20pfsrd.com/feats/">Feats</a>
            <a href="https://www.d20pfsrd.com/bestiary/monster-listings/3pp-monsters/foo/">Foo</a>
            <a href="/bestiary/monster-listings/animals/wolf/">Wolf</a>
            <a href="https://www.d20pfsrd.com/bestiary/monster-listings/humanoids/goblin">Goblin again</a>
            <a href="https://www.d20pfsrd.com/bestiary/monster-listings/aberrations/otyugh/">Otyugh (ToHC)</a>
        "#;
        let links = monster_links(html, PREFIX).unwrap();
        assert_eq!(
            links.iter().map(String::as_str).collect::<Vec<_>>(),
            vec![
                "https://www.d20pfsrd.com/bestiary/monster-listings/humanoids/goblin/",
                "https://www.d20pfsrd.com/bestiary/monster-listings/animals/wolf/",
            ]
        );
        // restartable
        assert_eq!(links.iter().count(), 2);
        assert_eq!((&links).into_iter().count(), 2);
    }

    #[test]
    fn no_links_is_an_error() {
        let html = r#"<a href="https://www.d20pfsrd.com/feats/">Feats</a>"#;
        assert_eq!(monster_links(html, PREFIX), Err(ParseError::NoMonsterLinks));
    }

    #[test]
    fn subpages_only_from_child_block() {
        let page = "https://www.d20pfsrd.com/bestiary/monster-listings/dragons/red/";
        let html = r#"
            <a href="https://www.d20pfsrd.com/bestiary/monster-listings/dragons/blue/">Sidebar</a>
            <div class="ogn-childpages"><h4>Subpages</h4><ul>
              <li><a href="https://www.d20pfsrd.com/bestiary/monster-listings/dragons/red/young-red/">Young</a></li>
              <li><a href="https://www.d20pfsrd.com/bestiary/monster-listings/dragons/red/adult-red">Adult</a></li>
              <li><a href="https://www.d20pfsrd.com/bestiary/monster-listings/dragons/red/">Self</a></li>
            </ul></div>"#;
        assert_eq!(
            subpage_links(html, page, PREFIX),
            vec![
                s!("https://www.d20pfsrd.com/bestiary/monster-listings/dragons/red/young-red/"),
                s!("https://www.d20pfsrd.com/bestiary/monster-listings/dragons/red/adult-red"),
            ]
        );
    }

    #[test]
    fn suggestion_page_link() {
        let page = "https://www.d20pfsrd.com/bestiary/monster-listings/humanoids/gobln";
        let html = r#"<p>We've found at least one possible match for the page you really want:</p>
            <ul><li><a href="https://www.d20pfsrd.com/bestiary/monster-listings/humanoids/goblin/">Goblin</a></li></ul>"#;
        assert_eq!(
            suggested_link(html, page).as_deref(),
            Some("https://www.d20pfsrd.com/bestiary/monster-listings/humanoids/goblin/")
        );
        assert_eq!(suggested_link("<p>nothing here</p>", page), None);
    }

    #[test]
    fn summon_detection() {
        assert!(is_summon("https://x/monster-listings/templates/summoned-creature"));
        assert!(!is_summon("https://x/monster-listings/animals/wolf"));
    }
}
