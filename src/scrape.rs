// src/scrape.rs
//! Pipeline driver: listing → pages → records.
//!
//! Sequential: one request at a time with a fixed pause between
//! requests. A page that fails to fetch, parse or validate is logged with its
//! URL and skipped; only a listing failure aborts the run.

use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::consts::{FEATS_URL, MAX_SUBPAGE_DEPTH};
use crate::config::options::ScrapeOptions;
use crate::core::net::Fetch;
use crate::core::sanitize::normalize_link;
use crate::error::{FetchError, ParseError, ScrapeError};
use crate::progress::Progress;
use crate::record::MonsterRecord;
use crate::specs::feats::FeatCatalog;
use crate::specs::{listing, monster};

/// A page that was skipped, and why.
#[derive(Debug)]
pub struct Failure {
    pub url: String,
    pub error: ScrapeError,
}

#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// Valid records in visiting order, names unique.
    pub records: Vec<MonsterRecord>,
    pub failures: Vec<Failure>,
    /// Records dropped because a monster with the same name came first.
    pub duplicates: usize,
    /// Third-party stat blocks that slipped past the link filter.
    pub filtered: usize,
}

impl ScrapeReport {
    pub fn failed_urls(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.url.as_str())
    }
}

/// Sleeps `pause` before every request but the first.
struct PoliteFetcher<'a> {
    inner: &'a mut dyn Fetch,
    pause: Duration,
    requests: usize,
}

impl PoliteFetcher<'_> {
    fn get(&mut self, url: &str) -> Result<String, FetchError> {
        if self.requests > 0 && !self.pause.is_zero() {
            thread::sleep(self.pause); // be polite
        }
        self.requests += 1;
        self.inner.get(url)
    }
}

/// Run the whole scrape. Errors only when the listing cannot be read.
pub fn run(
    opts: &ScrapeOptions,
    fetcher: &mut dyn Fetch,
    mut progress: Option<&mut dyn Progress>,
) -> Result<ScrapeReport, ScrapeError> {
    let mut net = PoliteFetcher { inner: fetcher, pause: opts.pause, requests: 0 };

    if let Some(p) = progress.as_deref_mut() {
        p.log("Fetching bestiary listing…");
    }
    let links = net
        .get(&opts.listing_url)
        .map_err(ScrapeError::from)
        .and_then(|html| Ok(listing::monster_links(&html, &opts.monster_prefix)?))
        .map_err(|e| ScrapeError::Listing { url: opts.listing_url.clone(), source: Box::new(e) })?;
    info!(links = links.len(), url = %opts.listing_url, "listing parsed");

    let feats = if opts.load_feats {
        if let Some(p) = progress.as_deref_mut() {
            p.log("Fetching feat index…");
        }
        load_feats(&mut net)
    } else {
        FeatCatalog::empty()
    };

    let targets: Vec<&String> = links
        .iter()
        .filter(|u| opts.include_summons || !listing::is_summon(u))
        .take(opts.limit.unwrap_or(usize::MAX))
        .collect();

    if let Some(p) = progress.as_deref_mut() {
        p.begin(targets.len());
    }

    let mut walk = Walk {
        net,
        opts,
        feats,
        visited: HashSet::new(),
        names: HashSet::new(),
        report: ScrapeReport::default(),
    };
    for url in targets {
        walk.visit(url, url, 0);
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(url);
        }
    }

    let report = walk.report;
    info!(
        records = report.records.len(),
        failed = report.failures.len(),
        duplicates = report.duplicates,
        third_party = report.filtered,
        "scrape finished"
    );
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(report)
}

/// A missing feat index degrades feat counting, it does not stop the run.
fn load_feats(net: &mut PoliteFetcher<'_>) -> FeatCatalog {
    match net.get(FEATS_URL) {
        Ok(html) => {
            let cat = FeatCatalog::parse(&html);
            if cat.is_empty() {
                warn!(url = FEATS_URL, "feat index has no feats; counting by commas");
            } else {
                debug!(feats = cat.len(), "feat catalog loaded");
            }
            cat
        }
        Err(e) => {
            warn!(url = FEATS_URL, error = %e, "feat index unavailable; counting by commas");
            FeatCatalog::empty()
        }
    }
}

struct Walk<'a> {
    net: PoliteFetcher<'a>,
    opts: &'a ScrapeOptions,
    feats: FeatCatalog,
    visited: HashSet<String>,
    names: HashSet<String>,
    report: ScrapeReport,
}

impl Walk<'_> {
    /// `origin` is the page that started a suggestion chain, `url` itself otherwise.
    fn visit(&mut self, url: &str, origin: &str, depth: usize) {
        if !self.visited.insert(normalize_link(url)) {
            return;
        }

        let html = match self.net.get(url) {
            Ok(html) => html,
            Err(e) => return self.fail(url, e.into()),
        };

        if let Some(next) = listing::suggested_link(&html, url) {
            return self.follow_suggestion(url, origin, next, depth);
        }

        let subpages = if self.opts.follow_subpages {
            listing::subpage_links(&html, url, &self.opts.monster_prefix)
        } else {
            Vec::new()
        };

        let parsed = monster::parse_monster(&html, url, &self.feats)
            .map_err(ScrapeError::from)
            .and_then(|rec| {
                rec.validate()?;
                Ok(rec)
            });
        match parsed {
            Ok(rec) => self.accept(rec),
            // hub page: the monsters live on the subpages
            Err(ScrapeError::Parse(ParseError::NoStatBlock)) if !subpages.is_empty() => {
                debug!(url, subpages = subpages.len(), "hub page");
            }
            Err(ScrapeError::Parse(ParseError::ThirdParty(name))) => {
                debug!(url, name = %name, "third-party stat block skipped");
                self.report.filtered += 1;
            }
            Err(e) => self.fail(url, e),
        }

        if depth >= MAX_SUBPAGE_DEPTH {
            if !subpages.is_empty() {
                warn!(url, skipped = subpages.len(), "subpage depth limit reached");
            }
            return;
        }
        for sub in subpages {
            if self.opts.include_summons || !listing::is_summon(&sub) {
                self.visit(&sub, &sub, depth + 1);
            }
        }
    }

    fn follow_suggestion(&mut self, url: &str, origin: &str, next: String, depth: usize) {
        if self.visited.contains(&normalize_link(&next)) {
            debug!(from = origin, to = %next, "suggestion points to a page already visited");
            self.report.duplicates += 1;
            return;
        }
        if depth >= MAX_SUBPAGE_DEPTH {
            warn!(from = origin, at = url, to = %next, "suggestion chain too long");
            return self.fail(origin, ParseError::UnresolvedSuggestion(next).into());
        }
        debug!(from = url, to = %next, "following suggestion");
        self.visit(&next, origin, depth + 1);
    }

    fn accept(&mut self, rec: MonsterRecord) {
        if !self.names.insert(rec.name.clone()) {
            debug!(name = %rec.name, url = %rec.source_url, "duplicate monster name skipped");
            self.report.duplicates += 1;
            return;
        }
        debug!(name = %rec.name, cr = %rec.cr, "parsed");
        self.report.records.push(rec);
    }

    fn fail(&mut self, url: &str, error: ScrapeError) {
        warn!(url, kind = error.kind(), error = %error, "page skipped");
        self.report.failures.push(Failure { url: s!(url), error });
    }
}
