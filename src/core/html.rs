// src/core/html.rs
// Thin helpers over `scraper` so the specs never touch the DOM API directly.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// An `<a href>` with its href resolved against the page URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

/// All text nodes of the document, concatenated in document order.
/// Line breaks present in the markup survive, which the stat parser relies on.
pub fn document_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    doc.root_element().text().collect()
}

/// Anchors matching `css` (must select `a` elements), in document order.
/// Hrefs that cannot be resolved are skipped.
pub fn anchors(html: &str, css: &str, base: Option<&Url>) -> Vec<Anchor> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);

    doc.select(&selector).filter_map(|a| to_anchor(a, base)).collect()
}

/// Like [`anchors`], restricted to links after the first `heading` element
/// whose text is `title`. `None` when no such heading exists.
pub fn anchors_after_heading(
    html: &str,
    heading: &str,
    title: &str,
    css: &str,
    base: Option<&Url>,
) -> Option<Vec<Anchor>> {
    let heading = Selector::parse(heading).ok()?;
    let links = Selector::parse(css).ok()?;
    let doc = Html::parse_document(html);

    let start = doc
        .select(&heading)
        .find(|h| super::sanitize::normalize_ws(&h.text().collect::<String>()) == title)?;

    // pre-order walk is document order; links inside the heading itself are not content
    let found = doc
        .root_element()
        .descendants()
        .skip_while(|n| n.id() != start.id())
        .filter(|n| !n.ancestors().any(|p| p.id() == start.id()))
        .filter_map(ElementRef::wrap)
        .filter(|e| links.matches(e))
        .filter_map(|a| to_anchor(a, base))
        .collect();
    Some(found)
}

fn to_anchor(a: ElementRef<'_>, base: Option<&Url>) -> Option<Anchor> {
    let raw = a.value().attr("href")?.trim();
    let href = resolve(raw, base)?;
    let text = super::sanitize::normalize_ws(&a.text().collect::<String>());
    Some(Anchor { href, text })
}

fn resolve(raw: &str, base: Option<&Url>) -> Option<String> {
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }
    match Url::parse(raw) {
        Ok(u) => Some(u.into()),
        Err(url::ParseError::RelativeUrlWithoutBase) => base?.join(raw).ok().map(Into::into),
        Err(_) => None,
    }
}

/// The part of `s` after the first occurrence of `marker`.
pub fn slice_after<'a>(s: &'a str, marker: &str) -> Option<&'a str> {
    s.find(marker).map(|i| &s[i + marker.len()..])
}
