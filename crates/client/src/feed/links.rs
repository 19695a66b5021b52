//! Related-link harvesting from show notes HTML.

use scraper::{Html, Selector};

use podsearch_core::model::Link;

/// Anchors pointing at guest profiles; these are carried on the guest
/// record instead of the related links list.
const GUEST_PROFILE_MARKER: &str = "linkedin.com/in/";

/// Extract related links from a show notes HTML fragment.
///
/// Every `<a>` tag with an href is harvested except guest profile links.
pub fn harvest_links(html: &str) -> Vec<Link> {
    if html.trim().is_empty() {
        return Vec::new();
    }

    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse("a[href]").expect("invalid selector");

    let mut links = Vec::new();
    for element in fragment.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if href.contains(GUEST_PROFILE_MARKER) {
            continue;
        }

        let text = element.text().collect::<Vec<_>>().join(" ").trim().to_string();
        let text = if text.is_empty() { "[link]".to_string() } else { text };

        links.push(Link { text, url: href.to_string() });
    }

    links
}
