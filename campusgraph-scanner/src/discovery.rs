//! Location discovery on the root listing page.

use crate::config::SiteConfig;
use crate::error::Result;
use crate::result::Document;
use crate::text::stripped_text;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, info};
use url::Url;

/// Location name to detail page. A name seen twice keeps its last URL.
pub type LocationMap = BTreeMap<String, Url>;

static ENTRY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("static selector"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("static selector"));

pub fn discover_locations(document: &Document, config: &SiteConfig) -> Result<LocationMap> {
    discover_locations_in(&document.body, &document.url, config)
}

/// Collect every location linked from the configured list groups of `html`.
///
/// Returns an empty map when the page has no matching lists. Only a broken
/// list selector in `config` is an error.
pub fn discover_locations_in(
    html: &str,
    page_url: &Url,
    config: &SiteConfig,
) -> Result<LocationMap> {
    let list_selector = config.list_selector()?;
    let document = Html::parse_document(html);

    let mut locations = LocationMap::new();
    let mut list_count = 0;

    for list in document.select(&list_selector) {
        list_count += 1;
        for entry in list.select(&ENTRY_SELECTOR) {
            let Some(anchor) = entry.select(&ANCHOR_SELECTOR).next() else {
                continue;
            };

            let name = stripped_text(anchor);
            if name.is_empty() {
                debug!("Skipping anchor without text");
                continue;
            }
            if config.is_excluded(&name) {
                debug!("Skipping navigation entry '{}'", name);
                continue;
            }

            let Some(href) = anchor.value().attr("href") else {
                debug!("Skipping '{}': no href", name);
                continue;
            };
            let Some(url) = resolve_href(href, &config.site_root, page_url) else {
                debug!("Skipping '{}': cannot resolve '{}'", name, href);
                continue;
            };

            debug!("Found location {} -> {}", name, url);
            locations.insert(name, url);
        }
    }

    info!(
        "Discovered {} locations in {} link lists",
        locations.len(),
        list_count
    );
    Ok(locations)
}

/// Root-relative links (`/path`) resolve against the site root, everything
/// else against the page the link was found on.
pub fn resolve_href(href: &str, site_root: &Url, page_url: &Url) -> Option<Url> {
    let href = href.trim();
    let base = if href.starts_with('/') {
        site_root
    } else {
        page_url
    };
    base.join(href).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SiteConfig {
        SiteConfig::default()
    }

    fn page_url() -> Url {
        Url::parse("https://www.fernuni-hagen.de/studium/regionalzentren/betreuung/index.shtml")
            .unwrap()
    }

    #[test]
    fn test_root_relative_href_uses_site_root() {
        let site_root = Url::parse("https://www.fernuni-hagen.de").unwrap();
        let url = resolve_href("/a/b", &site_root, &page_url()).unwrap();
        assert_eq!(url.as_str(), "https://www.fernuni-hagen.de/a/b");
    }

    #[test]
    fn test_page_relative_href_uses_page_url() {
        let site_root = Url::parse("https://mirror.example").unwrap();
        let url = resolve_href("c/d", &site_root, &page_url()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.fernuni-hagen.de/studium/regionalzentren/betreuung/c/d"
        );
    }

    #[test]
    fn test_absolute_href_is_kept() {
        let site_root = Url::parse("https://www.fernuni-hagen.de").unwrap();
        let url = resolve_href("https://other.example/x", &site_root, &page_url()).unwrap();
        assert_eq!(url.as_str(), "https://other.example/x");
    }

    #[test]
    fn test_discovery_filters_excluded_labels() {
        let html = r#"<html><body>
            <ul class="fu-link-list">
                <li><a href="/berlin.shtml">Berlin</a></li>
                <li><a href="heute.shtml">Termine für heute und morgen</a></li>
                <li><a href="woche.shtml">Termine für weitere 7 Tage</a></li>
            </ul>
            <ul class="fu-link-list">
                <li><a href="heute.shtml">Termine für heute und morgen</a></li>
                <li><a href="hamburg.shtml"> Hamburg </a></li>
            </ul>
        </body></html>"#;

        let locations = discover_locations_in(html, &page_url(), &config()).unwrap();

        assert_eq!(locations.len(), 2);
        assert_eq!(
            locations["Berlin"].as_str(),
            "https://www.fernuni-hagen.de/berlin.shtml"
        );
        assert_eq!(
            locations["Hamburg"].as_str(),
            "https://www.fernuni-hagen.de/studium/regionalzentren/betreuung/hamburg.shtml"
        );
        for label in &config().excluded_labels {
            assert!(!locations.contains_key(label));
        }
    }

    #[test]
    fn test_discovery_ignores_other_lists() {
        let html = r#"<ul class="nav"><li><a href="/x">Impressum</a></li></ul>
            <ul class="fu-link-list"><li><a href="/hagen">Hagen</a></li></ul>"#;

        let locations = discover_locations_in(html, &page_url(), &config()).unwrap();

        assert_eq!(locations.keys().collect::<Vec<_>>(), vec!["Hagen"]);
    }

    #[test]
    fn test_last_seen_url_wins() {
        let html = r#"<ul class="fu-link-list">
            <li><a href="/old/berlin">Berlin</a></li>
            <li><a href="/new/berlin">Berlin</a></li>
        </ul>"#;

        let locations = discover_locations_in(html, &page_url(), &config()).unwrap();

        assert_eq!(locations.len(), 1);
        assert_eq!(
            locations["Berlin"].as_str(),
            "https://www.fernuni-hagen.de/new/berlin"
        );
    }

    #[test]
    fn test_entries_without_name_or_href_are_skipped() {
        let html = r#"<ul class="fu-link-list">
            <li>Kein Link</li>
            <li><a href="/leer">  </a></li>
            <li><a name="anker">Anker</a></li>
            <li><a href="/essen">Essen</a></li>
        </ul>"#;

        let locations = discover_locations_in(html, &page_url(), &config()).unwrap();

        assert_eq!(locations.keys().collect::<Vec<_>>(), vec!["Essen"]);
    }

    #[test]
    fn test_page_without_lists_yields_empty_map() {
        let locations = discover_locations_in("", &page_url(), &config()).unwrap();
        assert!(locations.is_empty());
    }

    #[test]
    fn test_custom_list_selector() {
        let html = r#"<ol id="standorte"><li><a href="/koeln">Köln</a></li></ol>"#;
        let config = SiteConfig {
            location_list_selector: "ol#standorte".to_string(),
            ..SiteConfig::default()
        };

        let locations = discover_locations_in(html, &page_url(), &config).unwrap();

        assert!(locations.contains_key("Köln"));
    }
}
