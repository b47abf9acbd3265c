//! Module records from the tables on a location's detail page.
//!
//! Column order differs between location pages, so cells are classified by
//! content rather than by position. See [`classify`].

use crate::config::SiteConfig;
use crate::result::Document;
use crate::text::stripped_text;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, info, trace};
use url::Url;

/// Rows with fewer data cells than this are never records.
pub const MIN_ROW_CELLS: usize = 3;

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("static selector"));
static HEADER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("static selector"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("static selector"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("static selector"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub identifier: String,
    pub title: String,
    /// May be empty.
    pub author: String,
    pub url: Option<Url>,
}

impl ItemRecord {
    /// `"{identifier}: {title}"`, the identity of the item across locations.
    pub fn key(&self) -> String {
        item_key(&self.identifier, &self.title)
    }
}

pub fn item_key(identifier: &str, title: &str) -> String {
    format!("{}: {}", identifier, title)
}

/// Slot assignment for one row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classified {
    pub identifier: String,
    pub title: String,
    pub author: String,
}

#[derive(Default)]
struct Slots<'a> {
    identifier: Option<&'a str>,
    title: Option<&'a str>,
    author: Option<&'a str>,
}

impl<'a> Slots<'a> {
    /// The first rule that applies claims the cell; later rules never see it.
    fn offer(mut self, text: &'a str, min_title_length: usize) -> Self {
        if text.is_empty() {
            return self;
        }
        if self.identifier.is_none() && looks_like_identifier(text) {
            self.identifier = Some(text);
        } else if self.title.is_none() && text.chars().count() > min_title_length {
            self.title = Some(text);
        } else if self.author.is_none() {
            self.author = Some(text);
        }
        self
    }
}

/// Assign identifier, title and author from a row's cell texts, left to right.
///
/// Per cell, in priority order: an all-digit text (dots ignored) fills an empty
/// identifier slot, else a text longer than `min_title_length` fills an empty
/// title slot, else any text fills an empty author slot. Returns `None` unless
/// identifier and title were both filled.
///
/// A numeric title or a title cell placed before the identifier cell can be
/// misread; that matches how the pages have always been read and is kept.
pub fn classify<S: AsRef<str>>(cells: &[S], min_title_length: usize) -> Option<Classified> {
    let slots = cells
        .iter()
        .map(|cell| cell.as_ref().trim())
        .fold(Slots::default(), |slots, text| {
            slots.offer(text, min_title_length)
        });

    match slots {
        Slots {
            identifier: Some(identifier),
            title: Some(title),
            author,
        } => Some(Classified {
            identifier: identifier.to_string(),
            title: title.to_string(),
            author: author.unwrap_or_default().to_string(),
        }),
        _ => None,
    }
}

fn looks_like_identifier(text: &str) -> bool {
    let mut digits = text.chars().filter(|c| *c != '.').peekable();
    digits.peek().is_some() && digits.all(|c| c.is_ascii_digit())
}

pub fn extract_records(document: &Document, config: &SiteConfig) -> Vec<ItemRecord> {
    extract_records_in(&document.body, &document.url, config)
}

/// All records from the data tables of `html`, in table and row order.
///
/// Duplicate rows are kept. Pages without a data table yield nothing.
pub fn extract_records_in(html: &str, page_url: &Url, config: &SiteConfig) -> Vec<ItemRecord> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for (index, table) in document.select(&TABLE_SELECTOR).enumerate() {
        if !is_data_table(table, config) {
            debug!("Skipping table {} on {}: no module header", index + 1, page_url);
            continue;
        }

        for row in table.select(&ROW_SELECTOR).skip(1) {
            let cells: Vec<ElementRef<'_>> = row.select(&CELL_SELECTOR).collect();
            if cells.len() < MIN_ROW_CELLS {
                continue;
            }

            let texts: Vec<String> = cells.iter().map(|cell| stripped_text(*cell)).collect();
            let Some(classified) = classify(&texts, config.min_title_length) else {
                trace!("Dropping unclassifiable row {:?}", texts);
                continue;
            };

            let url = first_link(&cells).and_then(|href| page_url.join(href.trim()).ok());

            debug!(
                "Found module {} - {}",
                classified.identifier, classified.title
            );
            records.push(ItemRecord {
                identifier: classified.identifier,
                title: classified.title,
                author: classified.author,
                url,
            });
        }
    }

    info!("Extracted {} modules from {}", records.len(), page_url);
    records
}

fn is_data_table(table: ElementRef<'_>, config: &SiteConfig) -> bool {
    table
        .select(&HEADER_SELECTOR)
        .map(|header| stripped_text(header).to_lowercase())
        .any(|header| config.is_data_header(&header))
}

fn first_link<'a>(cells: &[ElementRef<'a>]) -> Option<&'a str> {
    cells
        .iter()
        .find_map(|cell| cell.select(&LINK_SELECTOR).next())
        .and_then(|anchor| anchor.value().attr("href"))
}
