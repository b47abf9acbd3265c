use crate::error::Result;
use crate::map::CampusMap;
use campusgraph_scanner::{
    Fetch, ItemRecord, LocationMap, SiteConfig, discover_locations, extract_records_in,
};
use futures::StreamExt;
use futures::stream;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub config: SiteConfig,
    /// Location pages fetched at once. 1 is a strictly sequential crawl.
    pub workers: usize,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            workers: 1,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Debug, Clone, Serialize)]
pub struct LocationModules {
    pub name: String,
    pub url: Url,
    pub records: Vec<ItemRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationFailure {
    pub name: String,
    pub url: Url,
    pub error: String,
}

/// Everything one crawl produced. Failed locations are listed, not graphed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlOutcome {
    pub locations: Vec<LocationModules>,
    pub failures: Vec<LocationFailure>,
}

impl CrawlOutcome {
    pub fn module_count(&self) -> usize {
        self.locations.iter().map(|l| l.records.len()).sum()
    }

    pub fn to_map(&self) -> CampusMap {
        let mut map = CampusMap::new();
        for location in &self.locations {
            let index = map.add_location(&location.name, Some(location.url.clone()));
            map.add_records(index, &location.records);
        }
        map
    }
}

/// Fetch the listing page and return the locations it links to.
///
/// The listing page is the one fetch whose failure ends the crawl.
pub async fn discover<F: Fetch>(fetcher: &F, config: &SiteConfig) -> Result<LocationMap> {
    config.validate()?;
    info!("Looking for locations on {}", config.root_url);
    let document = fetcher.fetch(&config.root_url).await?;
    Ok(discover_locations(&document, config)?)
}

/// Fetch every location page and extract its modules.
///
/// A location whose page cannot be retrieved is logged, recorded in
/// [`CrawlOutcome::failures`] and left out; the others are unaffected.
/// Results keep the order of `locations` whatever `workers` is.
pub async fn collect_modules<F: Fetch>(
    fetcher: &F,
    locations: &LocationMap,
    config: &SiteConfig,
    workers: usize,
    mut on_location: impl FnMut(&str),
) -> CrawlOutcome {
    let mut outcome = CrawlOutcome::default();

    let mut pages = stream::iter(locations.iter())
        .map(|(name, url)| async move { (name, url, fetcher.fetch(url).await) })
        .buffered(workers.max(1));

    while let Some((name, url, fetched)) = pages.next().await {
        on_location(name);
        match fetched {
            Ok(document) => {
                let records = extract_records_in(&document.body, url, config);
                info!("{}: {} modules", name, records.len());
                outcome.locations.push(LocationModules {
                    name: name.clone(),
                    url: url.clone(),
                    records,
                });
            }
            Err(e) => {
                warn!("Skipping location {} ({}): {}", name, url, e);
                outcome.failures.push(LocationFailure {
                    name: name.clone(),
                    url: url.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}

/// Execute a crawl with the given options
pub async fn execute_crawl<F: Fetch>(
    fetcher: &F,
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome> {
    let CrawlOptions {
        config,
        workers,
        show_progress_bars,
    } = options;

    let progress_bar = show_progress_bars.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Looking for locations...");
        pb
    });

    let locations = discover(fetcher, &config).await?;
    if let Some(ref callback) = progress_callback {
        callback(format!("Found {} locations", locations.len()));
    }
    if locations.is_empty() {
        warn!("No locations found on {}", config.root_url);
    }

    let total = locations.len();
    let mut done = 0;
    let outcome = collect_modules(fetcher, &locations, &config, workers, |name| {
        done += 1;
        if let Some(ref pb) = progress_bar {
            pb.set_message(format!("[{}/{}] {}", done, total, name));
        }
        if let Some(ref callback) = progress_callback {
            callback(format!("Processed location {}/{}: {}", done, total, name));
        }
    })
    .await;

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Crawl complete! {} locations, {} modules, {} failed",
            outcome.locations.len(),
            outcome.module_count(),
            outcome.failures.len()
        ));
    }

    Ok(outcome)
}
