use crate::error::{Result, ScanError};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Listing page of all regional centres on the reference site.
pub const DEFAULT_ROOT_URL: &str =
    "https://www.fernuni-hagen.de/studium/regionalzentren/betreuung/index.shtml";

/// Root-relative links on the listing page are resolved against this.
pub const DEFAULT_SITE_ROOT: &str = "https://www.fernuni-hagen.de";

/// Navigation entries that share the location lists but are not locations.
pub const DEFAULT_EXCLUDED_LABELS: [&str; 5] = [
    "Termine für heute und morgen",
    "Termine für weitere 7 Tage",
    "Alle Mentoriate - Campusstandort auswählen",
    "Teilnahmebescheinigung zum Download",
    "Veranstaltungen an den Campusstandorten",
];

pub const DEFAULT_MIN_TITLE_LENGTH: usize = 5;

pub const DEFAULT_TABLE_KEYWORDS: [&str; 2] = ["modulnr", "modul"];

pub const DEFAULT_LOCATION_LIST_SELECTOR: &str = "ul.fu-link-list";

/// Everything the discovery and extraction stages know about the site.
///
/// Missing fields fall back to the reference site's values, so a config file
/// only has to name what differs on a mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub root_url: Url,
    pub site_root: Url,
    pub excluded_labels: BTreeSet<String>,
    /// A title must be strictly longer than this many characters.
    pub min_title_length: usize,
    /// Lower-case substrings; one must occur in a header cell of a data table.
    pub table_keywords: Vec<String>,
    pub location_list_selector: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: Url::parse(DEFAULT_ROOT_URL).expect("default root URL is valid"),
            site_root: Url::parse(DEFAULT_SITE_ROOT).expect("default site root is valid"),
            excluded_labels: DEFAULT_EXCLUDED_LABELS
                .iter()
                .map(|label| label.to_string())
                .collect(),
            min_title_length: DEFAULT_MIN_TITLE_LENGTH,
            table_keywords: DEFAULT_TABLE_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
            location_list_selector: DEFAULT_LOCATION_LIST_SELECTOR.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn with_root_url(mut self, root_url: Url) -> Self {
        self.root_url = root_url;
        self
    }

    pub fn with_site_root(mut self, site_root: Url) -> Self {
        self.site_root = site_root;
        self
    }

    /// Read a JSON config file. `~` in the path is expanded.
    pub fn load(path: &Path) -> Result<Self> {
        let path = expand_path(path);
        let content = fs::read_to_string(&path).map_err(|e| {
            ScanError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: SiteConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let path = expand_path(path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.site_root.cannot_be_a_base() {
            return Err(ScanError::InvalidUrl(format!(
                "site root {} cannot be used as a base",
                self.site_root
            )));
        }
        if self.table_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ScanError::Config(
                "at least one table keyword is required".to_string(),
            ));
        }
        self.list_selector().map(|_| ())
    }

    pub fn is_excluded(&self, label: &str) -> bool {
        self.excluded_labels.contains(label)
    }

    /// `header` is expected lower-cased already.
    pub fn is_data_header(&self, header: &str) -> bool {
        self.table_keywords
            .iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .any(|keyword| !keyword.is_empty() && header.contains(&keyword))
    }

    pub fn list_selector(&self) -> Result<Selector> {
        Selector::parse(&self.location_list_selector)
            .map_err(|_| ScanError::InvalidSelector(self.location_list_selector.clone()))
    }
}

pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = SiteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_title_length, 5);
        assert_eq!(config.excluded_labels.len(), 5);
        assert!(config.is_excluded("Termine für heute und morgen"));
        assert!(!config.is_excluded("Berlin"));
    }

    #[test]
    fn test_data_header_matching() {
        let config = SiteConfig::default();
        assert!(config.is_data_header("modulnr."));
        assert!(config.is_data_header("modul / titel"));
        assert!(!config.is_data_header("datum"));
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: SiteConfig =
            serde_json::from_str(r#"{"min_title_length": 8}"#).unwrap();
        assert_eq!(config.min_title_length, 8);
        assert_eq!(config.site_root.as_str(), "https://www.fernuni-hagen.de/");
        assert_eq!(config.table_keywords, vec!["modulnr", "modul"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = SiteConfig::default()
            .with_site_root(Url::parse("http://mirror.example").unwrap());

        config.save(&path).unwrap();
        let loaded = SiteConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let config = SiteConfig {
            location_list_selector: "ul[".to_string(),
            ..SiteConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScanError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_blank_keywords_are_rejected() {
        let config = SiteConfig {
            table_keywords: vec!["  ".to_string()],
            ..SiteConfig::default()
        };
        assert!(matches!(config.validate(), Err(ScanError::Config(_))));
    }
}
