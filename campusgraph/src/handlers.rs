use anyhow::{Context, Result, bail};
use campusgraph_core::crawl::{CrawlOptions, CrawlOutcome, discover, execute_crawl};
use campusgraph_core::map::CampusMap;
use campusgraph_core::model::NodeKind;
use campusgraph_core::report::{ExportFormat, render, save_report};
use campusgraph_scanner::config::expand_path;
use campusgraph_scanner::{HttpFetcher, SiteConfig};
use clap::ArgMatches;
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/campusgraph/config.json";

/// Log level for the number of `-v` flags. Warnings only by default.
pub fn verbosity_level(count: u8) -> Level {
    match count {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init_tracing(verbosity: u8) {
    tracing_subscriber::fmt()
        .with_max_level(verbosity_level(verbosity))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Defaults, then the config file, then command-line overrides.
pub fn load_site_config(
    config_file: Option<&PathBuf>,
    root_url: Option<&Url>,
    site_root: Option<&Url>,
) -> Result<SiteConfig> {
    let mut config = match config_file {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => SiteConfig::default(),
    };

    if let Some(root_url) = root_url {
        config = config.with_root_url(root_url.clone());
    }
    if let Some(site_root) = site_root {
        config = config.with_site_root(site_root.clone());
    }

    config.validate()?;
    Ok(config)
}

/// `None` means print to the terminal.
pub fn resolve_output_path(output: Option<&PathBuf>, format: ExportFormat) -> Option<PathBuf> {
    output
        .map(|path| expand_path(path))
        .or_else(|| format.default_file_name().map(PathBuf::from))
}

/// Write the default configuration. Refuses to overwrite unless `force`.
pub fn write_default_config(path: &Path, force: bool) -> Result<PathBuf> {
    let path = expand_path(path);
    if path.exists() && !force {
        bail!("{} already exists", path.display());
    }
    SiteConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> String {
    print!("{} ", msg.bright_cyan().bold());
    let _ = io::stdout().flush();
    let mut response = String::new();
    if io::stdin().read_line(&mut response).is_err() {
        return String::new();
    }
    response.trim().to_lowercase()
}

fn site_config_from_args(args: &ArgMatches) -> Result<SiteConfig> {
    load_site_config(
        args.get_one::<PathBuf>("config"),
        args.get_one::<Url>("root-url"),
        args.get_one::<Url>("site-root"),
    )
}

fn fetcher_from_args(args: &ArgMatches) -> Result<HttpFetcher> {
    let timeout = args.get_one::<u64>("timeout").copied().unwrap_or(30);
    HttpFetcher::with_timeout(timeout).context("Failed to create HTTP client")
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    let raw_path = args
        .get_one::<String>("PATH")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_PATH);
    let mut force = args.get_flag("force");
    let path = expand_path(Path::new(raw_path));

    if path.exists() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!(
            "Configuration already exists: {}",
            path.display().to_string().bright_white()
        );
        let response = print_prompt("Overwrite it? [y/N]:");
        if response != "y" && response != "yes" {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return Ok(());
        }
        force = true;
    }

    let written = write_default_config(&path, force)?;
    println!(
        "{} Default configuration written to {}",
        "✓".green().bold(),
        written.display().to_string().bright_white()
    );
    Ok(())
}

pub async fn handle_locations(args: &ArgMatches, quiet: bool) -> Result<()> {
    let config = site_config_from_args(args)?;
    let fetcher = fetcher_from_args(args)?;

    let locations = discover(&fetcher, &config)
        .await
        .with_context(|| format!("Location discovery on {} failed", config.root_url))?;

    if !quiet {
        print_divider();
        println!(
            "  {} locations on {}",
            locations.len().to_string().bright_white().bold(),
            config.root_url
        );
        print_divider();
    }
    for (name, url) in &locations {
        println!("{} {}", name.bright_white(), url.to_string().bright_black());
    }
    Ok(())
}

pub async fn handle_crawl(args: &ArgMatches, quiet: bool) -> Result<()> {
    let config = site_config_from_args(args)?;
    let fetcher = fetcher_from_args(args)?;
    let workers = args.get_one::<usize>("workers").copied().unwrap_or(1).max(1);
    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("html");
    let Some(format) = ExportFormat::from_str(format_name) else {
        bail!("Unknown export format '{}'", format_name);
    };
    let output = resolve_output_path(args.get_one::<PathBuf>("output"), format);

    if !quiet {
        println!("\nCrawling {}", config.root_url.as_str().bright_white());
        println!("Workers: {}\n", workers);
    }

    let options = CrawlOptions {
        config,
        workers,
        show_progress_bars: !quiet,
    };
    let outcome = execute_crawl(&fetcher, options, None)
        .await
        .context("Crawl failed")?;

    let map = outcome.to_map();
    let content = render(&map, &outcome.failures, format)?;

    if !quiet {
        print_summary(&outcome, &map);
    }

    match output {
        Some(path) => {
            save_report(&content, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} Graph written to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn print_summary(outcome: &CrawlOutcome, map: &CampusMap) {
    println!();
    print_divider();
    println!("{}", "  CRAWL SUMMARY".bright_white().bold());
    print_divider();
    println!(
        "{} Locations: {}",
        "→".blue(),
        map.nodes_of(NodeKind::Location).count().to_string().cyan()
    );
    println!(
        "{} Modules: {} ({} offerings)",
        "→".blue(),
        map.nodes_of(NodeKind::Item).count().to_string().cyan(),
        map.edge_count().to_string().cyan()
    );

    let empty: Vec<&str> = outcome
        .locations
        .iter()
        .filter(|l| l.records.is_empty())
        .map(|l| l.name.as_str())
        .collect();
    if !empty.is_empty() {
        println!(
            "{} Without modules: {}",
            "ℹ".blue(),
            empty.join(", ").bright_black()
        );
    }

    for failure in &outcome.failures {
        println!(
            "{} {} skipped: {}",
            "✗".red().bold(),
            failure.name.bright_white(),
            failure.error
        );
    }
    println!();
}
