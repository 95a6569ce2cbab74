//! Bazaar marketplace CLI
//!
//! Terminal front end for the plugin marketplace. Every command loads the
//! configuration and persisted state, fetches the catalog when it needs one,
//! and prints either a human listing or JSON.

use anyhow::{Context, Result, bail};
use bazaar_core::catalog::HttpCatalog;
use bazaar_core::config::{Config, Directories};
use bazaar_core::scoring::ScoredPlugin;
use bazaar_core::storage::FileStore;
use bazaar_core::{InteractionKind, Marketplace, Plugin, SortMode, Theme};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

type Market = Marketplace<FileStore>;

/// Bazaar plugin marketplace CLI
#[derive(Parser)]
#[command(name = "bazaar")]
#[command(about = "Bazaar - browse, search and discover marketplace plugins")]
#[command(version)]
#[command(after_help = "\
Examples:
  bazaar list                         First page of the catalog
  bazaar list --search weather        Search names, descriptions and authors
  bazaar list --tag tools --sort stars
  bazaar list --sort random --seed 0.42
  bazaar list --sort random --reshuffle
  bazaar tags                         All tags in the catalog
  bazaar recommend                    Picks based on your activity
  bazaar similar astrbot_plugin_dice  Plugins related to another one
  bazaar show astrbot_plugin_dice     Plugin details
  bazaar track favorite astrbot_plugin_dice
  bazaar theme toggle                 Switch between light and dark

Logging is controlled with RUST_LOG (e.g. RUST_LOG=bazaar_core=debug).
")]
struct Cli {
    /// Print JSON instead of a human summary
    #[arg(long, global = true)]
    json: bool,

    /// Catalog endpoint, overriding the configured one
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List plugins, filtered, sorted and paginated
    List {
        /// Case-insensitive text matched against name, description and author
        #[arg(long, short)]
        search: Option<String>,

        /// Only plugins carrying this exact tag
        #[arg(long, short)]
        tag: Option<String>,

        /// Sort order: default, stars, updated or random
        #[arg(long, default_value = "default")]
        sort: SortMode,

        /// Page number, starting at 1
        #[arg(long, short, default_value_t = 1)]
        page: usize,

        /// Shuffle seed in [0, 1) for random order
        #[arg(long, conflicts_with = "reshuffle")]
        seed: Option<f64>,

        /// Roll a fresh shuffle (random order only)
        #[arg(long)]
        reshuffle: bool,
    },

    /// List every tag in the catalog
    Tags,

    /// Personalized recommendations
    Recommend,

    /// Plugins related to the named plugin
    Similar {
        /// Plugin name
        name: String,

        /// Maximum number of results
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Show one plugin and record a detail view
    Show {
        /// Plugin name
        name: String,
    },

    /// Record an interaction with a plugin
    Track {
        /// impression, open, detail, copy, social or favorite
        kind: String,

        /// Plugin name
        name: String,
    },

    /// Show the learned affinity profile
    Profile,

    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Use the dark theme
    Dark,
    /// Use the light theme
    Light,
}

/// How `list` treats the random-order seed
#[derive(Clone, Copy)]
enum Shuffle {
    Keep,
    Fresh,
    Seed(f64),
}

fn setup_logging() {
    let default_level = if cfg!(debug_assertions) {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bazaar_cli={default_level},bazaar_core={default_level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging();

    let dirs = Directories::new();
    dirs.ensure_exists()
        .with_context(|| format!("Failed to create {}", dirs.data.display()))?;

    let mut config = Config::load(&dirs.config_file)
        .with_context(|| format!("Failed to load {}", dirs.config_file.display()))?;
    if let Some(url) = cli.catalog_url {
        config.catalog.url = url;
    }
    debug!("Using catalog {}", config.catalog.url);

    let storage = FileStore::new(&dirs.storage_file);
    let mut market = Marketplace::new(storage, &config);

    match cli.command {
        Commands::List {
            search,
            tag,
            sort,
            page,
            seed,
            reshuffle,
        } => {
            if reshuffle && sort != SortMode::Random {
                bail!("--reshuffle only applies with --sort random");
            }
            load_catalog(&mut market, &config).await?;
            let shuffle = match seed {
                Some(seed) => Shuffle::Seed(seed),
                None if reshuffle => Shuffle::Fresh,
                None => Shuffle::Keep,
            };
            run_list(&mut market, search, tag, sort, page, shuffle, cli.json)
        }
        Commands::Tags => {
            load_catalog(&mut market, &config).await?;
            run_tags(&market, cli.json)
        }
        Commands::Recommend => {
            load_catalog(&mut market, &config).await?;
            run_recommend(&market, cli.json)
        }
        Commands::Similar { name, k } => {
            load_catalog(&mut market, &config).await?;
            run_similar(&market, &name, k, cli.json)
        }
        Commands::Show { name } => {
            load_catalog(&mut market, &config).await?;
            run_show(&mut market, &name, cli.json)
        }
        Commands::Track { kind, name } => {
            load_catalog(&mut market, &config).await?;
            run_track(&mut market, &kind, &name, cli.json)
        }
        Commands::Profile => run_profile(&market, cli.json),
        Commands::Theme { action } => {
            run_theme(&mut market, action.unwrap_or(ThemeAction::Show), cli.json)
        }
    }
}

/// Fetch the catalog. An unreachable endpoint leaves the catalog empty.
async fn load_catalog(market: &mut Market, config: &Config) -> Result<()> {
    let source = HttpCatalog::from_config(&config.catalog).context("Failed to build HTTP client")?;
    market.load(&source).await;

    if market.catalog().is_empty() {
        warn!("Catalog from {} is empty", source.url());
        eprintln!(
            "No plugins loaded from {} (run with RUST_LOG=bazaar_core=debug for details)",
            source.url()
        );
    }
    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn print_plugin_line(plugin: &Plugin) {
    let stars = plugin
        .stars
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    print!("  {:<32} {:>6}*", plugin.name, stars);
    if let Some(author) = plugin.author_name() {
        print!("  by {author}");
    }
    println!();

    if let Some(desc) = plugin.desc.as_deref().filter(|d| !d.is_empty()) {
        println!("      {desc}");
    }
}

fn print_scored(entries: &[ScoredPlugin<'_>]) {
    for entry in entries {
        print!("  {:.3}", entry.score);
        print_plugin_line(entry.plugin);
    }
}

fn run_list(
    market: &mut Market,
    search: Option<String>,
    tag: Option<String>,
    sort: SortMode,
    page: usize,
    shuffle: Shuffle,
    json: bool,
) -> Result<()> {
    let search = search.unwrap_or_default();

    market.set_search_query(search.clone());
    market.set_selected_tag(tag);
    market.set_sort_by(sort);
    match shuffle {
        Shuffle::Seed(seed) => market.set_random_seed(seed),
        Shuffle::Fresh => market.reshuffle(),
        Shuffle::Keep => {}
    }
    market.set_current_page(page);

    if !search.trim().is_empty() {
        market.track_search(&search);
    }

    let shown: Vec<String> = {
        let view = market.page_view();

        if json {
            print_json(&json!({
                "query": market.query(),
                "page": view,
            }))?;
        } else if view.items.is_empty() {
            println!("No plugins match.");
        } else {
            println!(
                "\nPlugins ({} matches, page {} of {}, sorted by {}):\n",
                view.total_matches,
                view.page,
                view.total_pages,
                market.query().sort_by()
            );
            for plugin in &view.items {
                print_plugin_line(plugin);
            }
            println!();
        }

        view.items.iter().map(|p| p.name.clone()).collect()
    };

    market.track_impressions(shown.iter().map(String::as_str));
    Ok(())
}

fn run_tags(market: &Market, json: bool) -> Result<()> {
    let tags = market.all_tags();

    if json {
        return print_json(&tags);
    }
    if tags.is_empty() {
        println!("No tags found.");
        return Ok(());
    }
    for tag in tags {
        println!("{tag}");
    }
    Ok(())
}

fn run_recommend(market: &Market, json: bool) -> Result<()> {
    let picks = market.recommended_for_you();
    let cold_start = market.is_cold_start();

    if json {
        return print_json(&json!({
            "coldStart": cold_start,
            "plugins": picks,
        }));
    }

    if picks.is_empty() {
        println!("Nothing to recommend yet.");
        return Ok(());
    }

    if cold_start {
        println!("\nPopular plugins (interact with a few plugins for personal picks):\n");
    } else {
        println!("\nRecommended for you:\n");
    }
    for plugin in picks {
        print_plugin_line(plugin);
    }
    println!();
    Ok(())
}

fn run_similar(market: &Market, name: &str, k: Option<usize>, json: bool) -> Result<()> {
    let similar = market
        .similar_plugins(name, k)
        .with_context(|| format!("Cannot find plugins similar to '{name}'"))?;

    if json {
        return print_json(&similar);
    }

    if similar.is_empty() {
        println!("No related plugins.");
        return Ok(());
    }

    println!("\nRelated to {name}:\n");
    print_scored(&similar);
    println!();
    Ok(())
}

fn run_show(market: &mut Market, name: &str, json: bool) -> Result<()> {
    let Some(plugin) = market.find(name).cloned() else {
        bail!("Plugin '{name}' not found in the catalog");
    };
    let score = market.compute_score(name)?;

    if json {
        print_json(&json!({
            "plugin": plugin,
            "score": score,
        }))?;
    } else {
        println!("\n{}", plugin.name);
        if let Some(desc) = plugin.desc.as_deref() {
            println!("  {desc}");
        }
        println!();
        let fields = [
            ("Author", plugin.author.clone()),
            ("Stars", plugin.stars.map(|s| s.to_string())),
            ("Updated", plugin.updated_at.clone()),
            ("Version", plugin.version.clone()),
            ("Repository", plugin.repo.clone()),
            ("Social", plugin.social_link.clone()),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                println!("  {label:<11} {value}");
            }
        }
        if !plugin.tags.is_empty() {
            println!("  {:<11} {}", "Tags", plugin.tags.join(", "));
        }
        println!("  {:<11} {score:.3}", "Score");
        println!();
    }

    market.track_interaction(&InteractionKind::Detail, name);
    Ok(())
}

fn run_track(market: &mut Market, kind: &str, name: &str, json: bool) -> Result<()> {
    let kind = InteractionKind::from(kind.trim());
    if kind.as_str().is_empty() {
        bail!("Interaction kind must not be empty");
    }
    if market.find(name).is_none() {
        bail!("Plugin '{name}' not found in the catalog");
    }

    let tracked = market.track_interaction(&kind, name);
    if json {
        return print_json(&json!({
            "tracked": tracked,
            "kind": kind,
            "weight": kind.weight(),
            "totalInteractions": market.profile().total_interactions,
        }));
    }

    println!(
        "Tracked {kind} on {name} (+{:.1}, total {:.1})",
        kind.weight(),
        market.profile().total_interactions
    );
    Ok(())
}

fn top_entries(counts: &BTreeMap<String, f64>, limit: usize) -> Vec<(&str, f64)> {
    let mut entries: Vec<_> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries.truncate(limit);
    entries
}

fn run_profile(market: &Market, json: bool) -> Result<()> {
    let profile = market.profile();

    if json {
        return print_json(profile);
    }

    if profile.is_empty() {
        println!("No activity recorded yet.");
        return Ok(());
    }

    println!("\nTotal interaction weight: {:.1}", profile.total_interactions);
    if market.is_cold_start() {
        println!("(recommendations still use popularity)");
    }

    let sections = [
        ("Tags", &profile.tag_count),
        ("Authors", &profile.author_count),
        ("Keywords", &profile.keyword_count),
    ];
    for (title, counts) in sections {
        if counts.is_empty() {
            continue;
        }
        println!("\n{title}:");
        for (key, weight) in top_entries(counts, 10) {
            println!("  {key:<24} {weight:>6.1}");
        }
    }
    println!();
    Ok(())
}

fn run_theme(market: &mut Market, action: ThemeAction, json: bool) -> Result<()> {
    let theme = match action {
        ThemeAction::Show => market.theme(),
        ThemeAction::Toggle => market.toggle_theme(),
        ThemeAction::Dark => {
            market.set_dark_mode(true);
            market.theme()
        }
        ThemeAction::Light => {
            market.set_dark_mode(false);
            market.theme()
        }
    };

    if json {
        return print_json(&json!({
            "theme": theme,
            "dark": theme == Theme::Dark,
        }));
    }

    println!("Theme: {theme}");
    Ok(())
}
