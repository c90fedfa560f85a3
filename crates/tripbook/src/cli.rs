//! Command-line interface.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tripbook_config::{AccessError, AppConfig, FEED_ENV};
use tripbook_core::search::find_matches;
use tripbook_core::{DebouncedSearch, MapPlan, TripStats};
use tripbook_model::{ActivityType, DaySchedule, ItineraryItem, Trip};
use tripbook_sync::{reconcile, FileFeed, LiveClient, ScheduleSync};

use crate::render;

#[derive(Debug, Parser)]
#[command(name = "tripbook", version, about = "Trip itinerary with live schedule updates")]
pub struct Cli {
    /// Path to the config file (overrides TRIPBOOK_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the merged schedule
    List {
        /// Only this day key, e.g. "1/2"
        #[arg(long)]
        day: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Location, type and distance totals
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Find items by title, location or description
    Search {
        query: String,
        /// Print every match instead of the first
        #[arg(long)]
        all: bool,
    },
    /// Print the map plan (markers, route, initial view) as JSON
    Map {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Add an item to the live feed
    Add(AddArgs),
    /// Follow the live schedule; lines typed on stdin are searched
    Watch,
    /// Unlock the itinerary on this machine
    Unlock { passcode: String },
    /// Forget a previous unlock
    Lock,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Activity types to include (repeatable); all types when omitted
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub types: Vec<ActivityType>,
}

impl FilterArgs {
    pub fn active(&self) -> HashSet<ActivityType> {
        if self.types.is_empty() {
            ActivityType::ALL.into_iter().collect()
        } else {
            self.types.iter().copied().collect()
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    /// Display time; "HH:MM" sorts chronologically
    #[arg(long)]
    pub time: String,
    #[arg(short = 't', long = "type", default_value = "ACTIVITY")]
    pub activity_type: ActivityType,
    /// Day key; the configured default day when omitted
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub end_time: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,
}

impl AddArgs {
    pub fn into_item(self) -> ItineraryItem {
        let mut item = ItineraryItem::new("", self.time, self.title, self.activity_type);
        item.date = self.date;
        item.end_time = self.end_time;
        item.location = self.location;
        item.description = self.description;
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            item = item.with_coordinates(lat, lng);
        }
        item
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match &cli.command {
        Command::Unlock { passcode } => return unlock(&config, passcode),
        Command::Lock => return lock(&config),
        _ => ensure_unlocked(&config)?,
    }

    let trip = config
        .load_baseline()
        .context("Failed to load baseline trip")?;

    match cli.command {
        Command::List { day, filter } => {
            let schedule = current_schedule(&config, &trip).await?;
            let filters = filter.active();
            let days: Vec<DaySchedule> = schedule
                .into_iter()
                .filter(|d| day.as_deref().map_or(true, |key| d.date == key))
                .map(|mut d| {
                    d.items.retain(|item| filters.contains(&item.activity_type));
                    d
                })
                .collect();

            if days.is_empty() {
                if let Some(key) = day {
                    bail!("No day with key {:?}", key);
                }
            }
            print!("{}", render::trip_header(&trip));
            println!();
            print!("{}", render::schedule(&days));
        }
        Command::Stats { filter, json } => {
            let schedule = current_schedule(&config, &trip).await?;
            let stats = TripStats::compute(&schedule, &filter.active());
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render::stats(&stats));
            }
        }
        Command::Search { query, all } => {
            let schedule = current_schedule(&config, &trip).await?;
            let matches = find_matches(&schedule, &query);
            if matches.is_empty() {
                println!("No match for {:?}", query.trim());
            }
            let shown = if all { matches.len() } else { matches.len().min(1) };
            for (day, item) in matches.into_iter().take(shown) {
                print!("{} {}", day.date, render::item(item));
            }
        }
        Command::Map { filter } => {
            let schedule = current_schedule(&config, &trip).await?;
            let plan = MapPlan::build(&schedule, &filter.active(), &config.map);
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Add(args) => {
            let client = open_client(&config).await?;
            let id = client
                .add_item(args.into_item())
                .await
                .context("Failed to add item")?;
            println!("{}", id);
        }
        Command::Watch => watch(&config, trip).await?,
        Command::Unlock { .. } | Command::Lock => {}
    }

    Ok(())
}

fn ensure_unlocked(config: &AppConfig) -> Result<()> {
    match config.passcode_gate() {
        Some(gate) if !gate.is_unlocked() => {
            bail!("Itinerary is locked; run `tripbook unlock <passcode>` first")
        }
        _ => Ok(()),
    }
}

fn unlock(config: &AppConfig, passcode: &str) -> Result<()> {
    let Some(gate) = config.passcode_gate() else {
        println!("No passcode configured; nothing to unlock");
        return Ok(());
    };

    match gate.unlock(passcode) {
        Ok(at) => {
            println!("Unlocked at {}", at.to_rfc3339());
            Ok(())
        }
        Err(AccessError::WrongPasscode) => bail!("Wrong passcode"),
        Err(e) => Err(e).context("Failed to store unlock state"),
    }
}

fn lock(config: &AppConfig) -> Result<()> {
    if let Some(gate) = config.passcode_gate() {
        gate.lock().context("Failed to clear unlock state")?;
    }
    println!("Locked");
    Ok(())
}

/// Baseline merged with the feed's current items, or just the sorted baseline
/// when live sync is disabled.
async fn current_schedule(config: &AppConfig, trip: &Trip) -> Result<Vec<DaySchedule>> {
    let key = &config.sync.default_day_key;
    if !config.sync.enabled {
        return Ok(reconcile(&trip.days, &[], key));
    }

    let feed = FileFeed::new(config.feed_path(), config.sync.poll_interval());
    let items = feed
        .read_items()
        .await
        .with_context(|| format!("Failed to read feed {}", feed.path().display()))?;
    debug!(count = items.len(), "Read feed items");
    Ok(reconcile(&trip.days, &items, key))
}

async fn open_client(config: &AppConfig) -> Result<LiveClient> {
    if !config.sync.enabled {
        bail!("Live sync is disabled; set [sync].enabled = true or {}", FEED_ENV);
    }

    let feed = FileFeed::new(config.feed_path(), config.sync.poll_interval());
    LiveClient::connect(Arc::new(feed))
        .await
        .context("Failed to connect to the live feed")
}

async fn watch(config: &AppConfig, trip: Trip) -> Result<()> {
    let client = open_client(config).await?;
    let sync = ScheduleSync::new(trip.days).with_default_day_key(config.sync.default_day_key.clone());
    let mut live = sync.start(&client)?;

    let search = DebouncedSearch::new(live.current(), config.search.debounce(), |result| match result {
        Some(item) => print!("match: {}", render::item(&item)),
        None => println!("no match"),
    });

    info!(feed = %client.feed_name(), "Watching live schedule");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            update = live.changed() => {
                let schedule = update?;
                println!("{}", render::schedule(&schedule));
                search.set_schedule(schedule);
            }
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(query) => search.input(query),
                    None => break,
                }
            }
        }
    }

    live.stop();
    Ok(())
}
