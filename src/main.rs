//! EchoVault - Private local memory journal
//!
//! Command-line front end: records memories, lists and searches them, shows
//! insights and stats, and can serve the local HTTP API.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use echovault::{
    api,
    config::EchoVaultConfig,
    memory::{
        handler::MemoriesState,
        humanize,
        record::validate_content,
        search::{self, Segment},
        Emotion, FileSlot, MemoryRecord, MemoryStore, NewMemory, QUICK_TAGS,
    },
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "echovault")]
#[command(author = "EchoVault Team")]
#[command(version)]
#[command(about = "Private local memory journal")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ECHOVAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the journal (overrides the config file)
    #[arg(long, env = "ECHOVAULT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new memory
    Add {
        /// What is on your mind
        #[arg(required = true)]
        content: Vec<String>,

        /// How you are feeling (detected from the text when omitted or neutral)
        #[arg(short, long)]
        emotion: Option<Emotion>,

        /// Tag to attach; repeatable (quick tags: Personal, Insight, People, Work)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Delete a memory by id
    Delete {
        /// Memory id
        id: u64,
    },

    /// Show recent memories
    List {
        /// Show at most this many
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Search memory text and tags
    Search {
        /// Text to look for
        query: String,
    },

    /// Show memories as a dated timeline
    Timeline {
        /// Only include memories matching this query
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Delete every memory
    Clear {
        /// Confirm removing the whole journal
        #[arg(long)]
        yes: bool,

        /// Also erase the journal file instead of leaving an empty one
        #[arg(long)]
        purge: bool,
    },

    /// Show insights about your patterns
    Insights,

    /// Show memory stats
    Stats,

    /// List the selectable emotions and quick tags
    Emotions,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },

    /// Serve the local HTTP API
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays pipeable
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("echovault={},tower_http=info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
        Commands::Emotions => show_catalog(),
        Commands::Serve { host, port } => {
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            let store = open_store(&config);
            api::serve(&server, MemoriesState::new(store)).await?;
        }
        command => run_journal(command, &config)?,
    }

    Ok(())
}

/// Resolve the config file and apply command-line overrides
fn load_config(path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<EchoVaultConfig> {
    let mut config = EchoVaultConfig::resolve(path)?;
    if let Some(dir) = data_dir {
        config.storage.data_dir = dir;
    }
    Ok(config)
}

/// Open the journal, run one command against it, then close it.
fn run_journal(command: Commands, config: &EchoVaultConfig) -> Result<()> {
    let mut store = open_store(config);
    let now = Utc::now();

    match command {
        Commands::Add {
            content,
            emotion,
            tags,
        } => {
            add_memory(&mut store, config, content.join(" "), emotion, tags)?;
        }
        Commands::Delete { id } => {
            if store.delete(id)? {
                println!("Deleted memory #{}", id);
            } else {
                println!("No memory with id {}", id);
            }
        }
        Commands::List { limit } => {
            let records: Vec<&MemoryRecord> = store
                .records()
                .iter()
                .take(limit.unwrap_or(usize::MAX))
                .collect();
            print_feed(&format!("Recent Memories ({})", store.len()), &records, "", now);
        }
        Commands::Search { query } => {
            let records = store.filter(&query);
            print_feed(
                &format!("Search Results ({})", records.len()),
                &records,
                &query,
                now,
            );
        }
        Commands::Timeline { query } => {
            print_timeline(&store.filter(query.as_deref().unwrap_or("")));
        }
        Commands::Clear { yes, purge } => {
            if !yes {
                bail!(
                    "refusing to delete {} memories without --yes",
                    store.len()
                );
            }
            let count = store.len();
            if purge {
                store.purge()?;
            } else {
                store.clear()?;
            }
            println!("Deleted {} memories", count);
        }
        Commands::Insights => print_insights(&store, now),
        Commands::Stats => {
            let stats = store.stats(now);
            println!("Your Memory Stats");
            println!("  Total Memories   {}", stats.total);
            println!("  This Week        {}", stats.this_week);
            println!("  Average per Day  {}", stats.average_display());
        }
        Commands::Config { .. } | Commands::Emotions | Commands::Serve { .. } => {}
    }

    store.close()?;
    Ok(())
}

fn open_store(config: &EchoVaultConfig) -> MemoryStore {
    let slot = FileSlot::new(config.storage.slot_path());
    tracing::debug!("Opening journal at {}", slot.path().display());
    MemoryStore::open_with(Box::new(slot), config.journal.clone())
}

fn add_memory(
    store: &mut MemoryStore,
    config: &EchoVaultConfig,
    content: String,
    emotion: Option<Emotion>,
    tags: Vec<String>,
) -> Result<()> {
    validate_content(&content, config.journal.max_content_chars)?;

    let mut draft = NewMemory::new(content).tags(tags);
    if let Some(emotion) = emotion {
        draft = draft.emotion(emotion);
    }
    let record = store.add(draft)?;

    println!(
        "Saved memory #{} ({})",
        record.id,
        record.emotion.display_label()
    );
    if record.ai_summary != record.content {
        println!("  AI insight: {}", record.ai_summary);
    }
    Ok(())
}

fn print_feed(title: &str, records: &[&MemoryRecord], query: &str, now: DateTime<Utc>) {
    if records.is_empty() {
        if query.is_empty() {
            println!("No memories yet");
            println!("Start capturing your thoughts, insights, and moments with `echovault add`.");
        } else {
            println!("No memories match \"{}\"", query);
        }
        return;
    }

    let emphasize = std::io::stdout().is_terminal();
    println!("{}", title);
    for record in records {
        println!();
        println!(
            "#{}  {}  {}",
            record.id,
            humanize::relative_time(record.timestamp, now),
            record.emotion.title()
        );
        println!("  {}", render_highlight(&record.content, query, emphasize));
        if !record.tags.is_empty() {
            let tags: Vec<String> = record.tags.iter().map(|t| format!("#{}", t)).collect();
            println!("  {}", tags.join(" "));
        }
    }
}

fn render_highlight(text: &str, query: &str, emphasize: bool) -> String {
    search::highlight(text, query)
        .into_iter()
        .map(|Segment { text, matched }| match (matched, emphasize) {
            (true, true) => format!("\x1b[1;4m{}\x1b[0m", text),
            (true, false) => format!("[{}]", text),
            (false, _) => text.to_string(),
        })
        .collect()
}

fn print_timeline(records: &[&MemoryRecord]) {
    println!("Memory Timeline");
    if records.is_empty() {
        println!("  (empty)");
        return;
    }
    for record in records {
        println!(
            "  • {}  {}",
            humanize::timeline_date(record.timestamp),
            record.content
        );
    }
}

fn print_insights(store: &MemoryStore, now: DateTime<Utc>) {
    println!("AI Insights");
    let insights = store.insights(now);
    if insights.is_empty() {
        println!(
            "  Add some memories to see personalized insights about your patterns and trends."
        );
        return;
    }
    for insight in &insights {
        println!("  {}: {}", insight.title, insight.content);
    }

    let aggregator = store.aggregator();
    let top = aggregator.top_emotions(store.records());
    if !top.is_empty() {
        let line: Vec<String> = top.iter().map(|(e, n)| format!("{} ({})", e, n)).collect();
        println!();
        println!("  Top emotions: {}", line.join(", "));
    }
    let tags = aggregator.recent_focus_tags(store.records());
    if !tags.is_empty() {
        let line: Vec<String> = tags.iter().map(|(t, n)| format!("{} ({})", t, n)).collect();
        println!("  Recent focus: {}", line.join(", "));
    }
}

fn show_catalog() {
    println!("Emotions:");
    for emotion in Emotion::ALL.iter() {
        println!("  {}", emotion.as_str());
    }
    println!("Quick tags:");
    for tag in QUICK_TAGS {
        println!("  {}", tag);
    }
}

fn show_config(config: Option<&EchoVaultConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
