use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tagsort::scanner::metadata::{Field, LoftyReader};
use tagsort::search::SearchQuery;
use tagsort::sorter::{RelocateMode, SortOptions};

#[derive(Parser)]
#[command(name = "tagsort", version, about = "Sort or search an MP3 folder by its tags")]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Follow symlinks while walking the folder
    #[arg(long, global = true)]
    follow_links: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Keep the originals where they are
    Copy,
    /// Remove each original once its sorted copy is in place
    Move,
}

impl From<ModeArg> for RelocateMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Copy => Self::Copy,
            ModeArg::Move => Self::Move,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Take a messy, unsorted music folder and sort it by artist and album
    /// into <folder>.sorted
    Sort {
        /// The folder to be sorted
        folder: PathBuf,

        /// Copy or move files (defaults to config file mode, then copy)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Search for audio files by tag value (case-insensitive substring)
    Search {
        /// The folder to search in
        folder: PathBuf,

        /// Artist contains this
        #[arg(long)]
        artist: Option<String>,

        /// Album contains this
        #[arg(long)]
        album: Option<String>,

        /// Title contains this
        #[arg(long)]
        title: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = tagsort::config::AppConfig::load();
    let follow_links = cli.follow_links || config.follow_links;

    match cli.command {
        Commands::Sort { folder, mode } => {
            let options = SortOptions {
                mode: mode.map(RelocateMode::from).unwrap_or(config.mode),
                follow_links,
            };
            let result = tagsort::sorter::sort(&folder, &options, &LoftyReader)
                .with_context(|| format!("Sort of {} failed", folder.display()))?;
            println!(
                "Sort complete: {} scanned, {} relocated, {} already present, {} skipped",
                result.scanned, result.relocated, result.already_present, result.skipped
            );
        }

        Commands::Search { folder, artist, album, title } => {
            let query = Field::ALL
                .into_iter()
                .zip([artist, album, title])
                .filter_map(|(field, value)| value.map(|v| (field, v)))
                .fold(SearchQuery::new(), |q, (field, value)| {
                    log::info!("Filtering on {} containing \"{}\"", field.label(), value);
                    q.with(field, value)
                });
            if query.is_empty() {
                log::info!("No filters given, listing every tagged file");
            }

            let matches = tagsort::search::search(&folder, &query, &LoftyReader, follow_links)
                .with_context(|| format!("Search of {} failed", folder.display()))?;
            for path in matches {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
