/// Cadence - headless playback queue driver
use anyhow::Context;
use cadence_cli::{render, AppConfig, ConsoleDevice, JsonLibrary};
use cadence_core::{FileStore, TrackFilter, TrackId, TrackSource, TracingNotifier};
use cadence_playback::{QueuePersistence, QueuePosition, Session};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence playback queue driver", long_about = None)]
#[command(after_help = "Queue positions are 0-based.")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current track, modes and queue summary
    Status,
    /// Replace the queue with library tracks and start playing
    Load {
        /// Free-text filter (title, artist or album)
        #[arg(short, long)]
        query: Option<String>,
        /// Artist filter
        #[arg(long)]
        artist: Option<String>,
        /// Album filter
        #[arg(long)]
        album: Option<String>,
        /// Index of the first track to play
        #[arg(short, long, default_value_t = 0)]
        start: usize,
    },
    /// Add a library track to the queue
    Add {
        /// Track ID
        id: String,
        /// Play it right after the current track
        #[arg(long, conflicts_with = "at")]
        next: bool,
        /// Insert at this queue position
        #[arg(long)]
        at: Option<usize>,
    },
    /// Remove the track at a queue position
    Remove { index: usize },
    /// Move a track within the queue
    Move { from: usize, to: usize },
    /// Stop and empty the queue
    Clear,
    /// Skip to the next track
    Next,
    /// Go back to the previous track
    Previous,
    /// Play the track at a queue position
    Jump { index: usize },
    /// Toggle shuffle
    Shuffle,
    /// Set repeat mode (off, all, one), or cycle it when omitted
    Repeat { mode: Option<String> },
    /// Show recently played tracks
    History,
    /// Search the queue
    Search { query: String },
    /// Set the volume (0.0-1.0) or toggle mute
    Volume {
        level: Option<f32>,
        #[arg(long)]
        mute: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info,cadence_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let library = Arc::new(
        JsonLibrary::load(&config.library.path)
            .await
            .context("loading track library")?,
    );
    let store = FileStore::open(&config.storage.data_dir)
        .with_context(|| format!("opening {}", config.storage.data_dir.display()))?;

    let mut session = Session::new(
        &config.playback,
        Box::new(ConsoleDevice::new()),
        library.clone(),
        Arc::new(TracingNotifier),
        QueuePersistence::new(store, config.playback.persistence.clone()),
    );

    match cli.command {
        Commands::Status => print_status(&session),
        Commands::Load {
            query,
            artist,
            album,
            start,
        } => {
            let filter = TrackFilter {
                query,
                artist,
                album,
            };
            let count = session.play_from_source(&filter, start).await?;
            println!("Queued {count} tracks");
            print_status(&session);
        }
        Commands::Add { id, next, at } => {
            let track = library.fetch_track_by_id(&TrackId::new(id)).await?;
            let position = match (next, at) {
                (true, _) => QueuePosition::Next,
                (false, Some(index)) => QueuePosition::At(index),
                (false, None) => QueuePosition::End,
            };
            let index = session.add(track, position);
            println!("{}", render::added(index));
        }
        Commands::Remove { index } => match session.remove(index) {
            Some(track) => println!("{}", render::removed(&track)),
            None => println!("{}", render::no_track_at(index)),
        },
        Commands::Move { from, to } => {
            session.move_track(from, to);
            println!("{}", render::queue_listing(session.queue()));
        }
        Commands::Clear => session.clear(),
        Commands::Next => {
            session.next()?;
            print_status(&session);
        }
        Commands::Previous => {
            session.previous()?;
            print_status(&session);
        }
        Commands::Jump { index } => {
            if session.jump(index)? {
                print_status(&session);
            } else {
                println!("{}", render::no_track_at(index));
            }
        }
        Commands::Shuffle => {
            let shuffled = session.toggle_shuffle();
            println!("Shuffle {}", if shuffled { "on" } else { "off" });
        }
        Commands::Repeat { mode } => {
            let mode = match mode {
                Some(name) => {
                    if !session.set_repeat_mode_named(&name) {
                        anyhow::bail!("unknown repeat mode {name:?} (expected off, all or one)");
                    }
                    session.queue().repeat_mode()
                }
                None => session.cycle_repeat_mode(),
            };
            println!("Repeat {mode}");
        }
        Commands::History => {
            println!("{}", render::history(session.queue()));
        }
        Commands::Search { query } => {
            println!("{}", render::search_results(session.queue(), &query));
        }
        Commands::Volume { level, mute } => {
            if let Some(level) = level {
                session.set_volume(level);
            }
            if mute {
                session.toggle_mute();
            }
            let volume = session.player().volume();
            println!(
                "Volume {:.0}%{}",
                volume.level() * 100.0,
                if volume.is_muted() { " (muted)" } else { "" }
            );
        }
    }

    session.save();
    Ok(())
}

fn print_status<S>(session: &Session<S>)
where
    S: cadence_core::KeyValueStore,
{
    println!(
        "{}",
        render::status(session.queue(), session.player().status())
    );
}
