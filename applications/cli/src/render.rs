//! Console output
//!
//! Queue positions are printed 0-based everywhere, matching the indices the
//! subcommands accept.

use cadence_core::Track;
use cadence_playback::{PlayerStatus, QueueEngine};
use std::fmt::Write;

fn describe(track: &Track) -> String {
    format!("{} - {}", track.artist_name, track.title)
}

/// One queue row: marker, 0-based position, track
pub fn track_line(index: usize, track: &Track, current: bool) -> String {
    let marker = if current { ">" } else { " " };
    format!("{marker}{index:>3}  {}", describe(track))
}

pub fn added(index: usize) -> String {
    format!("Added at position {index}")
}

pub fn removed(track: &Track) -> String {
    format!("Removed {}", describe(track))
}

pub fn no_track_at(index: usize) -> String {
    format!("No track at position {index}")
}

/// Current track, what plays next and a queue summary
pub fn status(queue: &QueueEngine, status: PlayerStatus) -> String {
    let mut out = String::new();

    match queue.current() {
        Some(track) => {
            let _ = writeln!(out, "Now: {} [{}]", describe(track), status);
        }
        None => out.push_str("Nothing selected\n"),
    }
    if let Some(next) = queue.peek_next() {
        let _ = writeln!(out, "Next: {}", describe(next));
    }

    let mode = queue.mode();
    let stats = queue.stats();
    let position = queue
        .current_index()
        .map_or_else(|| "-".to_string(), |index| index.to_string());
    let _ = write!(
        out,
        "Queue: {} tracks, position {}, {} min, shuffle {}, repeat {}",
        stats.total_tracks,
        position,
        stats.total_duration_secs / 60,
        if mode.shuffled { "on" } else { "off" },
        mode.repeat
    );
    out
}

/// Every slot in play order
pub fn queue_listing(queue: &QueueEngine) -> String {
    let current = queue.current_index();
    queue
        .tracks()
        .enumerate()
        .map(|(index, track)| track_line(index, track, Some(index) == current))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Search hits with their queue positions
pub fn search_results(queue: &QueueEngine, query: &str) -> String {
    let current = queue.current_index();
    queue
        .search(query)
        .into_iter()
        .map(|(index, track)| track_line(index, track, Some(index) == current))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recently played tracks, most recent first
pub fn history(queue: &QueueEngine) -> String {
    queue
        .history()
        .iter()
        .rev()
        .enumerate()
        .map(|(rank, track)| format!("{:>3}. {}", rank + 1, describe(track)))
        .collect::<Vec<_>>()
        .join("\n")
}
