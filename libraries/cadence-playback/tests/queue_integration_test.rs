//! Queue engine integration tests
//!
//! Real-world scenarios: playing an album, skipping with next/previous,
//! editing the queue while something is playing, shuffling mid-album.

mod common;

use cadence_playback::{QueueEngine, QueuePosition, RepeatMode};
use common::{create_track, create_tracks, ids};

fn current(queue: &QueueEngine) -> Option<String> {
    queue.current().map(|t| t.id.to_string())
}

// ===== Sequencing =====

#[test]
fn test_album_plays_through_and_stops() {
    let mut queue = QueueEngine::with_seed(50, 1);
    queue.set_queue(create_tracks(&["A", "B", "C"]), 1);

    assert_eq!(current(&queue).as_deref(), Some("B"));
    assert_eq!(queue.advance().unwrap().id.as_str(), "C");
    assert!(queue.advance().is_none());
    assert_eq!(current(&queue).as_deref(), Some("C"));

    // Exhaustion records nothing new
    let history: Vec<String> = ids(queue.history().iter());
    assert_eq!(history, vec!["B"]);
}

#[test]
fn test_repeat_all_cycles_forever() {
    let mut queue = QueueEngine::with_seed(50, 1);
    queue.set_queue(create_tracks(&["A", "B", "C"]), 0);
    queue.set_repeat_mode(RepeatMode::All);

    let played: Vec<String> = (0..7)
        .map(|_| queue.advance().unwrap().id.to_string())
        .collect();
    assert_eq!(played, vec!["B", "C", "A", "B", "C", "A", "B"]);
}

#[test]
fn test_repeat_one_returns_current_every_time() {
    let mut queue = QueueEngine::with_seed(50, 1);
    queue.set_queue(create_tracks(&["A", "B", "C"]), 1);
    queue.set_repeat_mode(RepeatMode::One);

    for _ in 0..5 {
        assert_eq!(queue.advance().unwrap().id.as_str(), "B");
        assert_eq!(queue.peek_next().unwrap().id.as_str(), "B");
    }
    assert_eq!(queue.current_index(), Some(1));
}

#[test]
fn test_previous_walks_back_through_history() {
    let mut queue = QueueEngine::with_seed(50, 1);
    queue.set_queue(create_tracks(&["A", "B", "C", "D"]), 0);

    queue.advance();
    queue.advance();
    queue.advance();
    assert_eq!(current(&queue).as_deref(), Some("D"));

    assert_eq!(queue.retreat().unwrap().id.as_str(), "C");
    assert_eq!(queue.retreat().unwrap().id.as_str(), "B");
    assert_eq!(queue.retreat().unwrap().id.as_str(), "A");

    // History exhausted, at the first slot, no repeat
    assert!(queue.retreat().is_none());
    assert!(!queue.has_previous());
}

#[test]
fn test_jumping_around_then_previous_returns_to_origin() {
    let mut queue = QueueEngine::with_seed(50, 1);
    queue.set_queue(create_tracks(&["A", "B", "C", "D", "E"]), 0);

    queue.jump_to(3);
    queue.jump_to(1);

    assert_eq!(queue.retreat().unwrap().id.as_str(), "D");
    assert_eq!(queue.retreat().unwrap().id.as_str(), "A");
}

// ===== Editing While Playing =====

#[test]
fn test_play_next_goes_right_after_current() {
    let mut queue = QueueEngine::with_seed(50, 1);
    queue.set_queue(create_tracks(&["A", "B", "C"]), 0);

    queue.add(create_track("X"), QueuePosition::Next);
    queue.add(create_track("Y"), QueuePosition::Next);

    // Most recent "play next" wins
    assert_eq!(ids(queue.tracks()), vec!["A", "Y", "X", "B", "C"]);
    assert_eq!(queue.advance().unwrap().id.as_str(), "Y");
}

#[test]
fn test_editing_keeps_current_track_identity() {
    let mut queue = QueueEngine::with_seed(50, 1);
    queue.set_queue(create_tracks(&["A", "B", "C", "D"]), 2);

    queue.add(create_track("X"), QueuePosition::At(0));
    queue.remove(1); // A
    queue.move_track(3, 0); // D to front

    assert_eq!(current(&queue).as_deref(), Some("C"));
    assert_eq!(ids(queue.tracks()), vec!["D", "X", "B", "C"]);
}

#[test]
fn test_removing_playing_track_selects_following_track() {
    let mut queue = QueueEngine::with_seed(50, 1);
    queue.set_queue(create_tracks(&["A", "B", "C"]), 1);

    queue.remove(1);
    assert_eq!(current(&queue).as_deref(), Some("C"));
}

#[test]
fn test_duplicate_tracks_occupy_separate_slots() {
    let mut queue = QueueEngine::with_seed(50, 1);
    queue.set_queue(create_tracks(&["A", "B"]), 0);
    queue.add(create_track("A"), QueuePosition::End);

    assert_eq!(queue.len(), 3);
    assert_ne!(queue.entries()[0].slot, queue.entries()[2].slot);

    queue.remove(2);
    assert_eq!(ids(queue.tracks()), vec!["A", "B"]);
    assert_eq!(queue.current_index(), Some(0));
}

// ===== Shuffle =====

#[test]
fn test_shuffle_mid_album_keeps_playing_track() {
    let mut queue = QueueEngine::with_seed(50, 99);
    let album = ["A", "B", "C", "D", "E", "F", "G", "H"];
    queue.set_queue(create_tracks(&album), 5);

    queue.toggle_shuffle();
    assert_eq!(current(&queue).as_deref(), Some("F"));
    assert_eq!(queue.current_index(), Some(0));

    // Every track still queued exactly once
    let mut shuffled = ids(queue.tracks());
    shuffled.sort();
    assert_eq!(shuffled, album.to_vec());

    // Play a few, then unshuffle: original order, positioned on what is playing
    queue.advance();
    queue.advance();
    let playing = current(&queue);
    queue.toggle_shuffle();

    assert_eq!(ids(queue.tracks()), album.to_vec());
    assert_eq!(current(&queue), playing);
}

#[test]
fn test_tracks_added_while_shuffled_survive_unshuffle() {
    let mut queue = QueueEngine::with_seed(50, 4);
    queue.set_queue(create_tracks(&["A", "B", "C"]), 0);
    queue.toggle_shuffle();

    queue.add(create_track("X"), QueuePosition::End);
    queue.toggle_shuffle();

    assert_eq!(queue.len(), 4);
    assert!(ids(queue.tracks()).contains(&"X".to_string()));
    assert_eq!(current(&queue).as_deref(), Some("A"));
}

#[test]
fn test_shuffled_previous_follows_listening_order() {
    let mut queue = QueueEngine::with_seed(50, 21);
    queue.set_queue(create_tracks(&["A", "B", "C", "D", "E", "F"]), 0);
    queue.toggle_shuffle();

    let mut heard = vec![current(&queue).unwrap()];
    for _ in 0..4 {
        heard.push(queue.advance().unwrap().id.to_string());
    }

    for expected in heard.iter().rev().skip(1) {
        assert_eq!(&queue.retreat().unwrap().id.to_string(), expected);
    }
}

// ===== Queries =====

#[test]
fn test_stats_track_position() {
    let mut queue = QueueEngine::with_seed(50, 1);
    queue.set_queue(create_tracks(&["A", "B", "C", "D"]), 1);

    let stats = queue.stats();
    assert_eq!(stats.total_tracks, 4);
    assert_eq!(stats.total_duration_secs, 4 * 180);
    assert_eq!(stats.unique_artists, 1);
    assert_eq!(stats.unique_albums, 1);
    assert_eq!(stats.current_position, 2);
    assert_eq!(stats.remaining_tracks, 2);
}

#[test]
fn test_search_returns_play_order_indices() {
    let mut queue = QueueEngine::with_seed(50, 1);
    queue.set_queue(create_tracks(&["alpha", "beta", "alphabet"]), 0);

    let hits: Vec<usize> = queue.search("ALPHA").into_iter().map(|(i, _)| i).collect();
    assert_eq!(hits, vec![0, 2]);
}
