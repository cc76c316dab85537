//! Queue engine
//!
//! Owns the play order, the pre-shuffle order, the current position, the
//! shuffle/repeat mode and the recently-played history, and answers "what
//! plays next / previous".
//!
//! ```text
//! original order:  A  B  C  D  E      (insertion order, restored on unshuffle)
//! active order:    C  E  A  D  B      (play order)
//!                  ^ current
//! history:         ... B  D           (most recent last, feeds "previous")
//! ```
//!
//! Every index-based operation clamps or no-ops on stale indices instead of
//! failing; queue edits come from UI actions that may race with playback.

use crate::history::History;
use crate::shuffle::shuffle_around;
use crate::types::{
    PlaybackConfig, PlaybackMode, QueueEntry, QueuePosition, QueueStats, RepeatMode, SlotId,
};
use cadence_core::{Track, TrackFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use tracing::debug;

/// Ordered playback queue with shuffle, repeat and history
#[derive(Debug, Clone)]
pub struct QueueEngine {
    /// Play order
    active: Vec<QueueEntry>,

    /// Insertion order before shuffling; a permutation of `active`
    original: Vec<QueueEntry>,

    /// Index into `active` of the current slot
    current: Option<usize>,

    /// Recently played tracks
    history: History,

    /// Shuffle and repeat settings
    mode: PlaybackMode,

    /// Next slot identifier to hand out
    next_slot: u64,

    rng: StdRng,
}

impl QueueEngine {
    /// Create an empty queue with the given history capacity
    pub fn new(history_size: usize) -> Self {
        Self::with_rng(history_size, StdRng::from_entropy())
    }

    /// Create an empty queue whose shuffles are reproducible
    pub fn with_seed(history_size: usize, seed: u64) -> Self {
        Self::with_rng(history_size, StdRng::seed_from_u64(seed))
    }

    /// Create an empty queue using the configured history size and modes
    pub fn from_config(config: &PlaybackConfig) -> Self {
        let mut queue = Self::new(config.history_size);
        queue.mode = PlaybackMode {
            shuffled: config.shuffle,
            repeat: config.repeat,
        };
        queue
    }

    fn with_rng(history_size: usize, rng: StdRng) -> Self {
        Self {
            active: Vec::new(),
            original: Vec::new(),
            current: None,
            history: History::new(history_size),
            mode: PlaybackMode::default(),
            next_slot: 0,
            rng,
        }
    }

    /// Rebuild a queue from persisted parts
    ///
    /// The caller is responsible for the permutation and index invariants.
    pub(crate) fn from_parts(
        active: Vec<QueueEntry>,
        original: Vec<QueueEntry>,
        current: Option<usize>,
        history: Vec<Track>,
        mode: PlaybackMode,
        history_size: usize,
    ) -> Self {
        let next_slot = active
            .iter()
            .map(|e| e.slot.0 + 1)
            .max()
            .unwrap_or(0);

        Self {
            active,
            original,
            current,
            history: History::from_tracks(history, history_size),
            mode,
            next_slot,
            rng: StdRng::from_entropy(),
        }
    }

    fn allocate(&mut self, track: Track) -> QueueEntry {
        let slot = SlotId(self.next_slot);
        self.next_slot += 1;
        QueueEntry { slot, track }
    }

    // ===== Queue Manipulation =====

    /// Replace the queue with `tracks`, starting at `start_index`
    ///
    /// Clears history. The start index is clamped to the queue bounds. With
    /// shuffle on, the start track is kept first and the rest is reshuffled.
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) {
        let entries: Vec<QueueEntry> = tracks.into_iter().map(|t| self.allocate(t)).collect();

        self.current = if entries.is_empty() {
            None
        } else {
            Some(start_index.min(entries.len() - 1))
        };
        self.original = entries.clone();
        self.active = entries;
        self.history.clear();

        if self.mode.shuffled {
            self.active = shuffle_around(&self.original, self.current, &mut self.rng);
            if self.current.is_some() {
                self.current = Some(0);
            }
        }

        debug!(
            "Queue set: {} tracks, current {:?}, shuffled {}",
            self.active.len(),
            self.current,
            self.mode.shuffled
        );
    }

    /// Insert a track and return the index it landed at in the play order
    ///
    /// The same index is mirrored into the original order. Inserting at or
    /// before the current slot shifts the current index so the playing track
    /// keeps its identity.
    pub fn add(&mut self, track: Track, position: QueuePosition) -> usize {
        let index = self.insertion_index(position);
        self.insert_at(index, track);
        index
    }

    /// Insert several tracks, keeping their relative order
    ///
    /// With `QueuePosition::Next` the first track plays next.
    pub fn add_many(&mut self, tracks: Vec<Track>, position: QueuePosition) {
        let start = self.insertion_index(position);
        for (offset, track) in tracks.into_iter().enumerate() {
            self.insert_at(start + offset, track);
        }
    }

    fn insertion_index(&self, position: QueuePosition) -> usize {
        let len = self.active.len();
        match position {
            QueuePosition::End => len,
            QueuePosition::Next => self.current.map_or(0, |c| c + 1).min(len),
            QueuePosition::At(index) => index.min(len),
        }
    }

    fn insert_at(&mut self, index: usize, track: Track) {
        let entry = self.allocate(track);
        let index = index.min(self.active.len());

        let original_index = index.min(self.original.len());
        self.original.insert(original_index, entry.clone());
        self.active.insert(index, entry);

        if let Some(current) = self.current {
            if index <= current {
                self.current = Some(current + 1);
            }
        }
    }

    /// Remove the slot at `index` and return its track
    ///
    /// Out-of-bounds indices are ignored. Removing the current slot keeps the
    /// current index (now pointing at the following track) unless it fell off
    /// the end, in which case it is clamped to the last slot.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.active.len() {
            return None;
        }

        let entry = self.active.remove(index);
        if let Some(pos) = self.original.iter().position(|e| e.slot == entry.slot) {
            self.original.remove(pos);
        }

        self.current = match self.current {
            Some(current) if index < current => Some(current - 1),
            Some(current) if index == current => {
                if self.active.is_empty() {
                    None
                } else {
                    Some(current.min(self.active.len() - 1))
                }
            }
            other => other,
        };

        Some(entry.track)
    }

    /// Move the slot at `from` to `to`
    ///
    /// No-op when the indices are equal or out of bounds. The current index
    /// follows the moved slot, or shifts by one when the move crosses it.
    /// While shuffled the slot is also moved in the original order, after its
    /// new predecessor in play order, so the edit survives unshuffling.
    pub fn move_track(&mut self, from: usize, to: usize) {
        let len = self.active.len();
        if from == to || from >= len || to >= len {
            return;
        }

        let entry = self.active.remove(from);
        let slot = entry.slot;
        self.active.insert(to, entry);

        if self.mode.shuffled {
            self.mirror_move_into_original(slot, to);
        } else {
            self.original.clone_from(&self.active);
        }

        self.current = self.current.map(|current| {
            if current == from {
                to
            } else if from < current && to >= current {
                current - 1
            } else if from > current && to <= current {
                current + 1
            } else {
                current
            }
        });
    }

    /// Reposition `slot` in the original order next to its new active neighbour
    fn mirror_move_into_original(&mut self, slot: SlotId, to: usize) {
        let Some(position) = self.original.iter().position(|e| e.slot == slot) else {
            return;
        };
        let entry = self.original.remove(position);

        // Follow the predecessor in play order, or precede the successor at the front
        let target = if to > 0 {
            let before = self.active[to - 1].slot;
            self.original
                .iter()
                .position(|e| e.slot == before)
                .map_or(self.original.len(), |i| i + 1)
        } else {
            let after = self.active[1].slot;
            self.original
                .iter()
                .position(|e| e.slot == after)
                .unwrap_or(0)
        };
        self.original.insert(target, entry);
    }

    /// Empty the queue and the history
    pub fn clear(&mut self) {
        self.active.clear();
        self.original.clear();
        self.current = None;
        self.history.clear();
    }

    // ===== Shuffle & Repeat =====

    /// Flip shuffle mode and return the new state
    ///
    /// Enabling keeps the current track playing and moves it to the front of
    /// a freshly shuffled order. Disabling restores the original order and
    /// relocates the current index to the same slot.
    pub fn toggle_shuffle(&mut self) -> bool {
        if self.mode.shuffled {
            let current_slot = self.current_entry().map(|e| e.slot);
            self.active.clone_from(&self.original);
            self.current =
                current_slot.and_then(|slot| self.active.iter().position(|e| e.slot == slot));
            self.mode.shuffled = false;
        } else {
            self.original.clone_from(&self.active);
            self.active = shuffle_around(&self.original, self.current, &mut self.rng);
            if self.current.is_some() {
                self.current = Some(0);
            }
            self.mode.shuffled = true;
        }

        debug!("Shuffle {}", if self.mode.shuffled { "on" } else { "off" });
        self.mode.shuffled
    }

    /// Turn shuffle on or off (no-op if already in that state)
    pub fn set_shuffle(&mut self, shuffled: bool) {
        if self.mode.shuffled != shuffled {
            self.toggle_shuffle();
        }
    }

    /// Set repeat mode
    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.mode.repeat = mode;
    }

    /// Set repeat mode by name (`off`, `all`, `one`)
    ///
    /// Unknown names are ignored. Returns whether the mode was applied.
    pub fn set_repeat_mode_named(&mut self, name: &str) -> bool {
        match RepeatMode::from_str(name) {
            Some(mode) => {
                self.mode.repeat = mode;
                true
            }
            None => {
                debug!("Ignoring unknown repeat mode {:?}", name);
                false
            }
        }
    }

    /// Advance repeat mode Off -> All -> One -> Off and return the new mode
    pub fn cycle_repeat_mode(&mut self) -> RepeatMode {
        self.mode.repeat = self.mode.repeat.cycled();
        self.mode.repeat
    }

    // ===== Navigation =====

    /// Track at the current index
    pub fn current(&self) -> Option<&Track> {
        self.current_entry().map(|e| &e.track)
    }

    /// Slot at the current index
    pub fn current_entry(&self) -> Option<&QueueEntry> {
        self.current.and_then(|i| self.active.get(i))
    }

    /// Index `advance` would move to, ignoring repeat-one
    fn next_index(&self) -> Option<usize> {
        let len = self.active.len();
        if len == 0 {
            return None;
        }

        let candidate = self.current.map_or(0, |c| c + 1);
        if candidate < len {
            Some(candidate)
        } else if self.mode.repeat == RepeatMode::All {
            Some(0)
        } else {
            None
        }
    }

    /// Index one step back in the play order, ignoring history
    fn previous_index(&self) -> Option<usize> {
        let len = self.active.len();
        if len == 0 {
            return None;
        }

        match self.current {
            Some(current) if current > 0 => Some(current - 1),
            _ if self.mode.repeat == RepeatMode::All => Some(len - 1),
            _ => None,
        }
    }

    /// Track that `advance` would return, without changing anything
    pub fn peek_next(&self) -> Option<&Track> {
        if self.mode.repeat == RepeatMode::One {
            return self.current();
        }
        self.next_index().map(|i| &self.active[i].track)
    }

    /// Track that `retreat` would return, without changing anything
    ///
    /// History takes priority over the linear order: under shuffle the
    /// previous slot in the play order is not what was heard before.
    pub fn peek_previous(&self) -> Option<&Track> {
        if self.mode.repeat == RepeatMode::One {
            return self.current();
        }
        if let Some(track) = self.history.peek() {
            return Some(track);
        }
        self.previous_index().map(|i| &self.active[i].track)
    }

    /// Move to the next track and return it
    ///
    /// The current track is recorded in history. Returns `None` when the
    /// queue is exhausted (repeat off, at the end); the position is left
    /// unchanged in that case.
    pub fn advance(&mut self) -> Option<Track> {
        if self.mode.repeat == RepeatMode::One {
            return self.current().cloned();
        }

        let next = self.next_index()?;
        if let Some(track) = self.current().cloned() {
            self.history.push(track);
        }
        self.current = Some(next);
        self.current().cloned()
    }

    /// Move to the previous track and return it
    ///
    /// Prefers the most recent history entry, relocating to the first slot
    /// holding that track. Falls back to the linear order when history is
    /// empty or the track is no longer queued.
    pub fn retreat(&mut self) -> Option<Track> {
        if self.mode.repeat == RepeatMode::One {
            return self.current().cloned();
        }

        if let Some(previous) = self.history.pop() {
            if let Some(index) = self.active.iter().position(|e| e.track.id == previous.id) {
                self.current = Some(index);
                return self.current().cloned();
            }
            debug!("History track {} no longer queued", previous.id);
        }

        let index = self.previous_index()?;
        self.current = Some(index);
        self.current().cloned()
    }

    /// Select the slot at `index` (play from queue)
    ///
    /// The current track is recorded in history. Out-of-bounds indices are
    /// ignored.
    pub fn jump_to(&mut self, index: usize) -> Option<Track> {
        if index >= self.active.len() {
            return None;
        }
        if let Some(track) = self.current().cloned() {
            self.history.push(track);
        }
        self.current = Some(index);
        self.current().cloned()
    }

    /// Whether `advance` would produce a track
    pub fn has_next(&self) -> bool {
        self.peek_next().is_some()
    }

    /// Whether `retreat` would produce a track
    pub fn has_previous(&self) -> bool {
        self.peek_previous().is_some()
    }

    // ===== Queries =====

    /// Tracks in play order
    pub fn tracks(&self) -> impl ExactSizeIterator<Item = &Track> {
        self.active.iter().map(|e| &e.track)
    }

    /// Slots in play order
    pub fn entries(&self) -> &[QueueEntry] {
        &self.active
    }

    /// Slots in original (pre-shuffle) order
    pub fn original_entries(&self) -> &[QueueEntry] {
        &self.original
    }

    /// Playback history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Forget playback history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Current index into the play order
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Shuffle and repeat settings
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Whether the play order is shuffled
    pub fn is_shuffled(&self) -> bool {
        self.mode.shuffled
    }

    /// Current repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.mode.repeat
    }

    /// Tracks matching `query` (title, artist or album) with their play-order index
    pub fn search(&self, query: &str) -> Vec<(usize, &Track)> {
        if query.trim().is_empty() {
            return self.tracks().enumerate().collect();
        }
        let filter = TrackFilter::query(query.trim());
        self.tracks()
            .enumerate()
            .filter(|(_, track)| filter.matches(track))
            .collect()
    }

    /// Summary statistics
    pub fn stats(&self) -> QueueStats {
        let artists: HashSet<&str> = self.tracks().map(|t| t.artist_name.as_str()).collect();
        let albums: HashSet<&str> = self
            .tracks()
            .filter_map(|t| t.album_title.as_deref())
            .collect();

        let current_position = self.current.map_or(0, |c| c + 1);
        QueueStats {
            total_tracks: self.active.len(),
            total_duration_secs: self.tracks().map(|t| u64::from(t.duration_secs)).sum(),
            unique_artists: artists.len(),
            unique_albums: albums.len(),
            current_position,
            remaining_tracks: self.active.len().saturating_sub(current_position),
        }
    }
}

impl Default for QueueEngine {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track::new(id, format!("Track {id}"), format!("Artist {id}")).with_duration_secs(100)
    }

    fn queue_of(ids: &[&str], start: usize) -> QueueEngine {
        let mut queue = QueueEngine::with_seed(50, 11);
        queue.set_queue(ids.iter().map(|id| track(id)).collect(), start);
        queue
    }

    fn order(queue: &QueueEngine) -> Vec<String> {
        queue.tracks().map(|t| t.id.to_string()).collect()
    }

    fn original_order(queue: &QueueEngine) -> Vec<String> {
        queue
            .original_entries()
            .iter()
            .map(|e| e.track.id.to_string())
            .collect()
    }

    fn current_id(queue: &QueueEngine) -> Option<String> {
        queue.current().map(|t| t.id.to_string())
    }

    #[test]
    fn set_queue_clamps_start_index() {
        let queue = queue_of(&["a", "b", "c"], 10);
        assert_eq!(queue.current_index(), Some(2));

        let empty = queue_of(&[], 3);
        assert_eq!(empty.current_index(), None);
        assert!(empty.current().is_none());
    }

    #[test]
    fn set_queue_clears_history() {
        let mut queue = queue_of(&["a", "b"], 0);
        queue.advance();
        assert_eq!(queue.history().len(), 1);

        queue.set_queue(vec![track("x")], 0);
        assert!(queue.history().is_empty());
    }

    #[test]
    fn set_queue_while_shuffled_keeps_start_first() {
        let mut queue = QueueEngine::with_seed(50, 5);
        queue.set_shuffle(true);
        queue.set_queue(["a", "b", "c", "d", "e"].iter().map(|id| track(id)).collect(), 3);

        assert_eq!(queue.current_index(), Some(0));
        assert_eq!(current_id(&queue).as_deref(), Some("d"));
        assert_eq!(original_order(&queue), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn add_end_and_next() {
        let mut queue = queue_of(&["a", "b", "c"], 1);

        assert_eq!(queue.add(track("x"), QueuePosition::Next), 2);
        assert_eq!(queue.add(track("y"), QueuePosition::End), 4);

        assert_eq!(order(&queue), vec!["a", "b", "x", "c", "y"]);
        assert_eq!(original_order(&queue), order(&queue));
        assert_eq!(current_id(&queue).as_deref(), Some("b"));
    }

    #[test]
    fn add_before_current_shifts_index() {
        let mut queue = queue_of(&["a", "b", "c"], 1);

        queue.add(track("x"), QueuePosition::At(0));
        assert_eq!(queue.current_index(), Some(2));
        assert_eq!(current_id(&queue).as_deref(), Some("b"));

        // At the current index also shifts
        queue.add(track("y"), QueuePosition::At(2));
        assert_eq!(current_id(&queue).as_deref(), Some("b"));

        // Explicit index past the end is clamped
        assert_eq!(queue.add(track("z"), QueuePosition::At(99)), 5);
    }

    #[test]
    fn add_to_empty_queue_leaves_nothing_selected() {
        let mut queue = QueueEngine::with_seed(50, 1);
        queue.add(track("a"), QueuePosition::Next);
        assert_eq!(queue.current_index(), None);

        // Advancing selects the first slot
        assert_eq!(queue.advance().unwrap().id.as_str(), "a");
    }

    #[test]
    fn add_many_next_keeps_relative_order() {
        let mut queue = queue_of(&["a", "b"], 0);
        queue.add_many(vec![track("x"), track("y")], QueuePosition::Next);
        assert_eq!(order(&queue), vec!["a", "x", "y", "b"]);
        assert_eq!(queue.peek_next().unwrap().id.as_str(), "x");
    }

    #[test]
    fn remove_adjusts_current_index() {
        let mut queue = queue_of(&["a", "b", "c", "d"], 2);

        assert_eq!(queue.remove(0).unwrap().id.as_str(), "a");
        assert_eq!(current_id(&queue).as_deref(), Some("c"));

        // Removing the current slot keeps the index, now on the following track
        assert_eq!(queue.remove(1).unwrap().id.as_str(), "c");
        assert_eq!(current_id(&queue).as_deref(), Some("d"));

        // Removing the last current slot clamps
        assert_eq!(queue.remove(1).unwrap().id.as_str(), "d");
        assert_eq!(current_id(&queue).as_deref(), Some("b"));

        assert_eq!(queue.remove(0).unwrap().id.as_str(), "b");
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn remove_out_of_bounds_is_noop() {
        let mut queue = queue_of(&["a"], 0);
        assert!(queue.remove(5).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn remove_uses_slot_identity_for_original_order() {
        let mut queue = queue_of(&["a", "b", "a"], 0);
        queue.toggle_shuffle();

        let removed_slot = queue.entries()[2].slot;
        queue.remove(2);

        assert!(queue.original_entries().iter().all(|e| e.slot != removed_slot));
        assert_eq!(queue.original_entries().len(), 2);
    }

    #[test]
    fn move_follows_current_slot() {
        let mut queue = queue_of(&["a", "b", "c", "d"], 1);
        queue.move_track(1, 3);
        assert_eq!(order(&queue), vec!["a", "c", "d", "b"]);
        assert_eq!(queue.current_index(), Some(3));
        assert_eq!(original_order(&queue), order(&queue));
    }

    #[test]
    fn move_while_shuffled_survives_unshuffle() {
        let mut queue = queue_of(&["a", "b", "c", "d", "e", "f"], 0);
        queue.toggle_shuffle();

        let last = queue.len() - 1;
        let moved = queue.entries()[1].slot;
        queue.move_track(1, last);
        let predecessor = queue.entries()[last - 1].slot;

        let mut sorted = original_order(&queue);
        sorted.sort();
        assert_eq!(sorted, vec!["a", "b", "c", "d", "e", "f"]);

        queue.toggle_shuffle();
        let slots: Vec<SlotId> = queue.entries().iter().map(|e| e.slot).collect();
        let at = slots.iter().position(|s| *s == moved).unwrap();
        assert!(at > 0);
        assert_eq!(slots[at - 1], predecessor);
    }

    #[test]
    fn move_to_front_while_shuffled_precedes_successor() {
        let mut queue = queue_of(&["a", "b", "c", "d", "e"], 0);
        queue.toggle_shuffle();

        let moved = queue.entries()[3].slot;
        queue.move_track(3, 0);
        let successor = queue.entries()[1].slot;

        let original: Vec<SlotId> = queue.original_entries().iter().map(|e| e.slot).collect();
        let at = original.iter().position(|s| *s == moved).unwrap();
        assert_eq!(original[at + 1], successor);
    }

    #[test]
    fn move_across_current_shifts_index() {
        let mut queue = queue_of(&["a", "b", "c", "d"], 2);

        queue.move_track(0, 3); // b c d a
        assert_eq!(current_id(&queue).as_deref(), Some("c"));
        assert_eq!(queue.current_index(), Some(1));

        queue.move_track(3, 0); // a b c d
        assert_eq!(current_id(&queue).as_deref(), Some("c"));
        assert_eq!(queue.current_index(), Some(2));

        // Move entirely after current: untouched
        queue.move_track(3, 3);
        queue.move_track(3, 9);
        assert_eq!(order(&queue), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut queue = queue_of(&["a", "b"], 0);
        queue.advance();
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.history().is_empty());
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn shuffle_round_trip_restores_order() {
        let ids = ["a", "b", "c", "d", "e", "f", "g"];
        let mut queue = queue_of(&ids, 4);

        assert!(queue.toggle_shuffle());
        assert_eq!(queue.current_index(), Some(0));
        assert_eq!(current_id(&queue).as_deref(), Some("e"));

        assert!(!queue.toggle_shuffle());
        assert_eq!(order(&queue), ids.to_vec());
        assert_eq!(queue.current_index(), Some(4));
    }

    #[test]
    fn unshuffle_relocates_duplicate_by_slot() {
        let mut queue = queue_of(&["a", "b", "a"], 2);
        let slot = queue.current_entry().unwrap().slot;

        queue.toggle_shuffle();
        queue.toggle_shuffle();

        assert_eq!(queue.current_index(), Some(2));
        assert_eq!(queue.current_entry().unwrap().slot, slot);
    }

    #[test]
    fn repeat_mode_by_name() {
        let mut queue = QueueEngine::default();
        assert!(queue.set_repeat_mode_named("all"));
        assert_eq!(queue.repeat_mode(), RepeatMode::All);

        assert!(!queue.set_repeat_mode_named("forever"));
        assert_eq!(queue.repeat_mode(), RepeatMode::All);

        assert_eq!(queue.cycle_repeat_mode(), RepeatMode::One);
        assert_eq!(queue.cycle_repeat_mode(), RepeatMode::Off);
    }

    #[test]
    fn peek_is_pure() {
        let queue = queue_of(&["a", "b", "c"], 1);
        assert_eq!(queue.peek_next().unwrap().id.as_str(), "c");
        assert_eq!(queue.peek_previous().unwrap().id.as_str(), "a");
        assert_eq!(queue.current_index(), Some(1));
        assert!(queue.history().is_empty());
    }

    #[test]
    fn advance_stops_at_end_without_repeat() {
        let mut queue = queue_of(&["a", "b", "c"], 1);

        assert_eq!(queue.advance().unwrap().id.as_str(), "c");
        assert!(queue.advance().is_none());
        assert_eq!(current_id(&queue).as_deref(), Some("c"));
        assert!(!queue.has_next());
    }

    #[test]
    fn repeat_all_wraps_both_ways() {
        let mut queue = queue_of(&["a", "b", "c"], 2);
        queue.set_repeat_mode(RepeatMode::All);

        assert_eq!(queue.peek_next().unwrap().id.as_str(), "a");
        assert_eq!(queue.advance().unwrap().id.as_str(), "a");

        queue.clear_history();
        assert_eq!(queue.retreat().unwrap().id.as_str(), "c");
    }

    #[test]
    fn repeat_one_stays_put() {
        let mut queue = queue_of(&["a", "b"], 0);
        queue.set_repeat_mode(RepeatMode::One);

        for _ in 0..3 {
            assert_eq!(queue.advance().unwrap().id.as_str(), "a");
        }
        assert_eq!(queue.retreat().unwrap().id.as_str(), "a");
        assert!(queue.history().is_empty());
    }

    #[test]
    fn retreat_prefers_history_under_shuffle() {
        let mut queue = queue_of(&["a", "b", "c", "d", "e"], 0);
        queue.toggle_shuffle();

        let first = current_id(&queue).unwrap();
        let second = queue.advance().unwrap().id.to_string();
        assert_eq!(queue.peek_previous().unwrap().id.as_str(), first);

        assert_eq!(queue.retreat().unwrap().id.to_string(), first);
        assert_ne!(first, second);
    }

    #[test]
    fn retreat_falls_back_when_history_track_removed() {
        let mut queue = queue_of(&["a", "b", "c"], 0);
        queue.advance(); // history [a], current b
        queue.advance(); // history [a, b], current c
        queue.remove(1); // drop b; current c at index 1

        // b popped from history but gone; falls back to index - 1
        assert_eq!(queue.retreat().unwrap().id.as_str(), "a");
    }

    #[test]
    fn retreat_at_start_without_repeat() {
        let mut queue = queue_of(&["a", "b"], 0);
        assert!(queue.retreat().is_none());
        assert_eq!(current_id(&queue).as_deref(), Some("a"));
    }

    #[test]
    fn jump_records_history() {
        let mut queue = queue_of(&["a", "b", "c"], 0);
        assert_eq!(queue.jump_to(2).unwrap().id.as_str(), "c");
        assert_eq!(queue.history().peek().unwrap().id.as_str(), "a");
        assert!(queue.jump_to(7).is_none());
        assert_eq!(queue.current_index(), Some(2));
    }

    #[test]
    fn search_and_stats() {
        let mut queue = QueueEngine::with_seed(50, 2);
        queue.set_queue(
            vec![
                Track::new("1", "So What", "Miles Davis")
                    .with_album("Kind of Blue")
                    .with_duration_secs(545),
                Track::new("2", "Giant Steps", "John Coltrane")
                    .with_album("Giant Steps")
                    .with_duration_secs(286),
                Track::new("3", "Naima", "John Coltrane").with_duration_secs(261),
            ],
            0,
        );

        let hits: Vec<usize> = queue.search("coltrane").into_iter().map(|(i, _)| i).collect();
        assert_eq!(hits, vec![1, 2]);
        assert_eq!(queue.search("  ").len(), 3);

        let stats = queue.stats();
        assert_eq!(stats.total_tracks, 3);
        assert_eq!(stats.total_duration_secs, 545 + 286 + 261);
        assert_eq!(stats.unique_artists, 2);
        assert_eq!(stats.unique_albums, 2);
        assert_eq!(stats.current_position, 1);
        assert_eq!(stats.remaining_tracks, 2);
    }
}
