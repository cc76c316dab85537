//! Shuffle algorithm for queue randomization
//!
//! Fisher-Yates over every slot except the one that is playing, which is
//! pinned to the front of the new order.

use crate::types::QueueEntry;
use rand::seq::SliceRandom;
use rand::Rng;

/// Produce a shuffled copy of `entries`
///
/// When `pinned` names a valid index, that entry becomes the first element
/// and only the remaining entries are randomized.
pub fn shuffle_around<R: Rng + ?Sized>(
    entries: &[QueueEntry],
    pinned: Option<usize>,
    rng: &mut R,
) -> Vec<QueueEntry> {
    let mut working = entries.to_vec();

    let head = match pinned {
        Some(index) if index < working.len() => Some(working.remove(index)),
        _ => None,
    };

    // SliceRandom::shuffle is an in-place Fisher-Yates
    working.shuffle(rng);

    if let Some(entry) = head {
        working.insert(0, entry);
    }
    working
}
