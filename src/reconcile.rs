//! Merging of track lists coming from several sources.
//!
//! The [`Reconciler`] takes ordered lists of tracks (for example cached
//! records first, then provider results) and produces one list in which every
//! identity key appears once. It performs no I/O and no validation.

use std::collections::HashMap;

use crate::models::{FallbackKey, Track, TrackSource};

/// Deduplicating merge of track lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciler {
    /// Source whose records replace colliding records from other sources.
    preferred_source: TrackSource,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(TrackSource::Itunes)
    }
}

impl Reconciler {
    /// Create a reconciler preferring records tagged with `preferred_source`.
    pub fn new(preferred_source: TrackSource) -> Self {
        Self { preferred_source }
    }

    /// Merge `sources` in the given order.
    ///
    /// Records with an `external_id` come first, then the rest; both groups
    /// keep first-seen order. `max_results` truncates the final list.
    pub fn reconcile<I>(&self, sources: I, max_results: Option<usize>) -> Vec<Track>
    where
        I: IntoIterator<Item = Vec<Track>>,
    {
        let mut merge = Merge::new(self.preferred_source);
        for source in sources {
            for track in source {
                merge.insert(track);
            }
        }

        let (mut merged, without_id): (Vec<Track>, Vec<Track>) = merge
            .slots
            .into_iter()
            .filter(|slot| slot.live)
            .map(|slot| slot.track)
            .partition(Track::has_external_id);
        merged.extend(without_id);

        if let Some(max) = max_results {
            merged.truncate(max);
        }
        merged
    }
}

struct Slot {
    track: Track,
    /// Cleared when the record was absorbed into an identified one.
    live: bool,
}

/// Insertion-ordered merge state.
///
/// `by_tuple` points at a live slot holding that fallback tuple, an
/// identified one whenever such a slot exists.
struct Merge {
    preferred_source: TrackSource,
    slots: Vec<Slot>,
    by_id: HashMap<i64, usize>,
    by_tuple: HashMap<FallbackKey, usize>,
}

impl Merge {
    fn new(preferred_source: TrackSource) -> Self {
        Self {
            preferred_source,
            slots: Vec::new(),
            by_id: HashMap::new(),
            by_tuple: HashMap::new(),
        }
    }

    fn insert(&mut self, track: Track) {
        let tuple = track.fallback_key();

        if let Some(id) = track.external_id {
            if let Some(&slot) = self.by_id.get(&id) {
                if self.prefers(slot, &track) {
                    self.replace(slot, track);
                }
                return;
            }
            // An identified record takes over the slot of an unidentified one
            // with the same metadata.
            if let Some(&slot) = self.by_tuple.get(&tuple) {
                if !self.slots[slot].track.has_external_id() {
                    self.replace(slot, track);
                    return;
                }
            }
        } else if let Some(&slot) = self.by_tuple.get(&tuple) {
            if !self.slots[slot].track.has_external_id() && self.prefers(slot, &track) {
                self.replace(slot, track);
            }
            return;
        }

        let slot = self.slots.len();
        if let Some(id) = track.external_id {
            self.by_id.insert(id, slot);
        }
        self.by_tuple.entry(tuple).or_insert(slot);
        self.slots.push(Slot { track, live: true });
    }

    /// First write wins unless only the newcomer is preferred.
    fn prefers(&self, slot: usize, track: &Track) -> bool {
        track.source == self.preferred_source
            && self.slots[slot].track.source != self.preferred_source
    }

    /// Put `track` in place of the record at `slot`.
    ///
    /// An identified newcomer also absorbs any other unidentified record with
    /// its tuple; the merged record keeps the earlier of the two slots.
    fn replace(&mut self, slot: usize, track: Track) {
        let old_tuple = self.slots[slot].track.fallback_key();
        let new_tuple = track.fallback_key();
        let mut target = slot;

        if let Some(id) = track.external_id {
            let absorbed = self.slots.iter().enumerate().position(|(i, s)| {
                i != slot
                    && s.live
                    && !s.track.has_external_id()
                    && s.track.fallback_key() == new_tuple
            });
            if let Some(other) = absorbed {
                self.slots[other].live = false;
                if other < slot {
                    self.slots[slot].live = false;
                    target = other;
                }
            }
            self.by_id.insert(id, target);
        }

        self.slots[target] = Slot { track, live: true };
        self.reindex(old_tuple);
        self.reindex(new_tuple);
    }

    /// Point `tuple` at its best live slot, or forget it.
    fn reindex(&mut self, tuple: FallbackKey) {
        let mut best = None;
        for (i, s) in self.slots.iter().enumerate() {
            if !s.live || s.track.fallback_key() != tuple {
                continue;
            }
            if s.track.has_external_id() {
                best = Some(i);
                break;
            }
            best.get_or_insert(i);
        }
        match best {
            Some(i) => {
                self.by_tuple.insert(tuple, i);
            }
            None => {
                self.by_tuple.remove(&tuple);
            }
        }
    }
}
