//! `KeyframeContainer<T>`: an append-mostly, hint-accelerated history of
//! keyframes, non-decreasing in time, always starting with a sentinel
//! at [`TIME_MIN`].

use crate::curve::keyframe::Keyframe;
use crate::error::{CoreError, CoreResult};
use crate::time::{Time, TIME_MIN};

/// A time-ordered sequence of [`Keyframe`]s.
///
/// All positional methods take and return plain indices (`usize`)
/// rather than an iterator handle: callers (curves) are expected to
/// cache the last index they touched and pass it back in as `hint` on
/// the next call, making repeated nearby lookups and insertions O(1)
/// amortized instead of O(log n).
#[derive(Clone, Debug)]
pub struct KeyframeContainer<T> {
    frames: Vec<Keyframe<T>>,
}

impl<T> KeyframeContainer<T> {
    /// Create a container with the given sentinel value at [`TIME_MIN`].
    pub fn new(default_value: T) -> Self {
        Self { frames: vec![Keyframe::sentinel(default_value)] }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`: the sentinel keyframe is never removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, idx: usize) -> &Keyframe<T> {
        &self.frames[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut Keyframe<T> {
        &mut self.frames[idx]
    }

    pub fn last_index(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe<T>> {
        self.frames.iter()
    }

    fn clamp_hint(&self, hint: usize) -> usize {
        hint.min(self.frames.len() - 1)
    }

    /// Index of the last keyframe with `time <= query`, searching
    /// outward from `hint`.
    pub fn last(&self, query: Time, hint: usize) -> usize {
        let mut idx = self.clamp_hint(hint);
        while idx + 1 < self.frames.len() && self.frames[idx + 1].time <= query {
            idx += 1;
        }
        while idx > 0 && self.frames[idx].time > query {
            idx -= 1;
        }
        idx
    }

    /// Index of the last keyframe with `time < query`, searching
    /// outward from `hint`.
    pub fn last_before(&self, query: Time, hint: usize) -> usize {
        let mut idx = self.clamp_hint(hint);
        while idx + 1 < self.frames.len() && self.frames[idx + 1].time < query {
            idx += 1;
        }
        while idx > 0 && self.frames[idx].time >= query {
            idx -= 1;
        }
        idx
    }

    /// Insert `keyframe`, placing it before any existing keyframes
    /// that share its exact timestamp.
    pub fn insert_before(&mut self, keyframe: Keyframe<T>, hint: usize) -> usize {
        let mut at = self.last(keyframe.time, hint);
        while at > 0 && self.frames[at].time == keyframe.time {
            at -= 1;
        }
        self.frames.insert(at + 1, keyframe);
        at + 1
    }

    /// Insert `keyframe` after any existing keyframes that share its
    /// exact timestamp.
    pub fn insert_after(&mut self, keyframe: Keyframe<T>, hint: usize) -> usize {
        let at = self.last(keyframe.time, hint);
        self.frames.insert(at + 1, keyframe);
        at + 1
    }

    /// Insert `keyframe`, replacing any keyframe(s) at its exact
    /// timestamp. When `overwrite_all` is set the entire same-time
    /// group is dropped first; otherwise a single matching keyframe is
    /// overwritten in place if one exists.
    pub fn insert_overwrite(&mut self, keyframe: Keyframe<T>, hint: usize, overwrite_all: bool) -> usize
    where
        T: Clone,
    {
        let at = self.last(keyframe.time, hint);
        if overwrite_all {
            let idx = self.erase_group(keyframe.time, at);
            self.frames.insert(idx + 1, keyframe);
            idx + 1
        } else if self.frames[at].time == keyframe.time {
            self.frames[at].value = keyframe.value;
            at
        } else {
            self.frames.insert(at + 1, keyframe);
            at + 1
        }
    }

    /// Remove every keyframe at `time`, walking backward from
    /// `last_elem`. Returns the index of the keyframe immediately
    /// preceding the removed group.
    fn erase_group(&mut self, time: Time, last_elem: usize) -> usize {
        let mut idx = last_elem;
        while idx > 0 && self.frames[idx].time == time {
            self.frames.remove(idx);
            idx -= 1;
        }
        idx
    }

    /// Remove every keyframe at `time`, searching outward from `hint`.
    pub fn erase_at(&mut self, time: Time, hint: usize) -> usize {
        let at = self.last(time, hint);
        self.erase_group(time, at)
    }

    /// Remove the keyframe at raw index `pos`. A no-op on the sentinel
    /// at index 0.
    pub fn erase(&mut self, pos: usize) {
        if pos > 0 {
            self.frames.remove(pos);
        }
    }

    /// Drop every keyframe after `last_valid`, keeping it and
    /// everything before it.
    pub fn erase_after(&mut self, last_valid: usize) {
        self.frames.truncate(last_valid + 1);
    }

    /// Drop every keyframe but the sentinel.
    pub fn clear(&mut self) {
        self.frames.truncate(1);
    }

    /// Replace everything after `start` with `other`'s keyframes from
    /// `start` onward (inclusive of a keyframe at exactly `start`).
    pub fn sync(&mut self, other: &KeyframeContainer<T>, start: Time)
    where
        T: Clone,
    {
        self.sync_with(other, start, |v: &T| v.clone());
    }

    /// Like [`Self::sync`] but converts each copied value with `convert`,
    /// for syncing between containers of different value types.
    pub fn sync_with<U>(&mut self, other: &KeyframeContainer<U>, start: Time, convert: impl Fn(&U) -> T) {
        let self_idx = self.last_before(start, 0);
        self.erase_after(self_idx);
        let other_idx = other.last_before(start, 0);
        for kf in &other.frames[other_idx + 1..] {
            self.frames.push(Keyframe::new(kf.time, convert(&kf.value)));
        }
    }

    /// Verify the non-decreasing-time invariant over the whole
    /// history.
    pub fn check_integrity(&self) -> CoreResult<()> {
        let mut max_seen = TIME_MIN;
        for kf in &self.frames {
            if kf.time < max_seen {
                return Err(CoreError::IntegrityViolation { at: kf.time });
            }
            max_seen = kf.time;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c() -> KeyframeContainer<i32> {
        KeyframeContainer::new(0)
    }

    #[test]
    fn last_finds_sentinel_before_any_insert() {
        let cont = c();
        assert_eq!(cont.last(Time::from_secs(5), 0), 0);
        assert_eq!(cont.get(0).value, 0);
    }

    #[test]
    fn insert_after_then_last_tracks_new_keyframe() {
        let mut cont = c();
        let at = cont.insert_after(Keyframe::new(Time::from_secs(10), 42), 0);
        assert_eq!(at, 1);
        assert_eq!(cont.last(Time::from_secs(10), 0), 1);
        assert_eq!(cont.last(Time::from_secs(9), 0), 0);
        assert_eq!(cont.last(Time::from_secs(100), 0), 1);
    }

    #[test]
    fn insert_before_places_ahead_of_same_time_group() {
        let mut cont = c();
        cont.insert_after(Keyframe::new(Time::from_secs(10), 1), 0);
        let at = cont.insert_before(Keyframe::new(Time::from_secs(10), 2), 0);
        assert_eq!(cont.get(at).value, 2);
        assert_eq!(cont.get(at + 1).value, 1);
    }

    #[test]
    fn last_before_is_strict() {
        let mut cont = c();
        cont.insert_after(Keyframe::new(Time::from_secs(10), 1), 0);
        assert_eq!(cont.last_before(Time::from_secs(10), 0), 0);
        assert_eq!(cont.last(Time::from_secs(10), 0), 1);
    }

    #[test]
    fn overwrite_all_drops_whole_group() {
        let mut cont = c();
        cont.insert_after(Keyframe::new(Time::from_secs(10), 1), 0);
        cont.insert_after(Keyframe::new(Time::from_secs(10), 2), 0);
        assert_eq!(cont.len(), 3);
        cont.insert_overwrite(Keyframe::new(Time::from_secs(10), 9), 0, true);
        assert_eq!(cont.len(), 2);
        assert_eq!(cont.get(1).value, 9);
    }

    #[test]
    fn sync_copies_tail_inclusive_of_boundary() {
        let mut other = c();
        other.insert_after(Keyframe::new(Time::from_secs(5), 1), 0);
        other.insert_after(Keyframe::new(Time::from_secs(10), 2), 0);
        let mut mine = c();
        mine.insert_after(Keyframe::new(Time::from_secs(3), 99), 0);
        mine.sync(&other, Time::from_secs(5));
        assert_eq!(mine.len(), 3);
        assert_eq!(mine.get(1).value, 1);
        assert_eq!(mine.get(2).value, 2);
    }

    #[test]
    fn check_integrity_detects_non_monotonic_times() {
        let mut cont = c();
        cont.insert_after(Keyframe::new(Time::from_secs(10), 1), 0);
        cont.get_mut(1).time = Time::from_secs(-1);
        assert!(cont.check_integrity().is_err());
    }

    proptest::proptest! {
        #[test]
        fn last_never_exceeds_query_time(times in proptest::collection::vec(1i64..1000, 1..30)) {
            let mut cont = c();
            let mut sorted: Vec<i64> = times.clone();
            sorted.sort();
            for t in &sorted {
                cont.insert_after(Keyframe::new(Time::from_secs(*t), 0), 0);
            }
            for t in &sorted {
                let idx = cont.last(Time::from_secs(*t), 0);
                proptest::prop_assert!(cont.get(idx).time <= Time::from_secs(*t));
            }
        }
    }
}
