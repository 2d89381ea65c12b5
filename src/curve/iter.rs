//! A small filtering iterator shared by the container curves: given a
//! stream of `(alive, dead, value)` triples, yield only the values
//! whose lifetime overlaps a query window.

use crate::time::Time;

pub struct AliveIter<I> {
    inner: I,
    start: Time,
    end: Time,
}

impl<I> AliveIter<I> {
    pub fn new(inner: I, start: Time, end: Time) -> Self {
        Self { inner, start, end }
    }
}

impl<I, T> Iterator for AliveIter<I>
where
    I: Iterator<Item = (Time, Time, T)>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        for (alive, dead, value) in self.inner.by_ref() {
            if alive < self.end && dead > self.start {
                return Some(value);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Time, TIME_MAX};

    #[test]
    fn filters_to_overlapping_lifetimes() {
        let data = vec![
            (Time::from_secs(0), Time::from_secs(2), "before_window"),
            (Time::from_secs(0), Time::from_secs(5), "overlaps_window_start"),
            (Time::from_secs(5), TIME_MAX, "overlaps_window_end"),
        ];
        let got: Vec<_> = AliveIter::new(data.into_iter(), Time::from_secs(3), Time::from_secs(10)).collect();
        assert_eq!(got, vec!["overlaps_window_start", "overlaps_window_end"]);
    }
}
