// Id generation for students and transactions
//
// Ids are either wall-clock milliseconds (what the interactive app uses) or a
// plain counter (deterministic, for tests and the API). Both are strictly
// increasing within one generator, so a burst of imports never repeats an id.

use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    Clock,
    Sequential,
}

#[derive(Debug, Clone)]
pub struct IdGenerator {
    source: IdSource,
    last: u64,
}

impl IdGenerator {
    pub fn clock() -> Self {
        IdGenerator {
            source: IdSource::Clock,
            last: 0,
        }
    }

    /// Counter that hands out `start + 1`, `start + 2`, ...
    pub fn sequential(start: u64) -> Self {
        IdGenerator {
            source: IdSource::Sequential,
            last: start,
        }
    }

    pub fn source(&self) -> IdSource {
        self.source
    }

    /// Make sure future ids are above every id already in use.
    pub fn observe(&mut self, existing: u64) {
        self.last = self.last.max(existing);
    }

    pub fn next_id(&mut self) -> u64 {
        let candidate = match self.source {
            IdSource::Clock => u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0),
            IdSource::Sequential => 0,
        };
        self.last = candidate.max(self.last + 1);
        self.last
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::clock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_counts_up() {
        let mut ids = IdGenerator::sequential(100);
        assert_eq!(ids.next_id(), 101);
        assert_eq!(ids.next_id(), 102);
    }

    #[test]
    fn test_observe_skips_used_ids() {
        let mut ids = IdGenerator::sequential(0);
        ids.observe(105);
        ids.observe(3);
        assert_eq!(ids.next_id(), 106);
    }

    #[test]
    fn test_clock_ids_strictly_increase() {
        let mut ids = IdGenerator::clock();
        let first = ids.next_id();
        let second = ids.next_id();
        let third = ids.next_id();

        assert!(first > 1_600_000_000_000);
        assert!(second > first);
        assert!(third > second);
    }
}
