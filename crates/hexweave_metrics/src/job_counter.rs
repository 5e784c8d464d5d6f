//! Per-kind animation job lifecycle tallies

use std::collections::BTreeMap;

/// Lifecycle counts for one job kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobTally {
    pub started: u64,
    pub completed: u64,
    pub cancelled: u64,
}

impl JobTally {
    /// Jobs of this kind that started and have not finished either way.
    pub fn in_flight(&self) -> u64 {
        self.started
            .saturating_sub(self.completed)
            .saturating_sub(self.cancelled)
    }
}

pub struct JobCounter {
    tallies: BTreeMap<&'static str, JobTally>,
}

impl JobCounter {
    pub fn new() -> Self {
        Self {
            tallies: BTreeMap::new(),
        }
    }

    pub fn record_start(&mut self, kind: &'static str) {
        self.tallies.entry(kind).or_default().started += 1;
    }

    pub fn record_finish(&mut self, kind: &'static str, cancelled: bool) {
        let tally = self.tallies.entry(kind).or_default();
        if cancelled {
            tally.cancelled += 1;
        } else {
            tally.completed += 1;
        }
    }

    pub fn tally(&self, kind: &str) -> JobTally {
        self.tallies.get(kind).copied().unwrap_or_default()
    }

    pub fn in_flight(&self) -> u64 {
        self.tallies.values().map(JobTally::in_flight).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &JobTally)> {
        self.tallies.iter().map(|(kind, tally)| (*kind, tally))
    }
}

impl Default for JobCounter {
    fn default() -> Self {
        Self::new()
    }
}
