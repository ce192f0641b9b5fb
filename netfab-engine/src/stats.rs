// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Counters, per-cycle activity maps and interval histograms.
//!
//! `Stats` is a thin, explicitly-owned collaborator (one per node, reached
//! through [`NodeBase`](crate::node::NodeBase)'s façade) rather than a
//! process-wide singleton. Registration is separate from use: every name
//! must be registered exactly once before it is read or incremented,
//! matching the reference implementation's assert-based duplicate/missing
//! checks.

use std::collections::HashMap;

use crate::invariant_error;
use crate::types::SimResult;

#[derive(Default)]
pub struct Stats {
    counters: HashMap<String, i64>,
    cycle_stats: HashMap<String, HashMap<u64, bool>>,
    interval_counters: HashMap<String, IntervalCounter>,
}

struct IntervalCounter {
    interval: u64,
    buckets: HashMap<u64, i64>,
}

impl Stats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_counter(&mut self, name: &str) -> SimResult<()> {
        if self.counters.insert(name.to_string(), 0).is_some() {
            return invariant_error!("counter '{name}' already registered");
        }
        Ok(())
    }

    pub fn incr_counter(&mut self, name: &str, amount: i64) -> SimResult<()> {
        match self.counters.get_mut(name) {
            Some(value) => {
                *value += amount;
                Ok(())
            }
            None => invariant_error!("counter '{name}' used before registration"),
        }
    }

    pub fn get_counter(&self, name: &str) -> SimResult<i64> {
        self.counters
            .get(name)
            .copied()
            .ok_or_else(|| format!("counter '{name}' was never registered"))
            .map_err(crate::types::SimError::InvariantViolation)
    }

    pub fn register_cycle_stats(&mut self, name: &str) -> SimResult<()> {
        if self.cycle_stats.insert(name.to_string(), HashMap::new()).is_some() {
            return invariant_error!("cycle stat '{name}' already registered");
        }
        Ok(())
    }

    pub fn record_cycle_stats(&mut self, name: &str, cycle: u64, value: bool) -> SimResult<()> {
        match self.cycle_stats.get_mut(name) {
            Some(map) => {
                map.insert(cycle, value);
                Ok(())
            }
            None => invariant_error!("cycle stat '{name}' used before registration"),
        }
    }

    #[must_use]
    pub fn get_cycle_stats(&self, name: &str) -> Option<&HashMap<u64, bool>> {
        self.cycle_stats.get(name)
    }

    pub fn register_interval_counter(&mut self, name: &str, interval: u64) -> SimResult<()> {
        if interval == 0 {
            return invariant_error!("interval counter '{name}' needs interval >= 1");
        }
        if self
            .interval_counters
            .insert(
                name.to_string(),
                IntervalCounter {
                    interval,
                    buckets: HashMap::new(),
                },
            )
            .is_some()
        {
            return invariant_error!("interval counter '{name}' already registered");
        }
        Ok(())
    }

    pub fn incr_interval_counter(&mut self, name: &str, cycle: u64, amount: i64) -> SimResult<()> {
        match self.interval_counters.get_mut(name) {
            Some(counter) => {
                let bucket = (cycle / counter.interval) * counter.interval;
                *counter.buckets.entry(bucket).or_insert(0) += amount;
                Ok(())
            }
            None => invariant_error!("interval counter '{name}' used before registration"),
        }
    }

    #[must_use]
    pub fn get_interval_counter(&self, name: &str) -> Option<&HashMap<u64, i64>> {
        self.interval_counters.get(name).map(|c| &c.buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_round_trips() {
        let mut stats = Stats::new();
        stats.register_counter("sent").unwrap();
        stats.incr_counter("sent", 1).unwrap();
        stats.incr_counter("sent", 2).unwrap();
        assert_eq!(stats.get_counter("sent").unwrap(), 3);
    }

    #[test]
    fn duplicate_registration_is_fatal() {
        let mut stats = Stats::new();
        stats.register_counter("sent").unwrap();
        assert!(stats.register_counter("sent").is_err());
    }

    #[test]
    fn use_before_registration_is_fatal() {
        let mut stats = Stats::new();
        assert!(stats.incr_counter("nope", 1).is_err());
        assert!(stats.get_counter("nope").is_err());
    }

    #[test]
    fn interval_counter_buckets_by_interval() {
        let mut stats = Stats::new();
        stats.register_interval_counter("bursts", 5).unwrap();
        stats.incr_interval_counter("bursts", 0, 1).unwrap();
        stats.incr_interval_counter("bursts", 4, 1).unwrap();
        stats.incr_interval_counter("bursts", 5, 1).unwrap();
        let buckets = stats.get_interval_counter("bursts").unwrap();
        assert_eq!(buckets.get(&0), Some(&2));
        assert_eq!(buckets.get(&5), Some(&1));
    }
}
