// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! A single-output traffic generator driven by a configurable pattern.

use netfab_engine::node::{Node, NodeBase};
use netfab_engine::packet::Packet;
use netfab_engine::types::{SimError, SimResult};
use netfab_track::Level;

const OUTPUT_PORT: &str = "tx";

/// How a [`Producer`] decides whether to attempt a send on a given cycle.
///
/// The reference Python implementation hardcodes a send-every-`n`-cycles
/// rate per node id; here the rate (and the richer burst pattern) comes
/// from the node's CSV row instead, so any number of producers can be
/// configured without touching the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Attempt a send on every cycle.
    EveryCycle,
    /// Attempt a send only when `cycle % interval == 0`.
    Periodic { interval: u64 },
    /// Send `count` packets back to back, then stay idle for `idle` cycles,
    /// repeating indefinitely.
    Burst { count: u64, idle: u64 },
}

impl Pattern {
    /// Parse the `pattern`/`pattern_params` columns of a node's CSV row.
    pub fn parse(pattern: Option<&str>, params: Option<&str>) -> SimResult<Self> {
        match pattern.unwrap_or("every-cycle") {
            "every-cycle" => Ok(Pattern::EveryCycle),
            "periodic" => {
                let interval = parse_param(params, "periodic")?;
                if interval == 0 {
                    return Err(SimError::Configuration(
                        "periodic pattern needs interval >= 1".to_string(),
                    ));
                }
                Ok(Pattern::Periodic { interval })
            }
            "burst" => {
                let (count, idle) = parse_pair(params, "burst")?;
                Ok(Pattern::Burst { count, idle })
            }
            other => Err(SimError::Configuration(format!(
                "unrecognised producer pattern '{other}'"
            ))),
        }
    }

    fn should_attempt(&self, cycle: u64) -> bool {
        match *self {
            Pattern::EveryCycle => true,
            Pattern::Periodic { interval } => cycle % interval == 0,
            Pattern::Burst { count, idle } => {
                let period = count + idle;
                period != 0 && (cycle % period) < count
            }
        }
    }
}

fn parse_param(params: Option<&str>, pattern: &str) -> SimResult<u64> {
    params
        .ok_or_else(|| SimError::Configuration(format!("{pattern} pattern requires pattern_params")))?
        .trim()
        .parse::<u64>()
        .map_err(|_| SimError::Configuration(format!("{pattern} pattern_params must be an integer")))
}

fn parse_pair(params: Option<&str>, pattern: &str) -> SimResult<(u64, u64)> {
    let raw = params
        .ok_or_else(|| SimError::Configuration(format!("{pattern} pattern requires pattern_params")))?;
    let mut parts = raw.split(',').map(str::trim);
    let count = parts
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| SimError::Configuration(format!("{pattern} pattern_params must be 'count,idle'")))?;
    let idle = parts
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| SimError::Configuration(format!("{pattern} pattern_params must be 'count,idle'")))?;
    Ok((count, idle))
}

pub struct Producer {
    base: NodeBase,
    pattern: Pattern,
    next_packet_id: u64,
}

impl Producer {
    pub fn new(base: NodeBase, pattern: Pattern) -> Self {
        Self {
            base,
            pattern,
            next_packet_id: 0,
        }
    }
}

impl Node for Producer {
    fn id(&self) -> &str {
        &self.base.id
    }

    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn setup(&mut self) -> SimResult<()> {
        self.base.stats.register_counter("pkts_sent")?;
        self.base.stats.register_counter("pkts_failed")?;
        Ok(())
    }

    fn advance(&mut self, current_cycle: u64) -> SimResult<()> {
        if !self.pattern.should_attempt(current_cycle) {
            return Ok(());
        }

        let packet = Packet::new(format!("{}-{}", self.base.id, self.next_packet_id));
        self.next_packet_id += 1;

        match self.base.send_pkt(OUTPUT_PORT, packet, current_cycle) {
            Ok(()) => {
                self.base.stats.incr_counter("pkts_sent", 1)?;
                self.base
                    .log(Level::Debug, Some(current_cycle), format_args!("sent packet"));
            }
            Err(SimError::AdmissionDenied) => {
                self.base.stats.incr_counter("pkts_failed", 1)?;
                self.base
                    .log(Level::Warning, Some(current_cycle), format_args!("send denied, no credit"));
            }
            Err(other) => return Err(other),
        }
        Ok(())
    }
}
