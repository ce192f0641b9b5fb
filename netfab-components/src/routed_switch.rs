// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Per-output scheduling queues with a static routing table.
//!
//! Unlike [`RoundRobinSwitch`](crate::round_robin_switch::RoundRobinSwitch),
//! this discipline keeps one scheduling queue per output and never moves a
//! packet out of its input FIFO until it is actually serviced: the
//! admission phase only [`peek`](netfab_engine::node::NodeBase::peek_pkt)s
//! at each input to decide routing and reserve a slot; the service phase
//! performs the real `recv_pkt` (which both pops and issues the upstream
//! credit) immediately before sending.

use std::collections::{HashMap, VecDeque};

use netfab_engine::node::{Node, NodeBase};
use netfab_engine::types::{SimError, SimResult};
use netfab_track::Level;

struct ScheduledEntry {
    ready_cycle: u64,
    src_port_id: String,
}

pub struct RoutedSwitch {
    base: NodeBase,
    input_order: Vec<String>,
    output_order: Vec<String>,
    routing_table: HashMap<String, String>,
    processing_latency: u64,
    sched_queues: HashMap<String, VecDeque<ScheduledEntry>>,
}

impl RoutedSwitch {
    pub fn new(base: NodeBase, routing_table: HashMap<String, String>, processing_latency: u64) -> Self {
        Self {
            base,
            input_order: Vec::new(),
            output_order: Vec::new(),
            routing_table,
            processing_latency,
            sched_queues: HashMap::new(),
        }
    }

    /// Service phase: drain whichever output queue is ready, oldest entry
    /// first. Runs before the admission phase so a send committed this
    /// cycle can free up the output's credit before arrivals are scheduled.
    fn service_outputs(&mut self, current_cycle: u64) -> SimResult<()> {
        for out_id in self.output_order.clone() {
            let has_ready_head = self
                .sched_queues
                .get(&out_id)
                .and_then(|q| q.front())
                .is_some_and(|entry| entry.ready_cycle <= current_cycle);
            if !has_ready_head {
                continue;
            }
            if self.base.output_credit(&out_id).unwrap_or(0) == 0 {
                continue;
            }

            let entry = self.sched_queues.get_mut(&out_id).unwrap().pop_front().unwrap();
            let Some(packet) = self.base.recv_pkt(&entry.src_port_id, current_cycle) else {
                continue;
            };
            match self.base.send_pkt(&out_id, packet, current_cycle) {
                Ok(()) => {}
                Err(SimError::AdmissionDenied) => {
                    self.base.log(
                        Level::Warning,
                        Some(current_cycle),
                        format_args!("{out_id}: credit vanished between admission and service"),
                    );
                }
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    /// Admission phase: peek each input, route it, and reserve a slot in
    /// the destination output's queue. Admission is refused unless the
    /// queue is empty or the new entry's ready cycle matches the current
    /// tail's — this lets every input that resolves to the same output in
    /// the same cycle batch into one "wavefront" while refusing to
    /// re-admit the same still-buffered head on a later cycle (its ready
    /// cycle will have moved on and no longer match the tail).
    fn admit_arrivals(&mut self, current_cycle: u64) -> SimResult<()> {
        for src_id in self.input_order.clone() {
            let Some(packet) = self.base.peek_pkt(&src_id) else {
                continue;
            };
            let destination = packet.destination.clone().ok_or_else(|| {
                SimError::InvariantViolation(format!(
                    "{}: packet {} has no destination to route by",
                    self.base.id, packet.id
                ))
            })?;
            let out_id = self.routing_table.get(&destination).cloned().ok_or_else(|| {
                SimError::InvariantViolation(format!(
                    "{}: no route to destination '{destination}'",
                    self.base.id
                ))
            })?;

            let new_ready_cycle = current_cycle + self.processing_latency;
            let queue = self.sched_queues.entry(out_id).or_default();
            let admit = match queue.back() {
                None => true,
                Some(tail) => tail.ready_cycle == new_ready_cycle,
            };
            if admit {
                queue.push_back(ScheduledEntry {
                    ready_cycle: new_ready_cycle,
                    src_port_id: src_id,
                });
            }
        }
        Ok(())
    }
}

impl Node for RoutedSwitch {
    fn id(&self) -> &str {
        &self.base.id
    }

    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    /// Captures scan orders and seeds one scheduling queue per output.
    /// Runs once, after the simulator has wired every connection.
    fn setup(&mut self) -> SimResult<()> {
        self.input_order = self.base.input_port_ids().to_vec();
        self.output_order = self.base.output_port_ids().to_vec();
        self.sched_queues = self
            .output_order
            .iter()
            .map(|id| (id.clone(), VecDeque::new()))
            .collect();
        Ok(())
    }

    fn advance(&mut self, current_cycle: u64) -> SimResult<()> {
        self.service_outputs(current_cycle)?;
        self.admit_arrivals(current_cycle)
    }
}
