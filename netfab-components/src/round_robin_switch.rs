// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Round-robin switch with a fixed processing-latency pipeline.
//!
//! Each cycle scans the input ports starting from the last granted index,
//! selects the first one with a packet to receive (aborting the scan as
//! soon as the single output has no credit left), and places the received
//! packet into a processing pipeline that releases it `processing_latency`
//! cycles later.

use std::collections::VecDeque;

use netfab_engine::node::{Node, NodeBase};
use netfab_engine::packet::Packet;
use netfab_engine::types::{SimError, SimResult};
use netfab_track::Level;

struct PipelineEntry {
    ready_cycle: u64,
    packet: Packet,
}

pub struct RoundRobinSwitch {
    base: NodeBase,
    input_order: Vec<String>,
    output_port_id: String,
    processing_latency: u64,
    rr_index: usize,
    pipeline: VecDeque<PipelineEntry>,
}

impl RoundRobinSwitch {
    pub fn new(base: NodeBase, processing_latency: u64) -> Self {
        Self {
            base,
            input_order: Vec::new(),
            output_port_id: String::new(),
            processing_latency,
            rr_index: 0,
            pipeline: VecDeque::new(),
        }
    }

    fn scan_inputs(&mut self, current_cycle: u64) {
        let n = self.input_order.len();
        if n == 0 {
            return;
        }
        for offset in 0..n {
            let idx = (self.rr_index + offset) % n;
            match self.base.output_credit(&self.output_port_id) {
                Some(0) | None => break,
                Some(_) => {}
            }
            let port_id = self.input_order[idx].clone();
            if let Some(packet) = self.base.recv_pkt(&port_id, current_cycle) {
                self.pipeline.push_back(PipelineEntry {
                    ready_cycle: current_cycle + self.processing_latency,
                    packet,
                });
                self.rr_index = (idx + 1) % n;
                break;
            }
        }
    }

    /// Service the pipeline head at its exact ready cycle.
    ///
    /// The ready-cycle check is strict equality, not `<=`: a send failure
    /// right on the ready cycle is logged and the packet is dropped rather
    /// than retried, matching the reference switch this component is
    /// modelled on (it never re-queues a failed send).
    fn service_pipeline(&mut self, current_cycle: u64) -> SimResult<()> {
        let ready = matches!(self.pipeline.front(), Some(e) if e.ready_cycle == current_cycle);
        if !ready {
            return Ok(());
        }
        let entry = self.pipeline.pop_front().unwrap();
        match self.base.send_pkt(&self.output_port_id, entry.packet, current_cycle) {
            Ok(()) => Ok(()),
            Err(SimError::AdmissionDenied) => {
                self.base.log(
                    Level::Error,
                    Some(current_cycle),
                    format_args!("dropped packet: output had no credit on its exact ready cycle"),
                );
                Ok(())
            }
            Err(other) => Err(other),
        }
    }
}

impl Node for RoundRobinSwitch {
    fn id(&self) -> &str {
        &self.base.id
    }

    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    /// Captures the input scan order and the sole output port. Runs once,
    /// after the simulator has wired every connection, so `NodeBase`'s port
    /// maps are already final.
    fn setup(&mut self) -> SimResult<()> {
        self.input_order = self.base.input_port_ids().to_vec();
        self.output_port_id = match self.base.output_port_ids() {
            [single] => single.clone(),
            other => {
                return Err(SimError::InvariantViolation(format!(
                    "{}: round-robin switch needs exactly one output port, found {}",
                    self.base.id,
                    other.len()
                )));
            }
        };
        Ok(())
    }

    fn advance(&mut self, current_cycle: u64) -> SimResult<()> {
        self.scan_inputs(current_cycle);
        self.service_pipeline(current_cycle)
    }
}
