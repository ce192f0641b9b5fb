// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! The base contract shared by every concrete node kind.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use netfab_track::{Level, Tracker};

use crate::invariant_error;
use crate::packet::Packet;
use crate::port::{InputPort, OutputPort};
use crate::types::{SimError, SimResult};

/// A participant in the fabric: owns named ports and is driven once per
/// cycle by the [`Simulator`](crate::simulator::Simulator).
///
/// Concrete kinds (`Producer`, `Consumer`, the reference switches, or any
/// further kind registered through the kind registry) hold a [`NodeBase`]
/// and implement the cycle hook; the base supplies port bookkeeping, the
/// one-send-per-cycle invariant, and the stats/tracker façade.
pub trait Node {
    fn id(&self) -> &str;

    fn base(&self) -> &NodeBase;
    fn base_mut(&mut self) -> &mut NodeBase;

    fn setup(&mut self) -> SimResult<()> {
        Ok(())
    }

    fn advance(&mut self, current_cycle: u64) -> SimResult<()>;

    fn teardown(&mut self) -> SimResult<()> {
        Ok(())
    }
}

/// Shared state and helpers for a node: port maps, the one-send-per-cycle
/// invariant, and forwarders onto [`Stats`](crate::stats::Stats) and
/// [`Tracker`].
pub struct NodeBase {
    pub id: String,
    inputs: HashMap<String, Rc<RefCell<InputPort>>>,
    outputs: HashMap<String, Rc<RefCell<OutputPort>>>,
    input_order: Vec<String>,
    output_order: Vec<String>,
    last_send_cycle: Option<u64>,
    pub stats: crate::stats::Stats,
    pub tracker: Tracker,
}

impl NodeBase {
    #[must_use]
    pub fn new(id: impl Into<String>, tracker: Tracker) -> Self {
        Self {
            id: id.into(),
            inputs: HashMap::new(),
            outputs: HashMap::new(),
            input_order: Vec::new(),
            output_order: Vec::new(),
            last_send_cycle: None,
            stats: crate::stats::Stats::new(),
            tracker,
        }
    }

    pub fn add_input_port(&mut self, id: impl Into<String>, port: Rc<RefCell<InputPort>>) -> SimResult<()> {
        let id = id.into();
        if self.inputs.insert(id.clone(), port).is_some() {
            return invariant_error!("node '{}' already has input port '{id}'", self.id);
        }
        self.input_order.push(id);
        Ok(())
    }

    pub fn add_output_port(&mut self, id: impl Into<String>, port: Rc<RefCell<OutputPort>>) -> SimResult<()> {
        let id = id.into();
        if self.outputs.insert(id.clone(), port).is_some() {
            return invariant_error!("node '{}' already has output port '{id}'", self.id);
        }
        self.output_order.push(id);
        Ok(())
    }

    #[must_use]
    pub fn input_port(&self, id: &str) -> Option<&Rc<RefCell<InputPort>>> {
        self.inputs.get(id)
    }

    #[must_use]
    pub fn output_port(&self, id: &str) -> Option<&Rc<RefCell<OutputPort>>> {
        self.outputs.get(id)
    }

    /// Input port ids in the order they were registered (`add_input_port`
    /// call order), used by arbitration logic that needs a stable scan
    /// order for reproducibility.
    #[must_use]
    pub fn input_port_ids(&self) -> &[String] {
        &self.input_order
    }

    /// Output port ids in registration order.
    #[must_use]
    pub fn output_port_ids(&self) -> &[String] {
        &self.output_order
    }

    /// Current credit held by a named output port, used by arbitration
    /// logic to decide whether a send attempt is worth making.
    #[must_use]
    pub fn output_credit(&self, out_port_id: &str) -> Option<u32> {
        self.outputs.get(out_port_id).map(|p| p.borrow().get_credit())
    }

    /// Send on a named output port, enforcing that at most one send across
    /// all of this node's outputs happens per cycle (invariant 5 of the
    /// data model).
    pub fn send_pkt(&mut self, out_port_id: &str, packet: Packet, current_cycle: u64) -> SimResult<()> {
        if self.last_send_cycle == Some(current_cycle) {
            return Err(SimError::InvariantViolation(format!(
                "node '{}' attempted a second send at cycle {current_cycle}",
                self.id
            )));
        }
        let port = self
            .outputs
            .get(out_port_id)
            .ok_or_else(|| SimError::InvariantViolation(format!(
                "node '{}' has no output port '{out_port_id}'",
                self.id
            )))?;
        port.borrow_mut().push_pkt(packet, current_cycle)?;
        self.last_send_cycle = Some(current_cycle);
        Ok(())
    }

    /// Receive (pop + implicitly credit) from a named input port.
    #[must_use]
    pub fn recv_pkt(&self, in_port_id: &str, current_cycle: u64) -> Option<Packet> {
        self.inputs.get(in_port_id)?.borrow_mut().pop_pkt(current_cycle)
    }

    /// Non-destructive inspection of a named input port's head.
    #[must_use]
    pub fn peek_pkt(&self, in_port_id: &str) -> Option<Packet> {
        self.inputs.get(in_port_id)?.borrow().peek().cloned()
    }

    pub fn log(&self, level: Level, current_cycle: Option<u64>, args: std::fmt::Arguments<'_>) {
        self.tracker.log(&self.id, level, current_cycle, args);
    }
}
