// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Credit-gated send/receive endpoints bound to one end of a [`Link`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::link::Link;
use crate::packet::Packet;
use crate::types::{SimError, SimResult};

/// The receiving end of a link: a bounded FIFO that returns a credit for
/// every packet it drains.
pub struct InputPort {
    pub id: String,
    capacity: u32,
    fifo: VecDeque<Packet>,
    link: Rc<RefCell<Link>>,
}

impl fmt::Display for InputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputPort({})", self.id)
    }
}

impl InputPort {
    #[must_use]
    pub fn new(id: impl Into<String>, capacity: u32, link: Rc<RefCell<Link>>) -> Self {
        Self {
            id: id.into(),
            capacity,
            fifo: VecDeque::with_capacity(capacity as usize),
            link,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fifo.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fifo.is_empty()
    }

    /// Called by the owning [`Link`] on delivery. Appends to the FIFO if
    /// there is room; otherwise the packet is dropped. Under correct
    /// caller discipline (credit conservation, invariant 3 of the data
    /// model) this branch is unreachable.
    pub fn push_pkt(&mut self, packet: Packet) {
        if self.fifo.len() < self.capacity as usize {
            self.fifo.push_back(packet);
        } else {
            log::warn!(target: "netfab", "{self}: dropping {packet}, fifo at capacity {}", self.capacity);
        }
    }

    /// Non-destructive inspection of the FIFO head, used by switch-style
    /// arbitration to decide routing before committing to a pop.
    #[must_use]
    pub fn peek(&self) -> Option<&Packet> {
        self.fifo.front()
    }

    /// Pop the FIFO head, but only once a credit return for it has been
    /// successfully enqueued on the link. If the credit pipeline is
    /// saturated, the packet stays buffered and `None` is returned.
    pub fn pop_pkt(&mut self, current_cycle: u64) -> Option<Packet> {
        if self.fifo.is_empty() {
            return None;
        }
        if self.link.borrow_mut().push_credit(current_cycle).is_err() {
            return None;
        }
        self.fifo.pop_front()
    }
}

/// The sending end of a link: a credit counter gating admission into the
/// link's data pipeline.
pub struct OutputPort {
    pub id: String,
    credit: u32,
    capacity: u32,
    last_send_cycle: Option<u64>,
    link: Rc<RefCell<Link>>,
}

impl fmt::Display for OutputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputPort({})", self.id)
    }
}

impl OutputPort {
    /// `remote_capacity` is the paired input port's FIFO capacity: initial
    /// credit always starts fully granted (invariant 3 of the data model).
    #[must_use]
    pub fn new(id: impl Into<String>, remote_capacity: u32, link: Rc<RefCell<Link>>) -> Self {
        Self {
            id: id.into(),
            credit: remote_capacity,
            capacity: remote_capacity,
            last_send_cycle: None,
            link,
        }
    }

    #[must_use]
    pub fn get_credit(&self) -> u32 {
        self.credit
    }

    #[must_use]
    pub fn last_send_cycle(&self) -> Option<u64> {
        self.last_send_cycle
    }

    /// Admit `packet` into the link, debiting one credit. Fails with
    /// `AdmissionDenied` if there is no credit, or if the link's data
    /// pipeline happens to be saturated (folding `PipelineFull` into the
    /// same observable outcome a node sees).
    pub fn push_pkt(&mut self, packet: Packet, current_cycle: u64) -> SimResult<()> {
        if self.credit == 0 {
            return Err(SimError::AdmissionDenied);
        }
        self.link
            .borrow_mut()
            .push_data(packet, current_cycle)
            .map_err(|_| SimError::AdmissionDenied)?;
        self.credit -= 1;
        self.last_send_cycle = Some(current_cycle);
        Ok(())
    }

    /// Called by the owning [`Link`] when a credit return is delivered.
    pub fn receive_credit(&mut self) {
        if self.credit < self.capacity {
            self.credit += 1;
        }
    }
}
