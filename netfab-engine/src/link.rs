// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! A fixed-latency point-to-point channel carrying data in one direction
//! and credits in the other.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::configuration_error;
use crate::packet::Packet;
use crate::port::{InputPort, OutputPort};
use crate::types::{SimError, SimResult};

/// Two independent bounded pipelines of depth `latency`: one carrying
/// [`Packet`]s downstream, one carrying credit returns upstream.
///
/// A [`Link`] is built once with its latency fixed, then [`bind`](Link::bind)
/// is called with the endpoints it connects. The endpoints are held weakly:
/// the owning nodes (via their port maps) hold the strong references, so a
/// link never keeps a node alive and there is no reference cycle between a
/// link and the ports it was bound to.
pub struct Link {
    pub id: String,
    pub latency: u32,
    data_pipeline: VecDeque<(Packet, u64)>,
    credit_pipeline: VecDeque<u64>,
    input: Weak<RefCell<InputPort>>,
    output: Weak<RefCell<OutputPort>>,
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({})", self.id)
    }
}

impl Link {
    pub fn new(id: impl Into<String>, latency: u32) -> SimResult<Self> {
        let id = id.into();
        if latency == 0 {
            return configuration_error!("link '{id}' must have latency >= 1, got 0");
        }
        Ok(Self {
            id,
            latency,
            data_pipeline: VecDeque::with_capacity(latency as usize),
            credit_pipeline: VecDeque::with_capacity(latency as usize),
            input: Weak::new(),
            output: Weak::new(),
        })
    }

    /// Bind the endpoints this link delivers to. Must be called once,
    /// during topology construction, before the cycle loop starts.
    pub fn bind(&mut self, input: &Rc<RefCell<InputPort>>, output: &Rc<RefCell<OutputPort>>) {
        self.input = Rc::downgrade(input);
        self.output = Rc::downgrade(output);
    }

    pub fn push_data(&mut self, packet: Packet, current_cycle: u64) -> SimResult<()> {
        if self.data_pipeline.len() == self.latency as usize {
            return Err(SimError::PipelineFull);
        }
        self.data_pipeline.push_back((packet, current_cycle));
        Ok(())
    }

    pub fn push_credit(&mut self, current_cycle: u64) -> SimResult<()> {
        if self.credit_pipeline.len() == self.latency as usize {
            return Err(SimError::PipelineFull);
        }
        self.credit_pipeline.push_back(current_cycle);
        Ok(())
    }

    #[must_use]
    pub fn data_in_flight(&self) -> usize {
        self.data_pipeline.len()
    }

    #[must_use]
    pub fn credit_in_flight(&self) -> usize {
        self.credit_pipeline.len()
    }

    /// Deliver whichever pipeline head has reached its destination this
    /// cycle. Delivery condition is strict equality, not `<=`: an entry
    /// enqueued at cycle `t` is delivered exactly at cycle `t + latency`.
    pub fn advance(&mut self, current_cycle: u64) {
        if let Some(&(_, enqueue_cycle)) = self.data_pipeline.front() {
            if enqueue_cycle + u64::from(self.latency) == current_cycle {
                let (packet, _) = self.data_pipeline.pop_front().unwrap();
                if let Some(input) = self.input.upgrade() {
                    input.borrow_mut().push_pkt(packet);
                }
            }
        }

        if let Some(&enqueue_cycle) = self.credit_pipeline.front() {
            if enqueue_cycle + u64::from(self.latency) == current_cycle {
                self.credit_pipeline.pop_front();
                if let Some(output) = self.output.upgrade() {
                    output.borrow_mut().receive_credit();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{InputPort, OutputPort};

    fn wire(latency: u32, capacity: u32) -> (Rc<RefCell<Link>>, Rc<RefCell<InputPort>>, Rc<RefCell<OutputPort>>) {
        let link = Rc::new(RefCell::new(Link::new("l0", latency).unwrap()));
        let input = Rc::new(RefCell::new(InputPort::new("ip0", capacity, link.clone())));
        let output = Rc::new(RefCell::new(OutputPort::new("op0", capacity, link.clone())));
        link.borrow_mut().bind(&input, &output);
        (link, input, output)
    }

    #[test]
    fn rejects_zero_latency() {
        assert!(Link::new("bad", 0).is_err());
    }

    #[test]
    fn delivers_at_exactly_enqueue_plus_latency() {
        let (link, input, _output) = wire(3, 2);
        link.borrow_mut()
            .push_data(Packet::new("p0"), 0)
            .unwrap();

        for cycle in 0..3 {
            link.borrow_mut().advance(cycle);
            assert!(input.borrow().peek().is_none(), "delivered early at cycle {cycle}");
        }
        link.borrow_mut().advance(3);
        assert_eq!(input.borrow().peek().unwrap().id, "p0");
    }

    #[test]
    fn pipeline_rejects_push_once_full() {
        let (link, _input, _output) = wire(2, 4);
        link.borrow_mut().push_data(Packet::new("a"), 0).unwrap();
        link.borrow_mut().push_data(Packet::new("b"), 1).unwrap();
        assert_eq!(
            link.borrow_mut().push_data(Packet::new("c"), 2),
            Err(SimError::PipelineFull)
        );
    }

    #[test]
    fn credit_round_trips_after_latency() {
        let (link, _input, output) = wire(2, 1);
        assert_eq!(output.borrow().get_credit(), 1);
        output
            .borrow_mut()
            .push_pkt(Packet::new("p0"), 0)
            .unwrap();
        assert_eq!(output.borrow().get_credit(), 0);

        link.borrow_mut().advance(2); // data delivered to input fifo
        assert!(link.borrow().credit_pipeline.is_empty());

        let popped = link
            .borrow()
            .input
            .upgrade()
            .unwrap()
            .borrow_mut()
            .pop_pkt(2);
        assert!(popped.is_some());

        link.borrow_mut().advance(4); // credit delivered back to output
        assert_eq!(output.borrow().get_credit(), 1);
    }
}
