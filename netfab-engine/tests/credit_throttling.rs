// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::rc::Rc;

use netfab_engine::node::NodeBase;
use netfab_engine::packet::Packet;
use netfab_engine::port::{InputPort, OutputPort};
use netfab_engine::types::SimResult;
use netfab_engine::{Link, Node, Simulator};
use netfab_track::Tracker;

struct CountingProducer {
    base: NodeBase,
    sent: Rc<RefCell<u32>>,
}

impl Node for CountingProducer {
    fn id(&self) -> &str {
        &self.base.id
    }
    fn base(&self) -> &NodeBase {
        &self.base
    }
    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
    fn advance(&mut self, current_cycle: u64) -> SimResult<()> {
        if self
            .base
            .send_pkt("tx", Packet::new(format!("p{current_cycle}")), current_cycle)
            .is_ok()
        {
            *self.sent.borrow_mut() += 1;
        }
        Ok(())
    }
}

struct CountingConsumer {
    base: NodeBase,
    received: Rc<RefCell<u32>>,
}

impl Node for CountingConsumer {
    fn id(&self) -> &str {
        &self.base.id
    }
    fn base(&self) -> &NodeBase {
        &self.base
    }
    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
    fn advance(&mut self, current_cycle: u64) -> SimResult<()> {
        if self.base.recv_pkt("rx", current_cycle).is_some() {
            *self.received.borrow_mut() += 1;
        }
        Ok(())
    }
}

/// With latency L=2 and a single credit (F=1), a producer attempting a
/// send every cycle is throttled to one success per round trip: send,
/// deliver, pop+credit-return, receive-credit, each taking L cycles, for a
/// steady-state cadence of one success per 2L = 4 cycles.
#[test]
fn single_credit_throttles_to_one_send_per_round_trip() {
    let link = Rc::new(RefCell::new(Link::new("l0", 2).unwrap()));
    let input = Rc::new(RefCell::new(InputPort::new("rx", 1, link.clone())));
    let output = Rc::new(RefCell::new(OutputPort::new("tx", 1, link.clone())));
    link.borrow_mut().bind(&input, &output);

    let sent = Rc::new(RefCell::new(0));
    let received = Rc::new(RefCell::new(0));

    let mut producer_base = NodeBase::new("producer", Tracker::off());
    producer_base.add_output_port("tx", output).unwrap();
    let producer = CountingProducer {
        base: producer_base,
        sent: sent.clone(),
    };

    let mut consumer_base = NodeBase::new("consumer", Tracker::off());
    consumer_base.add_input_port("rx", input).unwrap();
    let consumer = CountingConsumer {
        base: consumer_base,
        received: received.clone(),
    };

    let mut sim = Simulator::new(16, Tracker::off());
    sim.register_link(link);
    sim.register_node(Box::new(producer));
    sim.register_node(Box::new(consumer));
    sim.setup().unwrap();
    sim.run().unwrap();
    sim.teardown().unwrap();

    // Sends succeed at cycles 0, 4, 8, 12: four successes in 16 cycles.
    assert_eq!(*sent.borrow(), 4);
    assert_eq!(*received.borrow(), 4);
}
