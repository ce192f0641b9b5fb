// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::rc::Rc;

use netfab_components::{Consumer, Pattern, Producer};
use netfab_engine::node::NodeBase;
use netfab_engine::port::{InputPort, OutputPort};
use netfab_engine::{Link, Simulator};
use netfab_track::Tracker;

/// Burst of 3 packets then 3 idle cycles, against a link with latency 2 and
/// FIFO depth 2: the round trip for a credit (2*latency = 4 cycles) is
/// longer than the 3-cycle burst, so the first two sends succeed on initial
/// credit but the third is denied, and `pkts_failed` records it. Once the
/// consumer has drained and both credits return during the idle window,
/// the next burst succeeds in full.
#[test]
fn burst_pattern_overruns_small_fifo_then_recovers() {
    let link = Rc::new(RefCell::new(Link::new("l0", 2).unwrap()));
    let input = Rc::new(RefCell::new(InputPort::new("rx", 2, link.clone())));
    let output = Rc::new(RefCell::new(OutputPort::new("tx", 2, link.clone())));
    link.borrow_mut().bind(&input, &output);

    let mut producer_base = NodeBase::new("p0", Tracker::off());
    producer_base.add_output_port("tx", output).unwrap();
    let producer = Producer::new(producer_base, Pattern::Burst { count: 3, idle: 3 });

    let mut consumer_base = NodeBase::new("c0", Tracker::off());
    consumer_base.add_input_port("rx", input).unwrap();
    let consumer = Consumer::new(consumer_base);

    let mut sim = Simulator::new(12, Tracker::off());
    sim.register_link(link);
    sim.register_node(Box::new(producer));
    sim.register_node(Box::new(consumer));
    sim.setup().unwrap();
    sim.run().unwrap();
    sim.teardown().unwrap();

    let sent = sim.node("p0").unwrap().base().stats.get_counter("pkts_sent").unwrap();
    let failed = sim.node("p0").unwrap().base().stats.get_counter("pkts_failed").unwrap();
    // Two bursts fit in 12 cycles; each burst's 3rd attempt arrives before
    // the credit round trip (2*latency = 4 cycles) completes, so exactly
    // the first two of every three attempts succeed.
    assert_eq!(failed, 2, "expected the 3rd attempt of each burst to be denied, got {failed}");
    assert_eq!(sent, 4, "expected the first two attempts of each burst to succeed, got {sent}");
}
