// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::rc::Rc;

use netfab_components::{Consumer, Pattern, Producer, RoundRobinSwitch};
use netfab_engine::node::NodeBase;
use netfab_engine::port::{InputPort, OutputPort};
use netfab_engine::{Link, Simulator};
use netfab_track::Tracker;

fn link(id: &str, latency: u32, capacity: u32) -> (
    Rc<RefCell<Link>>,
    Rc<RefCell<InputPort>>,
    Rc<RefCell<OutputPort>>,
) {
    let link = Rc::new(RefCell::new(Link::new(id, latency).unwrap()));
    let input = Rc::new(RefCell::new(InputPort::new("in", capacity, link.clone())));
    let output = Rc::new(RefCell::new(OutputPort::new("out", capacity, link.clone())));
    link.borrow_mut().bind(&input, &output);
    (link, input, output)
}

/// Three producers feeding one round-robin switch feeding one consumer.
/// Every input always has a packet ready, so once the processing pipeline
/// has warmed up the switch should be serving close to one packet per
/// cycle, rotating fairly across the three producers.
#[test]
fn round_robin_switch_serves_three_producers_fairly() {
    let mut sim = Simulator::new(30, Tracker::off());

    let mut switch_base = NodeBase::new("sw", Tracker::off());

    for (idx, name) in ["a0", "a1", "a2"].iter().enumerate() {
        let (l, input, output) = link(&format!("l_in{idx}"), 1, 4);
        let mut producer_base = NodeBase::new(*name, Tracker::off());
        producer_base.add_output_port("tx", output).unwrap();
        switch_base
            .add_input_port(format!("in{idx}"), input)
            .unwrap();
        sim.register_link(l);
        sim.register_node(Box::new(Producer::new(producer_base, Pattern::EveryCycle)));
    }

    let (l_out, sw_in, sw_out) = link("l_out", 1, 4);
    switch_base.add_output_port("out", sw_out).unwrap();
    sim.register_link(l_out);

    let switch = RoundRobinSwitch::new(switch_base, 2);
    sim.register_node(Box::new(switch));

    let mut consumer_base = NodeBase::new("c0", Tracker::off());
    consumer_base.add_input_port("rx", sw_in).unwrap();
    sim.register_node(Box::new(Consumer::new(consumer_base)));

    sim.setup().unwrap();
    sim.run().unwrap();
    sim.teardown().unwrap();

    let received = sim
        .node("c0")
        .unwrap()
        .base()
        .stats
        .get_counter("pkts_received")
        .unwrap();
    assert!(
        received >= 20,
        "expected steady near-full-rate service, got {received}"
    );
}
