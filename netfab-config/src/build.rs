// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Assembles a ready-to-run [`Simulator`] from the nodes/connections CSV
//! tables: load, validate, instantiate every node through the registry,
//! then wire each connection's link and ports onto the two endpoint nodes.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use netfab_engine::link::Link;
use netfab_engine::port::{InputPort, OutputPort};
use netfab_engine::simulator::Simulator;
use netfab_engine::types::{SimError, SimResult};
use netfab_track::Tracker;

use crate::loader::{load_connections, load_nodes};
use crate::registry::Registry;
use crate::validate::validate;

pub fn build_simulator(
    nodes_path: impl AsRef<Path>,
    connections_path: impl AsRef<Path>,
    max_cycles: u64,
    registry: &Registry,
    tracker: Tracker,
) -> SimResult<Simulator> {
    let nodes = load_nodes(nodes_path)?;
    let connections = load_connections(connections_path)?;
    validate(&nodes, &connections)?;

    let mut sim = Simulator::new(max_cycles, tracker.clone());
    for spec in &nodes {
        let node = registry.build(spec, tracker.clone())?;
        sim.register_node(node);
    }

    for conn in &connections {
        let link = Rc::new(RefCell::new(Link::new(conn.link_id(), conn.latency)?));
        let input = Rc::new(RefCell::new(InputPort::new(
            conn.dst_port.clone(),
            conn.fifo_size,
            link.clone(),
        )));
        let output = Rc::new(RefCell::new(OutputPort::new(
            conn.src_port.clone(),
            conn.credit,
            link.clone(),
        )));
        link.borrow_mut().bind(&input, &output);

        let src = sim.node_mut(&conn.src_node).ok_or_else(|| {
            SimError::Configuration(format!("unknown src node '{}'", conn.src_node))
        })?;
        src.base_mut().add_output_port(conn.src_port.clone(), output)?;

        let dst = sim.node_mut(&conn.dst_node).ok_or_else(|| {
            SimError::Configuration(format!("unknown dst node '{}'", conn.dst_node))
        })?;
        dst.base_mut().add_input_port(conn.dst_port.clone(), input)?;

        sim.register_link(link);
    }

    Ok(sim)
}
