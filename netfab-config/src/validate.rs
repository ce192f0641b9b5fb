// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Pre-flight validation of a loaded topology, run before any node is
//! instantiated so a bad table never partially stands up a simulator.

use std::collections::HashSet;

use netfab_engine::types::{SimError, SimResult};

use crate::spec::{ConnectionSpec, NodeSpec};

pub fn validate(nodes: &[NodeSpec], connections: &[ConnectionSpec]) -> SimResult<()> {
    let mut seen_ids = HashSet::new();
    for node in nodes {
        if !seen_ids.insert(node.node_id.as_str()) {
            return Err(SimError::Configuration(format!(
                "duplicate node id '{}'",
                node.node_id
            )));
        }
    }

    let mut seen_link_ids = HashSet::new();
    for conn in connections {
        if conn.latency < 1 {
            return Err(SimError::Configuration(format!(
                "connection {} -> {}: latency must be >= 1",
                conn.src_node, conn.dst_node
            )));
        }
        if conn.fifo_size < 1 {
            return Err(SimError::Configuration(format!(
                "connection {} -> {}: fifo_size must be >= 1",
                conn.src_node, conn.dst_node
            )));
        }
        if conn.credit != conn.fifo_size {
            return Err(SimError::Configuration(format!(
                "connection {} -> {}: credit ({}) must equal fifo_size ({})",
                conn.src_node, conn.dst_node, conn.credit, conn.fifo_size
            )));
        }
        if !seen_ids.contains(conn.src_node.as_str()) {
            return Err(SimError::Configuration(format!(
                "connection references unknown node '{}'",
                conn.src_node
            )));
        }
        if !seen_ids.contains(conn.dst_node.as_str()) {
            return Err(SimError::Configuration(format!(
                "connection references unknown node '{}'",
                conn.dst_node
            )));
        }
        let link_id = conn.link_id();
        if !seen_link_ids.insert(link_id.clone()) {
            return Err(SimError::Configuration(format!(
                "duplicate link id '{link_id}'"
            )));
        }
    }

    Ok(())
}
