// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Row types for the two CSV tables that describe a topology.

use serde::Deserialize;

/// One row of the nodes table.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub module: String,
    pub class: String,
    pub node_id: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub pattern_params: Option<String>,
}

/// One row of the connections table.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionSpec {
    pub src_node: String,
    pub src_port: String,
    pub dst_node: String,
    pub dst_port: String,
    pub credit: u32,
    pub fifo_size: u32,
    pub latency: u32,
}

impl ConnectionSpec {
    /// Deterministic id for the link this connection describes.
    #[must_use]
    pub fn link_id(&self) -> String {
        format!(
            "link_{}_{}_to_{}_{}",
            self.src_node, self.src_port, self.dst_node, self.dst_port
        )
    }
}
