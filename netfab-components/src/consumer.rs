// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! A single-input traffic sink.

use netfab_engine::node::{Node, NodeBase};
use netfab_engine::types::SimResult;
use netfab_track::Level;

const INPUT_PORT: &str = "rx";

pub struct Consumer {
    base: NodeBase,
}

impl Consumer {
    pub fn new(base: NodeBase) -> Self {
        Self { base }
    }
}

impl Node for Consumer {
    fn id(&self) -> &str {
        &self.base.id
    }

    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn setup(&mut self) -> SimResult<()> {
        self.base.stats.register_counter("pkts_received")
    }

    fn advance(&mut self, current_cycle: u64) -> SimResult<()> {
        if let Some(packet) = self.base.recv_pkt(INPUT_PORT, current_cycle) {
            self.base.stats.incr_counter("pkts_received", 1)?;
            self.base.log(
                Level::Info,
                Some(current_cycle),
                format_args!("received {packet}"),
            );
        }
        Ok(())
    }
}
