// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! `netfab-engine` — the core of a cycle-accurate, credit-flow-controlled
//! network fabric simulator.
//!
//! A simulation is a directed graph of [`Node`](node::Node)s connected by
//! [`Link`](link::Link)s. Each [`Link`] is a fixed-latency pipeline with a
//! [`crate::port::InputPort`] at one end and an [`crate::port::OutputPort`]
//! at the other; admission onto the link is gated by credits that the
//! input port returns as it drains. The [`Simulator`](simulator::Simulator)
//! owns the whole graph and drives it one cycle at a time: all links
//! advance, then all nodes advance, in registration order, with no
//! suspension or blocking anywhere in that loop.

pub mod link;
pub mod node;
pub mod packet;
pub mod port;
pub mod simulator;
pub mod stats;
pub mod types;

pub use link::Link;
pub use node::{Node, NodeBase};
pub use packet::{CreditPacket, Packet};
pub use port::{InputPort, OutputPort};
pub use simulator::Simulator;
pub use stats::Stats;
pub use types::{SimError, SimResult};
