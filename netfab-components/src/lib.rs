// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Reference node kinds built on top of `netfab-engine`: a traffic
//! producer and consumer, and the two reference switch disciplines.

pub mod consumer;
pub mod producer;
pub mod round_robin_switch;
pub mod routed_switch;

pub use consumer::Consumer;
pub use producer::{Pattern, Producer};
pub use round_robin_switch::RoundRobinSwitch;
pub use routed_switch::RoutedSwitch;
