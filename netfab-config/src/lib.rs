// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! CSV topology loading, validation, and the node-kind registry that
//! stands up a [`netfab_engine::Simulator`] from two tables on disk.

pub mod build;
pub mod builtins;
pub mod loader;
pub mod registry;
pub mod spec;
pub mod validate;

pub use build::build_simulator;
pub use builtins::register_builtins;
pub use registry::Registry;
pub use spec::{ConnectionSpec, NodeSpec};
