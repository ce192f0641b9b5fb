// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! A static replacement for the source's `importlib`-based dynamic node
//! loading: a process-wide lookup from `(module, class)` to a factory that
//! builds a fresh node. Concrete kinds register themselves; the registry
//! itself knows nothing about what exists.

use std::collections::HashMap;

use netfab_engine::node::{Node, NodeBase};
use netfab_engine::types::{SimError, SimResult};
use netfab_track::Tracker;

use crate::spec::NodeSpec;

type Factory = Box<dyn Fn(NodeBase, &NodeSpec) -> SimResult<Box<dyn Node>>>;

#[derive(Default)]
pub struct Registry {
    factories: HashMap<(String, String), Factory>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers a factory under `(module, class)`. A later registration
    /// under the same key replaces the earlier one, matching the source's
    /// last-import-wins module resolution.
    pub fn register(
        &mut self,
        module: impl Into<String>,
        class: impl Into<String>,
        factory: impl Fn(NodeBase, &NodeSpec) -> SimResult<Box<dyn Node>> + 'static,
    ) {
        self.factories
            .insert((module.into(), class.into()), Box::new(factory));
    }

    pub fn build(&self, spec: &NodeSpec, tracker: Tracker) -> SimResult<Box<dyn Node>> {
        let key = (spec.module.clone(), spec.class.clone());
        let factory = self.factories.get(&key).ok_or_else(|| {
            SimError::Configuration(format!(
                "no registered node kind for module '{}' class '{}'",
                spec.module, spec.class
            ))
        })?;
        let base = NodeBase::new(spec.node_id.clone(), tracker);
        factory(base, spec)
    }
}
