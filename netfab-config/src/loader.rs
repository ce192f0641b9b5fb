// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Reads the nodes and connections CSV tables from disk.

use std::path::Path;

use netfab_engine::types::{SimError, SimResult};

use crate::spec::{ConnectionSpec, NodeSpec};

pub fn load_nodes(path: impl AsRef<Path>) -> SimResult<Vec<NodeSpec>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        SimError::Configuration(format!("failed to read nodes table {}: {e}", path.display()))
    })?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: NodeSpec = record.map_err(|e| {
            SimError::Configuration(format!("malformed row in nodes table {}: {e}", path.display()))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn load_connections(path: impl AsRef<Path>) -> SimResult<Vec<ConnectionSpec>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        SimError::Configuration(format!(
            "failed to read connections table {}: {e}",
            path.display()
        ))
    })?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: ConnectionSpec = record.map_err(|e| {
            SimError::Configuration(format!(
                "malformed row in connections table {}: {e}",
                path.display()
            ))
        })?;
        rows.push(row);
    }
    Ok(rows)
}
