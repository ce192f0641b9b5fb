// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Registers the reference node kinds shipped in `netfab-components` under
//! the `(module, class)` pairs a nodes table is expected to name them by.

use std::collections::HashMap;

use netfab_components::{Consumer, Pattern, Producer, RoundRobinSwitch, RoutedSwitch};
use netfab_engine::types::{SimError, SimResult};

use crate::registry::Registry;

/// Parses a `key:value` pair out of one comma-separated segment.
fn parse_latency(segment: &str, kind: &str) -> SimResult<u64> {
    let (key, value) = segment.split_once(':').ok_or_else(|| {
        SimError::Configuration(format!("{kind} pattern_params segment '{segment}' is not key:value"))
    })?;
    if key != "latency" {
        return Err(SimError::Configuration(format!(
            "{kind} pattern_params expected a leading 'latency:N' segment, got '{segment}'"
        )));
    }
    value
        .parse::<u64>()
        .map_err(|_| SimError::Configuration(format!("{kind}: latency '{value}' is not an integer")))
}

/// Registers the four reference kinds. Call once before any topology is
/// loaded; `Registry::build` fails fast for anything not registered here.
pub fn register_builtins(registry: &mut Registry) {
    registry.register("netfab.components", "Producer", |base, spec| {
        let pattern = Pattern::parse(spec.pattern.as_deref(), spec.pattern_params.as_deref())?;
        Ok(Box::new(Producer::new(base, pattern)))
    });

    registry.register("netfab.components", "Consumer", |base, _spec| {
        Ok(Box::new(Consumer::new(base)))
    });

    registry.register("netfab.components", "RoundRobinSwitch", |base, spec| {
        let params = spec.pattern_params.as_deref().ok_or_else(|| {
            SimError::Configuration(format!(
                "{}: RoundRobinSwitch requires pattern_params of the form 'latency:N'",
                base.id
            ))
        })?;
        let segment = params
            .split(',')
            .next()
            .ok_or_else(|| SimError::Configuration(format!("{}: empty pattern_params", base.id)))?;
        let latency = parse_latency(segment.trim(), "RoundRobinSwitch")?;
        Ok(Box::new(RoundRobinSwitch::new(base, latency)))
    });

    registry.register("netfab.components", "RoutedSwitch", |base, spec| {
        let params = spec.pattern_params.as_deref().ok_or_else(|| {
            SimError::Configuration(format!(
                "{}: RoutedSwitch requires pattern_params of the form 'latency:N,DEST:out_port,...'",
                base.id
            ))
        })?;
        let mut segments = params.split(',').map(str::trim);
        let latency_segment = segments
            .next()
            .ok_or_else(|| SimError::Configuration(format!("{}: empty pattern_params", base.id)))?;
        let latency = parse_latency(latency_segment, "RoutedSwitch")?;

        let mut routing_table = HashMap::new();
        for segment in segments {
            let (dest, out_port) = segment.split_once(':').ok_or_else(|| {
                SimError::Configuration(format!(
                    "{}: routing segment '{segment}' is not dest:out_port",
                    base.id
                ))
            })?;
            routing_table.insert(dest.to_string(), out_port.to_string());
        }
        Ok(Box::new(RoutedSwitch::new(base, routing_table, latency)))
    });
}
