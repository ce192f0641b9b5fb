// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Module-name scope filtering, equivalent to the reference backend's
//! `ModuleFilter(logging.Filter)`.

use std::sync::Arc;

/// An allow-list of scope names, or the unfiltered wildcard.
///
/// A record's scope is allowed if it contains any of the configured names
/// as a substring (matching the reference filter's `any(mod in record.name
/// for mod in allowed_modules)`), or if the list is `All`.
#[derive(Debug, Clone)]
pub enum Scopes {
    All,
    Named(Arc<Vec<String>>),
}

impl Scopes {
    #[must_use]
    pub fn all() -> Self {
        Scopes::All
    }

    /// Parse a comma-separated scope list from the CLI. The literal `all`
    /// (case-insensitive, optionally alongside other names) disables
    /// filtering entirely, matching the reference default.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let names: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() || names.iter().any(|n| n.eq_ignore_ascii_case("all")) {
            return Scopes::All;
        }
        Scopes::Named(Arc::new(names))
    }

    #[must_use]
    pub fn allows(&self, scope: &str) -> bool {
        match self {
            Scopes::All => true,
            Scopes::Named(names) => names.iter().any(|n| scope.contains(n.as_str())),
        }
    }
}
