// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::binding::{Binding, BindingSet, Origin};
use crate::config::consts::KEY_PREFIX;
use crate::observability::messages::project::BindingsLoaded;
use crate::observability::messages::StructuredLog;
use std::collections::BTreeMap;

const ENV_SOURCE: &str = "env";

/// Bindings declared as `CFG__*` variables in the process environment.
pub fn bindings_from_env() -> BindingSet {
    bindings_from_vars(std::env::vars())
}

/// Pick the `CFG__*` entries out of `vars`.
///
/// The environment has no declaration order, so bindings come out sorted by key.
pub fn bindings_from_vars<I>(vars: I) -> BindingSet
where
    I: IntoIterator<Item = (String, String)>,
{
    let selected: BTreeMap<String, String> = vars
        .into_iter()
        .filter(|(key, _)| key.starts_with(KEY_PREFIX))
        .collect();

    let bindings: BindingSet = selected
        .into_iter()
        .map(|(key, value)| Binding::new(key, value).with_origin(Origin::new(ENV_SOURCE)))
        .collect::<Vec<_>>()
        .into();

    BindingsLoaded {
        source: ENV_SOURCE,
        binding_count: bindings.len(),
    }
    .log();
    bindings
}
