// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::TARGET_TOKEN;
use crate::errors::ValueError;

/// The typed form of a binding value: `[target=<T>] <PARAMS...>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BindingValue {
    target: Option<String>,
    params: String,
}

impl BindingValue {
    /// Split a raw value into its optional explicit target and the residual parameters.
    ///
    /// Only a *leading* `target=` token is recognised; anywhere else it is an ordinary
    /// parameter handed through to the generator.
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        let trimmed = raw.trim();
        let (first, rest) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));

        match first.strip_prefix(TARGET_TOKEN) {
            Some("") => Err(ValueError::EmptyTarget),
            Some(target) => Ok(Self {
                target: Some(target.to_string()),
                params: normalize(rest),
            }),
            None => Ok(Self {
                target: None,
                params: normalize(trimmed),
            }),
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn params(&self) -> &str {
        &self.params
    }

    /// True when the value was declared empty.
    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.params.is_empty()
    }
}

/// Parameters separated by single spaces.
fn normalize(params: &str) -> String {
    params.split_whitespace().collect::<Vec<_>>().join(" ")
}
