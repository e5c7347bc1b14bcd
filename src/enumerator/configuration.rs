// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::binding::Binding;
use crate::errors::EnumerationError;
use serde::Serialize;

/// One resolved build variant of a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub generator: String,
    /// `None` for the default configuration
    pub suffix: Option<String>,
    /// `<generator>` or `<generator>_<suffix>`
    pub artifact: String,
    pub target: String,
    /// Parameters with the `target=` token stripped
    pub params: String,
    /// False for the implicit default that no binding declared
    pub declared: bool,
}

impl Configuration {
    pub fn is_default(&self) -> bool {
        self.suffix.is_none()
    }
}

/// All configurations of one generator, default first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorGroup {
    pub generator: String,
    pub configurations: Vec<Configuration>,
}

impl GeneratorGroup {
    pub fn default_configuration(&self) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.is_default())
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &str> {
        self.configurations.iter().map(|c| c.artifact.as_str())
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}

/// A binding skipped in lenient mode, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedBinding {
    pub binding: Binding,
    pub error: EnumerationError,
}

/// The result of one enumeration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Enumeration {
    /// Generators in order of first appearance
    pub groups: Vec<GeneratorGroup>,
    #[serde(skip)]
    pub rejected: Vec<RejectedBinding>,
}

impl Enumeration {
    pub fn group(&self, generator: &str) -> Option<&GeneratorGroup> {
        self.groups.iter().find(|g| g.generator == generator)
    }

    /// Every configuration of every generator, in output order.
    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.groups.iter().flat_map(|g| g.configurations.iter())
    }

    pub fn generator_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.generator.as_str())
    }

    pub fn configuration_count(&self) -> usize {
        self.groups.iter().map(GeneratorGroup::len).sum()
    }

    /// False when lenient mode skipped any binding.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}
