// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The enumeration pass: bindings in, per-generator configurations out.
//!
//! The pass runs in two stages:
//!
//! 1. **Collection**: every binding is tokenized into a [`BindingKey`] and a
//!    [`BindingValue`] and filed under its generator. Binding-local failures
//!    follow the [`KeyPolicy`]; conflicting re-declarations always abort.
//! 2. **Resolution**: each generator's declarations become [`Configuration`]s.
//!    The default configuration comes first, followed by suffixed ones in
//!    declaration order, and targets are resolved against the default target.
//!
//! No build can start from a failed pass, and a lenient pass that skipped
//! bindings says so through [`Enumeration::is_complete`].

use super::configuration::{Configuration, Enumeration, GeneratorGroup, RejectedBinding};
use super::options::{EnumerateOptions, KeyPolicy};
use crate::binding::{Binding, BindingKey, BindingSet, BindingValue, Origin};
use crate::errors::EnumerationError;
use crate::observability::messages::enumeration::{
    BindingRejected, DefaultConfigurationSuppressed, EnumerationCompleted, EnumerationStarted,
    RedeclarationIgnored,
};
use crate::observability::messages::{StructuredLog, StructuredSpan};
use std::collections::{HashMap, HashSet};

/// Derives generator configurations from a binding snapshot.
///
/// The enumerator holds no state between passes; the same bindings and
/// options always produce the same output.
///
/// # Example
/// ```
/// use hlgen::binding::BindingSet;
/// use hlgen::enumerator::{EnumerateOptions, Enumerator};
///
/// let bindings = BindingSet::from(vec![("CFG__foo__bar", "target=x P1 P2")]);
/// let enumerator = Enumerator::new(EnumerateOptions::new().with_default_target("host"));
/// let enumeration = enumerator.enumerate(&bindings).unwrap();
///
/// let foo = enumeration.group("foo").unwrap();
/// let artifacts: Vec<&str> = foo.artifacts().collect();
/// assert_eq!(artifacts, vec!["foo", "foo_bar"]);
/// assert_eq!(foo.configurations[1].target, "x");
/// assert_eq!(foo.configurations[1].params, "P1 P2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Enumerator {
    options: EnumerateOptions,
}

/// A binding that passed tokenization.
struct Declaration {
    key: BindingKey,
    raw_key: String,
    raw_value: String,
    value: BindingValue,
    origin: Option<Origin>,
}

/// Everything declared for one generator.
#[derive(Default)]
struct GeneratorDeclarations {
    bare: Option<Declaration>,
    suffixed: Vec<Declaration>,
}

impl GeneratorDeclarations {
    fn find(&self, key: &BindingKey) -> Option<&Declaration> {
        match key.suffix() {
            None => self.bare.as_ref(),
            Some(suffix) => self.suffixed.iter().find(|d| d.key.suffix() == Some(suffix)),
        }
    }

    fn insert(&mut self, declaration: Declaration) {
        if declaration.key.is_default() {
            self.bare = Some(declaration);
        } else {
            self.suffixed.push(declaration);
        }
    }
}

impl Enumerator {
    pub fn new(options: EnumerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EnumerateOptions {
        &self.options
    }

    /// Run one enumeration pass over `bindings`.
    ///
    /// # Errors
    /// * `MalformedKey`, `MalformedValue`, `UnknownGenerator` in strict mode
    /// * `DuplicateConfiguration` when a configuration is re-declared with a different value
    /// * `MissingDefaultTarget` when a configuration needs the default target and none is set
    pub fn enumerate(&self, bindings: &BindingSet) -> Result<Enumeration, EnumerationError> {
        let policy = self.options.policy.to_string();
        let started = EnumerationStarted {
            binding_count: bindings.len(),
            policy: &policy,
            default_target: self.options.default_target.as_deref(),
        };
        started.log();
        let _span = started.span("enumeration").entered();

        let known: Option<HashSet<&str>> = self
            .options
            .known_generators
            .as_ref()
            .map(|names| names.iter().map(String::as_str).collect());

        let mut order: Vec<String> = Vec::new();
        let mut declarations: HashMap<String, GeneratorDeclarations> = HashMap::new();
        let mut rejected = Vec::new();

        for binding in bindings {
            let declaration = match self.tokenize(binding, known.as_ref()) {
                Ok(declaration) => declaration,
                Err(error) => {
                    self.reject(binding, error, &mut rejected)?;
                    continue;
                }
            };

            let generator = declaration.key.generator().to_string();
            let entry = declarations.entry(generator.clone()).or_insert_with(|| {
                order.push(generator);
                GeneratorDeclarations::default()
            });

            if let Some(existing) = entry.find(&declaration.key) {
                if existing.value == declaration.value {
                    RedeclarationIgnored {
                        key: &declaration.raw_key,
                    }
                    .log();
                    continue;
                }
                return Err(EnumerationError::DuplicateConfiguration {
                    key: declaration.key.to_string(),
                    first: existing.raw_value.clone(),
                    second: declaration.raw_value,
                    origin: declaration.origin,
                });
            }
            entry.insert(declaration);
        }

        if let Some(names) = &self.options.known_generators {
            for name in names {
                if !declarations.contains_key(name) {
                    declarations.insert(name.clone(), GeneratorDeclarations::default());
                    order.push(name.clone());
                }
            }
        }

        let mut groups = Vec::with_capacity(order.len());
        for generator in order {
            let declared = declarations.remove(&generator).unwrap_or_default();
            groups.push(self.resolve(generator, declared)?);
        }

        let enumeration = Enumeration { groups, rejected };
        EnumerationCompleted {
            generator_count: enumeration.groups.len(),
            configuration_count: enumeration.configuration_count(),
            rejected_count: enumeration.rejected.len(),
        }
        .log();
        Ok(enumeration)
    }

    fn tokenize(
        &self,
        binding: &Binding,
        known: Option<&HashSet<&str>>,
    ) -> Result<Declaration, EnumerationError> {
        let key = BindingKey::parse(&binding.key).map_err(|reason| {
            EnumerationError::MalformedKey {
                key: binding.key.clone(),
                reason,
                origin: binding.origin.clone(),
            }
        })?;

        if let Some(known) = known {
            if !known.contains(key.generator()) {
                return Err(EnumerationError::UnknownGenerator {
                    key: binding.key.clone(),
                    generator: key.generator().to_string(),
                    origin: binding.origin.clone(),
                });
            }
        }

        let value = BindingValue::parse(&binding.value).map_err(|reason| {
            EnumerationError::MalformedValue {
                key: binding.key.clone(),
                value: binding.value.clone(),
                reason,
                origin: binding.origin.clone(),
            }
        })?;

        Ok(Declaration {
            key,
            raw_key: binding.key.clone(),
            raw_value: binding.value.trim().to_string(),
            value,
            origin: binding.origin.clone(),
        })
    }

    fn reject(
        &self,
        binding: &Binding,
        error: EnumerationError,
        rejected: &mut Vec<RejectedBinding>,
    ) -> Result<(), EnumerationError> {
        if self.options.policy == KeyPolicy::Strict || !error.is_binding_local() {
            return Err(error);
        }
        BindingRejected {
            key: &binding.key,
            value: &binding.value,
            error: &error,
        }
        .log();
        rejected.push(RejectedBinding {
            binding: binding.clone(),
            error,
        });
        Ok(())
    }

    fn resolve(
        &self,
        generator: String,
        declared: GeneratorDeclarations,
    ) -> Result<GeneratorGroup, EnumerationError> {
        let mut configurations = Vec::with_capacity(declared.suffixed.len() + 1);

        match &declared.bare {
            // An explicitly empty bare key only suppresses the default when
            // there is something else to build.
            Some(bare) if bare.value.is_empty() && !declared.suffixed.is_empty() => {
                DefaultConfigurationSuppressed {
                    generator: &generator,
                    suffixed_count: declared.suffixed.len(),
                }
                .log();
            }
            Some(bare) => configurations.push(self.configure(bare, true)?),
            None => {
                let key = BindingKey::new(&generator, None).map_err(|reason| {
                    EnumerationError::MalformedKey {
                        key: generator.clone(),
                        reason,
                        origin: None,
                    }
                })?;
                configurations.push(self.configure(
                    &Declaration {
                        raw_key: key.to_string(),
                        key,
                        raw_value: String::new(),
                        value: BindingValue::default(),
                        origin: None,
                    },
                    false,
                )?);
            }
        }

        for declaration in &declared.suffixed {
            configurations.push(self.configure(declaration, true)?);
        }

        Ok(GeneratorGroup {
            generator,
            configurations,
        })
    }

    fn configure(
        &self,
        declaration: &Declaration,
        declared: bool,
    ) -> Result<Configuration, EnumerationError> {
        let target = match declaration.value.target() {
            Some(target) => target.to_string(),
            None => self.options.default_target.clone().ok_or_else(|| {
                EnumerationError::MissingDefaultTarget {
                    key: declaration.raw_key.clone(),
                    value: declaration.raw_value.clone(),
                }
            })?,
        };

        Ok(Configuration {
            generator: declaration.key.generator().to_string(),
            suffix: declaration.key.suffix().map(str::to_string),
            artifact: declaration.key.artifact_name(),
            target,
            params: declaration.value.params().to_string(),
            declared,
        })
    }
}

/// Run one enumeration pass with `options`.
///
/// Shorthand for `Enumerator::new(options.clone()).enumerate(bindings)`.
pub fn enumerate_configurations(
    bindings: &BindingSet,
    options: &EnumerateOptions,
) -> Result<Enumeration, EnumerationError> {
    Enumerator::new(options.clone()).enumerate(bindings)
}
