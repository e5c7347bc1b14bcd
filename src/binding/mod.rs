// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Raw configuration bindings and their typed key/value forms.

mod key;
mod value;

pub use key::BindingKey;
pub use value::BindingValue;

use std::fmt;

/// Where a binding was declared, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Name of the source (a file path, or `env`)
    pub source: String,
    /// 1-based line number, when the source has lines
    pub line: Option<usize>,
}

impl Origin {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            line: None,
        }
    }

    pub fn at_line(source: impl Into<String>, line: usize) -> Self {
        Self {
            source: source.into(),
            line: Some(line),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.source, line),
            None => write!(f, "{}", self.source),
        }
    }
}

/// One `key = value` declaration, exactly as it appeared in its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: String,
    pub value: String,
    pub origin: Option<Origin>,
}

impl Binding {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// An ordered snapshot of bindings. Declaration order is preserved.
///
/// # Examples
/// ```
/// use hlgen::binding::BindingSet;
///
/// let bindings = BindingSet::from(vec![
///     ("CFG__blur__fast", "target=host vectorize=true"),
///     ("CFG__sharpen", ""),
/// ]);
/// assert_eq!(bindings.len(), 2);
/// assert_eq!(bindings.iter().next().unwrap().key, "CFG__blur__fast");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingSet(pub Vec<Binding>);

impl BindingSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, binding: Binding) {
        self.0.push(binding);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append every binding of `other` after the ones already present.
    pub fn extend(&mut self, other: BindingSet) {
        self.0.extend(other.0);
    }
}

impl From<Vec<Binding>> for BindingSet {
    fn from(bindings: Vec<Binding>) -> Self {
        Self(bindings)
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for BindingSet {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BindingSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| Binding::new(k, v)).collect())
    }
}

impl From<BindingSet> for Vec<Binding> {
    fn from(value: BindingSet) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a BindingSet {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
