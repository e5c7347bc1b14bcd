// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{KEY_DELIMITER, KEY_MARKER};
use crate::errors::KeyError;
use std::fmt;
use std::str::FromStr;

/// The typed form of a `CFG__<GENERATOR>[__<SUFFIX>]` key.
///
/// Neither segment can contain the `__` delimiter; both are validated on
/// construction so a `BindingKey` always renders back to a key that parses
/// to the same value.
///
/// # Examples
/// ```
/// use hlgen::binding::BindingKey;
///
/// let key: BindingKey = "CFG__blur__fast".parse().unwrap();
/// assert_eq!(key.generator(), "blur");
/// assert_eq!(key.suffix(), Some("fast"));
/// assert_eq!(key.artifact_name(), "blur_fast");
/// assert_eq!(key.to_string(), "CFG__blur__fast");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    generator: String,
    suffix: Option<String>,
}

impl BindingKey {
    /// Build a key from its parts, validating both segments.
    pub fn new(generator: &str, suffix: Option<&str>) -> Result<Self, KeyError> {
        if generator.is_empty() {
            return Err(KeyError::EmptyGenerator);
        }
        validate_segment(generator)?;
        let suffix = match suffix {
            Some(s) if !s.is_empty() => {
                validate_segment(s)?;
                Some(s.to_string())
            }
            _ => None,
        };
        Ok(Self {
            generator: generator.to_string(),
            suffix,
        })
    }

    /// Parse a raw key.
    ///
    /// `CFG__foo__` (empty suffix) is accepted as a synonym for `CFG__foo`.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let segments: Vec<&str> = raw.split(KEY_DELIMITER).collect();
        match segments.as_slice() {
            [marker, ..] if *marker != KEY_MARKER => Err(KeyError::WrongMarker),
            [_] => Err(KeyError::MissingGenerator),
            [_, generator] => Self::new(generator, None),
            [_, generator, suffix] => Self::new(generator, Some(suffix)),
            _ => Err(KeyError::TooManySegments(segments.len())),
        }
    }

    pub fn generator(&self) -> &str {
        &self.generator
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// True for the unsuffixed key.
    pub fn is_default(&self) -> bool {
        self.suffix.is_none()
    }

    /// `<generator>` for the default key, `<generator>_<suffix>` otherwise.
    pub fn artifact_name(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}_{}", self.generator, suffix),
            None => self.generator.clone(),
        }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", KEY_MARKER, KEY_DELIMITER, self.generator)?;
        if let Some(suffix) = &self.suffix {
            write!(f, "{}{}", KEY_DELIMITER, suffix)?;
        }
        Ok(())
    }
}

impl FromStr for BindingKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn validate_segment(segment: &str) -> Result<(), KeyError> {
    let invalid = |reason| KeyError::InvalidSegment {
        segment: segment.to_string(),
        reason,
    };

    if !segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(invalid("contains characters other than letters, digits and '_'"));
    }
    if segment.contains(KEY_DELIMITER) {
        return Err(invalid("contains the '__' delimiter"));
    }
    // A leading or trailing '_' would merge with the neighbouring delimiter.
    if segment.starts_with('_') || segment.ends_with('_') {
        return Err(invalid("must not begin or end with '_'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_key() {
        let key = BindingKey::parse("CFG__blur").unwrap();
        assert_eq!(key.generator(), "blur");
        assert_eq!(key.suffix(), None);
        assert!(key.is_default());
        assert_eq!(key.artifact_name(), "blur");
    }

    #[test]
    fn test_parse_suffixed_key() {
        let key = BindingKey::parse("CFG__blur__fast").unwrap();
        assert_eq!(key.generator(), "blur");
        assert_eq!(key.suffix(), Some("fast"));
        assert!(!key.is_default());
        assert_eq!(key.artifact_name(), "blur_fast");
    }

    #[test]
    fn test_single_underscores_are_part_of_the_name() {
        let key = BindingKey::parse("CFG__box_blur__no_vec").unwrap();
        assert_eq!(key.generator(), "box_blur");
        assert_eq!(key.suffix(), Some("no_vec"));
        assert_eq!(key.artifact_name(), "box_blur_no_vec");
    }

    #[test]
    fn test_empty_suffix_is_default() {
        let key = BindingKey::parse("CFG__blur__").unwrap();
        assert!(key.is_default());
        assert_eq!(key, BindingKey::parse("CFG__blur").unwrap());
    }

    #[test]
    fn test_too_many_segments() {
        assert_eq!(
            BindingKey::parse("CFG__a__b__c"),
            Err(KeyError::TooManySegments(4))
        );
    }

    #[test]
    fn test_wrong_marker() {
        assert_eq!(BindingKey::parse("CONF__a"), Err(KeyError::WrongMarker));
        assert_eq!(BindingKey::parse("cfg__a"), Err(KeyError::WrongMarker));
    }

    #[test]
    fn test_missing_and_empty_generator() {
        assert_eq!(BindingKey::parse("CFG"), Err(KeyError::MissingGenerator));
        assert_eq!(BindingKey::parse("CFG__"), Err(KeyError::EmptyGenerator));
        assert_eq!(BindingKey::parse("CFG____x"), Err(KeyError::EmptyGenerator));
    }

    #[test]
    fn test_ambiguous_underscores_rejected() {
        // "CFG___x" splits into ["CFG", "_x"]
        assert!(matches!(
            BindingKey::parse("CFG___x"),
            Err(KeyError::InvalidSegment { .. })
        ));
        assert!(matches!(
            BindingKey::parse("CFG__foo___bar"),
            Err(KeyError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn test_invalid_characters_rejected() {
        assert!(matches!(
            BindingKey::parse("CFG__foo bar"),
            Err(KeyError::InvalidSegment { .. })
        ));
        assert!(matches!(
            BindingKey::parse("CFG__foo__b-ar"),
            Err(KeyError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["CFG__blur", "CFG__blur__fast", "CFG__a1__b_2"] {
            assert_eq!(BindingKey::parse(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_new_validates_segments() {
        assert!(BindingKey::new("blur", Some("fast")).is_ok());
        assert_eq!(BindingKey::new("", None), Err(KeyError::EmptyGenerator));
        assert!(BindingKey::new("blur", Some("a__b")).is_err());
        assert!(BindingKey::new("blur", Some("")).unwrap().is_default());
    }
}
