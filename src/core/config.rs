//! Attribute-driven configuration for map components
//!
//! Component options resolve through three layers: built-in defaults, caller
//! overrides, then attributes on the container element. This module implements
//! the attribute layer: deriving attribute names from option names and coercing
//! raw attribute strings into typed values exactly once, at construction time,
//! with explicit failure modes instead of silent fallbacks.

use thiserror::Error;

use crate::core::geo::LatLng;
use crate::page::{ElementId, PageAccess};

/// Errors raised while resolving component configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown {concern} behaviour `{key}`")]
    UnknownBehaviour {
        concern: &'static str,
        key: String,
    },

    #[error("invalid value `{value}` for option `{option}` (expected {expected})")]
    InvalidOption {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("missing required option `{option}`")]
    MissingOption { option: &'static str },
}

/// Derives the attribute name for an option: the component prefix plus the
/// option name with underscores turned into hyphens, so `group_padding`
/// becomes `data-geoform--group-padding`.
pub fn attr_name(prefix: &str, option: &str) -> String {
    format!("{prefix}{}", option.replace('_', "-"))
}

/// Reads a component's option attributes from its container element.
pub struct AttributeSource<'a> {
    page: &'a dyn PageAccess,
    element: ElementId,
    prefix: &'a str,
}

impl<'a> AttributeSource<'a> {
    pub fn new(page: &'a dyn PageAccess, element: ElementId, prefix: &'a str) -> Self {
        Self {
            page,
            element,
            prefix,
        }
    }

    /// Raw attribute value for an option, if the attribute is present.
    pub fn raw(&self, option: &str) -> Option<String> {
        self.page
            .attribute(self.element, &attr_name(self.prefix, option))
    }

    /// Overwrites `slot` when the attribute is present (plain string option).
    pub fn text(&self, option: &'static str, slot: &mut String) {
        if let Some(value) = self.raw(option) {
            *slot = value;
        }
    }

    /// Overwrites an optional string option when the attribute is present.
    pub fn optional_text(&self, option: &'static str, slot: &mut Option<String>) {
        if let Some(value) = self.raw(option) {
            *slot = Some(value);
        }
    }

    /// Overwrites `slot` with a parsed float when the attribute is present.
    pub fn number(&self, option: &'static str, slot: &mut f64) -> Result<(), ConfigError> {
        if let Some(value) = self.raw(option) {
            *slot = parse_number(option, &value)?;
        }
        Ok(())
    }

    /// Overwrites `slot` with a parsed boolean when the attribute is present.
    pub fn flag(&self, option: &'static str, slot: &mut bool) -> Result<(), ConfigError> {
        if let Some(value) = self.raw(option) {
            *slot = parse_flag(option, &value)?;
        }
        Ok(())
    }

    /// Overwrites `slot` with a parsed coordinate pair when present.
    pub fn coords(&self, option: &'static str, slot: &mut LatLng) -> Result<(), ConfigError> {
        if let Some(value) = self.raw(option) {
            *slot = parse_coords(option, &value)?;
        }
        Ok(())
    }

    /// Overwrites `slot` with a parsed `"x,y"` padding pair when present.
    pub fn padding(&self, option: &'static str, slot: &mut (f64, f64)) -> Result<(), ConfigError> {
        if let Some(value) = self.raw(option) {
            *slot = parse_padding(option, &value)?;
        }
        Ok(())
    }

    /// Overwrites `slot` with parsed geocode input groups when present.
    pub fn groups(
        &self,
        option: &'static str,
        slot: &mut Vec<Vec<String>>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = self.raw(option) {
            *slot = parse_groups(&value);
        }
        Ok(())
    }

    /// Overwrites a behaviour-key slot by parsing the attribute through the
    /// concern's `FromStr`, so unknown keys fail here rather than at dispatch.
    pub fn strategy<T>(&self, option: &'static str, slot: &mut T) -> Result<(), ConfigError>
    where
        T: std::str::FromStr<Err = ConfigError>,
    {
        if let Some(value) = self.raw(option) {
            *slot = value.parse()?;
        }
        Ok(())
    }
}

pub fn parse_number(option: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOption {
            option,
            value: value.to_string(),
            expected: "a number",
        })
}

pub fn parse_flag(option: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "" | "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ConfigError::InvalidOption {
            option,
            value: other.to_string(),
            expected: "true or false",
        }),
    }
}

pub fn parse_coords(option: &'static str, value: &str) -> Result<LatLng, ConfigError> {
    LatLng::parse_pair(value).ok_or_else(|| ConfigError::InvalidOption {
        option,
        value: value.to_string(),
        expected: "latitude,longitude",
    })
}

pub fn parse_padding(option: &'static str, value: &str) -> Result<(f64, f64), ConfigError> {
    let invalid = || ConfigError::InvalidOption {
        option,
        value: value.to_string(),
        expected: "x,y",
    };
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok((x, y))
}

/// Parses the string form of geocode input groups: groups separated by commas,
/// input names within a group joined by `+`. Empty names and empty groups are
/// dropped, so `"town+postcode,postcode,town"` yields three groups and
/// `"town++,"` yields one.
pub fn parse_groups(value: &str) -> Vec<Vec<String>> {
    value
        .split(',')
        .map(|group| {
            group
                .split('+')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .filter(|group| !group.is_empty())
        .collect()
}
