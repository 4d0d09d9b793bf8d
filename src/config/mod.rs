//! Router configuration.
//!
//! [`RouterConfig`] holds the two knobs of a [`RouteTable`](crate::router::RouteTable):
//! the segment separator and the wildcard marker. Both are plain strings so the
//! config can be read from JSON; validation happens when a table is built.
//!
//! | Field             | Default | Meaning                                   |
//! |-------------------|---------|-------------------------------------------|
//! | `separator`       | `"/"`   | Splits routes into segments               |
//! | `wildcard_marker` | `":"`   | First character of a wildcard segment     |
//!
//! Setting a field to `null` disables it.

use serde::Deserialize;

use crate::router::RouterError;

fn default_separator() -> Option<String> {
    Some("/".to_owned())
}

fn default_wildcard_marker() -> Option<String> {
    Some(":".to_owned())
}

/// Settings for building a [`RouteTable`](crate::router::RouteTable).
///
/// # Examples
///
/// ```rust
/// use sigroute::config::RouterConfig;
///
/// let config = RouterConfig::from_json(r#"{ "separator": "." }"#).unwrap();
/// assert_eq!(config.separator.as_deref(), Some("."));
/// assert_eq!(config.wildcard_marker.as_deref(), Some(":"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    #[serde(default = "default_separator")]
    pub separator: Option<String>,

    #[serde(default = "default_wildcard_marker")]
    pub wildcard_marker: Option<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            wildcard_marker: default_wildcard_marker(),
        }
    }
}

impl RouterConfig {
    /// Parse a config from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidArgument`] when the document is malformed or
    /// a field is not a string (or `null`).
    pub fn from_json(input: &str) -> Result<Self, RouterError> {
        serde_json::from_str(input).map_err(|e| RouterError::InvalidArgument {
            name: "config",
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RouteTable;

    #[test]
    fn default_is_slash_and_colon() {
        let c = RouterConfig::default();
        assert_eq!(c.separator.as_deref(), Some("/"));
        assert_eq!(c.wildcard_marker.as_deref(), Some(":"));
    }

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(RouterConfig::from_json("{}").unwrap(), RouterConfig::default());
    }

    #[test]
    fn null_disables_field() {
        let c = RouterConfig::from_json(r#"{ "wildcard_marker": null }"#).unwrap();
        assert_eq!(c.wildcard_marker, None);
        assert_eq!(c.separator.as_deref(), Some("/"));
    }

    #[test]
    fn non_string_separator_is_invalid() {
        let err = RouterConfig::from_json(r#"{ "separator": 2 }"#).unwrap_err();
        assert!(matches!(err, RouterError::InvalidArgument { name: "config", .. }));
    }

    #[test]
    fn non_string_marker_is_invalid() {
        assert!(RouterConfig::from_json(r#"{ "wildcard_marker": true }"#).is_err());
    }

    #[test]
    fn unknown_field_is_invalid() {
        assert!(RouterConfig::from_json(r#"{ "sep": "/" }"#).is_err());
    }

    #[test]
    fn table_from_config_validates_marker() {
        let c = RouterConfig::from_json(r#"{ "wildcard_marker": "::" }"#).unwrap();
        assert!(RouteTable::<()>::from_config(&c).is_err());

        let c = RouterConfig::from_json(r#"{ "separator": ".", "wildcard_marker": "$" }"#).unwrap();
        let t = RouteTable::<()>::from_config(&c).unwrap();
        assert_eq!(t.separator(), Some("."));
        assert_eq!(t.wildcard_marker(), Some('$'));
    }
}
