//! Display metadata for simulation field quantities.
//!
//! A [`FieldInfo`] groups the values needed to present one field (for
//! example magnetisation or an applied field) in a plot or widget: a label,
//! a symbol, the allowed option values, the unit of each axis and a logical
//! group. The record is fixed once built and exposes exactly five keys.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Metadata for one simulation field quantity.
///
/// # Examples
///
/// ```
/// use magkit::FieldInfo;
///
/// let info = FieldInfo::new("Mx").with_symbol("M_x").with_group("magnetisation");
/// assert!(info.options().is_empty());
/// assert_eq!(info.keys().collect::<Vec<_>>(), FieldInfo::KEYS.to_vec());
/// assert!(info.get("bogus").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    label: String,
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    units: IndexMap<String, String>,
    #[serde(default)]
    group: String,
}

/// A borrowed view of one [`FieldInfo`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// `label`, `symbol` or `group`.
    Text(&'a str),
    /// `options`.
    List(&'a [String]),
    /// `units`.
    Map(&'a IndexMap<String, String>),
}

impl FieldValue<'_> {
    /// Returns the text, if this is a text entry.
    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => write!(f, "'{v}'"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{item}'")?;
                }
                write!(f, "]")
            }
            Self::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{k}': '{v}'")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl FieldInfo {
    /// The fixed keys, in iteration order.
    pub const KEYS: [&'static str; 5] = ["label", "symbol", "options", "units", "group"];

    /// Creates a record with the given label; every other entry is empty.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            symbol: String::new(),
            options: Vec::new(),
            units: IndexMap::new(),
            group: String::new(),
        }
    }

    /// Sets the display symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Sets the allowed option values.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the per-axis units, kept in the given order.
    #[must_use]
    pub fn with_units<I, K, V>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.units = units
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Sets the logical group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn units(&self) -> &IndexMap<String, String> {
        &self.units
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Looks up an entry by key name.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::KeyNotFound` for anything outside [`Self::KEYS`].
    pub fn get(&self, key: &str) -> Result<FieldValue<'_>, LookupError> {
        match key {
            "label" => Ok(FieldValue::Text(&self.label)),
            "symbol" => Ok(FieldValue::Text(&self.symbol)),
            "options" => Ok(FieldValue::List(&self.options)),
            "units" => Ok(FieldValue::Map(&self.units)),
            "group" => Ok(FieldValue::Text(&self.group)),
            other => Err(LookupError::KeyNotFound {
                key: other.to_string(),
            }),
        }
    }

    /// Iterates over the key names in fixed order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        Self::KEYS.into_iter()
    }

    /// Iterates over `(key, value)` pairs in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FieldValue<'_>)> {
        [
            ("label", FieldValue::Text(&self.label)),
            ("symbol", FieldValue::Text(&self.symbol)),
            ("options", FieldValue::List(&self.options)),
            ("units", FieldValue::Map(&self.units)),
            ("group", FieldValue::Text(&self.group)),
        ]
        .into_iter()
    }

    /// Always five.
    #[must_use]
    pub const fn len(&self) -> usize {
        Self::KEYS.len()
    }

    /// Always false.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{key}': {value}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty() {
        let info = FieldInfo::new("Mx");
        assert_eq!(info.label(), "Mx");
        assert_eq!(info.symbol(), "");
        assert!(info.options().is_empty());
        assert!(info.units().is_empty());
        assert_eq!(info.group(), "");
    }

    #[test]
    fn test_keys_fixed_order() {
        let info = FieldInfo::new("Mx");
        let keys: Vec<_> = info.keys().collect();
        assert_eq!(keys, vec!["label", "symbol", "options", "units", "group"]);
        assert_eq!(info.len(), 5);
        assert!(!info.is_empty());
    }

    #[test]
    fn test_units_keep_insertion_order() {
        let info = FieldInfo::new("M").with_units([("z", "T"), ("x", "A/m"), ("y", "T")]);
        let axes: Vec<&str> = info.units().keys().map(String::as_str).collect();
        assert_eq!(axes, ["z", "x", "y"]);
        assert!(info
            .to_string()
            .contains("'units': {'z': 'T', 'x': 'A/m', 'y': 'T'}"));
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let info = FieldInfo::new("H")
            .with_symbol("H_ext")
            .with_options(["x", "y", "z"])
            .with_units([("x", "A/m"), ("y", "A/m")]);

        assert_eq!(info.get("symbol").unwrap(), FieldValue::Text("H_ext"));
        match info.get("options").unwrap() {
            FieldValue::List(opts) => assert_eq!(opts.len(), 3),
            other => panic!("unexpected value: {other:?}"),
        }
        match info.get("units").unwrap() {
            FieldValue::Map(units) => assert_eq!(units.get("y").map(String::as_str), Some("A/m")),
            other => panic!("unexpected value: {other:?}"),
        }

        let err = info.get("bogus").unwrap_err();
        assert_eq!(
            err,
            LookupError::KeyNotFound {
                key: "bogus".to_string()
            }
        );
    }

    #[test]
    fn test_structural_equality() {
        let a = FieldInfo::new("Mx").with_group("m");
        let b = FieldInfo::new("Mx").with_group("m");
        let c = FieldInfo::new("My").with_group("m");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_is_dict_like() {
        let info = FieldInfo::new("Mx")
            .with_options(["a"])
            .with_units([("x", "T")]);
        let text = info.to_string();
        assert_eq!(
            text,
            "{'label': 'Mx', 'symbol': '', 'options': ['a'], 'units': {'x': 'T'}, 'group': ''}"
        );
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let info: FieldInfo = serde_json::from_str(r#"{"label": "Mz"}"#).unwrap();
        assert_eq!(info, FieldInfo::new("Mz"));
    }
}
