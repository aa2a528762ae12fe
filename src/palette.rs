//! Named colour palettes for plotting.
//!
//! A [`PaletteStore`] keeps ordered key→colour mappings under a name and
//! remembers one "active" palette for short-form lookups. Colours can be
//! fetched by key or by position in the palette's key order.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value as JsonValue;

use crate::error::{ConfigError, LookupError, ValidationError};

/// An ordered mapping from colour key to colour value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<(String, String)>,
}

impl Palette {
    /// Creates an empty palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a colour. An existing key keeps its position and gets the new colour.
    pub fn insert(&mut self, key: impl Into<String>, color: impl Into<String>) {
        let key = key.into();
        let color = color.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = color,
            None => self.entries.push((key, color)),
        }
    }

    /// Direct key lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, c)| c.as_str())
    }

    /// Colour at a 0-based position in key order.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(_, c)| c.as_str())
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, colour)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a key or a position.
    ///
    /// Keys that are absent resolve to `Ok(None)`. Positions must be in range.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::InvalidKeyOrIndex` for a negative or out-of-range index.
    pub fn resolve(&self, color: ColorRef<'_>) -> Result<Option<&str>, LookupError> {
        match color {
            ColorRef::Key(key) => Ok(self.get(key)),
            ColorRef::Index(index) => usize::try_from(index)
                .ok()
                .and_then(|i| self.get_index(i))
                .map(Some)
                .ok_or_else(|| LookupError::InvalidKeyOrIndex {
                    what: format!("index {index} (palette has {} colors)", self.len()),
                }),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, c)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{k}': '{c}'")?;
        }
        write!(f, "}}")
    }
}

impl<K: Into<String>, C: Into<String>> FromIterator<(K, C)> for Palette {
    fn from_iter<T: IntoIterator<Item = (K, C)>>(iter: T) -> Self {
        let mut palette = Self::new();
        for (k, c) in iter {
            palette.insert(k, c);
        }
        palette
    }
}

/// A colour reference: either a key or a 0-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRef<'a> {
    Key(&'a str),
    Index(i64),
}

impl<'a> From<&'a str> for ColorRef<'a> {
    fn from(key: &'a str) -> Self {
        Self::Key(key)
    }
}

impl<'a> From<&'a String> for ColorRef<'a> {
    fn from(key: &'a String) -> Self {
        Self::Key(key)
    }
}

impl From<i64> for ColorRef<'_> {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

/// One element of a colour sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorEntry {
    /// A bare colour; its key is its 1-based position.
    Plain(String),
    /// A colour with an explicit key.
    Keyed(String, String),
}

/// Input accepted by [`PaletteStore::add_palette`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteColors {
    /// Ordered colours, optionally keyed per element.
    Sequence(Vec<ColorEntry>),
    /// Explicit key→colour pairs.
    Mapping(Vec<(String, String)>),
}

impl PaletteColors {
    /// A sequence of bare colours.
    pub fn plain<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Sequence(
            colors
                .into_iter()
                .map(|c| ColorEntry::Plain(c.into()))
                .collect(),
        )
    }

    /// Explicit key→colour pairs.
    pub fn mapping<I, K, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<String>,
    {
        Self::Mapping(
            pairs
                .into_iter()
                .map(|(k, c)| (k.into(), c.into()))
                .collect(),
        )
    }

    fn into_palette(self) -> Palette {
        match self {
            Self::Sequence(entries) => entries
                .into_iter()
                .enumerate()
                .map(|(i, entry)| match entry {
                    ColorEntry::Plain(color) => ((i + 1).to_string(), color),
                    ColorEntry::Keyed(key, color) => (key, color),
                })
                .collect(),
            Self::Mapping(pairs) => pairs.into_iter().collect(),
        }
    }
}

fn json_key(value: &JsonValue) -> Result<String, ValidationError> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(ValidationError::InvalidColors {
            reason: format!("unsupported key {other}"),
        }),
    }
}

fn json_color(value: &JsonValue) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidationError::InvalidColors {
            reason: format!("color must be a string, got {value}"),
        })
}

impl TryFrom<&JsonValue> for PaletteColors {
    type Error = ValidationError;

    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Array(items) => {
                let mut entries = Vec::with_capacity(items.len());
                for item in items {
                    let entry = match item {
                        JsonValue::Array(pair) if pair.len() == 2 => {
                            ColorEntry::Keyed(json_key(&pair[0])?, json_color(&pair[1])?)
                        }
                        JsonValue::Array(pair) => {
                            return Err(ValidationError::InvalidColors {
                                reason: format!(
                                    "keyed entries must have exactly 2 elements, got {}",
                                    pair.len()
                                ),
                            })
                        }
                        other => ColorEntry::Plain(json_color(other)?),
                    };
                    entries.push(entry);
                }
                Ok(Self::Sequence(entries))
            }
            JsonValue::Object(map) => {
                let pairs = map
                    .iter()
                    .map(|(k, c)| Ok((k.clone(), json_color(c)?)))
                    .collect::<Result<Vec<_>, ValidationError>>()?;
                Ok(Self::Mapping(pairs))
            }
            other => Err(ValidationError::InvalidColors {
                reason: format!("colors must be a list or a mapping, got {other}"),
            }),
        }
    }
}

/// Read-only accessor bound to one palette.
#[derive(Debug, Clone, Copy)]
pub struct PaletteAccessor<'a> {
    palette: &'a Palette,
}

impl<'a> PaletteAccessor<'a> {
    /// Resolves a key or position, as [`PaletteStore::use_color`] does.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::InvalidKeyOrIndex` for a bad index.
    pub fn get<'k>(&self, color: impl Into<ColorRef<'k>>) -> Result<Option<&'a str>, LookupError> {
        self.palette.resolve(color.into())
    }

    /// The underlying palette.
    #[must_use]
    pub const fn palette(&self) -> &'a Palette {
        self.palette
    }
}

impl fmt::Display for PaletteAccessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.palette, f)
    }
}

/// Named palettes plus an active-palette pointer.
///
/// # Examples
///
/// ```
/// use magkit::{PaletteColors, PaletteStore};
///
/// let mut store = PaletteStore::new();
/// store.add_palette("p", PaletteColors::plain(["a", "b", "c"]));
/// store.load_palette("p").unwrap();
/// assert_eq!(store.use_color(1_i64).unwrap(), Some("b"));
/// assert_eq!(store.use_color("2").unwrap(), Some("b"));
/// ```
#[derive(Debug, Clone)]
pub struct PaletteStore {
    palettes: HashMap<String, Palette>,
    active: Option<String>,
}

impl Default for PaletteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteStore {
    /// Creates a store seeded with the built-in palettes.
    #[must_use]
    pub fn new() -> Self {
        let palettes = BUILTIN_PALETTES
            .iter()
            .map(|(name, colors)| {
                (
                    (*name).to_string(),
                    colors.iter().copied().collect::<Palette>(),
                )
            })
            .collect();
        Self {
            palettes,
            active: None,
        }
    }

    /// Adds or replaces a palette.
    pub fn add_palette(&mut self, name: impl Into<String>, colors: PaletteColors) {
        let name = name.into();
        let palette = colors.into_palette();
        tracing::debug!(palette = %name, colors = palette.len(), "added palette");
        self.palettes.insert(name, palette);
    }

    /// Adds or replaces a palette from a JSON list or mapping.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidColors` if the JSON has any other shape.
    pub fn add_palette_json(
        &mut self,
        name: impl Into<String>,
        colors: &JsonValue,
    ) -> Result<(), ValidationError> {
        let colors = PaletteColors::try_from(colors)?;
        self.add_palette(name, colors);
        Ok(())
    }

    /// Merges palettes from a JSON file of the form `{"name": <colors>, ...}`.
    ///
    /// Returns the number of palettes loaded. Nothing is added unless every
    /// entry parses.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or any entry is malformed.
    pub fn load_palettes_json(&mut self, path: &Path) -> Result<usize, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: JsonValue = serde_json::from_str(&text)?;
        let JsonValue::Object(entries) = doc else {
            return Err(ConfigError::Parse(serde::de::Error::custom(
                "palette file must contain a JSON object",
            )));
        };

        // Validate everything before touching the store.
        let parsed = entries
            .iter()
            .map(|(name, colors)| {
                PaletteColors::try_from(colors)
                    .map(|c| (name.clone(), c))
                    .map_err(|e| ConfigError::Parse(serde::de::Error::custom(e.to_string())))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = parsed.len();
        for (name, colors) in parsed {
            self.add_palette(name, colors);
        }
        Ok(count)
    }

    /// Returns the named palette, or `None`.
    #[must_use]
    pub fn get_palette(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(name)
    }

    /// Makes the named palette active.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::PaletteNotFound` if there is no such palette.
    pub fn load_palette(&mut self, name: &str) -> Result<(), LookupError> {
        if !self.palettes.contains_key(name) {
            return Err(LookupError::PaletteNotFound {
                name: name.to_string(),
            });
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    /// Name of the active palette, if any.
    #[must_use]
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Looks up a colour in the active palette.
    ///
    /// A missing key resolves to `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - `LookupError::NoActivePalette` if nothing was loaded
    /// - `LookupError::InvalidKeyOrIndex` for a negative or out-of-range index
    pub fn use_color<'k>(&self, color: impl Into<ColorRef<'k>>) -> Result<Option<&str>, LookupError> {
        let palette = self
            .active
            .as_deref()
            .and_then(|name| self.palettes.get(name))
            .ok_or(LookupError::NoActivePalette)?;
        palette.resolve(color.into())
    }

    /// Accessor bound to the named palette.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::PaletteNotFound` if there is no such palette.
    pub fn palette(&self, name: &str) -> Result<PaletteAccessor<'_>, LookupError> {
        self.palettes
            .get(name)
            .map(|palette| PaletteAccessor { palette })
            .ok_or_else(|| LookupError::PaletteNotFound {
                name: name.to_string(),
            })
    }

    /// Stored palette names, sorted.
    #[must_use]
    pub fn palette_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.palettes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

type BuiltinPalette = (&'static str, &'static [(&'static str, &'static str)]);

// https://www.heavy.ai/blog/12-color-palettes-for-telling-better-stories-with-your-data
const BUILTIN_PALETTES: &[BuiltinPalette] = &[
    (
        "dutch_field",
        &[
            ("red", "#e60049"),
            ("blue", "#0bb4ff"),
            ("green", "#50e991"),
            ("yellow", "#e6d800"),
            ("purple", "#9b19f5"),
            ("orange", "#ffa300"),
            ("magenta", "#dc0ab4"),
            ("lightblue", "#b3d4ff"),
            ("turquoise", "#00bfa0"),
        ],
    ),
    (
        "spring_pastels",
        &[
            ("red", "#fd7f6f"),
            ("blue", "#7eb0d5"),
            ("green", "#b2e061"),
            ("purple", "#bd7ebe"),
            ("orange", "#ffb55a"),
            ("yellow", "#ffee65"),
            ("lightpurple", "#beb9db"),
            ("pink", "#fdcce5"),
            ("turquoise", "#8bd3c7"),
        ],
    ),
    (
        "river_nights",
        &[
            ("red", "#b30000"),
            ("darkpurple", "#7c1158"),
            ("purple", "#4421af"),
            ("darkblue", "#1a53ff"),
            ("blue", "#0d88e6"),
            ("cyan", "#00b7c7"),
            ("green", "#5ad45a"),
            ("lightgreen", "#8be04e"),
            ("yellow", "#ebdc78"),
        ],
    ),
];
