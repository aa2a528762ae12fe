//! Name-keyed collection of sub-regions.
//!
//! Sub-regions are created on first access: an unknown name gets a fresh,
//! pending [`SubRegion`]. Once that sub-region materializes it shows up in
//! [`RegionRegistry::regions`].
//!
//! ```text
//! absent --get_or_create--> pending --create()--> materialized
//! ```

use std::collections::BTreeMap;

use crate::error::LookupError;
use crate::geometry::region::{BoxRegionBuilder, RegionBuilder};
use crate::geometry::subregion::SubRegion;
use crate::geometry::Vec3;

/// Result of [`RegionRegistry::resolve`].
#[derive(Debug)]
pub enum Attr<'a, B: RegionBuilder> {
    /// The name was the registry's own name.
    Name(&'a str),
    /// The (possibly freshly created) sub-region.
    SubRegion(&'a mut SubRegion<B>),
}

/// A named set of sub-regions describing one simulated system.
///
/// # Examples
///
/// ```
/// use magkit::{RegionRegistry, SubRegionUpdate};
///
/// let mut system = RegionRegistry::new("film");
/// system.get_or_create("core").unwrap();
/// assert!(system.regions().is_empty());
///
/// system
///     .get_or_create("core")
///     .unwrap()
///     .apply(SubRegionUpdate::corners([0.0; 3], [1.0; 3]))
///     .unwrap();
/// assert!(system.regions().contains_key("core"));
/// ```
#[derive(Debug, Clone)]
pub struct RegionRegistry<B: RegionBuilder + Clone = BoxRegionBuilder> {
    name: String,
    details: BTreeMap<String, SubRegion<B>>,
    builder: B,
}

impl RegionRegistry {
    /// Creates an empty registry using the default box builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_builder(name, BoxRegionBuilder)
    }
}

impl<B: RegionBuilder + Clone> RegionRegistry<B> {
    /// Creates an empty registry whose sub-regions materialize through `builder`.
    pub fn with_builder(name: impl Into<String>, builder: B) -> Self {
        Self {
            name: name.into(),
            details: BTreeMap::new(),
            builder,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry(&mut self, name: &str) -> &mut SubRegion<B> {
        if !self.details.contains_key(name) {
            tracing::debug!(registry = %self.name, subregion = name, "created pending sub-region");
        }
        let builder = &self.builder;
        self.details
            .entry(name.to_string())
            .or_insert_with(|| SubRegion::with_builder(builder.clone()))
    }

    /// Resolves a name the way attribute access does.
    ///
    /// The registry's own name resolves to that name; anything else resolves
    /// to a sub-region, which is created if it did not exist.
    pub fn resolve(&mut self, name: &str) -> Attr<'_, B> {
        if name == self.name {
            return Attr::Name(&self.name);
        }
        Attr::SubRegion(self.entry(name))
    }

    /// Returns the named sub-region, creating a pending one if needed.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::ReservedName` for the registry's own name.
    pub fn get_or_create(&mut self, name: &str) -> Result<&mut SubRegion<B>, LookupError> {
        if name == self.name {
            return Err(LookupError::ReservedName {
                name: name.to_string(),
            });
        }
        Ok(self.entry(name))
    }

    /// Returns the named sub-region without creating it.
    pub fn get(&self, name: &str) -> Option<&SubRegion<B>> {
        self.details.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.details.contains_key(name)
    }

    /// Sub-region names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.details.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// All sub-regions, materialized or pending.
    pub fn details(&self) -> &BTreeMap<String, SubRegion<B>> {
        &self.details
    }

    /// Materialized regions by name. Pending sub-regions are left out.
    pub fn regions(&self) -> BTreeMap<&str, &B::Region> {
        self.details
            .iter()
            .filter_map(|(name, sub)| sub.region().map(|r| (name.as_str(), r)))
            .collect()
    }

    /// Magnetisation of every sub-region by name.
    pub fn mag_vals(&self) -> BTreeMap<&str, Vec3> {
        self.details
            .iter()
            .map(|(name, sub)| (name.as_str(), sub.magnetisation()))
            .collect()
    }

    /// Removes a materialized sub-region and returns it.
    ///
    /// # Errors
    ///
    /// - `LookupError::SubRegionNotFound` if the name was never created
    /// - `LookupError::SubRegionNotMaterialized` if it exists but is still pending
    pub fn delete_subregion(&mut self, name: &str) -> Result<SubRegion<B>, LookupError> {
        match self.details.get(name) {
            None => Err(LookupError::SubRegionNotFound {
                name: name.to_string(),
            }),
            Some(sub) if !sub.is_materialized() => Err(LookupError::SubRegionNotMaterialized {
                name: name.to_string(),
            }),
            Some(_) => {
                tracing::debug!(registry = %self.name, subregion = name, "deleted sub-region");
                self.details
                    .remove(name)
                    .ok_or_else(|| LookupError::SubRegionNotFound {
                        name: name.to_string(),
                    })
            }
        }
    }
}
