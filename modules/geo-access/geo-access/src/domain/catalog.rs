//! Known resource names and how each one attaches to the hierarchy.

use std::collections::{BTreeMap, HashMap};

use geo_access_sdk::ResourceKind;

use super::error::DomainError;

/// Resource name to geographic kind. `None` marks a permission-only resource.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    entries: HashMap<String, Option<ResourceKind>>,
}

impl ResourceCatalog {
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (String, Option<ResourceKind>)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn from_config(resources: &BTreeMap<String, Option<ResourceKind>>) -> Self {
        Self::new(resources.iter().map(|(name, kind)| (name.clone(), *kind)))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Geographic kind of `name`; `Ok(None)` for permission-only resources.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownResource`] if `name` is not catalogued.
    pub fn kind_of(&self, name: &str) -> Result<Option<ResourceKind>, DomainError> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| DomainError::UnknownResource(name.to_owned()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn kind_lookup() {
        let catalog = ResourceCatalog::new([
            ("fosas".to_owned(), Some(ResourceKind::Leaf)),
            ("users".to_owned(), None),
        ]);
        assert_eq!(catalog.kind_of("fosas").unwrap(), Some(ResourceKind::Leaf));
        assert_eq!(catalog.kind_of("users").unwrap(), None);
        assert_eq!(
            catalog.kind_of("hangars").unwrap_err(),
            DomainError::UnknownResource("hangars".to_owned())
        );
    }
}
