//! Configuration for the geo access module.

use std::collections::BTreeMap;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use geo_access_sdk::{HierarchySnapshot, ResourceKind};
use serde::{Deserialize, Serialize};

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "GEO_ACCESS__";

/// Shape of the predicates handed to the data layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateMode {
    /// Emit join-through predicates; the backend resolves ancestors itself.
    #[default]
    Join,
    /// Pre-expand join-through predicates into `IN` lists from the snapshot.
    Expanded,
}

/// Module configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeoAccessConfig {
    /// Role name to permission patterns (`resource.action`, `resource.*`, `*.action`, `*`).
    pub permissions: BTreeMap<String, Vec<String>>,

    /// Resource name to geographic kind. `null` marks a permission-only resource.
    pub resources: BTreeMap<String, Option<ResourceKind>>,

    /// Predicate shape emitted by `scope_filter`.
    pub predicate_mode: PredicateMode,

    /// Hierarchy served by the static provider (development and tests).
    pub hierarchy: HierarchySnapshot,
}

impl Default for GeoAccessConfig {
    fn default() -> Self {
        Self {
            permissions: default_permissions(),
            resources: default_resources(),
            predicate_mode: PredicateMode::default(),
            hierarchy: HierarchySnapshot::default(),
        }
    }
}

impl GeoAccessConfig {
    /// Layer an optional YAML file and `GEO_ACCESS__*` environment variables.
    ///
    /// Fields no source mentions take their built-in default. A `permissions`
    /// or `resources` map that is supplied replaces the default map as a
    /// whole: roles and resources it leaves out do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is given but is not a file, or if the merged
    /// configuration does not deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            anyhow::ensure!(
                path.is_file(),
                "geo access config file not found: {}",
                path.display()
            );
            figment = figment.merge(Yaml::file(path));
        }
        let cfg = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(cfg)
    }

    /// Parse a YAML document; absent fields take their built-in default.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not deserialize.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let cfg = Figment::from(Yaml::string(yaml)).extract()?;
        Ok(cfg)
    }
}

fn patterns(list: &[&str]) -> Vec<String> {
    list.iter().map(|p| (*p).to_owned()).collect()
}

fn default_permissions() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([
        ("super_admin".to_owned(), patterns(&["*"])),
        (
            "admin".to_owned(),
            patterns(&[
                "regions.*",
                "departements.*",
                "arrondissements.*",
                "fosas.*",
                "batiments.*",
                "services.*",
                "personnels.*",
                "equipements.*",
                "materiels_roulants.*",
                "users.manage",
            ]),
        ),
        (
            "manager".to_owned(),
            patterns(&[
                "regions.read",
                "departements.read",
                "arrondissements.read",
                "fosas.create",
                "fosas.read",
                "fosas.update",
                "batiments.manage",
                "services.manage",
                "personnels.manage",
                "equipements.manage",
                "materiels_roulants.manage",
                "users.read",
            ]),
        ),
        ("user".to_owned(), patterns(&["*.read"])),
    ])
}

fn default_resources() -> BTreeMap<String, Option<ResourceKind>> {
    let leaf = [
        "fosas",
        "batiments",
        "services",
        "personnels",
        "equipements",
        "materiels_roulants",
    ];
    let mut resources: BTreeMap<String, Option<ResourceKind>> = leaf
        .into_iter()
        .map(|name| (name.to_owned(), Some(ResourceKind::Leaf)))
        .collect();
    resources.insert("regions".to_owned(), Some(ResourceKind::Region));
    resources.insert("departements".to_owned(), Some(ResourceKind::Department));
    resources.insert(
        "arrondissements".to_owned(),
        Some(ResourceKind::Arrondissement),
    );
    resources.insert("users".to_owned(), None);
    resources
}
