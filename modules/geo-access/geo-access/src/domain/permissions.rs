//! Role permission table and the single matcher over it.
//!
//! Patterns are parsed once at construction into [`PermissionRule`] values, so
//! a typo in the table is a startup error instead of a rule that silently
//! never matches.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use geo_access_sdk::Action;
use geo_security::Role;

use super::catalog::ResourceCatalog;
use super::error::DomainError;

/// Resource half of a permission pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceSelector {
    Any,
    Named(String),
}

/// Action half of a permission pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSelector {
    Any,
    Exact(Action),
}

/// A parsed permission pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionRule {
    resource: ResourceSelector,
    action: ActionSelector,
}

impl PermissionRule {
    #[must_use]
    pub const fn new(resource: ResourceSelector, action: ActionSelector) -> Self {
        Self { resource, action }
    }

    #[must_use]
    pub const fn resource(&self) -> &ResourceSelector {
        &self.resource
    }

    #[must_use]
    pub const fn action(&self) -> ActionSelector {
        self.action
    }

    /// Total matcher: does this rule grant `action` on `resource`?
    ///
    /// `manage` grants the four CRUD actions; asking for `manage` itself
    /// needs `manage` or a wildcard.
    #[must_use]
    pub fn grants(&self, resource: &str, action: Action) -> bool {
        let resource_matches = match &self.resource {
            ResourceSelector::Any => true,
            ResourceSelector::Named(name) => name == resource,
        };
        if !resource_matches {
            return false;
        }
        match self.action {
            ActionSelector::Any => true,
            ActionSelector::Exact(granted) => {
                granted == action || (granted == Action::Manage && action.is_crud())
            }
        }
    }
}

impl FromStr for PermissionRule {
    type Err = String;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        if pattern == "*" {
            return Ok(Self::new(ResourceSelector::Any, ActionSelector::Any));
        }
        let (resource, action) = pattern
            .split_once('.')
            .ok_or_else(|| "expected '<resource>.<action>' or '*'".to_owned())?;

        let resource = match resource {
            "*" => ResourceSelector::Any,
            name if is_resource_name(name) => ResourceSelector::Named(name.to_owned()),
            name => return Err(format!("invalid resource name '{name}'")),
        };
        let action = match action {
            "*" => ActionSelector::Any,
            other => ActionSelector::Exact(other.parse().map_err(|e| format!("{e}"))?),
        };
        Ok(Self::new(resource, action))
    }
}

impl fmt::Display for PermissionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.resource, self.action) {
            (ResourceSelector::Any, ActionSelector::Any) => f.write_str("*"),
            (ResourceSelector::Any, ActionSelector::Exact(a)) => write!(f, "*.{a}"),
            (ResourceSelector::Named(n), ActionSelector::Any) => write!(f, "{n}.*"),
            (ResourceSelector::Named(n), ActionSelector::Exact(a)) => write!(f, "{n}.{a}"),
        }
    }
}

fn is_resource_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Static mapping from role to parsed permission rules.
///
/// Immutable after construction; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    rules: HashMap<Role, Vec<PermissionRule>>,
}

impl PermissionSet {
    /// Build from already parsed rules.
    #[must_use]
    pub fn new(rules: HashMap<Role, Vec<PermissionRule>>) -> Self {
        Self { rules }
    }

    /// Parse and validate a role-to-patterns table.
    ///
    /// Every role key must be a known role, every pattern must parse, and
    /// every named resource must be in `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPermissionPattern`] on the first invalid entry.
    pub fn from_table(
        table: &BTreeMap<String, Vec<String>>,
        catalog: &ResourceCatalog,
    ) -> Result<Self, DomainError> {
        let mut rules: HashMap<Role, Vec<PermissionRule>> = HashMap::new();
        for (role_name, patterns) in table {
            let invalid = |pattern: &str, reason: String| DomainError::InvalidPermissionPattern {
                role: role_name.clone(),
                pattern: pattern.to_owned(),
                reason,
            };
            let role: Role = role_name
                .parse()
                .map_err(|e: geo_security::PrincipalError| invalid("", e.to_string()))?;

            let parsed = rules.entry(role).or_default();
            for pattern in patterns {
                let rule: PermissionRule =
                    pattern.parse().map_err(|reason| invalid(pattern.as_str(), reason))?;
                if let ResourceSelector::Named(name) = rule.resource()
                    && !catalog.contains(name)
                {
                    return Err(invalid(
                        pattern.as_str(),
                        format!("resource '{name}' is not in the resource catalog"),
                    ));
                }
                parsed.push(rule);
            }
        }
        Ok(Self { rules })
    }

    /// Is `action` on `resource` allowed for `role`?
    ///
    /// `super_admin` is always allowed. Otherwise absence of a matching rule is deny.
    #[must_use]
    pub fn allows(&self, role: Role, resource: &str, action: Action) -> bool {
        role == Role::SuperAdmin || self.matching_rule(role, resource, action).is_some()
    }

    /// First rule of `role` that grants the request, if any.
    #[must_use]
    pub fn matching_rule(
        &self,
        role: Role,
        resource: &str,
        action: Action,
    ) -> Option<&PermissionRule> {
        self.rules_for(role)
            .iter()
            .find(|rule| rule.grants(resource, action))
    }

    /// Parsed rules of `role` (empty if the role has no entry).
    #[must_use]
    pub fn rules_for(&self, role: Role) -> &[PermissionRule] {
        self.rules
            .get(&role)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn set(role: Role, patterns: &[&str]) -> PermissionSet {
        let rules = patterns.iter().map(|p| p.parse().unwrap()).collect();
        PermissionSet::new(HashMap::from([(role, rules)]))
    }

    #[test]
    fn pattern_parsing() {
        assert_eq!(
            "*".parse::<PermissionRule>().unwrap(),
            PermissionRule::new(ResourceSelector::Any, ActionSelector::Any)
        );
        assert_eq!(
            "fosas.*".parse::<PermissionRule>().unwrap(),
            PermissionRule::new(
                ResourceSelector::Named("fosas".to_owned()),
                ActionSelector::Any
            )
        );
        assert_eq!(
            "*.read".parse::<PermissionRule>().unwrap(),
            PermissionRule::new(ResourceSelector::Any, ActionSelector::Exact(Action::Read))
        );
        assert!("fosas".parse::<PermissionRule>().is_err());
        assert!("fosas.purge".parse::<PermissionRule>().is_err());
        assert!(".read".parse::<PermissionRule>().is_err());
        assert!("Fosas.read".parse::<PermissionRule>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for p in ["*", "*.read", "fosas.*", "fosas.manage"] {
            assert_eq!(p.parse::<PermissionRule>().unwrap().to_string(), p);
        }
    }

    #[test]
    fn fosas_read_granted_exactly_by_the_four_forms() {
        let granting = ["fosas.read", "fosas.*", "*", "fosas.manage", "*.read"];
        for p in granting {
            assert!(
                set(Role::User, &[p]).allows(Role::User, "fosas", Action::Read),
                "{p} should grant fosas.read"
            );
        }

        let not_granting = [
            "fosas.create",
            "fosas.update",
            "fosas.delete",
            "batiments.read",
            "batiments.*",
            "batiments.manage",
            "*.update",
        ];
        for p in not_granting {
            assert!(
                !set(Role::User, &[p]).allows(Role::User, "fosas", Action::Read),
                "{p} must not grant fosas.read"
            );
        }
    }

    #[test]
    fn manage_implies_crud_but_only_for_its_resource() {
        let s = set(Role::Manager, &["fosas.manage"]);
        for a in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            assert!(s.allows(Role::Manager, "fosas", a));
            assert!(!s.allows(Role::Manager, "users", a));
        }
        assert!(s.allows(Role::Manager, "fosas", Action::Manage));
    }

    #[test]
    fn crud_does_not_imply_manage() {
        let s = set(
            Role::Manager,
            &["fosas.create", "fosas.read", "fosas.update", "fosas.delete"],
        );
        assert!(!s.allows(Role::Manager, "fosas", Action::Manage));
    }

    #[test]
    fn resource_prefix_must_match_whole_name() {
        let s = set(Role::User, &["fosa.*"]);
        assert!(!s.allows(Role::User, "fosas", Action::Read));
    }

    #[test]
    fn absence_is_deny() {
        let s = PermissionSet::default();
        for role in [Role::Admin, Role::Manager, Role::User] {
            assert!(!s.allows(role, "fosas", Action::Read));
        }
    }

    #[test]
    fn super_admin_always_allowed() {
        let s = PermissionSet::default();
        assert!(s.allows(Role::SuperAdmin, "anything", Action::Delete));
    }

    #[test]
    fn table_validation_rejects_unknown_role_and_resource() {
        let catalog = ResourceCatalog::new([("fosas".to_owned(), None)]);

        let table = BTreeMap::from([("root".to_owned(), vec!["*".to_owned()])]);
        assert!(matches!(
            PermissionSet::from_table(&table, &catalog),
            Err(DomainError::InvalidPermissionPattern { role, .. }) if role == "root"
        ));

        let table = BTreeMap::from([("user".to_owned(), vec!["fossas.read".to_owned()])]);
        assert!(matches!(
            PermissionSet::from_table(&table, &catalog),
            Err(DomainError::InvalidPermissionPattern { pattern, .. }) if pattern == "fossas.read"
        ));

        let table = BTreeMap::from([("user".to_owned(), vec!["fosas.read".to_owned()])]);
        let s = PermissionSet::from_table(&table, &catalog).unwrap();
        assert_eq!(s.rules_for(Role::User).len(), 1);
        assert!(s.rules_for(Role::Admin).is_empty());
    }
}
