#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use geo_access::domain::GeoAccessLocalClient;
use geo_access::{GeoAccessConfig, PredicateEvaluator};
use geo_access_sdk::{
    Access, Action, Decision, DenyCode, GeoAccessClient, GeoAccessError, GeoTarget, ResourceKind,
};
use geo_security::{
    ArrondissementId, DepartmentId, GeoField, GeoJoin, GeoLevel, Predicate, Principal,
    RawPrincipal, RegionId, Role,
};

fn client() -> GeoAccessLocalClient {
    GeoAccessLocalClient::new(Arc::new(common::service()))
}

#[test]
fn departmental_manager_updates_facilities_in_their_department() {
    let client = client();
    let manager = Principal::departmental(Role::Manager, DepartmentId::new(10));

    assert_eq!(
        client.authorize(&manager, "fosas", Action::Update),
        Decision::Allow
    );
    let predicate = client.scope_filter(&manager, ResourceKind::Leaf).unwrap();
    assert_eq!(
        predicate,
        Predicate::join_through(
            GeoField::ArrondissementId,
            GeoJoin::ArrondissementToDepartment,
            10_i64
        )
    );

    let h = common::hierarchy();
    let visible: Vec<i64> = PredicateEvaluator::new(&h)
        .filter(&predicate, &common::rows(ResourceKind::Leaf))
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(visible, vec![1000, 1010]);
}

#[test]
fn manager_cannot_delete_users_and_no_geography_is_evaluated() {
    let client = client();
    let manager = Principal::departmental(Role::Manager, DepartmentId::new(10));

    let access = client
        .enforce(&manager, "users", Action::Delete, ResourceKind::Leaf)
        .unwrap();
    let Access::Denied { reason } = access else {
        panic!("expected denial, got {access:?}");
    };
    assert_eq!(reason.code, DenyCode::RoleLacksPermission);
    assert_eq!(reason.code.as_str(), "role_lacks_permission");
}

#[test]
fn denial_wins_even_when_the_scope_is_unresolvable() {
    let client = client();
    let user = Principal::arrondissement(Role::User, ArrondissementId::new(999));
    let access = client
        .enforce(&user, "fosas", Action::Delete, ResourceKind::Leaf)
        .unwrap();
    assert!(matches!(access, Access::Denied { .. }));
}

#[test]
fn departmental_scope_sees_exactly_its_own_region_and_department() {
    let client = client();
    let h = common::hierarchy();
    let eval = PredicateEvaluator::new(&h);
    let user = Principal::departmental(Role::User, DepartmentId::new(11));

    let regions = client.scope_filter(&user, ResourceKind::Region).unwrap();
    let region_rows = common::rows(ResourceKind::Region);
    let matched = eval.filter(&regions, &region_rows);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, 1);

    let departments = client.scope_filter(&user, ResourceKind::Department).unwrap();
    let department_rows = common::rows(ResourceKind::Department);
    let matched = eval.filter(&departments, &department_rows);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, 11);
}

#[test]
fn unknown_arrondissement_is_unresolvable_not_unrestricted() {
    let client = client();
    let user = Principal::arrondissement(Role::User, ArrondissementId::new(999));
    for kind in ResourceKind::ALL {
        let err = client.scope_filter(&user, kind).unwrap_err();
        assert_eq!(
            err,
            GeoAccessError::UnresolvableScope {
                level: GeoLevel::Arrondissement,
                id: 999
            }
        );
        assert!(err.is_unresolvable_scope());
    }
}

#[test]
fn national_and_super_admin_are_unrestricted() {
    let client = client();
    let national = Principal::national(Role::User);
    let super_admin = Principal::arrondissement(Role::SuperAdmin, ArrondissementId::new(100));
    for kind in ResourceKind::ALL {
        assert!(client.scope_filter(&national, kind).unwrap().is_unrestricted());
        assert!(client.scope_filter(&super_admin, kind).unwrap().is_unrestricted());
    }
    assert!(client
        .authorize(&super_admin, "users", Action::Delete)
        .is_allowed());
}

#[test]
fn regional_scope_on_departments_uses_the_parent_key() {
    let client = client();
    let admin = Principal::regional(Role::Admin, RegionId::new(1));
    assert_eq!(
        client.scope_filter(&admin, ResourceKind::Department).unwrap(),
        Predicate::eq(GeoField::RegionId, 1_i64)
    );
    assert_eq!(
        client.scope_filter(&admin, ResourceKind::Region).unwrap(),
        Predicate::eq(GeoField::Id, 1_i64)
    );
}

#[test]
fn user_role_reads_everything_and_writes_nothing() {
    let client = client();
    let user = Principal::national(Role::User);
    for resource in ["fosas", "regions", "personnels", "users"] {
        assert!(client.authorize(&user, resource, Action::Read).is_allowed());
        for action in [Action::Create, Action::Update, Action::Delete, Action::Manage] {
            assert!(!client.authorize(&user, resource, action).is_allowed());
        }
    }
}

#[test]
fn admin_manages_users_but_manager_only_reads_them() {
    let client = client();
    let admin = Principal::national(Role::Admin);
    let manager = Principal::national(Role::Manager);
    assert!(client.authorize(&admin, "users", Action::Delete).is_allowed());
    assert!(client.authorize(&manager, "users", Action::Read).is_allowed());
    assert!(!client.authorize(&manager, "users", Action::Update).is_allowed());
    assert!(!client.authorize(&manager, "fosas", Action::Delete).is_allowed());
    assert!(client.authorize(&manager, "batiments", Action::Delete).is_allowed());
}

#[test]
fn raw_principal_is_validated_before_anything_else() {
    let client = client();

    let national_with_id = RawPrincipal::with_scope_id("admin", "national", Some(1));
    assert!(matches!(
        client.authorize_raw(&national_with_id, "fosas", Action::Read),
        Err(GeoAccessError::InvalidPrincipal(_))
    ));

    let regional_without_id = RawPrincipal::with_scope_id("admin", "regional", None);
    assert!(matches!(
        client.enforce_raw(&regional_without_id, "fosas", Action::Read, ResourceKind::Leaf),
        Err(GeoAccessError::InvalidPrincipal(_))
    ));

    let bad_scope = RawPrincipal::with_scope_id("admin", "continental", Some(1));
    assert!(matches!(
        client.authorize_raw(&bad_scope, "fosas", Action::Read),
        Err(GeoAccessError::InvalidPrincipal(_))
    ));

    let ok = RawPrincipal::with_scope_id("manager", "departmental", Some(10));
    let access = client
        .enforce_raw(&ok, "fosas", Action::Read, ResourceKind::Leaf)
        .unwrap();
    assert_eq!(
        access.predicate().unwrap().to_string(),
        "department_of(arrondissement_id) = 10"
    );
}

#[test]
fn scope_filter_for_resolves_resource_names() {
    let client = client();
    let user = Principal::arrondissement(Role::User, ArrondissementId::new(200));
    assert_eq!(
        client.scope_filter_for(&user, "equipements").unwrap(),
        Some(Predicate::eq(GeoField::ArrondissementId, 200_i64))
    );
    assert_eq!(
        client.scope_filter_for(&user, "arrondissements").unwrap(),
        Some(Predicate::eq(GeoField::Id, 200_i64))
    );
    assert_eq!(client.scope_filter_for(&user, "users").unwrap(), None);
    assert_eq!(
        client.scope_filter_for(&user, "hangars").unwrap_err(),
        GeoAccessError::UnknownResource("hangars".to_owned())
    );
}

#[test]
fn write_targets_are_checked_against_the_scope() {
    let client = client();
    let manager = Principal::arrondissement(Role::Manager, ArrondissementId::new(101));
    assert!(client
        .check_target(&manager, GeoTarget::Arrondissement(ArrondissementId::new(101)))
        .unwrap());
    assert!(!client
        .check_target(&manager, GeoTarget::Arrondissement(ArrondissementId::new(100)))
        .unwrap());
    assert!(!client
        .check_target(&manager, GeoTarget::Department(DepartmentId::new(10)))
        .unwrap());

    let stale = Principal::regional(Role::Admin, RegionId::new(9));
    assert!(client
        .check_target(&stale, GeoTarget::Region(RegionId::new(1)))
        .unwrap_err()
        .is_unresolvable_scope());
}

#[test]
fn custom_permission_table_replaces_a_role() {
    let cfg =
        GeoAccessConfig::from_yaml_str("permissions:\n  user: [\"fosas.read\"]\n").unwrap();
    let client = GeoAccessLocalClient::new(Arc::new(common::service_with(&cfg)));
    let user = Principal::national(Role::User);
    assert!(client.authorize(&user, "fosas", Action::Read).is_allowed());
    assert!(!client.authorize(&user, "batiments", Action::Read).is_allowed());
}

#[test]
fn roles_missing_from_a_custom_table_have_no_grants() {
    let cfg =
        GeoAccessConfig::from_yaml_str("permissions:\n  manager: [\"fosas.read\"]\n").unwrap();
    let client = GeoAccessLocalClient::new(Arc::new(common::service_with(&cfg)));

    let admin = Principal::national(Role::Admin);
    let decision = client.authorize(&admin, "users", Action::Delete);
    assert_eq!(
        decision.deny_reason().map(|r| r.code),
        Some(DenyCode::RoleLacksPermission)
    );
    let user = Principal::national(Role::User);
    assert!(!client.authorize(&user, "regions", Action::Read).is_allowed());

    let manager = Principal::departmental(Role::Manager, DepartmentId::new(10));
    assert!(client.authorize(&manager, "fosas", Action::Read).is_allowed());
    assert!(!client.authorize(&manager, "fosas", Action::Update).is_allowed());

    let root = Principal::national(Role::SuperAdmin);
    assert!(client.authorize(&root, "users", Action::Delete).is_allowed());
}
