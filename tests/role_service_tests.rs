//! Role management service tests against a mock directory.

mod mocks;

use std::sync::Arc;

use admin_domain::{
    application::services::{RoleManagementService, UserManagementService},
    domain::entities::{CreateRoleRequest, CreateUserRequest, UpdateRoleRequest},
    domain::errors::DomainError,
};
use mocks::MockUserDirectory;

fn setup() -> (RoleManagementService, UserManagementService, Arc<MockUserDirectory>) {
    let directory = Arc::new(MockUserDirectory::new());
    (
        RoleManagementService::new(directory.clone()),
        UserManagementService::new(directory.clone()),
        directory,
    )
}

fn role_request(name: &str) -> CreateRoleRequest {
    CreateRoleRequest {
        name: name.to_string(),
        description: Some(format!("{name} role")),
        composite: None,
    }
}

#[tokio::test]
async fn create_and_fetch_role() {
    let (roles, _, _) = setup();

    roles.create_role(&role_request("professor")).await.unwrap();
    let fetched = roles.get_role("professor").await.unwrap();
    assert_eq!(fetched.name, "professor");
    assert_eq!(fetched.description.as_deref(), Some("professor role"));
}

#[tokio::test]
async fn duplicate_role_name_is_rejected() {
    let (roles, _, _) = setup();
    roles.create_role(&role_request("professor")).await.unwrap();

    match roles.create_role(&role_request("professor")).await {
        Err(DomainError::AlreadyExists { entity_type, .. }) => assert_eq!(entity_type, "Role"),
        other => panic!("Expected AlreadyExists, got {other:?}"),
    }
}

#[tokio::test]
async fn update_role_merges_fields() {
    let (roles, _, _) = setup();
    roles.create_role(&role_request("professor")).await.unwrap();

    roles
        .update_role(
            "professor",
            &UpdateRoleRequest {
                description: Some("Teaching staff".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let fetched = roles.get_role("professor").await.unwrap();
    assert_eq!(fetched.description.as_deref(), Some("Teaching staff"));
}

#[tokio::test]
async fn delete_then_fetch_is_not_found() {
    let (roles, _, _) = setup();
    roles.create_role(&role_request("professor")).await.unwrap();
    roles.delete_role("professor").await.unwrap();

    match roles.get_role("professor").await {
        Err(DomainError::NotFound { entity_type, .. }) => assert_eq!(entity_type, "Role"),
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn role_assignment_round_trip() {
    let (roles, users, _) = setup();

    roles.create_role(&role_request("professor")).await.unwrap();
    roles.create_role(&role_request("dean")).await.unwrap();
    let user = users
        .create_user(&CreateUserRequest {
            username: "jdoe".to_string(),
            password: "secret".to_string(),
            email: None,
            first_name: None,
            last_name: None,
        })
        .await
        .unwrap();
    let user_id = user.id.clone().unwrap();

    roles.assign_role(user_id.as_str(), "professor").await.unwrap();
    roles.assign_role(user_id.as_str(), "dean").await.unwrap();

    let assigned = roles.roles_for_user(user_id.as_str()).await.unwrap();
    assert_eq!(assigned.len(), 2);

    roles.remove_role(user_id.as_str(), "dean").await.unwrap();
    let assigned = roles.roles_for_user(user_id.as_str()).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].name, "professor");
}

#[tokio::test]
async fn assignment_requires_existing_role_and_user() {
    let (roles, users, _) = setup();
    let user = users
        .create_user(&CreateUserRequest {
            username: "jdoe".to_string(),
            password: "secret".to_string(),
            email: None,
            first_name: None,
            last_name: None,
        })
        .await
        .unwrap();
    let user_id = user.id.clone().unwrap();

    assert!(roles.assign_role(user_id.as_str(), "ghost").await.is_err());

    roles.create_role(&role_request("professor")).await.unwrap();
    assert!(roles.assign_role("missing-user", "professor").await.is_err());
}
