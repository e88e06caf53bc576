//! Authentication service tests against a mock directory.

mod mocks;

use std::sync::Arc;

use admin_domain::{application::services::AuthenticationService, domain::errors::DomainError};
use mocks::MockUserDirectory;

fn setup() -> (AuthenticationService, Arc<MockUserDirectory>) {
    let directory = Arc::new(MockUserDirectory::new());
    (AuthenticationService::new(directory.clone()), directory)
}

#[tokio::test]
async fn login_returns_token_bundle() {
    let (service, _) = setup();

    let bundle = service.login("jdoe", "secret").await.unwrap();
    assert_eq!(bundle.access_token, "token-jdoe");
    assert_eq!(bundle.token_type, "Bearer");
}

#[tokio::test]
async fn login_rejects_empty_credentials_without_calling_the_provider() {
    let (service, _) = setup();

    for (username, password) in [("", "secret"), ("jdoe", "")] {
        match service.login(username, password).await {
            Err(DomainError::Validation { field, .. }) => assert_eq!(field, "credentials"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn bad_password_maps_to_invalid_credentials() {
    let (service, _) = setup();

    match service.login("jdoe", "wrong").await {
        Err(DomainError::InvalidCredentials) => {}
        other => panic!("Expected InvalidCredentials, got {other:?}"),
    }
}

#[tokio::test]
async fn validate_token_checks_the_directory() {
    let (service, directory) = setup();
    directory
        .valid_tokens
        .lock()
        .unwrap()
        .push("good-token".to_string());

    assert!(service.validate_token("good-token").await);
    assert!(!service.validate_token("bad-token").await);
}

#[tokio::test]
async fn validate_token_fails_closed_on_directory_errors() {
    let (service, directory) = setup();
    directory
        .valid_tokens
        .lock()
        .unwrap()
        .push("good-token".to_string());
    directory.set_should_fail(true);

    assert!(!service.validate_token("good-token").await);
}
