//! Password change.

use secrecy::SecretString;
use shopvely_client::ApiError;
use shopvely_client::gateways::account::PasswordChange;
use shopvely_client::gateways::auth;
use shopvely_integration_tests::{FakeApi, PASSWORD, USERNAME};

fn form(current: &str, new: &str, confirm: &str) -> Result<PasswordChange, ApiError> {
    PasswordChange::new(
        SecretString::from(current),
        SecretString::from(new),
        &SecretString::from(confirm),
    )
}

#[tokio::test]
async fn test_wrong_current_password_is_a_field_error() {
    let fake = FakeApi::start().await;
    let (api, navigations) = fake.logged_in().await;

    let result = form("wrong", "new-password-1", "new-password-1")
        .unwrap()
        .submit(&api)
        .await;

    let Err(ApiError::Validation(errors)) = result else {
        panic!("expected validation error, got {result:?}");
    };
    assert_eq!(errors.field("old_password"), ["Old password is incorrect."]);
    assert!(api.session().is_authenticated());
    assert!(navigations.routes().is_empty());
}

#[tokio::test]
async fn test_weak_new_password_is_a_field_error() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;

    let result = form(PASSWORD, "short", "short").unwrap().submit(&api).await;

    let Err(ApiError::Validation(errors)) = result else {
        panic!("expected validation error, got {result:?}");
    };
    assert_eq!(errors.first_message(), errors.field("new_password").first().map(String::as_str));
    assert!(errors.field("old_password").is_empty());
}

#[tokio::test]
async fn test_mismatch_never_reaches_the_server() {
    let fake = FakeApi::start().await;
    let (_api, _) = fake.logged_in().await;
    let sent = fake.request_count();

    assert!(form(PASSWORD, "new-password-1", "new-password-2").is_err());
    assert!(form(PASSWORD, "", "").is_err());
    assert_eq!(fake.request_count(), sent);
}

#[tokio::test]
async fn test_change_password_then_log_in_again() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;

    let ack = form(PASSWORD, "new-password-1", "new-password-1")
        .unwrap()
        .submit(&api)
        .await
        .unwrap();
    assert_eq!(ack.message_or("Password changed"), "Password updated successfully");
    assert!(api.session().is_authenticated());

    let (fresh, _) = fake.client();
    assert!(
        auth::login(&fresh, USERNAME, &SecretString::from(PASSWORD))
            .await
            .is_err()
    );
    auth::login(&fresh, USERNAME, &SecretString::from("new-password-1"))
        .await
        .unwrap();
}
