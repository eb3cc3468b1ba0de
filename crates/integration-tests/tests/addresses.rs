//! Address book.

use shopvely_client::ApiError;
use shopvely_client::models::NewAddress;
use shopvely_client::views::{AddressSlot, AddressesView, Notice};
use shopvely_core::AddressId;
use shopvely_integration_tests::FakeApi;

fn new_address(full_name: &str, pincode: &str) -> NewAddress {
    NewAddress {
        full_name: full_name.to_string(),
        phone: "9876543210".to_string(),
        line1: "4 Park Street".to_string(),
        city: "Kolkata".to_string(),
        state: "WB".to_string(),
        pincode: pincode.to_string(),
        ..NewAddress::default()
    }
}

#[tokio::test]
async fn test_set_default_leaves_exactly_one() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.seed_address("Home", true).await;
    let office = fake.seed_address("Office", false).await;
    fake.seed_address("Parents", false).await;
    let view = AddressesView::new();
    view.load(&api).await.unwrap();

    let updated = view.set_default(&api, AddressId::new(office)).await.unwrap();

    assert!(updated.is_default);
    let defaults: Vec<AddressId> = view
        .state()
        .await
        .data
        .iter()
        .filter(|a| a.is_default)
        .map(|a| a.id)
        .collect();
    assert_eq!(defaults, vec![AddressId::new(office)]);
    assert_eq!(fake.default_address_ids().await, vec![office]);
    assert!(!view.state().await.is_busy(&AddressSlot::Existing(AddressId::new(office))));
}

#[tokio::test]
async fn test_created_address_goes_first() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.seed_address("Home", true).await;
    let view = AddressesView::new();
    view.load(&api).await.unwrap();

    let created = view
        .create(&api, &new_address("Studio", "700016"))
        .await
        .unwrap();

    let state = view.state().await;
    assert_eq!(state.data.len(), 2);
    assert_eq!(state.data.first().unwrap().id, created.id);
    assert_eq!(view.default_address().await.unwrap().full_name, "Home");
}

#[tokio::test]
async fn test_blank_fields_rejected_before_sending() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    let view = AddressesView::new();
    view.load(&api).await.unwrap();
    let sent = fake.request_count();

    let result = view.create(&api, &new_address("", "")).await;

    let Err(ApiError::Validation(errors)) = result else {
        panic!("expected validation error, got {result:?}");
    };
    assert_eq!(errors.field("full_name"), ["This field is required."]);
    assert_eq!(errors.field("pincode"), ["This field is required."]);
    assert!(errors.field("line2").is_empty());
    assert_eq!(fake.request_count(), sent);
    assert!(view.state().await.data.is_empty());
}

#[tokio::test]
async fn test_server_field_errors_are_kept() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    let view = AddressesView::new();
    view.load(&api).await.unwrap();

    let result = view.create(&api, &new_address("Studio", "70001")).await;

    let Err(ApiError::Validation(errors)) = result else {
        panic!("expected validation error, got {result:?}");
    };
    assert_eq!(errors.field("pincode"), ["Enter a valid 6 digit pincode."]);
    assert!(matches!(view.state().await.notice, Some(Notice::Alert(_))));
}

#[tokio::test]
async fn test_delete_address() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    let home = fake.seed_address("Home", true).await;
    let office = fake.seed_address("Office", false).await;
    let view = AddressesView::new();
    view.load(&api).await.unwrap();

    view.delete(&api, AddressId::new(office)).await.unwrap();

    let ids: Vec<AddressId> = view.state().await.data.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![AddressId::new(home)]);
}

#[tokio::test]
async fn test_delete_missing_address_keeps_list() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.seed_address("Home", true).await;
    let view = AddressesView::new();
    view.load(&api).await.unwrap();

    let result = view.delete(&api, AddressId::new(99)).await;

    assert!(result.is_err());
    assert_eq!(view.state().await.data.len(), 1);
    assert_eq!(
        view.state().await.notice,
        Some(Notice::Alert("Not found.".to_string()))
    );
}
