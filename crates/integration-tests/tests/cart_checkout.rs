//! Cart page: quantities, removals and checkout.

use shopvely_client::gateways::cart;
use shopvely_client::views::{CartAction, CartView, Notice, Phase};
use shopvely_client::ApiError;
use shopvely_core::{AddressId, CartItemId, OrderId, Price, ProductId};
use shopvely_integration_tests::FakeApi;

#[tokio::test]
async fn test_set_quantity_uses_server_totals() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    let item = fake.seed_cart(3, 1).await;
    let view = CartView::new();
    view.mount(&api).await.unwrap();

    view.update_quantity(&api, CartItemId::new(item), 5)
        .await
        .unwrap();

    let state = view.state().await;
    let line = state.data.item(CartItemId::new(item)).unwrap();
    assert_eq!(line.quantity, 5);
    assert_eq!(line.line_total(), Some(Price::from_paise(50_000)));
    assert_eq!(state.data.total_price, Price::from_paise(50_000));
    assert_eq!(state.data.total_items, 5);
    assert!(!state.is_busy(&CartAction::Item(CartItemId::new(item))));
    assert_eq!(state.phase, Phase::Ready);
}

#[tokio::test]
async fn test_summary_counts_lines_not_units() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.seed_cart(1, 2).await;
    fake.seed_cart(3, 4).await;

    let summary = cart::cart_summary(&api).await.unwrap();

    assert_eq!(summary.count, 2);
    assert_eq!(summary.cart.total_items, 6);
}

#[tokio::test]
async fn test_zero_quantity_is_rejected_locally() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    let item = fake.seed_cart(3, 2).await;
    let view = CartView::new();
    view.mount(&api).await.unwrap();
    let sent = fake.request_count();

    let result = view.update_quantity(&api, CartItemId::new(item), 0).await;

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert_eq!(fake.request_count(), sent);
    assert_eq!(fake.cart_quantities().await, vec![(3, 2)]);
}

#[tokio::test]
async fn test_add_merges_with_existing_line() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.seed_cart(2, 1).await;
    let view = CartView::new();
    view.mount(&api).await.unwrap();

    view.add(&api, ProductId::new(2), 2).await.unwrap();

    let state = view.state().await;
    assert_eq!(state.data.items.len(), 1);
    assert_eq!(
        state.data.item_for_product(ProductId::new(2)).unwrap().quantity,
        3
    );
}

#[tokio::test]
async fn test_remove_item() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    let kept = fake.seed_cart(1, 1).await;
    let removed = fake.seed_cart(2, 4).await;
    let view = CartView::new();
    view.mount(&api).await.unwrap();

    view.remove_item(&api, CartItemId::new(removed)).await.unwrap();

    let state = view.state().await;
    assert!(state.data.item(CartItemId::new(removed)).is_none());
    assert!(state.data.item(CartItemId::new(kept)).is_some());
    assert_eq!(state.data.total_price, Price::from_paise(129_900));
}

#[tokio::test]
async fn test_failed_update_leaves_cart_and_sets_alert() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    let item = fake.seed_cart(3, 1).await;
    let view = CartView::new();
    view.mount(&api).await.unwrap();
    fake.fail("/cart/").await;

    let result = view.update_quantity(&api, CartItemId::new(item), 4).await;

    assert!(result.is_err());
    let state = view.state().await;
    assert_eq!(state.data.item(CartItemId::new(item)).unwrap().quantity, 1);
    assert_eq!(
        state.notice,
        Some(Notice::Alert("Service Unavailable".to_string()))
    );
    assert!(api.session().is_authenticated());
}

// ============================================================================
// Mount
// ============================================================================

#[tokio::test]
async fn test_mount_loads_cart_and_preselects_default_address() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.seed_cart(1, 2).await;
    fake.seed_address("Office", false).await;
    let home = fake.seed_address("Home", true).await;

    let view = CartView::new();
    view.mount(&api).await.unwrap();

    assert_eq!(view.state().await.data.items.len(), 1);
    assert_eq!(view.addresses().await.data.len(), 2);
    assert_eq!(view.selected_address().await, Some(AddressId::new(home)));
}

#[tokio::test]
async fn test_mount_survives_address_failure() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.seed_cart(1, 2).await;
    fake.fail("/addresses/").await;

    let view = CartView::new();
    let result = view.mount(&api).await;

    assert!(result.is_err());
    assert_eq!(view.state().await.data.items.len(), 1);
    assert!(view.state().await.error.is_none());
    let addresses = view.addresses().await;
    assert!(addresses.data.is_empty());
    assert!(addresses.error.is_some());
    assert_eq!(view.selected_address().await, None);
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_places_order_and_empties_cart() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.store.lock().await.next_order_id = 42;
    fake.seed_cart(3, 2).await;
    fake.seed_address("Home", true).await;
    let view = CartView::new();
    view.mount(&api).await.unwrap();

    let receipt = view.checkout(&api).await.unwrap();

    assert_eq!(receipt.order_id, OrderId::new(42));
    let state = view.state().await;
    assert!(state.data.is_empty());
    assert!(state.data.total_price.is_zero());
    assert_eq!(
        state.notice,
        Some(Notice::Success("Order #42 placed successfully!".to_string()))
    );
    assert!(fake.cart_quantities().await.is_empty());
}

#[tokio::test]
async fn test_checkout_uses_chosen_address() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.seed_cart(3, 1).await;
    fake.seed_address("Home", true).await;
    let office = fake.seed_address("Office", false).await;
    let view = CartView::new();
    view.mount(&api).await.unwrap();

    view.select_address(AddressId::new(office)).await.unwrap();
    let receipt = view.checkout(&api).await.unwrap();

    let order = shopvely_client::gateways::orders::get_order(&api, receipt.order_id)
        .await
        .unwrap();
    assert_eq!(order.shipping_full_name, "Office");
}

#[tokio::test]
async fn test_checkout_empty_cart_sends_nothing() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.seed_address("Home", true).await;
    let view = CartView::new();
    view.mount(&api).await.unwrap();
    let sent = fake.request_count();

    let result = view.checkout(&api).await;

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert_eq!(fake.request_count(), sent);
    assert_eq!(
        view.state().await.notice,
        Some(Notice::Alert("Your cart is empty.".to_string()))
    );
}

#[tokio::test]
async fn test_checkout_without_addresses_sends_nothing() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.seed_cart(3, 1).await;
    let view = CartView::new();
    view.mount(&api).await.unwrap();
    let sent = fake.request_count();

    let result = view.checkout(&api).await;

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert_eq!(fake.request_count(), sent);
    assert_eq!(view.state().await.data.items.len(), 1);
}
