//! Order history and order detail.

use chrono::{TimeZone, Utc};
use shopvely_client::gateways::cart;
use shopvely_client::views::{
    DateRange, Notice, OrderDetailView, OrderFilter, OrdersView, StatusFilter,
};
use shopvely_client::{ApiClient, ApiError};
use shopvely_core::{AddressId, OrderId, OrderStatus, ProductId};
use shopvely_integration_tests::FakeApi;

/// Place an order for `lines` through the real checkout endpoint.
async fn place_order(fake: &FakeApi, api: &ApiClient, lines: &[(i64, i64)]) -> OrderId {
    let address = fake.seed_address("Home", true).await;
    for (product, quantity) in lines {
        fake.seed_cart(*product, *quantity).await;
    }
    cart::checkout_cart(api, AddressId::new(address))
        .await
        .unwrap()
        .order_id
}

#[tokio::test]
async fn test_load_failure_fills_error_panel() {
    let fake = FakeApi::start().await;
    let (api, navigations) = fake.logged_in().await;
    fake.fail("/orders/").await;
    let view = OrdersView::new();

    let result = view.load(&api).await;

    assert!(result.is_err());
    let state = view.state().await;
    assert!(state.data.is_empty());
    assert_eq!(state.error.as_deref(), Some("Service Unavailable"));
    assert!(navigations.routes().is_empty());
}

#[tokio::test]
async fn test_reload_after_failure_clears_error() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    place_order(&fake, &api, &[(1, 1)]).await;
    fake.fail("/orders/").await;
    let view = OrdersView::new();
    let _ = view.load(&api).await;

    fake.store.lock().await.failing_paths.clear();
    view.load(&api).await.unwrap();

    let state = view.state().await;
    assert!(state.error.is_none());
    assert_eq!(state.data.len(), 1);
}

#[tokio::test]
async fn test_filters_and_search() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    fake.store.lock().await.next_order_id = 41;
    place_order(&fake, &api, &[(1, 1)]).await;
    place_order(&fake, &api, &[(2, 1)]).await;
    let view = OrdersView::new();
    view.load(&api).await.unwrap();
    let soon = Utc.with_ymd_and_hms(2025, 4, 12, 0, 0, 0).unwrap();
    let much_later = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();

    let all = view.filtered(&OrderFilter::default(), soon).await;
    assert_eq!(all.len(), 2);

    let by_id = OrderFilter {
        search: "42".to_string(),
        ..OrderFilter::default()
    };
    let found = view.filtered(&by_id, soon).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found.first().unwrap().id, OrderId::new(42));

    let recent = OrderFilter {
        date: DateRange::Last30Days,
        ..OrderFilter::default()
    };
    assert_eq!(view.filtered(&recent, soon).await.len(), 2);
    assert!(view.filtered(&recent, much_later).await.is_empty());

    let shipped = OrderFilter {
        status: StatusFilter::Only(OrderStatus::Shipped),
        ..OrderFilter::default()
    };
    assert!(shipped.is_active());
    assert!(view.filtered(&shipped, soon).await.is_empty());
}

#[tokio::test]
async fn test_detail_buy_again() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    let id = place_order(&fake, &api, &[(1, 2), (3, 1)]).await;
    let view = OrderDetailView::new();
    view.load(&api, id).await.unwrap();

    view.buy_again(&api, ProductId::new(3), 1).await.unwrap();

    assert_eq!(fake.cart_quantities().await, vec![(3, 1)]);
    assert_eq!(
        view.state().await.notice,
        Some(Notice::Success("Added to cart again".to_string()))
    );
}

#[tokio::test]
async fn test_detail_reorder_all() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    let id = place_order(&fake, &api, &[(1, 2), (3, 1)]).await;
    let view = OrderDetailView::new();
    view.load(&api, id).await.unwrap();

    let added = view.reorder_all(&api).await.unwrap();

    assert_eq!(added, 2);
    assert_eq!(fake.cart_quantities().await, vec![(1, 2), (3, 1)]);
    assert_eq!(
        view.state().await.notice,
        Some(Notice::Success("All items added to cart".to_string()))
    );
}

#[tokio::test]
async fn test_detail_invoice() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    let id = place_order(&fake, &api, &[(3, 5)]).await;
    let view = OrderDetailView::new();
    view.load(&api, id).await.unwrap();

    let invoice = view.download_invoice(&api).await.unwrap();

    assert_eq!(invoice.order_id, id);
    assert!(invoice.content_type.as_deref().unwrap().starts_with("text/html"));
    assert!(invoice.body.contains("Total: 500.00"));
    assert_eq!(invoice.file_name(), format!("invoice-{id}.html"));
}

#[tokio::test]
async fn test_detail_actions_need_an_order() {
    let fake = FakeApi::start().await;
    let (api, _) = fake.logged_in().await;
    let view = OrderDetailView::new();

    assert!(view.load(&api, OrderId::new(404)).await.is_err());
    assert!(view.state().await.data.is_none());
    assert!(matches!(
        view.reorder_all(&api).await,
        Err(ApiError::InvalidInput(_))
    ));
}
