//! `cart` commands.

use shopvely_client::views::CartView;
use shopvely_core::{AddressId, CartItemId, ProductId};

use super::{CommandError, Context, emit, emit_notice};
use crate::render;

/// Mount the cart page: cart and addresses together.
async fn mount(ctx: &Context) -> CartView {
    let view = CartView::new();
    // Failures are recorded in the view and shown with it
    let _ = view.mount(&ctx.api).await;
    view
}

async fn print(view: &CartView) {
    let state = view.state().await;
    let addresses = view.addresses().await;
    emit(&render::cart(
        &state,
        &addresses.data,
        view.selected_address().await,
    ));
    emit_notice(state.notice.as_ref());
}

pub async fn show(ctx: &Context) -> Result<(), CommandError> {
    let view = mount(ctx).await;
    let state = view.state().await;
    if state.error.is_some() {
        emit(&render::error_panel("cart", &state.error));
        return Ok(());
    }
    print(&view).await;
    Ok(())
}

pub async fn add(ctx: &Context, product: ProductId, quantity: u32) -> Result<(), CommandError> {
    let view = mount(ctx).await;
    let result = view.add(&ctx.api, product, quantity).await;
    print(&view).await;
    result.map_err(Into::into)
}

pub async fn set_quantity(
    ctx: &Context,
    item: CartItemId,
    quantity: u32,
) -> Result<(), CommandError> {
    let view = mount(ctx).await;
    let result = view.update_quantity(&ctx.api, item, quantity).await;
    print(&view).await;
    result.map_err(Into::into)
}

pub async fn remove(ctx: &Context, item: CartItemId) -> Result<(), CommandError> {
    let view = mount(ctx).await;
    let result = view.remove_item(&ctx.api, item).await;
    print(&view).await;
    result.map_err(Into::into)
}

pub async fn checkout(ctx: &Context, address: Option<AddressId>) -> Result<(), CommandError> {
    let view = mount(ctx).await;
    if let Some(id) = address {
        view.select_address(id).await?;
    }
    let result = view.checkout(&ctx.api).await;
    print(&view).await;
    result.map(drop).map_err(Into::into)
}
